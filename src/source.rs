//! Byte source (spec §3.1, §4.1): a random-access per-file byte stream with a
//! line counter, plus the location type every token and AST node carries.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Identifies one source file within a compilation. Locations carry this
/// instead of a borrowed reference so tokens and AST nodes stay `'static`-ish
/// and independent of any single `SourceFile`'s lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u32);

/// A source location: which file, the byte offset into it, the 1-based line
/// it starts on, and the width in bytes of the lexeme it denotes (spec §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: SourceId,
    pub offset: usize,
    pub line: u32,
    pub width: u32,
}

impl Location {
    pub fn new(file: SourceId, offset: usize, line: u32, width: u32) -> Self {
        Location { file, offset, line, width }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.offset)
    }
}

/// A whole source file held in memory with a read/seek cursor and the
/// lexer-maintained line counter (spec §4.1). `peek`-like operations are a
/// read followed by an `unread`, matching the source's stated interface.
pub struct SourceFile {
    pub path: PathBuf,
    bytes: Vec<u8>,
    pos: usize,
    pub line: u32,
}

impl SourceFile {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path)?;
        Ok(SourceFile { path, bytes, pos: 0, line: 1 })
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        SourceFile { path: path.into(), bytes, pos: 0, line: 1 }
    }

    pub fn tell(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.bytes.len());
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reads one byte and advances the cursor, or `None` at end of file.
    pub fn read_byte(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    /// Rewinds the cursor by one byte. Used to implement lookahead as
    /// read-then-unread, per spec §4.1.
    pub fn unread(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn peek_byte(&mut self) -> Option<u8> {
        let b = self.read_byte();
        if b.is_some() {
            self.unread();
        }
        b
    }

    /// Returns the raw byte slice between `start` and the current cursor
    /// position, without disturbing the cursor.
    pub fn slice_from(&self, start: usize) -> &[u8] {
        &self.bytes[start..self.pos]
    }

    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// The full text of the source line containing `offset`, for diagnostic
    /// rendering. Never needs to move the lexer's own cursor (spec §9
    /// REDESIGN FLAGS: diagnostics no longer seek the live stream).
    pub fn line_containing(&self, offset: usize) -> (&str, usize) {
        let offset = offset.min(self.bytes.len());
        let start = self.bytes[..offset]
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let end = self.bytes[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| offset + i)
            .unwrap_or(self.bytes.len());
        let text = std::str::from_utf8(&self.bytes[start..end]).unwrap_or("<invalid utf-8>");
        (text, start)
    }
}

/// Every source file touched by one compilation, indexed by `SourceId` so
/// tokens/locations/AST nodes can refer to a file without borrowing it.
#[derive(Default)]
pub struct Sources {
    files: Vec<SourceFile>,
}

impl Sources {
    pub fn new() -> Self {
        Sources { files: Vec::new() }
    }

    pub fn add(&mut self, file: SourceFile) -> SourceId {
        let id = SourceId(self.files.len() as u32);
        self.files.push(file);
        id
    }

    pub fn get(&self, id: SourceId) -> &SourceFile {
        &self.files[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SourceId) -> &mut SourceFile {
        &mut self.files[id.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_byte_advances_cursor() {
        let mut src = SourceFile::from_bytes("t.bpp", b"abc".to_vec());
        assert_eq!(src.read_byte(), Some(b'a'));
        assert_eq!(src.read_byte(), Some(b'b'));
        assert_eq!(src.tell(), 2);
    }

    #[test]
    fn unread_rewinds_one_byte() {
        let mut src = SourceFile::from_bytes("t.bpp", b"abc".to_vec());
        src.read_byte();
        src.unread();
        assert_eq!(src.tell(), 0);
        assert_eq!(src.read_byte(), Some(b'a'));
    }

    #[test]
    fn peek_byte_does_not_advance() {
        let mut src = SourceFile::from_bytes("t.bpp", b"abc".to_vec());
        assert_eq!(src.peek_byte(), Some(b'a'));
        assert_eq!(src.tell(), 0);
    }

    #[test]
    fn read_past_end_returns_none() {
        let mut src = SourceFile::from_bytes("t.bpp", b"a".to_vec());
        src.read_byte();
        assert_eq!(src.read_byte(), None);
    }

    #[test]
    fn line_containing_finds_current_line() {
        let src = SourceFile::from_bytes("t.bpp", b"let a = 1\nlet b = 2\n".to_vec());
        let (line, start) = src.line_containing(12);
        assert_eq!(line, "let b = 2");
        assert_eq!(start, 10);
    }

    #[test]
    fn line_containing_first_line() {
        let src = SourceFile::from_bytes("t.bpp", b"let a = 1\nlet b = 2\n".to_vec());
        let (line, start) = src.line_containing(3);
        assert_eq!(line, "let a = 1");
        assert_eq!(start, 0);
    }

    #[test]
    fn sources_registry_assigns_ids() {
        let mut sources = Sources::new();
        let id0 = sources.add(SourceFile::from_bytes("a.bpp", b"x".to_vec()));
        let id1 = sources.add(SourceFile::from_bytes("b.bpp", b"y".to_vec()));
        assert_ne!(id0, id1);
        assert_eq!(sources.get(id0).path.to_str(), Some("a.bpp"));
    }

    #[test]
    fn open_reads_a_real_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.bpp");
        fs::write(&path, b"section s manifest { x = 1 }").unwrap();

        let mut file = SourceFile::open(&path).unwrap();
        assert_eq!(file.read_byte(), Some(b's'));
        assert_eq!(file.len(), 28);
    }

    #[test]
    fn open_missing_file_returns_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SourceFile::open(dir.path().join("missing.bpp"));
        assert!(result.is_err());
    }
}
