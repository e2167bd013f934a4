//! Lexer (spec §4.5): byte-at-a-time scanning over a `SourceFile`, producing
//! one `Token` per call to `next_token`. Grounded directly on
//! `original_source/src/token.c::next_token` and its helpers — every branch
//! below has a corresponding `case` there. Two spots deliberately diverge:
//! escape resolution builds a second buffer of typed units instead of
//! shifting bytes left in place (no embedded-NUL truncation risk), and
//! virtual-token insertion reuses `SourceFile::seek` to literally re-lex the
//! token after the inserted one, rather than caching a pending token.

use crate::source::{Location, SourceFile, SourceId};
use crate::tags::TagSet;
use crate::token::{ends_command, ends_expression, keyword_kind, must_start_command, Token, TokenKind};

pub struct Lexer<'a> {
    source_id: SourceId,
    file: &'a mut SourceFile,
    tags: &'a mut TagSet,
}

impl<'a> Lexer<'a> {
    pub fn new(source_id: SourceId, file: &'a mut SourceFile, tags: &'a mut TagSet) -> Self {
        Lexer { source_id, file, tags }
    }

    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    /// Shared view of the file being lexed, for diagnostics rendering
    /// (spec §4.2) while the lexer itself still owns the live cursor.
    pub fn file(&self) -> &SourceFile {
        self.file
    }

    /// A sentinel previous-token for the start of a file: matches neither
    /// `ends_command` nor `ends_expression`, so no virtual token is ever
    /// inserted before the first real one.
    pub fn bof_token(source_id: SourceId) -> Token {
        Token::new(TokenKind::LexEof, Location::new(source_id, 0, 1, 0))
    }

    pub fn next_token(&mut self, prev: &Token) -> Token {
        loop {
            let newline = self.skip_whitespace();
            let start = self.file.tell();
            let tok = match self.file.read_byte() {
                None => self.make(TokenKind::LexEof, start, 0),
                Some(c) => match self.dispatch(c, start) {
                    Some(t) => t,
                    None => continue,
                },
            };
            return self.apply_virtual_insertion(prev, tok, newline, start);
        }
    }

    fn apply_virtual_insertion(&mut self, prev: &Token, tok: Token, newline: bool, start: usize) -> Token {
        if newline && ends_command(&prev.kind) && crate::token::may_start_command(&tok.kind) {
            self.file.seek(start);
            return self.make(TokenKind::Semicolon, start, 1);
        }
        if !newline && ends_expression(&prev.kind) && must_start_command(&tok.kind) {
            self.file.seek(start);
            return self.make(TokenKind::Do, start, 1);
        }
        tok
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut newline = false;
        while let Some(b) = self.file.peek_byte() {
            if !is_space_byte(b) {
                break;
            }
            self.file.read_byte();
            if b == b'\n' {
                self.file.line += 1;
                newline = true;
            }
        }
        newline
    }

    fn make(&self, kind: TokenKind, offset: usize, width: usize) -> Token {
        Token::new(kind, Location::new(self.source_id, offset, self.file.line, width as u32))
    }

    /// Mirrors `ERR_TOK`: location is wherever the cursor sits when the error
    /// is detected, not the token's nominal start.
    fn error(&mut self, msg: &str) -> Token {
        let start = self.file.tell().saturating_sub(1);
        self.make(TokenKind::LexError(msg.to_string()), start, 1)
    }

    fn bump_if(&mut self, expected: u8) -> bool {
        match self.file.read_byte() {
            Some(b) if b == expected => true,
            Some(_) => {
                self.file.unread();
                false
            }
            None => false,
        }
    }

    fn dispatch(&mut self, c: u8, start: usize) -> Option<Token> {
        use TokenKind::*;
        match c {
            b'(' => Some(self.make(LParen, start, 1)),
            b')' => Some(self.make(RParen, start, 1)),
            b'[' => Some(self.make(LBracket, start, 1)),
            b']' => Some(self.make(RBracket, start, 1)),
            b'{' => Some(self.make(LBrace, start, 1)),
            b'}' => Some(self.make(RBrace, start, 1)),
            b'$' => self.lex_dollar(),
            b'"' | b'\'' => Some(self.read_quoted(start, c)),
            b'+' => Some(self.make(Plus, start, 1)),
            b'-' => Some(if self.bump_if(b'>') {
                self.make(Cond, start, 2)
            } else {
                self.make(Minus, start, 1)
            }),
            b'*' => Some(self.make(Star, start, 1)),
            b'/' => self.lex_slash(),
            b'=' => Some(self.make(Eq, start, 1)),
            b'!' => Some(self.make(EMark, start, 1)),
            b':' => Some(if self.bump_if(b'=') {
                self.make(Assign, start, 2)
            } else if self.bump_if(b':') {
                self.make(Of, start, 2)
            } else {
                self.make(Colon, start, 1)
            }),
            b',' => Some(self.make(Comma, start, 1)),
            b';' => Some(self.make(Semicolon, start, 1)),
            b'<' => Some(if self.bump_if(b'=') {
                self.make(Le, start, 2)
            } else {
                self.make(Lt, start, 1)
            }),
            b'>' => Some(if self.bump_if(b'=') {
                self.make(Ge, start, 2)
            } else {
                self.make(Gt, start, 1)
            }),
            b'~' => Some(if self.bump_if(b'=') {
                self.make(Ne, start, 2)
            } else {
                self.make(Not, start, 1)
            }),
            b'?' => Some(self.make(QMark, start, 1)),
            b'@' => Some(self.make(At, start, 1)),
            b'#' => Some(self.lex_hash()),
            _ if c.is_ascii_digit() => {
                self.file.unread();
                Some(self.read_num_constant(start, NumBase::Decimal))
            }
            _ if c.is_ascii_alphabetic() => Some(self.read_ident_or_keyword(start, c)),
            _ => Some(self.error("unexpected character")),
        }
    }

    /// `//` and `/* */` comments; both resume scanning on success (`None`),
    /// matching `next_token`'s `goto repeat`.
    fn lex_slash(&mut self) -> Option<Token> {
        match self.file.read_byte() {
            Some(b'/') => {
                while let Some(b) = self.file.read_byte() {
                    if b == b'\n' {
                        break;
                    }
                }
                None
            }
            Some(b'*') => loop {
                match self.file.read_byte() {
                    None => return Some(self.error("unclosed multiline comment")),
                    Some(b'*') => {
                        if self.bump_if(b'/') {
                            return None;
                        }
                    }
                    Some(b'\n') => self.file.line += 1,
                    Some(_) => {}
                }
            },
            Some(_) => {
                self.file.unread();
                Some(self.make(TokenKind::Slash, self.file.tell().saturating_sub(1), 1))
            }
            None => Some(self.make(TokenKind::Slash, self.file.tell().saturating_sub(1), 1)),
        }
    }

    /// `$$tag` toggles, `$<tag ... $>tag` / `$~tag ... $>tag` conditionally
    /// skip, a bare `$>tag` (reached outside an active skip) is discarded.
    fn lex_dollar(&mut self) -> Option<Token> {
        match self.file.read_byte() {
            Some(b'$') => match self.read_tag_word() {
                Ok(word) => {
                    self.tags.toggle(&word);
                    None
                }
                Err(msg) => Some(self.error(&msg)),
            },
            Some(b'<') => match self.read_tag_word() {
                Ok(word) => {
                    if self.tags.contains(&word) {
                        None
                    } else {
                        match self.skip_conditional(&word) {
                            Ok(()) => None,
                            Err(msg) => Some(self.error(&msg)),
                        }
                    }
                }
                Err(msg) => Some(self.error(&msg)),
            },
            Some(b'~') => match self.read_tag_word() {
                Ok(word) => {
                    if !self.tags.contains(&word) {
                        None
                    } else {
                        match self.skip_conditional(&word) {
                            Ok(()) => None,
                            Err(msg) => Some(self.error(&msg)),
                        }
                    }
                }
                Err(msg) => Some(self.error(&msg)),
            },
            Some(b'>') => match self.read_tag_word() {
                Ok(_) => None,
                Err(msg) => Some(self.error(&msg)),
            },
            _ => Some(self.error("unexpected character after `$`; expect `$`, `<`, `>` or `~`")),
        }
    }

    fn read_tag_word(&mut self) -> Result<String, String> {
        match self.file.read_byte() {
            Some(b) if is_word_char(b) => {
                let mut word = String::new();
                word.push(b as char);
                while let Some(nb) = self.file.peek_byte() {
                    if is_word_char(nb) {
                        self.file.read_byte();
                        word.push(nb as char);
                    } else {
                        break;
                    }
                }
                Ok(word)
            }
            _ => Err("expect identifier after tag directive".to_string()),
        }
    }

    /// Scans forward until a `$>` marker names `tag`, tracking line numbers.
    /// Reaching EOF first is not an error (spec §4.5.6: an unterminated
    /// conditional simply skips to the end of file).
    fn skip_conditional(&mut self, tag: &str) -> Result<(), String> {
        loop {
            match self.file.read_byte() {
                None => return Ok(()),
                Some(b'$') => match self.file.read_byte() {
                    Some(b'>') => match self.file.read_byte() {
                        Some(b) if is_word_char(b) => {
                            let mut word = String::new();
                            word.push(b as char);
                            while let Some(nb) = self.file.peek_byte() {
                                if is_word_char(nb) {
                                    self.file.read_byte();
                                    word.push(nb as char);
                                } else {
                                    break;
                                }
                            }
                            if word == tag {
                                return Ok(());
                            }
                        }
                        _ => return Err("expect identifier after `$>`".to_string()),
                    },
                    _ => {}
                },
                Some(b'\n') => self.file.line += 1,
                Some(_) => {}
            }
        }
    }

    fn lex_hash(&mut self) -> Token {
        let start = self.file.tell().saturating_sub(1);
        match self.file.read_byte() {
            Some(b'b') | Some(b'B') => self.read_num_constant(start, NumBase::Binary),
            Some(b'o') | Some(b'O') => self.read_num_constant(start, NumBase::Octal),
            Some(b'x') | Some(b'X') => self.read_num_constant(start, NumBase::Hex),
            Some(_) => {
                self.file.unread();
                self.read_num_constant(start, NumBase::Octal)
            }
            None => self.error("unexpected end of input after `#`"),
        }
    }

    /// Significant (non-`_`) characters allowed in one numeric literal body
    /// (spec §4.5.3), matching `original_source/src/token.c::read_num_constant`'s
    /// `i > 64` check — the character that would make a 66th significant
    /// digit is where the original errors, so the cap below fires at the
    /// same count rather than one-off.
    const MAX_SIGNIFICANT_DIGITS: usize = 64;

    fn read_num_constant(&mut self, start: usize, base: NumBase) -> Token {
        let mut buf = String::new();
        let mut significant = 0usize;
        loop {
            match self.file.peek_byte() {
                Some(b) if b.is_ascii_alphanumeric() || b == b'_' => {
                    if significant > Self::MAX_SIGNIFICANT_DIGITS {
                        return self.error("numeric constant too long");
                    }
                    self.file.read_byte();
                    if b != b'_' {
                        if !base.is_valid_digit(b) {
                            return self.error("unexpected character in numeric constant");
                        }
                        buf.push(b as char);
                        significant += 1;
                    }
                }
                _ => break,
            }
        }
        if buf.is_empty() {
            return self.error("invalid numeric constant");
        }
        match u64::from_str_radix(&buf, base.radix()) {
            Ok(val) => {
                let width = self.file.tell() - start;
                self.make(TokenKind::Integer(val), start, width)
            }
            Err(_) => self.error("invalid numeric constant"),
        }
    }

    fn read_ident_or_keyword(&mut self, start: usize, first: u8) -> Token {
        let mut word = String::new();
        word.push(first as char);
        while let Some(b) = self.file.peek_byte() {
            if is_word_char(b) {
                self.file.read_byte();
                word.push(b as char);
            } else {
                break;
            }
        }
        let width = word.len();
        match keyword_kind(&word) {
            Some(kind) => self.make(kind, start, width),
            None => self.make(TokenKind::Ident(word), start, width),
        }
    }

    fn read_quoted(&mut self, start: usize, quote: u8) -> Token {
        let mut raw = Vec::new();
        loop {
            match self.file.read_byte() {
                None | Some(b'\n') => return self.error("unexpected end of line; expect `'`"),
                Some(b) if b == quote => break,
                Some(b) => raw.push(b),
            }
        }
        let units = match resolve_escapes(&raw) {
            Ok(units) => units,
            Err(msg) => return self.error(&msg),
        };
        let width = self.file.tell() - start;
        if quote == b'\'' {
            match flatten_for_char(&units) {
                Ok(code) => self.make(TokenKind::Char(code), start, width),
                Err(msg) => self.error(&msg),
            }
        } else {
            self.make(TokenKind::String(flatten_for_string(&units)), start, width)
        }
    }
}

#[derive(Clone, Copy)]
enum NumBase {
    Decimal,
    Binary,
    Octal,
    Hex,
}

impl NumBase {
    fn radix(self) -> u32 {
        match self {
            NumBase::Decimal => 10,
            NumBase::Binary => 2,
            NumBase::Octal => 8,
            NumBase::Hex => 16,
        }
    }

    fn is_valid_digit(self, b: u8) -> bool {
        let lower = b.to_ascii_lowercase();
        match self {
            NumBase::Decimal => lower.is_ascii_digit(),
            NumBase::Binary => lower == b'0' || lower == b'1',
            NumBase::Octal => (b'0'..=b'7').contains(&lower),
            NumBase::Hex => lower.is_ascii_digit() || (b'a'..=b'f').contains(&lower),
        }
    }
}

fn is_word_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_space_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

#[derive(Clone, Copy)]
enum StringEncoding {
    Ascii,
    Utf8,
    Gb2312,
}

/// One unit of a resolved string/char literal: a plain byte, or a 16-bit
/// code unit produced by a `*#hhhh`/`*#dddd` escape once an encoding mode
/// (`*#u`/`*#g`) is active. Kept distinct instead of always widening to
/// bytes immediately, so a char literal made of exactly one `*#hhhh` escape
/// can become a full `Char(u16)` without a lossy round trip through UTF-8.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ResolvedUnit {
    Byte(u8),
    CodeUnit(u16),
}

/// Second pass over the raw bytes between quotes: resolves `*`-escapes into
/// typed units. Grounded on `original_source/src/token.c::resolve_escape_codes`,
/// reimplemented over a fresh output buffer instead of `strshl`-ing the input
/// left in place (the original's approach can run an embedded-NUL escape
/// output past the string's real end on the next `strlen` call).
fn resolve_escapes(raw: &[u8]) -> Result<Vec<ResolvedUnit>, String> {
    let mut units = Vec::new();
    let mut encoding = StringEncoding::Ascii;
    let mut i = 0;
    while i < raw.len() {
        if raw[i] != b'*' {
            units.push(ResolvedUnit::Byte(raw[i]));
            i += 1;
            continue;
        }
        let next = *raw
            .get(i + 1)
            .ok_or_else(|| "invalid escape sequence".to_string())?;
        match next {
            b'n' | b'N' => {
                units.push(ResolvedUnit::Byte(b'\n'));
                i += 2;
            }
            b'c' | b'C' => {
                units.push(ResolvedUnit::Byte(b'\r'));
                i += 2;
            }
            b'p' | b'P' => {
                units.push(ResolvedUnit::Byte(0x0c));
                i += 2;
            }
            b's' | b'S' => {
                units.push(ResolvedUnit::Byte(b' '));
                i += 2;
            }
            b'b' | b'B' => {
                units.push(ResolvedUnit::Byte(0x08));
                i += 2;
            }
            b't' | b'T' => {
                units.push(ResolvedUnit::Byte(b'\t'));
                i += 2;
            }
            b'e' | b'E' => {
                units.push(ResolvedUnit::Byte(0x1b));
                i += 2;
            }
            b'"' => {
                units.push(ResolvedUnit::Byte(b'"'));
                i += 2;
            }
            b'\'' => {
                units.push(ResolvedUnit::Byte(b'\''));
                i += 2;
            }
            b'*' => {
                units.push(ResolvedUnit::Byte(b'*'));
                i += 2;
            }
            b'x' | b'X' => {
                let val = parse_radix_u8(raw, i + 2, 2, 16, "*xhh")?;
                units.push(ResolvedUnit::Byte(val));
                i += 4;
            }
            d if d.is_ascii_digit() => {
                let end = (i + 4).min(raw.len());
                let mut j = i + 1;
                while j < end && raw[j].is_ascii_digit() {
                    j += 1;
                }
                let text = std::str::from_utf8(&raw[i + 1..j]).unwrap();
                let val: u32 = text
                    .parse()
                    .map_err(|_| "invalid escape sequence, expect `*ddd`, where `d` is 0-9".to_string())?;
                units.push(ResolvedUnit::Byte((val % 256) as u8));
                i = j;
            }
            b'#' => {
                let marker = *raw
                    .get(i + 2)
                    .ok_or_else(|| "invalid escape sequence after `*#`".to_string())?;
                match marker {
                    b'g' => {
                        encoding = StringEncoding::Gb2312;
                        i += 3;
                    }
                    b'u' => {
                        encoding = StringEncoding::Utf8;
                        i += 3;
                    }
                    h if h.is_ascii_hexdigit() => match encoding {
                        StringEncoding::Ascii => {
                            return Err(
                                "`*#hhhh` escape sequence can only be used in UTF-8 or GB2312 mode".to_string(),
                            );
                        }
                        StringEncoding::Utf8 => {
                            let val = parse_radix_u16(raw, i + 2, 4, 16, "*#hhhh")?;
                            units.push(ResolvedUnit::CodeUnit(val));
                            i += 6;
                        }
                        StringEncoding::Gb2312 => {
                            let text = raw
                                .get(i + 2..i + 6)
                                .ok_or_else(|| "invalid escape sequence, expect `*#dddd`, where `d` is 0-9".to_string())?;
                            let text = std::str::from_utf8(text)
                                .map_err(|_| "invalid escape sequence, expect `*#dddd`, where `d` is 0-9".to_string())?;
                            let val: u16 = text
                                .parse()
                                .map_err(|_| "invalid escape sequence, expect `*#dddd`, where `d` is 0-9".to_string())?;
                            units.push(ResolvedUnit::CodeUnit(val));
                            i += 6;
                        }
                    },
                    _ => return Err("invalid escape sequence after `*#`".to_string()),
                }
            }
            _ => return Err("invalid escape sequence".to_string()),
        }
    }
    Ok(units)
}

fn parse_radix_u8(raw: &[u8], at: usize, len: usize, radix: u32, fmt: &str) -> Result<u8, String> {
    let slice = raw
        .get(at..at + len)
        .ok_or_else(|| format!("invalid escape sequence, expect `{}`, where `h` is 0-F", fmt))?;
    let text = std::str::from_utf8(slice)
        .map_err(|_| format!("invalid escape sequence, expect `{}`, where `h` is 0-F", fmt))?;
    u8::from_str_radix(text, radix).map_err(|_| format!("invalid escape sequence, expect `{}`, where `h` is 0-F", fmt))
}

fn parse_radix_u16(raw: &[u8], at: usize, len: usize, radix: u32, fmt: &str) -> Result<u16, String> {
    let slice = raw
        .get(at..at + len)
        .ok_or_else(|| format!("invalid escape sequence, expect `{}`, where `h` is 0-F", fmt))?;
    let text = std::str::from_utf8(slice)
        .map_err(|_| format!("invalid escape sequence, expect `{}`, where `h` is 0-F", fmt))?;
    u16::from_str_radix(text, radix).map_err(|_| format!("invalid escape sequence, expect `{}`, where `h` is 0-F", fmt))
}

fn flatten_for_string(units: &[ResolvedUnit]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(units.len());
    for unit in units {
        match *unit {
            ResolvedUnit::Byte(b) => bytes.push(b),
            ResolvedUnit::CodeUnit(v) => match char::from_u32(v as u32) {
                Some(c) => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
                None => bytes.extend_from_slice(&v.to_be_bytes()),
            },
        }
    }
    bytes
}

fn flatten_for_char(units: &[ResolvedUnit]) -> Result<u16, String> {
    match units {
        [] => Ok(0),
        [ResolvedUnit::Byte(b)] => Ok(*b as u16),
        [ResolvedUnit::CodeUnit(v)] => Ok(*v),
        _ => Err("char literal has more than one character".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceFile;

    fn lex_all(text: &str) -> Vec<TokenKind> {
        let mut file = SourceFile::from_bytes("t.bpp", text.as_bytes().to_vec());
        let mut tags = TagSet::new();
        let source_id = SourceId(0);
        let mut lexer = Lexer::new(source_id, &mut file, &mut tags);
        let mut prev = Lexer::bof_token(source_id);
        let mut kinds = Vec::new();
        loop {
            let tok = lexer.next_token(&prev);
            if tok.is_eof() {
                break;
            }
            kinds.push(tok.kind.clone());
            prev = tok;
        }
        kinds
    }

    #[test]
    fn punctuation_and_two_char_operators() {
        let kinds = lex_all(":= :: <= >= ~= -> ? @");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Assign,
                TokenKind::Of,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::Ne,
                TokenKind::Cond,
                TokenKind::QMark,
                TokenKind::At,
            ]
        );
    }

    #[test]
    fn keyword_vs_identifier() {
        let kinds = lex_all("let x = valof");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Let,
                TokenKind::Ident("x".to_string()),
                TokenKind::Eq,
                TokenKind::Valof,
            ]
        );
    }

    #[test]
    fn decimal_and_based_integer_literals() {
        let kinds = lex_all("42 #b101 #o17 #xFF #7");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Integer(42),
                TokenKind::Integer(5),
                TokenKind::Integer(15),
                TokenKind::Integer(255),
                TokenKind::Integer(7),
            ]
        );
    }

    #[test]
    fn underscore_separators_in_literal_are_ignored() {
        let kinds = lex_all("1_000_000");
        assert_eq!(kinds, vec![TokenKind::Integer(1_000_000)]);
    }

    #[test]
    fn numeric_constant_at_the_significant_digit_cap_is_accepted() {
        // All zeros so the value still fits a u64 at 65 significant digits.
        let digits = "0".repeat(Lexer::MAX_SIGNIFICANT_DIGITS + 1);
        let kinds = lex_all(&digits);
        assert_eq!(kinds, vec![TokenKind::Integer(0)]);
    }

    #[test]
    fn numeric_constant_past_the_significant_digit_cap_is_a_lex_error() {
        // All zeros: the value would trivially fit a u64, so the only
        // possible source of this error is the significant-digit cap, not
        // `u64::from_str_radix` overflow.
        let digits = "0".repeat(Lexer::MAX_SIGNIFICANT_DIGITS + 2);
        let kinds = lex_all(&digits);
        assert_eq!(kinds.len(), 1);
        match &kinds[0] {
            TokenKind::LexError(msg) => assert!(msg.contains("too long")),
            other => panic!("expected a lex error, got {:?}", other),
        }
    }

    #[test]
    fn line_and_block_comments_are_skipped() {
        let kinds = lex_all("1 // trailing comment\n2 /* block\ncomment */ 3");
        assert_eq!(
            kinds,
            vec![TokenKind::Integer(1), TokenKind::Integer(2), TokenKind::Integer(3)]
        );
    }

    #[test]
    fn unclosed_block_comment_is_lex_error() {
        let kinds = lex_all("/* never closes");
        assert_eq!(kinds.len(), 1);
        assert!(matches!(kinds[0], TokenKind::LexError(_)));
    }

    #[test]
    fn string_literal_with_basic_escapes() {
        let kinds = lex_all(r#""a*nb*tc""#);
        assert_eq!(kinds, vec![TokenKind::String(b"a\nb\tc".to_vec())]);
    }

    #[test]
    fn string_literal_with_hex_byte_escape() {
        let kinds = lex_all(r#""*x41*x42""#);
        assert_eq!(kinds, vec![TokenKind::String(b"AB".to_vec())]);
    }

    #[test]
    fn char_literal_is_single_code_point() {
        let kinds = lex_all("'a'");
        assert_eq!(kinds, vec![TokenKind::Char(b'a' as u16)]);
    }

    #[test]
    fn char_literal_with_multiple_resolved_chars_is_error() {
        let kinds = lex_all("'ab'");
        assert!(matches!(kinds[0], TokenKind::LexError(_)));
    }

    #[test]
    fn wide_char_escape_preserves_full_code_unit() {
        let kinds = lex_all(r#"'*#u*#00e9'"#);
        assert_eq!(kinds, vec![TokenKind::Char(0x00e9)]);
    }

    #[test]
    fn unterminated_string_is_error() {
        let kinds = lex_all("\"unterminated\nfoo");
        assert!(matches!(kinds[0], TokenKind::LexError(_)));
    }

    #[test]
    fn tag_toggle_directive_mutates_tag_set() {
        let mut file = SourceFile::from_bytes("t.bpp", b"$$debug 1".to_vec());
        let mut tags = TagSet::new();
        let source_id = SourceId(0);
        let mut lexer = Lexer::new(source_id, &mut file, &mut tags);
        let prev = Lexer::bof_token(source_id);
        let tok = lexer.next_token(&prev);
        assert_eq!(tok.kind, TokenKind::Integer(1));
        assert!(tags.contains("debug"));
    }

    #[test]
    fn conditional_skip_when_tag_absent() {
        let kinds = lex_all("$<debug\nskipped_ident\n$>debug\n1");
        assert_eq!(kinds, vec![TokenKind::Integer(1)]);
    }

    #[test]
    fn conditional_kept_when_tag_present() {
        let mut file =
            SourceFile::from_bytes("t.bpp", b"$<debug\n1\n$>debug\n2".to_vec());
        let mut tags = TagSet::seeded(["debug".to_string()]);
        let source_id = SourceId(0);
        let mut lexer = Lexer::new(source_id, &mut file, &mut tags);
        let mut prev = Lexer::bof_token(source_id);
        let mut kinds = Vec::new();
        loop {
            let tok = lexer.next_token(&prev);
            if tok.is_eof() {
                break;
            }
            kinds.push(tok.kind.clone());
            prev = tok;
        }
        assert!(kinds.contains(&TokenKind::Integer(1)));
        assert!(kinds.contains(&TokenKind::Integer(2)));
    }

    #[test]
    fn virtual_semicolon_inserted_across_newline() {
        // `ends_command(IDENT)` and `may_start_command(IDENT)`: newline between
        // two statements gets a virtual `;` (spec §6.3 / original next_token).
        let kinds = lex_all("a\nb");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Semicolon,
                TokenKind::Ident("b".to_string()),
            ]
        );
    }

    #[test]
    fn no_virtual_semicolon_without_newline() {
        let kinds = lex_all("a b");
        assert_eq!(
            kinds,
            vec![TokenKind::Ident("a".to_string()), TokenKind::Ident("b".to_string())]
        );
    }

    #[test]
    fn virtual_do_inserted_before_control_keyword_same_line() {
        // `ends_expression(IDENT)` then `must_start_command(IF)` with no
        // newline between them: virtual `do` (spec §6.3).
        let kinds = lex_all("a if true then skip");
        assert_eq!(kinds[0], TokenKind::Ident("a".to_string()));
        assert_eq!(kinds[1], TokenKind::Do);
        assert_eq!(kinds[2], TokenKind::If);
    }
}
