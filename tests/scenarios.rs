//! End-to-end scenarios S1-S6 (spec §8), driven entirely through the public
//! crate API, matching how a caller outside the crate would exercise the
//! lexer/parser.

use bcplc::arena::Arena;
use bcplc::ast::{DeclKind, ExprKind, FunctionBody, PrimitiveKind, Program};
use bcplc::lexer::Lexer;
use bcplc::parser::Parser;
use bcplc::source::{SourceFile, SourceId};
use bcplc::tags::TagSet;
use bcplc::token::TokenKind;

fn lex_all(text: &str, tags: &mut TagSet) -> Vec<TokenKind> {
    let mut file = SourceFile::from_bytes("t.bpp", text.as_bytes().to_vec());
    let source_id = SourceId(0);
    let mut lexer = Lexer::new(source_id, &mut file, tags);
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

/// Builds the arena/lexer/parser stack for `text`, parses one file, and
/// hands the resulting `Program` to `f` without letting it escape this
/// stack frame (the AST borrows from the arena and source file created
/// here).
fn with_parsed<R>(text: &str, f: impl FnOnce(&Program<'_>) -> R) -> R {
    let mut file = SourceFile::from_bytes("t.bpp", text.as_bytes().to_vec());
    let mut tags = TagSet::new();
    let arena = Arena::new();
    let lexer = Lexer::new(SourceId(0), &mut file, &mut tags);
    let mut out = Vec::new();
    let mut parser = Parser::new(&arena, lexer, &mut out);
    let mut program = Program::new();
    parser.parse_file(&mut program).expect("parse should succeed");
    f(&program)
}

#[test]
fn s1_tag_toggle_and_skip() {
    let mut tags = TagSet::new();
    let kinds = lex_all("$$foo $<foo let a = 1$>foo let b = 2", &mut tags);
    assert!(tags.contains("foo"));
    assert_eq!(
        kinds,
        vec![
            TokenKind::Let,
            TokenKind::Ident("a".to_string()),
            TokenKind::Eq,
            TokenKind::Integer(1),
            TokenKind::Let,
            TokenKind::Ident("b".to_string()),
            TokenKind::Eq,
            TokenKind::Integer(2),
        ]
    );
}

// `let` is not in MAY_START_COMMAND (neither here nor in the original C
// classifier tables), so two `let` declarations on separate lines do not
// get a virtual semicolon between them despite spec §8 S2's worked example
// claiming otherwise; see the Open Question decision in DESIGN.md. This
// scenario instead uses two manifest entries, whose second name is a bare
// `IDENT` — a kind that genuinely is in both ENDS_COMMAND and
// MAY_START_COMMAND — to exercise the real insertion rule.
#[test]
fn s2_virtual_semicolon() {
    let mut tags = TagSet::new();
    let kinds = lex_all("manifest { x = 1\ny = 2 }", &mut tags);
    assert_eq!(
        kinds,
        vec![
            TokenKind::Manifest,
            TokenKind::LBrace,
            TokenKind::Ident("x".to_string()),
            TokenKind::Eq,
            TokenKind::Integer(1),
            TokenKind::Semicolon,
            TokenKind::Ident("y".to_string()),
            TokenKind::Eq,
            TokenKind::Integer(2),
            TokenKind::RBrace,
        ]
    );
}

#[test]
fn s3_integer_literal_typing() {
    with_parsed(
        "section s manifest { x = 5; y = 3000000000; z = 20000000000 }",
        |program| {
            let decls = &program.sections[0].decls;
            let type_of = |i: usize| match &decls[i].kind {
                DeclKind::Manifest { init, .. } => init.type_index,
                _ => panic!("expected manifest decl"),
            };
            let types = &program.types;
            assert_eq!(type_of(0), types.builtin_type(PrimitiveKind::Int32));
            assert_eq!(type_of(1), types.builtin_type(PrimitiveKind::Int64));
            assert_eq!(type_of(2), types.builtin_type(PrimitiveKind::UInt64));
        },
    );
}

#[test]
fn s4_implicit_cast_on_declaration() {
    with_parsed("section s manifest { x of Int64 = 5 }", |program| {
        match &program.sections[0].decls[0].kind {
            DeclKind::Manifest { type_index, init } => {
                assert_eq!(*type_index, program.types.builtin_type(PrimitiveKind::Int64));
                match &init.kind {
                    ExprKind::Typecast { target, inner } => {
                        assert_eq!(*target, *type_index);
                        assert_eq!(inner.type_index, program.types.builtin_type(PrimitiveKind::Int32));
                    }
                    _ => panic!("expected typecast wrapping the initialiser"),
                }
            }
            _ => panic!("expected manifest decl"),
        }
    });
}

#[test]
fn s5_resultis_outside_valof() {
    with_parsed(
        "section s let f() = valof { resultis 1 }; let g() = resultis 2",
        |program| {
            assert_eq!(program.sections[0].decls.len(), 2);
            match &program.sections[0].decls[0].kind {
                DeclKind::Function { body, .. } => match body {
                    FunctionBody::Expr(expr) => {
                        assert_eq!(expr.type_index, program.types.builtin_type(PrimitiveKind::Int32));
                    }
                    _ => panic!("expected an expression body"),
                },
                _ => panic!("expected function decl"),
            }
            // g's `resultis` is outside any `valof`: a default-severity
            // diagnostic is emitted but parsing still succeeds (spec §7).
        },
    );
}

#[test]
fn s6_escape_resolution() {
    let mut tags = TagSet::new();
    let kinds = lex_all(r#""a*nB*x41*#u*#00e9""#, &mut tags);
    assert_eq!(kinds.len(), 1);
    match &kinds[0] {
        TokenKind::String(bytes) => {
            assert_eq!(&bytes[..4], b"a\nBA");
            let tail = std::str::from_utf8(&bytes[4..]).unwrap();
            assert_eq!(tail.chars().next(), Some('\u{00e9}'));
        }
        other => panic!("expected a string literal, got {:?}", other),
    }
}
