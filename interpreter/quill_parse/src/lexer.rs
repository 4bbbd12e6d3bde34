//! Lexer for Quill using logos.

use logos::Logos;

use crate::ParseError;

/// Raw token kinds recognized by the lexer.
///
/// Priorities matter: a bare run of digits is an `Int`, not a `Symbol`,
/// even though the symbol character class includes digits.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[regex(r"-?[0-9]+", priority = 4)]
    Int,

    #[regex(r"-?([0-9]+\.[0-9]*|[0-9]*\.[0-9]+)[fF]?", priority = 5)]
    Decimal,

    #[regex(r#""(\\.|[^"\\])*""#)]
    Str,

    #[regex(r";[^\n\r]*")]
    Comment,

    #[regex(r"[a-zA-Z0-9_+\-*/\\=<>!&^%|]+", priority = 3)]
    Symbol,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
}

/// A token together with its source slice and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub text: String,
    pub offset: usize,
}

/// Lex a whole source string into a token stream.
///
/// The stream keeps comments; the parser turns them into comment nodes
/// that the evaluator's reader skips.
pub fn lex(source: &str) -> Result<Vec<Lexeme>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut out = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => out.push(Lexeme {
                token,
                text: lexer.slice().to_string(),
                offset: span.start,
            }),
            Err(()) => {
                return Err(ParseError::UnrecognizedInput {
                    slice: lexer.slice().to_string(),
                    offset: span.start,
                })
            }
        }
    }
    Ok(out)
}
