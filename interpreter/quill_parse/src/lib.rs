//! Quill Parse - turns source text into a generic [`ParseNode`] tree.
//!
//! The grammar is deliberately tiny:
//!
//! ```text
//! integer : -?[0-9]+
//! decimal : digits with a mandatory '.', optional trailing f/F
//! string  : "..." with backslash escapes
//! comment : ; to end of line
//! symbol  : [a-zA-Z0-9_+\-*/\\=<>!&^%|]+
//! sexpr   : '(' expr* ')'
//! qexpr   : '{' expr* '}'
//! ```
//!
//! The output mirrors the shape the evaluator's tree reader expects
//! (see `quill_ast`): tags matched by substring, bracket tokens and
//! comments present as children for the reader to skip.

mod error;
mod lexer;
mod parser;

pub use error::ParseError;
pub use lexer::{lex, Lexeme, Token};
pub use parser::parse;
