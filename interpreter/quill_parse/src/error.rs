//! Parse error type.

use thiserror::Error;

/// Error produced while lexing or parsing Quill source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The lexer hit a character sequence no token matches.
    #[error("unrecognized input `{slice}` at byte {offset}")]
    UnrecognizedInput { slice: String, offset: usize },

    /// A closing bracket appeared without a matching opener.
    #[error("unexpected `{found}` at byte {offset}")]
    UnexpectedClose { found: char, offset: usize },

    /// An opening bracket was never closed.
    #[error("unclosed `{open}`, expected `{expected}` before end of input")]
    UnclosedDelimiter { open: char, expected: char },

    /// A closing bracket did not match the innermost opener.
    #[error("mismatched close: `{open}` closed by `{found}` at byte {offset}")]
    MismatchedClose {
        open: char,
        found: char,
        offset: usize,
    },
}
