//! FFI error type.

use std::path::PathBuf;

use thiserror::Error;

/// Error produced by the FFI layer.
///
/// These are host-level errors; the evaluator converts them into
/// script-visible error values at the builtin boundary.
#[derive(Debug, Error)]
pub enum FfiError {
    /// The dynamic library could not be opened.
    #[error("could not open library `{path}`: {source}")]
    LibraryOpen {
        path: PathBuf,
        source: libloading::Error,
    },

    /// The symbol could not be resolved in the library.
    #[error("could not resolve symbol `{symbol}`: {source}")]
    SymbolResolve {
        symbol: String,
        source: libloading::Error,
    },

    /// A composite layout was declared with an unsupported member.
    #[error("struct `{name}` cannot have a member of type {member}")]
    InvalidMember { name: String, member: String },

    /// A composite layout was declared with no members.
    #[error("struct `{name}` must have at least one member")]
    EmptyLayout { name: String },

    /// `Void` was used where a value type is required.
    #[error("`{symbol}` declares Void in a non-first parameter position")]
    VoidParameter { symbol: String },

    /// Wrong number of arguments for a prepared call.
    #[error("`{symbol}` expects {expected} args, got {given}")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        given: usize,
    },

    /// An argument's marshaled kind does not match the declared type.
    #[error("`{symbol}` arg {index} expects {expected}, got {given}")]
    ArgumentMismatch {
        symbol: String,
        index: usize,
        expected: String,
        given: String,
    },

    /// A struct argument's payload does not match the declared layout.
    #[error("`{symbol}` arg {index}: struct payload is {given} bytes, layout needs {expected}")]
    StructSizeMismatch {
        symbol: String,
        index: usize,
        expected: usize,
        given: usize,
    },

    /// The callee returned a null pointer for a declared String return.
    #[error("`{symbol}` returned a null string")]
    NullStringReturn { symbol: String },

    /// An argument string contained an interior NUL byte.
    #[error("`{symbol}` arg {index}: string contains an interior NUL byte")]
    InteriorNul { symbol: String, index: usize },
}
