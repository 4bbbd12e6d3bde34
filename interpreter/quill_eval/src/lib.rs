//! Quill Eval - Tree-walking evaluator for the Quill interpreter.
//!
//! This crate reduces the s-expression values produced by `quill_parse`
//! under a fixed builtin set, user-defined functions with currying and
//! variadic binding, and the foreign-function surface from `quill_ffi`.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Value`: The closed runtime value enum
//! - `ScopeRef`: Shared, chained binding environments
//! - `Interpreter`: Session state (globals, reserved names, console)
//! - `reader`: Syntax-tree to value conversion
//! - `errors`: Script-visible error value constructors

mod console;
pub mod errors;
mod interpreter;
pub mod reader;
mod scope;
mod value;

pub use console::Console;
pub use interpreter::{Interpreter, InterpreterBuilder, SCRIPT_EXTENSION};
pub use scope::ScopeRef;
pub use value::{Builtin, Formal, LambdaValue, Value, FLOAT_ZERO_EPS};
