//! Quill FFI - dynamic libraries, C type descriptors, and foreign calls.
//!
//! This crate is the evaluator's only bridge across the ABI boundary. It
//! knows nothing about interpreter values; the evaluator converts its
//! own values to and from [`CValue`], and everything here works in terms
//! of that marshaling representation plus the closed [`CType`] table.
//!
//! # Layering
//!
//! - [`ForeignLibrary`] wraps `libloading` (open / resolve / close on
//!   drop).
//! - [`CType`] / [`StructLayout`] describe the closed foreign type
//!   vocabulary. Composite layouts are tightly packed: members sit at
//!   the sum of the preceding member sizes, no implicit padding.
//! - [`ExternFn`] holds a prepared call descriptor (a libffi CIF built
//!   once at declaration time) and performs the call.
//!
//! All fallible operations return [`FfiError`]; nothing in this crate
//! aborts the process on user-reachable input.

mod call;
mod ctype;
mod error;
mod library;

pub use call::{pack_members, unpack_members, CValue, ExternFn};
pub use ctype::{CType, StructLayout};
pub use error::FfiError;
pub use library::ForeignLibrary;

pub use libffi::middle::CodePtr;
