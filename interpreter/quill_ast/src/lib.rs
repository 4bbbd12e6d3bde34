//! Quill AST - parse-tree vocabulary shared by the parser and the evaluator.
//!
//! The parser hands the evaluator a generic tree of [`ParseNode`]s rather
//! than a typed AST: each node carries a tag string, the literal source
//! text it covers, and its ordered children. The evaluator's tree reader
//! recognizes nodes by substring match on the tag, which keeps the two
//! sides decoupled (the parser is free to compose tags like
//! `"expr|integer"`).

mod escape;
mod node;

pub use escape::{escape, unescape};
pub use node::{ParseNode, ROOT_TAG};
