//! Turns the generic parse tree into values.
//!
//! Tags are matched by substring, and bracket/comment children are
//! skipped, mirroring the parse-tree collaborator's shape.

use quill_ast::{unescape, ParseNode};

use crate::errors;
use crate::value::Value;

/// Read the children of the root node as a flat sequence of top-level
/// expressions.
pub fn read_program(root: &ParseNode) -> Vec<Value> {
    relevant_children(root).map(read_node).collect()
}

/// Read the children of the root node as one s-expression, the shape a
/// REPL line evaluates as.
pub fn read_line(root: &ParseNode) -> Value {
    Value::SExpr(read_program(root))
}

/// Read a single parse node into a value.
pub fn read_node(node: &ParseNode) -> Value {
    if node.tag_contains("integer") {
        return match node.contents.parse::<i64>() {
            Ok(v) => Value::Int(v),
            Err(_) => errors::number_out_of_range("long", &node.contents),
        };
    }
    if node.tag_contains("decimal") {
        // the grammar allows a trailing `f`/`F` suffix
        let text = node
            .contents
            .strip_suffix(['f', 'F'])
            .unwrap_or(&node.contents);
        return match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Value::Float(v),
            _ => errors::number_out_of_range("double", &node.contents),
        };
    }
    if node.tag_contains("string") {
        return Value::Str(read_string_literal(&node.contents));
    }
    if node.tag_contains("symbol") {
        return Value::Sym(node.contents.clone());
    }
    if node.tag_contains("qexpr") {
        return Value::QExpr(relevant_children(node).map(read_node).collect());
    }
    // sexpr and the synthetic root both read as s-expressions
    Value::SExpr(relevant_children(node).map(read_node).collect())
}

fn relevant_children(node: &ParseNode) -> impl Iterator<Item = &ParseNode> {
    node.children.iter().filter(|child| {
        !child.tag_contains("comment")
            && !matches!(child.contents.as_str(), "(" | ")" | "{" | "}")
    })
}

fn read_string_literal(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    unescape(inner)
}
