//! List and string operations: the two iterable flavors behave
//! uniformly under `head`, `tail`, and `join`.

use crate::errors;
use crate::interpreter::Interpreter;
use crate::scope::ScopeRef;
use crate::value::Value;

fn single_iterable(fn_name: &str, mut args: Vec<Value>) -> Result<Value, Value> {
    if args.len() != 1 {
        return Err(errors::wrong_arg_count(fn_name, 1, args.len()));
    }
    let arg = args.remove(0);
    if !arg.is_iterable() {
        return Err(errors::not_iterable(fn_name, 0, arg.type_name()));
    }
    let empty = match &arg {
        Value::QExpr(items) => items.is_empty(),
        Value::Str(s) => s.is_empty(),
        _ => false,
    };
    if empty {
        return Err(errors::empty_iterable(fn_name));
    }
    Ok(arg)
}

/// Keep only the first element or character.
pub(super) fn head(args: Vec<Value>) -> Value {
    match single_iterable("head", args) {
        Err(err) => err,
        Ok(Value::QExpr(mut items)) => {
            items.truncate(1);
            Value::QExpr(items)
        }
        Ok(Value::Str(s)) => Value::Str(s.chars().take(1).collect()),
        Ok(other) => other,
    }
}

/// Drop the first element or character.
pub(super) fn tail(args: Vec<Value>) -> Value {
    match single_iterable("tail", args) {
        Err(err) => err,
        Ok(Value::QExpr(mut items)) => {
            items.remove(0);
            Value::QExpr(items)
        }
        Ok(Value::Str(s)) => Value::Str(s.chars().skip(1).collect()),
        Ok(other) => other,
    }
}

/// Concatenate same-typed iterables.
pub(super) fn join(mut args: Vec<Value>) -> Value {
    if args.is_empty() {
        return errors::wrong_arg_count("join", 1, 0);
    }
    for (i, arg) in args.iter().enumerate() {
        if !arg.is_iterable() {
            return errors::not_iterable("join", i, arg.type_name());
        }
    }
    let first = args.remove(0);
    for (i, arg) in args.iter().enumerate() {
        if std::mem::discriminant(arg) != std::mem::discriminant(&first) {
            return errors::mixed_join_types("join", i + 1, arg.type_name(), first.type_name());
        }
    }

    match first {
        Value::QExpr(mut items) => {
            for arg in args {
                if let Value::QExpr(more) = arg {
                    items.extend(more);
                }
            }
            Value::QExpr(items)
        }
        Value::Str(mut text) => {
            for arg in args {
                if let Value::Str(more) = arg {
                    text.push_str(&more);
                }
            }
            Value::Str(text)
        }
        other => other,
    }
}

/// Reinterpret a q-expression as an s-expression and reduce it.
pub(super) fn eval_qexpr(interp: &Interpreter, scope: &ScopeRef, mut args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return errors::wrong_arg_count("eval", 1, args.len());
    }
    match args.remove(0) {
        Value::QExpr(items) => interp.eval(scope, Value::SExpr(items)),
        other => errors::wrong_arg_type("eval", 0, "Q-Expression", other.type_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Console;
    use pretty_assertions::assert_eq;

    fn session() -> Interpreter {
        match Interpreter::builder().console(Console::buffer()).build() {
            Ok(interp) => interp,
            Err(msg) => panic!("session build failed: {msg}"),
        }
    }

    #[test]
    fn head_and_tail_over_lists() {
        let interp = session();
        assert_eq!(
            interp.eval_line("head {1 2 3}"),
            Value::QExpr(vec![Value::Int(1)])
        );
        assert_eq!(
            interp.eval_line("tail {1 2 3}"),
            Value::QExpr(vec![Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn head_and_tail_over_strings() {
        let interp = session();
        assert_eq!(interp.eval_line("head \"quill\""), Value::Str("q".into()));
        assert_eq!(interp.eval_line("tail \"quill\""), Value::Str("uill".into()));
    }

    #[test]
    fn empty_iterables_are_errors() {
        let interp = session();
        assert!(interp.eval_line("head {}").is_err());
        assert!(interp.eval_line("tail {}").is_err());
        assert!(interp.eval_line("head \"\"").is_err());
        assert!(interp.eval_line("head 5").is_err());
    }

    #[test]
    fn join_concatenates_same_typed_iterables() {
        let interp = session();
        assert_eq!(
            interp.eval_line("join {1} {2 3} {4}"),
            Value::QExpr(vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
                Value::Int(4)
            ])
        );
        assert_eq!(
            interp.eval_line("join \"qu\" \"ill\""),
            Value::Str("quill".into())
        );
        assert!(interp.eval_line("join {1} \"x\"").is_err());
    }

    #[test]
    fn list_and_eval_round_trip() {
        let interp = session();
        assert_eq!(
            interp.eval_line("list 1 2 3"),
            Value::QExpr(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(interp.eval_line("eval {+ 1 2}"), Value::Int(3));
        assert_eq!(interp.eval_line("eval (list + 1 2)"), Value::Int(3));
    }
}
