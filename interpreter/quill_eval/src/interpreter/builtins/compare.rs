//! Equality, ordering, and the logical operators.

use crate::errors;
use crate::value::{Builtin, Value};

/// `==` and `!=`: structural equality over any two values.
pub(super) fn equality(op: Builtin, args: Vec<Value>) -> Value {
    let name = op.name();
    if args.len() != 2 {
        return errors::wrong_arg_count(name, 2, args.len());
    }
    let equal = args[0] == args[1];
    Value::Bool(if op == Builtin::Eq { equal } else { !equal })
}

/// `> < >= <= && ||`: two numeric operands, Boolean out. One Float
/// operand switches the comparison to Float.
pub(super) fn ordering(op: Builtin, args: Vec<Value>) -> Value {
    let name = op.name();
    if args.len() != 2 {
        return errors::wrong_arg_count(name, 2, args.len());
    }
    for (i, arg) in args.iter().enumerate() {
        if !arg.is_number() {
            return errors::expects_number(name, i, arg.type_name());
        }
    }

    let result = match (args[0].as_int(), args[1].as_int()) {
        (Some(x), Some(y)) => match op {
            Builtin::Gt => x > y,
            Builtin::Lt => x < y,
            Builtin::Ge => x >= y,
            Builtin::Le => x <= y,
            Builtin::And => x != 0 && y != 0,
            Builtin::Or => x != 0 || y != 0,
            _ => unreachable!("non-ordering op routed to ordering"),
        },
        _ => {
            let x = args[0].as_float().unwrap_or(0.0);
            let y = args[1].as_float().unwrap_or(0.0);
            match op {
                Builtin::Gt => x > y,
                Builtin::Lt => x < y,
                Builtin::Ge => x >= y,
                Builtin::Le => x <= y,
                Builtin::And => x != 0.0 && y != 0.0,
                Builtin::Or => x != 0.0 || y != 0.0,
                _ => unreachable!("non-ordering op routed to ordering"),
            }
        }
    };
    Value::Bool(result)
}

/// `!`: coerce a numeric operand to Boolean (truncating Floats) and
/// negate it.
pub(super) fn negate(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return errors::wrong_arg_count("!", 1, args.len());
    }
    let truthy = match &args[0] {
        Value::Bool(b) => *b,
        Value::Int(v) => *v != 0,
        Value::Float(v) => (*v as i64) != 0,
        other => return errors::wrong_arg_type("!", 0, "Boolean", other.type_name()),
    };
    Value::Bool(!truthy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Console;
    use crate::interpreter::Interpreter;
    use pretty_assertions::assert_eq;

    fn session() -> Interpreter {
        match Interpreter::builder().console(Console::buffer()).build() {
            Ok(interp) => interp,
            Err(msg) => panic!("session build failed: {msg}"),
        }
    }

    #[test]
    fn equality_is_structural() {
        let interp = session();
        assert_eq!(interp.eval_line("== {1 2} {1 2}"), Value::Bool(true));
        assert_eq!(interp.eval_line("== 1 1.0"), Value::Bool(false));
        assert_eq!(interp.eval_line("!= \"a\" \"b\""), Value::Bool(true));
        assert_eq!(interp.eval_line("== head head"), Value::Bool(true));
        assert_eq!(interp.eval_line("== head tail"), Value::Bool(false));
    }

    #[test]
    fn ordering_mixes_int_and_float() {
        let interp = session();
        assert_eq!(interp.eval_line("> 2 1"), Value::Bool(true));
        assert_eq!(interp.eval_line("<= 2 2"), Value::Bool(true));
        assert_eq!(interp.eval_line("< 1.5 2"), Value::Bool(true));
        // Booleans take the float path when the other side is a Float
        assert_eq!(interp.eval_line("> true 0.5"), Value::Bool(true));
        assert_eq!(interp.eval_line("< false 0.5"), Value::Bool(true));
        assert!(interp.eval_line("> {1} 2").is_err());
    }

    #[test]
    fn logic_treats_nonzero_as_true() {
        let interp = session();
        assert_eq!(interp.eval_line("&& 1 2"), Value::Bool(true));
        assert_eq!(interp.eval_line("&& 1 0"), Value::Bool(false));
        assert_eq!(interp.eval_line("|| 0 3"), Value::Bool(true));
        assert_eq!(interp.eval_line("&& true false"), Value::Bool(false));
    }

    #[test]
    fn not_coerces_and_negates() {
        let interp = session();
        assert_eq!(interp.eval_line("! true"), Value::Bool(false));
        assert_eq!(interp.eval_line("! 0"), Value::Bool(true));
        assert_eq!(interp.eval_line("! 5"), Value::Bool(false));
        // Float truthiness truncates first
        assert_eq!(interp.eval_line("! 0.5"), Value::Bool(true));
        assert!(interp.eval_line("! \"no\"").is_err());
    }
}
