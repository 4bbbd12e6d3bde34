//! Arithmetic operators and the `min`/`max` folds.
//!
//! Boolean operands promote to Int on use; one Float operand promotes
//! the whole computation to Float. A zero right-hand operand of `/` or
//! `%` is an error, with an epsilon tolerance on the Float side.

use crate::errors;
use crate::value::{Builtin, Value, FLOAT_ZERO_EPS};

pub(super) fn fold_op(op: Builtin, mut args: Vec<Value>) -> Value {
    let name = op.name();
    for (i, arg) in args.iter().enumerate() {
        if !arg.is_number() {
            return errors::non_number_operand(name, i, arg.type_name());
        }
    }
    if args.is_empty() {
        return errors::wrong_arg_count(name, 1, 0);
    }

    let mut acc = promote_bool(args.remove(0));

    // `-` with a single operand negates
    if op == Builtin::Sub && args.is_empty() {
        return match acc {
            Value::Int(v) => Value::Int(v.wrapping_neg()),
            Value::Float(v) => Value::Float(-v),
            other => other,
        };
    }

    for next in args {
        acc = apply(op, acc, promote_bool(next));
        if acc.is_err() {
            break;
        }
    }
    acc
}

pub(super) fn extremum(op: Builtin, mut args: Vec<Value>) -> Value {
    let name = op.name();
    if args.len() < 2 {
        return errors::at_least_args(name, 2, args.len());
    }
    for (i, arg) in args.iter().enumerate() {
        if !arg.is_number() {
            return errors::expects_number(name, i, arg.type_name());
        }
    }

    let mut acc = promote_bool(args.remove(0));
    for next in args {
        let next = promote_bool(next);
        acc = match (acc.as_int(), next.as_int()) {
            (Some(x), Some(y)) => {
                let picked = if op == Builtin::Min { x.min(y) } else { x.max(y) };
                Value::Int(picked)
            }
            _ => {
                let (x, y) = float_pair(&acc, &next);
                let picked = if op == Builtin::Min { x.min(y) } else { x.max(y) };
                Value::Float(picked)
            }
        };
    }
    acc
}

fn promote_bool(value: Value) -> Value {
    match value {
        Value::Bool(b) => Value::Int(i64::from(b)),
        other => other,
    }
}

fn float_pair(x: &Value, y: &Value) -> (f64, f64) {
    (x.as_float().unwrap_or(0.0), y.as_float().unwrap_or(0.0))
}

fn apply(op: Builtin, x: Value, y: Value) -> Value {
    match (x.as_int(), y.as_int()) {
        (Some(a), Some(b)) => apply_int(op, a, b),
        _ => {
            let (a, b) = float_pair(&x, &y);
            apply_float(op, a, b)
        }
    }
}

fn apply_int(op: Builtin, x: i64, y: i64) -> Value {
    match op {
        Builtin::Add => Value::Int(x.wrapping_add(y)),
        Builtin::Sub => Value::Int(x.wrapping_sub(y)),
        Builtin::Mul => Value::Int(x.wrapping_mul(y)),
        Builtin::Pow => Value::Int((x as f64).powf(y as f64) as i64),
        Builtin::Div => {
            if y == 0 {
                errors::division_by_zero()
            } else {
                Value::Int(x.wrapping_div(y))
            }
        }
        Builtin::Mod => {
            if y == 0 {
                errors::zero_right_operand("%")
            } else {
                Value::Int(x.wrapping_rem(y))
            }
        }
        _ => unreachable!("non-arithmetic op routed to apply_int"),
    }
}

fn apply_float(op: Builtin, x: f64, y: f64) -> Value {
    match op {
        Builtin::Add => Value::Float(x + y),
        Builtin::Sub => Value::Float(x - y),
        Builtin::Mul => Value::Float(x * y),
        Builtin::Pow => Value::Float(x.powf(y)),
        Builtin::Div => {
            if y.abs() < FLOAT_ZERO_EPS {
                errors::division_by_zero()
            } else {
                Value::Float(x / y)
            }
        }
        Builtin::Mod => {
            if y.abs() < FLOAT_ZERO_EPS {
                errors::zero_right_operand("%")
            } else {
                Value::Float(x % y)
            }
        }
        _ => unreachable!("non-arithmetic op routed to apply_float"),
    }
}
