//! Binding forms: `def`, `=`, `\`, `fn`, and `if`.

use crate::errors;
use crate::interpreter::Interpreter;
use crate::scope::ScopeRef;
use crate::value::{Formal, LambdaValue, Value};

#[derive(Clone, Copy, PartialEq, Eq)]
pub(super) enum Target {
    Global,
    Local,
}

fn symbol_names(fn_name: &str, items: &[Value]) -> Result<Vec<String>, Value> {
    let mut names = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::Sym(name) => names.push(name.clone()),
            other => return Err(errors::non_symbol_binding(fn_name, i, other.type_name())),
        }
    }
    Ok(names)
}

fn reject_reserved(interp: &Interpreter, fn_name: &str, names: &[String]) -> Option<Value> {
    names
        .iter()
        .find(|name| interp.is_reserved(name))
        .map(|name| errors::reserved_name(fn_name, name))
}

/// `def` / `=`: a q-expression of symbols matched 1:1 against the
/// trailing values, bound globally or locally.
pub(super) fn define(
    interp: &Interpreter,
    scope: &ScopeRef,
    mut args: Vec<Value>,
    target: Target,
) -> Value {
    let fn_name = if target == Target::Global { "def" } else { "=" };
    if args.is_empty() {
        return errors::wrong_arg_count(fn_name, 2, 0);
    }
    let symbols = match args.remove(0) {
        Value::QExpr(items) => items,
        other => return errors::wrong_arg_type(fn_name, 0, "Q-Expression", other.type_name()),
    };
    let names = match symbol_names(fn_name, &symbols) {
        Ok(names) => names,
        Err(err) => return err,
    };
    if names.len() != args.len() {
        return errors::binding_count_mismatch(fn_name, names.len(), args.len());
    }
    if let Some(err) = reject_reserved(interp, fn_name, &names) {
        return err;
    }

    for (name, value) in names.into_iter().zip(args) {
        match target {
            Target::Global => scope.define_global(name, value),
            Target::Local => scope.put(name, value),
        }
    }
    Value::Unit
}

/// Parse a formal list, collapsing the `&` sigil into a `Variadic`
/// formal. `&` must be followed by exactly one final symbol.
fn parse_formals(names: Vec<String>) -> Result<Vec<Formal>, Value> {
    let mut formals = Vec::with_capacity(names.len());
    let mut names = names.into_iter();
    while let Some(name) = names.next() {
        if name == "&" {
            let Some(rest) = names.next() else {
                return Err(errors::bad_variadic_format());
            };
            if names.next().is_some() {
                return Err(errors::bad_variadic_format());
            }
            formals.push(Formal::Variadic(rest));
            break;
        }
        formals.push(Formal::Named(name));
    }
    Ok(formals)
}

fn lambda_parts(fn_name: &str, mut args: Vec<Value>) -> Result<(Vec<String>, Vec<Value>), Value> {
    if args.len() != 2 {
        return Err(errors::wrong_arg_count(fn_name, 2, args.len()));
    }
    let body = match args.pop() {
        Some(Value::QExpr(items)) => items,
        Some(other) => {
            return Err(errors::wrong_arg_type(
                fn_name,
                1,
                "Q-Expression",
                other.type_name(),
            ))
        }
        None => unreachable!("length checked above"),
    };
    let names = match args.pop() {
        Some(Value::QExpr(items)) => symbol_names(fn_name, &items)?,
        Some(other) => {
            return Err(errors::wrong_arg_type(
                fn_name,
                0,
                "Q-Expression",
                other.type_name(),
            ))
        }
        None => unreachable!("length checked above"),
    };
    Ok((names, body))
}

/// `\`: construct an anonymous function.
pub(super) fn lambda(args: Vec<Value>) -> Value {
    let (names, body) = match lambda_parts("\\", args) {
        Ok(parts) => parts,
        Err(err) => return err,
    };
    match parse_formals(names) {
        Ok(formals) => Value::Lambda(Box::new(LambdaValue::new(formals, body))),
        Err(err) => err,
    }
}

/// `fn`: named definition sugar. The first symbol of the formals list
/// is the name; the function is defined globally.
pub(super) fn named_fn(interp: &Interpreter, scope: &ScopeRef, args: Vec<Value>) -> Value {
    let (mut names, body) = match lambda_parts("fn", args) {
        Ok(parts) => parts,
        Err(err) => return err,
    };
    if let Some(err) = reject_reserved(interp, "fn", &names) {
        return err;
    }
    if names.is_empty() {
        return errors::wrong_arg_count("fn", 1, 0);
    }
    let name = names.remove(0);
    match parse_formals(names) {
        Ok(formals) => {
            scope.define_global(name, Value::Lambda(Box::new(LambdaValue::new(formals, body))));
            Value::Unit
        }
        Err(err) => err,
    }
}

/// `if`: Boolean-coercible condition and two q-expression branches;
/// exactly one branch evaluates.
pub(super) fn branch(interp: &Interpreter, scope: &ScopeRef, mut args: Vec<Value>) -> Value {
    if args.len() != 3 {
        return errors::wrong_arg_count("if", 3, args.len());
    }
    let condition = match &args[0] {
        Value::Bool(b) => *b,
        Value::Int(v) => *v != 0,
        Value::Float(v) => (*v as i64) != 0,
        other => return errors::wrong_arg_type("if", 0, "Boolean", other.type_name()),
    };

    let chosen = args.remove(if condition { 1 } else { 2 });
    match chosen {
        Value::QExpr(items) => interp.eval(scope, Value::SExpr(items)),
        other => {
            let index = if condition { 1 } else { 2 };
            errors::wrong_arg_type("if", index, "Q-Expression", other.type_name())
        }
    }
}
