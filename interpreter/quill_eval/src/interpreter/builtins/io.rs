//! Console and file interaction builtins.

use crate::errors;
use crate::interpreter::Interpreter;
use crate::scope::ScopeRef;
use crate::value::Value;

/// `print`: each argument rendered followed by a space, then a newline.
pub(super) fn print(interp: &Interpreter, args: Vec<Value>) -> Value {
    let mut line = String::new();
    for arg in &args {
        line.push_str(&arg.to_string());
        line.push(' ');
    }
    interp.console().println(&line);
    Value::Unit
}

/// `read`: bind one line of console input to a symbol as a string.
pub(super) fn read(interp: &Interpreter, scope: &ScopeRef, mut args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return errors::wrong_arg_count("read", 1, args.len());
    }
    let items = match args.remove(0) {
        Value::QExpr(items) => items,
        other => return errors::wrong_arg_type("read", 0, "Q-Expression", other.type_name()),
    };
    let name = match items.as_slice() {
        [Value::Sym(name)] => name.clone(),
        [other] => return errors::non_symbol_binding("read", 0, other.type_name()),
        _ => return errors::wrong_arg_count("read", 1, items.len()),
    };
    if interp.is_reserved(&name) {
        return errors::reserved_name("read", &name);
    }
    match interp.console().read_line() {
        Some(line) => {
            scope.put(name, Value::Str(line));
            Value::Unit
        }
        None => errors::unreadable_input("read"),
    }
}

/// `error`: raise a user error from a string message.
pub(super) fn error(mut args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return errors::wrong_arg_count("error", 1, args.len());
    }
    match args.remove(0) {
        Value::Str(msg) => Value::Err(msg),
        other => errors::wrong_arg_type("error", 0, "String", other.type_name()),
    }
}

/// `type`: report the type name of a quoted expression. A quoted
/// symbol is resolved through the scope chain first.
pub(super) fn type_of(scope: &ScopeRef, mut args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return errors::wrong_arg_count("type", 1, args.len());
    }
    let mut items = match args.remove(0) {
        Value::QExpr(items) => items,
        other => return errors::wrong_arg_type("type", 0, "Q-Expression", other.type_name()),
    };
    if items.len() != 1 {
        return errors::wrong_arg_count("type", 1, items.len());
    }
    match items.remove(0) {
        Value::Sym(name) => match scope.get(&name) {
            Some(value) => Value::Str(value.type_name().to_string()),
            None => errors::unknown_type_of("type", &name),
        },
        literal => Value::Str(literal.type_name().to_string()),
    }
}

/// `load`: evaluate a script file in the global scope.
pub(super) fn load(interp: &Interpreter, mut args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return errors::wrong_arg_count("load", 1, args.len());
    }
    match args.remove(0) {
        Value::Str(path) => interp.run_file(&path),
        other => errors::wrong_arg_type("load", 0, "String", other.type_name()),
    }
}
