//! Centralized constructors for script-visible error values.
//!
//! Script failures are data, not exceptions: every constructor here
//! returns a `Value::Err`, and evaluation propagates it upward
//! unchanged. Keeping the constructors in one module keeps the message
//! catalog in one place.

use quill_ffi::FfiError;
use quill_parse::ParseError;

use crate::value::Value;

pub fn unbound_symbol(name: &str) -> Value {
    Value::err(format!("Unbound symbol `{name}`"))
}

pub fn not_a_function(got: &str) -> Value {
    Value::err(format!(
        "S-Expression must start with [Function] type. Got [{got}]!"
    ))
}

pub fn wrong_arg_count(fn_name: &str, expected: usize, given: usize) -> Value {
    Value::err(format!(
        "Function `{fn_name}` expects [{expected}] arguments, got [{given}]"
    ))
}

pub fn at_least_args(fn_name: &str, expected: usize, given: usize) -> Value {
    Value::err(format!(
        "Function `{fn_name}` expects at least {expected} arguments, got [{given}]"
    ))
}

pub fn wrong_arg_type(fn_name: &str, index: usize, expected: &str, got: &str) -> Value {
    Value::err(format!(
        "Function `{fn_name}` expects arg of type {expected}. Arg [{}] is of type {got}.",
        index + 1
    ))
}

pub fn non_number_operand(op: &str, index: usize, got: &str) -> Value {
    Value::err(format!(
        "Operator `{op}` cannot operate on non-numbers; Arg [{}] is of type [{got}]",
        index + 1
    ))
}

pub fn expects_number(name: &str, index: usize, got: &str) -> Value {
    Value::err(format!(
        "`{name}` expects arguments of type Number, but arg [{}] is of type [{got}]",
        index + 1
    ))
}

pub fn division_by_zero() -> Value {
    Value::err("Division By Zero!")
}

pub fn zero_right_operand(op: &str) -> Value {
    Value::err(format!("Right-hand operand of '{op}' cannot be 0!"))
}

pub fn not_iterable(fn_name: &str, index: usize, got: &str) -> Value {
    Value::err(format!(
        "Function `{fn_name}` expects arguments of type [Q-Expression, String], \
         but arg [{}] is of type [{got}]",
        index + 1
    ))
}

pub fn empty_iterable(fn_name: &str) -> Value {
    Value::err(format!(
        "Function `{fn_name}` expects a non-empty [Q-Expression, String]!"
    ))
}

pub fn mixed_join_types(fn_name: &str, index: usize, got: &str, first: &str) -> Value {
    Value::err(format!(
        "Function `{fn_name}` expects all arguments to be of the same type, arg [{}] \
         is of type [{got}] which is different than 1st element's type [{first}]",
        index + 1
    ))
}

pub fn non_symbol_binding(fn_name: &str, index: usize, got: &str) -> Value {
    Value::err(format!(
        "Function `{fn_name}` cannot define a non-symbol; arg number [{}] is of type [{got}]",
        index + 1
    ))
}

pub fn binding_count_mismatch(fn_name: &str, symbols: usize, values: usize) -> Value {
    Value::err(format!(
        "Function `{fn_name}` expects #symbols == #values; \
         we got [{symbols}] symbols, and [{values}] values"
    ))
}

pub fn reserved_name(fn_name: &str, name: &str) -> Value {
    Value::err(format!(
        "Function `{fn_name}` cannot define '{name}'; builtin keyword!"
    ))
}

pub fn bad_variadic_format() -> Value {
    Value::err("Invalid format; symbol `&` must be followed by a single symbol")
}

pub fn lambda_arity(expected: usize, given: usize) -> Value {
    Value::err(format!(
        "Function `user-defined` expects [{expected}] args, got [{given}]."
    ))
}

pub fn number_out_of_range(kind: &str, text: &str) -> Value {
    Value::err(format!("Number is out of range for {kind} `{text}`"))
}

pub fn wrong_extension(fn_name: &str, expected: &str, got: &str) -> Value {
    Value::err(format!(
        "Function `{fn_name}` expects a file with the extension [{expected}], got [{got}]"
    ))
}

pub fn unreadable_file(fn_name: &str, path: &str, cause: &std::io::Error) -> Value {
    Value::err(format!(
        "Function `{fn_name}` could not read [{path}]: {cause}"
    ))
}

pub fn unreadable_input(fn_name: &str) -> Value {
    Value::err(format!("Function `{fn_name}` couldn't read input string"))
}

pub fn unknown_type_of(fn_name: &str, name: &str) -> Value {
    Value::err(format!("Function `{fn_name}` cannot find arg [{name}]"))
}

pub fn invalid_cast(from: &str, to: &str) -> Value {
    Value::err(format!("Cannot cast a value of type [{from}] to [{to}]"))
}

pub fn not_a_primitive_type(fn_name: &str, index: usize, got: &str) -> Value {
    Value::err(format!(
        "Function `{fn_name}` expects arg [{}] to name a C type, got [{got}]",
        index + 1
    ))
}

pub fn extern_arg_mismatch(symbol: &str, index: usize, got: &str, expected: &str) -> Value {
    Value::err(format!(
        "Extern func `{symbol}` got input arg [{}] of type [{got}], expected [{expected}]",
        index + 1
    ))
}

pub fn extern_arity(symbol: &str, expected: usize, given: usize) -> Value {
    Value::err(format!(
        "Extern function `{symbol}` expects [{expected}] args, got [{given}]."
    ))
}

pub fn single_return_only(symbol: &str, given: usize) -> Value {
    Value::err(format!(
        "Extern def of func `{symbol}` got [{given}] output args, only 1 is supported"
    ))
}

pub fn parse_failure(err: &ParseError) -> Value {
    Value::err(format!("Parse error: {err}"))
}

pub fn foreign_failure(err: &FfiError) -> Value {
    Value::err(err.to_string())
}
