//! Foreign-function builtins: `dll`, `extern`, `mktype`, and `cast`.

use std::rc::Rc;

use quill_ffi::{pack_members, unpack_members, CType, CValue, ExternFn, ForeignLibrary, StructLayout};
use tracing::debug;

use crate::errors;
use crate::interpreter::Interpreter;
use crate::scope::ScopeRef;
use crate::value::Value;

/// Resolve a q-expression of type symbols into concrete C types
/// through the scope chain.
fn resolve_types(scope: &ScopeRef, fn_name: &str, items: Vec<Value>) -> Result<Vec<CType>, Value> {
    let mut types = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let resolved = match item {
            Value::CType(ty) => ty,
            Value::Sym(name) => match scope.get(&name) {
                Some(Value::CType(ty)) => ty,
                Some(other) => {
                    return Err(errors::wrong_arg_type(
                        fn_name,
                        i,
                        "C-Type",
                        other.type_name(),
                    ))
                }
                None => return Err(errors::unbound_symbol(&name)),
            },
            other => return Err(errors::wrong_arg_type(fn_name, i, "C-Type", other.type_name())),
        };
        types.push(resolved);
    }
    Ok(types)
}

/// `dll`: open a dynamic library and bind it to a global name.
pub(super) fn dll(interp: &Interpreter, scope: &ScopeRef, mut args: Vec<Value>) -> Value {
    if args.len() != 2 {
        return errors::wrong_arg_count("dll", 2, args.len());
    }
    let path = match args.pop() {
        Some(Value::Str(path)) => path,
        Some(other) => return errors::wrong_arg_type("dll", 1, "String", other.type_name()),
        None => unreachable!("length checked above"),
    };
    let name = match args.pop() {
        Some(Value::Str(name)) => name,
        Some(other) => return errors::wrong_arg_type("dll", 0, "String", other.type_name()),
        None => unreachable!("length checked above"),
    };
    if interp.is_reserved(&name) {
        return errors::reserved_name("dll", &name);
    }
    match ForeignLibrary::open(&path) {
        Ok(lib) => {
            debug!(name, path, "library opened");
            scope.define_global(name, Value::Library(Rc::new(lib)));
            Value::Unit
        }
        Err(err) => errors::foreign_failure(&err),
    }
}

/// `extern`: resolve a symbol in a library, prepare its call
/// descriptor once, and bind it globally under the symbol's name.
pub(super) fn declare_extern(interp: &Interpreter, scope: &ScopeRef, mut args: Vec<Value>) -> Value {
    if args.len() != 4 {
        return errors::wrong_arg_count("extern", 4, args.len());
    }
    let ret_items = match args.pop() {
        Some(Value::QExpr(items)) => items,
        Some(other) => return errors::wrong_arg_type("extern", 3, "Q-Expression", other.type_name()),
        None => unreachable!("length checked above"),
    };
    let param_items = match args.pop() {
        Some(Value::QExpr(items)) => items,
        Some(other) => return errors::wrong_arg_type("extern", 2, "Q-Expression", other.type_name()),
        None => unreachable!("length checked above"),
    };
    let symbol = match args.pop() {
        Some(Value::Str(symbol)) => symbol,
        Some(other) => return errors::wrong_arg_type("extern", 1, "String", other.type_name()),
        None => unreachable!("length checked above"),
    };
    let library = match args.pop() {
        Some(Value::Library(lib)) => lib,
        Some(other) => return errors::wrong_arg_type("extern", 0, "Library", other.type_name()),
        None => unreachable!("length checked above"),
    };

    if interp.is_reserved(&symbol) {
        return errors::reserved_name("extern", &symbol);
    }
    if ret_items.len() != 1 {
        return errors::single_return_only(&symbol, ret_items.len());
    }
    let params = match resolve_types(scope, "extern", param_items) {
        Ok(types) => types,
        Err(err) => return err,
    };
    let mut ret_types = match resolve_types(scope, "extern", ret_items) {
        Ok(types) => types,
        Err(err) => return err,
    };
    let ret = ret_types.remove(0);

    let code = match library.resolve(&symbol) {
        Ok(code) => code,
        Err(err) => return errors::foreign_failure(&err),
    };
    match ExternFn::prepare(symbol.clone(), code, params, ret) {
        Ok(f) => {
            scope.define_global(symbol, Value::Extern(Rc::new(f)));
            Value::Unit
        }
        Err(err) => errors::foreign_failure(&err),
    }
}

/// `mktype`: declare a named composite C type from primitive members.
pub(super) fn mktype(interp: &Interpreter, scope: &ScopeRef, mut args: Vec<Value>) -> Value {
    if args.len() != 2 {
        return errors::wrong_arg_count("mktype", 2, args.len());
    }
    let member_items = match args.pop() {
        Some(Value::QExpr(items)) => items,
        Some(other) => return errors::wrong_arg_type("mktype", 1, "Q-Expression", other.type_name()),
        None => unreachable!("length checked above"),
    };
    let name = match args.pop() {
        Some(Value::Str(name)) => name,
        Some(other) => return errors::wrong_arg_type("mktype", 0, "String", other.type_name()),
        None => unreachable!("length checked above"),
    };
    if interp.is_reserved(&name) {
        return errors::reserved_name("mktype", &name);
    }
    let members = match resolve_types(scope, "mktype", member_items) {
        Ok(types) => types,
        Err(err) => return err,
    };
    if let Some((i, bad)) = members
        .iter()
        .enumerate()
        .find(|(_, m)| !m.is_struct_member())
    {
        return errors::not_a_primitive_type("mktype", i, &bad.to_string());
    }
    match StructLayout::new(name.clone(), members) {
        Ok(layout) => {
            debug!(name, size = layout.size(), "struct type declared");
            scope.define_global(name, Value::CType(CType::Struct(layout)));
            Value::Unit
        }
        Err(err) => errors::foreign_failure(&err),
    }
}

/// `cast`: convert a value to the shape of a primitive C type.
pub(super) fn cast(mut args: Vec<Value>) -> Value {
    if args.len() != 2 {
        return errors::wrong_arg_count("cast", 2, args.len());
    }
    let subject = match args.pop() {
        Some(v) => v,
        None => unreachable!("length checked above"),
    };
    let target = match args.pop() {
        Some(Value::CType(ty)) => ty,
        Some(other) => return errors::wrong_arg_type("cast", 0, "C-Type", other.type_name()),
        None => unreachable!("length checked above"),
    };

    let from = subject.type_name();
    match target {
        CType::Char => match numeric(&subject) {
            Some(Numeric::Int(v)) => Value::Int(i64::from(v as i8)),
            Some(Numeric::Float(v)) => Value::Int(i64::from(v as i8)),
            None => errors::invalid_cast(from, "Char"),
        },
        CType::Int | CType::Long => match numeric(&subject) {
            Some(Numeric::Int(v)) => Value::Int(v),
            Some(Numeric::Float(v)) => Value::Int(v as i64),
            None => errors::invalid_cast(from, "Long"),
        },
        CType::Float => match numeric(&subject) {
            Some(Numeric::Int(v)) => Value::Float(v as f32 as f64),
            Some(Numeric::Float(v)) => Value::Float(v as f32 as f64),
            None => errors::invalid_cast(from, "Float"),
        },
        CType::Double => match numeric(&subject) {
            Some(Numeric::Int(v)) => Value::Float(v as f64),
            Some(Numeric::Float(v)) => Value::Float(v),
            None => errors::invalid_cast(from, "Double"),
        },
        CType::String => match subject {
            Value::Str(s) => Value::Str(s),
            _ => errors::invalid_cast(from, "String"),
        },
        CType::Void | CType::Struct(_) => errors::invalid_cast(from, &target.to_string()),
    }
}

enum Numeric {
    Int(i64),
    Float(f64),
}

fn numeric(value: &Value) -> Option<Numeric> {
    match value {
        Value::Int(v) => Some(Numeric::Int(*v)),
        Value::Bool(b) => Some(Numeric::Int(i64::from(*b))),
        Value::Float(v) => Some(Numeric::Float(*v)),
        _ => None,
    }
}

/// Marshal one script value against a declared parameter type.
fn marshal_arg(symbol: &str, index: usize, param: &CType, arg: &Value) -> Result<CValue, Value> {
    let mismatch = || errors::extern_arg_mismatch(symbol, index, arg.type_name(), &param.to_string());
    match param {
        CType::Char => match arg.as_int() {
            Some(v) => Ok(CValue::Char(v as i8)),
            None => Err(mismatch()),
        },
        CType::Int | CType::Long => match arg.as_int() {
            Some(v) => Ok(CValue::Int(v)),
            None => Err(mismatch()),
        },
        CType::Float => match arg {
            Value::Float(v) => Ok(CValue::Float(*v as f32)),
            _ => Err(mismatch()),
        },
        CType::Double => match arg {
            Value::Float(v) => Ok(CValue::Double(*v)),
            _ => Err(mismatch()),
        },
        CType::String => match arg {
            Value::Str(s) => CValue::string(s, symbol, index)
                .map_err(|err| errors::foreign_failure(&err)),
            _ => Err(mismatch()),
        },
        CType::Struct(layout) => match arg {
            Value::QExpr(items) => {
                if items.len() != layout.members().len() {
                    return Err(mismatch());
                }
                let mut members = Vec::with_capacity(items.len());
                for (item, member_ty) in items.iter().zip(layout.members()) {
                    members.push(marshal_arg(symbol, index, member_ty, item)?);
                }
                pack_members(layout, &members)
                    .map(CValue::Struct)
                    .map_err(|err| errors::foreign_failure(&err))
            }
            _ => Err(mismatch()),
        },
        CType::Void => Err(mismatch()),
    }
}

fn unmarshal(symbol: &str, ret: &CType, result: CValue) -> Value {
    match result {
        CValue::Void => Value::Unit,
        CValue::Char(v) => Value::Int(i64::from(v)),
        CValue::Int(v) => Value::Int(v),
        CValue::Float(v) => Value::Float(f64::from(v)),
        CValue::Double(v) => Value::Float(v),
        CValue::Str(s) => Value::Str(s.to_string_lossy().into_owned()),
        CValue::Struct(bytes) => {
            let CType::Struct(layout) = ret else {
                return errors::extern_arg_mismatch(symbol, 0, "Struct", &ret.to_string());
            };
            match unpack_members(layout, &bytes) {
                Ok(members) => Value::QExpr(
                    members
                        .into_iter()
                        .map(|m| unmarshal(symbol, ret, m))
                        .collect(),
                ),
                Err(err) => errors::foreign_failure(&err),
            }
        }
    }
}

/// Apply a prepared extern function to evaluated script arguments.
pub(crate) fn call_extern(f: &ExternFn, args: Vec<Value>) -> Value {
    if args.len() != f.params().len() {
        return errors::extern_arity(f.symbol(), f.params().len(), args.len());
    }
    let mut c_args = Vec::with_capacity(args.len());
    for (i, (param, arg)) in f.params().iter().zip(&args).enumerate() {
        match marshal_arg(f.symbol(), i, param, arg) {
            Ok(value) => c_args.push(value),
            Err(err) => return err,
        }
    }
    match f.call(&c_args) {
        Ok(result) => unmarshal(f.symbol(), f.ret(), result),
        Err(err) => errors::foreign_failure(&err),
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::c_void;
    use std::os::raw::c_long;
    use std::rc::Rc;

    use quill_ffi::{CType, CodePtr, ExternFn, StructLayout};
    use pretty_assertions::assert_eq;

    use crate::console::Console;
    use crate::interpreter::Interpreter;
    use crate::value::Value;

    fn session() -> Interpreter {
        match Interpreter::builder().console(Console::buffer()).build() {
            Ok(interp) => interp,
            Err(msg) => panic!("session build failed: {msg}"),
        }
    }

    fn code_of(addr: usize) -> CodePtr {
        CodePtr::from_ptr(addr as *const c_void)
    }

    extern "C" fn triple(v: c_long) -> c_long {
        v * 3
    }

    fn triple_fn() -> ExternFn {
        match ExternFn::prepare(
            "triple",
            code_of(triple as usize),
            vec![CType::Long],
            CType::Long,
        ) {
            Ok(f) => f,
            Err(err) => panic!("prepare failed: {err}"),
        }
    }

    #[test]
    fn bound_extern_is_callable_from_script() {
        let interp = session();
        interp
            .globals()
            .define_global("triple".to_string(), Value::Extern(Rc::new(triple_fn())));
        assert_eq!(interp.eval_line("triple 14"), Value::Int(42));
    }

    #[test]
    fn extern_args_are_checked_before_the_call() {
        let interp = session();
        interp
            .globals()
            .define_global("triple".to_string(), Value::Extern(Rc::new(triple_fn())));
        assert!(interp.eval_line("triple 1 2").is_err());
        assert!(interp.eval_line("triple \"one\"").is_err());
        // booleans promote like integers
        assert_eq!(interp.eval_line("triple true"), Value::Int(3));
    }

    #[repr(C)]
    struct Pair {
        count: c_long,
        weight: f64,
    }

    extern "C" fn scale_pair(p: Pair) -> Pair {
        Pair {
            count: p.count * 2,
            weight: p.weight * 2.0,
        }
    }

    #[test]
    fn struct_values_round_trip_through_a_script_call() {
        let layout = match StructLayout::new("Pair", vec![CType::Int, CType::Double]) {
            Ok(layout) => layout,
            Err(err) => panic!("layout failed: {err}"),
        };
        let f = match ExternFn::prepare(
            "scale_pair",
            code_of(scale_pair as usize),
            vec![CType::Struct(layout.clone())],
            CType::Struct(layout),
        ) {
            Ok(f) => f,
            Err(err) => panic!("prepare failed: {err}"),
        };
        let interp = session();
        interp
            .globals()
            .define_global("scale_pair".to_string(), Value::Extern(Rc::new(f)));

        assert_eq!(
            interp.eval_line("scale_pair {5 2.5}"),
            Value::QExpr(vec![Value::Int(10), Value::Float(5.0)])
        );
        // member shape is checked against the layout before the call
        assert!(interp.eval_line("scale_pair {5}").is_err());
        assert!(interp.eval_line("scale_pair {5 \"x\"}").is_err());
    }

    #[test]
    fn mktype_declares_a_struct_type() {
        let interp = session();
        assert_eq!(interp.eval_line("mktype \"Point\" {Long Long}"), Value::Unit);
        assert_eq!(
            interp.eval_line("type {Point}"),
            Value::Str("C-Type".to_string())
        );
        // composite members are rejected
        assert!(interp.eval_line("mktype \"Nested\" {Point Long}").is_err());
        assert!(interp.eval_line("mktype \"Empty\" {}").is_err());
    }

    #[test]
    fn mktype_cannot_shadow_a_reserved_name() {
        let interp = session();
        assert!(interp.eval_line("mktype \"head\" {Long}").is_err());
    }

    #[test]
    fn cast_between_primitive_shapes() {
        let interp = session();
        assert_eq!(interp.eval_line("cast Char 300"), Value::Int(44));
        assert_eq!(interp.eval_line("cast Long 2.9"), Value::Int(2));
        assert_eq!(interp.eval_line("cast Double 5"), Value::Float(5.0));
        assert_eq!(
            interp.eval_line("cast String \"s\""),
            Value::Str("s".to_string())
        );
        assert!(interp.eval_line("cast String 5").is_err());
        assert!(interp.eval_line("cast Void 5").is_err());
    }

    #[test]
    fn dll_on_a_missing_library_is_a_script_error() {
        let interp = session();
        let result = interp.eval_line("dll \"ghost\" \"/nonexistent/libghost.so\"");
        assert!(result.is_err());
        assert!(interp.eval_line("ghost").is_err());
    }
}
