//! End-to-end coverage of the bundled standard prelude.

use pretty_assertions::assert_eq;
use quill_eval::{Console, Interpreter, Value};

const PRELUDE: &str = include_str!("../prelude.quill");

fn session() -> Interpreter {
    match Interpreter::builder()
        .console(Console::buffer())
        .prelude(PRELUDE)
        .build()
    {
        Ok(interp) => interp,
        Err(msg) => panic!("prelude failed to load: {msg}"),
    }
}

fn ints(values: &[i64]) -> Value {
    Value::QExpr(values.iter().copied().map(Value::Int).collect())
}

#[test]
fn fun_defines_named_functions() {
    let interp = session();
    assert_eq!(interp.eval_line("fun {add-together x y} {+ x y}"), Value::Unit);
    assert_eq!(interp.eval_line("add-together 20 22"), Value::Int(42));
}

#[test]
fn unpack_and_pack_bridge_argument_shapes() {
    let interp = session();
    assert_eq!(interp.eval_line("unpack + {1 2 3}"), Value::Int(6));
    assert_eq!(interp.eval_line("pack head 5 6 7"), ints(&[5]));
    assert_eq!(interp.eval_line("curry + {1 2 3}"), Value::Int(6));
}

#[test]
fn flip_and_comp() {
    let interp = session();
    assert_eq!(interp.eval_line("(flip -) 10 100"), Value::Int(90));
    interp.eval_line("fun {inc x} {+ x 1}");
    interp.eval_line("fun {dbl x} {* x 2}");
    assert_eq!(interp.eval_line("comp inc dbl 5"), Value::Int(11));
}

#[test]
fn positional_accessors() {
    let interp = session();
    assert_eq!(interp.eval_line("fst {10 20 30}"), Value::Int(10));
    assert_eq!(interp.eval_line("snd {10 20 30}"), Value::Int(20));
    assert_eq!(interp.eval_line("trd {10 20 30}"), Value::Int(30));
}

#[test]
fn list_measurements() {
    let interp = session();
    assert_eq!(interp.eval_line("len {a b c d}"), Value::Int(4));
    assert_eq!(interp.eval_line("len {}"), Value::Int(0));
    assert_eq!(interp.eval_line("nth 2 {10 20 30}"), Value::Int(30));
    assert_eq!(interp.eval_line("last {10 20 30}"), Value::Int(30));
    assert_eq!(interp.eval_line("reverse {1 2 3}"), ints(&[3, 2, 1]));
}

#[test]
fn higher_order_list_operations() {
    let interp = session();
    interp.eval_line("fun {dbl x} {* x 2}");
    assert_eq!(interp.eval_line("map dbl {1 2 3}"), ints(&[2, 4, 6]));
    assert_eq!(
        interp.eval_line("filter (\\ {x} {> x 1}) {5 2 11 -7 8 1}"),
        ints(&[5, 2, 11, 8])
    );
    assert_eq!(interp.eval_line("foldl + 0 {1 2 3 4}"), Value::Int(10));
    assert_eq!(interp.eval_line("foldl * 1 {1 2 3 4}"), Value::Int(24));
}

#[test]
fn word_aliases_for_logic() {
    let interp = session();
    assert_eq!(interp.eval_line("and true false"), Value::Bool(false));
    assert_eq!(interp.eval_line("or true false"), Value::Bool(true));
    assert_eq!(interp.eval_line("not false"), Value::Bool(true));
}

#[test]
fn do_sequences_and_yields_the_last_value() {
    let interp = session();
    assert_eq!(
        interp.eval_line("do (print \"a\") (+ 1 1) (+ 2 2)"),
        Value::Int(4)
    );
}

#[test]
fn let_opens_a_throwaway_scope() {
    let interp = session();
    assert_eq!(
        interp.eval_line("let {do (= {x} 100) (+ x 1)}"),
        Value::Int(101)
    );
    // the binding does not leak out
    assert!(interp.eval_line("x").is_err());
}

#[test]
fn prelude_names_are_reserved() {
    let interp = session();
    assert!(interp.eval_line("def {map} 1").is_err());
    assert!(interp.eval_line("def {fun} 1").is_err());
    // and the originals still work
    interp.eval_line("fun {idty x} {x}");
    assert_eq!(interp.eval_line("map idty {1 2}"), ints(&[1, 2]));
}
