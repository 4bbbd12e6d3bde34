//! Expression reduction and the function-application protocol.

use std::collections::VecDeque;

use tracing::trace;

use crate::errors;
use crate::interpreter::builtins::foreign;
use crate::interpreter::Interpreter;
use crate::scope::ScopeRef;
use crate::value::{Formal, LambdaValue, Value};

impl Interpreter {
    /// Reduce one value: symbols resolve through the scope chain,
    /// s-expressions reduce recursively, everything else is already a
    /// value.
    pub fn eval(&self, scope: &ScopeRef, value: Value) -> Value {
        match value {
            Value::Sym(name) => match scope.get(&name) {
                Some(bound) => bound,
                None => errors::unbound_symbol(&name),
            },
            Value::SExpr(items) => self.eval_sexpr(scope, items),
            other => other,
        }
    }

    /// Children evaluate left to right; the first error wins and later
    /// children never run. An empty s-expression is itself, a singleton
    /// is its element, anything longer is a function call.
    fn eval_sexpr(&self, scope: &ScopeRef, items: Vec<Value>) -> Value {
        let mut evaluated = Vec::with_capacity(items.len());
        for item in items {
            let value = self.eval(scope, item);
            if value.is_err() {
                return value;
            }
            evaluated.push(value);
        }

        if evaluated.len() <= 1 {
            return match evaluated.pop() {
                Some(single) => single,
                None => Value::SExpr(evaluated),
            };
        }

        let head = evaluated.remove(0);
        let args = evaluated;
        match head {
            Value::Builtin(op) => {
                trace!(op = op.name(), argc = args.len(), "builtin call");
                self.dispatch(scope, op, args)
            }
            Value::Lambda(lambda) => self.apply_lambda(scope, *lambda, args),
            Value::Extern(f) => {
                trace!(symbol = f.symbol(), argc = args.len(), "extern call");
                foreign::call_extern(&f, args)
            }
            other => errors::not_a_function(other.type_name()),
        }
    }

    /// Curried application: formals bind one at a time. Leftover
    /// arguments past the formals are an arity error; leftover formals
    /// make the partially-bound lambda the result. Once every formal is
    /// bound, the lambda's environment is linked onto the *calling*
    /// scope and the body runs there.
    pub(crate) fn apply_lambda(
        &self,
        scope: &ScopeRef,
        mut lambda: LambdaValue,
        args: Vec<Value>,
    ) -> Value {
        let given = args.len();
        let expected = lambda.formals.len();
        let mut args = VecDeque::from(args);

        while let Some(arg) = args.pop_front() {
            if lambda.formals.is_empty() {
                return errors::lambda_arity(expected, given);
            }
            match lambda.formals.remove(0) {
                Formal::Variadic(name) => {
                    let mut rest = vec![arg];
                    rest.extend(args.drain(..));
                    lambda.env.put(name, Value::QExpr(rest));
                    break;
                }
                Formal::Named(name) => lambda.env.put(name, arg),
            }
        }

        // Arguments ran out with the variadic still pending: it binds
        // the empty list.
        if let Some(Formal::Variadic(_)) = lambda.formals.first() {
            if let Formal::Variadic(name) = lambda.formals.remove(0) {
                lambda.env.put(name, Value::QExpr(Vec::new()));
            }
        }

        if lambda.formals.is_empty() {
            let env = lambda.env.clone();
            env.set_parent(Some(scope.clone()));
            self.eval(&env, Value::SExpr(lambda.body))
        } else {
            Value::Lambda(Box::new(lambda))
        }
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
    fn empty_sexpr_is_itself() {
        let interp = session();
        assert_eq!(interp.eval_line("()"), Value::SExpr(Vec::new()));
    }

    #[test]
    fn singleton_sexpr_is_its_element() {
        let interp = session();
        assert_eq!(interp.eval_line("(5)"), Value::Int(5));
    }

    #[test]
    fn qexpr_never_self_reduces() {
        let interp = session();
        assert_eq!(
            interp.eval_line("{+ 1 2}"),
            Value::QExpr(vec![Value::Sym("+".into()), Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn head_must_be_a_function() {
        let interp = session();
        let result = interp.eval_line("(1 2 3)");
        assert_eq!(
            result,
            Value::err("S-Expression must start with [Function] type. Got [Int]!")
        );
    }

    #[test]
    fn first_error_wins_and_later_children_never_run() {
        let interp = session();
        // the second child would rebind x if it ran
        interp.eval_line("def {x} 1");
        let result = interp.eval_line("(+ (/ 1 0) (= {x} 2))");
        assert_eq!(result, Value::err("Division By Zero!"));
        assert_eq!(interp.eval_line("x"), Value::Int(1));
    }

    #[test]
    fn currying_binds_one_argument_at_a_time() {
        let interp = session();
        interp.eval_line("def {add} (\\ {a b} {+ a b})");
        let partial = interp.eval_line("(add 30)");
        assert!(matches!(partial, Value::Lambda(_)));
        assert_eq!(interp.eval_line("((add 30) 39)"), Value::Int(69));
        assert_eq!(interp.eval_line("add 30 39"), Value::Int(69));
    }

    #[test]
    fn variadic_collects_the_rest() {
        let interp = session();
        interp.eval_line("def {f} (\\ {a & rest} {rest})");
        assert_eq!(
            interp.eval_line("f 1 2 3"),
            Value::QExpr(vec![Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn variadic_with_no_extras_binds_the_empty_list() {
        let interp = session();
        interp.eval_line("def {f} (\\ {a & rest} {rest})");
        assert_eq!(interp.eval_line("f 1"), Value::QExpr(Vec::new()));
    }

    #[test]
    fn too_many_arguments_is_an_arity_error() {
        let interp = session();
        interp.eval_line("def {one} (\\ {a} {a})");
        assert!(interp.eval_line("one 1 2").is_err());
    }

    #[test]
    fn free_variables_resolve_through_the_calling_scope() {
        let interp = session();
        // `y` is not bound where the lambda is written; it resolves at
        // call time through the caller's chain.
        interp.eval_line("def {f} (\\ {x} {+ x y})");
        interp.eval_line("def {y} 10");
        assert_eq!(interp.eval_line("f 1"), Value::Int(11));
    }

    #[test]
    fn partial_applications_are_independent() {
        let interp = session();
        interp.eval_line("def {add} (\\ {a b} {+ a b})");
        interp.eval_line("def {add1} (add 1)");
        interp.eval_line("def {add5} (add 5)");
        assert_eq!(interp.eval_line("add1 10"), Value::Int(11));
        assert_eq!(interp.eval_line("add5 10"), Value::Int(15));
        // reusable: binding did not leak into the stored closure
        assert_eq!(interp.eval_line("add1 20"), Value::Int(21));
    }
}
