//! The interpreter session: root scope, reserved names, console.

mod builtins;
mod eval;

use std::fs;

use rustc_hash::FxHashSet;
use tracing::debug;

use quill_ffi::CType;
use quill_parse::parse;

use crate::console::Console;
use crate::errors;
use crate::reader;
use crate::scope::ScopeRef;
use crate::value::{Builtin, Value};

/// Suffix required of script files passed to `load`.
pub const SCRIPT_EXTENSION: &str = ".quill";

/// One evaluation session: the root scope with all builtins and
/// constants, the reserved-name set frozen at construction, and the
/// console `print`/`read` go through.
///
/// All interior mutation (scope bindings, console buffers) happens
/// through shared handles, so evaluation only needs `&self`.
pub struct Interpreter {
    globals: ScopeRef,
    reserved: FxHashSet<String>,
    console: Console,
}

impl Interpreter {
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::default()
    }

    pub fn globals(&self) -> &ScopeRef {
        &self.globals
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Whether a name is permanently reserved against redefinition.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// Evaluate one line the way the REPL does: all expressions on the
    /// line form a single s-expression.
    pub fn eval_line(&self, source: &str) -> Value {
        match parse(source) {
            Ok(root) => {
                let value = reader::read_line(&root);
                self.eval(&self.globals.clone(), value)
            }
            Err(err) => errors::parse_failure(&err),
        }
    }

    /// Run a whole script: each top-level expression evaluates
    /// separately, error values are printed as they occur, and the
    /// result is `Unit`. A parse failure is returned as an error value.
    pub fn run_script(&self, source: &str) -> Value {
        let root = match parse(source) {
            Ok(root) => root,
            Err(err) => return errors::parse_failure(&err),
        };
        for expr in reader::read_program(&root) {
            let value = self.eval(&self.globals.clone(), expr);
            if value.is_err() {
                self.console.println(&value.to_string());
            }
        }
        Value::Unit
    }

    /// Load and run a script file; the engine behind `load`.
    pub fn run_file(&self, path: &str) -> Value {
        if !path.ends_with(SCRIPT_EXTENSION) {
            return errors::wrong_extension("load", SCRIPT_EXTENSION, path);
        }
        debug!(path, "loading script");
        match fs::read_to_string(path) {
            Ok(source) => self.run_script(&source),
            Err(err) => errors::unreadable_file("load", path, &err),
        }
    }
}

/// Configures and constructs an [`Interpreter`].
///
/// The prelude (if any) runs before the reserved-name set freezes, so
/// its definitions become reserved exactly like native builtins.
#[derive(Default)]
pub struct InterpreterBuilder {
    console: Console,
    prelude: Option<String>,
}

impl InterpreterBuilder {
    pub fn console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub fn prelude(mut self, source: impl Into<String>) -> Self {
        self.prelude = Some(source.into());
        self
    }

    /// Build the session. Fails only if the prelude does not parse.
    pub fn build(self) -> Result<Interpreter, String> {
        let mut interp = Interpreter {
            globals: ScopeRef::detached(),
            reserved: FxHashSet::default(),
            console: self.console,
        };
        install_builtins(&interp.globals);

        if let Some(source) = &self.prelude {
            if let Value::Err(msg) = interp.run_script(source) {
                return Err(msg);
            }
        }

        interp.reserved = interp.globals.local_names().into_iter().collect();
        debug!(reserved = interp.reserved.len(), "session ready");
        Ok(interp)
    }
}

fn install_builtins(globals: &ScopeRef) {
    for op in Builtin::all() {
        globals.put(op.name(), Value::Builtin(*op));
    }

    // atoms
    globals.put("ok", Value::Unit);
    globals.put("nil", Value::QExpr(Vec::new()));
    globals.put("true", Value::Bool(true));
    globals.put("false", Value::Bool(false));
    globals.put("exit", Value::Exit);

    // foreign type constants
    globals.put("Void", Value::CType(CType::Void));
    globals.put("Char", Value::CType(CType::Char));
    globals.put("Int", Value::CType(CType::Int));
    globals.put("Long", Value::CType(CType::Long));
    globals.put("Float", Value::CType(CType::Float));
    globals.put("Double", Value::CType(CType::Double));
    globals.put("String", Value::CType(CType::String));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Interpreter {
        match Interpreter::builder().console(Console::buffer()).build() {
            Ok(interp) => interp,
            Err(msg) => panic!("session build failed: {msg}"),
        }
    }

    #[test]
    fn atoms_are_bound() {
        let interp = session();
        assert_eq!(interp.eval_line("true"), Value::Bool(true));
        assert_eq!(interp.eval_line("nil"), Value::QExpr(Vec::new()));
        assert_eq!(interp.eval_line("ok"), Value::Unit);
        assert_eq!(interp.eval_line("exit"), Value::Exit);
    }

    #[test]
    fn builtin_names_are_reserved() {
        let interp = session();
        assert!(interp.is_reserved("head"));
        assert!(interp.is_reserved("+"));
        assert!(interp.is_reserved("Int"));
        assert!(!interp.is_reserved("x"));
    }

    #[test]
    fn prelude_definitions_are_reserved_too() {
        let interp = match Interpreter::builder()
            .console(Console::buffer())
            .prelude("(def {identity} (\\ {x} {x}))")
            .build()
        {
            Ok(interp) => interp,
            Err(msg) => panic!("session build failed: {msg}"),
        };
        assert!(interp.is_reserved("identity"));
        assert_eq!(interp.eval_line("identity 42"), Value::Int(42));
        assert!(interp.eval_line("def {identity} 1").is_err());
    }

    #[test]
    fn unparsable_prelude_fails_the_build() {
        let built = Interpreter::builder().prelude("(+ 1").build();
        assert!(built.is_err());
    }

    #[test]
    fn script_errors_are_printed_not_fatal() {
        let interp = session();
        let result = interp.run_script("(/ 1 0)\n(def {x} 5)");
        assert_eq!(result, Value::Unit);
        assert!(interp.console().output().contains("Division By Zero!"));
        assert_eq!(interp.eval_line("x"), Value::Int(5));
    }

    #[test]
    fn load_rejects_wrong_extension() {
        let interp = session();
        let result = interp.run_file("script.lisp");
        assert!(result.is_err());
    }
}
