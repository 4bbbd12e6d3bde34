//! The tagged value every evaluation step consumes and produces.
//!
//! `Value` is a closed set: adding a variant means updating display,
//! equality, and the type-name table here, plus the evaluator's
//! dispatch. The compiler's exhaustiveness checking enforces that.

use std::fmt;
use std::rc::Rc;

use quill_ffi::{CType, ExternFn, ForeignLibrary};

use crate::scope::ScopeRef;

pub const FLOAT_ZERO_EPS: f64 = 1e-6;

/// Identifier of a native operation. Dispatch lives in
/// `interpreter::builtins`; the id itself is plain data so function
/// values stay cheap to copy and compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Min,
    Max,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    And,
    Or,
    Not,
    List,
    Head,
    Tail,
    Join,
    Eval,
    Def,
    Put,
    Lambda,
    Fn,
    If,
    Print,
    Read,
    Error,
    TypeOf,
    Load,
    Dll,
    Extern,
    MkType,
    Cast,
}

impl Builtin {
    /// The surface symbol this operation is bound to.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::Mod => "%",
            Builtin::Pow => "^",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Eq => "==",
            Builtin::Ne => "!=",
            Builtin::Gt => ">",
            Builtin::Lt => "<",
            Builtin::Ge => ">=",
            Builtin::Le => "<=",
            Builtin::And => "&&",
            Builtin::Or => "||",
            Builtin::Not => "!",
            Builtin::List => "list",
            Builtin::Head => "head",
            Builtin::Tail => "tail",
            Builtin::Join => "join",
            Builtin::Eval => "eval",
            Builtin::Def => "def",
            Builtin::Put => "=",
            Builtin::Lambda => "\\",
            Builtin::Fn => "fn",
            Builtin::If => "if",
            Builtin::Print => "print",
            Builtin::Read => "read",
            Builtin::Error => "error",
            Builtin::TypeOf => "type",
            Builtin::Load => "load",
            Builtin::Dll => "dll",
            Builtin::Extern => "extern",
            Builtin::MkType => "mktype",
            Builtin::Cast => "cast",
        }
    }

    /// Every operation, in registration order.
    pub fn all() -> &'static [Builtin] {
        &[
            Builtin::List,
            Builtin::Head,
            Builtin::Tail,
            Builtin::Eval,
            Builtin::Join,
            Builtin::Min,
            Builtin::Max,
            Builtin::Add,
            Builtin::Sub,
            Builtin::Mul,
            Builtin::Div,
            Builtin::Mod,
            Builtin::Pow,
            Builtin::If,
            Builtin::Eq,
            Builtin::Ne,
            Builtin::Gt,
            Builtin::Lt,
            Builtin::Ge,
            Builtin::Le,
            Builtin::Not,
            Builtin::And,
            Builtin::Or,
            Builtin::Load,
            Builtin::Print,
            Builtin::Read,
            Builtin::Error,
            Builtin::TypeOf,
            Builtin::Def,
            Builtin::Put,
            Builtin::Lambda,
            Builtin::Fn,
            Builtin::Dll,
            Builtin::Extern,
            Builtin::MkType,
            Builtin::Cast,
        ]
    }
}

/// One formal parameter of a lambda. The `&` variadic sigil is parsed
/// into `Variadic` when the lambda is constructed, so the binding loop
/// never compares magic strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Formal {
    Named(String),
    Variadic(String),
}

impl Formal {
    pub fn name(&self) -> &str {
        match self {
            Formal::Named(n) | Formal::Variadic(n) => n,
        }
    }
}

/// A user-defined function: formals, body expressions, and its own
/// environment. The environment starts parentless; the parent link is
/// assigned to the calling scope at full application.
#[derive(Debug)]
pub struct LambdaValue {
    pub formals: Vec<Formal>,
    pub body: Vec<Value>,
    pub env: ScopeRef,
}

impl LambdaValue {
    pub fn new(formals: Vec<Formal>, body: Vec<Value>) -> Self {
        LambdaValue {
            formals,
            body,
            env: ScopeRef::detached(),
        }
    }
}

impl Clone for LambdaValue {
    /// Copying a function copies its bindings; only the parent link is
    /// shared. Two copies never observe each other's argument bindings.
    fn clone(&self) -> Self {
        LambdaValue {
            formals: self.formals.clone(),
            body: self.body.clone(),
            env: self.env.duplicate(),
        }
    }
}

/// The closed value vocabulary of the language.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Err(String),
    Sym(String),
    SExpr(Vec<Value>),
    QExpr(Vec<Value>),
    Builtin(Builtin),
    Lambda(Box<LambdaValue>),
    Extern(Rc<ExternFn>),
    CType(CType),
    Library(Rc<ForeignLibrary>),
    Unit,
    Exit,
}

impl Value {
    pub fn err(msg: impl Into<String>) -> Value {
        Value::Err(msg.into())
    }

    /// Surface type name, used in error messages and by `type`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Bool(_) => "Boolean",
            Value::Str(_) => "String",
            Value::Err(_) => "Error",
            Value::Sym(_) => "Symbol",
            Value::SExpr(_) => "S-Expression",
            Value::QExpr(_) => "Q-Expression",
            Value::Builtin(_) | Value::Lambda(_) | Value::Extern(_) => "Function",
            Value::CType(_) => "C-Type",
            Value::Library(_) => "Library",
            Value::Unit => "OK",
            Value::Exit => "Exit",
        }
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Value::Err(_))
    }

    /// Int, Float, and Boolean all count as numbers.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Bool(_))
    }

    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::QExpr(_) | Value::Str(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(
            self,
            Value::Builtin(_) | Value::Lambda(_) | Value::Extern(_)
        )
    }

    /// Integer view of a number: Boolean promotes to 0/1.
    /// `None` for Float and non-numbers.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Float view of any number.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            Value::Bool(b) => Some(i64::from(*b) as f64),
            _ => None,
        }
    }
}

/// Structural equality over the whole vocabulary. Functions compare by
/// operation id (builtins), by formals and body (lambdas), or by code
/// address (externs); library handles compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Err(a), Value::Err(b)) => a == b,
            (Value::Sym(a), Value::Sym(b)) => a == b,
            (Value::SExpr(a), Value::SExpr(b)) | (Value::QExpr(a), Value::QExpr(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => {
                a.formals == b.formals && a.body == b.body
            }
            (Value::Extern(a), Value::Extern(b)) => a.code_addr() == b.code_addr(),
            (Value::CType(a), Value::CType(b)) => a == b,
            (Value::Library(a), Value::Library(b)) => Rc::ptr_eq(a, b),
            (Value::Unit, Value::Unit) | (Value::Exit, Value::Exit) => true,
            _ => false,
        }
    }
}

fn fmt_seq(f: &mut fmt::Formatter<'_>, items: &[Value], open: char, close: char) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

fn fmt_formals(f: &mut fmt::Formatter<'_>, formals: &[Formal]) -> fmt::Result {
    write!(f, "{{")?;
    for (i, formal) in formals.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        match formal {
            Formal::Named(n) => write!(f, "{n}")?,
            Formal::Variadic(n) => write!(f, "& {n}")?,
        }
    }
    write!(f, "}}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:.6}"),
            Value::Bool(v) => write!(f, "{}", if *v { "true" } else { "false" }),
            Value::Str(s) => write!(f, "\"{}\"", quill_ast::escape(s)),
            Value::Err(msg) => write!(f, "[ERROR] {msg}"),
            Value::Sym(name) => write!(f, "{name}"),
            Value::SExpr(items) => fmt_seq(f, items, '(', ')'),
            Value::QExpr(items) => fmt_seq(f, items, '{', '}'),
            Value::Builtin(op) => write!(f, "<builtin '{}'>", op.name()),
            Value::Lambda(l) => {
                write!(f, "(\\ ")?;
                fmt_formals(f, &l.formals)?;
                write!(f, " ")?;
                fmt_seq(f, &l.body, '{', '}')?;
                write!(f, ")")
            }
            Value::Extern(e) => write!(f, "<extern '{}'>", e.symbol()),
            Value::CType(t) => write!(f, "{t}"),
            Value::Library(lib) => write!(f, "<library '{}'>", lib.path().display()),
            Value::Unit => Ok(()),
            Value::Exit => write!(f, "Exiting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_numbers() {
        assert_eq!(Value::Int(69).to_string(), "69");
        assert_eq!(Value::Float(69.0).to_string(), "69.000000");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn display_expressions() {
        let q = Value::QExpr(vec![Value::Int(1), Value::Sym("x".into())]);
        assert_eq!(q.to_string(), "{1 x}");
        let s = Value::SExpr(vec![Value::Sym("+".into()), Value::Int(1), Value::Int(2)]);
        assert_eq!(s.to_string(), "(+ 1 2)");
    }

    #[test]
    fn display_string_is_escaped() {
        assert_eq!(Value::Str("a\nb".into()).to_string(), "\"a\\nb\"");
    }

    #[test]
    fn display_lambda_reconstructs_variadic_sigil() {
        let l = LambdaValue::new(
            vec![Formal::Named("a".into()), Formal::Variadic("rest".into())],
            vec![Value::Sym("a".into())],
        );
        assert_eq!(Value::Lambda(Box::new(l)).to_string(), "(\\ {a & rest} {a})");
    }

    #[test]
    fn unit_displays_as_nothing() {
        assert_eq!(Value::Unit.to_string(), "");
    }

    #[test]
    fn equality_is_structural_and_kind_strict() {
        assert_eq!(Value::Int(1), Value::Int(1));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Bool(true), Value::Int(1));
        assert_eq!(
            Value::QExpr(vec![Value::Int(1)]),
            Value::QExpr(vec![Value::Int(1)])
        );
        assert_ne!(
            Value::QExpr(vec![Value::Int(1)]),
            Value::SExpr(vec![Value::Int(1)])
        );
    }

    #[test]
    fn lambda_copies_do_not_share_bindings() {
        let original = LambdaValue::new(vec![Formal::Named("x".into())], vec![Value::Int(1)]);
        original.env.put("x", Value::Int(1));
        let copy = original.clone();
        copy.env.put("x", Value::Int(2));
        assert_eq!(original.env.get("x"), Some(Value::Int(1)));
        assert_eq!(copy.env.get("x"), Some(Value::Int(2)));
    }
}
