//! The fixed primitive operation set.

mod arithmetic;
mod binding;
mod compare;
pub(crate) mod foreign;
mod io;
mod lists;

use crate::interpreter::Interpreter;
use crate::scope::ScopeRef;
use crate::value::{Builtin, Value};

impl Interpreter {
    pub(crate) fn dispatch(&self, scope: &ScopeRef, op: Builtin, args: Vec<Value>) -> Value {
        match op {
            Builtin::Add
            | Builtin::Sub
            | Builtin::Mul
            | Builtin::Div
            | Builtin::Mod
            | Builtin::Pow => arithmetic::fold_op(op, args),
            Builtin::Min | Builtin::Max => arithmetic::extremum(op, args),
            Builtin::Eq | Builtin::Ne => compare::equality(op, args),
            Builtin::Gt
            | Builtin::Lt
            | Builtin::Ge
            | Builtin::Le
            | Builtin::And
            | Builtin::Or => compare::ordering(op, args),
            Builtin::Not => compare::negate(args),
            Builtin::List => Value::QExpr(args),
            Builtin::Head => lists::head(args),
            Builtin::Tail => lists::tail(args),
            Builtin::Join => lists::join(args),
            Builtin::Eval => lists::eval_qexpr(self, scope, args),
            Builtin::Def => binding::define(self, scope, args, binding::Target::Global),
            Builtin::Put => binding::define(self, scope, args, binding::Target::Local),
            Builtin::Lambda => binding::lambda(args),
            Builtin::Fn => binding::named_fn(self, scope, args),
            Builtin::If => binding::branch(self, scope, args),
            Builtin::Print => io::print(self, args),
            Builtin::Read => io::read(self, scope, args),
            Builtin::Error => io::error(args),
            Builtin::TypeOf => io::type_of(scope, args),
            Builtin::Load => io::load(self, args),
            Builtin::Dll => foreign::dll(self, scope, args),
            Builtin::Extern => foreign::declare_extern(self, scope, args),
            Builtin::MkType => foreign::mktype(self, scope, args),
            Builtin::Cast => foreign::cast(args),
        }
    }
}
