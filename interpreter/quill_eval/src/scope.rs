//! Symbol scopes with parent chaining.
//!
//! Every binding read copies the value out and every write copies the
//! value in, so no two scopes ever alias a value's storage.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::value::Value;

/// A single scope: name bindings plus an optional parent for lookup
/// chaining. The root scope of a session is the one with no parent.
#[derive(Default)]
pub struct Scope {
    bindings: FxHashMap<String, Value>,
    parent: Option<ScopeRef>,
}

/// Single-threaded shared handle to a [`Scope`].
///
/// Wraps `Rc<RefCell<Scope>>` so all scope allocation goes through the
/// factory constructors; the interpreter is single-threaded and never
/// needs `Arc`.
#[repr(transparent)]
pub struct ScopeRef(Rc<RefCell<Scope>>);

impl ScopeRef {
    /// A fresh parentless scope: the session root, or a lambda's own
    /// environment before its call-time parent is assigned.
    pub fn detached() -> Self {
        ScopeRef(Rc::new(RefCell::new(Scope::default())))
    }

    /// Look a name up through the parent chain, copying the value out.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let next = {
                let scope = current.0.borrow();
                if let Some(value) = scope.bindings.get(name) {
                    return Some(value.clone());
                }
                scope.parent.clone()
            };
            current = next?;
        }
    }

    /// Bind locally: rebinds in place if the name exists here, else
    /// inserts. Never touches the parent chain.
    pub fn put(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Bind at the chain root; how top-level definitions become visible
    /// everywhere.
    pub fn define_global(&self, name: impl Into<String>, value: Value) {
        let mut current = self.clone();
        loop {
            let parent = current.0.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => break,
            }
        }
        current.put(name, value);
    }

    pub fn set_parent(&self, parent: Option<ScopeRef>) {
        self.0.borrow_mut().parent = parent;
    }

    /// Independent copy of this scope's bindings; the parent link is
    /// shared, not copied.
    pub fn duplicate(&self) -> ScopeRef {
        let scope = self.0.borrow();
        ScopeRef(Rc::new(RefCell::new(Scope {
            bindings: scope.bindings.clone(),
            parent: scope.parent.clone(),
        })))
    }

    /// Names bound directly in this scope, used to freeze the reserved
    /// set at session start.
    pub fn local_names(&self) -> Vec<String> {
        self.0.borrow().bindings.keys().cloned().collect()
    }
}

impl Clone for ScopeRef {
    fn clone(&self) -> Self {
        ScopeRef(Rc::clone(&self.0))
    }
}

impl fmt::Debug for ScopeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        f.debug_struct("ScopeRef")
            .field("bindings", &scope.bindings.len())
            .field("has_parent", &scope.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn get_walks_the_parent_chain() {
        let root = ScopeRef::detached();
        root.put("x", Value::Int(1));
        let child = ScopeRef::detached();
        child.set_parent(Some(root.clone()));
        assert_eq!(child.get("x"), Some(Value::Int(1)));
        assert_eq!(child.get("y"), None);
    }

    #[test]
    fn put_shadows_locally_without_touching_parent() {
        let root = ScopeRef::detached();
        root.put("x", Value::Int(1));
        let child = ScopeRef::detached();
        child.set_parent(Some(root.clone()));
        child.put("x", Value::Int(2));
        assert_eq!(child.get("x"), Some(Value::Int(2)));
        assert_eq!(root.get("x"), Some(Value::Int(1)));
    }

    #[test]
    fn define_global_binds_at_the_root() {
        let root = ScopeRef::detached();
        let child = ScopeRef::detached();
        child.set_parent(Some(root.clone()));
        child.define_global("x", Value::Int(7));
        assert_eq!(root.get("x"), Some(Value::Int(7)));
    }

    #[test]
    fn duplicate_copies_bindings_and_shares_parent() {
        let root = ScopeRef::detached();
        root.put("g", Value::Int(9));
        let original = ScopeRef::detached();
        original.set_parent(Some(root));
        original.put("x", Value::Int(1));

        let copy = original.duplicate();
        copy.put("x", Value::Int(2));
        assert_eq!(original.get("x"), Some(Value::Int(1)));
        assert_eq!(copy.get("x"), Some(Value::Int(2)));
        assert_eq!(copy.get("g"), Some(Value::Int(9)));
    }
}
