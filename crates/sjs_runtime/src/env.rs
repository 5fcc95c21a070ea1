use std::rc::Rc;

use ahash::RandomState;
use indexmap::IndexMap;
use sjs_core::value::{FastHashMap, fast_hasher, fast_map_new};
use sjs_core::{ScopeId, Value};

/// The global scope.
///
/// `version` advances on every registration, new name or not. Global call
/// caches capture it when they install a target and treat any difference as
/// a miss, so one counter invalidates every cached global at once.
pub struct GlobalScope {
    bindings: IndexMap<Rc<str>, Value, RandomState>,
    version: u64,
}

impl GlobalScope {
    pub fn new() -> Self {
        Self {
            bindings: IndexMap::with_hasher(fast_hasher()),
            version: 0,
        }
    }

    /// Defines or redefines `name`. Returns the previous value, if any.
    pub fn register(&mut self, name: &str, value: Value) -> Option<Value> {
        self.version += 1;
        if let Some(slot) = self.bindings.get_mut(name) {
            return Some(std::mem::replace(slot, value));
        }
        self.bindings.insert(Rc::from(name), value);
        None
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).copied()
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(|k| &**k)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for GlobalScope {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub names: FastHashMap<Rc<str>, Value>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            names: fast_map_new(),
        }
    }
}

/// Arena of lexical scopes. The global scope is not part of it; lookups that
/// fall off the outermost scope continue in `GlobalScope`.
pub struct Scopes {
    scopes: Vec<Scope>,
}

impl Scopes {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn push(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(parent));
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    pub fn define(&mut self, id: ScopeId, name: &str, value: Value) {
        if let Some(scope) = self.scopes.get_mut(id.0) {
            if let Some(slot) = scope.names.get_mut(name) {
                *slot = value;
            } else {
                scope.names.insert(Rc::from(name), value);
            }
        }
    }

    pub fn lookup(&self, mut id: Option<ScopeId>, name: &str) -> Option<Value> {
        while let Some(sid) = id {
            let scope = self.scopes.get(sid.0)?;
            if let Some(&v) = scope.names.get(name) {
                return Some(v);
            }
            id = scope.parent;
        }
        None
    }

    /// Overwrites the innermost binding of `name`. False if no lexical scope
    /// on the chain binds it.
    pub fn assign(&mut self, mut id: Option<ScopeId>, name: &str, value: Value) -> bool {
        while let Some(sid) = id {
            let Some(scope) = self.scopes.get_mut(sid.0) else {
                return false;
            };
            if let Some(slot) = scope.names.get_mut(name) {
                *slot = value;
                return true;
            }
            id = scope.parent;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}
