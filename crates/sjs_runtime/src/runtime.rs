//! The runtime context shared by every call site.

use std::rc::Rc;

use sjs_core::{Arity, RtResult, RuntimeError, ScopeId, Value};
use tracing::debug;

use crate::builtins_registry::{BuiltinProvider, BuiltinRegistry, StdBuiltinProvider};
use crate::cache_manager::{CacheManager, SiteId, SiteSpec};
use crate::config::RuntimeConfig;
use crate::env::{GlobalScope, Scopes};
use crate::heap::Heap;
use crate::ic::Operands;
use crate::object::{Invocation, Invoker, NativeFn};

pub struct Runtime {
    pub heap: Heap,
    pub globals: GlobalScope,
    pub scopes: Scopes,
    pub caches: CacheManager,
    pub config: RuntimeConfig,
    /// Text written by `print`.
    pub output: String,
}

impl Runtime {
    /// A runtime with the standard builtins installed.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let mut rt = Self::bare(config);
        rt.install_builtins(&StdBuiltinProvider);
        rt
    }

    /// A runtime with an empty global scope.
    pub fn bare(config: RuntimeConfig) -> Self {
        Self {
            heap: Heap::new(),
            globals: GlobalScope::new(),
            scopes: Scopes::new(),
            caches: CacheManager::new(),
            config,
            output: String::new(),
        }
    }

    pub fn install_builtins(&mut self, provider: &dyn BuiltinProvider) {
        let mut registry = BuiltinRegistry::new();
        provider.install(&mut registry);
        registry.install_into(self);
    }

    // ---- globals ----

    /// Defines or redefines a global. Advances the global version either way.
    pub fn register_global(&mut self, name: &str, value: Value) {
        let previous = self.globals.register(name, value);
        debug!(
            target: "sjs::globals",
            name,
            version = self.globals.version(),
            redefined = previous.is_some(),
            "register"
        );
    }

    pub fn lookup_global(&self, name: &str) -> Option<Value> {
        self.globals.lookup(name)
    }

    // ---- objects ----

    pub fn intern(&mut self, s: &str) -> Value {
        self.heap.intern(s)
    }

    pub fn create_object(&mut self, props: &[(&str, Value)]) -> Value {
        Value::object(self.heap.create_object(props))
    }

    pub fn set_property(&mut self, target: Value, name: &str, value: Value) -> RtResult<()> {
        self.heap.set_property(target, name, value)
    }

    pub fn get_property(&self, target: Value, name: &str) -> RtResult<Value> {
        self.heap.get_property(target, name)
    }

    pub fn new_function<F>(&mut self, name: &str, arity: Arity, code: F) -> Value
    where
        F: Fn(&mut Runtime, &Invocation<'_>) -> RtResult<Value> + 'static,
    {
        self.alloc_function(name, arity, None, Rc::new(code))
    }

    /// A function that captures `scope`.
    pub fn new_closure<F>(&mut self, name: &str, arity: Arity, scope: ScopeId, code: F) -> Value
    where
        F: Fn(&mut Runtime, &Invocation<'_>) -> RtResult<Value> + 'static,
    {
        self.alloc_function(name, arity, Some(scope), Rc::new(code))
    }

    fn alloc_function(
        &mut self,
        name: &str,
        arity: Arity,
        scope: Option<ScopeId>,
        code: NativeFn,
    ) -> Value {
        let invoker = Invoker {
            name: Rc::from(name),
            arity,
            code,
        };
        Value::object(self.heap.alloc_function(invoker, scope))
    }

    // ---- lexical scopes ----

    pub fn new_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.scopes.push(parent)
    }

    pub fn define_local(&mut self, scope: ScopeId, name: &str, value: Value) {
        self.scopes.define(scope, name, value);
    }

    /// Lexical lookup falling back to the global scope.
    pub fn lookup(&self, scope: Option<ScopeId>, name: &str) -> RtResult<Value> {
        self.scopes
            .lookup(scope, name)
            .or_else(|| self.globals.lookup(name))
            .ok_or_else(|| RuntimeError::unbound(name))
    }

    /// Assignment to an existing binding, lexical first, then global.
    pub fn assign(&mut self, scope: Option<ScopeId>, name: &str, value: Value) -> RtResult<()> {
        if self.scopes.assign(scope, name, value) {
            return Ok(());
        }
        if !self.globals.contains(name) {
            return Err(RuntimeError::unbound(name));
        }
        self.register_global(name, value);
        Ok(())
    }

    // ---- dispatch ----

    /// Runs one execution of `site`, creating its cache from `spec` on first use.
    pub fn dispatch(&mut self, site: SiteId, spec: &SiteSpec, ops: Operands<'_>) -> RtResult<Value> {
        let cache = self.caches.site(site, spec, &self.config);
        cache.dispatch(self, ops)
    }

    // ---- values ----

    /// `==` semantics: identity for objects, content for strings.
    pub fn values_equal(&self, a: Value, b: Value) -> bool {
        if a == b {
            return true;
        }
        if a.is_f64() && b.is_f64() {
            return a.as_f64() == b.as_f64();
        }
        match (self.heap.str_of(a), self.heap.str_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn display(&self, v: Value) -> String {
        let mut out = String::new();
        self.write_display(v, &mut out);
        out
    }

    pub fn write_display(&self, v: Value, out: &mut String) {
        if v.is_int() {
            let mut buf = itoa::Buffer::new();
            out.push_str(buf.format(v.as_i64()));
        } else if v.is_f64() {
            let mut buf = ryu::Buffer::new();
            out.push_str(buf.format(v.as_f64()));
        } else if v.is_bool() {
            out.push_str(if v.as_bool() { "true" } else { "false" });
        } else if v.is_undefined() {
            out.push_str("undefined");
        } else if let Some(s) = self.heap.str_of(v) {
            out.push_str(s);
        } else if let Some((_, _, inv)) = self.heap.invoker_of(v) {
            out.push_str("function ");
            out.push_str(&inv.name);
        } else {
            out.push_str("[object]");
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
