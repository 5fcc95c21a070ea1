use std::rc::Rc;

use sjs_core::{Arity, RtResult, Value};

use crate::Runtime;
use crate::builtins;
use crate::object::{Invocation, Invoker, NativeFn};

pub type BuiltinFn = fn(&mut Runtime, &[Value]) -> RtResult<Value>;

pub struct BuiltinRegistry {
    entries: Vec<(String, Arity, BuiltinFn)>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, name: &str, arity: Arity, fun: BuiltinFn) {
        self.entries.push((name.to_string(), arity, fun));
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _, _)| n.clone()).collect()
    }

    /// Registers every entry as a global function object.
    pub fn install_into(self, rt: &mut Runtime) {
        for (name, arity, fun) in self.entries {
            let code: NativeFn = Rc::new(move |rt: &mut Runtime, inv: &Invocation<'_>| fun(rt, inv.args));
            let id = rt.heap.alloc_function(
                Invoker {
                    name: Rc::from(name.as_str()),
                    arity,
                    code,
                },
                None,
            );
            rt.register_global(&name, Value::object(id));
        }
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub trait BuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry);
}

pub struct StdBuiltinProvider;

impl BuiltinProvider for StdBuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry) {
        registry.register("print", Arity::Variadic, builtins::builtin_print);
        registry.register("+", Arity::Fixed(2), builtins::builtin_add);
        registry.register("-", Arity::Fixed(2), builtins::builtin_sub);
        registry.register("*", Arity::Fixed(2), builtins::builtin_mul);
        registry.register("/", Arity::Fixed(2), builtins::builtin_div);
        registry.register("%", Arity::Fixed(2), builtins::builtin_rem);
        registry.register("==", Arity::Fixed(2), builtins::builtin_eq);
        registry.register("!=", Arity::Fixed(2), builtins::builtin_ne);
        registry.register("<", Arity::Fixed(2), builtins::builtin_lt);
        registry.register("<=", Arity::Fixed(2), builtins::builtin_le);
        registry.register(">", Arity::Fixed(2), builtins::builtin_gt);
        registry.register(">=", Arity::Fixed(2), builtins::builtin_ge);
    }
}
