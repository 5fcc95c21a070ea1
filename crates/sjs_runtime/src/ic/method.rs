//! Method-call cache: a field cache for the method name feeding a
//! function-call cache for whatever it finds.

use sjs_core::{RtResult, RuntimeError, Value};

use super::{CacheStats, FieldCache, FunCallCache, IcState, InlineCache, Operands};
use crate::Runtime;

pub struct MethodCallCache {
    lookup: FieldCache,
    call: FunCallCache,
}

impl MethodCallCache {
    pub fn new(name: &str, argc: usize, call_depth: usize, field_depth: usize) -> Self {
        Self {
            lookup: FieldCache::with_depth(name, field_depth),
            call: FunCallCache::new(argc, call_depth),
        }
    }

    pub fn lookup_cache(&self) -> &FieldCache {
        &self.lookup
    }

    pub fn call_cache(&self) -> &FunCallCache {
        &self.call
    }

    pub fn call(&self, rt: &mut Runtime, receiver: Value, args: &[Value]) -> RtResult<Value> {
        let method = self.lookup.get(&rt.heap, receiver)?;
        if method.is_undefined() {
            return Err(RuntimeError::NoSuchMethod {
                name: self.lookup.name().to_string(),
            });
        }
        self.call.call(rt, method, receiver, args)
    }
}

impl InlineCache for MethodCallCache {
    fn kind(&self) -> &'static str {
        "method"
    }

    fn state(&self) -> IcState {
        self.call.state()
    }

    fn stats(&self) -> CacheStats {
        let mut stats = self.lookup.stats();
        stats += self.call.stats();
        stats
    }

    fn dispatch(&self, rt: &mut Runtime, ops: Operands<'_>) -> RtResult<Value> {
        self.call(rt, ops.receiver, ops.args)
    }
}
