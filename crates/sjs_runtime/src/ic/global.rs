//! Global-binding call cache, guarded by the global scope's version.

use std::cell::RefCell;
use std::rc::Rc;

use sjs_core::{RtResult, RuntimeError, Value};
use tracing::{debug, trace};

use super::{CacheStats, CallTarget, IcState, InlineCache, Operands, StatCounters};
use crate::Runtime;
use crate::generic;

struct GlobalEntry {
    version: u64,
    target: CallTarget,
}

pub struct GlobalCallCache {
    name: Rc<str>,
    argc: usize,
    entry: RefCell<Option<GlobalEntry>>,
    stats: StatCounters,
}

impl GlobalCallCache {
    pub fn new(name: &str, argc: usize) -> Self {
        Self {
            name: Rc::from(name),
            argc,
            entry: RefCell::new(None),
            stats: StatCounters::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Times the name was resolved against the global scope.
    pub fn resolutions(&self) -> u64 {
        self.stats.snapshot().slow_paths
    }

    /// Version the installed target was resolved under.
    pub fn cached_version(&self) -> Option<u64> {
        self.entry.borrow().as_ref().map(|e| e.version)
    }

    pub fn call(&self, rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
        if args.len() != self.argc {
            self.stats.generic_call();
            return generic::call_global(rt, &self.name, args);
        }
        let version = rt.globals.version();
        let (cached, stale) = match &*self.entry.borrow() {
            Some(e) if e.version == version => (Some(e.target.clone()), false),
            Some(_) => (None, true),
            None => (None, false),
        };
        if let Some(target) = cached {
            self.stats.hit();
            trace!(target: "sjs::ic::global", name = %self.name, version, "hit");
            return target.invoke(rt, Value::UNDEFINED, args);
        }
        if stale {
            self.stats.invalidation();
            debug!(target: "sjs::ic::global", name = %self.name, version, "stale binding");
        }
        self.slow_path(rt, args)
    }

    fn slow_path(&self, rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
        self.stats.slow_path();
        let value = rt
            .globals
            .lookup(&self.name)
            .ok_or_else(|| RuntimeError::unbound(&self.name))?;
        let target = generic::resolve_callee(&rt.heap, value)?;
        generic::check_arity(&target.invoker, self.argc)?;

        let version = rt.globals.version();
        debug!(target: "sjs::ic::global", name = %self.name, version, "install binding");
        *self.entry.borrow_mut() = Some(GlobalEntry {
            version,
            target: target.clone(),
        });

        target.invoke(rt, Value::UNDEFINED, args)
    }
}

impl InlineCache for GlobalCallCache {
    fn kind(&self) -> &'static str {
        "global"
    }

    fn state(&self) -> IcState {
        if self.entry.borrow().is_some() {
            IcState::Monomorphic
        } else {
            IcState::Uninitialized
        }
    }

    fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    fn dispatch(&self, rt: &mut Runtime, ops: Operands<'_>) -> RtResult<Value> {
        self.call(rt, ops.args)
    }
}
