//! Function-call cache.
//!
//! Keyed on the identity of the callee object. Each miss on a resolvable
//! callee appends one guard, up to `max_depth`; the next miss after that
//! turns the whole site megamorphic for good, after which every call goes
//! through `generic::invoke`.

use std::cell::RefCell;

use sjs_core::{ObjectId, RtResult, Value};
use tracing::{debug, trace};

use super::{CacheStats, CallTarget, GuardChain, IcState, InlineCache, Operands, StatCounters};
use crate::Runtime;
use crate::generic;

enum CallChain {
    Linked(GuardChain<ObjectId, CallTarget>),
    Megamorphic,
}

enum Probe {
    Hit(CallTarget),
    Miss,
    Generic,
}

pub struct FunCallCache {
    argc: usize,
    max_depth: usize,
    chain: RefCell<CallChain>,
    stats: StatCounters,
}

impl FunCallCache {
    pub fn new(argc: usize, max_depth: usize) -> Self {
        Self {
            argc,
            max_depth,
            chain: RefCell::new(CallChain::Linked(GuardChain::new())),
            stats: StatCounters::default(),
        }
    }

    pub fn argc(&self) -> usize {
        self.argc
    }

    /// Guards currently chained; zero once megamorphic.
    pub fn depth(&self) -> usize {
        match &*self.chain.borrow() {
            CallChain::Linked(guards) => guards.len(),
            CallChain::Megamorphic => 0,
        }
    }

    pub fn is_megamorphic(&self) -> bool {
        matches!(&*self.chain.borrow(), CallChain::Megamorphic)
    }

    /// Callees with an installed guard, in guard order.
    pub fn cached_callees(&self) -> Vec<ObjectId> {
        match &*self.chain.borrow() {
            CallChain::Linked(guards) => guards.keys().collect(),
            CallChain::Megamorphic => Vec::new(),
        }
    }

    pub fn call(
        &self,
        rt: &mut Runtime,
        qualifier: Value,
        receiver: Value,
        args: &[Value],
    ) -> RtResult<Value> {
        if args.len() != self.argc {
            // Guards only hold for `argc` arguments.
            self.stats.generic_call();
            return generic::invoke(rt, qualifier, receiver, args);
        }
        let probe = match &*self.chain.borrow() {
            CallChain::Megamorphic => Probe::Generic,
            CallChain::Linked(guards) => match qualifier.object_id().and_then(|id| guards.find(id)) {
                Some(target) => Probe::Hit(target.clone()),
                None => Probe::Miss,
            },
        };
        match probe {
            Probe::Hit(target) => {
                self.stats.hit();
                trace!(target: "sjs::ic::call", callee = target.callee.0, "hit");
                target.invoke(rt, receiver, args)
            }
            Probe::Generic => {
                self.stats.generic_call();
                generic::invoke(rt, qualifier, receiver, args)
            }
            Probe::Miss => self.slow_path(rt, qualifier, receiver, args),
        }
    }

    fn slow_path(
        &self,
        rt: &mut Runtime,
        qualifier: Value,
        receiver: Value,
        args: &[Value],
    ) -> RtResult<Value> {
        self.stats.slow_path();
        let target = generic::resolve_callee(&rt.heap, qualifier)?;
        generic::check_arity(&target.invoker, self.argc)?;

        {
            let mut chain = self.chain.borrow_mut();
            let full = matches!(&*chain, CallChain::Linked(g) if g.len() >= self.max_depth);
            if full {
                debug!(
                    target: "sjs::ic::call",
                    argc = self.argc,
                    depth = self.max_depth,
                    "call site megamorphic"
                );
                self.stats.invalidation();
                *chain = CallChain::Megamorphic;
            } else if let CallChain::Linked(guards) = &mut *chain {
                debug!(
                    target: "sjs::ic::call",
                    callee = %target.invoker.name,
                    depth = guards.len() + 1,
                    "install guard"
                );
                guards.push(target.callee, target.clone());
            }
        }

        target.invoke(rt, receiver, args)
    }
}

impl InlineCache for FunCallCache {
    fn kind(&self) -> &'static str {
        "call"
    }

    fn state(&self) -> IcState {
        match &*self.chain.borrow() {
            CallChain::Linked(guards) => guards.state(),
            CallChain::Megamorphic => IcState::Megamorphic,
        }
    }

    fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    fn dispatch(&self, rt: &mut Runtime, ops: Operands<'_>) -> RtResult<Value> {
        self.call(rt, ops.qualifier, ops.receiver, ops.args)
    }
}
