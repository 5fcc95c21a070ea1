//! Inline caches for dynamic call sites.
//!
//! Every cache follows the same protocol. A fresh cache has no guards and
//! sends each execution to its slow path. The slow path resolves the
//! operation generically, fails exactly as the generic resolver would, then
//! installs a `(guard key, target)` pair and runs the target. Later
//! executions test the installed guards in order and run the first matching
//! target; if none match they fall back to the slow path again.
//!
//! No `RefCell` borrow is held while guest code runs. Installation happens in
//! one short borrow between resolution and execution, so a call that
//! re-enters its own site sees either the old guards or the new ones.

mod call;
mod field;
mod global;
mod method;

use std::cell::Cell;

use smallvec::SmallVec;
use sjs_core::{ObjectId, RtResult, ScopeId, Value};

use crate::Runtime;
use crate::object::{Invocation, Invoker};

pub use call::FunCallCache;
pub use field::{FieldCache, FieldTarget};
pub use global::GlobalCallCache;
pub use method::MethodCallCache;

/// Specialization level of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IcState {
    /// No guard installed yet.
    Uninitialized,
    /// One guard.
    Monomorphic,
    /// A bounded chain of guards.
    Polymorphic,
    /// Guards abandoned for generic dispatch.
    Megamorphic,
}

impl IcState {
    pub fn for_entries(n: usize) -> Self {
        match n {
            0 => IcState::Uninitialized,
            1 => IcState::Monomorphic,
            _ => IcState::Polymorphic,
        }
    }
}

/// Snapshot of a site's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Executions served by an installed guard.
    pub hits: u64,
    /// Executions that entered the slow path, including failed ones.
    pub slow_paths: u64,
    /// Installed guards discarded because they went stale or were flushed.
    pub invalidations: u64,
    /// Executions served by generic dispatch after going megamorphic.
    pub generic_calls: u64,
}

impl CacheStats {
    pub fn total(&self) -> u64 {
        self.hits + self.slow_paths + self.generic_calls
    }
}

impl std::ops::AddAssign for CacheStats {
    fn add_assign(&mut self, rhs: Self) {
        self.hits += rhs.hits;
        self.slow_paths += rhs.slow_paths;
        self.invalidations += rhs.invalidations;
        self.generic_calls += rhs.generic_calls;
    }
}

#[derive(Default)]
pub(crate) struct StatCounters {
    hits: Cell<u64>,
    slow_paths: Cell<u64>,
    invalidations: Cell<u64>,
    generic_calls: Cell<u64>,
}

impl StatCounters {
    #[inline]
    pub(crate) fn hit(&self) {
        self.hits.set(self.hits.get() + 1);
    }
    #[inline]
    pub(crate) fn slow_path(&self) {
        self.slow_paths.set(self.slow_paths.get() + 1);
    }
    #[inline]
    pub(crate) fn invalidation(&self) {
        self.invalidations.set(self.invalidations.get() + 1);
    }
    #[inline]
    pub(crate) fn generic_call(&self) {
        self.generic_calls.set(self.generic_calls.get() + 1);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            slow_paths: self.slow_paths.get(),
            invalidations: self.invalidations.get(),
            generic_calls: self.generic_calls.get(),
        }
    }
}

/// Operands of one execution of a site.
///
/// Field sites only read `receiver`; global call sites only read `args`.
#[derive(Clone, Copy, Debug)]
pub struct Operands<'a> {
    pub qualifier: Value,
    pub receiver: Value,
    pub args: &'a [Value],
}

impl<'a> Operands<'a> {
    /// `qualifier(args...)` with an undefined receiver.
    pub fn call(qualifier: Value, args: &'a [Value]) -> Self {
        Self {
            qualifier,
            receiver: Value::UNDEFINED,
            args,
        }
    }

    /// `receiver.field`.
    pub fn field(receiver: Value) -> Self {
        Self {
            qualifier: Value::UNDEFINED,
            receiver,
            args: &[],
        }
    }

    /// `receiver.name(args...)`.
    pub fn method(receiver: Value, args: &'a [Value]) -> Self {
        Self {
            qualifier: Value::UNDEFINED,
            receiver,
            args,
        }
    }

    /// `name(args...)` resolved through the global scope.
    pub fn args(args: &'a [Value]) -> Self {
        Self::call(Value::UNDEFINED, args)
    }
}

/// The dispatch entry the engine calls once per execution of a site.
pub trait InlineCache {
    fn kind(&self) -> &'static str;
    fn state(&self) -> IcState;
    fn stats(&self) -> CacheStats;
    fn dispatch(&self, rt: &mut Runtime, ops: Operands<'_>) -> RtResult<Value>;
}

/// Ordered `(guard key, target)` pairs, tested front to back.
pub(crate) struct GuardChain<K, T> {
    entries: SmallVec<[(K, T); 4]>,
}

impl<K: Copy + Eq, T> GuardChain<K, T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    #[inline]
    pub(crate) fn find(&self, key: K) -> Option<&T> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, t)| t)
    }

    pub(crate) fn push(&mut self, key: K, target: T) {
        self.entries.push((key, target));
    }

    /// Drops every guard and installs a single one.
    pub(crate) fn reset(&mut self, key: K, target: T) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.entries.push((key, target));
        dropped
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub(crate) fn state(&self) -> IcState {
        IcState::for_entries(self.entries.len())
    }
}

/// A resolved callee, ready to run without further lookup.
#[derive(Clone, Debug)]
pub struct CallTarget {
    pub callee: ObjectId,
    pub invoker: Invoker,
    pub scope: Option<ScopeId>,
}

impl CallTarget {
    #[inline]
    pub fn invoke(&self, rt: &mut Runtime, receiver: Value, args: &[Value]) -> RtResult<Value> {
        let inv = Invocation {
            callee: self.callee,
            receiver,
            args,
            scope: self.scope,
        };
        (self.invoker.code)(rt, &inv)
    }
}
