//! Field-access cache, keyed on the receiver's shape.

use std::cell::RefCell;
use std::rc::Rc;

use sjs_core::{RtResult, RuntimeError, ShapeId, Value};
use tracing::{debug, trace};

use super::{CacheStats, GuardChain, IcState, InlineCache, Operands, StatCounters};
use crate::Runtime;
use crate::heap::Heap;

/// What a matching shape guard resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    Slot(u32),
    /// The field is not part of the shape; reads yield undefined.
    Absent,
}

pub struct FieldCache {
    name: Rc<str>,
    max_entries: usize,
    chain: RefCell<GuardChain<ShapeId, FieldTarget>>,
    stats: StatCounters,
}

impl FieldCache {
    /// Single-entry cache: a shape mismatch replaces the entry.
    pub fn new(name: &str) -> Self {
        Self::with_depth(name, 1)
    }

    pub fn with_depth(name: &str, max_entries: usize) -> Self {
        Self {
            name: Rc::from(name),
            max_entries: max_entries.max(1),
            chain: RefCell::new(GuardChain::new()),
            stats: StatCounters::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shapes currently guarded, in guard order.
    pub fn cached_shapes(&self) -> Vec<ShapeId> {
        self.chain.borrow().keys().collect()
    }

    pub fn get(&self, heap: &Heap, receiver: Value) -> RtResult<Value> {
        let (id, shape) = match receiver
            .object_id()
            .and_then(|id| heap.shape_of(id).map(|s| (id, s)))
        {
            Some(pair) => pair,
            None => {
                return Err(RuntimeError::NotAnObject {
                    what: heap.describe(receiver),
                });
            }
        };

        let cached = self.chain.borrow().find(shape).copied();
        let target = match cached {
            Some(target) => {
                self.stats.hit();
                trace!(target: "sjs::ic::field", field = %self.name, shape = shape.0, "hit");
                target
            }
            None => self.install(heap, shape),
        };

        Ok(match target {
            FieldTarget::Slot(slot) => heap.raw_slot_read(id, slot),
            FieldTarget::Absent => Value::UNDEFINED,
        })
    }

    fn install(&self, heap: &Heap, shape: ShapeId) -> FieldTarget {
        self.stats.slow_path();
        let target = match heap.slot_of(shape, &self.name) {
            Some(slot) => FieldTarget::Slot(slot),
            None => FieldTarget::Absent,
        };
        let mut chain = self.chain.borrow_mut();
        if chain.len() >= self.max_entries {
            let dropped = chain.reset(shape, target);
            for _ in 0..dropped {
                self.stats.invalidation();
            }
            debug!(
                target: "sjs::ic::field",
                field = %self.name,
                shape = shape.0,
                dropped,
                "replace guards"
            );
        } else {
            chain.push(shape, target);
            debug!(target: "sjs::ic::field", field = %self.name, shape = shape.0, ?target, "install guard");
        }
        target
    }
}

impl InlineCache for FieldCache {
    fn kind(&self) -> &'static str {
        "field"
    }

    fn state(&self) -> IcState {
        self.chain.borrow().state()
    }

    fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    fn dispatch(&self, rt: &mut Runtime, ops: Operands<'_>) -> RtResult<Value> {
        self.get(&rt.heap, ops.receiver)
    }
}
