//! Uncached resolution.
//!
//! These functions define what every cached path must agree with. Caches call
//! into them from their slow paths, megamorphic sites use them directly, and
//! the differential tests compare against them.

use sjs_core::{Arity, RtResult, RuntimeError, Value};

use crate::Runtime;
use crate::heap::Heap;
use crate::ic::CallTarget;
use crate::object::Invoker;

/// Resolves `qualifier` to something callable.
pub fn resolve_callee(heap: &Heap, qualifier: Value) -> RtResult<CallTarget> {
    match heap.invoker_of(qualifier) {
        Some((callee, obj, invoker)) => Ok(CallTarget {
            callee,
            invoker: invoker.clone(),
            scope: obj.scope,
        }),
        None => Err(RuntimeError::NotInvocable {
            what: heap.describe(qualifier),
        }),
    }
}

pub fn check_arity(invoker: &Invoker, argc: usize) -> RtResult<()> {
    if invoker.arity.accepts(argc) {
        return Ok(());
    }
    let expected = match invoker.arity {
        Arity::Fixed(n) => n as usize,
        Arity::Variadic => argc,
    };
    Err(RuntimeError::arity(&invoker.name, expected, argc))
}

/// `qualifier(args...)` with `receiver` as `this`.
pub fn invoke(rt: &mut Runtime, qualifier: Value, receiver: Value, args: &[Value]) -> RtResult<Value> {
    let target = resolve_callee(&rt.heap, qualifier)?;
    check_arity(&target.invoker, args.len())?;
    target.invoke(rt, receiver, args)
}

/// `receiver.name`, undefined when absent.
pub fn get_field(heap: &Heap, receiver: Value, name: &str) -> RtResult<Value> {
    heap.get_property(receiver, name)
}

pub fn lookup_global(rt: &Runtime, name: &str) -> RtResult<Value> {
    rt.globals
        .lookup(name)
        .ok_or_else(|| RuntimeError::unbound(name))
}

/// `name(args...)` resolved through the global scope.
pub fn call_global(rt: &mut Runtime, name: &str, args: &[Value]) -> RtResult<Value> {
    let callee = lookup_global(rt, name)?;
    invoke(rt, callee, Value::UNDEFINED, args)
}

/// `receiver.name(args...)`.
pub fn call_method(rt: &mut Runtime, receiver: Value, name: &str, args: &[Value]) -> RtResult<Value> {
    let method = get_field(&rt.heap, receiver, name)?;
    if method.is_undefined() {
        return Err(RuntimeError::NoSuchMethod {
            name: name.to_string(),
        });
    }
    invoke(rt, method, receiver, args)
}

/// Condition truthiness: undefined, `false` and int `0` are false.
pub fn truth(v: Value) -> bool {
    if v.is_undefined() {
        return false;
    }
    if v.is_bool() {
        return v.as_bool();
    }
    if v.is_int() {
        return v.as_i64() != 0;
    }
    true
}
