#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use sjs_runtime::{Arity, Runtime, RuntimeConfig, Value};

pub fn runtime() -> Runtime {
    Runtime::new()
}

pub fn bare_runtime() -> Runtime {
    Runtime::bare(RuntimeConfig::default())
}

/// Function returning `base + sum(int args)`.
pub fn summing_fn(rt: &mut Runtime, name: &str, arity: Arity, base: i64) -> Value {
    rt.new_function(name, arity, move |_, inv| {
        let sum: i64 = inv.args.iter().filter(|a| a.is_int()).map(|a| a.as_i64()).sum();
        Ok(Value::from_i64(base + sum))
    })
}

/// Like `summing_fn`, also counting its invocations.
pub fn counting_fn(rt: &mut Runtime, name: &str, arity: Arity, base: i64) -> (Value, Rc<Cell<u64>>) {
    let count = Rc::new(Cell::new(0u64));
    let c = count.clone();
    let f = rt.new_function(name, arity, move |_, inv| {
        c.set(c.get() + 1);
        let sum: i64 = inv.args.iter().filter(|a| a.is_int()).map(|a| a.as_i64()).sum();
        Ok(Value::from_i64(base + sum))
    });
    (f, count)
}

pub fn int(i: i64) -> Value {
    Value::from_i64(i)
}
