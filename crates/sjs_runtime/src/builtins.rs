//! Builtin functions of the global environment.

use std::cmp::Ordering;

use sjs_core::{RtResult, RuntimeError, Value};

use crate::Runtime;
use crate::errors::messages;

pub fn builtin_print(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    let mut line = String::new();
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        rt.write_display(*a, &mut line);
    }
    rt.output.push_str(&line);
    rt.output.push('\n');
    Ok(Value::UNDEFINED)
}

fn int_operands(rt: &Runtime, op: &str, args: &[Value]) -> RtResult<(i64, i64)> {
    match args {
        [a, b] if a.is_int() && b.is_int() => Ok((a.as_i64(), b.as_i64())),
        [a, b] => {
            let bad = if a.is_int() { *b } else { *a };
            Err(RuntimeError::type_error(format!(
                "{}: {} for {}",
                messages::NOT_AN_INT,
                rt.heap.describe(bad),
                op
            )))
        }
        _ => Err(RuntimeError::arity(op, 2, args.len())),
    }
}

pub fn builtin_add(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    let (a, b) = int_operands(rt, "+", args)?;
    Ok(Value::from_i64(a.wrapping_add(b)))
}

pub fn builtin_sub(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    let (a, b) = int_operands(rt, "-", args)?;
    Ok(Value::from_i64(a.wrapping_sub(b)))
}

pub fn builtin_mul(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    let (a, b) = int_operands(rt, "*", args)?;
    Ok(Value::from_i64(a.wrapping_mul(b)))
}

pub fn builtin_div(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    let (a, b) = int_operands(rt, "/", args)?;
    if b == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::from_i64(a.wrapping_div(b)))
}

pub fn builtin_rem(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    let (a, b) = int_operands(rt, "%", args)?;
    if b == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::from_i64(a.wrapping_rem(b)))
}

fn flag(b: bool) -> Value {
    Value::from_i64(b as i64)
}

pub fn builtin_eq(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    match args {
        [a, b] => Ok(flag(rt.values_equal(*a, *b))),
        _ => Err(RuntimeError::arity("==", 2, args.len())),
    }
}

pub fn builtin_ne(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    match args {
        [a, b] => Ok(flag(!rt.values_equal(*a, *b))),
        _ => Err(RuntimeError::arity("!=", 2, args.len())),
    }
}

fn compare(rt: &Runtime, op: &str, args: &[Value]) -> RtResult<Ordering> {
    let [a, b] = args else {
        return Err(RuntimeError::arity(op, 2, args.len()));
    };
    if a.is_int() && b.is_int() {
        return Ok(a.as_i64().cmp(&b.as_i64()));
    }
    if let (Some(x), Some(y)) = (rt.heap.str_of(*a), rt.heap.str_of(*b)) {
        return Ok(x.cmp(y));
    }
    Err(RuntimeError::type_error(format!(
        "{}: {} {} {}",
        messages::NOT_COMPARABLE,
        rt.heap.describe(*a),
        op,
        rt.heap.describe(*b)
    )))
}

pub fn builtin_lt(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    Ok(flag(compare(rt, "<", args)? == Ordering::Less))
}

pub fn builtin_le(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    Ok(flag(compare(rt, "<=", args)? != Ordering::Greater))
}

pub fn builtin_gt(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    Ok(flag(compare(rt, ">", args)? == Ordering::Greater))
}

pub fn builtin_ge(rt: &mut Runtime, args: &[Value]) -> RtResult<Value> {
    Ok(flag(compare(rt, ">=", args)? != Ordering::Less))
}
