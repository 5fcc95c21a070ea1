mod common;

use common::{bare_runtime, int};
use sjs_runtime::{RuntimeError, ShapeId, Value};

#[test]
fn objects_built_in_the_same_order_share_a_shape() {
    let mut rt = bare_runtime();
    let a = rt.create_object(&[("x", int(1)), ("y", int(2))]);
    let b = rt.create_object(&[("x", int(3)), ("y", int(4))]);
    let c = rt.create_object(&[("y", int(5)), ("x", int(6))]);
    let sa = rt.heap.shape_of(a.object_id().unwrap()).unwrap();
    let sb = rt.heap.shape_of(b.object_id().unwrap()).unwrap();
    let sc = rt.heap.shape_of(c.object_id().unwrap()).unwrap();
    assert_eq!(sa, sb);
    assert_ne!(sa, sc);
}

#[test]
fn empty_object_sits_on_the_root_shape() {
    let mut rt = bare_runtime();
    let o = rt.create_object(&[]);
    assert_eq!(rt.heap.shape_of(o.object_id().unwrap()), Some(ShapeId::ROOT));
    assert_eq!(rt.get_property(o, "anything").unwrap(), Value::UNDEFINED);
}

#[test]
fn overwriting_a_property_keeps_the_shape() {
    let mut rt = bare_runtime();
    let o = rt.create_object(&[("a", int(1))]);
    let id = o.object_id().unwrap();
    let before = rt.heap.shape_of(id).unwrap();
    rt.set_property(o, "a", int(9)).unwrap();
    assert_eq!(rt.heap.shape_of(id).unwrap(), before);
    assert_eq!(rt.get_property(o, "a").unwrap(), int(9));
}

#[test]
fn adding_a_property_transitions_and_appends_a_slot() {
    let mut rt = bare_runtime();
    let o = rt.create_object(&[("a", int(1))]);
    let id = o.object_id().unwrap();
    let before = rt.heap.shape_of(id).unwrap();
    rt.set_property(o, "b", int(2)).unwrap();
    let after = rt.heap.shape_of(id).unwrap();
    assert_ne!(before, after);
    assert_eq!(rt.heap.slot_of(after, "a"), Some(0));
    assert_eq!(rt.heap.slot_of(after, "b"), Some(1));
    assert_eq!(rt.heap.slot_of(before, "b"), None);
    assert_eq!(rt.heap.raw_slot_read(id, 1), int(2));
    assert_eq!(rt.heap.shapes().get(after).parent, Some(before));
}

#[test]
fn repeated_initial_property_overwrites() {
    let mut rt = bare_runtime();
    let o = rt.create_object(&[("a", int(1)), ("a", int(2))]);
    let shape = rt.heap.shape_of(o.object_id().unwrap()).unwrap();
    assert_eq!(rt.heap.shapes().get(shape).size(), 1);
    assert_eq!(rt.get_property(o, "a").unwrap(), int(2));
}

#[test]
fn function_objects_carry_properties_too() {
    let mut rt = bare_runtime();
    let f = common::summing_fn(&mut rt, "f", sjs_runtime::Arity::Fixed(0), 0);
    rt.set_property(f, "tag", int(7)).unwrap();
    assert_eq!(rt.get_property(f, "tag").unwrap(), int(7));
}

#[test]
fn property_access_on_non_objects_fails() {
    let mut rt = bare_runtime();
    let s = rt.intern("text");
    assert!(matches!(
        rt.get_property(int(3), "a"),
        Err(RuntimeError::NotAnObject { .. })
    ));
    assert!(matches!(
        rt.set_property(s, "a", int(1)),
        Err(RuntimeError::NotAnObject { .. })
    ));
    assert!(matches!(
        rt.get_property(Value::UNDEFINED, "a"),
        Err(RuntimeError::NotAnObject { what }) if what == "undefined"
    ));
}

#[test]
fn strings_are_interned() {
    let mut rt = bare_runtime();
    let a = rt.intern("hello");
    let b = rt.intern("hello");
    let c = rt.intern("world");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(rt.heap.str_of(a), Some("hello"));
}
