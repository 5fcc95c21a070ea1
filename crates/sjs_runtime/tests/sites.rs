mod common;

use common::{int, runtime, summing_fn};
use sjs_runtime::{Arity, IcState, MethodCallCache, Operands, RuntimeError, SiteSpec, Value, generic};

#[test]
fn sites_are_built_once_and_reused() {
    let mut rt = runtime();
    let spec = SiteSpec::global_call("+", 2);
    for i in 0..5 {
        let v = rt.dispatch(3, &spec, Operands::args(&[int(i), int(1)])).unwrap();
        assert_eq!(v, int(i + 1));
    }
    assert_eq!(rt.caches.len(), 1);
    assert!(rt.caches.get(0).is_none());
    let site = rt.caches.get(3).unwrap();
    assert_eq!(site.kind(), "global");
    assert_eq!(site.stats().slow_paths, 1);
    assert_eq!(site.stats().hits, 4);
}

#[test]
fn summary_counts_sites_by_state() {
    let mut rt = runtime();
    let a = summing_fn(&mut rt, "a", Arity::Fixed(0), 1);
    let b = summing_fn(&mut rt, "b", Arity::Fixed(0), 2);
    let obj = rt.create_object(&[("x", int(1))]);

    let call = SiteSpec::fun_call(0);
    rt.dispatch(0, &call, Operands::call(a, &[])).unwrap();
    rt.dispatch(0, &call, Operands::call(b, &[])).unwrap();
    rt.dispatch(1, &SiteSpec::field_get("x"), Operands::field(obj)).unwrap();
    let _ = rt.dispatch(2, &SiteSpec::global_call("nope", 0), Operands::args(&[]));

    let summary = rt.caches.summary();
    assert_eq!(summary.sites, 3);
    assert_eq!(summary.polymorphic, 1);
    assert_eq!(summary.monomorphic, 1);
    assert_eq!(summary.uninitialized, 1);
    assert_eq!(summary.megamorphic, 0);
    assert_eq!(summary.stats.slow_paths, 4);

    rt.caches.reset();
    assert!(rt.caches.is_empty());
    assert_eq!(rt.caches.summary().sites, 0);
}

#[test]
fn method_call_binds_the_receiver() {
    let mut rt = runtime();
    let getx = rt.new_function("getx", Arity::Fixed(0), |rt, inv| {
        rt.get_property(inv.receiver, "x")
    });
    let p = rt.create_object(&[("x", int(1)), ("getx", getx)]);
    let q = rt.create_object(&[("x", int(2)), ("getx", getx)]);
    let spec = SiteSpec::method_call("getx", 0);

    for _ in 0..3 {
        assert_eq!(rt.dispatch(0, &spec, Operands::method(p, &[])).unwrap(), int(1));
        assert_eq!(rt.dispatch(0, &spec, Operands::method(q, &[])).unwrap(), int(2));
    }
    let site = rt.caches.get(0).unwrap();
    assert_eq!(site.kind(), "method");
    assert_eq!(site.state(), IcState::Monomorphic);
}

#[test]
fn method_cache_exposes_both_halves() {
    let mut rt = runtime();
    let add = summing_fn(&mut rt, "add", Arity::Fixed(2), 0);
    let o = rt.create_object(&[("add", add)]);
    let site = MethodCallCache::new("add", 2, 3, 1);

    for _ in 0..4 {
        assert_eq!(site.call(&mut rt, o, &[int(2), int(5)]).unwrap(), int(7));
    }
    assert_eq!(site.lookup_cache().name(), "add");
    assert_eq!(site.lookup_cache().cached_shapes().len(), 1);
    assert_eq!(site.call_cache().cached_callees(), vec![add.object_id().unwrap()]);
}

#[test]
fn missing_method_fails_like_the_generic_path() {
    let mut rt = runtime();
    let o = rt.create_object(&[("x", int(1))]);
    let site = MethodCallCache::new("run", 0, 3, 1);
    let err = site.call(&mut rt, o, &[]).unwrap_err();
    assert_eq!(err, RuntimeError::NoSuchMethod { name: "run".into() });
    assert_eq!(err, generic::call_method(&mut rt, o, "run", &[]).unwrap_err());

    let err = site.call(&mut rt, int(1), &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::NotAnObject { .. }));

    let x = MethodCallCache::new("x", 0, 3, 1);
    assert!(matches!(
        x.call(&mut rt, o, &[]),
        Err(RuntimeError::NotInvocable { .. })
    ));
}

#[test]
fn print_writes_one_line_per_call() {
    let mut rt = runtime();
    let hello = rt.intern("hello");
    let f = summing_fn(&mut rt, "f", Arity::Fixed(0), 0);
    let obj = rt.create_object(&[]);
    let spec = SiteSpec::global_call("print", 4);
    let args = [hello, int(42), f, obj];
    let v = rt.dispatch(0, &spec, Operands::args(&args)).unwrap();
    assert_eq!(v, Value::UNDEFINED);
    let empty = SiteSpec::global_call("print", 0);
    rt.dispatch(1, &empty, Operands::args(&[])).unwrap();
    assert_eq!(rt.output, "hello 42 function f [object]\n\n");
}

#[test]
fn arithmetic_builtins() {
    let mut rt = runtime();
    let cases = [
        ("+", 7, 3, 10),
        ("-", 7, 3, 4),
        ("*", 7, 3, 21),
        ("/", 7, 3, 2),
        ("%", 7, 3, 1),
        ("/", -7, 2, -3),
    ];
    for (op, a, b, want) in cases {
        assert_eq!(generic::call_global(&mut rt, op, &[int(a), int(b)]).unwrap(), int(want), "{op}");
    }
    for op in ["/", "%"] {
        assert_eq!(
            generic::call_global(&mut rt, op, &[int(1), int(0)]).unwrap_err(),
            RuntimeError::DivisionByZero
        );
    }
    assert!(matches!(
        generic::call_global(&mut rt, "+", &[int(1), Value::UNDEFINED]),
        Err(RuntimeError::TypeError { .. })
    ));
    assert!(matches!(
        generic::call_global(&mut rt, "+", &[int(1)]),
        Err(RuntimeError::ArityMismatch { expected: 2, found: 1, .. })
    ));
}

#[test]
fn comparison_builtins_return_flags() {
    let mut rt = runtime();
    let a = rt.intern("a");
    let b = rt.intern("b");
    let cases = [
        ("<", int(1), int(2), 1),
        ("<=", int(2), int(2), 1),
        (">", int(1), int(2), 0),
        (">=", int(3), int(2), 1),
        ("<", a, b, 1),
        (">", a, b, 0),
        ("==", int(4), int(4), 1),
        ("==", a, a, 1),
        ("!=", a, b, 1),
        ("==", int(1), Value::UNDEFINED, 0),
        ("!=", Value::UNDEFINED, Value::UNDEFINED, 0),
    ];
    for (op, x, y, want) in cases {
        assert_eq!(generic::call_global(&mut rt, op, &[x, y]).unwrap(), int(want), "{op}");
    }
    let o1 = rt.create_object(&[]);
    let o2 = rt.create_object(&[]);
    assert_eq!(generic::call_global(&mut rt, "==", &[o1, o2]).unwrap(), int(0));
    assert_eq!(generic::call_global(&mut rt, "==", &[o1, o1]).unwrap(), int(1));
    assert!(matches!(
        generic::call_global(&mut rt, "<", &[o1, int(1)]),
        Err(RuntimeError::TypeError { .. })
    ));
}

#[test]
fn truthiness() {
    let mut rt = runtime();
    let s = rt.intern("");
    let o = rt.create_object(&[]);
    assert!(!generic::truth(Value::UNDEFINED));
    assert!(!generic::truth(Value::FALSE));
    assert!(!generic::truth(int(0)));
    assert!(generic::truth(int(-1)));
    assert!(generic::truth(Value::TRUE));
    assert!(generic::truth(s));
    assert!(generic::truth(o));
}

#[test]
fn builtins_are_registered_in_order() {
    let rt = runtime();
    let names: Vec<&str> = rt.globals.names().collect();
    assert_eq!(names[0], "print");
    assert!(names.contains(&"%"));
    assert_eq!(names.len(), 13);
}

#[test]
fn reused_site_id_with_a_new_spec_gets_a_fresh_cache() {
    let mut rt = runtime();
    let f = summing_fn(&mut rt, "f", Arity::Fixed(0), 5);
    let obj = rt.create_object(&[("a", int(1))]);

    let field = SiteSpec::field_get("a");
    assert_eq!(rt.dispatch(0, &field, Operands::field(obj)).unwrap(), int(1));
    assert_eq!(rt.caches.get(0).unwrap().kind(), "field");

    let call = SiteSpec::fun_call(0);
    assert_eq!(rt.dispatch(0, &call, Operands::call(f, &[])).unwrap(), int(5));
    let site = rt.caches.get(0).unwrap();
    assert_eq!(site.kind(), "call");
    assert_eq!(site.stats().slow_paths, 1);
    assert_eq!(rt.caches.len(), 1);

    // Same spec again reuses the cache.
    rt.dispatch(0, &call, Operands::call(f, &[])).unwrap();
    assert_eq!(rt.caches.get(0).unwrap().stats().hits, 1);
}
