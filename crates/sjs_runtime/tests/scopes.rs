mod common;

use common::{bare_runtime, int, runtime};
use sjs_runtime::{Arity, FunCallCache, Operands, RuntimeError, SiteSpec, Value};

#[test]
fn lookup_walks_outward_then_into_globals() {
    let mut rt = bare_runtime();
    rt.register_global("g", int(0));
    let outer = rt.new_scope(None);
    let inner = rt.new_scope(Some(outer));
    rt.define_local(outer, "x", int(1));
    rt.define_local(inner, "y", int(2));

    assert_eq!(rt.lookup(Some(inner), "y").unwrap(), int(2));
    assert_eq!(rt.lookup(Some(inner), "x").unwrap(), int(1));
    assert_eq!(rt.lookup(Some(inner), "g").unwrap(), int(0));
    assert_eq!(rt.lookup(None, "g").unwrap(), int(0));
    assert_eq!(rt.lookup(Some(outer), "y").unwrap_err(), RuntimeError::unbound("y"));
}

#[test]
fn inner_definitions_shadow_outer_ones() {
    let mut rt = bare_runtime();
    rt.register_global("x", int(0));
    let outer = rt.new_scope(None);
    let inner = rt.new_scope(Some(outer));
    rt.define_local(outer, "x", int(1));
    rt.define_local(inner, "x", int(2));
    assert_eq!(rt.lookup(Some(inner), "x").unwrap(), int(2));
    assert_eq!(rt.lookup(Some(outer), "x").unwrap(), int(1));
    assert_eq!(rt.lookup(None, "x").unwrap(), int(0));
}

#[test]
fn assignment_updates_the_nearest_binding() {
    let mut rt = bare_runtime();
    rt.register_global("g", int(0));
    let outer = rt.new_scope(None);
    let inner = rt.new_scope(Some(outer));
    rt.define_local(outer, "x", int(1));

    rt.assign(Some(inner), "x", int(5)).unwrap();
    assert_eq!(rt.lookup(Some(outer), "x").unwrap(), int(5));

    let before = rt.globals.version();
    rt.assign(Some(inner), "g", int(7)).unwrap();
    assert_eq!(rt.lookup_global("g"), Some(int(7)));
    assert!(rt.globals.version() > before);

    assert_eq!(
        rt.assign(Some(inner), "nope", int(1)).unwrap_err(),
        RuntimeError::unbound("nope")
    );
}

#[test]
fn closures_see_their_captured_scope() {
    let mut rt = runtime();
    let make_counter = |rt: &mut sjs_runtime::Runtime| {
        let scope = rt.new_scope(None);
        rt.define_local(scope, "n", int(0));
        rt.new_closure("tick", Arity::Fixed(0), scope, |rt, inv| {
            let n = rt.lookup(inv.scope, "n")?;
            let next = int(n.as_i64() + 1);
            rt.assign(inv.scope, "n", next)?;
            Ok(next)
        })
    };
    let c1 = make_counter(&mut rt);
    let c2 = make_counter(&mut rt);
    let site = FunCallCache::new(0, 3);

    assert_eq!(site.call(&mut rt, c1, Value::UNDEFINED, &[]).unwrap(), int(1));
    assert_eq!(site.call(&mut rt, c1, Value::UNDEFINED, &[]).unwrap(), int(2));
    assert_eq!(site.call(&mut rt, c2, Value::UNDEFINED, &[]).unwrap(), int(1));
    assert_eq!(site.call(&mut rt, c1, Value::UNDEFINED, &[]).unwrap(), int(3));
    assert_eq!(site.depth(), 2);
}

#[test]
fn closure_calling_a_global_through_a_site() {
    let mut rt = runtime();
    let scope = rt.new_scope(None);
    rt.define_local(scope, "k", int(10));
    let add_k = rt.new_closure("addk", Arity::Fixed(1), scope, |rt, inv| {
        let k = rt.lookup(inv.scope, "k")?;
        let spec = SiteSpec::global_call("+", 2);
        rt.dispatch(100, &spec, Operands::args(&[inv.args[0], k]))
    });
    let spec = SiteSpec::fun_call(1);
    for i in 0..3 {
        let v = rt.dispatch(0, &spec, Operands::call(add_k, &[int(i)])).unwrap();
        assert_eq!(v, int(10 + i));
    }
    assert_eq!(rt.caches.get(100).unwrap().stats().hits, 2);
}
