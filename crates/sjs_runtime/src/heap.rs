//! Object storage and the shape-based property protocol.
//!
//! Collection is not performed here: handles stay valid for the lifetime of
//! the heap.

use std::rc::Rc;

use sjs_core::value::{FastHashMap, fast_map_new};
use sjs_core::{ObjectId, RtResult, RuntimeError, ScopeId, ShapeId, ShapeTable, Value};

use crate::object::{Invoker, JsObject};

#[derive(Clone, Debug)]
pub enum ManagedObject {
    Object(Box<JsObject>),
    Str(Rc<str>),
}

pub struct Heap {
    objects: Vec<ManagedObject>,
    pub(crate) shapes: ShapeTable,
    string_pool: FastHashMap<Rc<str>, ObjectId>,
    pub(crate) alloc_count: usize,
}

impl Heap {
    pub fn new() -> Self {
        Self {
            objects: Vec::with_capacity(1024),
            shapes: ShapeTable::new(),
            string_pool: fast_map_new(),
            alloc_count: 0,
        }
    }

    /// Allocate a managed object on the heap.
    pub fn alloc(&mut self, obj: ManagedObject) -> ObjectId {
        self.alloc_count += 1;
        let id = self.objects.len();
        self.objects.push(obj);
        ObjectId(id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&ManagedObject> {
        self.objects.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Allocations performed since creation.
    pub fn allocations(&self) -> usize {
        self.alloc_count
    }

    pub fn shapes(&self) -> &ShapeTable {
        &self.shapes
    }

    /// Interned string value; equal contents share one handle.
    pub fn intern(&mut self, s: &str) -> Value {
        if let Some(&id) = self.string_pool.get(s) {
            return Value::str(id);
        }
        let data: Rc<str> = Rc::from(s);
        let id = self.alloc(ManagedObject::Str(data.clone()));
        self.string_pool.insert(data, id);
        Value::str(id)
    }

    pub fn str_of(&self, v: Value) -> Option<&str> {
        if !v.is_str() {
            return None;
        }
        match self.objects.get(v.as_obj_id().0) {
            Some(ManagedObject::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn object(&self, id: ObjectId) -> Option<&JsObject> {
        match self.objects.get(id.0) {
            Some(ManagedObject::Object(o)) => Some(o),
            _ => None,
        }
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut JsObject> {
        match self.objects.get_mut(id.0) {
            Some(ManagedObject::Object(o)) => Some(o),
            _ => None,
        }
    }

    /// The object behind `v`, or `NotAnObject`.
    pub fn expect_object(&self, v: Value) -> RtResult<ObjectId> {
        match v.object_id() {
            Some(id) if self.object(id).is_some() => Ok(id),
            _ => Err(RuntimeError::NotAnObject {
                what: self.describe(v),
            }),
        }
    }

    /// Object whose shape covers exactly `props`, applied in order.
    pub fn create_object(&mut self, props: &[(&str, Value)]) -> ObjectId {
        let root = self.shapes.root();
        let id = self.alloc(ManagedObject::Object(Box::new(JsObject::plain(root))));
        for (name, value) in props {
            self.put(id, name, *value);
        }
        id
    }

    pub fn alloc_function(&mut self, invoker: Invoker, scope: Option<ScopeId>) -> ObjectId {
        let root = self.shapes.root();
        self.alloc(ManagedObject::Object(Box::new(JsObject::function(
            root, invoker, scope,
        ))))
    }

    #[inline]
    pub fn shape_of(&self, id: ObjectId) -> Option<ShapeId> {
        self.object(id).map(|o| o.shape)
    }

    #[inline]
    pub fn slot_of(&self, shape: ShapeId, name: &str) -> Option<u32> {
        self.shapes.slot_of(shape, name)
    }

    /// Reads `slot` without looking at the shape.
    ///
    /// The caller must already have matched the object's shape against one
    /// that owns `slot`.
    #[inline(always)]
    pub fn raw_slot_read(&self, id: ObjectId, slot: u32) -> Value {
        match &self.objects[id.0] {
            ManagedObject::Object(o) => o.slots[slot as usize],
            ManagedObject::Str(_) => {
                debug_assert!(false, "raw_slot_read on a string");
                Value::UNDEFINED
            }
        }
    }

    pub fn set_property(&mut self, target: Value, name: &str, value: Value) -> RtResult<()> {
        let id = self.expect_object(target)?;
        self.put(id, name, value);
        Ok(())
    }

    /// Generic property read: undefined when absent.
    pub fn get_property(&self, target: Value, name: &str) -> RtResult<Value> {
        let id = self.expect_object(target)?;
        let shape = self.shape_of(id).unwrap_or(ShapeId::ROOT);
        Ok(match self.slot_of(shape, name) {
            Some(slot) => self.raw_slot_read(id, slot),
            None => Value::UNDEFINED,
        })
    }

    fn put(&mut self, id: ObjectId, name: &str, value: Value) {
        let Some(shape) = self.shape_of(id) else {
            return;
        };
        if let Some(slot) = self.shapes.slot_of(shape, name) {
            if let Some(obj) = self.object_mut(id) {
                obj.slots[slot as usize] = value;
            }
            return;
        }
        let next = self.shapes.transition(shape, name);
        if let Some(obj) = self.object_mut(id) {
            obj.slots.push(value);
            obj.shape = next;
        }
    }

    pub fn invoker_of(&self, v: Value) -> Option<(ObjectId, &JsObject, &Invoker)> {
        let id = v.object_id()?;
        let obj = self.object(id)?;
        let invoker = obj.invoker.as_ref()?;
        Some((id, obj, invoker))
    }

    /// Short human-readable rendering used in error messages.
    pub fn describe(&self, v: Value) -> String {
        if v.is_int() {
            return v.as_i64().to_string();
        }
        if v.is_undefined() {
            return "undefined".to_string();
        }
        if v.is_bool() {
            return v.as_bool().to_string();
        }
        if let Some(s) = self.str_of(v) {
            return format!("\"{}\"", s);
        }
        if let Some((_, _, inv)) = self.invoker_of(v) {
            return format!("function {}", inv.name);
        }
        v.type_name().to_string()
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
