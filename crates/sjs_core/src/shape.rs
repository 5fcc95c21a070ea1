//! Object shapes.
//!
//! A `Shape` maps property names to fixed slot indices. Shapes are immutable
//! once pushed into the `ShapeTable`; adding a property to an object moves it
//! to a different shape reached through a transition edge. Edges are recorded
//! in the table, keyed by `(from, name)`, so two objects that insert the same
//! names in the same order always end up on the same `ShapeId`.

use crate::gc::ShapeId;
use crate::value::{FastHashMap, fast_map_new, fast_map_with_capacity};
use std::rc::Rc;

#[derive(Clone, Debug)]
pub struct Shape {
    pub parent: Option<ShapeId>,
    pub prop_map: FastHashMap<Rc<str>, u32>,
    /// Property names in slot order.
    pub names: Vec<Rc<str>>,
}

impl Shape {
    fn root() -> Self {
        Self {
            parent: None,
            prop_map: fast_map_new(),
            names: Vec::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn slot_of(&self, name: &str) -> Option<u32> {
        self.prop_map.get(name).copied()
    }
}

pub struct ShapeTable {
    shapes: Vec<Shape>,
    transitions: Vec<FastHashMap<Rc<str>, ShapeId>>,
}

impl ShapeTable {
    pub fn new() -> Self {
        Self {
            shapes: vec![Shape::root()],
            transitions: vec![fast_map_new()],
        }
    }

    pub fn root(&self) -> ShapeId {
        ShapeId::ROOT
    }

    /// Panics on a handle that did not come from this table.
    pub fn get(&self, id: ShapeId) -> &Shape {
        &self.shapes[id.index()]
    }

    pub fn slot_of(&self, id: ShapeId, name: &str) -> Option<u32> {
        self.shapes.get(id.index()).and_then(|s| s.slot_of(name))
    }

    /// Shape reached from `from` by appending `name` at the next free slot.
    ///
    /// Callers must only ask for names not already present in `from`.
    pub fn transition(&mut self, from: ShapeId, name: &str) -> ShapeId {
        debug_assert!(self.slot_of(from, name).is_none());
        if let Some(&to) = self.transitions[from.index()].get(name) {
            return to;
        }
        let key: Rc<str> = Rc::from(name);
        let parent = &self.shapes[from.index()];
        let mut prop_map = fast_map_with_capacity(parent.prop_map.len() + 1);
        for (k, v) in parent.prop_map.iter() {
            prop_map.insert(k.clone(), *v);
        }
        let slot = parent.names.len() as u32;
        prop_map.insert(key.clone(), slot);
        let mut names = parent.names.clone();
        names.push(key.clone());
        let shape = Shape {
            parent: Some(from),
            prop_map,
            names,
        };

        // The shape is complete before anything can reach it.
        let to = ShapeId(self.shapes.len() as u32);
        self.shapes.push(shape);
        self.transitions.push(fast_map_new());
        self.transitions[from.index()].insert(key, to);
        to
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root shape always exists.
        false
    }
}

impl Default for ShapeTable {
    fn default() -> Self {
        Self::new()
    }
}
