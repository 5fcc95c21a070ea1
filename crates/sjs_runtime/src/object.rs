//! Dynamic objects and their invocable entry points.

use std::fmt;
use std::rc::Rc;

use sjs_core::{Arity, ObjectId, RtResult, ScopeId, ShapeId, Value};

use crate::Runtime;

/// Arguments of one invocation as seen by native code.
pub struct Invocation<'a> {
    /// The function object being invoked.
    pub callee: ObjectId,
    /// `this`; undefined for plain and global calls.
    pub receiver: Value,
    pub args: &'a [Value],
    /// Enclosing scope of a closure.
    pub scope: Option<ScopeId>,
}

/// Native code behind a function object.
pub type NativeFn = Rc<dyn Fn(&mut Runtime, &Invocation<'_>) -> RtResult<Value>>;

/// Entry point of a function-valued object.
#[derive(Clone)]
pub struct Invoker {
    pub name: Rc<str>,
    pub arity: Arity,
    pub code: NativeFn,
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct JsObject {
    pub shape: ShapeId,
    /// One value per slot of `shape`; `slots.len() == shape.size()`.
    pub slots: Vec<Value>,
    pub invoker: Option<Invoker>,
    pub scope: Option<ScopeId>,
}

impl JsObject {
    pub fn plain(shape: ShapeId) -> Self {
        Self {
            shape,
            slots: Vec::new(),
            invoker: None,
            scope: None,
        }
    }

    pub fn function(shape: ShapeId, invoker: Invoker, scope: Option<ScopeId>) -> Self {
        Self {
            shape,
            slots: Vec::new(),
            invoker: Some(invoker),
            scope,
        }
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        self.invoker.is_some()
    }
}
