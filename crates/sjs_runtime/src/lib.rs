//! sjs runtime: objects, scopes and the inline caches that sit at every
//! dynamic call site.

#![allow(clippy::new_without_default)]
#![allow(clippy::len_without_is_empty)]

pub mod builtins_registry;
pub mod cache_manager;
pub mod config;
pub mod env;
pub mod errors;
pub mod generic;
pub mod heap;
pub mod ic;
pub mod object;

mod builtins;
mod runtime;

pub use sjs_core::{Arity, ObjectId, RtResult, RuntimeError, ScopeId, ShapeId, Value};

pub use builtins_registry::{BuiltinFn, BuiltinProvider, BuiltinRegistry, StdBuiltinProvider};
pub use cache_manager::{CacheManager, CacheSummary, SiteId, SiteSpec};
pub use config::RuntimeConfig;
pub use env::{GlobalScope, Scope, Scopes};
pub use heap::{Heap, ManagedObject};
pub use ic::{
    CacheStats, CallTarget, FieldCache, FieldTarget, FunCallCache, GlobalCallCache, IcState,
    InlineCache, MethodCallCache, Operands,
};
pub use object::{Invocation, Invoker, JsObject, NativeFn};
pub use runtime::Runtime;
