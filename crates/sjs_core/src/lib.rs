//! Core types for the sjs runtime.
//!
//! This crate contains the fundamental types that are independent of the runtime:
//! - `Value` - NaN-boxed runtime value representation
//! - `ObjectId`, `ShapeId`, `ScopeId` - Opaque handles into runtime-owned arenas
//! - `Shape` / `ShapeTable` - Immutable property layouts shared between objects
//! - `RuntimeError` - The fatal error taxonomy surfaced by dispatch

pub mod error;
pub mod gc;
pub mod shape;
pub mod value;

pub use error::{RtResult, RuntimeError};
pub use gc::{ObjectId, ScopeId, ShapeId};
pub use shape::{Shape, ShapeTable};
pub use value::{Arity, Value};
