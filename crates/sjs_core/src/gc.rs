//! Handles to runtime-owned storage.
//!
//! Handles compare by identity only. Two handles are equal iff they name the
//! same slot of the same arena.

/// Handle to a heap-allocated object or string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Handle to an immutable shape in a `ShapeTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(pub u32);

impl ShapeId {
    /// The empty shape every object starts from.
    pub const ROOT: ShapeId = ShapeId(0);

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a lexical scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);
