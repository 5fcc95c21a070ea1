//! Runtime value representation.
//!
//! Values are NaN-boxed: floats are stored as their raw bits, everything else
//! lives in the quiet-NaN space with a 4-bit tag and a 48-bit payload. Heap
//! references carry an `ObjectId` payload, so comparing two heap values with
//! `==` compares handle identity and never looks at contents.

use crate::gc::ObjectId;
use ahash::RandomState;
use hashbrown::HashMap;
use std::fmt;
use std::hash::Hash;

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

pub fn fast_map_new<K: Eq + Hash, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(fast_hasher())
}

pub fn fast_map_with_capacity<K: Eq + Hash, V>(cap: usize) -> FastHashMap<K, V> {
    HashMap::with_capacity_and_hasher(cap, fast_hasher())
}

// NaN-Boxing constants
pub const QNAN: u64 = 0x7ff8000000000000;
pub const TAG_BASE: u64 = 0xfff0000000000000;
pub const TAG_MASK: u64 = 0x000f000000000000;
pub const PAYLOAD_MASK: u64 = 0x0000ffffffffffff;

pub const TAG_INT: u64 = 0x0001;
pub const TAG_BOOL: u64 = 0x0002;
pub const TAG_UNDEFINED: u64 = 0x0003;

pub const TAG_STR: u64 = 0x0004;
pub const TAG_OBJECT: u64 = 0x0005;

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Value(u64);

impl Default for Value {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

impl Value {
    pub const UNDEFINED: Value = Value(TAG_BASE | (TAG_UNDEFINED << 48));
    pub const TRUE: Value = Value(TAG_BASE | (TAG_BOOL << 48) | 1);
    pub const FALSE: Value = Value(TAG_BASE | (TAG_BOOL << 48));

    #[inline(always)]
    pub fn from_f64(f: f64) -> Self {
        // Canonical NaN keeps payload bits out of the tag space.
        if f.is_nan() {
            return Self(QNAN);
        }
        Self(f.to_bits())
    }

    /// Ints are 48-bit; wider values are truncated.
    #[inline(always)]
    pub fn from_i64(i: i64) -> Self {
        Self(TAG_BASE | (TAG_INT << 48) | (i as u64 & PAYLOAD_MASK))
    }

    #[inline(always)]
    pub fn from_bool(b: bool) -> Self {
        if b { Self::TRUE } else { Self::FALSE }
    }

    #[inline(always)]
    fn from_obj(tag: u64, id: ObjectId) -> Self {
        Self(TAG_BASE | (tag << 48) | (id.0 as u64 & PAYLOAD_MASK))
    }

    pub fn str(id: ObjectId) -> Self {
        Self::from_obj(TAG_STR, id)
    }

    pub fn object(id: ObjectId) -> Self {
        Self::from_obj(TAG_OBJECT, id)
    }

    #[inline(always)]
    pub fn is_f64(&self) -> bool {
        // Tag 0 is never assigned; its only reachable pattern is -inf.
        (self.0 & TAG_BASE) != TAG_BASE || (self.0 & TAG_MASK) == 0
    }
    #[inline(always)]
    pub fn is_int(&self) -> bool {
        (self.0 & 0xffff000000000000) == 0xfff1000000000000
    }
    #[inline(always)]
    pub fn is_bool(&self) -> bool {
        !self.is_f64() && self.get_tag() == TAG_BOOL
    }
    #[inline(always)]
    pub fn is_undefined(&self) -> bool {
        self.0 == Self::UNDEFINED.0
    }
    #[inline(always)]
    pub fn is_str(&self) -> bool {
        !self.is_f64() && self.get_tag() == TAG_STR
    }
    #[inline(always)]
    pub fn is_object(&self) -> bool {
        !self.is_f64() && self.get_tag() == TAG_OBJECT
    }
    /// True for any heap-backed value.
    #[inline(always)]
    pub fn is_heap(&self) -> bool {
        !self.is_f64() && self.get_tag() > TAG_UNDEFINED
    }

    #[inline(always)]
    pub fn as_f64(self) -> f64 {
        f64::from_bits(self.0)
    }

    #[inline(always)]
    pub fn as_i64(&self) -> i64 {
        let val = (self.0 & PAYLOAD_MASK) as i64;
        // Sign extend from 48 bits
        if (val & 0x0000800000000000) != 0 {
            val | -0x0001000000000000
        } else {
            val
        }
    }

    #[inline(always)]
    pub fn as_bool(&self) -> bool {
        (self.0 & 1) != 0
    }

    #[inline(always)]
    pub fn as_obj_id(&self) -> ObjectId {
        ObjectId((self.0 & PAYLOAD_MASK) as usize)
    }

    /// The object handle, if this value is an object (strings excluded).
    #[inline(always)]
    pub fn object_id(&self) -> Option<ObjectId> {
        if self.is_object() {
            Some(self.as_obj_id())
        } else {
            None
        }
    }

    pub fn get_tag(&self) -> u64 {
        if self.is_f64() {
            0
        } else {
            (self.0 & TAG_MASK) >> 48
        }
    }

    pub fn type_name(&self) -> &'static str {
        if self.is_f64() {
            "float"
        } else {
            match self.get_tag() {
                TAG_INT => "int",
                TAG_BOOL => "bool",
                TAG_UNDEFINED => "undefined",
                TAG_STR => "string",
                TAG_OBJECT => "object",
                _ => "unknown",
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_f64() {
            write!(f, "Float({})", self.as_f64())
        } else if self.is_int() {
            write!(f, "Int({})", self.as_i64())
        } else if self.is_bool() {
            write!(f, "Bool({})", self.as_bool())
        } else if self.is_undefined() {
            write!(f, "Undefined")
        } else {
            let id = self.as_obj_id();
            match self.get_tag() {
                TAG_STR => write!(f, "Str(id={:?})", id),
                TAG_OBJECT => write!(f, "Object(id={:?})", id),
                tag => write!(f, "Unknown(tag={}, id={:?})", tag, id),
            }
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::from_i64(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::from_bool(b)
    }
}

/// Declared parameter count of an invocable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(u16),
    /// Accepts any argument count; the call site's arguments pass through as-is.
    Variadic,
}

impl Arity {
    #[inline]
    pub fn accepts(self, argc: usize) -> bool {
        match self {
            Arity::Fixed(n) => n as usize == argc,
            Arity::Variadic => true,
        }
    }

    pub fn is_variadic(self) -> bool {
        matches!(self, Arity::Variadic)
    }
}
