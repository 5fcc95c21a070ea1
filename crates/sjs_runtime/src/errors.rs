//! Common error message constants used by builtins.

pub mod messages {
    pub const NOT_AN_INT: &str = "Not an int";
    pub const NOT_COMPARABLE: &str = "Not comparable";
}
