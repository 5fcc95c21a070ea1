//! Runtime configuration.

/// Runtime configuration options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Guards a function-call site may chain before it goes megamorphic.
    pub call_chain_depth: usize,
    /// Shapes a field-access site remembers at once. A miss on a full site
    /// flushes it back to a single entry.
    pub field_chain_depth: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_CALL_CHAIN_DEPTH: usize = 3;
    pub const DEFAULT_FIELD_CHAIN_DEPTH: usize = 1;

    /// Defaults overridden by `SJS_CALL_IC_DEPTH` / `SJS_FIELD_IC_DEPTH`.
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(n) = env_usize("SJS_CALL_IC_DEPTH") {
            cfg.call_chain_depth = n;
        }
        if let Some(n) = env_usize("SJS_FIELD_IC_DEPTH") {
            cfg.field_chain_depth = n.max(1);
        }
        cfg
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            call_chain_depth: Self::DEFAULT_CALL_CHAIN_DEPTH,
            field_chain_depth: Self::DEFAULT_FIELD_CHAIN_DEPTH,
        }
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
