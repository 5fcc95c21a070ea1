//! Call-site table.
//!
//! The translator hands out one `SiteId` per dynamic operation together with a
//! `SiteSpec` describing its kind and static arity. The cache for a site is
//! built the first time the site executes and then reused for as long as the
//! site keeps presenting the same spec.

use std::rc::Rc;

use tracing::debug;

use crate::RuntimeConfig;
use crate::ic::{
    CacheStats, FieldCache, FunCallCache, GlobalCallCache, IcState, InlineCache, MethodCallCache,
};

pub type SiteId = usize;

/// Kind and static shape of a call site, as emitted by the translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSpec {
    GlobalCall { name: Rc<str>, argc: usize },
    FunCall { argc: usize },
    FieldGet { name: Rc<str> },
    MethodCall { name: Rc<str>, argc: usize },
}

impl SiteSpec {
    pub fn global_call(name: &str, argc: usize) -> Self {
        SiteSpec::GlobalCall {
            name: Rc::from(name),
            argc,
        }
    }

    pub fn fun_call(argc: usize) -> Self {
        SiteSpec::FunCall { argc }
    }

    pub fn field_get(name: &str) -> Self {
        SiteSpec::FieldGet {
            name: Rc::from(name),
        }
    }

    pub fn method_call(name: &str, argc: usize) -> Self {
        SiteSpec::MethodCall {
            name: Rc::from(name),
            argc,
        }
    }

    pub fn build(&self, config: &RuntimeConfig) -> Rc<dyn InlineCache> {
        match self {
            SiteSpec::GlobalCall { name, argc } => Rc::new(GlobalCallCache::new(name, *argc)),
            SiteSpec::FunCall { argc } => {
                Rc::new(FunCallCache::new(*argc, config.call_chain_depth))
            }
            SiteSpec::FieldGet { name } => {
                Rc::new(FieldCache::with_depth(name, config.field_chain_depth))
            }
            SiteSpec::MethodCall { name, argc } => Rc::new(MethodCallCache::new(
                name,
                *argc,
                config.call_chain_depth,
                config.field_chain_depth,
            )),
        }
    }
}

/// Aggregate view over all live sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheSummary {
    pub sites: usize,
    pub uninitialized: usize,
    pub monomorphic: usize,
    pub polymorphic: usize,
    pub megamorphic: usize,
    pub stats: CacheStats,
}

/// Owns every call-site cache, indexed by `SiteId`.
pub struct CacheManager {
    sites: Vec<Option<(SiteSpec, Rc<dyn InlineCache>)>>,
}

impl CacheManager {
    pub fn new() -> Self {
        Self { sites: Vec::new() }
    }

    /// The cache for `id`, building it from `spec` on first use.
    ///
    /// A site reused with a different spec gets a fresh cache for the new one.
    pub fn site(&mut self, id: SiteId, spec: &SiteSpec, config: &RuntimeConfig) -> Rc<dyn InlineCache> {
        if id >= self.sites.len() {
            self.sites.resize_with(id + 1, || None);
        }
        if let Some((built_for, cache)) = &self.sites[id] {
            if built_for == spec {
                return Rc::clone(cache);
            }
            debug!(target: "sjs::ic", site = id, old = ?built_for, new = ?spec, "site spec changed");
        }
        let cache = spec.build(config);
        self.sites[id] = Some((spec.clone(), Rc::clone(&cache)));
        cache
    }

    pub fn get(&self, id: SiteId) -> Option<Rc<dyn InlineCache>> {
        self.sites
            .get(id)
            .and_then(|s| s.as_ref())
            .map(|(_, cache)| Rc::clone(cache))
    }

    /// Number of sites that have executed at least once.
    pub fn len(&self) -> usize {
        self.sites.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every site; the next execution of each rebuilds it.
    pub fn reset(&mut self) {
        self.sites.clear();
    }

    pub fn summary(&self) -> CacheSummary {
        let mut out = CacheSummary::default();
        for (_, cache) in self.sites.iter().flatten() {
            out.sites += 1;
            match cache.state() {
                IcState::Uninitialized => out.uninitialized += 1,
                IcState::Monomorphic => out.monomorphic += 1,
                IcState::Polymorphic => out.polymorphic += 1,
                IcState::Megamorphic => out.megamorphic += 1,
            }
            out.stats += cache.stats();
        }
        out
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new()
    }
}
