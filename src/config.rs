//! Search configuration.
//!
//! This module provides the tunable parameters read by the adaptive judge and
//! the rank fuser, plus the provider seam through which they are loaded from
//! an external configuration store.
//!
//! Parameters are snapshot-per-request: the orchestrator loads them once at
//! the start of a search and never re-reads them mid-fusion. The cached
//! provider reloads only on an explicit [`CachedParamsProvider::invalidate`]
//! signal.
//!
//! # Examples
//!
//! ```
//! use xiphos::config::SearchParams;
//!
//! let params = SearchParams::default();
//! assert!(params.adaptive_enabled);
//! assert_eq!(params.rrf_k, 60);
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Maximum page size accepted by the orchestrator.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Tunable parameters for the adaptive judge and the rank fuser.
///
/// The `rrf_fts_weight`/`rrf_semantic_weight` overrides replace the
/// per-language fusion defaults when set; `None` keeps the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Whether the adaptive judge may skip the semantic backend.
    pub adaptive_enabled: bool,
    /// Minimum lexical result count for the lexical-only path.
    pub judge_min_results: usize,
    /// Minimum average lexical score for the lexical-only path.
    pub judge_min_avg_score: f32,
    /// Minimum average lexical score for Korean queries.
    pub judge_min_avg_score_ko: f32,
    /// Minimum fraction of query terms covered by lexical results.
    pub judge_min_term_coverage: f32,
    /// Confidence threshold recorded with every judge decision.
    pub judge_confidence_threshold: f32,
    /// RRF smoothing constant.
    pub rrf_k: usize,
    /// Override for the lexical fusion weight.
    pub rrf_fts_weight: Option<f32>,
    /// Override for the semantic fusion weight.
    pub rrf_semantic_weight: Option<f32>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            adaptive_enabled: true,
            judge_min_results: 3,
            judge_min_avg_score: 0.3,
            judge_min_avg_score_ko: 0.2,
            judge_min_term_coverage: 0.5,
            judge_confidence_threshold: 0.5,
            rrf_k: 60,
            rrf_fts_weight: None,
            rrf_semantic_weight: None,
        }
    }
}

/// Provider seam for externally persisted search parameters.
#[async_trait]
pub trait SearchParamsProvider: Send + Sync {
    /// Load the current parameters from the configuration store.
    async fn load(&self) -> Result<SearchParams>;
}

/// Provider returning a fixed parameter set.
///
/// Used for static configuration and in tests.
#[derive(Debug, Clone)]
pub struct StaticParamsProvider {
    params: SearchParams,
}

impl StaticParamsProvider {
    /// Create a provider that always returns `params`.
    pub fn new(params: SearchParams) -> Self {
        Self { params }
    }
}

impl Default for StaticParamsProvider {
    fn default() -> Self {
        Self::new(SearchParams::default())
    }
}

#[async_trait]
impl SearchParamsProvider for StaticParamsProvider {
    async fn load(&self) -> Result<SearchParams> {
        Ok(self.params.clone())
    }
}

/// Caching wrapper around a [`SearchParamsProvider`].
///
/// The first `load` hits the inner provider and caches the snapshot; later
/// loads return the cache until [`CachedParamsProvider::invalidate`] is
/// called (e.g. after an administrator updates the tunables).
pub struct CachedParamsProvider {
    inner: Arc<dyn SearchParamsProvider>,
    cache: RwLock<Option<SearchParams>>,
}

impl CachedParamsProvider {
    /// Wrap `inner` with an invalidation-aware cache.
    pub fn new(inner: Arc<dyn SearchParamsProvider>) -> Self {
        Self {
            inner,
            cache: RwLock::new(None),
        }
    }

    /// Drop the cached snapshot; the next load re-reads the inner provider.
    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }
}

#[async_trait]
impl SearchParamsProvider for CachedParamsProvider {
    async fn load(&self) -> Result<SearchParams> {
        if let Some(params) = self.cache.read().clone() {
            return Ok(params);
        }
        let params = self.inner.load().await?;
        *self.cache.write() = Some(params.clone());
        Ok(params)
    }
}
