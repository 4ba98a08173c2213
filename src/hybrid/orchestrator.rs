//! Hybrid search orchestrator.
//!
//! This module provides the [`HybridOrchestrator`] that coordinates query
//! analysis, the lexical and semantic adapters, the adaptive judge, and rank
//! fusion into the two public operations: single-shot [`search`] and
//! two-phase [`search_progressive`].
//!
//! Backend failures are absorbed as empty sub-results: the orchestrator never
//! raises on a single backend's failure as long as at least one backend path
//! was attempted. Only structurally invalid requests are hard errors.
//!
//! [`search`]: HybridOrchestrator::search
//! [`search_progressive`]: HybridOrchestrator::search_progressive
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use xiphos::config::StaticParamsProvider;
//! use xiphos::hybrid::HybridOrchestrator;
//! use xiphos::lexical::LexicalSearchAdapter;
//! use xiphos::semantic::SemanticSearchAdapter;
//!
//! # async fn example(
//! #     lexical: LexicalSearchAdapter,
//! #     semantic: SemanticSearchAdapter,
//! # ) -> xiphos::error::Result<()> {
//! let orchestrator = HybridOrchestrator::new(
//!     lexical,
//!     semantic,
//!     Arc::new(StaticParamsProvider::default()),
//! );
//!
//! // Single-shot search
//! let page = orchestrator.search("rust programming", 10, 0).await?;
//!
//! // Progressive search: at most two pages, fast lexical first
//! let mut rx = orchestrator.search_progressive("rust programming", 10)?;
//! while let Some(page) = rx.recv().await {
//!     println!("{} results", page.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::analysis::{QueryAnalysis, QueryAnalyzer};
use crate::config::{SearchParams, SearchParamsProvider, MAX_PAGE_SIZE};
use crate::error::{Result, XiphosError};
use crate::hybrid::fusion;
use crate::hybrid::judge::AdaptiveJudge;
use crate::hybrid::types::{JudgeInfo, ResultPage, SearchStrategy};
use crate::lexical::LexicalSearchAdapter;
use crate::semantic::SemanticSearchAdapter;

/// Top-level coordinator for hybrid search.
///
/// Cheap to clone; the adapters and the params provider are shared.
#[derive(Clone)]
pub struct HybridOrchestrator {
    analyzer: QueryAnalyzer,
    judge: AdaptiveJudge,
    lexical: LexicalSearchAdapter,
    semantic: SemanticSearchAdapter,
    params_provider: Arc<dyn SearchParamsProvider>,
}

impl HybridOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `lexical` - Adapter over the text-index store
    /// * `semantic` - Adapter over the embedding provider and vector store
    /// * `params_provider` - Source of the per-request parameter snapshot
    pub fn new(
        lexical: LexicalSearchAdapter,
        semantic: SemanticSearchAdapter,
        params_provider: Arc<dyn SearchParamsProvider>,
    ) -> Self {
        Self {
            analyzer: QueryAnalyzer::new(),
            judge: AdaptiveJudge::new(),
            lexical,
            semantic,
            params_provider,
        }
    }

    /// Execute a single-shot hybrid search.
    ///
    /// The lexical backend always runs first; the judge then decides whether
    /// the semantic backend is consulted and the lists rank-fused. The
    /// returned page carries [`JudgeInfo`] describing the decision.
    ///
    /// An empty or whitespace-only query returns an empty page without
    /// contacting any backend.
    pub async fn search(&self, query: &str, limit: usize, offset: usize) -> Result<ResultPage> {
        validate_limit(limit)?;

        let analysis = self.analyzer.analyze(query);
        if analysis.is_empty() {
            return Ok(ResultPage::empty());
        }

        let params = self.load_params().await;
        let lexical_page = self.run_lexical(&analysis, limit, offset).await;
        let judge_info = self.judge.decide(&analysis, &lexical_page, &params);
        debug!(
            query = %analysis.raw_query.trim(),
            language = ?analysis.language,
            strategy = ?judge_info.strategy,
            lexical_results = judge_info.lexical_result_count,
            term_coverage = judge_info.term_coverage,
            "judge decision"
        );

        if judge_info.strategy == SearchStrategy::LexicalOnly {
            // The lexical page is returned unmodified: entries keep their
            // lexical match kind and the store's ranking.
            return Ok(lexical_page.with_judge_info(judge_info));
        }

        let semantic_page = self.run_semantic(&analysis.raw_query, limit, offset).await;
        Ok(self.fuse(&analysis, &params, &lexical_page, &semantic_page, limit, judge_info))
    }

    /// Execute a two-phase progressive search.
    ///
    /// The returned receiver yields at most two pages, in order:
    ///
    /// 1. The lexical page, emitted as soon as the lexical backend returns.
    /// 2. If the judge selects the hybrid path, the fused page (with
    ///    [`JudgeInfo`] attached); otherwise the channel closes after the
    ///    first page and the semantic backend is never invoked.
    ///
    /// Phase 2 supersedes phase 1 for display purposes. Dropping the receiver
    /// cancels the search; cancellation observed at the phase boundary
    /// prevents the semantic and embedding calls.
    ///
    /// An empty or whitespace-only query closes the channel with zero
    /// emissions and zero backend calls.
    pub fn search_progressive(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<mpsc::Receiver<ResultPage>> {
        validate_limit(limit)?;

        // Capacity 2: both phases can be emitted without waiting on a
        // consumer.
        let (tx, rx) = mpsc::channel(2);

        let analysis = self.analyzer.analyze(query);
        if analysis.is_empty() {
            // Dropping the sender closes the stream with zero emissions.
            return Ok(rx);
        }

        let orchestrator = self.clone();
        tokio::spawn(async move {
            orchestrator.run_progressive(analysis, limit, tx).await;
        });

        Ok(rx)
    }

    async fn run_progressive(
        self,
        analysis: QueryAnalysis,
        limit: usize,
        tx: mpsc::Sender<ResultPage>,
    ) {
        let params = self.load_params().await;
        let lexical_page = self.run_lexical(&analysis, limit, 0).await;

        let phase1 = ResultPage::new(lexical_page.results.clone(), lexical_page.total);
        if tx.send(phase1).await.is_err() {
            debug!("progressive search cancelled before phase 1 delivery");
            return;
        }

        let judge_info = self.judge.decide(&analysis, &lexical_page, &params);
        if judge_info.strategy == SearchStrategy::LexicalOnly {
            debug!("lexical results sufficient, closing after phase 1");
            return;
        }

        // Cancellation check at the phase boundary, before any semantic or
        // embedding call is issued.
        if tx.is_closed() {
            debug!("progressive search cancelled at phase boundary");
            return;
        }

        let semantic_page = self.run_semantic(&analysis.raw_query, limit, 0).await;
        let phase2 = self.fuse(
            &analysis,
            &params,
            &lexical_page,
            &semantic_page,
            limit,
            judge_info,
        );
        let _ = tx.send(phase2).await;
    }

    fn fuse(
        &self,
        analysis: &QueryAnalysis,
        params: &SearchParams,
        lexical_page: &ResultPage,
        semantic_page: &ResultPage,
        limit: usize,
        judge_info: JudgeInfo,
    ) -> ResultPage {
        let (k, w_lexical, w_semantic) = fusion::rrf_params(analysis, params);
        let mut fused = fusion::merge(
            &lexical_page.results,
            &semantic_page.results,
            k,
            w_lexical,
            w_semantic,
        );
        let total = fused.len();
        fused.truncate(limit);
        ResultPage::new(fused, total).with_judge_info(judge_info)
    }

    async fn run_lexical(
        &self,
        analysis: &QueryAnalysis,
        limit: usize,
        offset: usize,
    ) -> ResultPage {
        match self.lexical.search(analysis, limit, offset).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "lexical backend degraded, continuing without it");
                ResultPage::empty()
            }
        }
    }

    async fn run_semantic(&self, raw_query: &str, limit: usize, offset: usize) -> ResultPage {
        match self.semantic.search(raw_query, limit, offset).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "semantic backend degraded, continuing without it");
                ResultPage::empty()
            }
        }
    }

    async fn load_params(&self) -> SearchParams {
        match self.params_provider.load().await {
            Ok(params) => params,
            Err(e) => {
                warn!(error = %e, "search params unavailable, using defaults");
                SearchParams::default()
            }
        }
    }
}

/// Reject structurally invalid page sizes before any backend call.
fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(XiphosError::invalid_argument("limit must be positive"));
    }
    if limit > MAX_PAGE_SIZE {
        return Err(XiphosError::invalid_argument(format!(
            "limit {limit} exceeds maximum page size {MAX_PAGE_SIZE}"
        )));
    }
    Ok(())
}
