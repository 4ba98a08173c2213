//! End-to-end tests for the hybrid orchestrator over mock backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use xiphos::config::{SearchParams, StaticParamsProvider};
use xiphos::embedding::TextEmbedder;
use xiphos::error::{Result, XiphosError};
use xiphos::hybrid::{HybridOrchestrator, MatchKind, SearchStrategy};
use xiphos::lexical::{LexicalHits, LexicalRow, LexicalSearchAdapter, TextIndexStore};
use xiphos::semantic::{SemanticSearchAdapter, VectorRow, VectorStore};

struct MockTextIndexStore {
    rows: Vec<LexicalRow>,
    total: usize,
    fail: bool,
    calls: AtomicUsize,
}

impl MockTextIndexStore {
    fn with_rows(rows: Vec<LexicalRow>) -> Arc<Self> {
        let total = rows.len();
        Arc::new(Self {
            rows,
            total,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn empty() -> Arc<Self> {
        Self::with_rows(Vec::new())
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            rows: Vec::new(),
            total: 0,
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextIndexStore for MockTextIndexStore {
    async fn query_lexical(
        &self,
        _match_expression: &str,
        _limit: usize,
        _offset: usize,
    ) -> Result<LexicalHits> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(XiphosError::lexical_backend("index offline"));
        }
        Ok(LexicalHits {
            rows: self.rows.clone(),
            total: self.total,
        })
    }
}

struct MockVectorStore {
    rows: Vec<VectorRow>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockVectorStore {
    fn with_rows(rows: Vec<VectorRow>) -> Arc<Self> {
        Arc::new(Self {
            rows,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn empty() -> Arc<Self> {
        Self::with_rows(Vec::new())
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            rows: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn query_similar(
        &self,
        _vector: &[f32],
        _limit: usize,
        _offset: usize,
    ) -> Result<Vec<VectorRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(XiphosError::vector_backend("vector store offline"));
        }
        Ok(self.rows.clone())
    }
}

struct MockEmbedder {
    calls: AtomicUsize,
}

impl MockEmbedder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextEmbedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![text.len() as f32, 1.0, 0.0])
    }

    fn dimension(&self) -> usize {
        3
    }

    fn name(&self) -> &str {
        "mock-embedder"
    }
}

fn lexical_row(id: &str, title: &str, snippet: &str, score: f32) -> LexicalRow {
    LexicalRow {
        id: id.to_string(),
        title: title.to_string(),
        score,
        snippet: snippet.to_string(),
        created_at: None,
        updated_at: None,
    }
}

fn vector_row(id: &str, distance: f32) -> VectorRow {
    VectorRow {
        id: id.to_string(),
        title: format!("semantic title {id}"),
        chunk_text: format!("passage for {id}"),
        cosine_distance: distance,
        created_at: None,
        updated_at: None,
    }
}

fn orchestrator(
    text_store: Arc<MockTextIndexStore>,
    vector_store: Arc<MockVectorStore>,
    embedder: Arc<MockEmbedder>,
    params: SearchParams,
) -> HybridOrchestrator {
    HybridOrchestrator::new(
        LexicalSearchAdapter::new(text_store),
        SemanticSearchAdapter::new(embedder, vector_store),
        Arc::new(StaticParamsProvider::new(params)),
    )
}

/// Judge thresholds shared by most scenarios below.
fn scenario_params() -> SearchParams {
    SearchParams {
        judge_min_results: 3,
        judge_min_avg_score: 0.1,
        judge_min_avg_score_ko: 0.1,
        judge_min_term_coverage: 0.5,
        ..SearchParams::default()
    }
}

#[tokio::test]
async fn empty_query_makes_no_backend_calls() {
    let text_store = MockTextIndexStore::empty();
    let vector_store = MockVectorStore::empty();
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    for query in ["", "   ", "\t\n"] {
        let page = engine.search(query, 10, 0).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
        assert!(page.judge_info.is_none());
    }

    assert_eq!(text_store.calls(), 0);
    assert_eq!(vector_store.calls(), 0);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn empty_query_progressive_closes_without_emissions() {
    let text_store = MockTextIndexStore::empty();
    let vector_store = MockVectorStore::empty();
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    let mut rx = engine.search_progressive("   ", 10).unwrap();
    assert!(rx.recv().await.is_none());

    assert_eq!(text_store.calls(), 0);
    assert_eq!(vector_store.calls(), 0);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn high_quality_lexical_results_skip_semantic() {
    // Four strong results all containing the query term.
    let text_store = MockTextIndexStore::with_rows(vec![
        lexical_row("1", "research methods", "about research", 0.9),
        lexical_row("2", "applied research", "more research", 0.85),
        lexical_row("3", "a study", "research notes", 0.8),
        lexical_row("4", "research data", "datasets", 0.75),
    ]);
    let vector_store = MockVectorStore::with_rows(vec![vector_row("9", 0.1)]);
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    let page = engine.search("research", 10, 0).await.unwrap();

    let judge_info = page.judge_info.as_ref().unwrap();
    assert_eq!(judge_info.strategy, SearchStrategy::LexicalOnly);
    assert_eq!(judge_info.engines_used, vec!["lexical"]);
    assert_eq!(page.results.len(), 4);
    assert!(page.results.iter().all(|r| r.match_kind == MatchKind::Lexical));
    // The semantic backend was never invoked.
    assert_eq!(vector_store.calls(), 0);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn zero_lexical_results_escalate_to_hybrid() {
    let text_store = MockTextIndexStore::empty();
    let vector_store = MockVectorStore::with_rows(vec![vector_row("1", 0.2)]);
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    let page = engine.search("obscure quantum artifact", 10, 0).await.unwrap();

    let judge_info = page.judge_info.as_ref().unwrap();
    assert_eq!(judge_info.strategy, SearchStrategy::Hybrid);
    assert_eq!(judge_info.engines_used, vec!["lexical", "semantic"]);
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].id, "1");
    assert_eq!(page.results[0].match_kind, MatchKind::Fused);
    // Semantic rank 0 with default non-Korean weights.
    assert_eq!(page.results[0].score, 0.4 / 60.0);
    assert_eq!(embedder.calls(), 1);
    assert_eq!(vector_store.calls(), 1);
}

#[tokio::test]
async fn adaptive_disabled_always_runs_semantic() {
    let text_store = MockTextIndexStore::with_rows(vec![
        lexical_row("1", "research", "research", 0.9),
        lexical_row("2", "research", "research", 0.9),
        lexical_row("3", "research", "research", 0.9),
        lexical_row("4", "research", "research", 0.9),
    ]);
    let vector_store = MockVectorStore::with_rows(vec![vector_row("1", 0.2)]);
    let embedder = MockEmbedder::new();
    let params = SearchParams {
        adaptive_enabled: false,
        ..scenario_params()
    };
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        params,
    );

    let page = engine.search("research", 10, 0).await.unwrap();

    assert_eq!(
        page.judge_info.as_ref().unwrap().strategy,
        SearchStrategy::Hybrid
    );
    assert!(page.results.iter().all(|r| r.match_kind == MatchKind::Fused));
    assert_eq!(vector_store.calls(), 1);
}

#[tokio::test]
async fn lexical_failure_falls_back_to_semantic_only() {
    let text_store = MockTextIndexStore::failing();
    let vector_store = MockVectorStore::with_rows(vec![vector_row("7", 0.3)]);
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    let page = engine.search("rust", 10, 0).await.unwrap();

    // The judge saw zero lexical results and chose the hybrid path.
    assert_eq!(
        page.judge_info.as_ref().unwrap().strategy,
        SearchStrategy::Hybrid
    );
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].id, "7");
    assert_eq!(page.results[0].match_kind, MatchKind::Fused);
}

#[tokio::test]
async fn semantic_failure_falls_back_to_lexical_contributions() {
    // Weak lexical results force the hybrid path, then the vector store dies.
    let text_store = MockTextIndexStore::with_rows(vec![lexical_row(
        "1",
        "rust runtime",
        "tokio notes",
        0.4,
    )]);
    let vector_store = MockVectorStore::failing();
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    let page = engine.search("rust", 10, 0).await.unwrap();

    assert_eq!(
        page.judge_info.as_ref().unwrap().strategy,
        SearchStrategy::Hybrid
    );
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].id, "1");
    assert_eq!(page.results[0].match_kind, MatchKind::Fused);
    assert_eq!(page.results[0].score, 0.6 / 60.0);
}

#[tokio::test]
async fn both_backends_failing_still_returns_a_page() {
    let engine = orchestrator(
        MockTextIndexStore::failing(),
        MockVectorStore::failing(),
        MockEmbedder::new(),
        scenario_params(),
    );

    let page = engine.search("rust", 10, 0).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(
        page.judge_info.as_ref().unwrap().strategy,
        SearchStrategy::Hybrid
    );
}

#[tokio::test]
async fn korean_query_uses_korean_fusion_weights() {
    // A single weak lexical hit keeps the judge on the hybrid path.
    let text_store = MockTextIndexStore::with_rows(vec![lexical_row(
        "lex",
        "연구 자료",
        "연구",
        0.05,
    )]);
    let vector_store = MockVectorStore::with_rows(vec![vector_row("sem", 0.2)]);
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    let page = engine.search("연구", 10, 0).await.unwrap();

    let lex = page.results.iter().find(|r| r.id == "lex").unwrap();
    let sem = page.results.iter().find(|r| r.id == "sem").unwrap();
    // Korean weights (0.70, 0.30), both documents at rank 0 of their lists.
    assert_eq!(lex.score, 0.7 / 60.0);
    assert_eq!(sem.score, 0.3 / 60.0);
}

#[tokio::test]
async fn progressive_hybrid_emits_two_ordered_pages() {
    let text_store = MockTextIndexStore::with_rows(vec![lexical_row(
        "1",
        "rust runtime",
        "tokio notes",
        0.4,
    )]);
    let vector_store = MockVectorStore::with_rows(vec![vector_row("2", 0.2)]);
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    let mut rx = engine.search_progressive("rust", 10).unwrap();

    let phase1 = rx.recv().await.unwrap();
    assert!(phase1.results.iter().all(|r| r.match_kind == MatchKind::Lexical));
    assert!(phase1.judge_info.is_none());

    let phase2 = rx.recv().await.unwrap();
    assert!(phase2.results.iter().all(|r| r.match_kind == MatchKind::Fused));
    assert_eq!(phase2.results.len(), 2);
    assert_eq!(
        phase2.judge_info.as_ref().unwrap().strategy,
        SearchStrategy::Hybrid
    );

    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn progressive_lexical_only_emits_single_page() {
    let text_store = MockTextIndexStore::with_rows(vec![
        lexical_row("1", "research methods", "about research", 0.9),
        lexical_row("2", "applied research", "more research", 0.85),
        lexical_row("3", "a study", "research notes", 0.8),
    ]);
    let vector_store = MockVectorStore::with_rows(vec![vector_row("9", 0.1)]);
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    let mut rx = engine.search_progressive("research", 10).unwrap();

    let phase1 = rx.recv().await.unwrap();
    assert_eq!(phase1.results.len(), 3);
    assert!(phase1.results.iter().all(|r| r.match_kind == MatchKind::Lexical));

    // Stream ends after phase 1; the semantic backend was never invoked.
    assert!(rx.recv().await.is_none());
    assert_eq!(vector_store.calls(), 0);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn progressive_cancellation_prevents_semantic_calls() {
    let text_store = MockTextIndexStore::with_rows(vec![lexical_row(
        "1",
        "rust runtime",
        "tokio notes",
        0.4,
    )]);
    let vector_store = MockVectorStore::with_rows(vec![vector_row("2", 0.2)]);
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    let rx = engine.search_progressive("rust", 10).unwrap();
    // Abandon the query before consuming anything.
    drop(rx);

    // Give the spawned search time to observe the cancellation.
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(vector_store.calls(), 0);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn invalid_limit_is_rejected_before_backend_calls() {
    let text_store = MockTextIndexStore::empty();
    let vector_store = MockVectorStore::empty();
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    assert!(matches!(
        engine.search("rust", 0, 0).await,
        Err(XiphosError::InvalidArgument(_))
    ));
    assert!(matches!(
        engine.search("rust", 100_000, 0).await,
        Err(XiphosError::InvalidArgument(_))
    ));
    assert!(matches!(
        engine.search_progressive("rust", 0),
        Err(XiphosError::InvalidArgument(_))
    ));

    assert_eq!(text_store.calls(), 0);
    assert_eq!(vector_store.calls(), 0);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn fused_page_total_counts_the_union() {
    let text_store = MockTextIndexStore::with_rows(vec![
        lexical_row("a", "shared doc", "weak match", 0.05),
        lexical_row("b", "lexical doc", "weak match", 0.04),
    ]);
    let vector_store =
        MockVectorStore::with_rows(vec![vector_row("a", 0.1), vector_row("c", 0.3)]);
    let embedder = MockEmbedder::new();
    let engine = orchestrator(
        text_store.clone(),
        vector_store.clone(),
        embedder.clone(),
        scenario_params(),
    );

    let page = engine.search("anything", 10, 0).await.unwrap();

    // a is shared; b and c are unique to one backend each.
    assert_eq!(page.total, 3);
    assert_eq!(page.results.len(), 3);
    let shared = page.results.iter().find(|r| r.id == "a").unwrap();
    assert_eq!(
        shared.match_explanation.as_deref(),
        Some("lexical rank 1 + semantic rank 1")
    );
}
