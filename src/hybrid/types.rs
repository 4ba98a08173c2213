//! Types and data structures for hybrid search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Engine name recorded in [`JudgeInfo::engines_used`] for the lexical path.
pub const ENGINE_LEXICAL: &str = "lexical";
/// Engine name recorded in [`JudgeInfo::engines_used`] for the semantic path.
pub const ENGINE_SEMANTIC: &str = "semantic";

/// Origin of a result's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Ranked by the text-index store.
    Lexical,
    /// Ranked by cosine similarity against the vector store.
    Semantic,
    /// Combined rank-fusion score.
    Fused,
}

/// Strategy selected by the adaptive judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Lexical results were good enough; the semantic backend is skipped.
    LexicalOnly,
    /// Both backends contribute; results are rank-fused.
    Hybrid,
}

/// One ranked hit.
///
/// `score` semantics depend on `match_kind`: the lexical rank score, a
/// cosine-similarity-derived score in `[0, 1]`, or the fused RRF score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Opaque identifier of the matched document.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Short excerpt. Lexical hits carry the store's highlighted snippet;
    /// semantic hits carry a plain truncated excerpt.
    pub snippet: String,
    /// Non-negative score; see `match_kind`.
    pub score: f32,
    /// Origin of the score.
    pub match_kind: MatchKind,
    /// Document creation time, when the store provides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Document update time, when the store provides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Human-readable note on how the result matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_explanation: Option<String>,
}

impl SearchResult {
    /// Create a new search result.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        snippet: impl Into<String>,
        score: f32,
        match_kind: MatchKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            snippet: snippet.into(),
            score,
            match_kind,
            created_at: None,
            updated_at: None,
            match_explanation: None,
        }
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set the update timestamp.
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Set the match explanation.
    pub fn with_match_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.match_explanation = Some(explanation.into());
        self
    }
}

/// Information about a judge decision, attached to hybrid-path responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeInfo {
    /// Selected strategy.
    pub strategy: SearchStrategy,
    /// Engines consulted for the final page; subset of
    /// `{"lexical", "semantic"}`.
    pub engines_used: Vec<String>,
    /// Number of lexical results the decision was based on.
    pub lexical_result_count: usize,
    /// Mean lexical score; 0 when there were no results.
    pub lexical_avg_score: f32,
    /// Fraction of query terms present in the lexical titles and snippets.
    pub term_coverage: f32,
    /// Confidence threshold in effect when the decision was made.
    pub confidence_threshold: f32,
}

/// One page of search results.
///
/// `total` reflects the full count of matches for the applied query,
/// independent of the page size returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultPage {
    /// The ranked results.
    pub results: Vec<SearchResult>,
    /// Full match count for the query.
    pub total: usize,
    /// Present only on hybrid-path responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge_info: Option<JudgeInfo>,
}

impl ResultPage {
    /// Create a new result page.
    pub fn new(results: Vec<SearchResult>, total: usize) -> Self {
        Self {
            results,
            total,
            judge_info: None,
        }
    }

    /// Create an empty page.
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            judge_info: None,
        }
    }

    /// Attach judge information.
    pub fn with_judge_info(mut self, judge_info: JudgeInfo) -> Self {
        self.judge_info = Some(judge_info);
        self
    }

    /// Get the number of results in this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check whether the page has no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
