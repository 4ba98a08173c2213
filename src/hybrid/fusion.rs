//! Weighted Reciprocal Rank Fusion.
//!
//! Merges the lexical and semantic result lists into one ranked list using
//! weighted RRF, a simple and effective method for combining ranked lists
//! from different retrieval systems.
//!
//! ## Algorithm
//!
//! RRF score for document d:
//! ```text
//! RRF(d) = Σ weight_i / (k + rank_i(d))
//! ```
//!
//! Where:
//! - k is a smoothing constant (default 60)
//! - rank_i(d) is the 0-indexed position of d in list i
//! - weight_i is the importance weight for list i
//!
//! A document present in both lists sums both contributions, which rewards
//! cross-backend agreement.

use ahash::AHashMap;

use crate::analysis::{Language, QueryAnalysis};
use crate::config::SearchParams;
use crate::hybrid::types::{MatchKind, SearchResult};

/// Default RRF smoothing constant.
pub const DEFAULT_RRF_K: usize = 60;

/// Default lexical weight for non-Korean queries.
pub const DEFAULT_LEXICAL_WEIGHT: f32 = 0.60;
/// Default semantic weight for non-Korean queries.
pub const DEFAULT_SEMANTIC_WEIGHT: f32 = 0.40;

/// Lexical weight for Korean queries. Korean lexical matching is strong once
/// morpheme tokenization has done its job, so it gets the larger share.
pub const KOREAN_LEXICAL_WEIGHT: f32 = 0.70;
/// Semantic weight for Korean queries.
pub const KOREAN_SEMANTIC_WEIGHT: f32 = 0.30;

/// Resolve the RRF parameters for a query.
///
/// Returns `(k, lexical_weight, semantic_weight)`. The per-language defaults
/// apply unless [`SearchParams`] overrides them.
pub fn rrf_params(analysis: &QueryAnalysis, params: &SearchParams) -> (usize, f32, f32) {
    let (default_lexical, default_semantic) = match analysis.language {
        Language::Korean => (KOREAN_LEXICAL_WEIGHT, KOREAN_SEMANTIC_WEIGHT),
        Language::Default => (DEFAULT_LEXICAL_WEIGHT, DEFAULT_SEMANTIC_WEIGHT),
    };

    (
        params.rrf_k,
        params.rrf_fts_weight.unwrap_or(default_lexical),
        params.rrf_semantic_weight.unwrap_or(default_semantic),
    )
}

struct FusedEntry {
    result: SearchResult,
    score: f32,
    lexical_rank: Option<usize>,
    semantic_rank: Option<usize>,
}

/// Fuse lexical and semantic results using weighted Reciprocal Rank Fusion.
///
/// Both input lists are expected to be sorted best-first; ranks are assigned
/// 0-based by list order. Title/snippet metadata comes from the first list a
/// document was seen in, so lexical metadata (with its highlighted snippets)
/// wins when a document appears in both. The output is sorted by fused score
/// descending, ties staying in first-seen order, and every entry is tagged
/// [`MatchKind::Fused`].
pub fn merge(
    lexical: &[SearchResult],
    semantic: &[SearchResult],
    k: usize,
    w_lexical: f32,
    w_semantic: f32,
) -> Vec<SearchResult> {
    let mut entries: Vec<FusedEntry> = Vec::with_capacity(lexical.len() + semantic.len());
    let mut index: AHashMap<String, usize> = AHashMap::new();

    for (rank, result) in lexical.iter().enumerate() {
        let contribution = w_lexical / (k + rank) as f32;
        entries.push(FusedEntry {
            result: result.clone(),
            score: contribution,
            lexical_rank: Some(rank),
            semantic_rank: None,
        });
        index.insert(result.id.clone(), entries.len() - 1);
    }

    for (rank, result) in semantic.iter().enumerate() {
        let contribution = w_semantic / (k + rank) as f32;
        match index.get(&result.id) {
            Some(&i) => {
                entries[i].score += contribution;
                entries[i].semantic_rank = Some(rank);
            }
            None => {
                entries.push(FusedEntry {
                    result: result.clone(),
                    score: contribution,
                    lexical_rank: None,
                    semantic_rank: Some(rank),
                });
                index.insert(result.id.clone(), entries.len() - 1);
            }
        }
    }

    // Stable sort keeps first-seen order for equal scores.
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    entries
        .into_iter()
        .map(|entry| {
            let mut result = entry.result;
            result.score = entry.score;
            result.match_kind = MatchKind::Fused;
            result.match_explanation = Some(explain(entry.lexical_rank, entry.semantic_rank));
            result
        })
        .collect()
}

fn explain(lexical_rank: Option<usize>, semantic_rank: Option<usize>) -> String {
    match (lexical_rank, semantic_rank) {
        (Some(l), Some(s)) => format!("lexical rank {} + semantic rank {}", l + 1, s + 1),
        (Some(l), None) => format!("lexical rank {}", l + 1),
        (None, Some(s)) => format!("semantic rank {}", s + 1),
        (None, None) => unreachable!("fused entry with no source rank"),
    }
}
