//! Adaptive judge.
//!
//! The judge inspects lexical result quality and decides whether the
//! expensive semantic backend is worth calling. The decision runs once per
//! request, after the lexical search has returned, and is state-free: the
//! same inputs always produce the same decision.
//!
//! Ordering matters: the cheap zero-result check comes first, then a
//! conjunctive quality gate (result count, average score, term coverage).
//! Semantic search is paid for only when lexical signal is weak or absent.

use std::collections::HashSet;

use crate::analysis::{Language, QueryAnalysis};
use crate::config::SearchParams;
use crate::hybrid::types::{
    JudgeInfo, ResultPage, SearchStrategy, ENGINE_LEXICAL, ENGINE_SEMANTIC,
};

/// Decision procedure selecting the search strategy for one request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveJudge;

impl AdaptiveJudge {
    /// Create a new judge.
    pub fn new() -> Self {
        AdaptiveJudge
    }

    /// Decide the strategy for a request given its lexical results.
    ///
    /// With `adaptive_enabled` off the strategy is always
    /// [`SearchStrategy::Hybrid`], regardless of lexical quality. Otherwise
    /// the lexical-only path requires all of: enough results, a high enough
    /// average score (language-specific threshold), and enough of the query
    /// terms covered by the returned titles and snippets.
    pub fn decide(
        &self,
        analysis: &QueryAnalysis,
        lexical_page: &ResultPage,
        params: &SearchParams,
    ) -> JudgeInfo {
        let lexical_result_count = lexical_page.results.len();
        let lexical_avg_score = if lexical_result_count == 0 {
            0.0
        } else {
            let sum: f32 = lexical_page.results.iter().map(|r| r.score).sum();
            sum / lexical_result_count as f32
        };
        let term_coverage = term_coverage(&analysis.terms, lexical_page);

        let min_avg_score = match analysis.language {
            Language::Korean => params.judge_min_avg_score_ko,
            Language::Default => params.judge_min_avg_score,
        };

        let strategy = if !params.adaptive_enabled {
            SearchStrategy::Hybrid
        } else if lexical_result_count == 0 {
            // Lexical found nothing; semantic is the only hope.
            SearchStrategy::Hybrid
        } else if lexical_result_count >= params.judge_min_results
            && lexical_avg_score >= min_avg_score
            && term_coverage >= params.judge_min_term_coverage
        {
            SearchStrategy::LexicalOnly
        } else {
            SearchStrategy::Hybrid
        };

        let engines_used = match strategy {
            SearchStrategy::LexicalOnly => vec![ENGINE_LEXICAL.to_string()],
            SearchStrategy::Hybrid => {
                vec![ENGINE_LEXICAL.to_string(), ENGINE_SEMANTIC.to_string()]
            }
        };

        JudgeInfo {
            strategy,
            engines_used,
            lexical_result_count,
            lexical_avg_score,
            term_coverage,
            confidence_threshold: params.judge_confidence_threshold,
        }
    }
}

/// Fraction of distinct query terms found, case-insensitively, in the
/// concatenation of all returned titles and snippets.
fn term_coverage(terms: &[String], lexical_page: &ResultPage) -> f32 {
    let distinct: HashSet<String> = terms.iter().map(|t| t.to_lowercase()).collect();
    if distinct.is_empty() {
        return 0.0;
    }

    let mut haystack = String::new();
    for result in &lexical_page.results {
        haystack.push_str(&result.title.to_lowercase());
        haystack.push(' ');
        haystack.push_str(&result.snippet.to_lowercase());
        haystack.push(' ');
    }

    let covered = distinct
        .iter()
        .filter(|t| haystack.contains(t.as_str()))
        .count();
    covered as f32 / distinct.len() as f32
}
