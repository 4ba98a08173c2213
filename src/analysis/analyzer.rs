//! Query analyzer implementation.
//!
//! The analyzer trims the raw query, classifies its language, tokenizes it on
//! Unicode word boundaries (UAX #29), and builds the OR-joined match
//! expression handed to the lexical backend. It performs no I/O and is
//! deterministic for identical input.
//!
//! # Examples
//!
//! ```
//! use xiphos::analysis::{Language, QueryAnalyzer};
//!
//! let analyzer = QueryAnalyzer::new();
//! let analysis = analyzer.analyze("rust search engine");
//!
//! assert_eq!(analysis.language, Language::Default);
//! assert_eq!(analysis.terms, vec!["rust", "search", "engine"]);
//! assert_eq!(analysis.match_expression, "rust OR search OR engine");
//! ```

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::language::Language;

/// Normalized representation of a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnalysis {
    /// The raw query as received (untrimmed).
    pub raw_query: String,
    /// Detected query language.
    pub language: Language,
    /// Non-empty tokens extracted from the query.
    pub terms: Vec<String>,
    /// OR-joined boolean expression for the lexical backend.
    /// Empty if and only if the trimmed query is empty.
    pub match_expression: String,
}

impl QueryAnalysis {
    /// True when the analysis carries nothing searchable.
    ///
    /// Callers must treat this as "no search": no backend may be contacted.
    pub fn is_empty(&self) -> bool {
        self.match_expression.is_empty()
    }
}

/// Analyzer producing a [`QueryAnalysis`] from raw query text.
///
/// Multiple terms are OR-joined (any term may match) so recall stays high for
/// the lexical backend. The precision cost is recovered by ranking.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryAnalyzer;

impl QueryAnalyzer {
    /// Create a new query analyzer.
    pub fn new() -> Self {
        QueryAnalyzer
    }

    /// Analyze a raw query string.
    pub fn analyze(&self, raw_query: &str) -> QueryAnalysis {
        let trimmed = raw_query.trim();
        if trimmed.is_empty() {
            return QueryAnalysis {
                raw_query: raw_query.to_string(),
                language: Language::Default,
                terms: Vec::new(),
                match_expression: String::new(),
            };
        }

        let language = Language::of_query(trimmed);
        let terms = tokenize(trimmed);
        let match_expression = terms.join(" OR ");

        QueryAnalysis {
            raw_query: raw_query.to_string(),
            language,
            terms,
            match_expression,
        }
    }
}

/// Split text into word tokens using Unicode word boundary rules.
///
/// Segments without alphanumeric content (whitespace, punctuation) are
/// dropped. Hangul-bearing segments stay whole; morpheme-level segmentation
/// of Korean is the text store's concern.
fn tokenize(text: &str) -> Vec<String> {
    text.split_word_bounds()
        .filter(|segment| segment.chars().any(|c| c.is_alphanumeric()))
        .map(|segment| segment.to_string())
        .collect()
}
