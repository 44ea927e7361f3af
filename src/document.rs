use std::collections::HashSet;

/// A single indexed documentation page.
///
/// Built once by the indexer and never mutated afterwards; the store hands
/// out shared references only.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// URL-safe base64 (no padding) of the root-relative path.
    pub id: String,
    pub title: String,
    /// First body line, capped at 200 chars with a trailing `...`.
    pub description: String,
    /// Body with frontmatter, component markup, and import directives removed.
    pub content: String,
    /// Root-relative path, `/`-separated. Informational only.
    pub path: String,
    pub category: String,
    /// Case-folded vocabulary matches from the body.
    pub keywords: HashSet<String>,
}

/// One ranked hit produced by the query engine.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Bounded excerpt of the body, windowed around the first term match.
    pub content: String,
    pub category: String,
    /// Relative relevance only; not normalized to any range.
    pub score: f64,
}
