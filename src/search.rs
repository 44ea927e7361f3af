//! Term-weighted relevance search over the document index.
use std::cmp::Ordering;
use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::document::{Document, SearchResult};
use crate::index::DocIndex;
use crate::index::extract::INSTALLATION_CATEGORY;

// Scoring weights, per term unless noted.
const TITLE_WEIGHT: f64 = 10.0;
const DESCRIPTION_WEIGHT: f64 = 5.0;
const KEYWORD_WEIGHT: f64 = 3.0;
/// Per whole-word occurrence in title+description+content; uncapped.
const OCCURRENCE_WEIGHT: f64 = 0.5;
/// Applied once to the summed score of installation docs when any term
/// mentions installing or deploying.
const INSTALLATION_BOOST: f64 = 1.5;

// Excerpt window, in chars.
const EXCERPT_BEFORE: usize = 200;
const EXCERPT_LEN: usize = 600;
const FALLBACK_EXCERPT_LEN: usize = 500;
const ELLIPSIS: &str = "...";

/// Read-only query engine over a shared [`DocIndex`].
#[derive(Clone)]
pub struct QueryEngine {
    index: Arc<DocIndex>,
}

impl QueryEngine {
    pub fn new(index: Arc<DocIndex>) -> Self {
        Self { index }
    }

    /// Rank every indexed document against `query` and return at most
    /// `max_results` hits, best first. Documents with no term overlap are
    /// excluded entirely.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }
        let matchers: Vec<Regex> = terms.iter().map(|t| word_matcher(t)).collect();

        let mut scored: Vec<(Arc<Document>, f64)> = self
            .index
            .all()
            .into_iter()
            .filter_map(|doc| {
                let score = score_document(&doc, &terms, &matchers);
                (score > 0.0).then_some((doc, score))
            })
            .collect();

        // Descending score; ties break on ascending id so the ordering is
        // deterministic regardless of store iteration order.
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        scored.truncate(max_results);

        debug!("Query {query:?} matched {} documents", scored.len());

        scored
            .into_iter()
            .map(|(doc, score)| SearchResult {
                id: doc.id.clone(),
                title: doc.title.clone(),
                description: doc.description.clone(),
                content: truncate_content(&doc.content, &terms),
                category: doc.category.clone(),
                score,
            })
            .collect()
    }
}

/// Lower-case and split on whitespace, dropping empty tokens.
fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Whole-word matcher for one (already lower-cased) term.
fn word_matcher(term: &str) -> Regex {
    Regex::new(&format!(r"\b{}\b", regex::escape(term))).unwrap()
}

fn score_document(doc: &Document, terms: &[String], matchers: &[Regex]) -> f64 {
    let title = doc.title.to_lowercase();
    let description = doc.description.to_lowercase();
    let haystack = format!("{} {} {}", doc.title, doc.description, doc.content).to_lowercase();

    let mut score = 0.0;
    for (term, matcher) in terms.iter().zip(matchers) {
        if title.contains(term.as_str()) {
            score += TITLE_WEIGHT;
        }
        if description.contains(term.as_str()) {
            score += DESCRIPTION_WEIGHT;
        }
        if doc.keywords.contains(term) {
            score += KEYWORD_WEIGHT;
        }
        score += matcher.find_iter(&haystack).count() as f64 * OCCURRENCE_WEIGHT;
    }

    if doc.category == INSTALLATION_CATEGORY
        && terms
            .iter()
            .any(|t| t.contains("install") || t.contains("deploy"))
    {
        score *= INSTALLATION_BOOST;
    }

    score
}

/// Excerpt the body around the first query term that occurs anywhere in it.
///
/// Terms are probed in query order, not by earliest text offset; the first
/// term with any occurrence picks the window. With no occurrence at all the
/// excerpt is the leading [`FALLBACK_EXCERPT_LEN`] chars.
fn truncate_content(content: &str, terms: &[String]) -> String {
    let lower = content.to_lowercase();
    let total = content.chars().count();

    for term in terms {
        let Some(byte_idx) = lower.find(term.as_str()) else {
            continue;
        };
        let char_idx = lower[..byte_idx].chars().count();

        let start = char_idx.saturating_sub(EXCERPT_BEFORE);
        let len = EXCERPT_LEN.min(total - start);

        let mut excerpt: String = content.chars().skip(start).take(len).collect();
        if start > 0 {
            excerpt.insert_str(0, ELLIPSIS);
        }
        if start + len < total {
            excerpt.push_str(ELLIPSIS);
        }
        return excerpt;
    }

    if total > FALLBACK_EXCERPT_LEN {
        let prefix: String = content.chars().take(FALLBACK_EXCERPT_LEN).collect();
        format!("{prefix}{ELLIPSIS}")
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn doc(id: &str, title: &str, description: &str, content: &str) -> Document {
        Document {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            content: content.to_string(),
            path: format!("{id}.md"),
            category: "General".to_string(),
            keywords: HashSet::new(),
        }
    }

    fn engine_with(docs: Vec<Document>) -> QueryEngine {
        let index = Arc::new(DocIndex::new());
        for d in docs {
            index.insert(d);
        }
        QueryEngine::new(index)
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let engine = engine_with(vec![doc("a", "Title", "Desc", "Content")]);
        assert!(engine.search("", 10).is_empty());
        assert!(engine.search("   ", 10).is_empty());
    }

    #[test]
    fn test_zero_score_documents_excluded() {
        let engine = engine_with(vec![doc("a", "Alpha", "First letter", "About alpha.")]);
        assert!(engine.search("omega", 10).is_empty());
    }

    #[test]
    fn test_score_accumulation() {
        let mut d = doc(
            "a",
            "Transco Overview",
            "Maps messages",
            "The transco endpoint.",
        );
        d.keywords.insert("transco".to_string());

        let terms = tokenize("transco");
        let matchers: Vec<Regex> = terms.iter().map(|t| word_matcher(t)).collect();
        // title substring (10) + keyword (3) + two whole-word occurrences (1)
        assert_eq!(score_document(&d, &terms, &matchers), 14.0);
    }

    #[test]
    fn test_description_weight() {
        let d = doc("a", "Something Else", "the pipeline guide", "No overlap body.");
        let terms = tokenize("pipeline");
        let matchers: Vec<Regex> = terms.iter().map(|t| word_matcher(t)).collect();
        // description substring (5) + one occurrence (0.5)
        assert_eq!(score_document(&d, &terms, &matchers), 5.5);
    }

    #[test]
    fn test_occurrences_compound_linearly() {
        let d = doc("a", "T", "D", "install steps install");
        let terms = tokenize("install");
        let matchers: Vec<Regex> = terms.iter().map(|t| word_matcher(t)).collect();
        assert_eq!(score_document(&d, &terms, &matchers), 1.0);
    }

    #[test]
    fn test_installation_boost_applied_once_after_summing() {
        let mut d = doc("a", "T", "D", "install steps install");
        d.category = "Installation".to_string();
        let terms = tokenize("install");
        let matchers: Vec<Regex> = terms.iter().map(|t| word_matcher(t)).collect();
        // (2 × 0.5) × 1.5
        assert_eq!(score_document(&d, &terms, &matchers), 1.5);
    }

    #[test]
    fn test_boost_requires_install_or_deploy_term() {
        let mut d = doc("a", "Setup", "D", "setup setup");
        d.category = "Installation".to_string();
        let terms = tokenize("setup");
        let matchers: Vec<Regex> = terms.iter().map(|t| word_matcher(t)).collect();
        // title substring (10) + three whole-word occurrences (1.5), no boost
        assert_eq!(score_document(&d, &terms, &matchers), 11.5);
    }

    #[test]
    fn test_whole_word_matching() {
        let d = doc("a", "T", "D", "reinstallation is not install-able");
        let terms = tokenize("install");
        let matchers: Vec<Regex> = terms.iter().map(|t| word_matcher(t)).collect();
        // "reinstallation" does not match \binstall\b; "install-able" does
        assert_eq!(score_document(&d, &terms, &matchers), 0.5);
    }

    #[test]
    fn test_results_sorted_descending_with_id_tiebreak() {
        let engine = engine_with(vec![
            doc("b", "alpha", "", "alpha"),
            doc("a", "alpha", "", "alpha"),
            doc("c", "no match title", "", "alpha"),
        ]);

        let results = engine.search("alpha", 10);
        assert_eq!(results.len(), 3);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // a and b tie; ascending id breaks it
        assert_eq!(results[0].id, "a");
        assert_eq!(results[1].id, "b");
        assert_eq!(results[2].id, "c");
    }

    #[test]
    fn test_max_results_truncates() {
        let engine = engine_with(vec![
            doc("a", "alpha", "", "alpha"),
            doc("b", "alpha", "", "alpha"),
            doc("c", "alpha", "", "alpha"),
        ]);
        assert_eq!(engine.search("alpha", 2).len(), 2);
    }

    #[test]
    fn test_excerpt_window_at_end_of_content() {
        let content = format!("{}needle{}", "a".repeat(900), "b".repeat(94));
        assert_eq!(content.chars().count(), 1000);

        let excerpt = truncate_content(&content, &tokenize("needle"));
        // window [700, 1000): leading ellipsis, no trailing one
        assert!(excerpt.starts_with("..."));
        assert!(excerpt.ends_with('b'));
        assert!(excerpt.contains("needle"));
        assert_eq!(excerpt.chars().count(), 303);
    }

    #[test]
    fn test_excerpt_window_at_start_of_content() {
        let content = format!("needle{}", "x".repeat(1000));
        let excerpt = truncate_content(&content, &tokenize("needle"));
        assert!(excerpt.starts_with("needle"));
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), 603);
    }

    #[test]
    fn test_excerpt_prefers_first_term_in_query_order() {
        // "zebra" occurs earliest in the text, but "apple" is the first
        // query term with any occurrence, so the window centers on it.
        let content = format!("zebra {}apple{}", "m".repeat(794), "n".repeat(200));
        let excerpt = truncate_content(&content, &tokenize("apple zebra"));
        assert!(excerpt.starts_with("..."));
        assert!(excerpt.contains("apple"));
        assert!(!excerpt.contains("zebra"));
    }

    #[test]
    fn test_excerpt_fallback_without_match() {
        let long = "z".repeat(600);
        let excerpt = truncate_content(&long, &tokenize("absent"));
        assert_eq!(excerpt.chars().count(), 503);
        assert!(excerpt.ends_with("..."));

        let short = "short body";
        assert_eq!(truncate_content(short, &tokenize("absent")), short);
    }
}
