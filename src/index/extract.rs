/// Per-file extraction: id, title, description, cleaned body, category,
/// and keywords.
///
/// All text rules live in pattern tables compiled once in
/// [`Extractor::new`]; the control flow below never embeds a pattern inline.
use std::collections::HashSet;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use regex::Regex;

use crate::document::Document;

/// Title used when neither frontmatter nor a level-1 heading yields one.
const DEFAULT_TITLE: &str = "Untitled";

/// Maximum description length before truncation.
const MAX_DESCRIPTION_LEN: usize = 200;

/// Marker appended to truncated descriptions.
const ELLIPSIS: &str = "...";

/// Path keyword → category, evaluated in order; first match wins. Paths can
/// contain several keywords ("framework/guide/..."), so the order here is
/// the tie-break.
const CATEGORY_RULES: [(&str, &str); 7] = [
    ("dashboard", "Dashboard"),
    ("framework", "Framework"),
    ("installation", "Installation"),
    ("install", "Installation"),
    ("component", "Components"),
    ("tutorial", "Tutorials"),
    ("guide", "Guides"),
];

/// Category assigned when no path keyword matches.
pub const GENERAL_CATEGORY: &str = "General";

/// Category carrying the install/deploy score boost at query time.
pub const INSTALLATION_CATEGORY: &str = "Installation";

/// Case-insensitive vocabularies mined for document keywords: product and
/// technology terms, then deployment/operations terms.
const KEYWORD_VOCABULARIES: [&str; 2] = [
    r"(?i)\b(Invictus|Dashboard|Framework|Transco|PubSub|Logic Apps?|Azure|Bicep|Container Apps?)\b",
    r"(?i)\b(deployment|installation|configuration|authentication|migration)\b",
];

/// Compiled extraction patterns. Build once, reuse for every file.
pub struct Extractor {
    frontmatter_title: Regex,
    first_h1: Regex,
    frontmatter_block: Regex,
    heading_line: Regex,
    component_block: Regex,
    import_directive: Regex,
    keyword_vocabs: Vec<Regex>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            frontmatter_title: Regex::new(r#"(?m)^title:\s*["']?([^"'\n]+)["']?"#).unwrap(),
            first_h1: Regex::new(r"(?m)^#\s+(.+)$").unwrap(),
            frontmatter_block: Regex::new(r"(?s)^---.*?---\s*").unwrap(),
            heading_line: Regex::new(r"(?m)^#+\s+.*?$").unwrap(),
            component_block: Regex::new(r"(?s)<[A-Z][^>]*>.*?</[A-Z][^>]*>").unwrap(),
            import_directive: Regex::new(r"import\s+.*?;").unwrap(),
            keyword_vocabs: KEYWORD_VOCABULARIES
                .iter()
                .map(|p| Regex::new(p).unwrap())
                .collect(),
        }
    }

    /// Parse one file's raw markdown into a [`Document`].
    ///
    /// `rel_path` is the `/`-separated path relative to the documentation
    /// root; it seeds both the id and the category.
    pub fn parse(&self, rel_path: &str, raw: &str) -> Document {
        let content = self.clean_markdown(raw);
        let keywords = self.extract_keywords(&content);

        Document {
            id: doc_id(rel_path),
            title: self.extract_title(raw),
            description: self.extract_description(raw),
            content,
            path: rel_path.to_string(),
            category: categorize(rel_path).to_string(),
            keywords,
        }
    }

    /// Frontmatter `title:` first, then the first `#` heading, then the
    /// sentinel.
    fn extract_title(&self, raw: &str) -> String {
        if let Some(caps) = self.frontmatter_title.captures(raw) {
            return caps[1].trim().to_string();
        }
        match self.first_h1.captures(raw) {
            Some(caps) => caps[1].trim().to_string(),
            None => DEFAULT_TITLE.to_string(),
        }
    }

    /// First non-heading, non-frontmatter line, capped at
    /// [`MAX_DESCRIPTION_LEN`] chars.
    fn extract_description(&self, raw: &str) -> String {
        let stripped = self.frontmatter_block.replace(raw, "");
        let stripped = self.heading_line.replace_all(&stripped, "");

        let first_line = stripped.trim().lines().next().unwrap_or("").trim();
        if first_line.chars().count() > MAX_DESCRIPTION_LEN {
            let prefix: String = first_line.chars().take(MAX_DESCRIPTION_LEN).collect();
            format!("{prefix}{ELLIPSIS}")
        } else {
            first_line.to_string()
        }
    }

    /// Strip frontmatter, capitalized component tags (with their inner
    /// content), and import directives.
    fn clean_markdown(&self, raw: &str) -> String {
        let content = self.frontmatter_block.replace(raw, "");
        let content = self.component_block.replace_all(&content, "");
        let content = self.import_directive.replace_all(&content, "");
        content.trim().to_string()
    }

    /// Every distinct vocabulary match, case-folded.
    fn extract_keywords(&self, content: &str) -> HashSet<String> {
        let mut keywords = HashSet::new();
        for vocab in &self.keyword_vocabs {
            for m in vocab.find_iter(content) {
                keywords.insert(m.as_str().to_lowercase());
            }
        }
        keywords
    }
}

/// Stable document id: URL-safe base64 (no padding) of the root-relative
/// path, so the id survives restarts and stays collision-free across files.
pub fn doc_id(rel_path: &str) -> String {
    URL_SAFE_NO_PAD.encode(rel_path.as_bytes())
}

/// Categorize a document by its path, using [`CATEGORY_RULES`] in order.
pub fn categorize(rel_path: &str) -> &'static str {
    let path = rel_path.to_lowercase();
    for (keyword, category) in CATEGORY_RULES {
        if path.contains(keyword) {
            return category;
        }
    }
    GENERAL_CATEGORY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new()
    }

    #[test]
    fn test_title_from_frontmatter() {
        let raw = "---\ntitle: \"Hello World\"\n---\nbody";
        assert_eq!(extractor().extract_title(raw), "Hello World");
    }

    #[test]
    fn test_title_from_unquoted_frontmatter() {
        let raw = "---\ntitle: Plain Title\n---\nbody";
        assert_eq!(extractor().extract_title(raw), "Plain Title");
    }

    #[test]
    fn test_title_from_h1() {
        let raw = "# My Guide\n\nSome intro text.";
        assert_eq!(extractor().extract_title(raw), "My Guide");
    }

    #[test]
    fn test_title_default() {
        let raw = "no headings here, just prose";
        assert_eq!(extractor().extract_title(raw), "Untitled");
    }

    #[test]
    fn test_description_first_paragraph() {
        let raw = "---\ntitle: T\n---\n# Heading\n\nThe actual teaser line.\n\nMore text.";
        assert_eq!(
            extractor().extract_description(raw),
            "The actual teaser line."
        );
    }

    #[test]
    fn test_description_truncation() {
        let long_line = "x".repeat(250);
        let desc = extractor().extract_description(&long_line);
        assert_eq!(desc.chars().count(), 203);
        assert!(desc.ends_with("..."));
        assert!(desc.starts_with("xxx"));
    }

    #[test]
    fn test_description_short_verbatim() {
        let line = "y".repeat(50);
        assert_eq!(extractor().extract_description(&line), line);
    }

    #[test]
    fn test_description_empty_when_nothing_remains() {
        let raw = "---\ntitle: T\n---\n# Only a heading\n";
        assert_eq!(extractor().extract_description(raw), "");
    }

    #[test]
    fn test_clean_markdown_strips_structural_noise() {
        let raw = "---\ntitle: T\n---\nimport Thing from './thing';\n\n<Tabs>\ninner stuff\n</Tabs>\n\nReal content.";
        let cleaned = extractor().clean_markdown(raw);
        assert!(!cleaned.contains("title: T"));
        assert!(!cleaned.contains("import Thing"));
        assert!(!cleaned.contains("inner stuff"));
        assert!(cleaned.contains("Real content."));
    }

    #[test]
    fn test_clean_markdown_keeps_html_lowercase_tags() {
        // Only capitalized (component) tags are stripped
        let raw = "Some <b>bold</b> text";
        assert_eq!(extractor().clean_markdown(raw), "Some <b>bold</b> text");
    }

    #[test]
    fn test_keywords_case_folded_distinct() {
        let raw = "Azure and AZURE and azure, plus the Invictus Dashboard deployment.";
        let doc = extractor().parse("general/page.md", raw);
        assert!(doc.keywords.contains("azure"));
        assert!(doc.keywords.contains("invictus"));
        assert!(doc.keywords.contains("dashboard"));
        assert!(doc.keywords.contains("deployment"));
        // case-folded variants collapse to one entry
        assert_eq!(
            doc.keywords.iter().filter(|k| k.as_str() == "azure").count(),
            1
        );
    }

    #[test]
    fn test_keywords_from_cleaned_body_only() {
        let raw = "---\ntitle: Azure\n---\nNothing matching here.";
        let doc = extractor().parse("general/page.md", raw);
        assert!(doc.keywords.is_empty());
    }

    #[test]
    fn test_category_priority() {
        assert_eq!(categorize("docs/installation/setup.md"), "Installation");
        // "framework" precedes "guide" in the rule table
        assert_eq!(categorize("docs/framework/guide/x.md"), "Framework");
        assert_eq!(categorize("docs/Dashboard/intro.md"), "Dashboard");
        assert_eq!(categorize("docs/misc/readme.md"), "General");
    }

    #[test]
    fn test_doc_id_url_safe_and_distinct() {
        let a = doc_id("framework/transco.md");
        let b = doc_id("framework/pubsub.md");
        assert_ne!(a, b);
        for id in [&a, &b] {
            assert!(!id.contains('+'));
            assert!(!id.contains('/'));
            assert!(!id.contains('='));
        }
    }

    #[test]
    fn test_doc_id_stable() {
        assert_eq!(doc_id("a/b.md"), doc_id("a/b.md"));
    }

    #[test]
    fn test_parse_full_document() {
        let raw = "---\ntitle: Installing the Framework\n---\n# Install\n\nStep-by-step installation of the Invictus Framework on Azure.\n";
        let doc = extractor().parse("framework/installation/index.md", raw);
        assert_eq!(doc.title, "Installing the Framework");
        assert_eq!(doc.category, "Framework");
        assert_eq!(
            doc.description,
            "Step-by-step installation of the Invictus Framework on Azure."
        );
        assert!(doc.keywords.contains("installation"));
        assert!(doc.content.starts_with("# Install"));
        assert_eq!(doc.path, "framework/installation/index.md");
    }
}
