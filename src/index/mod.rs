//! In-memory documentation index.
//!
//! A single initialization pass resolves the docs root, walks it, and parses
//! every markdown file into a [`Document`]. Queries only ever read.
pub mod extract;
pub mod roots;

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use ignore::WalkBuilder;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::document::Document;
use self::extract::Extractor;
pub use self::roots::IndexError;
use self::roots::resolve_docs_root;

/// Concurrent id → [`Document`] store plus the parsing pipeline.
///
/// Writes happen only during [`DocIndex::initialize`]; reads are shared and
/// never block each other.
pub struct DocIndex {
    store: RwLock<HashMap<String, Arc<Document>>>,
    extractor: Extractor,
    initialized: AtomicBool,
}

impl Default for DocIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DocIndex {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            extractor: Extractor::new(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Resolve the documentation root and index it. Idempotent: once a pass
    /// has succeeded, further calls are no-ops. A failed resolution leaves
    /// the index uninitialized so startup policy can retry.
    pub fn initialize(&self, config: &Config) -> Result<usize, IndexError> {
        if self.initialized.load(Ordering::SeqCst) {
            return Ok(self.len());
        }

        info!("Starting documentation indexing...");
        let cwd = std::env::current_dir()?;
        let root = resolve_docs_root(config, &cwd)?;

        let indexed = self.index_directory(&root);
        self.initialized.store(true, Ordering::SeqCst);
        info!(
            "Indexed {indexed} documentation pages from: {}",
            root.display()
        );

        Ok(indexed)
    }

    /// Walk `root` recursively and index every markdown file. A failure on
    /// one file is logged and skipped; the pass always completes.
    pub fn index_directory(&self, root: &Path) -> usize {
        let walker = WalkBuilder::new(root).hidden(false).build();
        let mut indexed = 0usize;

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            let ext = path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            if !matches!(ext, "md" | "mdx") {
                continue;
            }

            match self.index_file(root, path) {
                Ok(()) => indexed += 1,
                Err(e) => warn!("Error indexing file {}: {e}", path.display()),
            }
        }

        indexed
    }

    fn index_file(&self, root: &Path, path: &Path) -> std::io::Result<()> {
        let raw = std::fs::read_to_string(path)?;

        // Store consistent '/'-separated root-relative paths on all platforms.
        let rel = path.strip_prefix(root).unwrap_or(path);
        let rel = rel.to_string_lossy().replace('\\', "/");

        let doc = self.extractor.parse(&rel, &raw);
        debug!("Indexed: {} ({})", doc.title, doc.id);
        self.insert(doc);
        Ok(())
    }

    /// Insert a document, replacing any prior entry with the same id.
    pub fn insert(&self, doc: Document) {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        store.insert(doc.id.clone(), Arc::new(doc));
    }

    pub fn get(&self, id: &str) -> Option<Arc<Document>> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        store.get(id).cloned()
    }

    pub fn all(&self) -> Vec<Arc<Document>> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        store.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
