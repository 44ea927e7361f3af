/// Documentation root resolution.
///
/// Probes candidate directories in a fixed order: the configured base path
/// (relative to the working directory), the configured absolute fallback,
/// then ancestor directories joined with the versioned-docs segments.
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

/// Errors raised by the indexing pass.
#[derive(Debug, Error)]
pub enum IndexError {
    /// No candidate documentation directory exists. Callers decide whether
    /// this aborts startup or degrades to an empty index.
    #[error("documentation root not found (searched from {})", .cwd.display())]
    RootNotFound { cwd: PathBuf },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ancestor levels probed for the versioned docs tree, deepest first.
const ANCESTOR_DEPTHS: [usize; 4] = [3, 2, 1, 0];

/// Resolve the documentation root directory, starting from `cwd`.
pub fn resolve_docs_root(config: &Config, cwd: &Path) -> Result<PathBuf, IndexError> {
    if let Some(base) = config.docs_base_path.as_deref().filter(|p| !p.is_empty()) {
        let candidate = cwd.join(base);
        if candidate.is_dir() {
            info!("Using configured base path: {}", candidate.display());
            return Ok(candidate);
        }
        warn!("Configured base path not found: {}", candidate.display());
    }

    if let Some(fallback) = config
        .docs_fallback_path
        .as_deref()
        .filter(|p| !p.is_empty())
    {
        let candidate = Path::new(fallback);
        if candidate.is_dir() {
            info!("Using fallback path: {}", candidate.display());
            return Ok(candidate.to_path_buf());
        }
        warn!("Fallback path not found: {}", candidate.display());
    }

    for depth in ANCESTOR_DEPTHS {
        let mut candidate = cwd.to_path_buf();
        for _ in 0..depth {
            candidate.push("..");
        }
        for segment in &config.docs_path_segments {
            candidate.push(segment);
        }
        if candidate.is_dir() {
            info!("Found documentation at: {}", candidate.display());
            return Ok(candidate);
        }
    }

    Err(IndexError::RootNotFound {
        cwd: cwd.to_path_buf(),
    })
}
