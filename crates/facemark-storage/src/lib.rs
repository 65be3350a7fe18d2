//! Local upload store.
//!
//! Persists uploaded originals and generated result images under a public
//! uploads directory with collision-resistant names, and maps stored names
//! back to the relative URLs the API hands out.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while persisting uploads.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/static/uploads";

/// Store writing into a single flat uploads directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory the store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write bytes under a stored name, which must be a bare filename.
    pub async fn save(&self, name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(StorageError::InvalidFilename(name.to_string()));
        }
        let path = self.root.join(name);
        fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Best-effort removal. A stray file is a resource leak, not a
    /// correctness failure, so failures are logged and swallowed.
    pub async fn remove(&self, name: &str) {
        let path = self.root.join(name);
        if let Err(e) = fs::remove_file(&path).await {
            warn!("failed to remove {}: {}", path.display(), e);
        }
    }

    /// Relative URL a stored name is served under.
    pub fn url_for(&self, name: &str) -> String {
        format!("{PUBLIC_PREFIX}/{name}")
    }
}

/// Collision-resistant stem for a stored upload.
pub fn unique_stem() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Names of the marked/blurred outputs for a stored stem.
pub fn output_names(stem: &str, at: DateTime<Utc>) -> (String, String) {
    let ts = at.format("%Y%m%d_%H%M%S");
    (
        format!("marked_{stem}_{ts}.jpg"),
        format!("blurred_{stem}_{ts}.jpg"),
    )
}

/// Reduce a client-supplied filename to a safe bare name.
///
/// Keeps the last path component, maps whitespace to underscores, drops
/// everything outside `[A-Za-z0-9._-]`, and strips leading dots. Never
/// returns an empty name.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, '.' | '_' | '-'))
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
