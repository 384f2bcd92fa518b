//! Disk-backed blob store for uploaded images.
//!
//! Files land under the configured uploads dir and are served back by the
//! router's static file service under the public prefix.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::errors::ServiceError;

#[derive(Clone)]
pub struct BlobStore {
    root: PathBuf,
    public_prefix: String,
}

impl BlobStore {
    pub fn new(cfg: &configs::StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&cfg.uploads_dir),
            public_prefix: cfg.public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Relative paths only; any traversal component is rejected.
    fn resolve(&self, rel: &str) -> Result<PathBuf, ServiceError> {
        let rel_path = Path::new(rel);
        if rel_path.is_absolute()
            || rel_path
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(ServiceError::Storage(format!("invalid blob path: {rel}")));
        }
        Ok(self.root.join(rel_path))
    }

    /// Write a blob and return its public URL.
    pub async fn upload(&self, rel: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        let path = self.resolve(rel)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
        }
        fs::write(&path, bytes)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        info!(path = %path.display(), size = bytes.len(), "blob_stored");
        Ok(self.public_url(rel))
    }

    pub fn public_url(&self, rel: &str) -> String {
        format!("{}/{}", self.public_prefix, rel)
    }
}
