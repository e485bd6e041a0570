use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::models::ItemTrace;
use crate::query::PassportQuery;
use crate::sources::RecordSource;

/// Static example record used for previews and as the fallback when a page
/// is opened without identifiers.
#[derive(Debug, Clone)]
pub struct PreviewSource {
    path: PathBuf,
}

impl PreviewSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the preview document. Missing, unreadable or malformed files
    /// all yield `None`.
    pub async fn load(&self) -> Option<ItemTrace> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "Preview data unavailable");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Preview data is not a valid item trace");
                None
            }
        }
    }
}

#[async_trait]
impl RecordSource for PreviewSource {
    async fn fetch(&self, _query: &PassportQuery) -> Result<ItemTrace, ServiceError> {
        self.load()
            .await
            .ok_or_else(|| ServiceError::PreviewNotFound(self.path.display().to_string()))
    }
}
