//! Where traceability records come from: the item-trace HTTP API or a
//! static preview document.

pub mod api;
pub mod preview;

pub use api::ItemTraceApi;
pub use preview::PreviewSource;

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::models::ItemTrace;
use crate::query::PassportQuery;

/// A provider of one traceability record per page load.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, query: &PassportQuery) -> Result<ItemTrace, ServiceError>;
}

/// Records a returning visitor against the scan that opened the page.
#[async_trait]
pub trait ScanRecorder: Send + Sync {
    /// Never fails: outcomes are logged only.
    async fn update_scan_with_user(&self, scan_id: &str, client_id: &str);
}
