//! Access to the remote analytics service.
//!
//! Every call returns the raw JSON document untouched. Shape detection and
//! numeric coercion belong to the normalizers in the view service, so this
//! layer only distinguishes transport failures from successful responses.

pub mod http;

use serde_json::Value;

use crate::domain::BudgetCategory;

pub use http::HttpUpstream;

#[derive(thiserror::Error, Debug)]
pub enum UpstreamError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("upstream returned status {status}")]
    Status { status: u16, detail: Option<String> },
    #[error("invalid upstream payload: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// Server-supplied `detail` for non-success responses, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
pub trait AnalyticsUpstream: Send + Sync {
    /// Submit a CSV file for analysis; the response is a dataset document.
    async fn upload(&self, file_name: &str, body: Vec<u8>) -> Result<Value, UpstreamError>;

    async fn forecast(&self) -> Result<Value, UpstreamError>;

    async fn report(&self) -> Result<Value, UpstreamError>;

    async fn schedule(&self, budget: u32, category: BudgetCategory) -> Result<Value, UpstreamError>;

    async fn budget_plan(&self, budget: u32, category: BudgetCategory) -> Result<Value, UpstreamError>;
}
