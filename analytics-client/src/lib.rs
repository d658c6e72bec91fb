pub mod domain;
pub mod upstream;

pub use upstream::{AnalyticsUpstream, HttpUpstream, UpstreamError};
