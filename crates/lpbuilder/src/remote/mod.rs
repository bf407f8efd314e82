//! Remote build service seam and its HTTP implementation.

pub mod http;
pub mod types;

use async_trait::async_trait;

use crate::error::SubmitError;
use crate::job::PreparedSubmission;

pub use http::HttpBuildService;
pub use types::{BuildErrorPayload, BuildResult};

/// A service that turns a prepared submission into a build result.
#[async_trait]
pub trait BuildService: Send + Sync {
    /// Sends the primary document and every supporting asset in one request.
    ///
    /// Non-success responses, malformed payloads and transport failures are
    /// all returned as `SubmitError`.
    async fn submit(&self, submission: &PreparedSubmission) -> Result<BuildResult, SubmitError>;
}
