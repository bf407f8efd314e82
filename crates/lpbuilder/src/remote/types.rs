use serde::{Deserialize, Serialize};

use crate::error::SubmitError;

/// Fallback cause when a failed response carries no `error` field.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Build failed";

/// Success payload from the build service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    /// Relative path or absolute URL of the built artifact.
    pub download_url: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BuildResult {
    pub fn new(download_url: impl Into<String>) -> Self {
        Self {
            download_url: download_url.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Resolves the artifact locator against `base`.
    ///
    /// Absolute locators are returned unchanged.
    pub fn artifact_url(&self, base: &str) -> String {
        if reqwest::Url::parse(&self.download_url).is_ok() {
            return self.download_url.clone();
        }

        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            self.download_url.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

/// Maps a response status and body onto the submission outcome.
pub fn parse_build_response(status: u16, body: &[u8]) -> Result<BuildResult, SubmitError> {
    if (200..300).contains(&status) {
        let result = serde_json::from_slice::<BuildResult>(body)
            .map_err(|e| SubmitError::MalformedResponse(e.to_string()))?;
        if result.download_url.trim().is_empty() {
            return Err(SubmitError::MalformedResponse(
                "downloadUrl is empty".to_string(),
            ));
        }
        return Ok(result);
    }

    let message = serde_json::from_slice::<BuildErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.error)
        .filter(|error| !error.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());

    Err(SubmitError::Http { status, message })
}
