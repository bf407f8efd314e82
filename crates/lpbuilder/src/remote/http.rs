//! HTTP client for the remote build service.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};

use crate::config::BuilderConfig;
use crate::error::SubmitError;
use crate::intake::format::PRIMARY_MEDIA_TYPE;
use crate::job::PreparedSubmission;
use crate::sanitize;

use super::types::{parse_build_response, BuildResult};
use super::BuildService;

/// Multipart field carrying the primary document.
pub const PRIMARY_FIELD: &str = "mainFile";

/// Repeated multipart field carrying supporting assets.
pub const SUPPORT_FIELD: &str = "supportFiles";

const FALLBACK_ARTIFACT_NAME: &str = "build-output.zip";

/// Submits builds as multipart POSTs to a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpBuildService {
    client: Client,
    endpoint: Url,
    download_base_url: String,
}

fn create_http_client(
    connect_timeout: Duration,
    request_timeout: Option<Duration>,
) -> Result<Client, SubmitError> {
    let mut builder = Client::builder().connect_timeout(connect_timeout);
    if let Some(timeout) = request_timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| SubmitError::Transport(format!("Failed to create HTTP client: {}", e)))
}

impl HttpBuildService {
    pub fn new(config: &BuilderConfig) -> Result<Self, SubmitError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| SubmitError::InvalidEndpoint(format!("{}: {}", config.endpoint, e)))?;

        Ok(Self {
            client: create_http_client(config.connect_timeout(), config.request_timeout())?,
            endpoint,
            download_base_url: config.download_base_url.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn artifact_url(&self, result: &BuildResult) -> String {
        result.artifact_url(&self.download_base_url)
    }

    /// Fetches the built artifact into `dest_dir` and returns the written path.
    pub async fn download_artifact(
        &self,
        result: &BuildResult,
        dest_dir: &Path,
    ) -> Result<PathBuf, SubmitError> {
        let url = self.artifact_url(result);
        info!("Downloading build artifact from {}", sanitize::redact_url(&url));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Http {
                status: status.as_u16(),
                message: format!("Artifact download failed ({})", status),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| SubmitError::Io {
                path: dest_dir.to_path_buf(),
                source: e,
            })?;

        let path = dest_dir.join(artifact_file_name(&url));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| SubmitError::Io {
                path: path.clone(),
                source: e,
            })?;

        info!(
            "Saved artifact {} ({} bytes)",
            sanitize::redact_path(&path),
            bytes.len()
        );
        Ok(path)
    }
}

/// Builds the multipart body: the primary document first, then each asset
/// in append order under the repeated field.
pub fn build_form(submission: &PreparedSubmission) -> Result<Form, SubmitError> {
    let primary = Part::bytes(submission.primary.content.clone())
        .file_name(submission.primary.name.clone())
        .mime_str(PRIMARY_MEDIA_TYPE)
        .map_err(|e| SubmitError::Transport(format!("Invalid media type: {}", e)))?;

    let mut form = Form::new().part(PRIMARY_FIELD, primary);

    for asset in &submission.assets {
        let part = Part::bytes(asset.content.clone())
            .file_name(asset.name.clone())
            .mime_str(&asset.media_type)
            .map_err(|e| {
                SubmitError::Transport(format!(
                    "Invalid media type '{}' for {}: {}",
                    asset.media_type, asset.name, e
                ))
            })?;
        form = form.part(SUPPORT_FIELD, part);
    }

    Ok(form)
}

/// Last path segment of the artifact URL, used as the local file name.
fn artifact_file_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.path_segments().and_then(|s| s.last().map(str::to_string)))
        .filter(|name| !name.is_empty() && name != "." && name != "..")
        .unwrap_or_else(|| FALLBACK_ARTIFACT_NAME.to_string())
}

#[async_trait]
impl BuildService for HttpBuildService {
    async fn submit(&self, submission: &PreparedSubmission) -> Result<BuildResult, SubmitError> {
        let form = build_form(submission)?;

        info!(
            "Submitting build {} to {} ({} supporting assets)",
            submission.ticket.id,
            sanitize::redact_url(self.endpoint.as_str()),
            submission.assets.len()
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        debug!("Build service answered {} ({} bytes)", status, body.len());

        let outcome = parse_build_response(status.as_u16(), &body);
        if let Err(ref e) = outcome {
            warn!("Build {} failed: {}", submission.ticket.id, e);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_rejects_invalid_endpoint() {
        let config = BuilderConfig {
            endpoint: "not a url".to_string(),
            ..BuilderConfig::default()
        };
        let result = HttpBuildService::new(&config);
        assert!(matches!(result, Err(SubmitError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_service_uses_configured_endpoint() {
        let service = HttpBuildService::new(&BuilderConfig::default()).unwrap();
        assert_eq!(service.endpoint().as_str(), "http://localhost:3000/api/build");
        assert_eq!(
            service.artifact_url(&BuildResult::new("/downloads/x.zip")),
            "http://localhost:3000/downloads/x.zip"
        );
    }

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(
            artifact_file_name("http://localhost:3000/downloads/paper-1234.zip"),
            "paper-1234.zip"
        );
        assert_eq!(artifact_file_name("http://localhost:3000/"), "build-output.zip");
        assert_eq!(artifact_file_name("not a url"), "build-output.zip");
    }
}
