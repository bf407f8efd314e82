use serde::{Deserialize, Serialize};

use crate::intake::{PrimaryDocument, SupportingAsset};
use crate::remote::BuildResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Idle,
    Building,
    Success,
    Error,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Idle => write!(f, "idle"),
            JobStatus::Building => write!(f, "building"),
            JobStatus::Success => write!(f, "success"),
            JobStatus::Error => write!(f, "error"),
        }
    }
}

/// Advisory messages shown to the user after each operation.
pub mod messages {
    pub const FILES_ADDED: &str = "Files added successfully";
    pub const BUILDING: &str = "Building...";
    pub const BUILD_SUCCEEDED: &str = "Build successful!";
    pub const BUILD_FAILED_PREFIX: &str = "Build failed: ";
    pub const INTAKE_FAILED_PREFIX: &str = "Error processing files: ";
}

/// The single live build job.
#[derive(Debug, Clone)]
pub struct BuildJob {
    pub(crate) id: String,
    pub(crate) primary_document: Option<PrimaryDocument>,
    pub(crate) supporting_assets: Vec<SupportingAsset>,
    pub(crate) status: JobStatus,
    pub(crate) status_message: String,
    pub(crate) result: Option<BuildResult>,
}

impl Default for BuildJob {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildJob {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            primary_document: None,
            supporting_assets: Vec::new(),
            status: JobStatus::Idle,
            status_message: String::new(),
            result: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn primary_document(&self) -> Option<&PrimaryDocument> {
        self.primary_document.as_ref()
    }

    pub fn supporting_assets(&self) -> &[SupportingAsset] {
        &self.supporting_assets
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Only present while the status is `Success`.
    pub fn result(&self) -> Option<&BuildResult> {
        self.result.as_ref()
    }

    pub fn is_building(&self) -> bool {
        self.status == JobStatus::Building
    }
}
