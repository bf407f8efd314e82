use std::path::Path;

use crate::error::IntakeError;
use crate::intake::format::{self, MediaKind};

/// A named blob handed to intake, either dropped in by a host or read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Reads a file from disk, keeping only its file name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, IntakeError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| IntakeError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();

        Ok(Self { name, content })
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryDocument {
    pub name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportingAsset {
    /// Original file name; archive members keep their in-archive path.
    pub name: String,
    pub content: Vec<u8>,
    pub media_kind: MediaKind,
    pub media_type: String,
}

impl SupportingAsset {
    /// Classifies `name`; returns `None` when its extension is not allowed.
    pub fn classify(name: impl Into<String>, content: Vec<u8>) -> Option<Self> {
        let name = name.into();
        let media_kind = MediaKind::from_name(&name)?;
        let media_type = format::media_type_for(&name);
        Some(Self {
            name,
            content,
            media_kind,
            media_type,
        })
    }
}
