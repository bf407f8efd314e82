//! Asset intake: turns user-supplied files into a primary document and an
//! ordered list of classified supporting assets.

pub mod archive;
pub mod asset;
pub mod format;

use tracing::{debug, info_span, Instrument};

use crate::config::BuilderConfig;
use crate::error::IntakeError;

pub use archive::{extract_archive, ArchiveExtraction};
pub use asset::{CandidateFile, PrimaryDocument, SupportingAsset};
pub use format::{MediaKind, SUPPORTED_ASSET_EXTENSIONS};

/// Assets accepted from one batch, not yet committed to a job.
#[derive(Debug, Default)]
pub struct IntakeBatch {
    pub assets: Vec<SupportingAsset>,
    pub skipped: Vec<String>,
    pub archives: usize,
}

impl IntakeBatch {
    pub fn summary(&self) -> IntakeSummary {
        IntakeSummary {
            accepted: self.assets.iter().map(|a| a.name.clone()).collect(),
            skipped: self.skipped.clone(),
            archives: self.archives,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeSummary {
    pub accepted: Vec<String>,
    pub skipped: Vec<String>,
    pub archives: usize,
}

#[derive(Debug, Clone)]
pub struct AssetIntake {
    strict_primary_extension: bool,
}

impl Default for AssetIntake {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AssetIntake {
    pub fn new(strict_primary_extension: bool) -> Self {
        Self {
            strict_primary_extension,
        }
    }

    pub fn from_config(config: &BuilderConfig) -> Self {
        Self::new(config.strict_primary_extension)
    }

    pub fn validate_primary(&self, file: CandidateFile) -> Result<PrimaryDocument, IntakeError> {
        if !format::is_primary_name(&file.name, self.strict_primary_extension) {
            return Err(IntakeError::InvalidPrimary { name: file.name });
        }

        Ok(PrimaryDocument {
            name: file.name,
            content: file.content,
        })
    }

    /// Processes `files` in order into a batch of new assets.
    ///
    /// Archives are expanded, loose files outside the allow-list are skipped.
    /// The first archive failure aborts the whole batch.
    pub async fn collect_supporting(
        &self,
        files: Vec<CandidateFile>,
    ) -> Result<IntakeBatch, IntakeError> {
        let span = info_span!("intake.support", files = files.len());

        async move {
            let mut batch = IntakeBatch::default();

            for file in files {
                if format::is_archive(&file.name) {
                    let extraction = extract_archive(&file.name, file.content).await?;
                    batch.archives += 1;
                    batch.assets.extend(extraction.assets);
                    batch.skipped.extend(extraction.skipped);
                    continue;
                }

                match SupportingAsset::classify(file.name.clone(), file.content) {
                    Some(asset) => batch.assets.push(asset),
                    None => {
                        debug!(file = %file.name, "Skipping unsupported file");
                        batch.skipped.push(file.name);
                    }
                }
            }

            debug!(
                accepted = batch.assets.len(),
                skipped = batch.skipped.len(),
                archives = batch.archives,
                "Support batch collected"
            );
            Ok(batch)
        }
        .instrument(span)
        .await
    }
}
