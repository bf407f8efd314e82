//! Build job lifecycle: intake mutations, submission and reset.
//!
//! The controller is the single owner of the live `BuildJob`. Every public
//! operation sets the advisory message, emits a `JobEvent`, and returns a
//! typed result so hosts can branch without parsing messages.

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use crate::config::BuilderConfig;
use crate::error::{IntakeError, SubmitError};
use crate::events::{JobEvent, NoopReporter, StatusReporter};
use crate::intake::{AssetIntake, CandidateFile, IntakeSummary, PrimaryDocument, SupportingAsset};
use crate::remote::{BuildResult, BuildService};

use super::state::{messages, BuildJob, JobStatus};
use super::submission::{Completion, PreparedSubmission, SubmissionTicket};

pub struct BuildJobController {
    job: BuildJob,
    intake: AssetIntake,
    reporter: Arc<dyn StatusReporter>,
    generation: u64,
}

impl Default for BuildJobController {
    fn default() -> Self {
        Self::new(AssetIntake::default())
    }
}

impl BuildJobController {
    pub fn new(intake: AssetIntake) -> Self {
        Self {
            job: BuildJob::new(),
            intake,
            reporter: Arc::new(NoopReporter),
            generation: 0,
        }
    }

    pub fn from_config(config: &BuilderConfig) -> Self {
        Self::new(AssetIntake::from_config(config))
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn StatusReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn job(&self) -> &BuildJob {
        &self.job
    }

    pub fn status(&self) -> JobStatus {
        self.job.status
    }

    pub fn message(&self) -> &str {
        &self.job.status_message
    }

    fn set_message(&mut self, message: impl Into<String>) {
        self.job.status_message = message.into();
        self.reporter.report(JobEvent::from_job(&self.job));
    }

    fn ensure_not_building(&mut self) -> Result<(), IntakeError> {
        if self.job.is_building() {
            let err = IntakeError::Busy;
            self.set_message(err.to_string());
            return Err(err);
        }
        Ok(())
    }

    /// Replaces the primary document with `file` if its name is a Markdown name.
    ///
    /// `None` leaves everything untouched.
    pub fn submit_primary_candidate(
        &mut self,
        file: Option<CandidateFile>,
    ) -> Result<(), IntakeError> {
        let Some(file) = file else {
            return Ok(());
        };
        self.ensure_not_building()?;

        match self.intake.validate_primary(file) {
            Ok(document) => {
                info!(document = %document.name, "Primary document accepted");
                self.job.primary_document = Some(document);
                self.set_message(messages::FILES_ADDED);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Primary document rejected");
                self.set_message(err.to_string());
                Err(err)
            }
        }
    }

    /// Adds every supported file and archive member from `files`.
    ///
    /// All-or-nothing: on failure no asset from this call is committed and the
    /// status is left as it was.
    pub async fn submit_support_candidates(
        &mut self,
        files: Vec<CandidateFile>,
    ) -> Result<IntakeSummary, IntakeError> {
        if files.is_empty() {
            return Ok(IntakeSummary::default());
        }
        self.ensure_not_building()?;

        match self.intake.collect_supporting(files).await {
            Ok(batch) => {
                let summary = batch.summary();
                info!(
                    accepted = summary.accepted.len(),
                    skipped = summary.skipped.len(),
                    total = self.job.supporting_assets.len() + batch.assets.len(),
                    "Supporting assets added"
                );
                self.job.supporting_assets.extend(batch.assets);
                self.set_message(messages::FILES_ADDED);
                Ok(summary)
            }
            Err(err) => {
                warn!(error = %err, "Support batch discarded");
                self.set_message(format!("{}{}", messages::INTAKE_FAILED_PREFIX, err));
                Err(err)
            }
        }
    }

    /// Removes the asset at `index`; out of range returns `Ok(None)`.
    pub fn remove_support_asset(
        &mut self,
        index: usize,
    ) -> Result<Option<SupportingAsset>, IntakeError> {
        self.ensure_not_building()?;
        if index >= self.job.supporting_assets.len() {
            return Ok(None);
        }

        let removed = self.job.supporting_assets.remove(index);
        self.reporter.report(JobEvent::from_job(&self.job));
        Ok(Some(removed))
    }

    pub fn remove_primary_document(&mut self) -> Result<Option<PrimaryDocument>, IntakeError> {
        self.ensure_not_building()?;
        let removed = self.job.primary_document.take();
        self.reporter.report(JobEvent::from_job(&self.job));
        Ok(removed)
    }

    /// Moves the job into `Building` and snapshots what must be sent.
    pub fn begin_submit(&mut self) -> Result<PreparedSubmission, SubmitError> {
        if self.job.is_building() {
            let err = SubmitError::AlreadyBuilding;
            self.set_message(err.to_string());
            return Err(err);
        }

        let Some(primary) = self.job.primary_document.clone() else {
            let err = SubmitError::MissingPrimary;
            self.set_message(err.to_string());
            return Err(err);
        };

        self.generation += 1;
        let ticket = SubmissionTicket::new(self.generation);

        self.job.status = JobStatus::Building;
        self.job.result = None;
        self.set_message(messages::BUILDING);

        info!(
            job_id = %self.job.id,
            ticket = %ticket.id,
            assets = self.job.supporting_assets.len(),
            "Build submission started"
        );

        Ok(PreparedSubmission {
            ticket,
            job_id: self.job.id.clone(),
            primary,
            assets: self.job.supporting_assets.clone(),
        })
    }

    /// Applies the outcome of the submission identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        outcome: &Result<BuildResult, SubmitError>,
    ) -> Completion {
        if ticket.generation != self.generation || !self.job.is_building() {
            warn!(
                ticket = %ticket.id,
                status = %self.job.status,
                "Discarding stale build outcome"
            );
            return Completion::Stale;
        }

        match outcome {
            Ok(result) => {
                info!(download_url = %result.download_url, "Build succeeded");
                self.job.status = JobStatus::Success;
                self.job.result = Some(result.clone());
                self.set_message(messages::BUILD_SUCCEEDED);
            }
            Err(err) => {
                warn!(error = %err, "Build failed");
                self.job.status = JobStatus::Error;
                self.job.result = None;
                self.set_message(format!("{}{}", messages::BUILD_FAILED_PREFIX, err));
            }
        }

        Completion::Applied(self.job.status)
    }

    /// Runs a whole submission against `service` and applies its outcome.
    ///
    /// Returns the build result on success. A remote failure leaves the job
    /// in `Error` and is returned as well.
    pub async fn submit(&mut self, service: &dyn BuildService) -> Result<BuildResult, SubmitError> {
        let submission = self.begin_submit()?;
        let span = info_span!(
            "job.submit",
            job_id = %submission.job_id,
            primary = %submission.primary.name,
            assets = submission.assets.len()
        );

        let outcome = service.submit(&submission).instrument(span).await;
        self.complete(submission.ticket, &outcome);
        outcome
    }

    /// Discards the current job and starts a fresh, empty one.
    ///
    /// Allowed from any status; an in-flight submission becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.job = BuildJob::new();
        info!(job_id = %self.job.id, "Job reset");
        self.reporter.report(JobEvent::from_job(&self.job));
    }
}
