use uuid::Uuid;

use crate::intake::{PrimaryDocument, SupportingAsset};

use super::state::JobStatus;

/// Identifies one submission attempt.
///
/// `generation` ties the attempt to the job state it was started from; any
/// reset or newer submission makes the ticket stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub id: Uuid,
    pub(crate) generation: u64,
}

impl SubmissionTicket {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            generation,
        }
    }
}

/// Owned snapshot of everything a build service needs for one request.
#[derive(Debug, Clone)]
pub struct PreparedSubmission {
    pub ticket: SubmissionTicket,
    pub job_id: String,
    pub primary: PrimaryDocument,
    pub assets: Vec<SupportingAsset>,
}

/// What happened when a submission outcome was handed back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome moved the job to this terminal status.
    Applied(JobStatus),
    /// The job was reset or resubmitted meanwhile; the outcome was dropped.
    Stale,
}
