//! Job status events for host surfaces that render progress.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::job::{BuildJob, JobStatus};

/// Snapshot of the job's visible state after an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEvent {
    pub job_id: String,
    pub status: JobStatus,
    /// Advisory message; empty after a reset.
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_document: Option<String>,
    pub asset_count: usize,
    /// Artifact locator, set on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl JobEvent {
    pub fn from_job(job: &BuildJob) -> Self {
        Self {
            job_id: job.id().to_string(),
            status: job.status(),
            message: job.status_message().to_string(),
            timestamp: Utc::now(),
            primary_document: job.primary_document().map(|d| d.name.clone()),
            asset_count: job.supporting_assets().len(),
            download_url: job.result().map(|r| r.download_url.clone()),
        }
    }
}

pub trait StatusReporter: Send + Sync {
    fn report(&self, event: JobEvent);
}

/// Reporter that drops every event.
pub struct NoopReporter;

impl StatusReporter for NoopReporter {
    fn report(&self, _event: JobEvent) {}
}

/// Fans job events out to any number of subscribers.
#[derive(Clone)]
pub struct JobEventBroadcaster {
    sender: Arc<broadcast::Sender<JobEvent>>,
}

impl JobEventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn send(&self, event: JobEvent) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.sender.subscribe()
    }
}

impl Default for JobEventBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Bridges controller events onto a `JobEventBroadcaster`.
pub struct BroadcastReporter {
    broadcaster: JobEventBroadcaster,
}

impl BroadcastReporter {
    pub fn new(broadcaster: JobEventBroadcaster) -> Self {
        Self { broadcaster }
    }
}

impl StatusReporter for BroadcastReporter {
    fn report(&self, event: JobEvent) {
        self.broadcaster.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_new_job() {
        let job = BuildJob::new();
        let event = JobEvent::from_job(&job);
        assert_eq!(event.job_id, job.id());
        assert_eq!(event.status, JobStatus::Idle);
        assert!(event.message.is_empty());
        assert_eq!(event.asset_count, 0);
        assert!(event.download_url.is_none());
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = JobEvent::from_job(&BuildJob::new());
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("jobId").is_some());
        assert!(json.get("assetCount").is_some());
        assert!(json.get("downloadUrl").is_none());
    }

    #[test]
    fn test_broadcast_reporter_delivers() {
        let broadcaster = JobEventBroadcaster::new(8);
        let mut receiver = broadcaster.subscribe();
        let reporter = BroadcastReporter::new(broadcaster.clone());

        reporter.report(JobEvent::from_job(&BuildJob::new()));

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.status, JobStatus::Idle);
    }

    #[test]
    fn test_send_without_subscribers_is_fine() {
        let broadcaster = JobEventBroadcaster::default();
        broadcaster.send(JobEvent::from_job(&BuildJob::new()));

        let mut late = broadcaster.subscribe();
        assert!(late.try_recv().is_err());
    }
}
