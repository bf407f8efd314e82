pub mod config;
pub mod error;
pub mod events;
pub mod intake;
pub mod job;
pub mod remote;
pub mod sanitize;

pub use config::{load_config, resolve_config, BuilderConfig};
pub use error::{ArchiveError, ConfigError, IntakeError, LpbError, Result, SubmitError};
pub use events::{BroadcastReporter, JobEvent, JobEventBroadcaster, NoopReporter, StatusReporter};
pub use intake::{AssetIntake, CandidateFile, IntakeSummary, MediaKind, PrimaryDocument, SupportingAsset};
pub use job::{BuildJob, BuildJobController, Completion, JobStatus, PreparedSubmission};
pub use remote::{BuildResult, BuildService, HttpBuildService};
