pub mod controller;
pub mod state;
pub mod submission;

pub use controller::BuildJobController;
pub use state::{messages, BuildJob, JobStatus};
pub use submission::{Completion, PreparedSubmission, SubmissionTicket};
