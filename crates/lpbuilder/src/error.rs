use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LpbError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid value for environment variable '{name}': {reason}")]
    InvalidEnv { name: String, reason: String },
}

/// Errors raised while turning user input into job assets.
///
/// None of these move the job into the `Error` status; they only set the
/// advisory message.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Main file must be .md format")]
    InvalidPrimary { name: String },

    #[error("{0}")]
    Archive(#[from] ArchiveError),

    #[error("A build is in progress; wait for it to finish")]
    Busy,

    #[error("Failed to read '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to open archive '{name}': {source}")]
    Open {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to extract '{member}' from '{archive}': {reason}")]
    Extract {
        archive: String,
        member: String,
        reason: String,
    },

    #[error("Archive decode task for '{name}' failed: {reason}")]
    TaskFailed { name: String, reason: String },
}

/// Errors from a build submission.
///
/// `Display` of the remote variants is the cause text shown after
/// `"Build failed: "`.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Please upload main .md file first")]
    MissingPrimary,

    #[error("A build is already in progress")]
    AlreadyBuilding,

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Malformed build response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Transport(String),

    #[error("Invalid build endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to write artifact '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SubmitError {
    /// True for failures that reached (or tried to reach) the build service,
    /// as opposed to local precondition rejections.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SubmitError::Http { .. }
                | SubmitError::MalformedResponse(_)
                | SubmitError::Transport(_)
                | SubmitError::InvalidEndpoint(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LpbError>;
