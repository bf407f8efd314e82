//! Builders for creating test data programmatically.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use lpbuilder::job::PreparedSubmission;
use lpbuilder::{BuildResult, BuildService, BuilderConfig, CandidateFile, SubmitError};

enum ZipEntry {
    File(String, Vec<u8>),
    Dir(String),
}

/// Builds zip archives in memory.
#[derive(Default)]
pub struct ZipBuilder {
    entries: Vec<ZipEntry>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: &str, content: impl Into<Vec<u8>>) -> Self {
        self.entries
            .push(ZipEntry::File(name.to_string(), content.into()));
        self
    }

    pub fn dir(mut self, name: &str) -> Self {
        self.entries.push(ZipEntry::Dir(name.to_string()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for entry in self.entries {
            match entry {
                ZipEntry::File(name, content) => {
                    writer.start_file(name, options).unwrap();
                    writer.write_all(&content).unwrap();
                }
                ZipEntry::Dir(name) => {
                    writer.add_directory(name, options).unwrap();
                }
            }
        }
        writer.finish().unwrap().into_inner()
    }

    pub fn candidate(self, name: &str) -> CandidateFile {
        CandidateFile::new(name, self.build())
    }
}

/// Builder for `BuilderConfig` pointing at a test server.
pub struct ConfigBuilder {
    config: BuilderConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: BuilderConfig::default(),
        }
    }

    pub fn server(mut self, base_url: &str) -> Self {
        self.config.endpoint = format!("{}/api/build", base_url);
        self.config.download_base_url = base_url.to_string();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    pub fn relaxed_primary(mut self) -> Self {
        self.config.strict_primary_extension = false;
        self
    }

    pub fn build(self) -> BuilderConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What a `ScriptedService` saw for one submission.
#[derive(Debug, Clone)]
pub struct SeenSubmission {
    pub primary: String,
    pub assets: Vec<String>,
}

/// Build service returning a fixed outcome and recording every request.
pub struct ScriptedService {
    outcome: Box<dyn Fn() -> Result<BuildResult, SubmitError> + Send + Sync>,
    pub seen: Mutex<Vec<SeenSubmission>>,
}

impl ScriptedService {
    pub fn succeeding(download_url: &str) -> Self {
        let url = download_url.to_string();
        Self {
            outcome: Box::new(move || Ok(BuildResult::new(url.clone()))),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        let message = message.to_string();
        Self {
            outcome: Box::new(move || {
                Err(SubmitError::Http {
                    status,
                    message: message.clone(),
                })
            }),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable(reason: &str) -> Self {
        let reason = reason.to_string();
        Self {
            outcome: Box::new(move || Err(SubmitError::Transport(reason.clone()))),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SeenSubmission> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl BuildService for ScriptedService {
    async fn submit(&self, submission: &PreparedSubmission) -> Result<BuildResult, SubmitError> {
        self.seen.lock().unwrap().push(SeenSubmission {
            primary: submission.primary.name.clone(),
            assets: submission.assets.iter().map(|a| a.name.clone()).collect(),
        });
        (self.outcome)()
    }
}

pub fn markdown(name: &str) -> CandidateFile {
    CandidateFile::new(name, "---\ntitle: Test Paper\n---\n\n# Introduction\n")
}

pub fn png(name: &str) -> CandidateFile {
    CandidateFile::new(name, &b"\x89PNG\r\n\x1a\n"[..])
}
