use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/build";
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    pub version: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_download_base_url")]
    pub download_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// When true the primary document must end in exactly `.md`; when false
    /// `.MD`, `.Md` etc. are accepted as well.
    #[serde(default = "default_strict_primary_extension")]
    pub strict_primary_extension: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_download_base_url() -> String {
    DEFAULT_DOWNLOAD_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_strict_primary_extension() -> bool {
    true
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            endpoint: default_endpoint(),
            download_base_url: default_download_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            strict_primary_extension: default_strict_primary_extension(),
        }
    }
}

impl BuilderConfig {
    /// `None` means submissions may wait indefinitely.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
