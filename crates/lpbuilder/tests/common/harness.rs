//! Test harness for isolated test execution.
//!
//! `TestHarness` owns a temporary directory with `input/` and `downloads/`
//! subdirectories. `FakeBuildServer` is an axum app bound to an ephemeral
//! port that records every multipart part it receives and answers with a
//! scripted reply.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tempfile::TempDir;

/// Test harness providing scratch directories for integration tests.
pub struct TestHarness {
    temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub download_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let input_dir = temp_dir.path().join("input");
        let download_dir = temp_dir.path().join("downloads");
        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");

        Self {
            temp_dir,
            input_dir,
            download_dir,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `content` under the input directory and returns its path.
    pub fn write_input(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.input_dir.join(name);
        std::fs::write(&path, content).expect("Failed to write input file");
        path
    }

    /// Writes a config file in the harness root and returns its path.
    pub fn write_config(&self, json: &str) -> PathBuf {
        let path = self.temp_dir.path().join("config.json");
        std::fs::write(&path, json).expect("Failed to write config");
        path
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// One multipart part as received by the fake server.
#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

/// Scripted reply for `POST /api/build`.
#[derive(Debug, Clone)]
pub struct FakeReply {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl FakeReply {
    pub fn success(download_url: &str) -> Self {
        Self {
            status: 200,
            body: format!(r#"{{"downloadUrl": "{}"}}"#, download_url),
            delay: None,
        }
    }

    pub fn error_json(status: u16, error: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": error }).to_string(),
            delay: None,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone)]
struct ServerState {
    reply: FakeReply,
    received: Arc<Mutex<Vec<ReceivedPart>>>,
    artifact: Vec<u8>,
}

/// In-process build service.
pub struct FakeBuildServer {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedPart>>>,
}

impl FakeBuildServer {
    pub async fn start(reply: FakeReply) -> Self {
        Self::start_with_artifact(reply, b"PK-fake-artifact".to_vec()).await
    }

    pub async fn start_with_artifact(reply: FakeReply, artifact: Vec<u8>) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            reply,
            received: received.clone(),
            artifact,
        };

        let app = Router::new()
            .route("/api/build", post(handle_build))
            .route("/downloads/:name", get(handle_download))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake server");
        let addr = listener.local_addr().expect("No local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, received }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn received(&self) -> Vec<ReceivedPart> {
        self.received.lock().unwrap().clone()
    }
}

/// Address of a port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local addr");
    drop(listener);
    format!("http://{}", addr)
}

async fn handle_build(State(state): State<ServerState>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let part = ReceivedPart {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            content: field.bytes().await.map(|b| b.to_vec()).unwrap_or_default(),
        };
        state.received.lock().unwrap().push(part);
    }

    if let Some(delay) = state.reply.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(state.reply.status).unwrap_or(StatusCode::OK);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        state.reply.body.clone(),
    )
        .into_response()
}

async fn handle_download(State(state): State<ServerState>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/zip")],
        state.artifact.clone(),
    )
        .into_response()
}
