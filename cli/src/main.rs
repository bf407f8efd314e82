//! lpbuilder - command-line host for Living Papers builds.
//!
//! Collects a Markdown paper and its figures, submits them to the build
//! service and optionally downloads the produced artifact.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lpbuilder::LpbError;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;

#[derive(Parser, Debug)]
#[command(name = "lpbuilder")]
#[command(about = "Submit Living Papers documents to a build service")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "LPBUILDER_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect files and submit a build
    Build(BuildArgs),

    /// Run support-file intake only and list what would be submitted
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Main Markdown document
    #[arg(short, long)]
    pub main: PathBuf,

    /// Supporting figures, PDFs or .zip archives (repeatable)
    #[arg(short, long = "support", num_args = 1..)]
    pub support: Vec<PathBuf>,

    /// Config file (defaults to the platform config dir)
    #[arg(short, long, env = "LPBUILDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Build endpoint, overrides config and environment
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Download the built artifact into this directory
    #[arg(short, long)]
    pub download_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Files or archives to inspect
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Config file (defaults to the platform config dir)
    #[arg(short, long, env = "LPBUILDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

const DEFAULT_LOG_FILTER: &str = "lpbuilder=info";

fn init_tracing(json: bool) {
    // Route `log` records from library code into tracing.
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to install log bridge: {}", e);
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        tracing::subscriber::set_global_default(
            registry.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        tracing::subscriber::set_global_default(
            registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
    };

    if let Err(e) = installed {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result = match cli.command {
        Command::Build(args) => commands::run_build(args).await,
        Command::Inspect(args) => commands::run_inspect(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn failure_message(err: &LpbError) -> String {
    match err {
        LpbError::Submit(e) if e.is_remote() => format!("Build service request failed: {}", e),
        other => other.to_string(),
    }
}
