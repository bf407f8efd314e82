//! Subcommand runners.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use lpbuilder::config::{resolve_config, validate_config};
use lpbuilder::{
    BuildJobController, BuilderConfig, CandidateFile, HttpBuildService, IntakeError, LpbError,
    SupportingAsset,
};

use crate::{BuildArgs, InspectArgs};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectedAsset {
    name: String,
    media_type: String,
    size: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectReport {
    assets: Vec<InspectedAsset>,
    skipped: Vec<String>,
    archives: usize,
}

impl From<&SupportingAsset> for InspectedAsset {
    fn from(asset: &SupportingAsset) -> Self {
        Self {
            name: asset.name.clone(),
            media_type: asset.media_type.clone(),
            size: asset.content.len(),
        }
    }
}

fn load_effective_config(
    path: Option<&Path>,
    endpoint: Option<String>,
) -> Result<BuilderConfig, LpbError> {
    let mut config = resolve_config(path)?;
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
        validate_config(&config)?;
    }
    Ok(config)
}

async fn read_candidates(paths: &[PathBuf]) -> Result<Vec<CandidateFile>, IntakeError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(CandidateFile::from_path(path).await?);
    }
    Ok(files)
}

pub async fn run_build(args: BuildArgs) -> Result<(), LpbError> {
    let config = load_effective_config(args.config.as_deref(), args.endpoint)?;
    let service = HttpBuildService::new(&config)?;
    let mut controller = BuildJobController::from_config(&config);

    let main_file = CandidateFile::from_path(&args.main).await?;
    let primary = controller.submit_primary_candidate(Some(main_file));
    println!("{}", controller.message());
    primary?;

    if !args.support.is_empty() {
        let files = read_candidates(&args.support).await?;
        let summary = controller.submit_support_candidates(files).await;
        println!("{}", controller.message());
        let summary = summary?;
        for name in &summary.skipped {
            println!("  skipped {}", name);
        }
    }

    let outcome = controller.submit(&service).await;
    println!("{}", controller.message());
    let result = outcome?;

    let url = service.artifact_url(&result);
    println!("{}", url);

    if let Some(dir) = args.download_dir {
        let path = service.download_artifact(&result, &dir).await?;
        println!("Saved {}", path.display());
    }

    info!(job_id = %controller.job().id(), "Build finished");
    Ok(())
}

pub async fn run_inspect(args: InspectArgs) -> Result<(), LpbError> {
    let config = load_effective_config(args.config.as_deref(), None)?;
    let mut controller = BuildJobController::from_config(&config);

    let files = read_candidates(&args.files).await?;
    let summary = controller.submit_support_candidates(files).await?;

    let report = InspectReport {
        assets: controller
            .job()
            .supporting_assets()
            .iter()
            .map(InspectedAsset::from)
            .collect(),
        skipped: summary.skipped,
        archives: summary.archives,
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize report: {}", e),
        }
        return Ok(());
    }

    for asset in &report.assets {
        println!("{:<40} {:<16} {:>10}", asset.name, asset.media_type, asset.size);
    }
    for name in &report.skipped {
        println!("{:<40} skipped", name);
    }
    println!(
        "{} asset(s), {} skipped, {} archive(s)",
        report.assets.len(),
        report.skipped.len(),
        report.archives
    );
    Ok(())
}
