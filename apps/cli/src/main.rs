use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{
    load_settings,
    render::{render, ResultView},
    FileSelector, HttpAnalysisService, RawFile, UploadAnalysisController, WorkflowState,
};
use serde_json::json;
use shared::domain::AnalysisResult;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Upload one DICOM scan and print the malaria analysis")]
struct Args {
    /// Scan to submit; must end in `.dcm`.
    file: PathBuf,
    #[arg(long)]
    service_url: Option<String>,
    /// Give up on a request after this many seconds (0 waits forever).
    #[arg(long)]
    request_timeout_secs: Option<u64>,
    /// Print the result as a JSON object instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(service_url) = args.service_url {
        settings.service_url = service_url;
    }
    if let Some(secs) = args.request_timeout_secs {
        settings.request_timeout_secs = Some(secs);
    }
    let service = HttpAnalysisService::from_settings(&settings)?;

    let mut selector = FileSelector::new();
    let mut workflow = UploadAnalysisController::new();
    match selector.select(Some(RawFile::from_path(&args.file))) {
        Ok(_) => workflow.selection_accepted(),
        Err(err) => workflow.selection_rejected(err),
    }
    if let WorkflowState::Failed(kind) = workflow.state() {
        tracing::warn!(file = %args.file.display(), "selection rejected");
        bail!("{}", kind.message());
    }

    let state = workflow.submit(&service, selector.selected()).await;
    tracing::info!(file = %args.file.display(), state = state.name(), "run finished");
    let view = render(state, service.endpoint());
    match (state, view.result) {
        (WorkflowState::Succeeded(result), Some(result_view)) => {
            if args.json {
                println!("{}", result_json(result, &result_view));
            } else {
                print_result(result, &result_view);
            }
            Ok(())
        }
        (WorkflowState::Failed(kind), _) => bail!("{}", kind.message()),
        (other, _) => bail!("run stopped in state {}", other.name()),
    }
}

fn print_result(result: &AnalysisResult, view: &ResultView) {
    println!("{}", result.summary_line());
    for image in [&view.initial_image, &view.processed_image] {
        println!("{} {}", image.caption, image.url);
    }
}

fn result_json(result: &AnalysisResult, view: &ResultView) -> serde_json::Value {
    json!({
        "total_cell_count": result.total_cell_count,
        "infected_cell_count": result.infected_cell_count,
        "patient_status": result.patient_status,
        "initial_image_url": view.initial_image.url.as_str(),
        "processed_image_url": view.processed_image.url.as_str(),
    })
}
