use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use client_core::{
    render::render, FileSelector, HttpAnalysisService, RawFile, ServiceEndpoint,
    UploadAnalysisController, WorkflowState, NO_FILE_LABEL,
};
use serde_json::{json, Value};
use shared::{domain::AnalysisResult, error::ErrorKind};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct CallCounts {
    uploads: Arc<AtomicUsize>,
    analyses: Arc<AtomicUsize>,
}

async fn upload(State(counts): State<CallCounts>) -> Json<Value> {
    counts.uploads.fetch_add(1, Ordering::SeqCst);
    Json(json!({"message": "File uploaded successfully", "filepath": "/tmp/scan.dcm"}))
}

async fn analyze(
    State(counts): State<CallCounts>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    counts.analyses.fetch_add(1, Ordering::SeqCst);
    if body.get("filepath") != Some(&json!("/tmp/scan.dcm")) {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "File not found"})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "total_cell_count": 120,
            "infected_cell_count": 15,
            "patient_status": "Positive",
            "initial_image_path": "/tmp/a.png",
            "processed_image_path": "/tmp/b.png"
        })),
    )
}

async fn spawn_service() -> (ServiceEndpoint, CallCounts) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let counts = CallCounts::default();
    let app = Router::new()
        .route("/upload", post(upload))
        .route("/analyze", post(analyze))
        .with_state(counts.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (
        ServiceEndpoint::parse(&format!("http://{addr}")).expect("endpoint"),
        counts,
    )
}

#[tokio::test]
async fn dicom_scan_upload_and_analysis_acceptance() {
    let (endpoint, counts) = spawn_service().await;
    let service = HttpAnalysisService::new(endpoint.clone());
    let mut selector = FileSelector::new();
    let mut controller = UploadAnalysisController::new();

    selector
        .select(Some(RawFile::in_memory("scan.dcm", b"DICM".to_vec())))
        .expect("select scan.dcm");
    controller.selection_accepted();
    assert_eq!(selector.label(), "scan.dcm");

    let state = controller.submit(&service, selector.selected()).await.clone();

    assert_eq!(
        state,
        WorkflowState::Succeeded(AnalysisResult {
            total_cell_count: 120,
            infected_cell_count: 15,
            patient_status: "Positive".to_string(),
            initial_image_path: "/tmp/a.png".to_string(),
            processed_image_path: "/tmp/b.png".to_string(),
        })
    );
    assert_eq!(counts.uploads.load(Ordering::SeqCst), 1);
    assert_eq!(counts.analyses.load(Ordering::SeqCst), 1);

    let view = render(&state, &endpoint);
    let result = view.result.expect("result view");
    assert!(result.initial_image.url.as_str().ends_with("/display_image/a.png"));
    assert!(result.processed_image.url.as_str().ends_with("/display_image/b.png"));
}

#[tokio::test]
async fn non_dicom_selection_makes_no_calls_acceptance() {
    let (endpoint, counts) = spawn_service().await;
    let service = HttpAnalysisService::new(endpoint);
    let mut selector = FileSelector::new();
    let mut controller = UploadAnalysisController::new();

    let err = selector
        .select(Some(RawFile::in_memory("scan.txt", b"text".to_vec())))
        .expect_err("txt must be rejected");
    controller.selection_rejected(err);

    assert_eq!(
        controller.state(),
        &WorkflowState::Failed(ErrorKind::InvalidExtension)
    );
    assert_eq!(selector.label(), NO_FILE_LABEL);

    let state = controller.submit(&service, selector.selected()).await;
    assert_eq!(state, &WorkflowState::Failed(ErrorKind::NoFileSelected));
    assert_eq!(counts.uploads.load(Ordering::SeqCst), 0);
    assert_eq!(counts.analyses.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_service_fails_upload_acceptance() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let service = HttpAnalysisService::new(
        ServiceEndpoint::parse(&format!("http://{addr}")).expect("endpoint"),
    );
    let mut selector = FileSelector::new();
    let mut controller = UploadAnalysisController::new();
    selector
        .select(Some(RawFile::in_memory("scan.dcm", b"DICM".to_vec())))
        .expect("select");

    let state = controller.submit(&service, selector.selected()).await;

    assert_eq!(state, &WorkflowState::Failed(ErrorKind::UploadFailed));
}
