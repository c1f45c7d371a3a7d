//! Display fragments derived from a `WorkflowState`. Nothing here holds state.

use shared::domain::AnalysisResult;
use url::Url;

use crate::{http::ServiceEndpoint, workflow::WorkflowState};

pub const APP_TITLE: &str = "Malaria Detection App";
pub const CHOOSE_FILE_LABEL: &str = "Choose File";
pub const SUBMIT_LABEL: &str = "Upload and Analyse";
pub const UPLOADING_MESSAGE: &str = "Uploading file, please wait...";
pub const ANALYZING_MESSAGE: &str = "Analysis is loading, please wait...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPanel {
    pub title: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub caption: &'static str,
    pub alt: &'static str,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub panels: [SummaryPanel; 3],
    pub initial_image: ImageRef,
    pub processed_image: ImageRef,
}

/// What to draw below the file-choice control, which is always shown and
/// always interactable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub progress: Option<&'static str>,
    pub error_banner: Option<String>,
    pub result: Option<ResultView>,
}

pub fn render(state: &WorkflowState, endpoint: &ServiceEndpoint) -> View {
    match state {
        WorkflowState::Idle => View::default(),
        WorkflowState::Uploading => View {
            progress: Some(UPLOADING_MESSAGE),
            ..View::default()
        },
        WorkflowState::Analyzing => View {
            progress: Some(ANALYZING_MESSAGE),
            ..View::default()
        },
        WorkflowState::Failed(kind) => View {
            error_banner: Some(kind.message()),
            ..View::default()
        },
        WorkflowState::Succeeded(result) => View {
            result: Some(render_result(result, endpoint)),
            ..View::default()
        },
    }
}

fn render_result(result: &AnalysisResult, endpoint: &ServiceEndpoint) -> ResultView {
    ResultView {
        panels: [
            SummaryPanel {
                title: "Total Cell Count",
                value: result.total_cell_count.to_string(),
            },
            SummaryPanel {
                title: "Infected Cell Count",
                value: result.infected_cell_count.to_string(),
            },
            SummaryPanel {
                title: "Prediction",
                value: result.patient_status.clone(),
            },
        ],
        initial_image: ImageRef {
            caption: "Initial Image:",
            alt: "Initial DICOM scan",
            url: endpoint.display_image_url(&result.initial_image_path),
        },
        processed_image: ImageRef {
            caption: "Processed Image:",
            alt: "Processed analysis results",
            url: endpoint.display_image_url(&result.processed_image_path),
        },
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
