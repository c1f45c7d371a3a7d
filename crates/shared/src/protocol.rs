use serde::{Deserialize, Serialize};

use crate::domain::AnalysisResult;

/// Body returned by `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filepath: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body sent to `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub filepath: String,
}

/// Body returned by `POST /analyze`.
///
/// Every field is optional on the wire: the service answers with only
/// `error` when it could not analyse the image, so the presence of
/// `total_cell_count` is what marks a successful analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cell_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infected_cell_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    pub fn has_cell_count(&self) -> bool {
        self.total_cell_count.is_some()
    }

    /// Builds the result when the body carries a cell count and every other
    /// result field.
    pub fn into_result(self) -> Option<AnalysisResult> {
        Some(AnalysisResult {
            total_cell_count: self.total_cell_count?,
            infected_cell_count: self.infected_cell_count?,
            patient_status: self.patient_status?,
            initial_image_path: self.initial_image_path?,
            processed_image_path: self.processed_image_path?,
        })
    }
}

/// Error body the service sends alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}
