use serde::{Deserialize, Serialize};

/// Outcome of a completed analysis run as reported by the analysis service.
///
/// `infected_cell_count <= total_cell_count` is guaranteed by the service and
/// not re-checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_cell_count: u64,
    pub infected_cell_count: u64,
    pub patient_status: String,
    pub initial_image_path: String,
    pub processed_image_path: String,
}

impl AnalysisResult {
    pub fn summary_line(&self) -> String {
        format!(
            "Total Cell Count: {} | Infected Cell Count: {} | Prediction: {}",
            self.total_cell_count, self.infected_cell_count, self.patient_status
        )
    }
}
