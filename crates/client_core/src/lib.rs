use async_trait::async_trait;
use shared::domain::AnalysisResult;

pub mod config;
pub mod controller;
pub mod error;
pub mod file_selector;
pub mod http;
pub mod render;
pub mod workflow;

pub use config::{load_settings, ClientSettings};
pub use controller::{run_pipeline, Generation, SubmitTicket, UploadAnalysisController, WorkflowUpdate};
pub use error::ServiceError;
pub use file_selector::{FileContent, FileSelector, RawFile, SelectedFile, NO_FILE_LABEL};
pub use http::{HttpAnalysisService, ServiceEndpoint};
pub use workflow::{transition, WorkflowEvent, WorkflowState};

/// The remote collaborator: stores an upload, then analyzes it by path.
#[async_trait]
pub trait RemoteAnalysisService: Send + Sync {
    /// Returns the server-side path of the stored file.
    async fn upload(&self, file: &SelectedFile) -> Result<String, ServiceError>;
    async fn analyze(&self, filepath: &str) -> Result<AnalysisResult, ServiceError>;
}
