use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NO_FILE_MESSAGE: &str = "Please choose a file before uploading.";
pub const INVALID_EXTENSION_MESSAGE: &str =
    "Invalid file format. Please upload a DICOM (.dcm) file.";

/// Why a file selection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", INVALID_EXTENSION_MESSAGE)]
    InvalidExtension,
    #[error("{}", NO_FILE_MESSAGE)]
    NoFileChosen,
}

/// Failure kinds a workflow run can end in. `Display` is the banner text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("{}", NO_FILE_MESSAGE)]
    NoFileSelected,
    #[error("{}", INVALID_EXTENSION_MESSAGE)]
    InvalidExtension,
    #[error("Error uploading file. Please try again.")]
    UploadFailed,
    #[error("Analysis failed. Please try again.")]
    AnalysisFailed,
}

impl ErrorKind {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<ValidationError> for ErrorKind {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::InvalidExtension => ErrorKind::InvalidExtension,
            ValidationError::NoFileChosen => ErrorKind::NoFileSelected,
        }
    }
}
