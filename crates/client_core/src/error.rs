use thiserror::Error;

/// Failures talking to the analysis service or preparing a request for it.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with status {status}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: Option<String>,
    },
    #[error("failed to read selected file '{name}': {source}")]
    ReadFile {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("analysis response has no cell count")]
    AnalysisRejected { reason: Option<String> },
    #[error("invalid service url '{url}': {reason}")]
    InvalidServiceUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ServiceError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ServiceError::Transport { source, .. } if source.is_timeout())
    }
}
