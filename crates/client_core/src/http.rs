use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use shared::{
    domain::AnalysisResult,
    protocol::{AnalyzeRequest, AnalyzeResponse, ServiceErrorBody, UploadResponse},
};
use tracing::debug;
use url::Url;

use crate::{
    config::ClientSettings, error::ServiceError, file_selector::SelectedFile,
    RemoteAnalysisService,
};

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

const UPLOAD: &str = "upload";
const ANALYZE: &str = "analyze";
const DISPLAY_IMAGE: &str = "display_image";
const UPLOAD_FIELD: &str = "file";

/// Base address of the analysis service and the URLs derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    base: Url,
}

impl ServiceEndpoint {
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        let raw = raw.trim();
        let invalid = |reason: String| ServiceError::InvalidServiceUrl {
            url: raw.to_string(),
            reason,
        };
        let base = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }
        if base.cannot_be_a_base() {
            return Err(invalid("url cannot carry a path".to_string()));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn upload_url(&self) -> Url {
        self.join(&[UPLOAD])
    }

    pub fn analyze_url(&self) -> Url {
        self.join(&[ANALYZE])
    }

    /// URL the service serves `image_path`'s final segment from.
    pub fn display_image_url(&self, image_path: &str) -> Url {
        self.join(&[DISPLAY_IMAGE, final_path_segment(image_path)])
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Last segment of a server-side path, accepting both separators.
pub fn final_path_segment(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// `RemoteAnalysisService` over the service's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    http: Client,
    endpoint: ServiceEndpoint,
}

impl HttpAnalysisService {
    pub fn new(endpoint: ServiceEndpoint) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    /// Without a timeout a hung request keeps its run in flight indefinitely.
    pub fn with_timeout(
        endpoint: ServiceEndpoint,
        timeout: Option<Duration>,
    ) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ServiceError::Client)?;
        Ok(Self { http, endpoint })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ServiceError> {
        let endpoint = ServiceEndpoint::parse(&settings.service_url)?;
        Self::with_timeout(endpoint, settings.request_timeout())
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Downloads one of the images the service publishes for a result.
    pub async fn fetch_image(&self, url: &Url) -> Result<Vec<u8>, ServiceError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(transport(DISPLAY_IMAGE))?;
        let bytes = ensure_success(DISPLAY_IMAGE, response)
            .await?
            .bytes()
            .await
            .map_err(transport(DISPLAY_IMAGE))?;
        debug!(url = %url, size_bytes = bytes.len(), "fetched result image");
        Ok(bytes.to_vec())
    }
}

fn transport(endpoint: &'static str) -> impl FnOnce(reqwest::Error) -> ServiceError {
    move |source| ServiceError::Transport { endpoint, source }
}

async fn ensure_success(endpoint: &'static str, response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ServiceErrorBody>()
        .await
        .ok()
        .map(|body| body.error);
    Err(ServiceError::Status {
        endpoint,
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteAnalysisService for HttpAnalysisService {
    async fn upload(&self, file: &SelectedFile) -> Result<String, ServiceError> {
        let bytes = file
            .content()
            .read()
            .await
            .map_err(|source| ServiceError::ReadFile {
                name: file.name().to_string(),
                source,
            })?;
        let mime = mime_guess::from_path(file.name()).first_or_octet_stream();
        let size_bytes = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file.name().to_string())
            .mime_str(mime.essence_str())
            .map_err(transport(UPLOAD))?;

        let response = self
            .http
            .post(self.endpoint.upload_url())
            .multipart(Form::new().part(UPLOAD_FIELD, part))
            .send()
            .await
            .map_err(transport(UPLOAD))?;
        let body: UploadResponse = ensure_success(UPLOAD, response)
            .await?
            .json()
            .await
            .map_err(transport(UPLOAD))?;

        debug!(
            file = file.name(),
            size_bytes,
            filepath = %body.filepath,
            "upload accepted"
        );
        Ok(body.filepath)
    }

    async fn analyze(&self, filepath: &str) -> Result<AnalysisResult, ServiceError> {
        let response = self
            .http
            .post(self.endpoint.analyze_url())
            .json(&AnalyzeRequest {
                filepath: filepath.to_string(),
            })
            .send()
            .await
            .map_err(transport(ANALYZE))?;
        let body: AnalyzeResponse = ensure_success(ANALYZE, response)
            .await?
            .json()
            .await
            .map_err(transport(ANALYZE))?;

        if !body.has_cell_count() {
            return Err(ServiceError::AnalysisRejected { reason: body.error });
        }
        body.into_result()
            .ok_or_else(|| ServiceError::AnalysisRejected {
                reason: Some("incomplete analysis result".to_string()),
            })
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
