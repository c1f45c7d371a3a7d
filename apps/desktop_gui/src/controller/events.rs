//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{Generation, WorkflowUpdate};
use url::Url;

pub enum UiEvent {
    Info(String),
    Workflow(WorkflowUpdate),
    Image(ImageLoad),
    Error(UiError),
}

/// Decoded RGBA pixels, ready to become a texture on the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Outcome of a `FetchImage` command.
pub struct ImageLoad {
    pub generation: Generation,
    pub url: Url,
    pub outcome: Result<PreviewImage, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Configuration,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Submit,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Configuration => "Configuration",
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid service url")
            || message_lower.contains("unsupported scheme")
            || message_lower.contains("failed to build http client")
        {
            UiErrorCategory::Configuration
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("transport")
            || message_lower.contains("disconnect")
            || message_lower.contains("queue")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status line text shown at the bottom of the window.
    pub fn status_text(&self) -> String {
        match self.context {
            UiErrorContext::BackendStartup => format!(
                "{} error: {} (restart the app to retry)",
                err_label(self.category),
                self.message
            ),
            UiErrorContext::Submit => {
                format!("{} error: {}", err_label(self.category), self.message)
            }
        }
    }
}
