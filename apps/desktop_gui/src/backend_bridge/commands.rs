//! Backend commands queued from UI to backend worker.

use client_core::{Generation, SubmitTicket};
use url::Url;

pub enum BackendCommand {
    Submit(SubmitTicket),
    /// Download and decode one result image for the run `generation`.
    FetchImage { generation: Generation, url: Url },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Submit(_) => "submit",
            BackendCommand::FetchImage { .. } => "fetch_image",
        }
    }
}
