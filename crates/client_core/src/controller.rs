use shared::error::ValidationError;
use tracing::{debug, info, warn};

use crate::{
    file_selector::SelectedFile,
    workflow::{transition, WorkflowEvent, WorkflowState},
    RemoteAnalysisService,
};

/// Run counter. Each submit and each rejected selection starts a new one.
pub type Generation = u64;

/// A workflow event tagged with the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowUpdate {
    pub generation: Generation,
    pub event: WorkflowEvent,
}

/// Everything a worker needs to run one upload/analyze pipeline.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub generation: Generation,
    pub file: SelectedFile,
}

/// Owns the workflow state and decides which updates may change it.
///
/// Updates carrying an older generation than the controller's current one
/// are dropped, so when submissions overlap the latest one always wins.
#[derive(Debug, Default)]
pub struct UploadAnalysisController {
    state: WorkflowState,
    generation: Generation,
}

impl UploadAnalysisController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn selection_accepted(&mut self) {
        self.reduce(WorkflowEvent::SelectionAccepted);
    }

    /// Shows the validation banner and starts a new generation.
    ///
    /// A run still uploading or analyzing is discarded: its remaining
    /// updates, including a successful analysis result, are dropped by
    /// [`apply`](Self::apply) and never reach the state.
    pub fn selection_rejected(&mut self, err: ValidationError) {
        self.generation += 1;
        self.reduce(WorkflowEvent::SelectionRejected(err));
    }

    /// Starts a new run. Returns `None` (and fails the run) when nothing is
    /// selected; no remote call must be made in that case.
    pub fn begin_submit(&mut self, selected: Option<&SelectedFile>) -> Option<SubmitTicket> {
        self.generation += 1;
        let Some(file) = selected else {
            info!(generation = self.generation, "submit without a selected file");
            self.reduce(WorkflowEvent::SubmitWithoutFile);
            return None;
        };

        self.reduce(WorkflowEvent::UploadStarted);
        Some(SubmitTicket {
            generation: self.generation,
            file: file.clone(),
        })
    }

    /// Applies a pipeline update. Returns whether the state changed.
    pub fn apply(&mut self, update: WorkflowUpdate) -> bool {
        if update.generation != self.generation {
            debug!(
                generation = update.generation,
                current = self.generation,
                event = update.event.name(),
                "dropping update from superseded run"
            );
            return false;
        }
        self.reduce(update.event)
    }

    /// Runs a whole submit on the current task and returns the final state.
    pub async fn submit<S>(&mut self, service: &S, selected: Option<&SelectedFile>) -> &WorkflowState
    where
        S: RemoteAnalysisService + ?Sized,
    {
        if let Some(ticket) = self.begin_submit(selected) {
            run_pipeline(service, ticket, |update| {
                self.apply(update);
            })
            .await;
        }
        &self.state
    }

    fn reduce(&mut self, event: WorkflowEvent) -> bool {
        match transition(&self.state, &event) {
            Some(next) => {
                debug!(
                    generation = self.generation,
                    event = event.name(),
                    from = self.state.name(),
                    to = next.name(),
                    "workflow transition"
                );
                self.state = next;
                true
            }
            None => {
                debug!(
                    generation = self.generation,
                    event = event.name(),
                    state = self.state.name(),
                    "event does not apply in current state"
                );
                false
            }
        }
    }
}

/// Uploads the ticket's file, then analyzes the returned server path.
///
/// `analyze` is only called after `upload` succeeded. Every outcome is
/// reported through `emit`, tagged with the ticket's generation.
pub async fn run_pipeline<S, F>(service: &S, ticket: SubmitTicket, mut emit: F)
where
    S: RemoteAnalysisService + ?Sized,
    F: FnMut(WorkflowUpdate),
{
    let SubmitTicket { generation, file } = ticket;
    let tagged = |event: WorkflowEvent| WorkflowUpdate { generation, event };

    info!(generation, file = file.name(), "uploading selected file");
    let filepath = match service.upload(&file).await {
        Ok(filepath) => filepath,
        Err(err) => {
            warn!(generation, file = file.name(), "upload failed: {err}");
            emit(tagged(WorkflowEvent::UploadFailed));
            return;
        }
    };
    emit(tagged(WorkflowEvent::UploadSucceeded {
        filepath: filepath.clone(),
    }));

    info!(generation, filepath = %filepath, "requesting analysis");
    match service.analyze(&filepath).await {
        Ok(result) => {
            info!(
                generation,
                total_cell_count = result.total_cell_count,
                infected_cell_count = result.infected_cell_count,
                "analysis complete"
            );
            emit(tagged(WorkflowEvent::AnalysisSucceeded(result)));
        }
        Err(err) => {
            warn!(generation, filepath = %filepath, "analysis failed: {err}");
            emit(tagged(WorkflowEvent::AnalysisFailed));
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
