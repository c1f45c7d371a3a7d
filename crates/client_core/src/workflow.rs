use shared::{
    domain::AnalysisResult,
    error::{ErrorKind, ValidationError},
};

/// The single value the UI renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorkflowState {
    #[default]
    Idle,
    Uploading,
    Analyzing,
    Succeeded(AnalysisResult),
    Failed(ErrorKind),
}

impl WorkflowState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, WorkflowState::Uploading | WorkflowState::Analyzing)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            WorkflowState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            WorkflowState::Failed(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Uploading => "uploading",
            WorkflowState::Analyzing => "analyzing",
            WorkflowState::Succeeded(_) => "succeeded",
            WorkflowState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    SubmitWithoutFile,
    SelectionRejected(ValidationError),
    SelectionAccepted,
    UploadStarted,
    UploadSucceeded { filepath: String },
    UploadFailed,
    AnalysisSucceeded(AnalysisResult),
    AnalysisFailed,
}

impl WorkflowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::SubmitWithoutFile => "submit_without_file",
            WorkflowEvent::SelectionRejected(_) => "selection_rejected",
            WorkflowEvent::SelectionAccepted => "selection_accepted",
            WorkflowEvent::UploadStarted => "upload_started",
            WorkflowEvent::UploadSucceeded { .. } => "upload_succeeded",
            WorkflowEvent::UploadFailed => "upload_failed",
            WorkflowEvent::AnalysisSucceeded(_) => "analysis_succeeded",
            WorkflowEvent::AnalysisFailed => "analysis_failed",
        }
    }
}

/// Next state for `event`, or `None` when the event does not apply in
/// `state` (the state is then left as is).
///
/// Phase completions are only accepted in the phase they complete:
/// `Uploading -> Analyzing -> {Succeeded | Failed}`. Submits and selection
/// failures apply from every state.
pub fn transition(state: &WorkflowState, event: &WorkflowEvent) -> Option<WorkflowState> {
    use WorkflowEvent as E;
    use WorkflowState as S;

    match (state, event) {
        (_, E::SubmitWithoutFile) => Some(S::Failed(ErrorKind::NoFileSelected)),
        (_, E::SelectionRejected(err)) => Some(S::Failed((*err).into())),
        (S::Failed(_), E::SelectionAccepted) => Some(S::Idle),
        (_, E::SelectionAccepted) => None,
        (_, E::UploadStarted) => Some(S::Uploading),
        (S::Uploading, E::UploadSucceeded { .. }) => Some(S::Analyzing),
        (S::Uploading, E::UploadFailed) => Some(S::Failed(ErrorKind::UploadFailed)),
        (S::Analyzing, E::AnalysisSucceeded(result)) => Some(S::Succeeded(result.clone())),
        (S::Analyzing, E::AnalysisFailed) => Some(S::Failed(ErrorKind::AnalysisFailed)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
