use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use shared::error::ValidationError;

/// Label shown when no valid file is selected.
pub const NO_FILE_LABEL: &str = "No file chosen";

const ACCEPTED_EXTENSION: &str = "dcm";

/// Where the bytes of a chosen file live. Paths are read only at upload time.
#[derive(Debug, Clone)]
pub enum FileContent {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

impl FileContent {
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            FileContent::Path(path) => tokio::fs::read(path).await,
            FileContent::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// A file as handed over by the host (dialog, drag-and-drop, CLI argument).
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub content: FileContent,
}

impl RawFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            content: FileContent::Path(path.to_path_buf()),
        }
    }

    pub fn in_memory(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            content: FileContent::Memory(Arc::from(bytes)),
        }
    }
}

/// A file that passed extension validation.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    content: FileContent,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &FileContent {
        &self.content
    }
}

/// True when the text after the final `.` is `dcm`, ignoring case.
pub fn has_accepted_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, extension)| extension.eq_ignore_ascii_case(ACCEPTED_EXTENSION))
}

/// Holds the current selection and the file-name label shown next to the
/// file-choice control.
#[derive(Debug)]
pub struct FileSelector {
    selected: Option<SelectedFile>,
    label: String,
}

impl Default for FileSelector {
    fn default() -> Self {
        Self {
            selected: None,
            label: NO_FILE_LABEL.to_string(),
        }
    }
}

impl FileSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection. A missing or non-DICOM file clears whatever
    /// was selected before.
    pub fn select(&mut self, raw: Option<RawFile>) -> Result<&SelectedFile, ValidationError> {
        let Some(raw) = raw else {
            self.clear();
            return Err(ValidationError::NoFileChosen);
        };

        if !has_accepted_extension(&raw.name) {
            tracing::debug!(file = %raw.name, "rejected selection with unsupported extension");
            self.clear();
            return Err(ValidationError::InvalidExtension);
        }

        self.label = raw.name.clone();
        Ok(self.selected.insert(SelectedFile {
            name: raw.name,
            content: raw.content,
        }))
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn clear(&mut self) {
        self.selected = None;
        self.label = NO_FILE_LABEL.to_string();
    }
}

#[cfg(test)]
#[path = "tests/file_selector_tests.rs"]
mod tests;
