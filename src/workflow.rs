//! The extraction-review-commit workflow state machine.
//!
//! The current [`WorkflowState`] is the single source of truth for which
//! actions are allowed. Both network actions move to their busy state
//! synchronously before the call starts, so a duplicate submission is
//! rejected by the guard rather than by any debounce logic. At most one
//! call is outstanding at a time; it runs to completion before any other
//! transition is accepted.

use crate::api::{ConfirmOutcome, ExtractionApi, UploadOutcome};
use crate::error::{AirStoreError, Result};
use crate::model::{DraftModel, EntryField, ExtractionDraft, SelectedFile};
use crate::reducer;
use std::path::Path;

/// A failed network attempt, carrying the service-provided message (or
/// the transport fallback). Never fatal: upload failures can be retried
/// or superseded by a new selection, confirm failures can be retried or
/// edited around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowFailure {
    Upload(String),
    Confirm(String),
}

impl WorkflowFailure {
    pub fn message(&self) -> &str {
        match self {
            WorkflowFailure::Upload(message) | WorkflowFailure::Confirm(message) => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    FileSelected,
    Uploading,
    Reviewing,
    Confirming,
    Succeeded,
    Failed(WorkflowFailure),
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowState::Idle => "idle",
            WorkflowState::FileSelected => "a file is selected",
            WorkflowState::Uploading => "uploading",
            WorkflowState::Reviewing => "reviewing",
            WorkflowState::Confirming => "confirming",
            WorkflowState::Succeeded => "succeeded",
            WorkflowState::Failed(WorkflowFailure::Upload(_)) => "upload failed",
            WorkflowState::Failed(WorkflowFailure::Confirm(_)) => "confirm failed",
        };
        write!(f, "{}", name)
    }
}

/// One user session digitizing one ledger page at a time.
///
/// Owns the selected file and the in-flight draft outright; generic over
/// the transport so tests can script outcomes.
pub struct Workflow<A: ExtractionApi> {
    api: A,
    state: WorkflowState,
    file: Option<SelectedFile>,
    draft: DraftModel,
}

impl<A: ExtractionApi> Workflow<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: WorkflowState::Idle,
            file: None,
            draft: DraftModel::default(),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn draft(&self) -> &DraftModel {
        &self.draft
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn reject(&self, action: &'static str) -> AirStoreError {
        AirStoreError::InvalidAction {
            action,
            state: self.state.to_string(),
        }
    }

    /// Choose the image to upload. Replaces any prior selection and
    /// discards a stale upload error.
    pub fn select_file(&mut self, path: &Path) -> Result<()> {
        match self.state {
            WorkflowState::Idle
            | WorkflowState::FileSelected
            | WorkflowState::Failed(WorkflowFailure::Upload(_)) => {}
            _ => return Err(self.reject("select a file")),
        }

        // Load before replacing, so a bad path leaves the session as it was.
        let file = SelectedFile::load(path)?;
        self.file = Some(file);
        self.state = WorkflowState::FileSelected;
        Ok(())
    }

    pub fn clear_file(&mut self) -> Result<()> {
        if self.state != WorkflowState::FileSelected {
            return Err(self.reject("clear the file"));
        }
        self.file = None;
        self.state = WorkflowState::Idle;
        Ok(())
    }

    /// Send the selected image for extraction.
    ///
    /// Also legal from a failed upload, which retries with the retained
    /// file. The session enters `Uploading` before the request is
    /// issued. A service or transport failure lands in
    /// `Failed(Upload)` with the file kept for retry; success lands in
    /// `Reviewing` with a fresh draft and releases the file.
    pub async fn upload(&mut self) -> Result<&WorkflowState> {
        match self.state {
            WorkflowState::FileSelected | WorkflowState::Failed(WorkflowFailure::Upload(_)) => {}
            _ => return Err(self.reject("upload")),
        }
        let Some(file) = self.file.take() else {
            return Err(self.reject("upload"));
        };

        self.state = WorkflowState::Uploading;
        let outcome = self.api.upload_image(&file).await;

        match outcome {
            UploadOutcome::Ok { record_id, entries } => {
                self.draft
                    .replace(ExtractionDraft::new(record_id, entries));
                self.state = WorkflowState::Reviewing;
                // file (and its preview) dropped here; it is irrelevant
                // once a draft exists
            }
            UploadOutcome::Err { message } => {
                self.file = Some(file);
                self.state = WorkflowState::Failed(WorkflowFailure::Upload(message));
            }
        }
        Ok(&self.state)
    }

    /// Apply one field correction to the draft. Legal only while
    /// reviewing; the state does not change.
    ///
    /// `index` must come from the rendered draft; an out-of-range index
    /// panics in the reducer.
    pub fn edit_entry(&mut self, index: usize, field: EntryField, value: String) -> Result<()> {
        if self.state != WorkflowState::Reviewing {
            return Err(self.reject("edit an entry"));
        }
        let Some(draft) = self.draft.get() else {
            return Err(self.reject("edit an entry"));
        };

        let next = reducer::apply(draft, index, field, value);
        self.draft.replace(next);
        Ok(())
    }

    /// Throw the draft away. The previously selected file is not
    /// restored; the session starts over from `Idle`.
    pub fn discard(&mut self) -> Result<()> {
        if self.state != WorkflowState::Reviewing {
            return Err(self.reject("discard"));
        }
        self.draft.clear();
        self.state = WorkflowState::Idle;
        Ok(())
    }

    /// Commit the current (possibly edited) draft to the record store.
    ///
    /// Also legal from a failed confirm, which retries with the full
    /// current draft. The session enters `Confirming` before the request
    /// is issued. On failure the draft is retained, still editable after
    /// [`Workflow::resume_review`].
    pub async fn confirm(&mut self) -> Result<&WorkflowState> {
        match self.state {
            WorkflowState::Reviewing | WorkflowState::Failed(WorkflowFailure::Confirm(_)) => {}
            _ => return Err(self.reject("confirm")),
        }
        let (record_id, entries) = match self.draft.get() {
            Some(draft) => (draft.record_id().to_string(), draft.owned_entries()),
            None => return Err(self.reject("confirm")),
        };

        self.state = WorkflowState::Confirming;
        let outcome = self.api.confirm_record(&record_id, &entries).await;

        match outcome {
            ConfirmOutcome::Ok => {
                self.draft.clear();
                self.file = None;
                self.state = WorkflowState::Succeeded;
            }
            ConfirmOutcome::Err { message } => {
                self.state = WorkflowState::Failed(WorkflowFailure::Confirm(message));
            }
        }
        Ok(&self.state)
    }

    /// Go back to editing after a failed confirm.
    pub fn resume_review(&mut self) -> Result<()> {
        if !matches!(
            self.state,
            WorkflowState::Failed(WorkflowFailure::Confirm(_))
        ) {
            return Err(self.reject("resume review"));
        }
        if !self.draft.present() {
            return Err(self.reject("resume review"));
        }
        self.state = WorkflowState::Reviewing;
        Ok(())
    }

    /// Start over for the next page.
    pub fn reset_after_success(&mut self) -> Result<()> {
        if self.state != WorkflowState::Succeeded {
            return Err(self.reject("reset"));
        }
        self.draft.clear();
        self.file = None;
        self.state = WorkflowState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(WorkflowState::Idle.to_string(), "idle");
        assert_eq!(WorkflowState::Uploading.to_string(), "uploading");
        assert_eq!(
            WorkflowState::Failed(WorkflowFailure::Upload("x".into())).to_string(),
            "upload failed"
        );
        assert_eq!(
            WorkflowState::Failed(WorkflowFailure::Confirm("x".into())).to_string(),
            "confirm failed"
        );
    }

    #[test]
    fn test_failure_message() {
        let failure = WorkflowFailure::Confirm("db unavailable".into());
        assert_eq!(failure.message(), "db unavailable");
    }
}
