//! Client-side extraction-review-commit workflow for the AirStore
//! ledger digitization backend.
//!
//! The pieces, leaf first:
//! - [`model`]: ledger entries, the in-flight draft, the selected file
//! - [`reducer`]: copy-on-write field edits to a draft
//! - [`api`]: the two HTTP operations (`/upload`, `/confirm/{id}`)
//! - [`workflow`]: the state machine that owns all of the above
//! - [`review`], [`cli`]: the interactive terminal front end

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod reducer;
pub mod review;
pub mod workflow;

pub use error::{AirStoreError, Result};
pub use model::{DraftModel, EntryField, ExtractionDraft, LedgerEntry, SelectedFile};
pub use workflow::{Workflow, WorkflowFailure, WorkflowState};
