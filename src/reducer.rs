//! Field-level corrections to an extraction draft.
//!
//! Each edit produces a new draft snapshot. Only the edited entry is
//! reconstructed; every other position keeps its `Arc` identity, so an
//! observer can tell exactly which entry changed.

use crate::model::{EntryField, ExtractionDraft, LedgerEntry};
use std::sync::Arc;

/// Replace one field of one entry.
///
/// `index` must be a valid position in `draft.entries()`; an
/// out-of-range index is a caller bug and panics. The value is stored
/// verbatim; no format validation happens here, so an edit is never
/// blocked on input shape.
pub fn apply(
    draft: &ExtractionDraft,
    index: usize,
    field: EntryField,
    value: String,
) -> ExtractionDraft {
    let mut entries: Vec<Arc<LedgerEntry>> = draft.entries().to_vec();

    let mut edited = (*entries[index]).clone();
    match field {
        EntryField::Date => edited.date = value,
        EntryField::Name => edited.name = value,
        EntryField::Amount => edited.amount = value,
        EntryField::Status => edited.status = value,
    }
    entries[index] = Arc::new(edited);

    ExtractionDraft::from_shared(draft.record_id().to_string(), entries)
}
