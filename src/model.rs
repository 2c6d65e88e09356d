//! Core data model: ledger entries, the in-flight extraction draft, and
//! the locally selected image file.

use crate::error::{AirStoreError, Result};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One structured ledger line item, exactly as extracted.
///
/// All fields are free-form text. The amount is deliberately kept as
/// text so user corrections survive byte for byte; any numeric coercion
/// happens on the backend, after confirm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerEntry {
    pub date: String,
    pub name: String,
    pub amount: String,
    pub status: String,
}

/// Editable field of a [`LedgerEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Date,
    Name,
    Amount,
    Status,
}

impl EntryField {
    pub const ALL: [EntryField; 4] = [
        EntryField::Date,
        EntryField::Name,
        EntryField::Amount,
        EntryField::Status,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            EntryField::Date => "date",
            EntryField::Name => "name",
            EntryField::Amount => "amount",
            EntryField::Status => "status",
        }
    }
}

impl std::str::FromStr for EntryField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(EntryField::Date),
            "name" | "description" => Ok(EntryField::Name),
            "amount" => Ok(EntryField::Amount),
            "status" => Ok(EntryField::Status),
            _ => Err(format!(
                "Unknown field: {}. Use date, name, amount, or status",
                s
            )),
        }
    }
}

impl std::fmt::Display for EntryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One extraction result pending confirmation.
///
/// Entry identity is positional; the order returned by the extraction
/// service is preserved through edits and on confirm. Entries are held
/// behind `Arc` so an edit reconstructs only the edited position and
/// untouched entries keep their identity across snapshots.
#[derive(Debug, Clone)]
pub struct ExtractionDraft {
    record_id: String,
    entries: Vec<Arc<LedgerEntry>>,
}

impl ExtractionDraft {
    pub fn new(record_id: String, entries: Vec<LedgerEntry>) -> Self {
        Self {
            record_id,
            entries: entries.into_iter().map(Arc::new).collect(),
        }
    }

    pub(crate) fn from_shared(record_id: String, entries: Vec<Arc<LedgerEntry>>) -> Self {
        Self { record_id, entries }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn entries(&self) -> &[Arc<LedgerEntry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cloned entries in extraction order, suitable for the wire.
    pub fn owned_entries(&self) -> Vec<LedgerEntry> {
        self.entries.iter().map(|e| (**e).clone()).collect()
    }
}

/// Holds at most one [`ExtractionDraft`].
#[derive(Debug, Default)]
pub struct DraftModel {
    draft: Option<ExtractionDraft>,
}

impl DraftModel {
    pub fn present(&self) -> bool {
        self.draft.is_some()
    }

    pub fn get(&self) -> Option<&ExtractionDraft> {
        self.draft.as_ref()
    }

    /// Current entries in order, cloned. Empty when no draft is held.
    pub fn snapshot(&self) -> Vec<LedgerEntry> {
        self.draft
            .as_ref()
            .map(|d| d.owned_entries())
            .unwrap_or_default()
    }

    pub(crate) fn replace(&mut self, draft: ExtractionDraft) {
        self.draft = Some(draft);
    }

    pub(crate) fn clear(&mut self) {
        self.draft = None;
    }
}

/// Locally generated preview metadata for a selected image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePreview {
    pub width: u32,
    pub height: u32,
    pub format: image::ImageFormat,
}

/// The image chosen for upload, with its preview.
///
/// Exactly one is held at a time; selecting a new file drops the
/// previous one and its preview.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub preview: ImagePreview,
}

impl SelectedFile {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AirStoreError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;

        let format = image::guess_format(&bytes)
            .map_err(|e| AirStoreError::ImageLoad(format!("{}: {}", path.display(), e)))?;
        let (width, height) = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| AirStoreError::ImageLoad(format!("{}: {}", path.display(), e)))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            bytes,
            preview: ImagePreview {
                width,
                height,
                format,
            },
        })
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn exceeds_mb(&self, limit_mb: u64) -> bool {
        self.size_bytes() > limit_mb * 1024 * 1024
    }

    pub fn mime_type(&self) -> &'static str {
        self.preview.format.to_mime_type()
    }
}
