//! Interactive review of an extraction draft.
//!
//! Commands at the review prompt:
//! - `e <row> <field> <value>` edit one field (row numbers are 1-based)
//! - `d` discard the draft
//! - `c` confirm and push to the store
//! - `q` quit without saving

use crate::error::{AirStoreError, Result};
use crate::model::{EntryField, LedgerEntry};
use dialoguer::Input;
use std::str::FromStr;

/// One action taken from the review prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    Edit {
        index: usize,
        field: EntryField,
        value: String,
    },
    Discard,
    Confirm,
    Quit,
}

/// Parse a review command line.
///
/// Row numbers are 1-based on the prompt and 0-based in the returned
/// action; out-of-range rows are rejected here so the reducer only ever
/// sees valid indices.
pub fn parse_review_command(
    line: &str,
    entry_count: usize,
) -> std::result::Result<ReviewAction, String> {
    let trimmed = line.trim();

    match trimmed {
        "c" | "confirm" => return Ok(ReviewAction::Confirm),
        "d" | "discard" => return Ok(ReviewAction::Discard),
        "q" | "quit" => return Ok(ReviewAction::Quit),
        _ => {}
    }

    let rest = trimmed
        .strip_prefix("edit ")
        .or_else(|| trimmed.strip_prefix("e "))
        .ok_or_else(|| format!("Unknown command: {}. Use e, d, c, or q", trimmed))?;

    // Value may contain spaces, so split off at most row and field.
    let mut parts = rest.trim().splitn(3, char::is_whitespace);

    let row: usize = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing row number".to_string())?
        .parse()
        .map_err(|_| "Row must be a number".to_string())?;
    if row == 0 || row > entry_count {
        return Err(format!("Row out of range: {} (1-{})", row, entry_count));
    }

    let field = parts
        .next()
        .ok_or_else(|| "Missing field name".to_string())
        .and_then(|s| EntryField::from_str(s))?;

    let value = parts.next().unwrap_or("").trim().to_string();

    Ok(ReviewAction::Edit {
        index: row - 1,
        field,
        value,
    })
}

/// Render the draft entries as a numbered table.
pub fn render_entries(entries: &[LedgerEntry]) -> String {
    let mut widths = ["#".len(), "date".len(), "name".len(), "amount".len()];
    for (i, entry) in entries.iter().enumerate() {
        widths[0] = widths[0].max((i + 1).to_string().chars().count());
        widths[1] = widths[1].max(entry.date.chars().count());
        widths[2] = widths[2].max(entry.name.chars().count());
        widths[3] = widths[3].max(entry.amount.chars().count());
    }

    let mut out = String::new();
    out.push_str(&format!(
        "  {:>w0$}  {:<w1$}  {:<w2$}  {:>w3$}  {}\n",
        "#",
        "date",
        "name",
        "amount",
        "status",
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    ));
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "  {:>w0$}  {:<w1$}  {:<w2$}  {:>w3$}  {}\n",
            i + 1,
            entry.date,
            entry.name,
            entry.amount,
            entry.status,
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        ));
    }
    out
}

/// Prompt until a well-formed action is entered.
pub fn prompt_action(entry_count: usize) -> Result<ReviewAction> {
    loop {
        let input: String = Input::new()
            .with_prompt("review (e <row> <field> <value> / d / c / q)")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AirStoreError::Prompt(e.to_string()))?;

        match parse_review_command(&input, entry_count) {
            Ok(action) => return Ok(action),
            Err(message) => println!("  ✗ {}", message),
        }
    }
}
