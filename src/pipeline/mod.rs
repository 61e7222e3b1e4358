//! Reshape pipeline over a [`SpreadsheetBackend`].
//!
//! Each operation resolves the sheets it needs first and fails with
//! [`AcceptsheetError::MissingSource`] before touching anything when one is
//! absent. After that, operations are plain sequences of range reads and
//! writes with no rollback: a failure part-way leaves earlier writes in place.
//!
//! The entity count is recounted at the start of every operation that needs
//! it and carried in a [`Layout`](crate::layout::Layout).

mod access;
mod create;
mod groups;
mod import;

pub use access::{clear_editable_regions, protect_ranges, remove_protections};
pub use create::create_sheet;
pub use groups::{add_groups, remove_groups};
pub use import::import_responses;

use serde::Serialize;

use crate::backend::{SheetRef, SpreadsheetBackend};
use crate::cell_ref::{CellRange, SheetId};
use crate::error::{AcceptsheetError, Result};
use crate::protection::ProtectionId;

/// Number of non-empty cells in column `col` from `first_row` (0-based) down
/// to the sheet's last row.
pub fn count_rows<B: SpreadsheetBackend + ?Sized>(
    backend: &B,
    sheet: SheetId,
    col: u32,
    first_row: u32,
) -> Result<u32> {
    let last_row = backend.last_row(sheet)?;
    if last_row <= first_row {
        return Ok(0);
    }
    let range = CellRange::new(first_row, col, last_row - first_row, 1);
    let column = backend.read_range(sheet, &range)?;
    let count = column
        .iter()
        .filter(|row| row.first().is_some_and(|v| !v.is_empty()))
        .count();
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Look up a configured sheet, naming its role when it is missing.
fn resolve<B: SpreadsheetBackend + ?Sized>(
    backend: &B,
    sheet: &SheetRef,
    role: &str,
) -> Result<SheetId> {
    backend
        .find_sheet(sheet)
        .ok_or_else(|| AcceptsheetError::MissingSource(format!("{role} sheet {sheet}")))
}

/// Result of [`create_sheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSheet {
    pub sheet: SheetId,
    /// Entities copied from the raw data sheet.
    pub row_count: u32,
}

/// Result of [`import_responses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub row_count: u32,
    /// Data rows written below the header (`row_count` per week slot).
    pub rows_written: u64,
}

/// Result of [`protect_ranges`]: what was locked and what could not be.
#[derive(Debug, Default)]
pub struct ProtectionReport {
    pub protected: Vec<(CellRange, ProtectionId)>,
    pub failed: Vec<(CellRange, AcceptsheetError)>,
}

impl ProtectionReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of [`clear_editable_regions`].
#[derive(Debug, Default)]
pub struct ClearReport {
    pub cleared: Vec<CellRange>,
    pub failed: Vec<(CellRange, AcceptsheetError)>,
}

impl ClearReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of [`remove_groups`] and [`add_groups`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    /// Groups removed.
    pub removed: usize,
    /// Group columns that had nothing to remove.
    pub missing: Vec<u32>,
    /// Groups created.
    pub added: usize,
}
