//! The spreadsheet collaborator the pipeline drives.
//!
//! Everything the pipeline needs from a spreadsheet host goes through
//! [`SpreadsheetBackend`]: range I/O, protections, column grouping, sheet
//! lookup and the effective user. [`crate::memory::MemoryWorkbook`] is the
//! in-process implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell_ref::{CellRange, SheetId};
use crate::error::Result;
use crate::protection::{ProtectionId, ProtectionKind, RangeProtection};
use crate::types::Grid;

/// How a sheet is looked up: by tab name or by grid id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetRef {
    Id(u32),
    Name(String),
}

impl SheetRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl From<SheetId> for SheetRef {
    fn from(id: SheetId) -> Self {
        Self::Id(id.0)
    }
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "sheet #{id}"),
            Self::Name(name) => write!(f, "\"{name}\""),
        }
    }
}

/// Range I/O and access control over a spreadsheet.
///
/// Calls are independent; the trait makes no transactional promise across
/// them.
pub trait SpreadsheetBackend {
    /// Look a sheet up by name or id.
    fn find_sheet(&self, sheet: &SheetRef) -> Option<SheetId>;

    fn sheet_name(&self, sheet: SheetId) -> Result<String>;

    /// 1-based index of the last row holding a value (0 for an empty sheet).
    fn last_row(&self, sheet: SheetId) -> Result<u32>;

    /// Copy `template` (values, grid size, grouping) into a new sheet.
    fn duplicate_sheet(&mut self, template: SheetId) -> Result<SheetId>;

    /// Current values; empty cells come back as `CellValue::Empty`.
    fn read_range(&self, sheet: SheetId, range: &CellRange) -> Result<Grid>;

    /// Overwrite `range`; `values` must have exactly the range's shape.
    fn write_range(&mut self, sheet: SheetId, range: &CellRange, values: &Grid) -> Result<()>;

    /// Clear values only; protections and grouping stay.
    fn clear_range(&mut self, sheet: SheetId, range: &CellRange) -> Result<()>;

    /// Clear every value on the sheet.
    fn clear_sheet(&mut self, sheet: SheetId) -> Result<()>;

    fn protect_range(&mut self, sheet: SheetId, range: &CellRange) -> Result<ProtectionId>;

    /// Make `editor` the only editor of the protection.
    fn set_sole_editor(&mut self, protection: ProtectionId, editor: &str) -> Result<()>;

    /// Whether the domain-wide edit flag can be changed on this protection.
    fn can_domain_edit(&self, protection: ProtectionId) -> Result<bool>;

    fn set_domain_edit(&mut self, protection: ProtectionId, allowed: bool) -> Result<()>;

    /// Snapshot of every protection of `kind` in the workbook.
    fn list_protections(&self, kind: ProtectionKind) -> Vec<RangeProtection>;

    /// Whether the effective user may edit (and so remove) the protection.
    fn can_edit(&self, protection: ProtectionId) -> Result<bool>;

    fn remove_protection(&mut self, protection: ProtectionId) -> Result<()>;

    /// Identity the operations run as.
    fn effective_user(&self) -> String;

    /// Remove the column group of `depth` at `col`.
    ///
    /// Fails with `GroupNotFound` when there is none.
    fn remove_column_group(&mut self, sheet: SheetId, col: u32, depth: u8) -> Result<()>;

    /// Raise or lower the group depth of the range's columns.
    fn shift_column_group_depth(&mut self, sheet: SheetId, range: &CellRange, delta: i8)
        -> Result<()>;
}
