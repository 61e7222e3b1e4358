//! In-memory spreadsheet implementing [`SpreadsheetBackend`].
//!
//! Mirrors the host's observable behavior closely enough for the pipeline:
//! sheets have a grid size that reads, clears and protections must respect
//! (writes grow it), protections carry editor lists, and column grouping is
//! kept as per-column outline levels.

use std::path::Path;

use crate::backend::{SheetRef, SpreadsheetBackend};
use crate::cell_ref::{CellRange, SheetId, SheetRange};
use crate::error::{AcceptsheetError, Result};
use crate::outlines::{self, ColumnGroup};
use crate::protection::{ProtectionId, ProtectionKind, RangeProtection};
use crate::types::{grid_shape, Grid, Session, Sheet, Workbook};

/// An owned workbook plus the session operations run under.
#[derive(Debug, Clone)]
pub struct MemoryWorkbook {
    workbook: Workbook,
}

impl MemoryWorkbook {
    pub fn new(session: Session) -> Self {
        Self {
            workbook: Workbook::new(session),
        }
    }

    pub fn from_workbook(workbook: Workbook) -> Self {
        Self { workbook }
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn into_workbook(self) -> Workbook {
        self.workbook
    }

    /// Add an empty sheet with the default grid size.
    pub fn add_sheet(&mut self, name: &str) -> SheetId {
        let id = SheetId(self.workbook.next_sheet_id);
        self.insert_sheet(Sheet::new(id, name))
    }

    /// Add a prepared sheet (e.g. parsed from CSV); it receives a fresh id.
    pub fn insert_sheet(&mut self, mut sheet: Sheet) -> SheetId {
        let id = SheetId(self.workbook.next_sheet_id);
        self.workbook.next_sheet_id += 1;
        sheet.id = id;
        sheet.name = self.workbook.unique_sheet_name(&sheet.name);
        self.workbook.sheets.push(sheet);
        id
    }

    pub fn sheet(&self, id: SheetId) -> Result<&Sheet> {
        self.workbook
            .sheet(id)
            .ok_or(AcceptsheetError::UnknownSheet(id.0))
    }

    fn sheet_mut(&mut self, id: SheetId) -> Result<&mut Sheet> {
        self.workbook
            .sheet_mut(id)
            .ok_or(AcceptsheetError::UnknownSheet(id.0))
    }

    /// Resize a sheet's grid (values outside the new grid are kept).
    pub fn set_grid(&mut self, id: SheetId, rows: u32, cols: u32) -> Result<()> {
        let sheet = self.sheet_mut(id)?;
        sheet.grid_rows = rows;
        sheet.grid_cols = cols;
        Ok(())
    }

    /// Switch the identity subsequent operations run as.
    pub fn set_effective_user(&mut self, user: &str) {
        self.workbook.session.effective_user = user.to_string();
    }

    /// Protect a whole sheet (a [`ProtectionKind::Sheet`] record).
    pub fn protect_sheet(&mut self, id: SheetId) -> Result<ProtectionId> {
        let sheet = self.sheet(id)?;
        let range = CellRange::new(0, 0, sheet.grid_rows, sheet.grid_cols);
        let pid = self.next_protection(id, range);
        if let Ok(p) = self.protection_mut(pid) {
            p.kind = ProtectionKind::Sheet;
        }
        Ok(pid)
    }

    /// Column groups of a sheet at `depth`, left to right.
    pub fn column_groups(&self, id: SheetId, depth: u8) -> Result<Vec<ColumnGroup>> {
        Ok(outlines::column_groups(&self.sheet(id)?.outline_level_col, depth))
    }

    /// Protections whose range lies on `id`.
    pub fn protections_on(&self, id: SheetId) -> Vec<&RangeProtection> {
        self.workbook
            .protections
            .iter()
            .filter(|p| p.sheet() == id)
            .collect()
    }

    /// Pretty JSON snapshot of the whole workbook.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.workbook)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_workbook(serde_json::from_str(json)?))
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn next_protection(&mut self, sheet: SheetId, range: CellRange) -> ProtectionId {
        let id = ProtectionId(self.workbook.next_protection_id);
        self.workbook.next_protection_id += 1;
        let session = &self.workbook.session;
        let protection = RangeProtection::new(
            id,
            SheetRange::new(sheet, range),
            &session.effective_user,
            session.domain.is_some(),
        );
        self.workbook.protections.push(protection);
        id
    }

    fn protection(&self, id: ProtectionId) -> Result<&RangeProtection> {
        self.workbook
            .protections
            .iter()
            .find(|p| p.id == id)
            .ok_or(AcceptsheetError::UnknownProtection(id.0))
    }

    fn protection_mut(&mut self, id: ProtectionId) -> Result<&mut RangeProtection> {
        self.workbook
            .protections
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AcceptsheetError::UnknownProtection(id.0))
    }

    fn check_in_grid(sheet: &Sheet, range: &CellRange) -> Result<()> {
        if sheet.in_grid(range) {
            Ok(())
        } else {
            Err(AcceptsheetError::OutOfBounds {
                range: range.to_string(),
                rows: sheet.grid_rows,
                cols: sheet.grid_cols,
            })
        }
    }
}

impl SpreadsheetBackend for MemoryWorkbook {
    fn find_sheet(&self, sheet: &SheetRef) -> Option<SheetId> {
        match sheet {
            SheetRef::Id(id) => self.workbook.sheet(SheetId(*id)).map(|s| s.id),
            SheetRef::Name(name) => self.workbook.sheet_by_name(name).map(|s| s.id),
        }
    }

    fn sheet_name(&self, sheet: SheetId) -> Result<String> {
        Ok(self.sheet(sheet)?.name.clone())
    }

    fn last_row(&self, sheet: SheetId) -> Result<u32> {
        Ok(self.sheet(sheet)?.last_row())
    }

    fn duplicate_sheet(&mut self, template: SheetId) -> Result<SheetId> {
        let mut copy = self.sheet(template)?.clone();
        copy.name = format!("Copy of {}", copy.name);
        let id = self.insert_sheet(copy);
        log::debug!("duplicated sheet {template} as {id}");
        Ok(id)
    }

    fn read_range(&self, sheet: SheetId, range: &CellRange) -> Result<Grid> {
        let sheet = self.sheet(sheet)?;
        Self::check_in_grid(sheet, range)?;
        let rows = if range.is_whole_columns() {
            range.with_rows(0, sheet.grid_rows)
        } else {
            *range
        };
        Ok((rows.start_row..rows.start_row + rows.row_span)
            .map(|r| {
                (rows.start_col..rows.start_col + rows.col_span)
                    .map(|c| sheet.get(r, c).clone())
                    .collect()
            })
            .collect())
    }

    fn write_range(&mut self, sheet: SheetId, range: &CellRange, values: &Grid) -> Result<()> {
        let expected = (range.row_span as usize, range.col_span as usize);
        let actual = grid_shape(values);
        // A zero-row grid has no column count to compare.
        let matches = match actual {
            Some((0, _)) => expected.0 == 0,
            Some(shape) => shape == expected,
            None => false,
        };
        if !matches {
            return Err(AcceptsheetError::ShapeMismatch {
                range: range.to_string(),
                expected: range.shape(),
                actual: actual.map_or_else(
                    || "ragged".to_string(),
                    |(rows, cols)| format!("{rows}x{cols}"),
                ),
            });
        }

        let sheet = self.sheet_mut(sheet)?;
        for (row, row_values) in (range.start_row..).zip(values) {
            for (col, value) in (range.start_col..).zip(row_values) {
                sheet.set(row, col, value.clone());
            }
        }
        Ok(())
    }

    fn clear_range(&mut self, sheet: SheetId, range: &CellRange) -> Result<()> {
        let sheet = self.sheet_mut(sheet)?;
        Self::check_in_grid(sheet, range)?;
        sheet.clear(range);
        Ok(())
    }

    fn clear_sheet(&mut self, sheet: SheetId) -> Result<()> {
        self.sheet_mut(sheet)?.cells.clear();
        Ok(())
    }

    fn protect_range(&mut self, sheet: SheetId, range: &CellRange) -> Result<ProtectionId> {
        let target = self.sheet(sheet)?;
        Self::check_in_grid(target, range).map_err(|err| AcceptsheetError::ProtectionFailure {
            range: range.to_string(),
            reason: err.to_string(),
        })?;
        Ok(self.next_protection(sheet, *range))
    }

    fn set_sole_editor(&mut self, protection: ProtectionId, editor: &str) -> Result<()> {
        self.protection_mut(protection)?.set_sole_editor(editor);
        Ok(())
    }

    fn can_domain_edit(&self, protection: ProtectionId) -> Result<bool> {
        self.protection(protection)?;
        Ok(self.workbook.session.domain.is_some())
    }

    fn set_domain_edit(&mut self, protection: ProtectionId, allowed: bool) -> Result<()> {
        if !self.can_domain_edit(protection)? {
            let range = self.protection(protection)?.target.range.to_string();
            return Err(AcceptsheetError::ProtectionFailure {
                range,
                reason: "domain edit is only available inside a workspace domain".to_string(),
            });
        }
        self.protection_mut(protection)?.domain_edit = allowed;
        Ok(())
    }

    fn list_protections(&self, kind: ProtectionKind) -> Vec<RangeProtection> {
        self.workbook
            .protections
            .iter()
            .filter(|p| p.kind == kind)
            .cloned()
            .collect()
    }

    fn can_edit(&self, protection: ProtectionId) -> Result<bool> {
        Ok(self
            .protection(protection)?
            .can_edit(&self.workbook.session.effective_user))
    }

    fn remove_protection(&mut self, protection: ProtectionId) -> Result<()> {
        if !self.can_edit(protection)? {
            let range = self.protection(protection)?.target.range.to_string();
            return Err(AcceptsheetError::ProtectionFailure {
                range,
                reason: format!(
                    "{} is not an editor of this protection",
                    self.workbook.session.effective_user
                ),
            });
        }
        self.workbook.protections.retain(|p| p.id != protection);
        Ok(())
    }

    fn effective_user(&self) -> String {
        self.workbook.session.effective_user.clone()
    }

    fn remove_column_group(&mut self, sheet: SheetId, col: u32, depth: u8) -> Result<()> {
        let sheet = self.sheet_mut(sheet)?;
        outlines::remove_group(&mut sheet.outline_level_col, col, depth)?;
        Ok(())
    }

    fn shift_column_group_depth(
        &mut self,
        sheet: SheetId,
        range: &CellRange,
        delta: i8,
    ) -> Result<()> {
        let sheet = self.sheet_mut(sheet)?;
        outlines::shift_depth(
            &mut sheet.outline_level_col,
            range.start_col,
            range.col_span,
            delta,
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::{broadcast, CellValue};

    fn workbook() -> (MemoryWorkbook, SheetId) {
        let mut wb = MemoryWorkbook::new(Session::new("me@example.com"));
        let id = wb.add_sheet("Data");
        (wb, id)
    }

    #[test]
    fn test_find_sheet_by_name_and_id() {
        let (wb, id) = workbook();
        assert_eq!(wb.find_sheet(&SheetRef::name("Data")), Some(id));
        assert_eq!(wb.find_sheet(&SheetRef::from(id)), Some(id));
        assert_eq!(wb.find_sheet(&SheetRef::name("Nope")), None);
        assert_eq!(wb.find_sheet(&SheetRef::Id(999)), None);
    }

    #[test]
    fn test_write_then_read() {
        let (mut wb, id) = workbook();
        let range: CellRange = "B2:C3".parse().unwrap();
        let grid = vec![
            vec![CellValue::from("a"), CellValue::Number(1.0)],
            vec![CellValue::Empty, CellValue::Bool(true)],
        ];
        wb.write_range(id, &range, &grid).unwrap();
        assert_eq!(wb.read_range(id, &range).unwrap(), grid);
        assert_eq!(wb.last_row(id).unwrap(), 3);
    }

    #[test]
    fn test_write_shape_mismatch() {
        let (mut wb, id) = workbook();
        let range: CellRange = "A1:B2".parse().unwrap();
        let err = wb
            .write_range(id, &range, &broadcast(&CellValue::from("x"), 2, 3))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Shape mismatch writing A1:B2: expected 2x2, got 2x3"
        );
        assert!(wb.sheet(id).unwrap().cells.is_empty());
    }

    #[test]
    fn test_empty_write_is_noop() {
        let (mut wb, id) = workbook();
        wb.write_range(id, &CellRange::new(6, 0, 0, 5), &Vec::new())
            .unwrap();
        assert!(wb.sheet(id).unwrap().cells.is_empty());
    }

    #[test]
    fn test_read_outside_grid() {
        let (wb, id) = workbook();
        let err = wb.read_range(id, &"BO7:BP9".parse().unwrap()).unwrap_err();
        assert!(matches!(err, AcceptsheetError::OutOfBounds { cols: 26, .. }));
    }

    #[test]
    fn test_read_whole_columns_clips_to_grid() {
        let (mut wb, id) = workbook();
        wb.set_grid(id, 4, 3).unwrap();
        let grid = wb.read_range(id, &"A:B".parse().unwrap()).unwrap();
        assert_eq!(grid_shape(&grid), Some((4, 2)));
    }

    #[test]
    fn test_duplicate_sheet_names() {
        let (mut wb, id) = workbook();
        let first = wb.duplicate_sheet(id).unwrap();
        let second = wb.duplicate_sheet(id).unwrap();
        assert_eq!(wb.sheet_name(first).unwrap(), "Copy of Data");
        assert_eq!(wb.sheet_name(second).unwrap(), "Copy of Data 2");
    }

    #[test]
    fn test_protection_lifecycle() {
        let (mut wb, id) = workbook();
        let pid = wb.protect_range(id, &"A:E".parse().unwrap()).unwrap();
        assert!(wb.can_edit(pid).unwrap());
        assert!(!wb.can_domain_edit(pid).unwrap());
        assert!(wb.set_domain_edit(pid, false).is_err());

        wb.set_sole_editor(pid, "other@example.com").unwrap();
        assert!(!wb.can_edit(pid).unwrap());
        assert!(wb.remove_protection(pid).is_err());

        wb.set_effective_user("other@example.com");
        wb.remove_protection(pid).unwrap();
        assert!(wb.list_protections(ProtectionKind::Range).is_empty());
    }

    #[test]
    fn test_domain_edit_inside_domain() {
        let mut wb = MemoryWorkbook::new(Session::new("me@corp.com").with_domain("corp.com"));
        let id = wb.add_sheet("Data");
        let pid = wb.protect_range(id, &"A1".parse().unwrap()).unwrap();
        assert!(wb.protection(pid).unwrap().domain_edit);
        assert!(wb.can_domain_edit(pid).unwrap());
        wb.set_domain_edit(pid, false).unwrap();
        assert!(!wb.protection(pid).unwrap().domain_edit);
    }

    #[test]
    fn test_protect_outside_grid_fails() {
        let (mut wb, id) = workbook();
        let err = wb.protect_range(id, &"F5:BS5".parse().unwrap()).unwrap_err();
        assert!(matches!(err, AcceptsheetError::ProtectionFailure { .. }));
        assert!(wb.protections_on(id).is_empty());
    }

    #[test]
    fn test_sheet_protections_are_listed_separately() {
        let (mut wb, id) = workbook();
        wb.protect_sheet(id).unwrap();
        wb.protect_range(id, &"A1".parse().unwrap()).unwrap();
        assert_eq!(wb.list_protections(ProtectionKind::Sheet).len(), 1);
        assert_eq!(wb.list_protections(ProtectionKind::Range).len(), 1);
    }

    #[test]
    fn test_json_snapshot_roundtrip() {
        let (mut wb, id) = workbook();
        wb.write_range(id, &"A1".parse().unwrap(), &vec![vec![CellValue::Number(3.5)]])
            .unwrap();
        wb.protect_range(id, &"A1".parse().unwrap()).unwrap();
        wb.shift_column_group_depth(id, &"I1:J10".parse().unwrap(), 1)
            .unwrap();

        let restored = MemoryWorkbook::from_json(&wb.to_json().unwrap()).unwrap();
        assert_eq!(restored.sheet(id).unwrap().get(0, 0), &CellValue::Number(3.5));
        assert_eq!(restored.protections_on(id).len(), 1);
        assert_eq!(restored.column_groups(id, 1).unwrap().len(), 1);
    }
}
