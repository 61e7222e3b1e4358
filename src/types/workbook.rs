use serde::{Deserialize, Serialize};

use super::*;
use crate::cell_ref::{CellRange, SheetId};
use crate::protection::RangeProtection;

/// Default grid size of a freshly inserted sheet.
pub const DEFAULT_GRID_ROWS: u32 = 1000;
pub const DEFAULT_GRID_COLS: u32 = 26;

/// A complete in-memory workbook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    /// Range protections across all sheets, in creation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protections: Vec<RangeProtection>,
    pub session: Session,
    /// Next id handed out by `insert_sheet`
    pub next_sheet_id: u32,
    /// Next id handed out by `protect`
    pub next_protection_id: u32,
}

impl Workbook {
    pub fn new(session: Session) -> Self {
        Self {
            sheets: Vec::new(),
            protections: Vec::new(),
            session,
            next_sheet_id: 1,
            next_protection_id: 1,
        }
    }

    pub fn sheet(&self, id: SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id == id)
    }

    pub fn sheet_mut(&mut self, id: SheetId) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.id == id)
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// `base`, or `base 2`, `base 3`, ... whichever is not taken yet.
    pub fn unique_sheet_name(&self, base: &str) -> String {
        if self.sheet_by_name(base).is_none() {
            return base.to_string();
        }
        (2u32..)
            .map(|n| format!("{base} {n}"))
            .find(|candidate| self.sheet_by_name(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }
}

/// A single worksheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub id: SheetId,
    pub name: String,
    /// Sparse representation, sorted by (row, col)
    pub cells: Vec<CellData>,
    /// Grid size; reads and protections must stay inside it
    pub grid_rows: u32,
    pub grid_cols: u32,
    /// Column outline levels (for grouping/collapsing), sorted by index
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outline_level_col: Vec<OutlineLevel>,
}

impl Sheet {
    pub fn new(id: SheetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cells: Vec::new(),
            grid_rows: DEFAULT_GRID_ROWS,
            grid_cols: DEFAULT_GRID_COLS,
            outline_level_col: Vec::new(),
        }
    }

    pub fn with_grid(mut self, rows: u32, cols: u32) -> Self {
        self.grid_rows = rows;
        self.grid_cols = cols;
        self
    }

    fn position(&self, row: u32, col: u32) -> std::result::Result<usize, usize> {
        self.cells.binary_search_by(|cd| (cd.r, cd.c).cmp(&(row, col)))
    }

    pub fn get(&self, row: u32, col: u32) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.position(row, col)
            .ok()
            .and_then(|idx| self.cells.get(idx))
            .map_or(&EMPTY, |cd| &cd.value)
    }

    /// Set one cell; writing an empty value removes it.
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        match (self.position(row, col), value.is_empty()) {
            (Ok(idx), true) => {
                self.cells.remove(idx);
            }
            (Ok(idx), false) => {
                if let Some(cd) = self.cells.get_mut(idx) {
                    cd.value = value;
                }
            }
            (Err(_), true) => {}
            (Err(idx), false) => {
                self.cells.insert(idx, CellData { r: row, c: col, value });
                self.grid_rows = self.grid_rows.max(row.saturating_add(1));
                self.grid_cols = self.grid_cols.max(col.saturating_add(1));
            }
        }
    }

    /// Remove every value inside `range`.
    pub fn clear(&mut self, range: &CellRange) {
        self.cells.retain(|cd| !range.contains(cd.r, cd.c));
    }

    /// 1-based index of the last row holding a value, 0 for an empty sheet.
    pub fn last_row(&self) -> u32 {
        self.cells.last().map_or(0, |cd| cd.r.saturating_add(1))
    }

    /// 1-based index of the last column holding a value, 0 for an empty sheet.
    pub fn last_col(&self) -> u32 {
        self.cells.iter().map(|cd| cd.c.saturating_add(1)).max().unwrap_or(0)
    }

    /// Whether `range` lies inside the grid.
    pub fn in_grid(&self, range: &CellRange) -> bool {
        if range.end_col() >= self.grid_cols {
            return false;
        }
        range.is_whole_columns() || range.end_row() < self.grid_rows
    }
}
