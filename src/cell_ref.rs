//! Excel-style cell references and typed rectangular ranges.
//!
//! All coordinates inside the crate are 0-based `(row, col)` pairs wrapped in
//! [`CellRange`]. A1 text only appears at the boundary: [`CellRange`]'s
//! `Display` renders it and `FromStr` parses it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AcceptsheetError, Result};

/// Number of rows in a sheet; whole-column ranges span all of them.
pub const MAX_ROWS: u32 = 1_048_576;

/// Convert a 0-based column index to Excel column letters (A, B, ..., Z, AA, AB, ...)
pub fn col_to_letter(col: u32) -> String {
    let mut result = Vec::new();
    let mut n = u64::from(col) + 1;
    while n > 0 {
        n -= 1;
        // n % 26 < 26, always fits
        #[allow(clippy::cast_possible_truncation)]
        let offset = (n % 26) as u8;
        result.push(char::from(b'A' + offset));
        n /= 26;
    }
    result.iter().rev().collect()
}

/// Convert Excel column letters into a 0-based column index.
pub fn letter_to_col(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let upper = ch.to_ascii_uppercase();
        col = col
            .checked_mul(26)?
            .checked_add(upper as u32 - 'A' as u32 + 1)?;
    }
    Some(col - 1)
}

/// Parse a cell reference like "A1" into (col, row) where col and row are 0-indexed.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let trimmed = cell_ref.trim().replace('$', "");
    let split = trimmed.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = trimmed.split_at(split);
    let col = letter_to_col(letters)?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((col, row - 1))
}

/// A rectangular block of cells, 0-based, with explicit spans.
///
/// `row_span == 0` is an empty range. It still renders to A1 text (ending one
/// row above where it starts) so that empty layouts stay inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start_row: u32,
    pub start_col: u32,
    pub row_span: u32,
    pub col_span: u32,
}

impl CellRange {
    pub const fn new(start_row: u32, start_col: u32, row_span: u32, col_span: u32) -> Self {
        Self {
            start_row,
            start_col,
            row_span,
            col_span,
        }
    }

    /// A single cell.
    pub const fn cell(row: u32, col: u32) -> Self {
        Self::new(row, col, 1, 1)
    }

    /// Whole columns, e.g. `A:E`.
    pub const fn columns(start_col: u32, col_span: u32) -> Self {
        Self::new(0, start_col, MAX_ROWS, col_span)
    }

    /// Inclusive corners `(start_row, start_col, end_row, end_col)`.
    pub const fn from_corners(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self::new(
            start_row,
            start_col,
            (end_row - start_row).saturating_add(1),
            (end_col - start_col).saturating_add(1),
        )
    }

    /// Last row covered; saturates to `start_row - 1` for empty ranges.
    pub fn end_row(&self) -> u32 {
        match self.row_span {
            0 => self.start_row.saturating_sub(1),
            span => self.start_row.saturating_add(span - 1),
        }
    }

    /// Last column covered.
    pub fn end_col(&self) -> u32 {
        match self.col_span {
            0 => self.start_col.saturating_sub(1),
            span => self.start_col.saturating_add(span - 1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_span == 0 || self.col_span == 0
    }

    /// Whether the range covers every row of the sheet from row 1.
    ///
    /// Such a range is the whole-column form: `A1:A1048576` and `A:A` parse
    /// to the same range and both render as `A:A`.
    pub fn is_whole_columns(&self) -> bool {
        self.start_row == 0 && self.row_span >= MAX_ROWS
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        !self.is_empty()
            && row >= self.start_row
            && row <= self.end_row()
            && col >= self.start_col
            && col <= self.end_col()
    }

    pub fn intersects(&self, other: &CellRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start_row <= other.end_row()
            && other.start_row <= self.end_row()
            && self.start_col <= other.end_col()
            && other.start_col <= self.end_col()
    }

    /// The same columns, restricted to `row_span` rows from `start_row`.
    pub fn with_rows(&self, start_row: u32, row_span: u32) -> Self {
        Self::new(start_row, self.start_col, row_span, self.col_span)
    }

    /// `rows x cols` as text, used in shape errors.
    pub fn shape(&self) -> String {
        format!("{}x{}", self.row_span, self.col_span)
    }

    /// Row-major iterator over every `(row, col)` inside the range.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let cols = self.start_col..self.start_col.saturating_add(self.col_span);
        (self.start_row..self.start_row.saturating_add(self.row_span))
            .flat_map(move |r| cols.clone().map(move |c| (r, c)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = col_to_letter(self.start_col);
        let last = col_to_letter(self.end_col());
        if self.is_whole_columns() {
            return write!(f, "{first}:{last}");
        }
        // Rendering uses u64 so an empty range starting at row 0 prints "A1:A0".
        let start_row = u64::from(self.start_row) + 1;
        let end_row = u64::from(self.start_row) + u64::from(self.row_span);
        if self.row_span == 1 && self.col_span == 1 {
            return write!(f, "{first}{start_row}");
        }
        write!(f, "{first}{start_row}:{last}{end_row}")
    }
}

impl FromStr for CellRange {
    type Err = AcceptsheetError;

    /// Parse `A1`, `A1:B10` or whole-column `A:E` notation.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || AcceptsheetError::CellRef(s.to_string());
        let Some((start, end)) = s.split_once(':') else {
            let (col, row) = parse_cell_ref(s).ok_or_else(bad)?;
            return Ok(Self::cell(row, col));
        };

        let (start, end) = (start.trim(), end.trim());
        if start.chars().all(|c| c.is_ascii_alphabetic())
            && end.chars().all(|c| c.is_ascii_alphabetic())
        {
            let first = letter_to_col(start).ok_or_else(bad)?;
            let last = letter_to_col(end).ok_or_else(bad)?;
            if last < first {
                return Err(bad());
            }
            return Ok(Self::columns(first, last - first + 1));
        }

        let (start_col, start_row) = parse_cell_ref(start).ok_or_else(bad)?;
        let (end_col, end_row) = parse_cell_ref(end).ok_or_else(bad)?;
        if end_col < start_col || end_row < start_row {
            return Err(bad());
        }
        Ok(Self::from_corners(start_row, start_col, end_row, end_col))
    }
}

/// Identifier of a sheet within a workbook (the grid id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetId(pub u32);

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A range bound to the sheet it addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRange {
    pub sheet: SheetId,
    pub range: CellRange,
}

impl SheetRange {
    pub const fn new(sheet: SheetId, range: CellRange) -> Self {
        Self { sheet, range }
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}!{}", self.sheet, self.range)
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
    use test_case::test_case;

    #[test_case(0, "A")]
    #[test_case(25, "Z")]
    #[test_case(26, "AA")]
    #[test_case(65, "BN")]
    #[test_case(70, "BS")]
    #[test_case(701, "ZZ")]
    #[test_case(702, "AAA")]
    fn test_col_letters(col: u32, letters: &str) {
        assert_eq!(col_to_letter(col), letters);
        assert_eq!(letter_to_col(letters), Some(col));
    }

    #[test]
    fn test_letter_to_col_rejects_garbage() {
        assert_eq!(letter_to_col(""), None);
        assert_eq!(letter_to_col("A1"), None);
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("$BI$5"), Some((60, 4)));
        assert_eq!(parse_cell_ref("b7"), Some((1, 6)));
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("7"), None);
        assert_eq!(parse_cell_ref("AB"), None);
    }

    #[test_case("A7:E9")]
    #[test_case("BO7:BP300")]
    #[test_case("F5")]
    #[test_case("A:E")]
    #[test_case("F5:BS5")]
    fn test_range_display_roundtrip(text: &str) {
        let range: CellRange = text.parse().unwrap();
        assert_eq!(range.to_string(), text);
    }

    #[test]
    fn test_range_spans() {
        let range: CellRange = "A7:E9".parse().unwrap();
        assert_eq!(range, CellRange::new(6, 0, 3, 5));
        assert_eq!(range.end_row(), 8);
        assert_eq!(range.end_col(), 4);
        assert_eq!(range.cells().count(), 15);
    }

    #[test]
    fn test_empty_range_renders_like_a1_arithmetic() {
        let range = CellRange::new(6, 0, 0, 5);
        assert!(range.is_empty());
        assert_eq!(range.to_string(), "A7:E6");
        assert_eq!(range.cells().count(), 0);
        assert!(!range.contains(6, 0));
    }

    #[test]
    fn test_whole_columns() {
        let range: CellRange = "A:E".parse().unwrap();
        assert!(range.is_whole_columns());
        assert!(range.contains(299, 4));
        assert!(!range.contains(0, 5));
    }

    #[test_case("A1:A1048576", "A:A")]
    #[test_case("B1:C1048576", "B:C")]
    #[test_case("A2:A1048576", "A2:A1048576")]
    #[test_case("A1:A1048575", "A1:A1048575")]
    fn test_full_height_range_is_whole_columns(text: &str, rendered: &str) {
        let range: CellRange = text.parse().unwrap();
        assert_eq!(range.to_string(), rendered);
        let reparsed: CellRange = rendered.parse().unwrap();
        assert_eq!(reparsed, range);
    }

    #[test]
    fn test_last_row_renders_without_overflow() {
        let range = CellRange::new(u32::MAX, 0, 1, 1);
        assert_eq!(range.to_string(), "A4294967296");
        assert_eq!(range.end_row(), u32::MAX);
        let tall = CellRange::new(u32::MAX - 1, 0, 5, 2);
        assert_eq!(tall.end_row(), u32::MAX);
        assert_eq!(tall.to_string(), "A4294967295:B4294967299");
    }

    #[test]
    fn test_intersects() {
        let a: CellRange = "A1:C3".parse().unwrap();
        let b: CellRange = "C3:D4".parse().unwrap();
        let c: CellRange = "D1:D2".parse().unwrap();
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(!a.intersects(&CellRange::new(0, 0, 0, 3)));
    }

    #[test_case("" ; "empty")]
    #[test_case("E9:A7" ; "reversed")]
    #[test_case("E:A" ; "reversed columns")]
    #[test_case("A1:?" ; "garbage end")]
    fn test_parse_range_errors(text: &str) {
        assert!(matches!(
            text.parse::<CellRange>(),
            Err(AcceptsheetError::CellRef(_))
        ));
    }

    #[test]
    fn test_sheet_range_display() {
        let range = SheetRange::new(SheetId(76), CellRange::cell(4, 5));
        assert_eq!(range.to_string(), "#76!F5");
    }
}
