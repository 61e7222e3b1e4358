//! Coordinate model of the acceptance (wide) and responses (long) sheets.
//!
//! Wide sheet:
//!
//! ```text
//!        A..E             F  G  H  I  J   K  L ...   BI BJ BK BL BM  BN..BQ
//! row 5                   date            date       date
//! row 7+ primary filters  D  S  .  r  .   D  S ...   D  S  .  r  .   secondary filters
//! ```
//!
//! Twelve week slots start at F and repeat every five columns; `D`/`S` are the
//! demand and partner-supply columns of a slot. Rows 7 through `6 + n` hold
//! the `n` entities.
//!
//! Long sheet: a header row, then one block of `n` rows per week slot in
//! slot order. Columns A..G hold the 7 filter fields, H the week label and
//! I..J the demand/supply pair.
//!
//! `n` is never stored globally. A [`Layout`] is built from a freshly counted
//! row total at the start of each operation and passed down.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell_ref::{CellRange, MAX_ROWS};
use crate::error::{AcceptsheetError, Result};

/// Number of week slots in the wide sheet.
pub const WEEK_SLOT_COUNT: usize = 12;
/// Columns between the starts of two consecutive week slots.
pub const WEEK_SLOT_STRIDE: u32 = 5;
/// Start column of week slot 0 (F).
pub const FIRST_SLOT_COL: u32 = 5;
/// Width of a slot's data range (demand, partner supply).
pub const SLOT_DATA_WIDTH: u32 = 2;

/// Row holding the week date labels (row 5).
pub const DATE_ROW: u32 = 4;
/// Row holding the column headings (row 6).
pub const HEADER_ROW: u32 = 5;
/// First entity row (row 7).
pub const FIRST_DATA_ROW: u32 = 6;
/// Column counted to find the number of entities (B).
pub const KEY_COL: u32 = 1;

/// Primary filters: A..E.
pub const PRIMARY_FILTER_COL: u32 = 0;
pub const PRIMARY_FILTER_WIDTH: u32 = 5;
/// Secondary filter block written at creation: BN..BQ.
pub const SECONDARY_BLOCK_COL: u32 = 65;
pub const SECONDARY_BLOCK_WIDTH: u32 = 4;
/// Secondary filters carried into the responses: BO..BP.
pub const RIGHT_FILTER_COL: u32 = 66;
pub const RIGHT_FILTER_WIDTH: u32 = 2;

/// Raw data sheet: week labels in row 1, entities from row 2.
pub const RAW_HEADER_ROW: u32 = 0;
pub const RAW_FIRST_DATA_ROW: u32 = 1;
/// Raw primary filters A..E, secondary filters F..I.
pub const RAW_PRIMARY_COL: u32 = 0;
pub const RAW_SECONDARY_COL: u32 = PRIMARY_FILTER_WIDTH;
/// First of the twelve weekly demand columns (J..U).
pub const RAW_DEMAND_COL: u32 = RAW_SECONDARY_COL + SECONDARY_BLOCK_WIDTH;

/// Response sheet: filters A..G, week H, data I..J, data from row 2.
pub const RESPONSE_FIRST_ROW: u32 = 1;
pub const RESPONSE_FILTER_WIDTH: u32 = PRIMARY_FILTER_WIDTH + RIGHT_FILTER_WIDTH;
pub const RESPONSE_WEEK_COL: u32 = RESPONSE_FILTER_WIDTH;
pub const RESPONSE_DATA_COL: u32 = RESPONSE_WEEK_COL + 1;

pub const RESPONSE_COL_COUNT: u32 = RESPONSE_DATA_COL + SLOT_DATA_WIDTH;

/// Column names of the response sheet, left to right.
pub const RESPONSE_HEADERS: [&str; RESPONSE_COL_COUNT as usize] = [
    "Platform",
    "Partner",
    "Shore",
    "Channel",
    "Staff Group",
    "Ecosystem",
    "Core/Premium",
    "Week",
    "Demand",
    "Partner Supply",
];

/// One of the twelve fixed week slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct WeekSlot(u8);

impl WeekSlot {
    /// # Errors
    /// [`AcceptsheetError::InvalidIndex`] for indices past the last slot.
    pub fn new(index: usize) -> Result<Self> {
        u8::try_from(index)
            .ok()
            .filter(|&i| usize::from(i) < WEEK_SLOT_COUNT)
            .map(Self)
            .ok_or(AcceptsheetError::InvalidIndex {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                max: WEEK_SLOT_COUNT - 1,
            })
    }

    /// All slots in column order.
    pub fn all() -> impl Iterator<Item = WeekSlot> {
        (0..WEEK_SLOT_COUNT).filter_map(|i| Self::new(i).ok())
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// First (demand) column of the slot.
    pub fn start_col(self) -> u32 {
        FIRST_SLOT_COL + u32::from(self.0) * WEEK_SLOT_STRIDE
    }
}

impl TryFrom<i64> for WeekSlot {
    type Error = AcceptsheetError;

    fn try_from(index: i64) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::new(i).ok())
            .ok_or(AcceptsheetError::InvalidIndex {
                index,
                max: WEEK_SLOT_COUNT - 1,
            })
    }
}

impl From<WeekSlot> for i64 {
    fn from(slot: WeekSlot) -> Self {
        i64::from(slot.0)
    }
}

impl fmt::Display for WeekSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {}", self.0)
    }
}

/// Which filter block of the wide sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Which part of a week's block in the response sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Filters,
    Week,
    Data,
}

/// Range arithmetic for a wide sheet holding `row_count` entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    row_count: u32,
}

impl Layout {
    pub fn new(row_count: u32) -> Self {
        Self { row_count }
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Number of data rows a full import writes to the response sheet.
    pub fn response_row_count(&self) -> u64 {
        u64::from(self.row_count) * WEEK_SLOT_COUNT as u64
    }

    fn body(&self, start_col: u32, width: u32) -> CellRange {
        CellRange::new(FIRST_DATA_ROW, start_col, self.row_count, width)
    }

    /// Filter columns over the entity rows: A..E on the left, BO..BP on the right.
    pub fn filter_range(&self, side: Side) -> CellRange {
        match side {
            Side::Left => self.body(PRIMARY_FILTER_COL, PRIMARY_FILTER_WIDTH),
            Side::Right => self.body(RIGHT_FILTER_COL, RIGHT_FILTER_WIDTH),
        }
    }

    /// The full secondary filter block (BN..BQ) over the entity rows.
    pub fn secondary_filter_block(&self) -> CellRange {
        self.body(SECONDARY_BLOCK_COL, SECONDARY_BLOCK_WIDTH)
    }

    /// Header cell holding the slot's date label.
    pub fn date_cell(&self, slot: WeekSlot) -> CellRange {
        CellRange::cell(DATE_ROW, self.data_range(slot).start_col)
    }

    /// Demand and partner-supply columns of the slot.
    pub fn data_range(&self, slot: WeekSlot) -> CellRange {
        self.body(slot.start_col(), SLOT_DATA_WIDTH)
    }

    /// Demand column of the slot, the only one filled at creation.
    pub fn demand_range(&self, slot: WeekSlot) -> CellRange {
        self.body(slot.start_col(), 1)
    }

    /// Destination of one slot's contribution in the response sheet.
    ///
    /// Slot `k` owns rows `2 + k*n ..= 1 + n + k*n` (1-based). Fails with
    /// [`AcceptsheetError::RowLimit`] when the block ends past the last sheet
    /// row.
    pub fn response_segment(&self, slot: WeekSlot, segment: Segment) -> Result<CellRange> {
        let start = u64::from(slot.0) * u64::from(self.row_count) + u64::from(RESPONSE_FIRST_ROW);
        let end = start + u64::from(self.row_count);
        let limit = AcceptsheetError::RowLimit {
            rows: end,
            max: MAX_ROWS,
        };
        if end > u64::from(MAX_ROWS) {
            return Err(limit);
        }
        let start_row = u32::try_from(start).map_err(|_| limit)?;
        let (col, width) = match segment {
            Segment::Filters => (0, RESPONSE_FILTER_WIDTH),
            Segment::Week => (RESPONSE_WEEK_COL, 1),
            Segment::Data => (RESPONSE_DATA_COL, SLOT_DATA_WIDTH),
        };
        Ok(CellRange::new(start_row, col, self.row_count, width))
    }

    /// Header row of the response sheet (A1:J1).
    pub fn response_header_range(&self) -> CellRange {
        CellRange::new(0, 0, 1, RESPONSE_COL_COUNT)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_possible_truncation
)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn slot(i: usize) -> WeekSlot {
        WeekSlot::new(i).unwrap()
    }

    #[test]
    fn test_slot_columns_match_sheet_letters() {
        let letters: Vec<String> = WeekSlot::all()
            .map(|s| Layout::new(1).date_cell(s).to_string())
            .collect();
        assert_eq!(
            letters,
            vec!["F5", "K5", "P5", "U5", "Z5", "AE5", "AJ5", "AO5", "AT5", "AY5", "BD5", "BI5"]
        );
    }

    #[test_case(0, "A7:E6" ; "no rows")]
    #[test_case(1, "A7:E7" ; "one row")]
    #[test_case(121, "A7:E127" ; "many rows")]
    fn test_left_filter_range(n: u32, expected: &str) {
        assert_eq!(Layout::new(n).filter_range(Side::Left).to_string(), expected);
    }

    #[test]
    fn test_right_filter_range() {
        assert_eq!(
            Layout::new(121).filter_range(Side::Right).to_string(),
            "BO7:BP127"
        );
        assert_eq!(
            Layout::new(121).secondary_filter_block().to_string(),
            "BN7:BQ127"
        );
    }

    #[test_case(0, "F7:G127")]
    #[test_case(4, "Z7:AA127")]
    #[test_case(11, "BI7:BJ127")]
    fn test_data_range(week: usize, expected: &str) {
        assert_eq!(Layout::new(121).data_range(slot(week)).to_string(), expected);
    }

    #[test]
    fn test_demand_range_is_first_data_column() {
        let layout = Layout::new(10);
        let demand = layout.demand_range(slot(3));
        let data = layout.data_range(slot(3));
        assert_eq!(demand.start_col, data.start_col);
        assert_eq!(demand.col_span, 1);
        assert_eq!(demand.row_span, data.row_span);
    }

    #[test_case(1, Segment::Data, "I123:J243")]
    #[test_case(0, Segment::Filters, "A2:G122")]
    #[test_case(0, Segment::Week, "H2:H122")]
    #[test_case(11, Segment::Week, "H1333:H1453")]
    fn test_response_segment(week: usize, segment: Segment, expected: &str) {
        assert_eq!(
            Layout::new(121)
                .response_segment(slot(week), segment)
                .unwrap()
                .to_string(),
            expected
        );
    }

    #[test]
    fn test_response_segment_past_last_row() {
        let layout = Layout::new(400_000_000);
        let err = layout
            .response_segment(slot(11), Segment::Week)
            .unwrap_err();
        assert!(matches!(
            err,
            AcceptsheetError::RowLimit {
                rows: 4_800_000_001,
                max: MAX_ROWS
            }
        ));
        // the largest sheet that still fits: 1 + 12n <= MAX_ROWS
        let fits = Layout::new((MAX_ROWS - 1) / 12);
        let last = fits.response_segment(slot(11), Segment::Data).unwrap();
        assert_eq!(last.end_row(), MAX_ROWS - 1 - (MAX_ROWS - 1) % 12);
        assert!(Layout::new((MAX_ROWS - 1) / 12 + 1)
            .response_segment(slot(11), Segment::Data)
            .is_err());
    }

    #[test]
    fn test_response_header_range() {
        assert_eq!(Layout::new(3).response_header_range().to_string(), "A1:J1");
    }

    #[test_case(12 ; "one past the end")]
    #[test_case(-1 ; "negative")]
    #[test_case(i64::MAX ; "huge")]
    fn test_invalid_week_index(index: i64) {
        match WeekSlot::try_from(index) {
            Err(AcceptsheetError::InvalidIndex { index: got, max }) => {
                assert_eq!(got, index);
                assert_eq!(max, 11);
            }
            other => panic!("expected InvalidIndex, got {other:?}"),
        }
    }

    #[test]
    fn test_week_slot_new_rejects_out_of_range() {
        assert!(WeekSlot::new(11).is_ok());
        assert!(WeekSlot::new(12).is_err());
        assert!(WeekSlot::new(300).is_err());
    }

    #[test]
    fn test_week_slot_serde() {
        let s: WeekSlot = serde_json::from_str("3").unwrap();
        assert_eq!(s.index(), 3);
        assert_eq!(serde_json::to_string(&s).unwrap(), "3");
        assert!(serde_json::from_str::<WeekSlot>("12").is_err());
    }

    #[test]
    fn test_filter_width_matches_header() {
        let filter_headers = RESPONSE_HEADERS
            .iter()
            .take_while(|h| **h != "Week")
            .count();
        assert_eq!(filter_headers as u32, RESPONSE_FILTER_WIDTH);
        assert_eq!(RESPONSE_HEADERS[RESPONSE_WEEK_COL as usize], "Week");
        assert_eq!(RESPONSE_HEADERS[RESPONSE_DATA_COL as usize], "Demand");
    }
}
