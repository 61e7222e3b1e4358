//! Fixed range tables of the acceptance sheet.
//!
//! The tables are plain data, consumed by the protect/clear/group operations.
//! [`validate_layout_tables`] checks them independently: inside
//! [`USED_AREA`] every cell is either protected or clearable, never both, and
//! no two entries of the same table overlap.

use crate::cell_ref::{CellRange, MAX_ROWS};
use crate::error::{AcceptsheetError, Result};
use crate::layout::{WeekSlot, FIRST_DATA_ROW, FIRST_SLOT_COL, SECONDARY_BLOCK_COL};

/// Last body row covered by the tables (row 300).
pub const BODY_LAST_ROW: u32 = 299;
const BODY_ROWS: u32 = BODY_LAST_ROW + 1 - FIRST_DATA_ROW;

/// Everything the tables are responsible for: A1:BQ300.
pub const USED_AREA: CellRange = CellRange::from_corners(0, 0, BODY_LAST_ROW, 68);

/// Offset of the ratio (formula) column inside a week slot.
pub const RATIO_OFFSET: u32 = 3;

/// First column of each 2-column outline group (I, N, S, ..., BL).
pub const COLUMN_GROUP_STARTS: [u32; 12] = [8, 13, 18, 23, 28, 33, 38, 43, 48, 53, 58, 63];
/// Columns per outline group.
pub const COLUMN_GROUP_SPAN: u32 = 2;

const fn body_cols(col: u32, width: u32) -> CellRange {
    CellRange::new(FIRST_DATA_ROW, col, BODY_ROWS, width)
}

/// Header strips above the body, F1:BQ6 with the date row running on to BS.
const HEADER_STRIPS: [CellRange; 4] = [
    CellRange::from_corners(0, FIRST_SLOT_COL, 2, 68),
    CellRange::from_corners(3, FIRST_SLOT_COL, 3, 68),
    CellRange::from_corners(4, FIRST_SLOT_COL, 4, 70),
    CellRange::from_corners(5, FIRST_SLOT_COL, 5, 68),
];

/// Ranges locked to the effective user, in protection order.
///
/// Primary filter columns (whole columns A:E), each slot's demand and ratio
/// columns, the secondary filter block, and the header strips.
pub fn protected_ranges() -> Vec<CellRange> {
    let mut ranges = vec![CellRange::columns(0, 5)];
    for slot in WeekSlot::all() {
        ranges.push(body_cols(slot.start_col(), 1));
        ranges.push(body_cols(slot.start_col() + RATIO_OFFSET, 1));
    }
    ranges.push(body_cols(SECONDARY_BLOCK_COL, 4));
    ranges.extend(HEADER_STRIPS);
    ranges
}

/// Editable body of each week slot: supply and notes (start+1..=start+2) and
/// the column after the ratio (start+4).
pub fn clearable_ranges() -> Vec<CellRange> {
    WeekSlot::all()
        .flat_map(|slot| {
            [
                body_cols(slot.start_col() + 1, 2),
                body_cols(slot.start_col() + RATIO_OFFSET + 1, 1),
            ]
        })
        .collect()
}

/// The outline groups `add_groups` creates, over `rows` rows.
pub fn column_group_ranges(rows: u32) -> Vec<CellRange> {
    COLUMN_GROUP_STARTS
        .iter()
        .map(|&col| CellRange::new(0, col, rows.min(MAX_ROWS), COLUMN_GROUP_SPAN))
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Owner {
    Free,
    Protected(usize),
    Clearable(usize),
}

/// Check that `protected` and `clearable` partition `used`.
///
/// Cells outside `used` are ignored, so whole-column and over-wide ranges are
/// fine as long as their part inside the area is consistent.
///
/// # Errors
/// [`AcceptsheetError::LayoutConflict`] naming the first overlap or gap.
pub fn validate_layout_tables(
    protected: &[CellRange],
    clearable: &[CellRange],
    used: &CellRange,
) -> Result<()> {
    let width = used.col_span as usize;
    let mut owners = vec![Owner::Free; used.row_span as usize * width];
    let label = |owner: Owner| match owner {
        Owner::Protected(i) => protected.get(i).map(|r| format!("protected {r}")),
        Owner::Clearable(i) => clearable.get(i).map(|r| format!("clearable {r}")),
        Owner::Free => None,
    };

    let tagged = protected
        .iter()
        .enumerate()
        .map(|(i, r)| (Owner::Protected(i), r))
        .chain(clearable.iter().enumerate().map(|(i, r)| (Owner::Clearable(i), r)));

    for (owner, range) in tagged {
        let start_row = range.start_row.max(used.start_row);
        let end_row = range.end_row().min(used.end_row());
        let start_col = range.start_col.max(used.start_col);
        let end_col = range.end_col().min(used.end_col());
        if range.is_empty() || start_row > end_row || start_col > end_col {
            continue;
        }
        for row in start_row..=end_row {
            for col in start_col..=end_col {
                let idx = (row - used.start_row) as usize * width + (col - used.start_col) as usize;
                let Some(slot) = owners.get_mut(idx) else {
                    continue;
                };
                if *slot != Owner::Free {
                    return Err(AcceptsheetError::LayoutConflict(format!(
                        "{} overlaps {} at {}",
                        label(owner).unwrap_or_default(),
                        label(*slot).unwrap_or_default(),
                        CellRange::cell(row, col)
                    )));
                }
                *slot = owner;
            }
        }
    }

    if let Some(idx) = owners.iter().position(|o| *o == Owner::Free) {
        // idx < row_span * col_span, both u32
        #[allow(clippy::cast_possible_truncation)]
        let (row, col) = ((idx / width) as u32, (idx % width) as u32);
        return Err(AcceptsheetError::LayoutConflict(format!(
            "{} is neither protected nor clearable",
            CellRange::cell(used.start_row + row, used.start_col + col)
        )));
    }
    Ok(())
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

    fn texts(ranges: &[CellRange]) -> Vec<String> {
        ranges.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_used_area() {
        assert_eq!(USED_AREA.to_string(), "A1:BQ300");
    }

    #[test]
    fn test_protected_ranges_table() {
        let protected = texts(&protected_ranges());
        assert_eq!(protected.len(), 30);
        assert_eq!(protected[0], "A:E");
        assert_eq!(&protected[1..5], ["F7:F300", "I7:I300", "K7:K300", "N7:N300"]);
        assert!(protected.contains(&"AC7:AC300".to_string()));
        assert!(protected.contains(&"BL7:BL300".to_string()));
        assert!(protected.contains(&"BN7:BQ300".to_string()));
        assert_eq!(
            &protected[26..],
            ["F1:BQ3", "F4:BQ4", "F5:BS5", "F6:BQ6"]
        );
    }

    #[test]
    fn test_clearable_ranges_table() {
        let clearable = texts(&clearable_ranges());
        assert_eq!(clearable.len(), 24);
        assert_eq!(&clearable[..4], ["G7:H300", "J7:J300", "L7:M300", "O7:O300"]);
        assert_eq!(&clearable[22..], ["BJ7:BK300", "BM7:BM300"]);
    }

    #[test]
    fn test_tables_partition_used_area() {
        validate_layout_tables(&protected_ranges(), &clearable_ranges(), &USED_AREA).unwrap();
    }

    #[test]
    fn test_overlap_is_reported() {
        let mut clearable = clearable_ranges();
        clearable.push("A7:H300".parse().unwrap());
        let err = validate_layout_tables(&protected_ranges(), &clearable, &USED_AREA).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("clearable A7:H300"), "{message}");
        assert!(message.contains("protected A:E"), "{message}");
    }

    #[test]
    fn test_gap_is_reported() {
        let mut protected = protected_ranges();
        protected.retain(|r| r.to_string() != "F4:BQ4");
        let err = validate_layout_tables(&protected, &clearable_ranges(), &USED_AREA).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Layout conflict: F4 is neither protected nor clearable"
        );
    }

    #[test]
    fn test_column_groups_sit_on_ratio_columns() {
        for (slot, col) in WeekSlot::all().zip(COLUMN_GROUP_STARTS) {
            assert_eq!(slot.start_col() + RATIO_OFFSET, col);
        }
        let groups = texts(&column_group_ranges(300));
        assert_eq!(groups[0], "I1:J300");
        assert_eq!(groups[11], "BL1:BM300");
    }
}
