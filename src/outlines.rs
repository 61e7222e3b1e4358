//! Column outline (grouping) model.
//!
//! Each column carries an outline level (0 = ungrouped, up to
//! [`MAX_OUTLINE_LEVEL`]). A group at depth `d` is a maximal run of adjacent
//! columns whose level is at least `d`:
//!
//! ```text
//! levels:  0 1 1 0 0 1 1 0
//! groups:    [I:J]     [N:O]     (depth 1)
//! ```
//!
//! Removing a group lowers every column of the run by one level; shifting the
//! depth of a range raises or lowers just those columns.

use serde::{Deserialize, Serialize};

use crate::cell_ref::{col_to_letter, CellRange};
use crate::error::{AcceptsheetError, Result};
use crate::types::OutlineLevel;

/// Deepest outline level a spreadsheet supports.
pub const MAX_OUTLINE_LEVEL: u8 = 8;

/// A run of grouped columns at one depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGroup {
    pub start: u32,
    pub span: u32,
    pub depth: u8,
}

impl ColumnGroup {
    /// The group's columns over `rows` rows from the top of the sheet.
    pub fn range(&self, rows: u32) -> CellRange {
        CellRange::new(0, self.start, rows, self.span)
    }
}

/// Outline level of `col` (0 when ungrouped).
pub fn col_level(levels: &[OutlineLevel], col: u32) -> u8 {
    levels
        .binary_search_by_key(&col, |o| o.index)
        .ok()
        .and_then(|idx| levels.get(idx))
        .map_or(0, |o| o.level)
}

fn set_level(levels: &mut Vec<OutlineLevel>, col: u32, level: u8) {
    match levels.binary_search_by_key(&col, |o| o.index) {
        Ok(idx) if level == 0 => {
            levels.remove(idx);
        }
        Ok(idx) => {
            if let Some(o) = levels.get_mut(idx) {
                o.level = level;
            }
        }
        Err(_) if level == 0 => {}
        Err(idx) => levels.insert(
            idx,
            OutlineLevel {
                index: col,
                level,
                collapsed: false,
            },
        ),
    }
}

/// Raise (positive `delta`) or lower the level of `span` columns from `start`.
///
/// Levels are clamped to `0..=MAX_OUTLINE_LEVEL`.
pub fn shift_depth(levels: &mut Vec<OutlineLevel>, start: u32, span: u32, delta: i8) {
    for col in start..start.saturating_add(span) {
        let current = i16::from(col_level(levels, col));
        let shifted = (current + i16::from(delta)).clamp(0, i16::from(MAX_OUTLINE_LEVEL));
        // clamped into 0..=8 above
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        set_level(levels, col, shifted as u8);
    }
}

/// The group of depth `depth` containing `col`, if any.
pub fn group_at(levels: &[OutlineLevel], col: u32, depth: u8) -> Option<ColumnGroup> {
    if depth == 0 || col_level(levels, col) < depth {
        return None;
    }
    let mut start = col;
    while start > 0 && col_level(levels, start - 1) >= depth {
        start -= 1;
    }
    let mut end = col;
    while col_level(levels, end + 1) >= depth {
        end += 1;
    }
    Some(ColumnGroup {
        start,
        span: end - start + 1,
        depth,
    })
}

/// Remove the depth-`depth` group containing `col`.
///
/// # Errors
/// [`AcceptsheetError::GroupNotFound`] when no such group exists.
pub fn remove_group(levels: &mut Vec<OutlineLevel>, col: u32, depth: u8) -> Result<ColumnGroup> {
    let group = group_at(levels, col, depth).ok_or_else(|| AcceptsheetError::GroupNotFound {
        column: col_to_letter(col),
    })?;
    shift_depth(levels, group.start, group.span, -1);
    Ok(group)
}

/// Every group at `depth`, left to right.
pub fn column_groups(levels: &[OutlineLevel], depth: u8) -> Vec<ColumnGroup> {
    let mut groups: Vec<ColumnGroup> = Vec::new();
    for o in levels.iter().filter(|o| depth > 0 && o.level >= depth) {
        match groups.last_mut() {
            Some(last) if last.start + last.span == o.index => last.span += 1,
            _ => groups.push(ColumnGroup {
                start: o.index,
                span: 1,
                depth,
            }),
        }
    }
    groups
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

    #[test]
    fn test_shift_depth_creates_group() {
        let mut levels = Vec::new();
        shift_depth(&mut levels, 8, 2, 1);
        assert_eq!(col_level(&levels, 8), 1);
        assert_eq!(col_level(&levels, 9), 1);
        assert_eq!(col_level(&levels, 10), 0);
        assert_eq!(
            column_groups(&levels, 1),
            vec![ColumnGroup {
                start: 8,
                span: 2,
                depth: 1
            }]
        );
    }

    #[test]
    fn test_shift_depth_clamps() {
        let mut levels = Vec::new();
        shift_depth(&mut levels, 0, 1, -1);
        assert!(levels.is_empty());
        for _ in 0..10 {
            shift_depth(&mut levels, 0, 1, 1);
        }
        assert_eq!(col_level(&levels, 0), MAX_OUTLINE_LEVEL);
    }

    #[test]
    fn test_levels_stay_sorted() {
        let mut levels = Vec::new();
        shift_depth(&mut levels, 13, 2, 1);
        shift_depth(&mut levels, 8, 2, 1);
        let indices: Vec<u32> = levels.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![8, 9, 13, 14]);
    }

    #[test]
    fn test_group_at_finds_whole_run() {
        let mut levels = Vec::new();
        shift_depth(&mut levels, 3, 4, 1);
        let group = group_at(&levels, 5, 1).unwrap();
        assert_eq!((group.start, group.span), (3, 4));
        assert!(group_at(&levels, 5, 2).is_none());
        assert!(group_at(&levels, 7, 1).is_none());
    }

    #[test]
    fn test_nested_groups() {
        let mut levels = Vec::new();
        shift_depth(&mut levels, 0, 6, 1);
        shift_depth(&mut levels, 2, 2, 1);
        assert_eq!(column_groups(&levels, 1).len(), 1);
        assert_eq!(column_groups(&levels, 2), vec![ColumnGroup { start: 2, span: 2, depth: 2 }]);

        // Removing the outer group lowers every column by one, leaving the inner run at depth 1.
        remove_group(&mut levels, 0, 1).unwrap();
        assert_eq!(column_groups(&levels, 1), vec![ColumnGroup { start: 2, span: 2, depth: 1 }]);
    }

    #[test]
    fn test_remove_missing_group() {
        let mut levels = Vec::new();
        let err = remove_group(&mut levels, 8, 1).unwrap_err();
        assert!(err.is_group_not_found());
        assert_eq!(err.to_string(), "No column group at column I");
    }

    #[test]
    fn test_group_range() {
        let group = ColumnGroup {
            start: 8,
            span: 2,
            depth: 1,
        };
        assert_eq!(group.range(300).to_string(), "I1:J300");
    }
}
