//! Column grouping tests
//!
//! `add_groups` / `remove_groups` over the ratio column pairs.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod fixtures;

use acceptsheet::outlines::ColumnGroup;
use acceptsheet::pipeline;
use acceptsheet::ranges::COLUMN_GROUP_STARTS;
use acceptsheet::SpreadsheetBackend;
use fixtures::AcceptanceBook;

fn expected_groups() -> Vec<ColumnGroup> {
    COLUMN_GROUP_STARTS
        .iter()
        .map(|&start| ColumnGroup {
            start,
            span: 2,
            depth: 1,
        })
        .collect()
}

#[test]
fn test_remove_groups_without_groups_is_noop() {
    let mut fx = AcceptanceBook::new(3).build();
    let (sheet, config) = fx.create();

    let report = pipeline::remove_groups(&mut fx.book, &config).unwrap();
    assert_eq!(report.removed, 0);
    assert_eq!(report.missing, COLUMN_GROUP_STARTS.to_vec());
    assert!(fx.book.column_groups(sheet, 1).unwrap().is_empty());
}

#[test]
fn test_add_groups_on_fresh_sheet() {
    let mut fx = AcceptanceBook::new(3).build();
    let (sheet, config) = fx.create();

    let report = pipeline::add_groups(&mut fx.book, &config).unwrap();
    assert_eq!(report.added, 12);
    assert_eq!(report.removed, 0);
    assert_eq!(fx.book.column_groups(sheet, 1).unwrap(), expected_groups());
    assert!(fx.book.column_groups(sheet, 2).unwrap().is_empty());
}

#[test]
fn test_add_groups_twice_does_not_nest() {
    let mut fx = AcceptanceBook::new(3).build();
    let (sheet, config) = fx.create();

    pipeline::add_groups(&mut fx.book, &config).unwrap();
    let report = pipeline::add_groups(&mut fx.book, &config).unwrap();
    assert_eq!(report.removed, 12);
    assert!(report.missing.is_empty());
    assert_eq!(fx.book.column_groups(sheet, 1).unwrap(), expected_groups());
    assert!(fx.book.column_groups(sheet, 2).unwrap().is_empty());
}

#[test]
fn test_remove_after_add() {
    let mut fx = AcceptanceBook::new(3).build();
    let (sheet, config) = fx.create();

    pipeline::add_groups(&mut fx.book, &config).unwrap();
    let report = pipeline::remove_groups(&mut fx.book, &config).unwrap();
    assert_eq!(report.removed, 12);
    assert!(fx.book.column_groups(sheet, 1).unwrap().is_empty());
}

#[test]
fn test_remove_groups_lowers_nested_groups_one_level() {
    let mut fx = AcceptanceBook::new(3).build();
    let (sheet, config) = fx.create();
    pipeline::add_groups(&mut fx.book, &config).unwrap();
    // nest one extra level over the first pair
    fx.book
        .shift_column_group_depth(sheet, &"I1:J10".parse().unwrap(), 1)
        .unwrap();

    pipeline::remove_groups(&mut fx.book, &config).unwrap();
    assert_eq!(
        fx.book.column_groups(sheet, 1).unwrap(),
        vec![ColumnGroup {
            start: 8,
            span: 2,
            depth: 1
        }]
    );
}

#[test]
fn test_groups_do_not_touch_values() {
    let mut fx = AcceptanceBook::new(3).build();
    let (sheet, config) = fx.create();
    let before = fx.book.sheet(sheet).unwrap().cells.clone();
    pipeline::add_groups(&mut fx.book, &config).unwrap();
    assert_eq!(fx.book.sheet(sheet).unwrap().cells, before);
    assert_eq!(fx.book.last_row(sheet).unwrap(), 9);
}
