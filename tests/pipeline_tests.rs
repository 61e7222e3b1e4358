//! Pipeline tests
//!
//! End-to-end runs of the reshape operations over a seeded in-memory
//! workbook:
//! - Creating the acceptance sheet from the template and raw data
//! - Flattening it into the responses sheet
//! - Clearing the editable regions
//! - Missing sheets aborting before any write

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

mod fixtures;

use acceptsheet::layout::RESPONSE_HEADERS;
use acceptsheet::pipeline::{self, count_rows};
use acceptsheet::{AcceptsheetError, CellValue, PipelineConfig, SheetRef, SpreadsheetBackend};
use fixtures::{demand, primary, secondary, week_label, AcceptanceBook, RAW};

fn text(s: &str) -> CellValue {
    CellValue::from(s)
}

// ============================================================================
// create_sheet
// ============================================================================

#[test]
fn test_create_copies_filters_dates_and_demand() {
    let mut fx = AcceptanceBook::new(3).build();
    let (sheet, _) = fx.create();

    assert_eq!(
        fx.book.sheet_name(sheet).unwrap(),
        "Copy of Lock Acceptance - Template"
    );
    for row in 0..3 {
        let r = row + 7;
        let left = fx.values(sheet, &format!("A{r}:E{r}"));
        assert_eq!(left[0], primary(row).map(CellValue::from).to_vec());
        let right = fx.values(sheet, &format!("BN{r}:BQ{r}"));
        assert_eq!(right[0], secondary(row).map(CellValue::from).to_vec());
    }

    assert_eq!(fx.cell(sheet, "F5"), text(&week_label(0)));
    assert_eq!(fx.cell(sheet, "K5"), text(&week_label(1)));
    assert_eq!(fx.cell(sheet, "BI5"), text(&week_label(11)));
    assert_eq!(fx.cell(sheet, "F7"), CellValue::Number(demand(0, 0)));
    assert_eq!(fx.cell(sheet, "K8"), CellValue::Number(demand(1, 1)));
    assert_eq!(fx.cell(sheet, "BI9"), CellValue::Number(demand(2, 11)));
}

#[test]
fn test_create_leaves_supply_and_template_alone() {
    let mut fx = AcceptanceBook::new(4).build();
    let template = fx.template.unwrap();
    let before = fx.book.sheet(template).unwrap().cells.clone();
    let (sheet, _) = fx.create();

    assert_eq!(fx.book.sheet(template).unwrap().cells, before);
    for a1 in ["G7", "G10", "L8", "BJ9", "F11", "A11"] {
        assert_eq!(fx.cell(sheet, a1), CellValue::Empty, "{a1}");
    }
    // template headings come along with the copy
    assert_eq!(fx.cell(sheet, "G6"), text("Partner Supply"));
}

#[test]
fn test_create_reports_row_count() {
    let mut fx = AcceptanceBook::new(17).build();
    let config = fx.config();
    let created = pipeline::create_sheet(&mut fx.book, &config).unwrap();
    assert_eq!(created.row_count, 17);
    assert_eq!(count_rows(&fx.book, created.sheet, 1, 6).unwrap(), 17);
}

#[test]
fn test_create_twice_makes_distinct_sheets() {
    let mut fx = AcceptanceBook::new(2).build();
    let (first, _) = fx.create();
    let (second, _) = fx.create();
    assert_ne!(first, second);
    assert_eq!(
        fx.book.sheet_name(second).unwrap(),
        "Copy of Lock Acceptance - Template 2"
    );
}

// ============================================================================
// import_responses
// ============================================================================

#[test]
fn test_import_three_rows() {
    let mut fx = AcceptanceBook::new(3).build();
    let (_, config) = fx.create();
    let responses = fx.responses.unwrap();

    let summary = pipeline::import_responses(&mut fx.book, &config).unwrap();
    assert_eq!(summary.row_count, 3);
    assert_eq!(summary.rows_written, 36);

    // header plus 36 data rows, nothing stale below
    assert_eq!(fx.book.last_row(responses).unwrap(), 37);
    let header: Vec<CellValue> = RESPONSE_HEADERS.iter().map(|&h| text(h)).collect();
    assert_eq!(fx.values(responses, "A1:J1")[0], header);

    for week in 0..12usize {
        let first = 2 + 3 * week;
        for row in first..first + 3 {
            assert_eq!(
                fx.cell(responses, &format!("H{row}")),
                text(&week_label(week)),
                "H{row}"
            );
        }
    }
}

#[test]
fn test_import_row_contents() {
    let mut fx = AcceptanceBook::new(3).build();
    let (_, config) = fx.create();
    let responses = fx.responses.unwrap();
    pipeline::import_responses(&mut fx.book, &config).unwrap();

    // week 1, entity 2 sits on row 2 + 3 + 2
    let row = fx.values(responses, "A7:J7").remove(0);
    let p = primary(2);
    let s = secondary(2);
    let expected: Vec<CellValue> = p
        .iter()
        .chain([&s[1], &s[2]])
        .map(|v| text(v))
        .chain([
            text(&week_label(1)),
            CellValue::Number(demand(2, 1)),
            CellValue::Empty,
        ])
        .collect();
    assert_eq!(row, expected);
}

#[test]
fn test_import_carries_entered_supply() {
    let mut fx = AcceptanceBook::new(3).build();
    let (sheet, config) = fx.create();
    let responses = fx.responses.unwrap();
    fx.enter(sheet, "G7", CellValue::Number(42.0));
    fx.enter(sheet, "L9", CellValue::Number(7.5));

    pipeline::import_responses(&mut fx.book, &config).unwrap();
    assert_eq!(fx.cell(responses, "J2"), CellValue::Number(42.0));
    assert_eq!(fx.cell(responses, "J7"), CellValue::Number(7.5));
    assert_eq!(fx.cell(responses, "J3"), CellValue::Empty);
}

#[test]
fn test_import_is_idempotent() {
    let mut fx = AcceptanceBook::new(5).build();
    let (sheet, config) = fx.create();
    let responses = fx.responses.unwrap();
    fx.enter(sheet, "Q8", text("see notes"));
    fx.enter(sheet, "P10", CellValue::Number(3.0));

    pipeline::import_responses(&mut fx.book, &config).unwrap();
    let first = fx.book.sheet(responses).unwrap().cells.clone();
    pipeline::import_responses(&mut fx.book, &config).unwrap();
    assert_eq!(fx.book.sheet(responses).unwrap().cells, first);
}

#[test]
fn test_import_with_no_rows_writes_header_only() {
    let mut fx = AcceptanceBook::new(0).build();
    let (_, config) = fx.create();
    let responses = fx.responses.unwrap();

    let summary = pipeline::import_responses(&mut fx.book, &config).unwrap();
    assert_eq!(summary.rows_written, 0);
    assert_eq!(fx.book.last_row(responses).unwrap(), 1);
    assert_eq!(fx.cell(responses, "A1"), text("Platform"));
    assert_eq!(fx.cell(responses, "J1"), text("Partner Supply"));
}

#[test]
fn test_import_follows_rows_added_by_hand() {
    let mut fx = AcceptanceBook::new(2).build();
    let (sheet, config) = fx.create();
    let responses = fx.responses.unwrap();
    fx.enter(sheet, "B9", text("Partner 2"));

    let summary = pipeline::import_responses(&mut fx.book, &config).unwrap();
    assert_eq!(summary.row_count, 3);
    assert_eq!(fx.book.last_row(responses).unwrap(), 37);
    assert_eq!(fx.cell(responses, "B4"), text("Partner 2"));
}

// ============================================================================
// clear_editable_regions
// ============================================================================

#[test]
fn test_clear_keeps_filters_demand_and_headers() {
    let mut fx = AcceptanceBook::new(4).build();
    let (sheet, config) = fx.create();
    for (a1, value) in [
        ("G7", CellValue::Number(10.0)),
        ("H8", text("late")),
        ("J9", text("ok")),
        ("BJ10", CellValue::Number(1.0)),
        ("BM7", text("x")),
    ] {
        fx.enter(sheet, a1, value);
    }
    let keep = ["A7:E10", "BN7:BQ10", "F7:F10", "BI7:BI10", "A1:BS6"];
    let before: Vec<_> = keep.iter().map(|a1| fx.values(sheet, a1)).collect();

    let report = pipeline::clear_editable_regions(&mut fx.book, &config).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.cleared.len(), 24);

    for a1 in ["G7", "H8", "J9", "BJ10", "BM7"] {
        assert_eq!(fx.cell(sheet, a1), CellValue::Empty, "{a1}");
    }
    let after: Vec<_> = keep.iter().map(|a1| fx.values(sheet, a1)).collect();
    assert_eq!(after, before);
}

#[test]
fn test_clear_reports_ranges_outside_grid() {
    let mut fx = AcceptanceBook::new(2).build();
    let (sheet, config) = fx.create();
    // a sheet trimmed to 200 rows cannot hold the 300-row table
    fx.book.set_grid(sheet, 200, 71).unwrap();
    fx.enter(sheet, "G7", CellValue::Number(1.0));

    let report = pipeline::clear_editable_regions(&mut fx.book, &config).unwrap();
    assert_eq!(report.failed.len(), 24);
    assert!(matches!(
        report.failed[0].1,
        AcceptsheetError::OutOfBounds { rows: 200, .. }
    ));
    assert_eq!(fx.cell(sheet, "G7"), CellValue::Number(1.0));
}

// ============================================================================
// Missing sources
// ============================================================================

#[test]
fn test_missing_raw_sheet_writes_nothing() {
    let mut fx = AcceptanceBook::new(3).without_raw().build();
    let before = fx.book.to_json().unwrap();

    let config = fx.config();
    let err = pipeline::create_sheet(&mut fx.book, &config).unwrap_err();
    assert!(matches!(err, AcceptsheetError::MissingSource(ref s) if s.contains(RAW)));
    assert_eq!(fx.book.to_json().unwrap(), before);
}

#[test]
fn test_missing_template_writes_nothing() {
    let mut fx = AcceptanceBook::new(3).without_template().build();
    let before = fx.book.to_json().unwrap();
    let config = fx.config();
    assert!(pipeline::create_sheet(&mut fx.book, &config).is_err());
    assert_eq!(fx.book.to_json().unwrap(), before);
}

#[test]
fn test_missing_responses_sheet_writes_nothing() {
    let mut fx = AcceptanceBook::new(3).without_responses().build();
    let (_, config) = fx.create();
    let before = fx.book.to_json().unwrap();

    let err = pipeline::import_responses(&mut fx.book, &config).unwrap_err();
    assert!(matches!(err, AcceptsheetError::MissingSource(_)));
    assert_eq!(fx.book.to_json().unwrap(), before);
}

#[test]
fn test_missing_acceptance_sheet_aborts_every_operation() {
    let mut fx = AcceptanceBook::new(3).build();
    // default acceptance name is not part of the fixture
    let config = fx.config();
    let before = fx.book.to_json().unwrap();

    assert!(pipeline::import_responses(&mut fx.book, &config).is_err());
    assert!(pipeline::protect_ranges(&mut fx.book, &config).is_err());
    assert!(pipeline::remove_protections(&mut fx.book, &config).is_err());
    assert!(pipeline::clear_editable_regions(&mut fx.book, &config).is_err());
    assert!(pipeline::add_groups(&mut fx.book, &config).is_err());
    assert!(pipeline::remove_groups(&mut fx.book, &config).is_err());
    assert_eq!(fx.book.to_json().unwrap(), before);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_by_sheet_id() {
    let mut fx = AcceptanceBook::new(2).build();
    let (sheet, _) = fx.create();
    let json = format!(
        r#"{{ "acceptance": {}, "responses": "{}" }}"#,
        sheet.0,
        fixtures::RESPONSES
    );
    let config = PipelineConfig::from_json_str(&json).unwrap();
    assert_eq!(config.acceptance, SheetRef::from(sheet));

    let summary = pipeline::import_responses(&mut fx.book, &config).unwrap();
    assert_eq!(summary.rows_written, 24);
}
