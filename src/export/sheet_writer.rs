//! Generates worksheet XML from a `Sheet`.
//!
//! Text cells are written as inline strings (`t="inlineStr"`), so the package
//! needs no shared string table.

use std::fmt::Write as _;

use quick_xml::escape::escape;

use crate::cell_ref::col_to_letter;
use crate::protection::{ProtectionKind, RangeProtection};
use crate::types::{CellData, CellValue, Sheet};

/// Write a complete worksheet XML string for `sheet` and the protections
/// that target it.
pub(crate) fn write_sheet_xml(sheet: &Sheet, protections: &[&RangeProtection]) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');

    // <dimension>
    let (rows, cols) = (sheet.last_row(), sheet.last_col());
    if rows > 0 && cols > 0 {
        let _ = writeln!(
            out,
            "<dimension ref=\"A1:{}{rows}\"/>",
            col_to_letter(cols - 1)
        );
    }

    // <sheetFormatPr>
    let max_level = sheet
        .outline_level_col
        .iter()
        .map(|o| o.level)
        .max()
        .unwrap_or(0);
    if max_level > 0 {
        let _ = writeln!(
            out,
            "<sheetFormatPr defaultRowHeight=\"15\" outlineLevelCol=\"{max_level}\"/>"
        );
    }

    // <cols>
    if max_level > 0 {
        out.push_str("<cols>\n");
        for o in sheet.outline_level_col.iter().filter(|o| o.level > 0) {
            let col1 = o.index + 1; // XLSX is 1-based
            let _ = write!(
                out,
                "<col min=\"{col1}\" max=\"{col1}\" outlineLevel=\"{}\"",
                o.level
            );
            if o.collapsed {
                out.push_str(" hidden=\"1\" collapsed=\"1\"");
            }
            out.push_str("/>\n");
        }
        out.push_str("</cols>\n");
    }

    // <sheetData>
    out.push_str("<sheetData>\n");
    write_sheet_data(&mut out, sheet);
    out.push_str("</sheetData>\n");

    // <sheetProtection>
    if protections.iter().any(|p| p.kind == ProtectionKind::Sheet) {
        out.push_str("<sheetProtection sheet=\"1\" objects=\"1\" scenarios=\"1\"/>\n");
    }

    // <protectedRanges>
    let ranges: Vec<&&RangeProtection> = protections
        .iter()
        .filter(|p| p.kind == ProtectionKind::Range)
        .collect();
    if !ranges.is_empty() {
        out.push_str("<protectedRanges>\n");
        for p in ranges {
            let _ = writeln!(
                out,
                "<protectedRange name=\"Protection {}\" sqref=\"{}\"/>",
                p.id.0, p.target.range
            );
        }
        out.push_str("</protectedRanges>\n");
    }

    out.push_str("</worksheet>");
    out
}

/// Write all cell rows into `<sheetData>`.
fn write_sheet_data(out: &mut String, sheet: &Sheet) {
    // cells are sorted by (row, col)
    let mut current_row = None;
    for cd in &sheet.cells {
        if current_row != Some(cd.r) {
            if current_row.is_some() {
                out.push_str("</row>\n");
            }
            let _ = write!(out, "<row r=\"{}\">", u64::from(cd.r) + 1);
            current_row = Some(cd.r);
        }
        write_cell(out, cd);
    }
    if current_row.is_some() {
        out.push_str("</row>\n");
    }
}

/// Write a single `<c>` element.
fn write_cell(out: &mut String, cd: &CellData) {
    let cell_ref = format!("{}{}", col_to_letter(cd.c), u64::from(cd.r) + 1);
    match &cd.value {
        CellValue::Empty => {}
        CellValue::Text(s) => {
            let _ = write!(
                out,
                "<c r=\"{cell_ref}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                escape(s.as_str())
            );
        }
        CellValue::Number(n) if n.is_finite() => {
            let _ = write!(out, "<c r=\"{cell_ref}\"><v>{n}</v></c>");
        }
        // OOXML numbers are finite; the rest become error cells
        CellValue::Number(n) => {
            let code = if n.is_nan() { "#NUM!" } else { "#DIV/0!" };
            let _ = write!(out, "<c r=\"{cell_ref}\" t=\"e\"><v>{code}</v></c>");
        }
        CellValue::Bool(b) => {
            let _ = write!(
                out,
                "<c r=\"{cell_ref}\" t=\"b\"><v>{}</v></c>",
                u8::from(*b)
            );
        }
    }
}
