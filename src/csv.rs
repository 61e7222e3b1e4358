//! Minimal CSV/TSV reader and writer for single sheets.
//!
//! Used to bring an exported raw data sheet into a [`MemoryWorkbook`] and to
//! dump a regenerated responses sheet.
//!
//! [`MemoryWorkbook`]: crate::memory::MemoryWorkbook

use crate::cell_ref::SheetId;
use crate::error::{AcceptsheetError, Result};
use crate::types::{CellValue, Sheet};

/// Field separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

/// Parse CSV bytes into a sheet named `name`.
///
/// Numbers and booleans are detected per field; blank lines keep their row.
/// The sheet's id is a placeholder until it is inserted into a workbook.
pub fn parse_csv_sheet(name: &str, data: &[u8]) -> Result<Sheet> {
    parse_delimited(name, data, Delimiter::Comma)
}

/// Parse delimited bytes into a sheet named `name`.
pub fn parse_delimited(name: &str, data: &[u8], delim: Delimiter) -> Result<Sheet> {
    let text = String::from_utf8_lossy(data);
    let mut sheet = Sheet::new(SheetId(0), name);

    for (row, line) in (0u32..).zip(text.lines()) {
        if line.is_empty() {
            continue;
        }
        let fields = split_line(line, delim.as_char()).map_err(|col| {
            AcceptsheetError::Csv(format!(
                "unterminated quote on line {}, column {col}",
                row + 1
            ))
        })?;
        for (col, field) in (0u32..).zip(fields) {
            sheet.set(row, col, CellValue::detect(&field));
        }
    }
    Ok(sheet)
}

/// Split a line respecting quoted fields.
///
/// On an unterminated quote, returns the 1-based field number it opened in.
fn split_line(line: &str, sep: char) -> std::result::Result<Vec<String>, usize> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    if in_quotes {
        return Err(fields.len() + 1);
    }
    fields.push(current);
    Ok(fields)
}

/// Render the sheet's used area (A1 to the last row and column holding a
/// value) as CSV, one line per row.
pub fn write_csv(sheet: &Sheet) -> String {
    let mut out = String::new();
    for row in 0..sheet.last_row() {
        let line: Vec<String> = (0..sheet.last_col())
            .map(|col| quote_field(&sheet.get(row, col).to_string()))
            .collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_basic() {
        let data = b"Platform,Partner,Demand\nWeb,Acme,30\nApp,Globex,2.5";
        let sheet = parse_csv_sheet("lock_accept_US", data).unwrap();
        assert_eq!(sheet.name, "lock_accept_US");
        assert_eq!(sheet.last_row(), 3);
        assert_eq!(sheet.last_col(), 3);
        assert_eq!(sheet.get(1, 1), &CellValue::from("Acme"));
        assert_eq!(sheet.get(2, 2).as_number(), Some(2.5));
    }

    #[test]
    fn test_parse_tsv() {
        let sheet = parse_delimited("t", b"A\tB\n1\t2", Delimiter::Tab).unwrap();
        assert_eq!(sheet.cells.len(), 4);
        assert_eq!(sheet.get(1, 0), &CellValue::Number(1.0));
    }

    #[test]
    fn test_quoted_fields() {
        let data = b"\"Hello, World\",42\n\"She said \"\"hi\"\"\",0";
        let sheet = parse_csv_sheet("q", data).unwrap();
        assert_eq!(sheet.get(0, 0), &CellValue::from("Hello, World"));
        assert_eq!(sheet.get(1, 0), &CellValue::from("She said \"hi\""));
    }

    #[test]
    fn test_blank_line_keeps_row_numbers() {
        let sheet = parse_csv_sheet("b", b"a\n\nc").unwrap();
        assert_eq!(sheet.get(2, 0), &CellValue::from("c"));
        assert_eq!(sheet.get(1, 0), &CellValue::Empty);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse_csv_sheet("bad", b"a,b\nc,\"oops").unwrap_err();
        assert_eq!(
            err.to_string(),
            "CSV error: unterminated quote on line 2, column 2"
        );
    }

    #[test]
    fn test_empty_csv() {
        let sheet = parse_csv_sheet("empty", b"").unwrap();
        assert!(sheet.cells.is_empty());
        assert_eq!(write_csv(&sheet), "");
    }

    #[test]
    fn test_write_csv_quotes_and_fills_gaps() {
        let mut sheet = Sheet::new(SheetId(1), "out");
        sheet.set(0, 0, "Week".into());
        sheet.set(0, 2, "a, b".into());
        sheet.set(1, 1, CellValue::Number(3.0));
        sheet.set(1, 2, CellValue::Bool(true));
        assert_eq!(write_csv(&sheet), "Week,,\"a, b\"\n,3,TRUE\n");
    }

    #[test]
    fn test_write_then_parse() {
        let sheet = parse_csv_sheet("rt", b"x,\"y \"\"z\"\"\"\n1,2").unwrap();
        let again = parse_csv_sheet("rt", write_csv(&sheet).as_bytes()).unwrap();
        assert_eq!(again.cells, sheet.cells);
    }
}
