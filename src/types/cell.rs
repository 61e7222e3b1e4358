use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell with position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellData {
    pub r: u32, // row (0-indexed)
    pub c: u32, // col (0-indexed)
    pub value: CellValue,
}

/// A single cell's value.
///
/// The collaborator contract hands empty cells back as [`CellValue::Empty`];
/// an empty string is treated the same way when counting rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(#[serde(with = "number_serde")] f64),
    Bool(bool),
}

/// JSON has no infinities or NaN; those are stored as the strings `"inf"`,
/// `"-inf"` and `"NaN"` and every finite value as a plain number.
mod number_serde {
    use serde::de::{self, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if n.is_finite() {
            serializer.serialize_f64(*n)
        } else if n.is_nan() {
            serializer.serialize_str("NaN")
        } else if n.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Finite(f64),
        Special(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Stored::deserialize(deserializer)? {
            Stored::Finite(n) => Ok(n),
            Stored::Special(s) => match s.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(de::Error::invalid_value(
                    Unexpected::Str(other),
                    &"a number, \"inf\", \"-inf\" or \"NaN\"",
                )),
            },
        }
    }
}

impl CellValue {
    /// True for `Empty` and for zero-length text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Detect the value type of raw text input.
    ///
    /// - Empty string → `Empty`
    /// - Parseable as f64 → `Number`
    /// - "true"/"false" (case-insensitive) → `Bool`
    /// - Otherwise → `Text`
    pub fn detect(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return Self::Number(n);
            }
        }
        Self::Text(trimmed.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(true) => f.write_str("TRUE"),
            Self::Bool(false) => f.write_str("FALSE"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Row-major block of values, as read from or written to a range.
pub type Grid = Vec<Vec<CellValue>>;

/// `(rows, cols)` of a grid, or `None` if its rows have different lengths.
pub fn grid_shape(grid: &[Vec<CellValue>]) -> Option<(usize, usize)> {
    let cols = grid.first().map_or(0, Vec::len);
    grid.iter()
        .all(|row| row.len() == cols)
        .then_some((grid.len(), cols))
}

/// A `rows x cols` grid holding the same value in every cell.
pub fn broadcast(value: &CellValue, rows: usize, cols: usize) -> Grid {
    vec![vec![value.clone(); cols]; rows]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(CellValue::detect("  "), CellValue::Empty);
        assert_eq!(CellValue::detect("42.5"), CellValue::Number(42.5));
        assert_eq!(CellValue::detect("TRUE"), CellValue::Bool(true));
        assert_eq!(CellValue::detect("Onshore"), CellValue::Text("Onshore".into()));
        assert_eq!(CellValue::detect("NaN"), CellValue::Text("NaN".into()));
    }

    #[test]
    fn test_empty_text_counts_as_empty() {
        assert!(CellValue::Text(String::new()).is_empty());
        assert!(!CellValue::Text(" ".into()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(120.0).to_string(), "120");
        assert_eq!(CellValue::Number(0.25).to_string(), "0.25");
        assert_eq!(CellValue::Bool(false).to_string(), "FALSE");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_number_json_keeps_finite_values_numeric() {
        let json = serde_json::to_string(&CellValue::Number(12.5)).unwrap();
        assert_eq!(json, r#"{"number":12.5}"#);
        let back: CellValue = serde_json::from_str(r#"{"number":3}"#).unwrap();
        assert_eq!(back, CellValue::Number(3.0));
    }

    #[test]
    fn test_number_json_non_finite() {
        let values = [f64::INFINITY, f64::NEG_INFINITY, f64::NAN];
        let json = serde_json::to_string(&values.map(CellValue::Number)).unwrap();
        assert_eq!(json, r#"[{"number":"inf"},{"number":"-inf"},{"number":"NaN"}]"#);

        let back: Vec<CellValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0], CellValue::Number(f64::INFINITY));
        assert_eq!(back[1], CellValue::Number(f64::NEG_INFINITY));
        assert!(back[2].as_number().unwrap().is_nan());
    }

    #[test]
    fn test_number_json_rejects_other_text() {
        assert!(serde_json::from_str::<CellValue>(r#"{"number":"12"}"#).is_err());
        assert!(serde_json::from_str::<CellValue>(r#"{"number":null}"#).is_err());
    }

    #[test]
    fn test_grid_shape() {
        let grid = broadcast(&CellValue::from("6/4/23"), 3, 1);
        assert_eq!(grid_shape(&grid), Some((3, 1)));
        assert_eq!(grid_shape(&[]), Some((0, 0)));
        let ragged = vec![vec![CellValue::Empty], vec![]];
        assert_eq!(grid_shape(&ragged), None);
    }
}
