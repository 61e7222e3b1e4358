//! Structured error types for acceptsheet.
//!
//! Every fallible operation in the crate returns [`Result`]. Per-range
//! failures inside best-effort loops (protect, clear, ungroup) are also
//! represented with this type and collected into the operation's report.

/// All errors that can occur while deriving layouts or driving a spreadsheet.
#[derive(Debug, thiserror::Error)]
pub enum AcceptsheetError {
    /// A required sheet (template, raw data, acceptance, responses) is absent.
    #[error("Missing source sheet: {0}")]
    MissingSource(String),

    /// Week slot index outside the fixed slot set.
    #[error("Invalid week index {index} (expected 0..={max})")]
    InvalidIndex { index: i64, max: usize },

    /// Protecting a single range failed.
    #[error("Failed to protect {range}: {reason}")]
    ProtectionFailure { range: String, reason: String },

    /// No column group exists at the requested column/depth.
    #[error("No column group at column {column}")]
    GroupNotFound { column: String },

    /// A grid handed to a write does not match the range it targets.
    #[error("Shape mismatch writing {range}: expected {expected}, got {actual}")]
    ShapeMismatch {
        range: String,
        expected: String,
        actual: String,
    },

    /// Range lies (partly) outside the sheet's grid.
    #[error("Range {range} is outside the {rows}x{cols} grid")]
    OutOfBounds { range: String, rows: u32, cols: u32 },

    /// A response block would run past the last row a sheet can hold.
    #[error("Response sheet needs {rows} rows, more than the {max}-row limit")]
    RowLimit { rows: u64, max: u32 },

    /// Sheet id not present in the workbook.
    #[error("Unknown sheet id {0}")]
    UnknownSheet(u32),

    /// Protection id not present in the workbook.
    #[error("Unknown protection id {0}")]
    UnknownProtection(u32),

    /// Invalid cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// The protected/clearable tables do not partition the used area.
    #[error("Layout conflict: {0}")]
    LayoutConflict(String),

    /// Malformed CSV input.
    #[error("CSV error: {0}")]
    Csv(String),

    /// JSON (config or snapshot) error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AcceptsheetError>;

impl AcceptsheetError {
    /// Whether this error is a per-index "group does not exist" miss.
    #[must_use]
    pub fn is_group_not_found(&self) -> bool {
        matches!(self, Self::GroupNotFound { .. })
    }
}
