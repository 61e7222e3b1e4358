//! Data types for the in-memory spreadsheet model.

mod cell;
mod content;
mod workbook;

pub use cell::*;
pub use content::*;
pub use workbook::*;
