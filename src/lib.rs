//! acceptsheet - layout model and reshape pipeline for lock acceptance sheets
//!
//! A coordinator copies weekly demand from a raw data sheet into a formatted
//! "acceptance" sheet, partners fill in their supply next to it, and the wide
//! sheet is periodically flattened into a long "responses" sheet:
//! - Week-slot coordinate model for both sheets ([`layout`])
//! - Declarative protected / clearable / grouped range tables ([`ranges`])
//! - Create, import, protect, clear and group operations ([`pipeline`])
//! - Any spreadsheet host behind [`SpreadsheetBackend`], with an in-memory
//!   implementation ([`MemoryWorkbook`])
//! - CSV in/out and XLSX export for offline work
//!
//! # Usage
//!
//! ```no_run
//! use acceptsheet::{pipeline, MemoryWorkbook, PipelineConfig};
//!
//! # fn run(mut book: MemoryWorkbook) -> acceptsheet::Result<()> {
//! let config = PipelineConfig::default();
//! let created = pipeline::create_sheet(&mut book, &config)?;
//! let config = config.with_acceptance(created.sheet.into());
//! pipeline::protect_ranges(&mut book, &config)?;
//! pipeline::add_groups(&mut book, &config)?;
//! pipeline::import_responses(&mut book, &config)?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod cell_ref;
pub mod config;
pub mod csv;
pub mod error;
pub mod export;
pub mod layout;
pub mod memory;
pub mod outlines;
pub mod pipeline;
pub mod protection;
pub mod ranges;
pub mod types;

pub use backend::{SheetRef, SpreadsheetBackend};
pub use cell_ref::{CellRange, SheetId, SheetRange};
pub use config::PipelineConfig;
pub use error::{AcceptsheetError, Result};
pub use layout::{Layout, Segment, Side, WeekSlot};
pub use memory::MemoryWorkbook;
pub use types::*;

/// Get the version of the library
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
