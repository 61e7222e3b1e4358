//! Test fixtures for building acceptance workbooks in memory.
//!
//! [`AcceptanceBook`] seeds a [`MemoryWorkbook`] with the three sheets the
//! pipeline expects under their default names:
//!
//! - a wide, formatted template (300 x 71 grid, headings in rows 5-6)
//! - a raw data sheet with `n` entities and twelve weekly demand columns
//! - a stale responses sheet
//!
//! # Example
//!
//! ```rust,ignore
//! let mut fx = AcceptanceBook::new(3).build();
//! let (sheet, config) = fx.create();
//! pipeline::import_responses(&mut fx.book, &config).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use acceptsheet::backend::SpreadsheetBackend;
use acceptsheet::layout::{RAW_DEMAND_COL, WEEK_SLOT_COUNT};
use acceptsheet::pipeline;
use acceptsheet::{
    CellRange, CellValue, MemoryWorkbook, PipelineConfig, Session, SheetId, SheetRef,
};

pub const USER: &str = "coordinator@example.com";
pub const TEMPLATE: &str = "Lock Acceptance - Template";
pub const RAW: &str = "lock_accept_US";
pub const RESPONSES: &str = "Responses Test (May Lock)";

/// Template grid: 300 rows, A..BS.
pub const TEMPLATE_ROWS: u32 = 300;
pub const TEMPLATE_COLS: u32 = 71;

const SLOT_HEADINGS: [&str; 5] = ["Demand", "Partner Supply", "Notes", "Ratio", "Comment"];

/// Week label of slot `week` as it appears in the raw header row.
pub fn week_label(week: usize) -> String {
    format!("Week of 2024-05-{:02}", 6 + week)
}

/// Demand of entity `row` (0-based) in slot `week`.
pub fn demand(row: u32, week: usize) -> f64 {
    f64::from(row * 100 + week as u32 + 1)
}

/// The five primary filter values of entity `row`.
pub fn primary(row: u32) -> [String; 5] {
    [
        if row % 2 == 0 { "Web" } else { "App" }.to_string(),
        format!("Partner {row}"),
        "Onshore".to_string(),
        "Direct".to_string(),
        format!("Staff {}", row % 3),
    ]
}

/// The four secondary filter values of entity `row`.
pub fn secondary(row: u32) -> [String; 4] {
    [
        "NA".to_string(),
        format!("Eco {}", row % 4),
        if row % 5 == 0 { "Premium" } else { "Core" }.to_string(),
        "Tier 1".to_string(),
    ]
}

fn text(s: &str) -> CellValue {
    CellValue::from(s)
}

/// Builder for a seeded workbook.
pub struct AcceptanceBook {
    rows: u32,
    domain: Option<&'static str>,
    template: bool,
    raw: bool,
    responses: bool,
}

impl AcceptanceBook {
    pub fn new(rows: u32) -> Self {
        Self {
            rows,
            domain: None,
            template: true,
            raw: true,
            responses: true,
        }
    }

    pub fn in_domain(mut self, domain: &'static str) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn without_template(mut self) -> Self {
        self.template = false;
        self
    }

    pub fn without_raw(mut self) -> Self {
        self.raw = false;
        self
    }

    pub fn without_responses(mut self) -> Self {
        self.responses = false;
        self
    }

    pub fn build(self) -> Fixture {
        let session = match self.domain {
            Some(domain) => Session::new(USER).with_domain(domain),
            None => Session::new(USER),
        };
        let mut book = MemoryWorkbook::new(session);
        let template = self.template.then(|| seed_template(&mut book));
        let raw = self.raw.then(|| seed_raw(&mut book, self.rows));
        let responses = self.responses.then(|| seed_responses(&mut book));
        Fixture {
            book,
            template,
            raw,
            responses,
        }
    }
}

fn put(book: &mut MemoryWorkbook, sheet: SheetId, row: u32, col: u32, value: CellValue) {
    book.write_range(sheet, &CellRange::cell(row, col), &vec![vec![value]])
        .unwrap();
}

fn seed_template(book: &mut MemoryWorkbook) -> SheetId {
    let id = book.add_sheet(TEMPLATE);
    book.set_grid(id, TEMPLATE_ROWS, TEMPLATE_COLS).unwrap();
    put(book, id, 0, 5, text("Lock Acceptance"));
    for (col, heading) in (0..).zip(["Platform", "Partner", "Shore", "Channel", "Staff Group"]) {
        put(book, id, 5, col, text(heading));
    }
    for week in 0..WEEK_SLOT_COUNT as u32 {
        for (offset, heading) in (0..).zip(SLOT_HEADINGS) {
            put(book, id, 5, 5 + week * 5 + offset, text(heading));
        }
    }
    for (offset, heading) in (0..).zip(["Region", "Ecosystem", "Core/Premium", "Tier"]) {
        put(book, id, 5, 65 + offset, text(heading));
    }
    id
}

fn seed_raw(book: &mut MemoryWorkbook, rows: u32) -> SheetId {
    let id = book.add_sheet(RAW);
    let header = [
        "platform", "partner", "shore", "channel", "staff_group", "region", "ecosystem",
        "core_premium", "tier",
    ];
    for (col, name) in (0..).zip(header) {
        put(book, id, 0, col, text(name));
    }
    for week in 0..WEEK_SLOT_COUNT {
        put(book, id, 0, RAW_DEMAND_COL + week as u32, text(&week_label(week)));
    }
    for row in 0..rows {
        let values = primary(row)
            .into_iter()
            .chain(secondary(row))
            .map(CellValue::from)
            .chain((0..WEEK_SLOT_COUNT).map(|w| CellValue::Number(demand(row, w))))
            .collect::<Vec<_>>();
        let range = CellRange::new(row + 1, 0, 1, values.len() as u32);
        book.write_range(id, &range, &vec![values]).unwrap();
    }
    id
}

fn seed_responses(book: &mut MemoryWorkbook) -> SheetId {
    let id = book.add_sheet(RESPONSES);
    for row in 0..500 {
        put(book, id, row, 0, text("stale"));
    }
    put(book, id, 3, 12, text("stale side note"));
    id
}

/// A seeded workbook and the ids of its sheets.
pub struct Fixture {
    pub book: MemoryWorkbook,
    pub template: Option<SheetId>,
    pub raw: Option<SheetId>,
    pub responses: Option<SheetId>,
}

impl Fixture {
    /// Default config (fixture sheets carry the default names).
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::default()
    }

    /// Run `create_sheet` and point a config at the new sheet.
    pub fn create(&mut self) -> (SheetId, PipelineConfig) {
        let base = self.config();
        let created = pipeline::create_sheet(&mut self.book, &base).unwrap();
        let config = self.config().with_acceptance(SheetRef::from(created.sheet));
        (created.sheet, config)
    }

    /// Value at an A1 reference.
    pub fn cell(&self, sheet: SheetId, a1: &str) -> CellValue {
        let range: CellRange = a1.parse().unwrap();
        self.book.read_range(sheet, &range).unwrap()[0][0].clone()
    }

    /// Values of a range, row-major.
    pub fn values(&self, sheet: SheetId, a1: &str) -> Vec<Vec<CellValue>> {
        self.book.read_range(sheet, &a1.parse().unwrap()).unwrap()
    }

    /// Type text into a cell of the acceptance sheet, as a partner would.
    pub fn enter(&mut self, sheet: SheetId, a1: &str, value: CellValue) {
        let range: CellRange = a1.parse().unwrap();
        self.book.write_range(sheet, &range, &vec![vec![value]]).unwrap();
    }
}
