use crate::backend::SpreadsheetBackend;
use crate::cell_ref::CellRange;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::layout::{
    Layout, Side, WeekSlot, KEY_COL, PRIMARY_FILTER_WIDTH, RAW_DEMAND_COL, RAW_FIRST_DATA_ROW,
    RAW_HEADER_ROW, RAW_PRIMARY_COL, RAW_SECONDARY_COL, SECONDARY_BLOCK_WIDTH,
};
use crate::types::Grid;

use super::{count_rows, resolve, CreatedSheet};

/// Values read from the raw sheet for one week slot.
struct RawWeek {
    slot: WeekSlot,
    label: Grid,
    demand: Grid,
}

/// Duplicate the template and seed it from the raw data sheet.
///
/// Copies the primary filters to A7, the secondary filter block to BN7, and
/// for every week slot its date label and demand column. Partner supply is
/// left empty for hand entry.
///
/// All raw values are read before the template is duplicated, so a failing
/// read leaves the workbook as it was.
pub fn create_sheet<B: SpreadsheetBackend + ?Sized>(
    backend: &mut B,
    config: &PipelineConfig,
) -> Result<CreatedSheet> {
    let template = resolve(backend, &config.template, "template")?;
    let raw = resolve(backend, &config.raw_data, "raw data")?;

    let n = count_rows(backend, raw, KEY_COL, RAW_FIRST_DATA_ROW)?;
    let raw_block = |col: u32, width: u32| CellRange::new(RAW_FIRST_DATA_ROW, col, n, width);

    let primary = backend.read_range(raw, &raw_block(RAW_PRIMARY_COL, PRIMARY_FILTER_WIDTH))?;
    let secondary =
        backend.read_range(raw, &raw_block(RAW_SECONDARY_COL, SECONDARY_BLOCK_WIDTH))?;
    let weeks = WeekSlot::all()
        .zip(RAW_DEMAND_COL..)
        .map(|(slot, col)| {
            Ok(RawWeek {
                slot,
                label: backend.read_range(raw, &CellRange::cell(RAW_HEADER_ROW, col))?,
                demand: backend.read_range(raw, &raw_block(col, 1))?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let sheet = backend.duplicate_sheet(template)?;
    let layout = Layout::new(n);
    backend.write_range(sheet, &layout.filter_range(Side::Left), &primary)?;
    backend.write_range(sheet, &layout.secondary_filter_block(), &secondary)?;
    for week in &weeks {
        backend.write_range(sheet, &layout.date_cell(week.slot), &week.label)?;
        backend.write_range(sheet, &layout.demand_range(week.slot), &week.demand)?;
    }

    log::info!(
        "created {} from template with {n} rows",
        backend.sheet_name(sheet)?
    );
    Ok(CreatedSheet { sheet, row_count: n })
}
