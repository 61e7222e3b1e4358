use crate::backend::SpreadsheetBackend;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::layout::{Layout, Segment, Side, WeekSlot, FIRST_DATA_ROW, KEY_COL, RESPONSE_HEADERS};
use crate::types::{broadcast, CellValue, Grid};

use super::{count_rows, resolve, ImportSummary};

/// Flatten the acceptance sheet into the responses sheet.
///
/// The responses sheet is cleared and rewritten as a header row followed by
/// one block of `n` rows per week slot, in slot order. Each block repeats the
/// 7 filter columns, carries the slot's date label in the week column and the
/// slot's demand/supply pair in the data columns.
///
/// Everything is read from the acceptance sheet, and every destination block
/// is placed, before the responses sheet is cleared; a failing write after
/// that point leaves it partially rebuilt.
pub fn import_responses<B: SpreadsheetBackend + ?Sized>(
    backend: &mut B,
    config: &PipelineConfig,
) -> Result<ImportSummary> {
    let wide = resolve(backend, &config.acceptance, "acceptance")?;
    let target = resolve(backend, &config.responses, "responses")?;

    let layout = Layout::new(count_rows(backend, wide, KEY_COL, FIRST_DATA_ROW)?);
    let n = layout.row_count() as usize;

    let left = backend.read_range(wide, &layout.filter_range(Side::Left))?;
    let right = backend.read_range(wide, &layout.filter_range(Side::Right))?;
    let filters: Grid = left
        .into_iter()
        .zip(right)
        .map(|(mut row, rest)| {
            row.extend(rest);
            row
        })
        .collect();

    let mut weeks = Vec::new();
    if n > 0 {
        for slot in WeekSlot::all() {
            let label = backend
                .read_range(wide, &layout.date_cell(slot))?
                .into_iter()
                .flatten()
                .next()
                .unwrap_or_default();
            let data = backend.read_range(wide, &layout.data_range(slot))?;
            let placed = [
                layout.response_segment(slot, Segment::Filters)?,
                layout.response_segment(slot, Segment::Week)?,
                layout.response_segment(slot, Segment::Data)?,
            ];
            weeks.push((slot, label, data, placed));
        }
    }

    backend.clear_sheet(target)?;
    let header = vec![RESPONSE_HEADERS.iter().map(|&h| CellValue::from(h)).collect()];
    backend.write_range(target, &layout.response_header_range(), &header)?;

    for (slot, label, data, [filters_at, week_at, data_at]) in &weeks {
        backend.write_range(target, filters_at, &filters)?;
        backend.write_range(target, week_at, &broadcast(label, n, 1))?;
        backend.write_range(target, data_at, data)?;
        log::debug!("imported {slot} ({label})");
    }

    let summary = ImportSummary {
        row_count: layout.row_count(),
        rows_written: layout.response_row_count(),
    };
    log::info!(
        "imported {} response rows into {}",
        summary.rows_written,
        backend.sheet_name(target)?
    );
    Ok(summary)
}
