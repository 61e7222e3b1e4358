use crate::backend::SpreadsheetBackend;
use crate::cell_ref::col_to_letter;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::ranges::{column_group_ranges, COLUMN_GROUP_STARTS};

use super::{resolve, GroupReport};

/// Remove the depth-1 column group at each ratio column pair.
///
/// A column without a group is recorded in `missing` and skipped.
pub fn remove_groups<B: SpreadsheetBackend + ?Sized>(
    backend: &mut B,
    config: &PipelineConfig,
) -> Result<GroupReport> {
    let sheet = resolve(backend, &config.acceptance, "acceptance")?;

    let mut report = GroupReport::default();
    for col in COLUMN_GROUP_STARTS {
        match backend.remove_column_group(sheet, col, 1) {
            Ok(()) => report.removed += 1,
            Err(err) if err.is_group_not_found() => {
                log::debug!("no column group at {}", col_to_letter(col));
                report.missing.push(col);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(report)
}

/// Regroup the ratio column pairs from scratch.
///
/// Existing groups are removed first, then each pair is raised one outline
/// level over every row in use, so a fresh sheet ends with twelve groups.
pub fn add_groups<B: SpreadsheetBackend + ?Sized>(
    backend: &mut B,
    config: &PipelineConfig,
) -> Result<GroupReport> {
    let mut report = remove_groups(backend, config)?;
    let sheet = resolve(backend, &config.acceptance, "acceptance")?;

    let rows = backend.last_row(sheet)?.max(1);
    for range in column_group_ranges(rows) {
        backend.shift_column_group_depth(sheet, &range, 1)?;
        report.added += 1;
    }
    log::info!(
        "grouped {} column pairs ({} removed first)",
        report.added,
        report.removed
    );
    Ok(report)
}
