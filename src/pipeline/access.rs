//! Protection and clearing over the fixed range tables.

use crate::backend::SpreadsheetBackend;
use crate::cell_ref::{CellRange, SheetId};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::protection::{ProtectionId, ProtectionKind};
use crate::ranges::{clearable_ranges, protected_ranges};

use super::{resolve, ClearReport, ProtectionReport};

/// Lock every protected range of the acceptance sheet to the effective user.
///
/// Ranges are processed independently: a failure is logged, recorded in the
/// report and the next range is attempted.
pub fn protect_ranges<B: SpreadsheetBackend + ?Sized>(
    backend: &mut B,
    config: &PipelineConfig,
) -> Result<ProtectionReport> {
    let sheet = resolve(backend, &config.acceptance, "acceptance")?;
    let user = backend.effective_user();

    let mut report = ProtectionReport::default();
    for range in protected_ranges() {
        match protect_one(backend, sheet, &range, &user) {
            Ok(id) => report.protected.push((range, id)),
            Err(err) => {
                log::warn!("could not protect {range}: {err}");
                report.failed.push((range, err));
            }
        }
    }
    log::info!(
        "protected {} ranges for {user} ({} failed)",
        report.protected.len(),
        report.failed.len()
    );
    Ok(report)
}

fn protect_one<B: SpreadsheetBackend + ?Sized>(
    backend: &mut B,
    sheet: SheetId,
    range: &CellRange,
    user: &str,
) -> Result<ProtectionId> {
    let id = backend.protect_range(sheet, range)?;
    backend.set_sole_editor(id, user)?;
    if backend.can_domain_edit(id)? {
        backend.set_domain_edit(id, false)?;
    }
    Ok(id)
}

/// Remove the range protections on the acceptance sheet that the effective
/// user can edit. Others are left alone. Returns how many were removed.
pub fn remove_protections<B: SpreadsheetBackend + ?Sized>(
    backend: &mut B,
    config: &PipelineConfig,
) -> Result<usize> {
    let sheet = resolve(backend, &config.acceptance, "acceptance")?;

    let mut removed = 0;
    for protection in backend.list_protections(ProtectionKind::Range) {
        if protection.sheet() != sheet || !backend.can_edit(protection.id)? {
            continue;
        }
        backend.remove_protection(protection.id)?;
        removed += 1;
    }
    log::info!("removed {removed} protections");
    Ok(removed)
}

/// Clear the values of every editable region of the acceptance sheet.
///
/// Filters, demand, headers and protections are untouched.
pub fn clear_editable_regions<B: SpreadsheetBackend + ?Sized>(
    backend: &mut B,
    config: &PipelineConfig,
) -> Result<ClearReport> {
    let sheet = resolve(backend, &config.acceptance, "acceptance")?;

    let mut report = ClearReport::default();
    for range in clearable_ranges() {
        match backend.clear_range(sheet, &range) {
            Ok(()) => report.cleared.push(range),
            Err(err) => {
                log::warn!("could not clear {range}: {err}");
                report.failed.push((range, err));
            }
        }
    }
    Ok(report)
}
