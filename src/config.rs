//! Which sheets the pipeline operates on.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::SheetRef;
use crate::error::Result;

/// Sheet references for every pipeline operation.
///
/// Unspecified fields fall back to the names used by the lock acceptance
/// workbook:
///
/// ```json
/// { "acceptance": "Acceptance - June Lock", "responses": 2060640258 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Formatted, empty acceptance sheet duplicated by `create_sheet`.
    pub template: SheetRef,
    /// Pivoted weekly demand the new sheet is seeded from.
    pub raw_data: SheetRef,
    /// The wide sheet being filled in, protected and imported.
    pub acceptance: SheetRef,
    /// The long sheet regenerated by `import_responses`.
    pub responses: SheetRef,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            template: SheetRef::name("Lock Acceptance - Template"),
            raw_data: SheetRef::name("lock_accept_US"),
            acceptance: SheetRef::name("Copy of Acceptance - May Lock"),
            responses: SheetRef::name("Responses Test (May Lock)"),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// The same config pointed at another acceptance sheet.
    pub fn with_acceptance(mut self, acceptance: SheetRef) -> Self {
        self.acceptance = acceptance;
        self
    }
}
