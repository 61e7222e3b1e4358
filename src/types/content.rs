use serde::{Deserialize, Serialize};

/// Outline level for a row or column (for grouping/collapsing)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutlineLevel {
    /// Row or column index (0-indexed)
    pub index: u32,
    /// Outline level (1-8)
    pub level: u8,
    /// Is this group collapsed
    pub collapsed: bool,
}

/// The identity operations run under, and the domain it belongs to.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Identity (email) of the user the operations run as.
    pub effective_user: String,
    /// Workspace domain, if the spreadsheet lives in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Session {
    pub fn new(effective_user: impl Into<String>) -> Self {
        Self {
            effective_user: effective_user.into(),
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}
