//! Range protection records.
//!
//! A protection locks one rectangular range of one sheet down to an explicit
//! editor list. Sheet-level protections share the same record with
//! [`ProtectionKind::Sheet`] and a whole-sheet range.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell_ref::{SheetId, SheetRange};

fn is_false(v: &bool) -> bool {
    !*v
}

/// Identifier of a protection within a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtectionId(pub u32);

impl fmt::Display for ProtectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a protection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionKind {
    #[default]
    Range,
    Sheet,
}

/// One protection and its editor set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeProtection {
    pub id: ProtectionId,
    pub kind: ProtectionKind,
    pub target: SheetRange,
    /// Identities allowed to edit the protected cells.
    pub editors: Vec<String>,
    /// Whether every user in the workspace domain may edit.
    #[serde(default, skip_serializing_if = "is_false")]
    pub domain_edit: bool,
}

impl RangeProtection {
    /// A fresh protection lists its creator as the only editor.
    ///
    /// Inside a workspace domain the domain-wide edit switch starts on.
    pub fn new(id: ProtectionId, target: SheetRange, creator: &str, in_domain: bool) -> Self {
        Self {
            id,
            kind: ProtectionKind::Range,
            target,
            editors: vec![creator.to_string()],
            domain_edit: in_domain,
        }
    }

    pub fn sheet(&self) -> SheetId {
        self.target.sheet
    }

    /// Replace the editor set with `editor` alone.
    pub fn set_sole_editor(&mut self, editor: &str) {
        self.editors.clear();
        self.editors.push(editor.to_string());
    }

    pub fn add_editor(&mut self, editor: &str) {
        if !self.can_edit(editor) {
            self.editors.push(editor.to_string());
        }
    }

    pub fn can_edit(&self, user: &str) -> bool {
        self.editors.iter().any(|e| e.eq_ignore_ascii_case(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cell_ref::CellRange;

    fn protection() -> RangeProtection {
        let target = SheetRange::new(SheetId(7), CellRange::columns(0, 5));
        RangeProtection::new(ProtectionId(1), target, "owner@example.com", false)
    }

    #[test]
    fn test_new_protection_lists_creator() {
        let p = protection();
        assert_eq!(p.editors, vec!["owner@example.com".to_string()]);
        assert!(!p.domain_edit);
        assert_eq!(p.kind, ProtectionKind::Range);
        assert_eq!(p.sheet(), SheetId(7));
    }

    #[test]
    fn test_sole_editor_replaces_set() {
        let mut p = protection();
        p.add_editor("a@example.com");
        p.add_editor("b@example.com");
        p.set_sole_editor("me@example.com");
        assert_eq!(p.editors, vec!["me@example.com".to_string()]);
        assert!(p.can_edit("ME@example.com"));
        assert!(!p.can_edit("owner@example.com"));
    }

    #[test]
    fn test_add_editor_is_idempotent() {
        let mut p = protection();
        p.add_editor("owner@example.com");
        assert_eq!(p.editors.len(), 1);
    }

    #[test]
    fn test_serde_skips_default_domain_flag() {
        let json = serde_json::to_string(&protection()).unwrap();
        assert!(!json.contains("domainEdit"));
        let back: RangeProtection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, protection());
    }
}
