//! Patch notes - dated balance releases and their civilization-scoped diffs.
//!
//! Scoping is hierarchical: section, change, and line each carry a civ set,
//! and an empty set at any level means "no constraint at this level". A line
//! is visible under a filter iff every level overlaps the filter.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::civs::CivAbbr;

/// The direction of one balance-change line, in display-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Buff,
    Nerf,
    Fix,
}

/// One atomic, human-readable change entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchLine {
    pub kind: ChangeKind,
    pub text: String,
    /// Narrows the enclosing change's scope; empty inherits it.
    #[serde(default)]
    pub civs: BTreeSet<CivAbbr>,
}

/// A group of diff lines applying to a set of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchChange {
    /// Canonical item keys (`"units/longbowman"`) this change affects.
    pub items: BTreeSet<String>,
    /// Narrows the enclosing section's scope; empty inherits it.
    #[serde(default)]
    pub civs: BTreeSet<CivAbbr>,
    pub diff: Vec<PatchLine>,
}

/// A titled block of changes, optionally scoped to some civilizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchSection {
    #[serde(default)]
    pub title: Option<String>,
    /// Empty means the section applies to all civilizations.
    #[serde(default)]
    pub civs: BTreeSet<CivAbbr>,
    pub changes: Vec<PatchChange>,
}

/// One dated release. Server-side hotfixes are independent records that
/// follow their base patch in catalog order; they are never merged into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchNotes {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub season: Option<u32>,
    /// The sole sort key for patch history.
    pub date: NaiveDate,
    #[serde(default)]
    pub summary: String,
    pub sections: Vec<PatchSection>,
}

/// The single scoping primitive, used at section, change, and line level.
///
/// An empty set on either side means "no constraint"; otherwise the sets
/// must intersect.
pub fn civ_overlap(filter: &BTreeSet<CivAbbr>, scope: &BTreeSet<CivAbbr>) -> bool {
    if filter.is_empty() || scope.is_empty() {
        return true;
    }
    filter.iter().any(|c| scope.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(abbrs: &[&str]) -> BTreeSet<CivAbbr> {
        abbrs.iter().map(|a| CivAbbr::new(*a)).collect()
    }

    #[test]
    fn empty_sets_always_overlap() {
        assert!(civ_overlap(&set(&[]), &set(&[])));
        assert!(civ_overlap(&set(&[]), &set(&["en", "fr"])));
        assert!(civ_overlap(&set(&["en", "fr"]), &set(&[])));
    }

    #[test]
    fn non_empty_sets_need_intersection() {
        assert!(civ_overlap(&set(&["en"]), &set(&["en", "fr"])));
        assert!(!civ_overlap(&set(&["en"]), &set(&["fr"])));
        assert!(!civ_overlap(&set(&["mo", "ru"]), &set(&["ab", "de"])));
    }

    #[test]
    fn change_kind_display_priority() {
        assert!(ChangeKind::Buff < ChangeKind::Nerf);
        assert!(ChangeKind::Nerf < ChangeKind::Fix);
    }

    #[test]
    fn change_kind_deserializes_lowercase() {
        assert_eq!(
            serde_json::from_str::<ChangeKind>("\"buff\"").expect("deserialize"),
            ChangeKind::Buff
        );
        assert!(serde_json::from_str::<ChangeKind>("\"rework\"").is_err());
    }
}
