//! Patch-history resolution: every historical change applying to one item.
//!
//! Walks the full catalog, keeps the lines whose three scoping levels all
//! overlap the requested civilization filter, and returns per-patch diffs
//! ordered most-recent-first.

use crate::civs::CivAbbr;
use crate::items::UnifiedItem;
use crate::patches::{civ_overlap, ChangeKind, PatchLine, PatchNotes};

/// One patch together with the diff lines that apply to the queried item.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchHistoryEntry<'a> {
    pub patch: &'a PatchNotes,
    /// Surviving lines, sorted buff before nerf before fix (stable).
    pub diff: Vec<PatchLine>,
}

/// All changes, line by line, that apply to `item` under the civ filter.
///
/// An empty `civs` filter matches everything. Patches contributing no lines
/// are omitted; an item mentioned in no patch yields an empty vec. The result
/// is sorted by patch date descending, ties keeping catalog order.
pub fn patch_history<'a>(
    catalog: &'a [PatchNotes],
    item: &UnifiedItem,
    civs: &[CivAbbr],
) -> Vec<PatchHistoryEntry<'a>> {
    let key = item.canonical_key();
    let filter = civs.iter().cloned().collect();

    let mut history = Vec::new();
    for patch in catalog {
        let mut diff: Vec<PatchLine> = Vec::new();
        for section in &patch.sections {
            if !civ_overlap(&filter, &section.civs) {
                continue;
            }
            for change in &section.changes {
                if !change.items.contains(&key) || !civ_overlap(&filter, &change.civs) {
                    continue;
                }
                diff.extend(
                    change
                        .diff
                        .iter()
                        .filter(|line| civ_overlap(&filter, &line.civs))
                        .cloned(),
                );
            }
        }
        if !diff.is_empty() {
            diff.sort_by_key(sort_key);
            history.push(PatchHistoryEntry { patch, diff });
        }
    }

    history.sort_by(|a, b| b.patch.date.cmp(&a.patch.date));
    history
}

/// Display priority of a diff line: buffs first, then nerfs, then fixes.
fn sort_key(line: &PatchLine) -> ChangeKind {
    line.kind
}
