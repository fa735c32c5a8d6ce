//! Codex Domain - pure data model for the reference client.
//!
//! Holds the item, civilization, and patch-note types plus the patch-history
//! resolver. No I/O and no async: everything here operates on data that the
//! client crate has already fetched or embedded.

pub mod civs;
pub mod error;
pub mod history;
pub mod items;
pub mod patches;

pub use civs::{civ_by_abbr, civ_by_slug, civilizations, CivAbbr, CivConfig};
pub use error::DomainError;
pub use history::{patch_history, PatchHistoryEntry};
pub use items::{canonical_key, Costs, ItemId, ItemKind, ItemPayload, UnifiedItem, Variation};
pub use patches::{civ_overlap, ChangeKind, PatchChange, PatchLine, PatchNotes, PatchSection};
