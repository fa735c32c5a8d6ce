//! Items - the units, buildings, technologies, and upgrades being browsed.
//!
//! All four kinds share a common shape (`UnifiedItem`) with a kind-specific
//! payload. Items are deserialized once from the static dataset and never
//! mutated afterwards.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::civs::CivAbbr;
use crate::error::DomainError;

/// Stable string identifier, unique within its item kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id with any trailing `-<digits>` variation suffix removed.
    ///
    /// `"longbowman-4"` and `"longbowman"` share the base id `"longbowman"`.
    pub fn base(&self) -> &str {
        match self.0.rsplit_once('-') {
            Some((base, suffix)) if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) => base,
            _ => &self.0,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The four browsable item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Units,
    Buildings,
    Technologies,
    Upgrades,
}

impl ItemKind {
    /// The URL path segment for this kind, also the canonical-key prefix.
    pub fn as_slug(&self) -> &'static str {
        match self {
            ItemKind::Units => "units",
            ItemKind::Buildings => "buildings",
            ItemKind::Technologies => "technologies",
            ItemKind::Upgrades => "upgrades",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

impl FromStr for ItemKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unit" | "units" => Ok(ItemKind::Units),
            "building" | "buildings" => Ok(ItemKind::Buildings),
            "technology" | "technologies" | "tech" => Ok(ItemKind::Technologies),
            "upgrade" | "upgrades" => Ok(ItemKind::Upgrades),
            _ => Err(DomainError::parse(format!("unknown item kind: {s}"))),
        }
    }
}

/// Resource costs of a variation. Missing resources deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Costs {
    pub food: u32,
    pub wood: u32,
    pub gold: u32,
    pub stone: u32,
    /// Build/research time in seconds.
    pub time: u32,
    pub popcap: u32,
}

/// One concrete per-civilization/per-age version of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    #[serde(default)]
    pub id: Option<ItemId>,
    /// Age this variation becomes available (1-4).
    pub age: u8,
    /// Civilizations this variation applies to; empty means all owners.
    #[serde(default)]
    pub civs: BTreeSet<CivAbbr>,
    #[serde(default)]
    pub costs: Costs,
    #[serde(default)]
    pub description: Option<String>,
}

/// Kind-specific payload, tagged by the dataset's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemPayload {
    Unit {
        #[serde(default)]
        variations: Vec<Variation>,
    },
    Building {
        #[serde(default)]
        variations: Vec<Variation>,
    },
    Technology {
        #[serde(default)]
        variations: Vec<Variation>,
    },
    Upgrade {
        /// Canonical key of the item this upgrade applies to, when known.
        #[serde(default)]
        unlocks: Option<String>,
    },
}

/// Common shape shared by all four item kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Display-tier tags (`"infantry"`, `"siege"`, ...).
    #[serde(default)]
    pub classes: Vec<String>,
    /// Civilizations this item is available to.
    #[serde(default)]
    pub civs: BTreeSet<CivAbbr>,
    #[serde(flatten)]
    pub payload: ItemPayload,
}

impl UnifiedItem {
    pub fn kind(&self) -> ItemKind {
        match self.payload {
            ItemPayload::Unit { .. } => ItemKind::Units,
            ItemPayload::Building { .. } => ItemKind::Buildings,
            ItemPayload::Technology { .. } => ItemKind::Technologies,
            ItemPayload::Upgrade { .. } => ItemKind::Upgrades,
        }
    }

    /// The identifier used to match this item against patch-note entries.
    pub fn canonical_key(&self) -> String {
        canonical_key(self.kind(), &self.id)
    }

    pub fn variations(&self) -> &[Variation] {
        match &self.payload {
            ItemPayload::Unit { variations }
            | ItemPayload::Building { variations }
            | ItemPayload::Technology { variations } => variations.as_slice(),
            ItemPayload::Upgrade { .. } => &[],
        }
    }

    /// The most appropriate variation for a civilization and age: the highest
    /// variation not beyond `age` whose civ scope admits `civ`.
    pub fn age_variation(&self, civ: Option<&CivAbbr>, age: u8) -> Option<&Variation> {
        self.variations()
            .iter()
            .filter(|v| match civ {
                Some(c) => v.civs.is_empty() || v.civs.contains(c),
                None => true,
            })
            .filter(|v| v.age <= age)
            .max_by_key(|v| v.age)
    }
}

/// Normalized identifier joining the item domain to the patch domain.
///
/// Derivable from both directions: from a loaded item via its kind and id,
/// and from static patch text where the same strings are authored by hand.
pub fn canonical_key(kind: ItemKind, id: &ItemId) -> String {
    format!("{}/{}", kind.as_slug(), id.base())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str, civs: &[&str]) -> UnifiedItem {
        UnifiedItem {
            id: ItemId::new(id),
            name: id.to_string(),
            description: String::new(),
            classes: vec![],
            civs: civs.iter().map(|c| CivAbbr::new(*c)).collect(),
            payload: ItemPayload::Unit { variations: vec![] },
        }
    }

    #[test]
    fn canonical_key_strips_variation_suffix() {
        let item = unit("longbowman-4", &["en"]);
        assert_eq!(item.canonical_key(), "units/longbowman");
    }

    #[test]
    fn canonical_key_keeps_non_numeric_suffix() {
        let item = unit("town-center", &[]);
        assert_eq!(item.canonical_key(), "units/town-center");
    }

    #[test]
    fn item_kind_from_str() {
        assert_eq!("units".parse::<ItemKind>(), Ok(ItemKind::Units));
        assert_eq!("Technology".parse::<ItemKind>(), Ok(ItemKind::Technologies));
        assert!("wonders".parse::<ItemKind>().is_err());
    }

    #[test]
    fn deserializes_unified_item_from_dataset_shape() {
        let json = serde_json::json!({
            "id": "knight",
            "type": "unit",
            "name": "Knight",
            "description": "Heavy cavalry.",
            "classes": ["cavalry", "melee"],
            "civs": ["fr", "hr"],
            "variations": [
                { "age": 2, "costs": { "food": 140, "gold": 100, "time": 35 } },
                { "age": 3, "civs": ["fr"], "costs": { "food": 140, "gold": 100, "time": 35 } }
            ]
        });
        let item: UnifiedItem = serde_json::from_value(json).expect("deserialize");
        assert_eq!(item.kind(), ItemKind::Units);
        assert_eq!(item.variations().len(), 2);
        assert_eq!(item.variations()[0].costs.food, 140);
        assert!(item.civs.contains(&CivAbbr::new("fr")));
    }

    #[test]
    fn age_variation_respects_civ_and_age() {
        let json = serde_json::json!({
            "id": "knight",
            "type": "unit",
            "name": "Knight",
            "civs": ["fr", "hr"],
            "variations": [
                { "age": 2 },
                { "age": 3, "civs": ["fr"] },
                { "age": 4 }
            ]
        });
        let item: UnifiedItem = serde_json::from_value(json).expect("deserialize");

        let fr = CivAbbr::new("fr");
        let hr = CivAbbr::new("hr");
        assert_eq!(item.age_variation(Some(&fr), 3).map(|v| v.age), Some(3));
        // The age-3 variation is French-only.
        assert_eq!(item.age_variation(Some(&hr), 3).map(|v| v.age), Some(2));
        assert_eq!(item.age_variation(None, 4).map(|v| v.age), Some(4));
        assert_eq!(item.age_variation(None, 1), None);
    }
}
