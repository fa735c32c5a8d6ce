//! Civilizations and the abbreviation codes used to scope everything else.
//!
//! A civilization is referenced by its short abbreviation everywhere: item
//! availability, patch-note sections, individual diff lines. The full
//! [`CivConfig`] record only exists for display purposes and is never embedded
//! by value in patch data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Short lowercase civilization code (`"en"`, `"fr"`, `"hr"`, ...).
///
/// The join key used for all civilization scoping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CivAbbr(String);

impl CivAbbr {
    pub fn new(abbr: impl Into<String>) -> Self {
        Self(abbr.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CivAbbr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CivAbbr {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Display metadata for a playable civilization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CivConfig {
    pub abbr: CivAbbr,
    pub name: &'static str,
    /// URL path segment (`/civs/{slug}`).
    pub slug: &'static str,
}

/// All playable civilizations, in display order.
pub fn civilizations() -> Vec<CivConfig> {
    [
        ("ab", "Abbasid Dynasty", "abbasid"),
        ("ch", "Chinese", "chinese"),
        ("de", "Delhi Sultanate", "delhi"),
        ("en", "English", "english"),
        ("fr", "French", "french"),
        ("hr", "Holy Roman Empire", "hre"),
        ("ma", "Malians", "malians"),
        ("mo", "Mongols", "mongols"),
        ("ot", "Ottomans", "ottomans"),
        ("ru", "Rus", "rus"),
    ]
    .into_iter()
    .map(|(abbr, name, slug)| CivConfig {
        abbr: CivAbbr::new(abbr),
        name,
        slug,
    })
    .collect()
}

/// Look up a civilization by its abbreviation code.
pub fn civ_by_abbr(abbr: &str) -> Option<CivConfig> {
    let abbr = abbr.to_lowercase();
    civilizations().into_iter().find(|c| c.abbr.as_str() == abbr)
}

/// Look up a civilization by its URL slug.
pub fn civ_by_slug(slug: &str) -> Option<CivConfig> {
    let slug = slug.to_lowercase();
    civilizations().into_iter().find(|c| c.slug == slug)
}

impl FromStr for CivConfig {
    type Err = DomainError;

    /// Accepts either an abbreviation or a slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        civ_by_abbr(s)
            .or_else(|| civ_by_slug(s))
            .ok_or_else(|| DomainError::parse(format!("unknown civilization: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_abbr() {
        let civ = civ_by_abbr("fr").expect("french should exist");
        assert_eq!(civ.name, "French");
        assert_eq!(civ.slug, "french");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(civ_by_abbr("EN").is_some());
        assert!(civ_by_slug("Mongols").is_some());
    }

    #[test]
    fn from_str_accepts_abbr_or_slug() {
        assert_eq!("hr".parse::<CivConfig>().map(|c| c.name), Ok("Holy Roman Empire"));
        assert_eq!("hre".parse::<CivConfig>().map(|c| c.name), Ok("Holy Roman Empire"));
        assert!(matches!(
            "aztecs".parse::<CivConfig>(),
            Err(DomainError::Parse(_))
        ));
    }

    #[test]
    fn abbr_serializes_transparently() {
        let abbr = CivAbbr::new("ru");
        assert_eq!(serde_json::to_string(&abbr).expect("serialize"), "\"ru\"");
    }
}
