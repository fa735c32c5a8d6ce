//! Client configuration.
//!
//! Follows the environment-variable-with-default pattern used across the
//! workspace binaries; the mute list is a compiled-in constant because it is
//! part of the deployed dataset contract, not per-user configuration.

/// Default root of the static dataset.
pub const DEFAULT_DATA_ROOT: &str = "https://data.aoe4world.com";

/// Item ids excluded from every repository result. These exist in the raw
/// bulk documents but are dataset artifacts (internal duplicates and
/// campaign-only entries), not browsable items.
pub const MUTED_ITEMS: &[&str] = &[
    "khaganate-elite-knight",
    "khaganate-elite-warrior",
    "trade-caravan",
];

/// Runtime configuration for the client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Dataset root URL, without a trailing slash.
    pub data_root: String,
}

impl AppConfig {
    pub fn new(data_root: &str) -> Self {
        Self {
            data_root: data_root.trim_end_matches('/').to_string(),
        }
    }

    /// Read configuration from the environment, falling back to defaults.
    ///
    /// Uses `CODEX_DATA_ROOT` when set.
    pub fn from_env() -> Self {
        let data_root =
            std::env::var("CODEX_DATA_ROOT").unwrap_or_else(|_| DEFAULT_DATA_ROOT.to_string());
        Self::new(&data_root)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = AppConfig::new("https://example.test/data/");
        assert_eq!(config.data_root, "https://example.test/data");
    }

    #[test]
    fn default_points_at_public_dataset() {
        assert_eq!(AppConfig::default().data_root, DEFAULT_DATA_ROOT);
    }
}
