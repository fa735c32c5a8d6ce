//! The patch catalog: every release, embedded at build time.
//!
//! Base patches and their server-side follow-ups are independently authored
//! records concatenated in a fixed order; they are never merged. The catalog
//! is parsed once at startup and immutable afterwards.

use anyhow::Context;

use codex_domain::PatchNotes;

/// Embedded release documents, in catalog order.
const CATALOG_SOURCES: &[(&str, &str)] = &[
    ("season-one", include_str!("../data/patches/season-one.json")),
    (
        "season-one-server-side",
        include_str!("../data/patches/season-one-server-side.json"),
    ),
    ("patch-14681", include_str!("../data/patches/patch-14681.json")),
    (
        "patch-14681-server-side",
        include_str!("../data/patches/patch-14681-server-side.json"),
    ),
    ("patch-15965", include_str!("../data/patches/patch-15965.json")),
    ("season-two", include_str!("../data/patches/season-two.json")),
];

/// Ordered, static-at-runtime list of patch records.
pub struct PatchCatalog {
    patches: Vec<PatchNotes>,
}

impl PatchCatalog {
    /// Parse the embedded dataset. Fails fast at startup if any release
    /// document is malformed.
    pub fn load() -> anyhow::Result<Self> {
        let mut patches = Vec::with_capacity(CATALOG_SOURCES.len());
        for (name, source) in CATALOG_SOURCES {
            let patch: PatchNotes = serde_json::from_str(source)
                .with_context(|| format!("invalid patch document: {name}"))?;
            patches.push(patch);
        }
        tracing::debug!(count = patches.len(), "loaded patch catalog");
        Ok(Self { patches })
    }

    /// All patches in catalog order.
    pub fn patches(&self) -> &[PatchNotes] {
        &self.patches
    }

    /// Look up a single patch by its id.
    pub fn by_id(&self, id: &str) -> Option<&PatchNotes> {
        self.patches.iter().find(|patch| patch.id == id)
    }
}
