//! Application composition.
//!
//! Wires the fetcher, item repository, patch catalog, and closest-match
//! resolver together and exposes the query surface the presentation layer
//! consumes.

use std::sync::Arc;

use codex_domain::{patch_history, CivAbbr, ItemId, ItemKind, PatchHistoryEntry, UnifiedItem};

use crate::catalog::PatchCatalog;
use crate::closest_match::ClosestMatchResolver;
use crate::config::AppConfig;
use crate::fetcher::{FetchError, Fetcher, HttpTransport, Transport};
use crate::repository::ItemRepository;

/// Result of an item lookup that may have been recovered by the
/// closest-match resolver. A `Redirect` tells the caller to navigate to the
/// matched item's location instead of rendering in place.
#[derive(Debug, Clone)]
pub enum ItemLookup {
    Direct(Arc<UnifiedItem>),
    Redirect(Arc<UnifiedItem>),
}

impl ItemLookup {
    pub fn item(&self) -> &Arc<UnifiedItem> {
        match self {
            ItemLookup::Direct(item) | ItemLookup::Redirect(item) => item,
        }
    }
}

/// Process-scoped application state.
///
/// All shared caches live behind this struct; hand it around by `Arc`.
pub struct App {
    pub fetcher: Arc<Fetcher>,
    pub items: Arc<ItemRepository>,
    pub catalog: PatchCatalog,
    pub closest_match: ClosestMatchResolver,
}

impl App {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Build the app over a custom transport (tests, recorded fixtures).
    pub fn with_transport(config: AppConfig, transport: Arc<dyn Transport>) -> anyhow::Result<Self> {
        let fetcher = Fetcher::new(transport);
        let items = Arc::new(ItemRepository::new(Arc::clone(&fetcher), &config));
        let catalog = PatchCatalog::load()?;
        let closest_match = ClosestMatchResolver::new(Arc::clone(&items));
        Ok(Self {
            fetcher,
            items,
            catalog,
            closest_match,
        })
    }

    /// Direct lookup, falling back to the closest-match resolver.
    ///
    /// `None` means neither a direct hit nor a plausible match exists; the
    /// caller renders its not-found state.
    pub async fn item_or_closest(
        &self,
        kind: ItemKind,
        id: &ItemId,
        civ: Option<&CivAbbr>,
    ) -> Result<Option<ItemLookup>, FetchError> {
        if let Some(item) = self.items.get(kind, id).await? {
            return Ok(Some(ItemLookup::Direct(item)));
        }
        // Items can exist as standalone documents before the bulk listing
        // picks them up; a missing document (404) is an ordinary miss.
        match self.items.fetch_item(kind, id).await {
            Ok(Some(item)) => return Ok(Some(ItemLookup::Direct(Arc::new(item)))),
            Ok(None) => {}
            Err(FetchError::Http { status: 404, .. }) => {}
            Err(err) => return Err(err),
        }
        tracing::warn!(kind = %kind, id = %id, "direct lookup missed, trying closest match");
        let matched = self.closest_match.find(kind, id, civ).await?;
        Ok(matched.map(ItemLookup::Redirect))
    }

    /// All historical changes applying to `item`, most recent patch first.
    pub fn patch_history<'a>(
        &'a self,
        item: &UnifiedItem,
        civs: &[CivAbbr],
    ) -> Vec<PatchHistoryEntry<'a>> {
        patch_history(self.catalog.patches(), item, civs)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use codex_domain::ChangeKind;

    use super::*;
    use crate::fetcher::TransportResponse;

    /// Serves the bulk listing plus any standalone documents registered by
    /// URL; everything else is a 404.
    struct StaticTransport {
        bulk: String,
        singles: std::collections::HashMap<String, String>,
    }

    #[async_trait]
    impl Transport for StaticTransport {
        async fn get(&self, url: &str) -> Result<TransportResponse, FetchError> {
            let ok = |body: String| TransportResponse {
                status: 200,
                status_text: "OK".to_string(),
                body,
            };
            if let Some(body) = self.singles.get(url) {
                return Ok(ok(body.clone()));
            }
            if url.ends_with("/all-unified.json") {
                return Ok(ok(self.bulk.clone()));
            }
            Ok(TransportResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: String::new(),
            })
        }
    }

    fn app_with_singles(singles: std::collections::HashMap<String, String>) -> App {
        let document = serde_json::json!({
            "data": [
                { "id": "longbowman", "type": "unit", "name": "Longbowman", "civs": ["en"] },
                { "id": "horseman", "type": "unit", "name": "Horseman", "civs": ["en", "fr", "hr", "mo", "ru"] }
            ]
        });
        let transport = Arc::new(StaticTransport {
            bulk: document.to_string(),
            singles,
        });
        App::with_transport(AppConfig::new("https://data.example.test"), transport)
            .expect("embedded catalog should load")
    }

    fn app() -> App {
        app_with_singles(std::collections::HashMap::new())
    }

    #[tokio::test]
    async fn direct_hit_is_not_a_redirect() {
        let app = app();
        let lookup = app
            .item_or_closest(ItemKind::Units, &ItemId::new("longbowman"), None)
            .await
            .expect("fetch ok")
            .expect("item exists");
        assert!(matches!(lookup, ItemLookup::Direct(_)));
        assert_eq!(lookup.item().name, "Longbowman");
    }

    #[tokio::test]
    async fn missed_lookup_recovers_via_closest_match() {
        let app = app();
        let lookup = app
            .item_or_closest(ItemKind::Units, &ItemId::new("longbowman-4"), None)
            .await
            .expect("fetch ok")
            .expect("match exists");
        assert!(matches!(lookup, ItemLookup::Redirect(_)));
        assert_eq!(lookup.item().id.as_str(), "longbowman");
    }

    #[tokio::test]
    async fn standalone_document_backfills_the_bulk_listing() {
        let document = serde_json::json!({
            "id": "desert-raider",
            "type": "unit",
            "name": "Desert Raider",
            "civs": ["ab"]
        });
        let singles = std::collections::HashMap::from([(
            "https://data.example.test/units/unified/desert-raider.json".to_string(),
            document.to_string(),
        )]);
        let app = app_with_singles(singles);

        let lookup = app
            .item_or_closest(ItemKind::Units, &ItemId::new("desert-raider"), None)
            .await
            .expect("fetch ok")
            .expect("standalone document exists");
        assert!(matches!(lookup, ItemLookup::Direct(_)));
        assert_eq!(lookup.item().name, "Desert Raider");
    }

    #[tokio::test]
    async fn hopeless_lookup_is_none() {
        let app = app();
        let lookup = app
            .item_or_closest(ItemKind::Units, &ItemId::new("war-elephant"), None)
            .await
            .expect("fetch ok");
        assert!(lookup.is_none());
    }

    #[tokio::test]
    async fn patch_history_runs_against_the_embedded_catalog() {
        let app = app();
        let item = app
            .items
            .get(ItemKind::Units, &ItemId::new("horseman"))
            .await
            .expect("fetch ok")
            .expect("item exists");

        let history = app.patch_history(&item, &[]);
        // Horseman is touched by Season One, patch 14681, and Season Two.
        assert_eq!(history.len(), 3);
        let ids: Vec<&str> = history.iter().map(|e| e.patch.id.as_str()).collect();
        assert_eq!(ids, vec!["season-two", "14681", "season-one"]);
        // Within Season One its lines are all buffs.
        assert!(history[2].diff.iter().all(|l| l.kind == ChangeKind::Buff));
    }

    #[tokio::test]
    async fn patch_history_respects_civ_filter_end_to_end() {
        let app = app();
        let item = app
            .items
            .get(ItemKind::Units, &ItemId::new("longbowman"))
            .await
            .expect("fetch ok")
            .expect("item exists");

        let unfiltered = app.patch_history(&item, &[]);
        assert_eq!(unfiltered.len(), 3);

        // The French never get longbowman changes: the English-scoped
        // sections and changes are gated out.
        let french = app.patch_history(&item, &[CivAbbr::new("fr")]);
        assert!(french.is_empty());
    }
}
