//! In-memory item stores, populated lazily from the dataset.
//!
//! One store per item kind, loaded at most once per process. The load guard
//! is "store empty, so load"; it is race-free because the fetcher underneath
//! already coalesces concurrent requests for the bulk document into a single
//! shared call, and population re-checks emptiness before writing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;

use codex_domain::{CivAbbr, ItemId, ItemKind, UnifiedItem};

use crate::config::{AppConfig, MUTED_ITEMS};
use crate::fetcher::{FetchError, Fetcher};

/// Bulk document shape: `GET {root}/{kind}/all-unified.json`.
#[derive(Debug, Deserialize)]
struct BulkDocument {
    data: Vec<UnifiedItem>,
}

/// Load-order-preserving store for one item kind.
#[derive(Default)]
struct ItemStore {
    items: Vec<Arc<UnifiedItem>>,
    by_id: HashMap<ItemId, usize>,
}

impl ItemStore {
    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn insert(&mut self, item: Arc<UnifiedItem>) {
        self.by_id.insert(item.id.clone(), self.items.len());
        self.items.push(item);
    }

    fn get(&self, id: &ItemId) -> Option<Arc<UnifiedItem>> {
        self.by_id.get(id).map(|&i| Arc::clone(&self.items[i]))
    }
}

/// Typed, per-kind item repository over the [`Fetcher`].
pub struct ItemRepository {
    fetcher: Arc<Fetcher>,
    data_root: String,
    muted: HashSet<ItemId>,
    stores: [RwLock<ItemStore>; 4],
}

impl ItemRepository {
    pub fn new(fetcher: Arc<Fetcher>, config: &AppConfig) -> Self {
        Self {
            fetcher,
            data_root: config.data_root.clone(),
            muted: MUTED_ITEMS.iter().map(|id| ItemId::new(*id)).collect(),
            stores: Default::default(),
        }
    }

    /// All items of a kind, in dataset order.
    pub async fn get_all(&self, kind: ItemKind) -> Result<Vec<Arc<UnifiedItem>>, FetchError> {
        self.ensure_loaded(kind).await?;
        Ok(self.store(kind).read().await.items.clone())
    }

    /// One item by id; `None` when absent (callers decide whether that is a
    /// not-found condition).
    pub async fn get(&self, kind: ItemKind, id: &ItemId) -> Result<Option<Arc<UnifiedItem>>, FetchError> {
        self.ensure_loaded(kind).await?;
        Ok(self.store(kind).read().await.get(id))
    }

    /// Items of a kind available to a civilization; all items when `None`.
    pub async fn get_filtered(
        &self,
        kind: ItemKind,
        civ: Option<&CivAbbr>,
    ) -> Result<Vec<Arc<UnifiedItem>>, FetchError> {
        let items = self.get_all(kind).await?;
        Ok(match civ {
            Some(civ) => items
                .into_iter()
                .filter(|item| item.civs.contains(civ))
                .collect(),
            None => items,
        })
    }

    /// Fetch the standalone single-item document, bypassing the bulk store.
    ///
    /// `GET {root}/{kind}/unified/{id}.json`, cached by URL. Muted ids are
    /// masked to `None` without a network call; a missing document surfaces
    /// as [`FetchError::Http`] for the caller to interpret.
    pub async fn fetch_item(
        &self,
        kind: ItemKind,
        id: &ItemId,
    ) -> Result<Option<UnifiedItem>, FetchError> {
        if self.muted.contains(id) {
            return Ok(None);
        }
        let url = format!("{}/{}/unified/{}.json", self.data_root, kind.as_slug(), id);
        let value = self.fetcher.fetch_json(&url, true).await?;
        let item = UnifiedItem::deserialize(&*value).map_err(|e| FetchError::Parse {
            url,
            message: e.to_string(),
        })?;
        Ok(Some(item))
    }

    fn store(&self, kind: ItemKind) -> &RwLock<ItemStore> {
        &self.stores[kind as usize]
    }

    /// Populate the store for `kind` if it hasn't been populated yet.
    async fn ensure_loaded(&self, kind: ItemKind) -> Result<(), FetchError> {
        if !self.store(kind).read().await.is_empty() {
            return Ok(());
        }

        let url = format!("{}/{}/all-unified.json", self.data_root, kind.as_slug());
        let value = self.fetcher.fetch_json(&url, true).await?;
        let document = BulkDocument::deserialize(&*value).map_err(|e| FetchError::Parse {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let mut store = self.store(kind).write().await;
        // A concurrent first-accessor may have populated it while we awaited.
        if store.is_empty() {
            let mut muted = 0usize;
            for item in document.data {
                if self.muted.contains(&item.id) {
                    muted += 1;
                    continue;
                }
                store.insert(Arc::new(item));
            }
            tracing::debug!(kind = %kind, count = store.items.len(), muted, "loaded item store");
        }
        Ok(())
    }
}
