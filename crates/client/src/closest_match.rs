//! Best-effort recovery for item ids that no longer resolve.
//!
//! Item slugs change across patches (renames, merged variations). When a
//! direct lookup misses, this resolver searches the surviving items of the
//! same kind for the most plausible match so the caller can redirect. A miss
//! here is an ordinary `None`; only repository fetch failures are errors.

use std::collections::BTreeSet;
use std::sync::Arc;

use codex_domain::{CivAbbr, ItemId, ItemKind, UnifiedItem};

use crate::fetcher::FetchError;
use crate::repository::ItemRepository;

/// Minimum similarity for a candidate to count as a match.
const MATCH_THRESHOLD: f64 = 0.5;

/// Similarity between two item ids: Jaccard overlap of their slug tokens.
///
/// Ids are tokenized on `-`; pure-digit tokens are dropped because they are
/// variation suffixes, not identity.
pub fn slug_similarity(a: &str, b: &str) -> f64 {
    let ta = slug_tokens(a);
    let tb = slug_tokens(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let shared = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    shared as f64 / union as f64
}

fn slug_tokens(id: &str) -> BTreeSet<&str> {
    id.split('-')
        .filter(|t| !t.is_empty() && !t.bytes().all(|b| b.is_ascii_digit()))
        .collect()
}

/// Heuristic resolver over the item repository.
pub struct ClosestMatchResolver {
    repository: Arc<ItemRepository>,
    scorer: fn(&str, &str) -> f64,
}

impl ClosestMatchResolver {
    pub fn new(repository: Arc<ItemRepository>) -> Self {
        Self {
            repository,
            scorer: slug_similarity,
        }
    }

    /// Swap in a different similarity criterion.
    pub fn with_scorer(repository: Arc<ItemRepository>, scorer: fn(&str, &str) -> f64) -> Self {
        Self { repository, scorer }
    }

    /// The most plausible surviving item for a requested id that failed
    /// direct lookup, or `None` when nothing scores above the threshold.
    ///
    /// When a civilization is given, only items available to it are
    /// considered. Ties are broken by dataset order (first wins).
    pub async fn find(
        &self,
        kind: ItemKind,
        requested: &ItemId,
        civ: Option<&CivAbbr>,
    ) -> Result<Option<Arc<UnifiedItem>>, FetchError> {
        let candidates = self.repository.get_filtered(kind, civ).await?;

        let mut best: Option<(f64, Arc<UnifiedItem>)> = None;
        for candidate in candidates {
            let score = (self.scorer)(requested.base(), candidate.id.base());
            if score < MATCH_THRESHOLD {
                continue;
            }
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, candidate));
            }
        }

        if let Some((score, ref item)) = best {
            tracing::debug!(requested = %requested, matched = %item.id, score, "closest match found");
        }
        Ok(best.map(|(_, item)| item))
    }
}
