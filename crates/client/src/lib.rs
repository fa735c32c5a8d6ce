//! Codex Client - async access to the static game dataset.
//!
//! Provides the cached, deduplicating fetch layer, the per-kind item
//! repository, the embedded patch catalog, and the closest-match resolver,
//! composed by [`App`].

pub mod app;
pub mod catalog;
pub mod closest_match;
pub mod config;
pub mod fetcher;
pub mod repository;

pub use app::{App, ItemLookup};
pub use catalog::PatchCatalog;
pub use closest_match::ClosestMatchResolver;
pub use config::AppConfig;
pub use fetcher::{FetchError, Fetcher, HttpTransport, Transport, TransportResponse};
pub use repository::ItemRepository;
