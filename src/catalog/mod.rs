//! Catalog sources and the time-bounded catalog cache.
//!
//! A [`CatalogSource`] delivers raw records (remote service, local JSON file
//! or an in-memory list). The [`CatalogCache`] owns a primary source and an
//! optional local fallback, normalizes whatever they return into
//! [`crate::models::CatalogEntry`] values and hands out immutable snapshots.

pub mod cache;
pub mod local;
pub mod remote;
pub mod source;

pub use cache::{CacheState, CatalogCache, CatalogOrigin, CatalogSnapshot, Clock, SystemClock};
pub use local::{LocalFileSource, StaticSource};
pub use remote::RemoteSource;
pub use source::{normalize_records, parse_payload, CatalogSource, SourceError};
