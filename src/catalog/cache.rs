//! Time-bounded catalog cache with single-flight refresh and local fallback.
//!
//! The cache moves through `Empty -> Fresh -> Stale -> Fresh -> ...`. A read of
//! a fresh snapshot does no I/O. A read of an empty or stale cache refreshes
//! synchronously; concurrent readers queue behind the refresh in flight and
//! reuse its snapshot instead of fetching again. Expiry is checked at read
//! time against an injectable [`Clock`], never by a background timer.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::catalog::source::{normalize_records, CatalogSource, SourceError};
use crate::models::CatalogEntry;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Where the entries of a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOrigin {
    /// The remote service, as configured
    Remote,
    /// The local catalog, as configured
    Local,
    /// The local catalog, used because the remote service failed
    LocalFallback,
}

impl CatalogOrigin {
    /// Tag reported to callers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
            Self::LocalFallback => "local_fallback",
        }
    }
}

impl fmt::Display for CatalogOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheState {
    /// Nothing loaded yet, or the last refresh produced no entries
    Empty,
    /// A snapshot is loaded and within its TTL
    Fresh,
    /// A snapshot is loaded but expired
    Stale,
}

/// An immutable view of the catalog produced by one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    /// Normalized entries in source order
    pub entries: Vec<CatalogEntry>,
    /// Source that produced the entries
    pub origin: CatalogOrigin,
    /// Non-fatal problem encountered while refreshing
    pub warning: Option<String>,
    /// When the refresh happened
    pub fetched_at: DateTime<Utc>,
    /// When the snapshot goes stale
    pub expires_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the snapshot holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A snapshot is fresh while unexpired and non-empty.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        !self.entries.is_empty() && now < self.expires_at
    }
}

/// Process-wide catalog cache.
///
/// Shared by reference (or `Arc`) between all queries. Snapshots are replaced
/// wholesale on refresh and never mutated.
pub struct CatalogCache {
    primary: Box<dyn CatalogSource>,
    primary_origin: CatalogOrigin,
    fallback: Option<Box<dyn CatalogSource>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    snapshot: RwLock<Option<Arc<CatalogSnapshot>>>,
    refresh_lock: Mutex<()>,
    generation: AtomicU64,
}

impl CatalogCache {
    /// Remote primary with a local fallback.
    pub fn with_remote(
        remote: impl CatalogSource + 'static,
        fallback: impl CatalogSource + 'static,
        ttl: Duration,
    ) -> Self {
        Self::new(
            Box::new(remote),
            CatalogOrigin::Remote,
            Some(Box::new(fallback)),
            ttl,
        )
    }

    /// Local source only; failures are not retried elsewhere.
    pub fn with_local(local: impl CatalogSource + 'static, ttl: Duration) -> Self {
        Self::new(Box::new(local), CatalogOrigin::Local, None, ttl)
    }

    fn new(
        primary: Box<dyn CatalogSource>,
        primary_origin: CatalogOrigin,
        fallback: Option<Box<dyn CatalogSource>>,
        ttl: Duration,
    ) -> Self {
        let ttl = TimeDelta::from_std(ttl.max(Duration::from_secs(1))).unwrap_or(TimeDelta::MAX);
        Self {
            primary,
            primary_origin,
            fallback,
            ttl,
            clock: Arc::new(SystemClock),
            snapshot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Replaces the clock used for expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Origin the cache reports when the primary source succeeds.
    pub fn primary_origin(&self) -> CatalogOrigin {
        self.primary_origin
    }

    /// Time-to-live of a snapshot.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns the current catalog, refreshing it first if needed.
    ///
    /// Never fails: when every source fails the snapshot is empty and carries
    /// a warning.
    pub fn get(&self) -> Arc<CatalogSnapshot> {
        if let Some(snapshot) = self.fresh_snapshot() {
            debug!(entries = snapshot.len(), origin = %snapshot.origin, "Catalog cache hit");
            return snapshot;
        }

        let seen = self.generation.load(Ordering::Acquire);
        let _guard = self
            .refresh_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // A refresh finished while we were waiting; reuse its outcome.
        if self.generation.load(Ordering::Acquire) != seen {
            if let Some(snapshot) = self.current() {
                debug!("Reusing catalog refreshed by a concurrent reader");
                return snapshot;
            }
        }
        if let Some(snapshot) = self.fresh_snapshot() {
            return snapshot;
        }

        let snapshot = Arc::new(self.refresh());
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        self.generation.fetch_add(1, Ordering::Release);
        snapshot
    }

    /// Current lifecycle state, without triggering a refresh.
    pub fn state(&self) -> CacheState {
        match self.current() {
            Some(snapshot) if snapshot.is_fresh_at(self.clock.now()) => CacheState::Fresh,
            Some(snapshot) if !snapshot.is_empty() => CacheState::Stale,
            _ => CacheState::Empty,
        }
    }

    /// Last snapshot, fresh or not, without triggering a refresh.
    pub fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drops the current snapshot so the next read refreshes.
    pub fn invalidate(&self) {
        let _guard = self
            .refresh_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        debug!("Catalog cache invalidated");
    }

    fn fresh_snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        let now = self.clock.now();
        self.current().filter(|snapshot| snapshot.is_fresh_at(now))
    }

    fn refresh(&self) -> CatalogSnapshot {
        let primary_name = self.primary.name();

        let primary_error = match load(self.primary.as_ref()) {
            Ok(entries) => {
                info!(
                    entries = entries.len(),
                    origin = %self.primary_origin,
                    "Catalog refreshed"
                );
                return self.snapshot(entries, self.primary_origin, None);
            }
            Err(e) => e,
        };

        let Some(fallback) = &self.fallback else {
            error!("Catalog source '{}' failed: {}", primary_name, primary_error);
            return self.snapshot(
                Vec::new(),
                self.primary_origin,
                Some(format!("Catalog unavailable: {primary_error}")),
            );
        };

        warn!(
            "Catalog source '{}' failed, falling back to '{}': {}",
            primary_name,
            fallback.name(),
            primary_error
        );

        match load(fallback.as_ref()) {
            Ok(entries) => {
                info!(
                    entries = entries.len(),
                    origin = %CatalogOrigin::LocalFallback,
                    "Catalog refreshed from fallback"
                );
                self.snapshot(
                    entries,
                    CatalogOrigin::LocalFallback,
                    Some(format!(
                        "Remote catalog unavailable, using local fallback: {primary_error}"
                    )),
                )
            }
            Err(fallback_error) => {
                error!(
                    "Catalog sources '{}' and '{}' both failed: {}; {}",
                    primary_name,
                    fallback.name(),
                    primary_error,
                    fallback_error
                );
                self.snapshot(
                    Vec::new(),
                    CatalogOrigin::LocalFallback,
                    Some(format!(
                        "Catalog unavailable: {primary_error}; local fallback failed: {fallback_error}"
                    )),
                )
            }
        }
    }

    fn snapshot(
        &self,
        entries: Vec<CatalogEntry>,
        origin: CatalogOrigin,
        warning: Option<String>,
    ) -> CatalogSnapshot {
        let fetched_at = self.clock.now();
        let expires_at = fetched_at
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        CatalogSnapshot {
            entries,
            origin,
            warning,
            fetched_at,
            expires_at,
        }
    }
}

impl fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogCache")
            .field("primary", &self.primary.name())
            .field("primary_origin", &self.primary_origin)
            .field("fallback", &self.fallback.as_ref().map(|s| s.name()))
            .field("ttl", &self.ttl)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn load(source: &dyn CatalogSource) -> Result<Vec<CatalogEntry>, SourceError> {
    let records = source.fetch()?;
    Ok(normalize_records(&records, source.name()))
}
