//! Notification use-case service.
//!
//! # Responsibility
//! - Orchestrate cache read, expiry check, remote fetch, sync and persist.
//! - Apply user lifecycle actions (hide, done, restore) and persist them.
//!
//! # Invariants
//! - No process-wide state: cache and fetcher are owned by the instance.
//! - A failed fetch never reaches sync; the stale snapshot is kept as-is.
//! - A failed cache write is surfaced and the previous snapshot stays the
//!   last-known-good one.

use crate::cache::{CacheError, ExpiringStore};
use crate::model::collection::Notifications;
use crate::model::notification::Lifecycle;
use crate::sync::fetcher::{FetchError, NotificationFetcher};
use crate::sync::reconcile::{reconcile, SyncOutcome, SyncSummary};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from notification service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Cache backend failure (never cold start).
    Cache(CacheError),
    /// Remote fetch failure on an explicit refresh.
    Fetch(FetchError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache(err) => write!(f, "{err}"),
            Self::Fetch(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cache(err) => Some(err),
            Self::Fetch(err) => Some(err),
        }
    }
}

impl From<CacheError> for ServiceError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}

impl From<FetchError> for ServiceError {
    fn from(value: FetchError) -> Self {
        Self::Fetch(value)
    }
}

/// How the snapshot returned by [`NotificationService::load`] was obtained.
#[derive(Debug)]
pub enum RefreshStatus {
    /// Cache was still fresh; no fetch happened.
    Fresh,
    /// Remote was fetched, merged and persisted.
    Refreshed(SyncSummary),
    /// Fetch failed; the cached snapshot is returned unchanged.
    Stale(FetchError),
}

/// Snapshot plus how it was obtained.
#[derive(Debug)]
pub struct LoadOutcome {
    pub notifications: Notifications,
    pub status: RefreshStatus,
}

/// Use-case service over one cache slot and one remote.
pub struct NotificationService<C: ExpiringStore, F: NotificationFetcher> {
    cache: C,
    fetcher: F,
}

impl<C: ExpiringStore, F: NotificationFetcher> NotificationService<C, F> {
    pub fn new(cache: C, fetcher: F) -> Self {
        Self { cache, fetcher }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the current snapshot, refreshing it when expired or forced.
    ///
    /// # Contract
    /// - Fresh cache and `force == false`: no fetch, cached snapshot returned.
    /// - Otherwise: fetch, sync, persist. A fetch failure degrades to the
    ///   cached snapshot with `RefreshStatus::Stale`.
    ///
    /// # Errors
    /// - Cache read, expiry or write failures.
    pub fn load(&self, force: bool) -> ServiceResult<LoadOutcome> {
        if !force && !self.cache.expired()? {
            let notifications: Notifications = self.cache.read()?;
            info!(
                "event=notifications_load module=service status=ok source=cache count={}",
                notifications.len()
            );
            return Ok(LoadOutcome {
                notifications,
                status: RefreshStatus::Fresh,
            });
        }

        match self.refresh() {
            Ok(outcome) => Ok(LoadOutcome {
                notifications: outcome.notifications,
                status: RefreshStatus::Refreshed(outcome.summary),
            }),
            Err(ServiceError::Fetch(err)) => {
                warn!(
                    "event=notifications_load module=service status=degraded source=cache error={}",
                    err
                );
                Ok(LoadOutcome {
                    notifications: self.cache.read()?,
                    status: RefreshStatus::Stale(err),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Fetches the remote snapshot, merges it into the cache and persists.
    ///
    /// # Errors
    /// - `ServiceError::Fetch` when the remote cannot be read; cache untouched.
    /// - `ServiceError::Cache` on cache read or write failure.
    pub fn refresh(&self) -> ServiceResult<SyncOutcome> {
        let started_at = Instant::now();
        let local: Notifications = self.cache.read()?;
        let remote = self.fetcher.fetch()?;
        let remote_count = remote.len();

        let outcome = reconcile(local, remote);
        self.cache.write(&outcome.notifications)?;

        let summary = outcome.summary;
        info!(
            "event=notifications_sync module=service status=ok remote={} updated={} retained={} missing_kept={} dropped={} inserted={} duration_ms={}",
            remote_count,
            summary.updated,
            summary.retained,
            summary.missing_kept,
            summary.dropped,
            summary.inserted,
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }

    /// Hides notifications from view and from remote updates.
    pub fn hide<I, S>(&self, ids: I) -> ServiceResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_lifecycle(ids, Lifecycle::Hidden)
    }

    /// Marks notifications done; they leave the snapshot once the remote
    /// stops reporting them.
    pub fn mark_done<I, S>(&self, ids: I) -> ServiceResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_lifecycle(ids, Lifecycle::PendingDelete)
    }

    /// Clears hide/done state.
    pub fn restore<I, S>(&self, ids: I) -> ServiceResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_lifecycle(ids, Lifecycle::Active)
    }

    /// Sets lifecycle on the cached snapshot and persists when anything changed.
    ///
    /// Unknown ids are ignored. Returns how many notifications changed.
    pub fn set_lifecycle<I, S>(&self, ids: I, lifecycle: Lifecycle) -> ServiceResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut notifications: Notifications = self.cache.read()?;
        let changed = notifications.set_lifecycle(ids, lifecycle);
        if changed > 0 {
            self.cache.write(&notifications)?;
        }

        info!(
            "event=lifecycle_update module=service status=ok lifecycle={:?} changed={}",
            lifecycle, changed
        );
        Ok(changed)
    }
}
