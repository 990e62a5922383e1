//! TTL-gated persisted snapshot slots.
//!
//! # Responsibility
//! - Define the three-operation `ExpiringStore` contract.
//! - Provide file, in-memory and SQLite backends.
//!
//! # Invariants
//! - A slot that was never written reads as `T::default()` and is expired.
//! - Expiry holds exactly when `now >= last_write + ttl`.
//! - Failures other than absence are surfaced unchanged; nothing is retried.
//! - No locking: concurrent writers race and the last one wins.

use crate::db::DbError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, SystemTime};

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileCache;
pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache backend failure. Absence of a snapshot is never reported here.
#[derive(Debug)]
pub enum CacheError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Db(DbError),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cache i/o failed: {err}"),
            Self::Serialization(err) => write!(f, "cache content invalid: {err}"),
            Self::Db(err) => write!(f, "cache database failed: {err}"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CacheError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<DbError> for CacheError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persisted last-known-good slot with a fixed time-to-live.
pub trait ExpiringStore {
    /// Loads the snapshot, or `T::default()` on cold start.
    fn read<T>(&self) -> CacheResult<T>
    where
        T: DeserializeOwned + Default;

    /// Persists `value`, creating any storage structure it needs.
    ///
    /// A failed write leaves the cache in an unspecified state; callers treat
    /// it as unchanged.
    fn write<T>(&self, value: &T) -> CacheResult<()>
    where
        T: Serialize + ?Sized;

    /// Returns whether a refetch is due.
    fn expired(&self) -> CacheResult<bool>;
}

/// Converts whole hours into a TTL.
pub fn ttl_from_hours(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(60 * 60))
}

/// Shared expiry rule for every backend.
///
/// A deadline that overflows `SystemTime` never passes.
pub(crate) fn deadline_passed(last_write: SystemTime, ttl: Duration, now: SystemTime) -> bool {
    match last_write.checked_add(ttl) {
        Some(deadline) => now >= deadline,
        None => false,
    }
}
