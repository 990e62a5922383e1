//! SQLite-backed cache slots.
//!
//! # Responsibility
//! - Store one snapshot per `location` row in `cache_slots`.
//! - Record the write time explicitly, since rows have no mtime.
//!
//! # Invariants
//! - The connection must come from `db::open_db*` so the schema exists.
//! - Distinct locations on one connection never affect each other.

use super::{deadline_passed, CacheResult, ExpiringStore};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Snapshot slot stored as a row of the `cache_slots` table.
pub struct SqliteCache<'conn> {
    conn: &'conn Connection,
    location: String,
    ttl: Duration,
}

impl<'conn> SqliteCache<'conn> {
    pub fn new(conn: &'conn Connection, location: impl Into<String>, ttl: Duration) -> Self {
        Self {
            conn,
            location: location.into(),
            ttl,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the recorded write time, or `None` on cold start.
    pub fn last_write(&self) -> CacheResult<Option<SystemTime>> {
        let written_at_ms: Option<i64> = self
            .conn
            .query_row(
                "SELECT written_at_ms FROM cache_slots WHERE location = ?1;",
                [self.location.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(written_at_ms.map(|ms| UNIX_EPOCH + Duration::from_millis(ms.max(0) as u64)))
    }

    pub fn expired_at(&self, now: SystemTime) -> CacheResult<bool> {
        Ok(match self.last_write()? {
            Some(written) => deadline_passed(written, self.ttl, now),
            None => true,
        })
    }
}

impl ExpiringStore for SqliteCache<'_> {
    fn read<T>(&self) -> CacheResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM cache_slots WHERE location = ?1;",
                [self.location.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => {
                debug!(
                    "event=cache_read module=cache status=cold_start backend=sqlite location={}",
                    self.location
                );
                Ok(T::default())
            }
        }
    }

    fn write<T>(&self, value: &T) -> CacheResult<()>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO cache_slots (location, payload, written_at_ms)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(location) DO UPDATE SET
                payload = excluded.payload,
                written_at_ms = excluded.written_at_ms;",
            params![self.location, payload, now_epoch_ms()],
        )?;

        debug!(
            "event=cache_write module=cache status=ok backend=sqlite bytes={} location={}",
            payload.len(),
            self.location
        );
        Ok(())
    }

    fn expired(&self) -> CacheResult<bool> {
        self.expired_at(SystemTime::now())
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}
