//! File-backed cache slot.
//!
//! # Invariants
//! - One JSON document per path; the file's mtime is the write timestamp.
//! - A missing file means cold start, never an error.

use super::{deadline_passed, ttl_from_hours, CacheResult, ExpiringStore};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Snapshot slot stored as a single JSON file.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
    ttl: Duration,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
        }
    }

    pub fn with_ttl_hours(path: impl Into<PathBuf>, hours: u64) -> Self {
        Self::new(path, ttl_from_hours(hours))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the file's modification time, or `None` on cold start.
    pub fn last_write(&self) -> CacheResult<Option<SystemTime>> {
        match std::fs::metadata(&self.path) {
            Ok(metadata) => Ok(Some(metadata.modified()?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Expiry check against an explicit instant.
    pub fn expired_at(&self, now: SystemTime) -> CacheResult<bool> {
        Ok(match self.last_write()? {
            Some(written) => deadline_passed(written, self.ttl, now),
            None => true,
        })
    }
}

impl ExpiringStore for FileCache {
    fn read<T>(&self) -> CacheResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(
                    "event=cache_read module=cache status=cold_start backend=file path={}",
                    self.path.display()
                );
                return Ok(T::default());
            }
            Err(err) => return Err(err.into()),
        };

        Ok(serde_json::from_slice(&content)?)
    }

    fn write<T>(&self, value: &T) -> CacheResult<()>
    where
        T: Serialize + ?Sized,
    {
        let encoded = serde_json::to_vec(value)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, &encoded)?;

        debug!(
            "event=cache_write module=cache status=ok backend=file bytes={} path={}",
            encoded.len(),
            self.path.display()
        );
        Ok(())
    }

    fn expired(&self) -> CacheResult<bool> {
        self.expired_at(SystemTime::now())
    }
}
