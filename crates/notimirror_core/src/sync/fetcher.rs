//! Remote fetcher seam.
//!
//! # Responsibility
//! - Define the contract the service uses to obtain a fresh remote snapshot.
//! - Ship a file-backed fetcher reading a snapshot produced out of process.
//!
//! # Invariants
//! - Fetchers return notifications with `Lifecycle::Active`.
//! - Retry, pagination and auth belong to implementations, not to callers.

use crate::model::collection::Notifications;
use crate::model::notification::Lifecycle;
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Failure to obtain a remote snapshot.
#[derive(Debug)]
pub enum FetchError {
    Io(std::io::Error),
    Decode(serde_json::Error),
    /// The fetcher has no source to read from.
    Unavailable(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "remote snapshot read failed: {err}"),
            Self::Decode(err) => write!(f, "remote snapshot is malformed: {err}"),
            Self::Unavailable(message) => write!(f, "remote unavailable: {message}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Supplier of fresh remote snapshots.
pub trait NotificationFetcher {
    fn fetch(&self) -> Result<Notifications, FetchError>;
}

/// Fetcher reading a JSON array of notifications from a local file.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NotificationFetcher for FileFetcher {
    fn fetch(&self) -> Result<Notifications, FetchError> {
        let content = std::fs::read(&self.path).map_err(|err| {
            error!(
                "event=remote_fetch module=sync status=error source=file error={}",
                err
            );
            err
        })?;

        let mut remote: Notifications = serde_json::from_slice(&content)?;
        // Lifecycle is local state; whatever the file says is ignored.
        let ids = remote.ids();
        remote.set_lifecycle(ids, Lifecycle::Active);

        debug!(
            "event=remote_fetch module=sync status=ok source=file count={}",
            remote.len()
        );
        Ok(remote)
    }
}

/// Fetcher used when no remote source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemote;

impl NotificationFetcher for NoRemote {
    fn fetch(&self) -> Result<Notifications, FetchError> {
        Err(FetchError::Unavailable(
            "no remote source configured".to_string(),
        ))
    }
}
