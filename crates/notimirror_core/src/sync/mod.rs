//! Snapshot reconciliation and the remote fetcher seam.
//!
//! # Responsibility
//! - Merge cached and freshly fetched snapshots (`reconcile`).
//! - Define how fresh snapshots are obtained (`fetcher`).

pub mod fetcher;
pub mod reconcile;

pub use fetcher::{FetchError, FileFetcher, NoRemote, NotificationFetcher};
pub use reconcile::{reconcile, sync, SyncOutcome, SyncSummary};
