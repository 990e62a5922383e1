//! Core domain logic for notimirror.
//! Mirrors a remote notification feed into a TTL-gated local snapshot and
//! reconciles it against fresh fetches.

pub mod cache;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod sync;

pub use cache::{
    ttl_from_hours, CacheError, CacheResult, ExpiringStore, FileCache, MemoryCache, SqliteCache,
};
pub use config::{Config, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::{NotificationMap, NotificationSlots, Notifications};
pub use model::notification::{Lifecycle, Notification, NotificationId, Repository, Subject, User};
pub use service::notification_service::{
    LoadOutcome, NotificationService, RefreshStatus, ServiceError, ServiceResult,
};
pub use sync::{
    reconcile, sync, FetchError, FileFetcher, NoRemote, NotificationFetcher, SyncOutcome,
    SyncSummary,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
