//! Local/remote snapshot reconciliation.
//!
//! # Responsibility
//! - Merge the previous local snapshot with a fresh remote snapshot.
//! - Apply lifecycle rules: pinned local state, pending-delete cleanup.
//!
//! # Invariants
//! - Pure and total: no I/O, no logging, no error channel.
//! - Output order is existing items in prior order, then new items in fetch
//!   order. Map iteration order never leaks into the result.
//! - An item disappears only when it is `PendingDelete` locally AND absent
//!   from the remote snapshot.
//! - An empty remote snapshot counts as "confirmed absent" for pending-delete
//!   items. Callers must not pass a degraded fetch here.

use crate::model::collection::{NotificationMap, Notifications};
use crate::model::notification::Lifecycle;

/// Per-rule counters for one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Active local items replaced by their remote copy.
    pub updated: usize,
    /// Hidden or pending-delete items kept although the remote reported them.
    pub retained: usize,
    /// Local items absent from the remote snapshot and kept.
    pub missing_kept: usize,
    /// Pending-delete items absent from the remote snapshot.
    pub dropped: usize,
    /// Remote items not known locally.
    pub inserted: usize,
}

impl SyncSummary {
    /// Number of notifications in the merged snapshot.
    pub fn total(&self) -> usize {
        self.updated + self.retained + self.missing_kept + self.inserted
    }
}

/// Merged snapshot plus counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub notifications: Notifications,
    pub summary: SyncSummary,
}

/// Merges `local` with `remote` into the next local snapshot.
///
/// `local` must already hold unique ids (see `Notifications::uniq`); the
/// output then holds each id at most once.
pub fn sync(local: Notifications, remote: Notifications) -> Notifications {
    reconcile(local, remote).notifications
}

/// Same as [`sync`], also reporting which rule applied how often.
///
/// Duplicate ids inside `remote` collapse to one entry: the content of the
/// last occurrence at the position of the first. Duplicate ids inside
/// `local` are not collapsed: the first copy consumes the remote match and
/// later copies are kept as missing, so callers pass `uniq`'d snapshots.
pub fn reconcile(local: Notifications, remote: Notifications) -> SyncOutcome {
    let remote_order = remote.ids();
    let mut remote_by_id: NotificationMap = remote.into_iter().collect();

    let mut merged = Notifications::new();
    let mut summary = SyncSummary::default();

    for current in local {
        match (remote_by_id.take(&current.id), current.lifecycle) {
            (Some(_), lifecycle) if lifecycle.pins_local() => {
                summary.retained += 1;
                merged.push(current);
            }
            (Some(fresh), _) => {
                summary.updated += 1;
                merged.push(fresh);
            }
            (None, Lifecycle::PendingDelete) => {
                summary.dropped += 1;
            }
            (None, _) => {
                summary.missing_kept += 1;
                merged.push(current);
            }
        }
    }

    for id in remote_order {
        if let Some(fresh) = remote_by_id.take(&id) {
            summary.inserted += 1;
            merged.push(fresh);
        }
    }

    SyncOutcome {
        notifications: merged,
        summary,
    }
}
