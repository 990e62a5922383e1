//! Notification domain model.
//!
//! # Responsibility
//! - Define the mirrored notification record and its local lifecycle state.
//! - Provide ordered collection operations used by sync, cache and views.
//!
//! # Invariants
//! - Every notification is identified by a stable, opaque `NotificationId`.
//! - The ordered collection is the system of record; maps are lookups only.

pub mod collection;
pub mod notification;
