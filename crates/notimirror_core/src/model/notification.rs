//! Notification domain model.
//!
//! # Responsibility
//! - Define the canonical record mirrored from the remote notification feed.
//! - Provide lifecycle helpers for hide / pending-delete semantics.
//! - Render a plain one-line summary for listings.
//!
//! # Invariants
//! - `id` is opaque, stable and the only key used by merge/dedupe logic.
//! - Display attributes round-trip unchanged through the cache.
//! - `lifecycle` is local business state; remote payloads never carry it.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier of one remote notification.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NotificationId = String;

/// Local lifecycle state of one notification.
///
/// Replaces two independent booleans so that the merge policy is a plain
/// match over states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Shown and refreshed from remote data.
    #[default]
    Active,
    /// Suppressed from view; remote updates are ignored while set.
    Hidden,
    /// Removal requested; dropped once the remote stops reporting it.
    PendingDelete,
}

impl Lifecycle {
    /// Returns whether local state must win over a fresher remote copy.
    pub fn pins_local(self) -> bool {
        matches!(self, Self::Hidden | Self::PendingDelete)
    }
}

/// Repository the notification belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
}

/// Account that triggered the notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub login: String,
}

/// Thread the notification points at (issue, pull request, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subject {
    pub title: String,
    pub url: String,
    /// Serialized as `type` to match the remote schema naming.
    #[serde(rename = "type")]
    pub kind: String,
    pub state: String,
}

/// One mirrored remote notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(default)]
    pub unread: bool,
    #[serde(default)]
    pub reason: String,
    /// Remote timestamp, kept verbatim.
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub repository: Repository,
    #[serde(default)]
    pub author: User,
    #[serde(default)]
    pub subject: Subject,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl Notification {
    /// Creates a notification with the given id and empty display attributes.
    pub fn new(id: impl Into<NotificationId>) -> Self {
        Self {
            id: id.into(),
            unread: false,
            reason: String::new(),
            updated_at: String::new(),
            url: String::new(),
            repository: Repository::default(),
            author: User::default(),
            subject: Subject::default(),
            lifecycle: Lifecycle::Active,
        }
    }

    /// Suppresses this notification from view and from remote updates.
    pub fn hide(&mut self) {
        self.lifecycle = Lifecycle::Hidden;
    }

    /// Requests removal once the remote stops reporting this notification.
    pub fn mark_pending_delete(&mut self) {
        self.lifecycle = Lifecycle::PendingDelete;
    }

    /// Clears any local lifecycle override.
    pub fn restore(&mut self) {
        self.lifecycle = Lifecycle::Active;
    }

    pub fn is_hidden(&self) -> bool {
        self.lifecycle == Lifecycle::Hidden
    }

    pub fn is_pending_delete(&self) -> bool {
        self.lifecycle == Lifecycle::PendingDelete
    }

    /// Returns whether this notification should be listed by default.
    pub fn is_visible(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    fn short_type(&self) -> &'static str {
        match self.subject.kind.as_str() {
            "Issue" => "IS",
            "PullRequest" => "PR",
            _ => "T?",
        }
    }

    fn short_state(&self) -> &'static str {
        match self.subject.state.as_str() {
            "open" => "OP",
            "closed" => "CL",
            "merged" => "MG",
            _ => "S?",
        }
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} by {}: '{}'",
            self.short_type(),
            self.short_state(),
            self.repository.full_name,
            self.author.login,
            self.subject.title
        )
    }
}
