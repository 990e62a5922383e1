//! Ordered notification collection and id-keyed lookup.
//!
//! # Responsibility
//! - Provide the list/set-like operations every other component builds on.
//! - Keep the ordered sequence as the system of record; maps are indexes only.
//!
//! # Invariants
//! - All operations are pure and never fail.
//! - `Notifications` is dense. Null placeholders only exist as
//!   `NotificationSlots` and must go through `Notifications::compact` before
//!   any other operation.
//! - Id uniqueness is enforced by `uniq` and by sync, not by this type.

use crate::model::notification::{Lifecycle, Notification, NotificationId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Sparse sequence produced at the post-filter boundary.
pub type NotificationSlots = Vec<Option<Notification>>;

/// Ordered, dense sequence of notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notifications(Vec<Notification>);

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops null slots, keeping the relative order of real entries.
    ///
    /// This is the only way from `NotificationSlots` to a collection.
    pub fn compact(slots: impl IntoIterator<Item = Option<Notification>>) -> Self {
        Self(slots.into_iter().flatten().collect())
    }

    /// Returns ids in collection order, duplicates included.
    pub fn ids(&self) -> Vec<NotificationId> {
        self.0.iter().map(|n| n.id.clone()).collect()
    }

    /// Sorts in place by ascending id.
    ///
    /// The sort is stable: entries sharing an id keep first-seen order.
    pub fn sort(&mut self) {
        self.0.sort_by(|left, right| left.id.cmp(&right.id));
    }

    /// Builds an id-keyed lookup. Later duplicates overwrite earlier ones.
    pub fn to_map(&self) -> NotificationMap {
        NotificationMap(
            self.0
                .iter()
                .map(|n| (n.id.clone(), n.clone()))
                .collect(),
        )
    }

    /// Keeps the first occurrence of each id, in original order.
    pub fn uniq(&self) -> Self {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.0.len());
        let mut unique = Vec::with_capacity(self.0.len());
        for notification in &self.0 {
            if seen.insert(notification.id.as_str()) {
                unique.push(notification.clone());
            }
        }
        Self(unique)
    }

    /// Keeps elements whose id is in `ids`, in original order.
    ///
    /// Ids with no matching element are ignored.
    pub fn filter_from_ids<I, S>(&self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted = id_set(ids);
        Self(
            self.0
                .iter()
                .filter(|n| wanted.contains(n.id.as_str()))
                .cloned()
                .collect(),
        )
    }

    /// Keeps only `Lifecycle::Active` notifications.
    pub fn visible(&self) -> Self {
        Self(self.0.iter().filter(|n| n.is_visible()).cloned().collect())
    }

    /// Returns the first notification with the given id.
    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.0.iter().find(|n| n.id == id)
    }

    /// Sets `lifecycle` on every element whose id is in `ids`.
    ///
    /// Returns how many elements actually changed state.
    pub fn set_lifecycle<I, S>(&mut self, ids: I, lifecycle: Lifecycle) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted = id_set(ids);
        let mut changed = 0;
        for notification in self.0.iter_mut() {
            if wanted.contains(notification.id.as_str()) && notification.lifecycle != lifecycle {
                notification.lifecycle = lifecycle;
                changed += 1;
            }
        }
        changed
    }

    /// Renders one display line per notification.
    pub fn render_lines(&self) -> String {
        self.0
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, notification: Notification) {
        self.0.push(notification);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Notification] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Notification> {
        self.0
    }
}

impl From<Vec<Notification>> for Notifications {
    fn from(value: Vec<Notification>) -> Self {
        Self(value)
    }
}

impl FromIterator<Notification> for Notifications {
    fn from_iter<T: IntoIterator<Item = Notification>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Notifications {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Notifications {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Id-keyed lookup over notifications. Never the system of record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationMap(HashMap<NotificationId, Notification>);

impl NotificationMap {
    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Removes and returns the entry for `id`.
    pub fn take(&mut self, id: &str) -> Option<Notification> {
        self.0.remove(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts back to a sequence in unspecified order.
    ///
    /// Call `Notifications::sort` afterwards when order matters.
    pub fn into_list(self) -> Notifications {
        Notifications(self.0.into_values().collect())
    }
}

impl FromIterator<Notification> for NotificationMap {
    fn from_iter<T: IntoIterator<Item = Notification>>(iter: T) -> Self {
        Self(iter.into_iter().map(|n| (n.id.clone(), n)).collect())
    }
}

fn id_set<I, S>(ids: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter().map(|id| id.as_ref().to_string()).collect()
}
