//! In-process cache slot, mainly for tests.

use super::{deadline_passed, CacheResult, ExpiringStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
struct Slot {
    payload: String,
    written_at: SystemTime,
}

/// Snapshot slot held in memory as serialized JSON, like the durable backends.
#[derive(Debug)]
pub struct MemoryCache {
    ttl: Duration,
    slot: RefCell<Option<Slot>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RefCell::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn last_write(&self) -> Option<SystemTime> {
        self.slot.borrow().as_ref().map(|slot| slot.written_at)
    }

    /// Overrides the recorded write time of the current snapshot.
    ///
    /// No-op on cold start.
    pub fn backdate(&self, written_at: SystemTime) {
        if let Some(slot) = self.slot.borrow_mut().as_mut() {
            slot.written_at = written_at;
        }
    }

    pub fn expired_at(&self, now: SystemTime) -> bool {
        match self.last_write() {
            Some(written) => deadline_passed(written, self.ttl, now),
            None => true,
        }
    }
}

impl ExpiringStore for MemoryCache {
    fn read<T>(&self) -> CacheResult<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.slot.borrow().as_ref() {
            Some(slot) => Ok(serde_json::from_str(&slot.payload)?),
            None => Ok(T::default()),
        }
    }

    fn write<T>(&self, value: &T) -> CacheResult<()>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_string(value)?;
        *self.slot.borrow_mut() = Some(Slot {
            payload,
            written_at: SystemTime::now(),
        });
        Ok(())
    }

    fn expired(&self) -> CacheResult<bool> {
        Ok(self.expired_at(SystemTime::now()))
    }
}
