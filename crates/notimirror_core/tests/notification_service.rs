use notimirror_core::{
    ExpiringStore, FetchError, FileCache, Lifecycle, MemoryCache, Notification,
    NotificationFetcher, NotificationService, Notifications, RefreshStatus, ServiceError,
};
use std::cell::{Cell, RefCell};
use std::time::{Duration, SystemTime};

const TTL: Duration = Duration::from_secs(3600);

/// Fetcher returning a scripted snapshot and counting calls.
struct ScriptedFetcher {
    snapshot: RefCell<Option<Notifications>>,
    calls: Cell<usize>,
}

impl ScriptedFetcher {
    fn returning(ids: &[&str]) -> Self {
        Self {
            snapshot: RefCell::new(Some(ids.iter().map(|id| Notification::new(*id)).collect())),
            calls: Cell::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            snapshot: RefCell::new(None),
            calls: Cell::new(0),
        }
    }

    fn set(&self, ids: &[&str]) {
        *self.snapshot.borrow_mut() = Some(ids.iter().map(|id| Notification::new(*id)).collect());
    }
}

impl NotificationFetcher for &ScriptedFetcher {
    fn fetch(&self) -> Result<Notifications, FetchError> {
        self.calls.set(self.calls.get() + 1);
        self.snapshot
            .borrow()
            .clone()
            .ok_or_else(|| FetchError::Unavailable("scripted failure".to_string()))
    }
}

fn seeded_cache(ids: &[&str]) -> MemoryCache {
    let cache = MemoryCache::new(TTL);
    let notifications: Notifications = ids.iter().map(|id| Notification::new(*id)).collect();
    cache.write(&notifications).unwrap();
    cache
}

#[test]
fn cold_start_fetches_and_persists() {
    let fetcher = ScriptedFetcher::returning(&["a", "b"]);
    let service = NotificationService::new(MemoryCache::new(TTL), &fetcher);

    let outcome = service.load(false).unwrap();

    assert_eq!(outcome.notifications.ids(), vec!["a", "b"]);
    match outcome.status {
        RefreshStatus::Refreshed(summary) => assert_eq!(summary.inserted, 2),
        other => panic!("unexpected status: {other:?}"),
    }
    assert_eq!(fetcher.calls.get(), 1);
    let persisted: Notifications = service.cache().read().unwrap();
    assert_eq!(persisted.ids(), vec!["a", "b"]);
}

#[test]
fn fresh_cache_skips_fetch() {
    let fetcher = ScriptedFetcher::returning(&["remote"]);
    let service = NotificationService::new(seeded_cache(&["cached"]), &fetcher);

    let outcome = service.load(false).unwrap();

    assert!(matches!(outcome.status, RefreshStatus::Fresh));
    assert_eq!(outcome.notifications.ids(), vec!["cached"]);
    assert_eq!(fetcher.calls.get(), 0);
}

#[test]
fn force_refreshes_fresh_cache() {
    let fetcher = ScriptedFetcher::returning(&["remote"]);
    let service = NotificationService::new(seeded_cache(&["cached"]), &fetcher);

    let outcome = service.load(true).unwrap();

    assert_eq!(outcome.notifications.ids(), vec!["cached", "remote"]);
    assert_eq!(fetcher.calls.get(), 1);
}

#[test]
fn expired_cache_refreshes() {
    let fetcher = ScriptedFetcher::returning(&["cached", "remote"]);
    let cache = seeded_cache(&["cached"]);
    cache.backdate(SystemTime::now() - TTL);
    let service = NotificationService::new(cache, &fetcher);

    let outcome = service.load(false).unwrap();

    assert!(matches!(outcome.status, RefreshStatus::Refreshed(_)));
    assert_eq!(outcome.notifications.ids(), vec!["cached", "remote"]);
    assert!(!service.cache().expired().unwrap());
}

#[test]
fn fetch_failure_returns_stale_snapshot_untouched() {
    let fetcher = ScriptedFetcher::failing();
    let service = NotificationService::new(seeded_cache(&["cached"]), &fetcher);
    service.mark_done(["cached"]).unwrap();
    service.cache().backdate(SystemTime::now() - TTL);

    let outcome = service.load(false).unwrap();

    assert!(matches!(outcome.status, RefreshStatus::Stale(_)));
    assert_eq!(outcome.notifications.ids(), vec!["cached"]);
    assert_eq!(
        outcome.notifications.get("cached").unwrap().lifecycle,
        Lifecycle::PendingDelete
    );
}

#[test]
fn explicit_refresh_surfaces_fetch_failure() {
    let fetcher = ScriptedFetcher::failing();
    let service = NotificationService::new(seeded_cache(&["cached"]), &fetcher);

    let err = service.refresh().unwrap_err();

    assert!(matches!(err, ServiceError::Fetch(_)), "unexpected: {err}");
    let persisted: Notifications = service.cache().read().unwrap();
    assert_eq!(persisted.ids(), vec!["cached"]);
}

#[test]
fn hide_persists_and_survives_refresh() {
    let fetcher = ScriptedFetcher::returning(&["a", "b"]);
    let service = NotificationService::new(seeded_cache(&["a", "b"]), &fetcher);

    assert_eq!(service.hide(["a", "unknown"]).unwrap(), 1);

    let outcome = service.load(true).unwrap();
    assert_eq!(outcome.notifications.get("a").unwrap().lifecycle, Lifecycle::Hidden);
    assert_eq!(outcome.notifications.visible().ids(), vec!["b"]);
}

#[test]
fn done_items_leave_once_remote_stops_reporting_them() {
    let fetcher = ScriptedFetcher::returning(&["a", "b"]);
    let service = NotificationService::new(seeded_cache(&["a", "b"]), &fetcher);
    service.mark_done(["a"]).unwrap();

    let still_remote = service.load(true).unwrap();
    assert_eq!(still_remote.notifications.ids(), vec!["a", "b"]);

    fetcher.set(&["b"]);
    let gone = service.load(true).unwrap();
    assert_eq!(gone.notifications.ids(), vec!["b"]);
}

#[test]
fn restore_clears_lifecycle() {
    let fetcher = ScriptedFetcher::failing();
    let service = NotificationService::new(seeded_cache(&["a"]), &fetcher);
    service.hide(["a"]).unwrap();

    assert_eq!(service.restore(["a"]).unwrap(), 1);

    let persisted: Notifications = service.cache().read().unwrap();
    assert!(persisted.get("a").unwrap().is_visible());
}

#[test]
fn unchanged_lifecycle_does_not_rewrite_cache() {
    let fetcher = ScriptedFetcher::failing();
    let cache = seeded_cache(&["a"]);
    let written = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
    cache.backdate(written);
    let service = NotificationService::new(cache, &fetcher);

    assert_eq!(service.restore(["a"]).unwrap(), 0);
    assert_eq!(service.cache().last_write(), Some(written));
}

#[test]
fn file_backed_service_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let fetcher = ScriptedFetcher::returning(&["a", "b"]);

    {
        let service = NotificationService::new(FileCache::new(&path, TTL), &fetcher);
        service.load(false).unwrap();
        service.hide(["b"]).unwrap();
    }

    let service = NotificationService::new(FileCache::new(&path, TTL), &fetcher);
    let outcome = service.load(false).unwrap();

    assert!(matches!(outcome.status, RefreshStatus::Fresh));
    assert_eq!(fetcher.calls.get(), 1);
    assert_eq!(outcome.notifications.visible().ids(), vec!["a"]);
}
