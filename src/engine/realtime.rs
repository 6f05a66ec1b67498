//! Change notification.
//!
//! Writers queue `pg_notify` inside their transaction; one listener task
//! turns notifications into [`RecordKind`] staleness signals on a
//! broadcast channel. Consumers never patch their state from a signal,
//! they reload the full list.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use sqlx::{postgres::PgListener, Pool};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};

use super::Engine;

use crate::{
    api::{CheckInAPI, GuestbookAPI, PhotoAPI, RealtimeAPI, RouteStopAPI},
    db::{Database, CHANGES_CHANNEL},
    entities::{RecordKind, Snapshot},
    error::Error,
};

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

#[tracing::instrument(skip_all)]
pub async fn listen(
    pool: &Pool<Database>,
    changes: broadcast::Sender<RecordKind>,
) -> Result<JoinHandle<()>, Error> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(CHANGES_CHANNEL).await?;

    tracing::info!(channel = CHANGES_CHANNEL, "listening for changes");

    Ok(tokio::spawn(async move {
        loop {
            match listener.try_recv().await {
                Ok(Some(notification)) => match notification.payload().parse::<RecordKind>() {
                    Ok(kind) => {
                        // no receivers is fine
                        let _ = changes.send(kind);
                    }
                    Err(_) => {
                        tracing::warn!(payload = notification.payload(), "unknown change payload")
                    }
                },
                Ok(None) => {
                    // connection dropped; anything may have changed meanwhile
                    tracing::warn!("change listener reconnecting");
                    for kind in RecordKind::ALL {
                        let _ = changes.send(kind);
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "change listener failed");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }))
}

#[async_trait]
impl RealtimeAPI for Engine {
    fn subscribe(&self) -> broadcast::Receiver<RecordKind> {
        self.changes.subscribe()
    }

    #[tracing::instrument(skip(self))]
    async fn snapshot(&self, kind: RecordKind) -> Result<Snapshot, Error> {
        Ok(match kind {
            RecordKind::CheckIns => Snapshot::CheckIns(self.list_check_ins().await?),
            RecordKind::Photos => Snapshot::Photos(self.list_photos().await?),
            RecordKind::Guestbook => Snapshot::Guestbook(self.list_guestbook_entries().await?),
            RecordKind::RouteStops => Snapshot::RouteStops(self.list_route_stops().await?),
        })
    }
}

/// A running watch. Dropping it stops delivery; a callback never runs
/// after the handle is gone.
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Calls `callback` with the full refreshed list of `kind` after every
/// change to it.
pub fn watch<A, F>(api: Arc<A>, kind: RecordKind, callback: F) -> Subscription
where
    A: RealtimeAPI + Send + Sync + ?Sized + 'static,
    F: FnMut(Snapshot) + Send + 'static,
{
    let changes = api.subscribe();

    watch_changes(api, changes, kind, callback)
}

/// Like [`watch`], but driven by a receiver the caller subscribed earlier.
/// Subscribe before reading the initial list so that no change committed
/// in between is lost.
pub fn watch_changes<A, F>(
    api: Arc<A>,
    mut changes: broadcast::Receiver<RecordKind>,
    kind: RecordKind,
    mut callback: F,
) -> Subscription
where
    A: RealtimeAPI + Send + Sync + ?Sized + 'static,
    F: FnMut(Snapshot) + Send + 'static,
{
    let handle = tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(changed) if changed != kind => continue,
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    tracing::debug!(missed, "change feed lagged, refetching");
                }
                Err(RecvError::Closed) => break,
            }

            match api.snapshot(kind).await {
                Ok(snapshot) => callback(snapshot),
                Err(err) => tracing::warn!(%kind, error = %err, "refetch after change failed"),
            }
        }
    });

    Subscription { handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    use crate::entities::GuestbookEntry;

    struct FakeFeed {
        changes: broadcast::Sender<RecordKind>,
        fetches: AtomicUsize,
    }

    impl FakeFeed {
        fn new() -> Arc<Self> {
            let (changes, _) = broadcast::channel(4);
            Arc::new(Self {
                changes,
                fetches: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RealtimeAPI for FakeFeed {
        fn subscribe(&self) -> broadcast::Receiver<RecordKind> {
            self.changes.subscribe()
        }

        async fn snapshot(&self, kind: RecordKind) -> Result<Snapshot, Error> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            assert_eq!(kind, RecordKind::Guestbook);

            let entries = (0..n)
                .map(|i| GuestbookEntry {
                    id: Uuid::new_v4(),
                    created_at: Utc::now(),
                    name: format!("guest {}", i),
                    message: "hello".into(),
                })
                .collect();

            Ok(Snapshot::Guestbook(entries))
        }
    }

    #[tokio::test]
    async fn refetches_full_list_on_change_test() {
        let feed = FakeFeed::new();
        let (sender, mut receiver) = mpsc::unbounded_channel();

        let subscription = watch(feed.clone(), RecordKind::Guestbook, move |snapshot| {
            sender.send(snapshot).unwrap();
        });

        // unrelated kinds are ignored
        feed.changes.send(RecordKind::Photos).unwrap();
        feed.changes.send(RecordKind::Guestbook).unwrap();
        let first = receiver.recv().await.unwrap();
        assert_eq!(first.len(), 1);

        feed.changes.send(RecordKind::Guestbook).unwrap();
        let second = receiver.recv().await.unwrap();
        assert_eq!(second.kind(), RecordKind::Guestbook);
        assert_eq!(second.len(), 2);

        subscription.unsubscribe();
        assert_eq!(feed.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn change_during_initial_read_is_delivered_test() {
        let feed = FakeFeed::new();
        let (sender, mut receiver) = mpsc::unbounded_channel();

        let changes = feed.subscribe();
        let initial = feed.snapshot(RecordKind::Guestbook).await.unwrap();
        assert_eq!(initial.len(), 1);

        // committed after the initial read, before the watch task exists
        feed.changes.send(RecordKind::Guestbook).unwrap();

        let _subscription =
            watch_changes(feed.clone(), changes, RecordKind::Guestbook, move |snapshot| {
                let _ = sender.send(snapshot);
            });

        let refreshed = tokio::time::timeout(Duration::from_secs(1), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.len(), 2);
    }

    #[tokio::test]
    async fn dropped_subscription_stops_callbacks_test() {
        let feed = FakeFeed::new();
        let (sender, mut receiver) = mpsc::unbounded_channel();

        let subscription = watch(feed.clone(), RecordKind::Guestbook, move |snapshot| {
            let _ = sender.send(snapshot);
        });
        drop(subscription);

        // the aborted task releases its receiver, so nobody is listening
        tokio::task::yield_now().await;
        let _ = feed.changes.send(RecordKind::Guestbook);

        assert!(receiver.recv().await.is_none());
        assert_eq!(feed.fetches.load(Ordering::SeqCst), 0);
    }
}
