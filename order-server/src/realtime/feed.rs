//! Reconnecting feed worker

use std::ops::ControlFlow;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{
    backoff_delay, ConnectionState, FeedEvent, FeedNotice, JITTER_RANGE_MS, MAX_RETRY_ATTEMPTS,
};
use crate::db::repository::OrderRepository;
use crate::db::{ChangeEvent, DataStore, RecordKind};

/// Handle to a running order feed
///
/// Dropping the handle cancels the worker; [`stop`](Self::stop) does the
/// same but waits for it to finish, so no event is emitted afterwards.
pub struct RealtimeOrderFeed {
    cancel: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl RealtimeOrderFeed {
    /// Spawn the feed worker for one store
    ///
    /// The receiver sees `Connection(Connecting)` and the initial order
    /// snapshot first, then live updates until the feed is stopped or
    /// gives up.
    pub fn start<S: DataStore>(
        store: Arc<S>,
        store_id: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<FeedEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let worker = Worker {
            orders: OrderRepository::new(store.clone()),
            store,
            store_id: store_id.into(),
            events,
            cancel: cancel.clone(),
        };
        let handle = tokio::spawn(worker.run());
        (
            Self {
                cancel,
                worker: Some(handle),
            },
            rx,
        )
    }

    /// Cancel the worker and wait for it to exit
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.worker.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for RealtimeOrderFeed {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Worker<S> {
    store: Arc<S>,
    orders: OrderRepository<S>,
    store_id: String,
    events: mpsc::UnboundedSender<FeedEvent>,
    cancel: CancellationToken,
}

impl<S: DataStore> Worker<S> {
    async fn run(self) {
        self.send(FeedEvent::Connection(ConnectionState::Connecting));
        self.refetch().await;

        // Changes may slip by while no subscription is live; `stale`
        // forces a catch-up fetch on the next successful subscribe.
        let mut stale = false;
        let mut attempt = 0u32;

        loop {
            if self.cancel.is_cancelled() {
                return;
            }

            match self.store.subscribe() {
                Ok(rx) => {
                    attempt = 0;
                    self.send(FeedEvent::Connection(ConnectionState::Connected));
                    if stale {
                        self.refetch().await;
                        stale = false;
                    }
                    if self.listen(rx).await.is_break() {
                        return;
                    }
                    // Channel closed under us
                    tracing::warn!(store_id = %self.store_id, "Change feed lost");
                    self.send(FeedEvent::Connection(ConnectionState::Disconnected));
                    stale = true;
                }
                Err(e) => {
                    tracing::warn!(store_id = %self.store_id, error = %e, "Subscribe failed");
                    self.send(FeedEvent::Connection(ConnectionState::Disconnected));
                    stale = true;
                }
            }

            attempt += 1;
            if attempt > MAX_RETRY_ATTEMPTS {
                tracing::error!(store_id = %self.store_id, "Reconnect attempts exhausted");
                self.send(FeedEvent::Notice(FeedNotice::ConnectionLost));
                return;
            }
            self.send(FeedEvent::Notice(FeedNotice::Reconnecting {
                attempt,
                max: MAX_RETRY_ATTEMPTS,
            }));

            let jitter = rand::thread_rng().gen_range(0..JITTER_RANGE_MS);
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(backoff_delay(attempt, jitter)) => {}
            }
            self.send(FeedEvent::Connection(ConnectionState::Connecting));
        }
    }

    /// Consume change events until cancellation (`Break`) or the channel
    /// closes (`Continue`, caller reconnects)
    async fn listen(&self, mut rx: broadcast::Receiver<ChangeEvent>) -> ControlFlow<()> {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return ControlFlow::Break(()),
                event = rx.recv() => match event {
                    Ok(ev) => {
                        if self.relevant(&ev) {
                            self.refetch().await;
                        }
                    }
                    // Dropped events; the snapshot fetch covers them all
                    Err(RecvError::Lagged(_)) => self.refetch().await,
                    Err(RecvError::Closed) => return ControlFlow::Continue(()),
                },
            }
        }
    }

    /// Order events are scoped per store; item events arrive unscoped and
    /// always trigger a fetch
    fn relevant(&self, event: &ChangeEvent) -> bool {
        match event.kind {
            RecordKind::OrderItem => true,
            RecordKind::Order => match &event.store_id {
                Some(store_id) => *store_id == self.store_id,
                None => true,
            },
        }
    }

    async fn refetch(&self) {
        match self.orders.open_orders(&self.store_id).await {
            Ok(orders) => self.send(FeedEvent::Orders(orders)),
            Err(e) => {
                tracing::warn!(store_id = %self.store_id, error = %e, "Order fetch failed");
                self.send(FeedEvent::Notice(FeedNotice::FetchFailed));
            }
        }
    }

    fn send(&self, event: FeedEvent) {
        // A gone consumer is handled by stop/Drop, not here
        let _ = self.events.send(event);
    }
}
