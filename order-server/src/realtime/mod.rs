//! Realtime order feed
//!
//! Keeps a consumer's view of the open-order list current by listening
//! on the store's change channel and re-fetching on every relevant
//! change. Connectivity is self-healing: lost subscriptions reconnect
//! with capped exponential backoff and jitter, up to
//! [`MAX_RETRY_ATTEMPTS`] consecutive failures, after which the feed
//! gives up and reports [`FeedNotice::ConnectionLost`].
//!
//! Channel problems never surface as errors on the order path; they are
//! reported as [`FeedEvent`]s so the consumer can render a banner and
//! keep showing the last good snapshot.

mod feed;

pub use feed::RealtimeOrderFeed;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::models::OrderDetail;

/// Consecutive reconnect failures tolerated before giving up
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Backoff floor in milliseconds
const BACKOFF_BASE_MS: u64 = 1000;

/// Backoff ceiling in milliseconds
const BACKOFF_CAP_MS: u64 = 30_000;

/// Jitter is drawn uniformly from `[0, JITTER_RANGE_MS)`
const JITTER_RANGE_MS: u64 = 1000;

/// Connection state as presented to the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

/// Out-of-band notices the consumer should surface to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedNotice {
    /// A snapshot fetch failed; the last good list is still valid
    FetchFailed,
    /// Reconnect scheduled after a lost subscription
    Reconnecting { attempt: u32, max: u32 },
    /// Retries exhausted; the feed has stopped
    ConnectionLost,
}

/// Everything the feed pushes to its consumer
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Fresh snapshot of the open-order list
    Orders(Vec<OrderDetail>),
    Connection(ConnectionState),
    Notice(FeedNotice),
}

/// Delay before reconnect `attempt` (1-based)
///
/// `min(base * 2^attempt, cap)` plus the caller-supplied jitter, which
/// keeps a fleet of clients from reconnecting in lockstep.
pub fn backoff_delay(attempt: u32, jitter_ms: u64) -> Duration {
    let exp = match attempt {
        0..=15 => BACKOFF_BASE_MS.saturating_mul(1 << attempt),
        _ => BACKOFF_CAP_MS,
    };
    Duration::from_millis(exp.min(BACKOFF_CAP_MS) + jitter_ms)
}
