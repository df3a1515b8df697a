use crate::table::Snapshot;
use crate::BACKOFF_CEILING;
use crate::BACKOFF_FLOOR;
use async_trait::async_trait;
use std::time::Duration;

/// What a transport hands the reconciliation loop next.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// A full pass to reconcile.
    Snapshot(Snapshot),
    /// The source confirmed there is nothing new.
    Unchanged,
    /// The transport lost its source. The grid stays as painted; the
    /// adapter keeps trying behind the scenes.
    Down(String),
}

/// The one capability a viewer needs from a transport: produce the
/// next delivery, blocking as long as it likes. Pacing, reconnection,
/// and backoff are the adapter's business; the engine never sees them.
#[async_trait]
pub trait Feed {
    async fn next(&mut self) -> Delivery;
    /// Short label for the status line.
    fn describe(&self) -> String;
}

/// Retry pacing shared by every adapter: start at the floor, double
/// per failure, hold at the ceiling, snap back on success.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    delay: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

impl Backoff {
    pub fn new() -> Self {
        Self {
            delay: BACKOFF_FLOOR,
        }
    }
    /// The delay to apply now; the next failure waits twice as long.
    pub fn wait(&mut self) -> Duration {
        let delay = self.delay;
        self.delay = (self.delay * 2).min(BACKOFF_CEILING);
        delay
    }
    pub fn reset(&mut self) {
        self.delay = BACKOFF_FLOOR;
    }
}
