use crate::{
    counters::DerivedMetrics,
    store::{
        StoreError,
        StoreReader,
    },
};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Reads the store on a fixed schedule on behalf of a consumer.
///
/// An empty store just means nothing has been sampled yet, so those polls are
/// skipped without reporting anything.
#[derive(Debug, Clone)]
pub struct Poller {
    reader: StoreReader,
    interval: Duration,
}

impl Poller {
    pub fn new(reader: StoreReader, interval: Duration) -> Self {
        Self { reader, interval }
    }

    /// Hands the newest record to `on_read` on every poll.
    pub async fn run_last<F>(self, cancel: CancellationToken, mut on_read: F)
    where
        F: FnMut(DerivedMetrics),
    {
        let reader = self.reader.clone();
        self.run(cancel, move || reader.fetch_last().map(&mut on_read)).await
    }

    /// Hands up to `count` newest records, oldest first, to `on_read` on every poll.
    pub async fn run_last_n<F>(self, count: usize, cancel: CancellationToken, mut on_read: F)
    where
        F: FnMut(Vec<DerivedMetrics>),
    {
        let reader = self.reader.clone();
        self.run(cancel, move || reader.fetch_last_n(count).map(&mut on_read))
            .await
    }

    async fn run<F>(self, cancel: CancellationToken, mut poll: F)
    where
        F: FnMut() -> Result<(), StoreError>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if let Err(StoreError::Empty) = poll() {
                trace!("Nothing sampled yet");
            }
        }
    }
}
