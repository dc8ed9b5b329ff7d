use crate::{
    counters::{
        DerivedMetrics,
        RawCounters,
    },
    derive::{
        derive,
        DerivationError,
    },
    source::{
        SnapshotSource,
        SourceError,
    },
    store::SharedStore,
};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// The snapshot the next derivation starts from. Only the sampler that owns
/// it ever reads or replaces it.
#[derive(Debug, Default)]
pub struct SamplerState {
    previous: Option<RawCounters>,
}

impl SamplerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&RawCounters> {
        self.previous.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerSettings {
    /// Time between two fetches.
    pub period: Duration,
    /// Upper bound for a single fetch.
    pub fetch_timeout: Duration,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            fetch_timeout: Duration::from_millis(900),
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// First snapshot, kept as the baseline.
    Bootstrapped,
    Published(DerivedMetrics),
    SourceFailed(SourceError),
    Discarded(DerivationError),
}

/// Periodically samples a [`SnapshotSource`] and appends derived rates to the
/// store. The sampler is the store's only writer.
pub struct Sampler<S> {
    source: S,
    store: SharedStore,
    state: SamplerState,
    settings: SamplerSettings,
}

impl<S: SnapshotSource> Sampler<S> {
    pub fn new(source: S, store: SharedStore, settings: SamplerSettings) -> Self {
        Self {
            source,
            store,
            state: SamplerState::new(),
            settings,
        }
    }

    pub fn state(&self) -> &SamplerState {
        &self.state
    }

    /// Fetch once and publish if a rate could be derived.
    ///
    /// The fetch is the only await; the state is touched after it completes,
    /// so dropping this future early leaves everything as it was.
    pub async fn tick(&mut self) -> TickOutcome {
        let current = match self.source.fetch_snapshot(self.settings.fetch_timeout).await {
            Ok(current) => current,
            Err(err) => {
                warn!(source = self.source.name(), "Skipping tick: {err}");
                return TickOutcome::SourceFailed(err);
            }
        };

        let Some(previous) = self.state.previous.take() else {
            debug!(taken_at = %current.taken_at, "Stored baseline snapshot");
            self.state.previous = Some(current);
            return TickOutcome::Bootstrapped;
        };

        match derive(&previous, &current) {
            Ok(metrics) => {
                if metrics.has_regressions() {
                    warn!(
                        counters = ?metrics.regressions,
                        start = %metrics.start_time,
                        end = %metrics.end_time,
                        "Counters went backwards, was the server restarted?"
                    );
                }
                trace!(end = %metrics.end_time, "Publishing metrics");
                self.store.append(metrics.clone());
                self.state.previous = Some(current);
                TickOutcome::Published(metrics)
            }
            Err(err @ DerivationError::NonPositiveInterval { .. }) => {
                warn!("Discarding sample: {err}");
                // A clock that went backwards re-anchors sampling; an equal
                // timestamp keeps the older baseline.
                self.state.previous = if current.taken_at < previous.taken_at {
                    Some(current)
                } else {
                    Some(previous)
                };
                TickOutcome::Discarded(err)
            }
            Err(err @ DerivationError::NonFiniteRate { .. }) => {
                warn!("Discarding sample: {err}");
                self.state.previous = Some(current);
                TickOutcome::Discarded(err)
            }
        }
    }

    /// Ticks every `period` until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.settings.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            source = self.source.name(),
            period = ?self.settings.period,
            capacity = self.store.capacity(),
            "Sampler started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = self.tick() => {}
            }
        }

        debug!("Sampler stopped");
    }
}
