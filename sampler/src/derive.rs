use crate::counters::{
    Counter,
    CounterValues,
    DerivedMetrics,
    RawCounters,
};
use chrono::{
    DateTime,
    TimeDelta,
    Utc,
};
use strum::IntoEnumIterator as _;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DerivationError {
    #[error("sampling interval {start} -> {end} is not positive")]
    NonPositiveInterval { start: DateTime<Utc>, end: DateTime<Utc> },
    #[error("{counter} rate is not finite")]
    NonFiniteRate { counter: Counter },
}

/// Computes per-second rates between two snapshots.
///
/// Counters that decreased are reported in [`DerivedMetrics::regressions`]
/// with their negative rate left as is.
pub fn derive(previous: &RawCounters, current: &RawCounters) -> Result<DerivedMetrics, DerivationError> {
    let seconds = seconds(current.taken_at - previous.taken_at);
    if seconds <= 0.0 {
        return Err(DerivationError::NonPositiveInterval {
            start: previous.taken_at,
            end: current.taken_at,
        });
    }

    let mut rates = CounterValues::default();
    let mut regressions = Vec::new();
    for counter in Counter::iter() {
        let before = previous.values.get(counter);
        let after = current.values.get(counter);
        let rate = (after - before) / seconds;
        if !rate.is_finite() {
            return Err(DerivationError::NonFiniteRate { counter });
        }
        if after < before {
            regressions.push(counter);
        }
        rates.set(counter, rate);
    }

    Ok(DerivedMetrics {
        rates,
        start_time: previous.taken_at,
        end_time: current.taken_at,
        regressions,
    })
}

fn seconds(delta: TimeDelta) -> f64 {
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}
