use chrono::{
    DateTime,
    TimeDelta,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use strum::{
    Display,
    EnumIter,
    IntoEnumIterator as _,
};

/// The quantities tracked for every sample, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Insert,
    Query,
    Update,
    Delete,
    Getmore,
    Command,
    NetworkIn,
    NetworkOut,
    Checkpoint,
}

impl Counter {
    /// `true` for the six `opcounters` entries.
    pub fn is_opcounter(self) -> bool {
        matches!(
            self,
            Counter::Insert | Counter::Query | Counter::Update | Counter::Delete | Counter::Getmore | Counter::Command
        )
    }

    pub fn opcounters() -> impl Iterator<Item = Counter> {
        Counter::iter().filter(|counter| counter.is_opcounter())
    }

    /// Unit of the derived rate.
    pub fn unit(self) -> &'static str {
        match self {
            Counter::NetworkIn | Counter::NetworkOut => "B/s",
            Counter::Checkpoint => "ckpt/s",
            _ => "ops/s",
        }
    }
}

/// One value per [`Counter`]. Holds raw cumulative totals in [`RawCounters`]
/// and per-second rates in [`DerivedMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterValues {
    pub insert: f64,
    pub query: f64,
    pub update: f64,
    pub delete: f64,
    pub getmore: f64,
    pub command: f64,
    pub network_in: f64,
    pub network_out: f64,
    pub checkpoint: f64,
}

impl CounterValues {
    pub fn get(&self, counter: Counter) -> f64 {
        match counter {
            Counter::Insert => self.insert,
            Counter::Query => self.query,
            Counter::Update => self.update,
            Counter::Delete => self.delete,
            Counter::Getmore => self.getmore,
            Counter::Command => self.command,
            Counter::NetworkIn => self.network_in,
            Counter::NetworkOut => self.network_out,
            Counter::Checkpoint => self.checkpoint,
        }
    }

    pub fn set(&mut self, counter: Counter, value: f64) {
        let slot = match counter {
            Counter::Insert => &mut self.insert,
            Counter::Query => &mut self.query,
            Counter::Update => &mut self.update,
            Counter::Delete => &mut self.delete,
            Counter::Getmore => &mut self.getmore,
            Counter::Command => &mut self.command,
            Counter::NetworkIn => &mut self.network_in,
            Counter::NetworkOut => &mut self.network_out,
            Counter::Checkpoint => &mut self.checkpoint,
        };
        *slot = value;
    }

    pub fn with(mut self, counter: Counter, value: f64) -> Self {
        self.set(counter, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Counter, f64)> + '_ {
        Counter::iter().map(move |counter| (counter, self.get(counter)))
    }
}

/// A snapshot of the server's cumulative counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCounters {
    pub values: CounterValues,
    /// Server-side wall clock at capture.
    pub taken_at: DateTime<Utc>,
}

impl RawCounters {
    pub fn new(values: CounterValues, taken_at: DateTime<Utc>) -> Self {
        Self { values, taken_at }
    }
}

/// Per-second rates computed over `start_time..end_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub rates: CounterValues,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Counters that went backwards over the interval, typically after a
    /// server restart. Their rate is negative and kept as such.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regressions: Vec<Counter>,
}

impl DerivedMetrics {
    pub fn rate(&self, counter: Counter) -> f64 {
        self.rates.get(counter)
    }

    pub fn is_regressed(&self, counter: Counter) -> bool {
        self.regressions.contains(&counter)
    }

    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }

    pub fn interval(&self) -> TimeDelta {
        self.end_time - self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counters_iterate_in_display_order() {
        let names = Counter::iter().map(|c| c.to_string()).collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "insert",
                "query",
                "update",
                "delete",
                "getmore",
                "command",
                "network_in",
                "network_out",
                "checkpoint"
            ]
        );
        assert_eq!(Counter::opcounters().count(), 6);
    }

    #[test]
    fn set_and_get_address_the_same_field() {
        let mut values = CounterValues::default();
        for (index, counter) in Counter::iter().enumerate() {
            values.set(counter, index as f64);
        }
        for (index, (counter, value)) in values.iter().enumerate() {
            assert_eq!(value, index as f64, "{counter}");
        }
        assert_eq!(values.network_out, 7.0);
    }
}
