//! Logging consumer: one `mongostat`-style line per new sample.

use chrono::{
    DateTime,
    Utc,
};
use mongo_monitor_sampler::{
    Counter,
    DerivedMetrics,
    Poller,
    StoreReader,
};
use std::time::Duration;
use strum::IntoEnumIterator as _;
use tokio_util::sync::CancellationToken;

const TIME_WIDTH: usize = 8;
const COLUMN_WIDTH: usize = 9;

/// Remembers what was already printed so a record shows up only once, no
/// matter how often the store is polled.
#[derive(Debug, Default)]
pub(crate) struct StatLogger {
    header_printed: bool,
    last_printed: Option<DateTime<Utc>>,
}

impl StatLogger {
    /// Lines to print for the newest record: nothing if it was already
    /// printed, the header before the very first row.
    pub(crate) fn lines_for(&mut self, record: &DerivedMetrics) -> Vec<String> {
        if self.last_printed == Some(record.end_time) {
            return Vec::new();
        }
        self.last_printed = Some(record.end_time);

        let mut lines = Vec::with_capacity(2);
        if !self.header_printed {
            self.header_printed = true;
            lines.push(header());
        }
        lines.push(row(record));
        lines
    }
}

pub(crate) async fn run(reader: StoreReader, interval: Duration, cancel: CancellationToken) {
    let mut logger = StatLogger::default();
    Poller::new(reader, interval)
        .run_last(cancel, move |record| {
            for line in logger.lines_for(&record) {
                info!("{line}");
            }
        })
        .await;
    debug!("Stat logger stopped");
}

fn label(counter: Counter) -> &'static str {
    match counter {
        Counter::Insert => "insert",
        Counter::Query => "query",
        Counter::Update => "update",
        Counter::Delete => "delete",
        Counter::Getmore => "getmore",
        Counter::Command => "command",
        Counter::NetworkIn => "net_in",
        Counter::NetworkOut => "net_out",
        Counter::Checkpoint => "ckpt",
    }
}

fn header() -> String {
    let mut line = format!("{:<TIME_WIDTH$}", "time");
    for counter in Counter::iter() {
        line.push_str(&format!("{:>COLUMN_WIDTH$}", label(counter)));
    }
    line
}

/// Rates are rounded to whole numbers; `!` marks a counter that went backwards.
fn row(record: &DerivedMetrics) -> String {
    let mut line = format!("{:<TIME_WIDTH$}", record.end_time.format("%H:%M:%S").to_string());
    for (counter, rate) in record.rates.iter() {
        let mark = if record.is_regressed(counter) { "!" } else { "" };
        let value = format!("{}{mark}", rate.round() as i64);
        line.push_str(&format!("{value:>COLUMN_WIDTH$}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use mongo_monitor_sampler::CounterValues;
    use pretty_assertions::assert_eq;

    fn record(second: u32, rates: CounterValues, regressions: Vec<Counter>) -> DerivedMetrics {
        DerivedMetrics {
            rates,
            start_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, second - 1).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, second).unwrap(),
            regressions,
        }
    }

    fn columns(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn header_names_every_counter() {
        assert_eq!(
            columns(&header()),
            vec!["time", "insert", "query", "update", "delete", "getmore", "command", "net_in", "net_out", "ckpt"]
        );
    }

    #[test]
    fn rows_line_up_with_the_header() {
        let rates = CounterValues::default()
            .with(Counter::Insert, 10.4)
            .with(Counter::NetworkOut, 2047.6);
        let line = row(&record(5, rates, Vec::new()));
        assert_eq!(line.len(), header().len());
        assert_eq!(
            columns(&line),
            vec!["12:00:05", "10", "0", "0", "0", "0", "0", "0", "2048", "0"]
        );
    }

    #[test]
    fn regressed_counters_are_marked() {
        let rates = CounterValues::default().with(Counter::Delete, -3.0);
        let line = row(&record(5, rates, vec![Counter::Delete]));
        assert_eq!(columns(&line)[4], "-3!");
    }

    #[test]
    fn each_record_is_printed_once() {
        let mut logger = StatLogger::default();
        let first = record(1, CounterValues::default(), Vec::new());
        let second = record(2, CounterValues::default(), Vec::new());

        let lines = logger.lines_for(&first);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], header());

        assert_eq!(logger.lines_for(&first), Vec::<String>::new());
        assert_eq!(logger.lines_for(&second), vec![row(&second)]);
    }
}
