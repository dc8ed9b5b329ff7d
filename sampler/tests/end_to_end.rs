use chrono::{
    DateTime,
    TimeDelta,
    Utc,
};
use mongo_monitor_config::StorageDriver;
use mongo_monitor_sampler::{
    store,
    Counter,
    CounterValues,
    Poller,
    RawCounters,
    Sampler,
    SamplerSettings,
    ScriptedSource,
    SourceError,
    StoreError,
    StoreReader,
    TickOutcome,
};
use pretty_assertions::assert_eq;
use std::{
    sync::{
        Arc,
        Mutex,
    },
    time::Duration,
};
use tokio_util::sync::CancellationToken;

fn snapshot(second: i64, inserts: f64) -> RawCounters {
    RawCounters::new(
        CounterValues::default().with(Counter::Insert, inserts),
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap() + TimeDelta::seconds(second),
    )
}

fn inserts(reader: &StoreReader, count: usize) -> Result<Vec<f64>, StoreError> {
    reader
        .fetch_last_n(count)
        .map(|records| records.iter().map(|r| r.rate(Counter::Insert)).collect())
}

#[tokio::test]
async fn three_scripted_ticks_publish_two_rates() {
    let shared = store::create(StorageDriver::Memory, 60);
    let reader = StoreReader::new(shared.clone());
    let source = ScriptedSource::from_snapshots([snapshot(0, 0.0), snapshot(1, 10.0), snapshot(2, 25.0)]);
    let mut sampler = Sampler::new(source, shared, SamplerSettings::default());

    assert_eq!(sampler.tick().await, TickOutcome::Bootstrapped);
    assert_eq!(reader.fetch_last(), Err(StoreError::Empty));

    assert!(matches!(sampler.tick().await, TickOutcome::Published(_)));
    assert_eq!(inserts(&reader, 10), Ok(vec![10.0]));

    assert!(matches!(sampler.tick().await, TickOutcome::Published(_)));
    assert_eq!(inserts(&reader, 10), Ok(vec![10.0, 15.0]));
    assert_eq!(reader.fetch_last().unwrap().rate(Counter::Insert), 15.0);
}

#[tokio::test]
async fn sampler_and_poller_run_side_by_side() {
    let shared = store::create(StorageDriver::Memory, 60);
    let source = ScriptedSource::new([
        Ok(snapshot(0, 0.0)),
        Err(SourceError::ConnectionFailure("connection reset".to_string())),
        Ok(snapshot(2, 20.0)),
        Ok(snapshot(3, 50.0)),
    ]);
    let settings = SamplerSettings {
        period: Duration::from_millis(2),
        fetch_timeout: Duration::from_millis(2),
    };
    let cancel = CancellationToken::new();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let poller = Poller::new(StoreReader::new(shared.clone()), Duration::from_millis(1));
    let consumer = tokio::spawn({
        let seen = seen.clone();
        let cancel = cancel.clone();
        async move {
            poller
                .run_last(cancel, move |record| {
                    let mut seen = seen.lock().unwrap();
                    if seen.last() != Some(&record) {
                        seen.push(record);
                    }
                })
                .await
        }
    });
    let sampler = tokio::spawn(Sampler::new(source, shared.clone(), settings).run(cancel.clone()));

    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();
    sampler.await.unwrap();
    consumer.await.unwrap();

    let reader = StoreReader::new(shared);
    assert_eq!(inserts(&reader, 10), Ok(vec![10.0, 30.0]));
    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|record| [10.0, 30.0].contains(&record.rate(Counter::Insert))));
}
