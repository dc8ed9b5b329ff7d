use crate::counters::RawCounters;
use std::{
    collections::VecDeque,
    future::Future,
    pin::Pin,
    time::Duration,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("no snapshot within {0:?}")]
    Timeout(Duration),
    #[error("connection failure: {0}")]
    ConnectionFailure(String),
    #[error("protocol error: {0}")]
    ProtocolError(String),
}

pub type SnapshotFuture<'a> = Pin<Box<dyn Future<Output = Result<RawCounters, SourceError>> + Send + 'a>>;

/// Anything that can report the server's cumulative counters.
pub trait SnapshotSource: Send {
    /// Fetch the current counters, giving up once `deadline` has elapsed.
    fn fetch_snapshot(&mut self, deadline: Duration) -> SnapshotFuture<'_>;

    fn name(&self) -> &'static str;
}

/// Runs `future` to completion or fails with [`SourceError::Timeout`].
pub async fn with_deadline<T, F>(deadline: Duration, future: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    tokio::time::timeout(deadline, future)
        .await
        .unwrap_or(Err(SourceError::Timeout(deadline)))
}

/// Replays a fixed list of results, one per fetch. Once the script runs out
/// every fetch fails with a connection failure.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<Result<RawCounters, SourceError>>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Result<RawCounters, SourceError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn from_snapshots(snapshots: impl IntoIterator<Item = RawCounters>) -> Self {
        Self::new(snapshots.into_iter().map(Ok))
    }

    pub fn push(&mut self, result: Result<RawCounters, SourceError>) {
        self.script.push_back(result);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl SnapshotSource for ScriptedSource {
    fn fetch_snapshot(&mut self, _deadline: Duration) -> SnapshotFuture<'_> {
        let next = self
            .script
            .pop_front()
            .unwrap_or_else(|| Err(SourceError::ConnectionFailure("script exhausted".to_string())));
        Box::pin(async move { next })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::CounterValues;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn deadline_turns_into_timeout() {
        let deadline = Duration::from_millis(10);
        let result: Result<(), _> = with_deadline(deadline, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(SourceError::Timeout(deadline)));
    }

    #[tokio::test]
    async fn scripted_source_replays_then_fails() {
        let snapshot = RawCounters::new(CounterValues::default(), Utc::now());
        let mut source = ScriptedSource::new([
            Ok(snapshot.clone()),
            Err(SourceError::ProtocolError("garbled".to_string())),
        ]);

        assert_eq!(source.fetch_snapshot(Duration::from_secs(1)).await, Ok(snapshot));
        assert!(matches!(
            source.fetch_snapshot(Duration::from_secs(1)).await,
            Err(SourceError::ProtocolError(_))
        ));
        assert!(matches!(
            source.fetch_snapshot(Duration::from_secs(1)).await,
            Err(SourceError::ConnectionFailure(_))
        ));
        assert_eq!(source.remaining(), 0);
    }
}
