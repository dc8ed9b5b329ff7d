//! [`SnapshotSource`] backed by MongoDB's `serverStatus` command.

use crate::{
    counters::{
        Counter,
        CounterValues,
        RawCounters,
    },
    source::{
        with_deadline,
        SnapshotFuture,
        SnapshotSource,
        SourceError,
    },
};
use chrono::{
    DateTime,
    Utc,
};
use mongodb::{
    bson::{
        doc,
        Bson,
        Document,
    },
    error::{
        Error as MongoError,
        ErrorKind,
    },
    options::ClientOptions,
    Client,
    Database,
};
use std::time::Duration;

const OPCOUNTERS: [(Counter, &str); 6] = [
    (Counter::Insert, "insert"),
    (Counter::Query, "query"),
    (Counter::Update, "update"),
    (Counter::Delete, "delete"),
    (Counter::Getmore, "getmore"),
    (Counter::Command, "command"),
];

#[derive(Debug, Clone)]
pub struct MongoSource {
    admin: Database,
}

impl MongoSource {
    /// Connects to `uri` and pings the server. Failing here means the monitor
    /// cannot run at all.
    pub async fn connect(uri: &str, timeout: Duration) -> Result<Self, SourceError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|err| SourceError::ConnectionFailure(format!("invalid uri {}: {err}", redact(uri))))?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options).map_err(classify)?;
        let admin = client.database("admin");

        with_deadline(timeout, async {
            admin.run_command(doc! { "ping": 1 }).await.map_err(classify)
        })
        .await?;
        info!("Connected to {}", redact(uri));

        Ok(Self { admin })
    }
}

impl SnapshotSource for MongoSource {
    fn fetch_snapshot(&mut self, deadline: Duration) -> SnapshotFuture<'_> {
        Box::pin(async move {
            let status = with_deadline(deadline, async {
                self.admin
                    .run_command(doc! { "serverStatus": 1, "recordStats": 0 })
                    .await
                    .map_err(classify)
            })
            .await?;
            parse_server_status(&status)
        })
    }

    fn name(&self) -> &'static str {
        "mongodb"
    }
}

/// Extracts the tracked counters from a `serverStatus` reply.
pub fn parse_server_status(status: &Document) -> Result<RawCounters, SourceError> {
    let mut values = CounterValues::default();

    let opcounters = section(status, "opcounters")?;
    for (counter, key) in OPCOUNTERS {
        values.set(counter, number(opcounters, key)?);
    }

    let network = section(status, "network")?;
    values.set(Counter::NetworkIn, number(network, "bytesIn")?);
    values.set(Counter::NetworkOut, number(network, "bytesOut")?);

    // Only WiredTiger reports checkpoints; other engines count as zero.
    let checkpoints = match status.get_document("wiredTiger") {
        Ok(wired_tiger) => number(section(wired_tiger, "transaction")?, "transaction checkpoints")?,
        Err(_) => 0.0,
    };
    values.set(Counter::Checkpoint, checkpoints);

    let local_time = status
        .get_datetime("localTime")
        .map_err(|err| SourceError::ProtocolError(format!("localTime: {err}")))?;
    let taken_at = DateTime::<Utc>::from_timestamp_millis(local_time.timestamp_millis())
        .ok_or_else(|| SourceError::ProtocolError(format!("localTime out of range: {local_time}")))?;

    Ok(RawCounters::new(values, taken_at))
}

fn section<'a>(document: &'a Document, key: &str) -> Result<&'a Document, SourceError> {
    document
        .get_document(key)
        .map_err(|err| SourceError::ProtocolError(format!("{key}: {err}")))
}

fn number(document: &Document, key: &str) -> Result<f64, SourceError> {
    match document.get(key) {
        Some(Bson::Double(value)) => Ok(*value),
        Some(Bson::Int32(value)) => Ok(f64::from(*value)),
        Some(Bson::Int64(value)) => Ok(*value as f64),
        Some(other) => Err(SourceError::ProtocolError(format!(
            "{key} is not a number: {other}"
        ))),
        None => Err(SourceError::ProtocolError(format!("{key} is missing"))),
    }
}

fn classify(err: MongoError) -> SourceError {
    match *err.kind {
        ErrorKind::Io(_) | ErrorKind::ServerSelection { .. } | ErrorKind::ConnectionPoolCleared { .. } => {
            SourceError::ConnectionFailure(err.to_string())
        }
        _ => SourceError::ProtocolError(err.to_string()),
    }
}

/// Drops the credentials from a connection string before it is logged.
fn redact(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let authority_start = scheme_end + 3;
    let authority_end = uri[authority_start..]
        .find(['/', '?'])
        .map_or(uri.len(), |end| authority_start + end);
    match uri[authority_start..authority_end].rfind('@') {
        Some(at) => format!("{}://***@{}", &uri[..scheme_end], &uri[authority_start + at + 1..]),
        None => uri.to_string(),
    }
}
