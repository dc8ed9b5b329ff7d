//! Sampling and rate derivation for MongoDB server counters.
//!
//! A [`Sampler`] fetches cumulative counters from a [`SnapshotSource`], turns
//! each consecutive pair into per-second rates with [`derive`] and appends the
//! result to a bounded [`MetricsStore`]. Consumers only ever get a
//! [`StoreReader`] and poll it on their own schedule, usually through a
//! [`Poller`].

#[macro_use]
extern crate tracing;

mod counters;
mod derive;
pub mod mongo;
mod poller;
mod sampler;
mod source;
pub mod store;

pub use counters::{
    Counter,
    CounterIter,
    CounterValues,
    DerivedMetrics,
    RawCounters,
};
pub use derive::{
    derive,
    DerivationError,
};
pub use mongo::MongoSource;
pub use poller::Poller;
pub use sampler::{
    Sampler,
    SamplerSettings,
    SamplerState,
    TickOutcome,
};
pub use source::{
    with_deadline,
    ScriptedSource,
    SnapshotFuture,
    SnapshotSource,
    SourceError,
};
pub use store::{
    MemoryStore,
    MetricsStore,
    SharedStore,
    StoreError,
    StoreReader,
};
