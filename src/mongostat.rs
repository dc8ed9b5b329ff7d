use crate::stat_logger;
use color_eyre::Result;
use eyre::Context as _;
use mongo_monitor_config::Config;
use mongo_monitor_sampler::{
    store,
    MongoSource,
    Sampler,
    SamplerSettings,
    StoreReader,
};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Connects, then runs the sampler next to one consumer until Ctrl-C, the
/// dashboard quitting, or either task ending.
pub async fn run(config: Config) -> Result<()> {
    let source = MongoSource::connect(&config.uri, config.connect_timeout)
        .await
        .context("Failed to connect to MongoDB")?;

    let store = store::create(config.storage, config.history_capacity);
    let reader = StoreReader::new(store.clone());
    let cancel = CancellationToken::new();

    let sampler = Sampler::new(
        source,
        store,
        SamplerSettings {
            period: config.sample_interval,
            fetch_timeout: config.fetch_timeout,
        },
    );

    let mut tasks = JoinSet::new();
    tasks.spawn({
        let cancel = cancel.clone();
        async move {
            sampler.run(cancel).await;
            Ok(())
        }
    });

    if config.ui {
        let config = config.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move { mongo_monitor_tui::start_tui(config, reader, cancel).await });
    } else {
        let cancel = cancel.clone();
        let interval = config.log_interval;
        tasks.spawn(async move {
            stat_logger::run(reader, interval, cancel).await;
            Ok(())
        });
    }

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                result = tokio::signal::ctrl_c() => {
                    if let Err(err) = result {
                        error!("Failed to listen for Ctrl-C: {err}");
                    }
                    info!("Shutting down");
                    cancel.cancel();
                }
            }
        }
    });

    let mut result = Ok(());
    while let Some(joined) = tasks.join_next().await {
        cancel.cancel();
        match joined.context("Task panicked") {
            Ok(Ok(())) => {}
            Ok(Err(err)) | Err(err) => {
                error!("{err:?}");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
    }

    result
}
