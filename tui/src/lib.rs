#[macro_use]
extern crate tracing;

mod tui;

use eyre::Context as _;
use mongo_monitor_config::Config;
use mongo_monitor_sampler::{
    Poller,
    StoreReader,
};
pub use tui::{
    restore_terminal,
    App,
    Tui,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Runs the dashboard until the user quits or `cancel` fires. Quitting
/// cancels `cancel` so the rest of the process shuts down too.
pub async fn start_tui(config: Config, reader: StoreReader, cancel: CancellationToken) -> eyre::Result<()> {
    let (metrics_tx, metrics_rx) = watch::channel(Vec::new());

    let feed = tokio::spawn({
        let poller = Poller::new(reader, config.refresh_interval);
        let chart_points = config.chart_points;
        let cancel = cancel.clone();
        async move {
            poller
                .run_last_n(chart_points, cancel, move |records| {
                    metrics_tx.send_replace(records);
                })
                .await
        }
    });

    let result = match App::new(config, metrics_rx) {
        Ok(mut app) => app.run(cancel.clone()).await,
        Err(err) => Err(err),
    };
    cancel.cancel();
    feed.await.context("Dashboard feed task failed")?;

    result
}
