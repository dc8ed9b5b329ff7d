use eyre::{
    Context as _,
    OptionExt as _,
    Result,
};
use mongo_monitor_config::Config;
use tracing_subscriber::{
    fmt,
    prelude::*,
    EnvFilter,
};
use tui_logger::TuiLoggerFile;

lazy_static::lazy_static! {
    static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Routes tracing output to the dashboard's log tab (and a log file) when the
/// dashboard runs, to stdout otherwise.
pub fn log_init(config: &Config) -> Result<()> {
    if config.ui {
        dashboard_logging(config)
    } else {
        stdout_logging(config)
    }
}

fn dashboard_logging(config: &Config) -> Result<()> {
    let directory = config.data_dir();
    std::fs::create_dir_all(directory).context("Failed to create data directory")?;
    let log_path = directory.join(LOG_FILE.as_str());
    if log_path.exists() {
        std::fs::remove_file(&log_path).context("Failed to remove existing log file")?;
    }
    let log_path = log_path.to_str().ok_or_eyre("Log file path is not valid UTF-8")?;

    let level = if config.debug {
        tui_logger::LevelFilter::Debug
    } else {
        tui_logger::LevelFilter::Info
    };
    tui_logger::init_logger(tui_logger::LevelFilter::Trace).context("Failed to initialize tui logger")?;
    tui_logger::set_default_level(level);
    tui_logger::set_level_for_target("mongodb", tui_logger::LevelFilter::Warn);
    tui_logger::set_log_file(TuiLoggerFile::new(log_path));

    tracing_subscriber::registry()
        .with(tracing_error::ErrorLayer::default())
        .with(tui_logger::TuiTracingSubscriberLayer)
        .try_init()
        .context("Failed to initialize tracing subscriber")
}

fn stdout_logging(config: &Config) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(config.debug)).context("Invalid log filter")?,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(filter))
        .with(tracing_error::ErrorLayer::default())
        .try_init()
        .context("Failed to initialize tracing subscriber")
}

fn default_directives(debug: bool) -> &'static str {
    if debug {
        "debug,mongodb=info"
    } else {
        "info,mongodb=warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_parse() {
        for debug in [false, true] {
            assert!(EnvFilter::try_new(default_directives(debug)).is_ok(), "{debug}");
        }
    }
}
