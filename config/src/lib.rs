#[macro_use]
extern crate tracing;

mod app_config;
mod args;
mod duration;
mod storage;

use app_config::AppConfig;
pub use app_config::{
    get_config_dir,
    get_data_dir,
};
pub use args::{
    Args,
    Command,
    MongostatArgs,
};
use color_eyre::Result;
use eyre::{
    ensure,
    Context as _,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    collections::HashMap,
    path::Path,
    time::Duration,
};
pub use storage::StorageDriver;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten, skip_serializing)]
    pub app_config: AppConfig,
    pub uri: String,
    #[serde(default)]
    pub debug: bool,
    /// Dashboard instead of log lines.
    #[serde(default)]
    pub ui: bool,
    #[serde(default)]
    pub storage: StorageDriver,
    /// Derived samples kept before the oldest is evicted.
    pub history_capacity: usize,
    /// Deadline for the initial connection and ping.
    #[serde(with = "duration")]
    pub connect_timeout: Duration,
    #[serde(with = "duration")]
    pub sample_interval: Duration,
    #[serde(with = "duration")]
    pub fetch_timeout: Duration,
    #[serde(with = "duration")]
    pub log_interval: Duration,
    #[serde(with = "duration")]
    pub refresh_interval: Duration,
    /// Samples plotted by the dashboard chart.
    pub chart_points: usize,
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl config::Source for Config {
    fn clone_into_box(&self) -> Box<dyn config::Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let mut cache = HashMap::<String, config::Value>::new();
        cache.insert("uri".to_string(), self.uri.clone().into());
        cache.insert("debug".to_string(), self.debug.into());
        cache.insert("ui".to_string(), self.ui.into());
        cache.insert("storage".to_string(), self.storage.to_string().into());
        cache.insert("history_capacity".to_string(), (self.history_capacity as u64).into());
        for (key, value) in [
            ("connect_timeout", self.connect_timeout),
            ("sample_interval", self.sample_interval),
            ("fetch_timeout", self.fetch_timeout),
            ("log_interval", self.log_interval),
            ("refresh_interval", self.refresh_interval),
        ] {
            cache.insert(key.to_string(), humantime::format_duration(value).to_string().into());
        }
        cache.insert("chart_points".to_string(), (self.chart_points as u64).into());
        Ok(cache)
    }
}

impl Config {
    /// Layers the built-in defaults, `config.yaml` from the config directory
    /// and the command line, in that order.
    pub fn new(args: Args) -> Result<Self> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?;

        builder = builder.add_source(Config::default());

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        let cfg = Self::with_args(builder, args)?;
        debug!(?cfg, "Configuration loaded");

        Ok(cfg)
    }

    /// Puts `args` on top of `builder` and validates the result.
    ///
    /// A sampling period from the command line also caps the fetch timeout,
    /// unless the timeout was given on the command line as well.
    fn with_args(builder: config::ConfigBuilder<config::builder::DefaultState>, args: Args) -> Result<Self> {
        let mongostat = args.mongostat().clone();
        let mut cfg: Self = builder
            .add_source(args)
            .build()?
            .try_deserialize()
            .context("Failed to load configuration")?;

        if mongostat.interval.is_some() && mongostat.fetch_timeout.is_none() && cfg.fetch_timeout > cfg.sample_interval {
            debug!(
                fetch_timeout = ?cfg.sample_interval,
                "Shortening the fetch timeout to the sampling period"
            );
            cfg.fetch_timeout = cfg.sample_interval;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.uri.trim().is_empty(), "uri must not be empty");
        ensure!(self.history_capacity > 0, "history_capacity must be at least 1");
        ensure!(self.chart_points > 0, "chart_points must be at least 1");
        for (name, value) in [
            ("connect_timeout", self.connect_timeout),
            ("sample_interval", self.sample_interval),
            ("fetch_timeout", self.fetch_timeout),
            ("log_interval", self.log_interval),
            ("refresh_interval", self.refresh_interval),
        ] {
            ensure!(!value.is_zero(), "{name} must be longer than zero");
        }
        ensure!(
            self.fetch_timeout <= self.sample_interval,
            "fetch_timeout ({}) must not exceed sample_interval ({})",
            humantime::format_duration(self.fetch_timeout),
            humantime::format_duration(self.sample_interval),
        );
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.app_config.data_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.app_config.config_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.uri, "mongodb://127.0.0.1:27017");
        assert_eq!(config.storage, StorageDriver::Memory);
        assert_eq!(config.sample_interval, Duration::from_secs(1));
        assert_eq!(config.fetch_timeout, Duration::from_millis(900));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.history_capacity, 600);
        assert_eq!(config.chart_points, 50);
        assert!(!config.ui);
        config.validate().unwrap();
    }

    #[test]
    fn args_override_defaults() {
        let args = Args::parse_from([
            "mongo-monitor",
            "--uri",
            "mongodb://db.internal:27018",
            "mongostat",
            "--ui",
            "--interval",
            "2s",
            "--history",
            "30",
        ]);
        let cfg: Config = config::Config::builder()
            .add_source(Config::default())
            .add_source(args)
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.uri, "mongodb://db.internal:27018");
        assert!(cfg.ui);
        assert!(!cfg.debug);
        assert_eq!(cfg.sample_interval, Duration::from_secs(2));
        assert_eq!(cfg.history_capacity, 30);
        assert_eq!(cfg.refresh_interval, Duration::from_millis(250));
    }

    fn with_args(args: &[&str]) -> Result<Config> {
        Config::with_args(
            config::Config::builder().add_source(Config::default()),
            Args::parse_from(args.iter().copied()),
        )
    }

    #[test]
    fn short_interval_shortens_the_fetch_timeout() {
        let cfg = with_args(&["mongo-monitor", "mongostat", "--interval", "500ms"]).unwrap();
        assert_eq!(cfg.sample_interval, Duration::from_millis(500));
        assert_eq!(cfg.fetch_timeout, Duration::from_millis(500));
        cfg.validate().unwrap();
    }

    #[test]
    fn long_interval_keeps_the_fetch_timeout() {
        let cfg = with_args(&["mongo-monitor", "mongostat", "--interval", "5s"]).unwrap();
        assert_eq!(cfg.fetch_timeout, Duration::from_millis(900));
    }

    #[test]
    fn explicit_fetch_timeout_is_not_shortened() {
        let cfg = with_args(&[
            "mongo-monitor",
            "mongostat",
            "--interval",
            "500ms",
            "--fetch-timeout",
            "200ms",
        ])
        .unwrap();
        assert_eq!(cfg.fetch_timeout, Duration::from_millis(200));

        let err = with_args(&[
            "mongo-monitor",
            "mongostat",
            "--interval",
            "500ms",
            "--fetch-timeout",
            "800ms",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("fetch_timeout"), "{err}");
    }

    #[test]
    fn rejects_timeout_longer_than_period() {
        let config = Config {
            fetch_timeout: Duration::from_secs(5),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fetch_timeout"));
    }

    #[test]
    fn rejects_empty_history() {
        let config = Config {
            history_capacity: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
