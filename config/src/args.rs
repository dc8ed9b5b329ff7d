use clap::{
    Parser,
    Subcommand,
};
use std::time::Duration;

/// Watch a MongoDB server's operation, network and checkpoint rates.
#[derive(Parser, Debug, Clone)]
#[command(author, version = version(), about, long_about = None)]
pub struct Args {
    /// Connection string of the server to monitor.
    #[clap(long, env = "MONGO_MONITOR_URI", value_name = "URI", global = true)]
    pub uri: Option<String>,

    /// Log at debug level.
    #[clap(long = "debug", action, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sample the server like `mongostat`, as log lines or as a dashboard.
    Mongostat(MongostatArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct MongostatArgs {
    /// Show the interactive dashboard instead of log lines.
    #[clap(long, action)]
    pub ui: bool,

    /// Sampling period, e.g. `500ms` or `2s`.
    #[clap(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Deadline for a single sample. Defaults to the configured timeout,
    /// shortened to the sampling period if that is shorter.
    #[clap(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub fetch_timeout: Option<Duration>,

    /// Number of derived samples kept in memory.
    #[clap(long, value_name = "N")]
    pub history: Option<usize>,
}

impl Args {
    pub fn mongostat(&self) -> &MongostatArgs {
        let Command::Mongostat(mongostat) = &self.command;
        mongostat
    }
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(uri) = &self.uri {
                cache.insert("uri".to_string(), uri.clone().into());
            }
            if self.debug {
                cache.insert("debug".to_string(), true.into());
            }
            let mongostat = self.mongostat();
            if mongostat.ui {
                cache.insert("ui".to_string(), true.into());
            }
            if let Some(interval) = mongostat.interval {
                cache.insert(
                    "sample_interval".to_string(),
                    humantime::format_duration(interval).to_string().into(),
                );
            }
            if let Some(fetch_timeout) = mongostat.fetch_timeout {
                cache.insert(
                    "fetch_timeout".to_string(),
                    humantime::format_duration(fetch_timeout).to_string().into(),
                );
            }
            if let Some(history) = mongostat.history {
                cache.insert("history_capacity".to_string(), (history as u64).into());
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let version = clap::crate_version!();
    let config_dir_path = crate::get_config_dir().display().to_string();
    let data_dir_path = crate::get_data_dir().display().to_string();

    format!(
        "\
{version}

Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}"
    )
}
