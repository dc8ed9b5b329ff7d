#[macro_use]
extern crate tracing;

mod errors;
mod logging;
mod mongostat;
mod stat_logger;

pub use errors::init_errors;
pub use logging::log_init;
use mongo_monitor_config::{
    Command,
    Config,
};

/// Runs the subcommand chosen on the command line.
pub async fn run(command: Command, config: Config) -> color_eyre::Result<()> {
    match command {
        Command::Mongostat(_) => mongostat::run(config).await,
    }
}
