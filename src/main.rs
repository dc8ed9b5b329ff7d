use clap::Parser;
use color_eyre::Result;
use mongo_monitor::{
    init_errors,
    log_init,
    run,
};
use mongo_monitor_config::{
    Args,
    Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    let args = Args::parse();
    let command = args.command.clone();
    let config = Config::new(args)?;
    log_init(&config)?;
    run(command, config).await
}
