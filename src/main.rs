use std::io::IsTerminal;

use anyhow::{Error, Result};
use chartfeed::{
    cli::{command, Cli, Commands},
    config::Settings,
    logging::{init_logging, LogConfig},
};
use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_ansi(std::io::stderr().is_terminal());
    init_logging(&log_config)?;
    let settings = Settings::resolve(cli.cache_dir.clone(), cli.population.clone())?;
    debug!(?settings, "starting");

    let output = match &cli.command {
        Commands::Covid(args) => command::covid(args, &settings).await?,
        Commands::Co2Daily(args) => command::co2_daily(args, &settings).await?,
        Commands::Carbon(args) => command::carbon(args, &settings).await?,
        Commands::Ecdc(args) => command::ecdc(args, &settings).await?,
        Commands::Vaccines(args) => command::vaccines(args, &settings).await?,
        Commands::Get { key } => command::get(key, &settings)?,
    };
    println!("{}", output);

    Ok(())
}
