//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{ArgAction, Parser, Subcommand};
use indicatif::ProgressBar;

use crate::logging::LogFormat;
use command::{
    carbon::CarbonArgs, co2::Co2Args, covid::CovidArgs, ecdc::EcdcArgs, vaccines::VaccineArgs,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Reshapes public climate and health datasets into chart-ready JSON
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Directory holding stored documents
    #[arg(long, env = "CHARTFEED_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Population table to use instead of the built-in one
    #[arg(long, env = "CHARTFEED_POPULATION", global = true)]
    pub population: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// COVID-19 time series from the JHU CSSE repository
    Covid(CovidArgs),
    /// Daily CO2 measured at Mauna Loa
    Co2Daily(Co2Args),
    /// Global Carbon Budget emissions
    Carbon(CarbonArgs),
    /// ECDC sub-national notification rates
    Ecdc(EcdcArgs),
    /// COVID-19 vaccination progress from the JHU GovEx repository
    Vaccines(VaccineArgs),
    /// Print a stored document
    Get {
        /// Cache key
        key: String,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;
    use clap::CommandFactory;

    #[test]
    fn should_have_valid_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn should_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chartfeed",
            "get",
            "covid-top20",
            "-vv",
            "--cache-dir",
            "/tmp/feeds",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/feeds")));
        assert!(matches!(cli.command, Commands::Get { ref key } if key == "covid-top20"));
    }

    #[test]
    fn should_require_an_input() {
        assert!(Cli::try_parse_from(["chartfeed", "co2-daily"]).is_err());
        assert!(Cli::try_parse_from([
            "chartfeed",
            "co2-daily",
            "--file",
            "a.txt",
            "--url",
            "https://example.org/a.txt"
        ])
        .is_err());
    }

    #[test]
    fn should_parse_vaccine_flags() {
        let cli = Cli::try_parse_from([
            "chartfeed",
            "vaccines",
            "--file",
            "vax.csv",
            "--countries",
            "Norway,Burma",
            "--full",
            "--xy",
        ])
        .unwrap();

        let Commands::Vaccines(args) = cli.command else {
            panic!("expected the vaccines command");
        };
        assert!(args.full && args.xy);
        assert!(!args.partial && !args.doses);
        assert_eq!(args.countries.as_deref(), Some("Norway,Burma"));
    }
}
