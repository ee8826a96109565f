use anyhow::Result;
use clap::Args;

use super::{publish, InputArgs, OutputArgs};
use crate::{
    config::Settings,
    connectors::covid::{self, CovidOptions, Selection},
    deserialise::read_rows,
    document::{accessed_now, Document},
    metrics::Smoothing,
};

#[derive(Args, Debug, Clone)]
pub struct CovidArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// `All`, `top20`, `regions` or a comma separated list of countries
    #[arg(long)]
    pub countries: Option<String>,

    /// With `All`, emit only per-country totals
    #[arg(long)]
    pub summary_only: bool,

    #[arg(long, value_enum, default_value_t = Smoothing::Trailing7)]
    pub smoothing: Smoothing,
}

pub async fn covid(args: &CovidArgs, settings: &Settings) -> Result<String> {
    let table = settings.population_table()?;
    let selection = Selection::parse(args.countries.as_deref(), args.summary_only, &table)?;

    let input = args.input.fetch().await?;
    let rows = read_rows(input.path())?;
    let data = covid::build(
        &rows,
        &table,
        CovidOptions {
            selection: &selection,
            smoothing: args.smoothing,
        },
    )?;

    let provenance = covid::provenance().with_overrides(&args.output.overrides());
    publish(
        &Document::new(provenance, accessed_now(), data),
        &args.output,
        settings,
    )
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use std::io::Write;

    use super::*;
    use crate::cache::Cache;
    use tempfile::{NamedTempFile, TempDir};

    fn source_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Province/State,Country/Region,Lat,Long,3/1/20,3/2/20").unwrap();
        writeln!(file, ",Norway,60.4,8.4,10,12").unwrap();
        writeln!(file, ",\"Korea, South\",36.0,128.0,3,7").unwrap();
        file
    }

    fn args(file: &NamedTempFile, key: Option<&str>, countries: Option<&str>) -> CovidArgs {
        CovidArgs {
            input: InputArgs {
                file: Some(file.path().to_path_buf()),
                url: None,
            },
            output: OutputArgs {
                key: key.map(str::to_string),
                ..OutputArgs::default()
            },
            countries: countries.map(str::to_string),
            summary_only: false,
            smoothing: Smoothing::Trailing7,
        }
    }

    #[tokio::test]
    async fn should_store_document_under_key() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::resolve(Some(dir.path().to_path_buf()), None).unwrap();
        let file = source_file();

        let message = covid(&args(&file, Some("covid"), None), &settings).await.unwrap();

        assert!(message.starts_with("Stored"));
        let stored = settings.open_cache().unwrap().get("covid").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&stored).unwrap();
        assert_eq!(value["data"][1]["country"], "South Korea");
        assert!(value["source"].as_str().unwrap().contains("Johns Hopkins"));
    }

    #[tokio::test]
    async fn should_reject_unknown_country() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::resolve(Some(dir.path().to_path_buf()), None).unwrap();
        let file = source_file();

        let result = covid(&args(&file, None, Some("Atlantis")), &settings).await;

        assert!(result.is_err());
    }
}
