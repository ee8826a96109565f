use anyhow::Result;
use clap::Args;

use super::{publish, InputArgs, OutputArgs};
use crate::{
    config::Settings,
    connectors::carbon::{self, EntityFilter, Layout},
    deserialise::read_rows,
    document::{accessed_now, Document},
};

#[derive(Args, Debug, Clone)]
pub struct CarbonArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    #[arg(long, value_enum, default_value_t = Layout::National)]
    pub layout: Layout,

    /// `G20`, `Regions` or a comma separated list of columns to keep
    #[arg(long)]
    pub countries: Option<String>,
}

pub async fn carbon(args: &CarbonArgs, settings: &Settings) -> Result<String> {
    let filter = args
        .countries
        .as_deref()
        .map(EntityFilter::parse)
        .unwrap_or_default();

    let input = args.input.fetch().await?;
    let rows = read_rows(input.path())?;
    let table = carbon::build(&rows, args.layout, &filter);

    let mut provenance = carbon::provenance(args.layout);
    if !table.source.is_empty() {
        provenance.source = table.source;
    }
    let provenance = provenance.with_overrides(&args.output.overrides());

    publish(
        &Document::new(provenance, accessed_now(), table.entities),
        &args.output,
        settings,
    )
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use std::io::Write;

    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn should_use_source_notes_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ",Cite as: Global Carbon Project 2019,").unwrap();
        writeln!(file, ",Afghanistan,Norway").unwrap();
        writeln!(file, "1959,10,2").unwrap();
        let settings = Settings::resolve(Some(std::env::temp_dir()), None).unwrap();
        let args = CarbonArgs {
            input: InputArgs {
                file: Some(file.path().to_path_buf()),
                url: None,
            },
            output: OutputArgs::default(),
            layout: Layout::National,
            countries: Some("Norway".to_string()),
        };

        let json = carbon(&args, &settings).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"], "Global Carbon Project 2019 /");
        assert_eq!(value["data"][0]["country"], "Norway");
        assert_eq!(value["data"][0]["data"][0]["t"], 1959);
        assert_eq!(value["data"][0]["data"][0]["y"], 7.32);
    }
}
