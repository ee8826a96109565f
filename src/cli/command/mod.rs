pub mod carbon;
pub mod co2;
pub mod covid;
pub mod ecdc;
pub mod get;
pub mod vaccines;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tempfile::TempDir;
use tracing::info;

use crate::{
    cache::Cache,
    config::Settings,
    document::{Document, ProvenanceOverrides},
    download::fetch_to_dir,
};

pub use carbon::carbon;
pub use co2::co2_daily;
pub use covid::covid;
pub use ecdc::ecdc;
pub use get::get;
pub use vaccines::vaccines;

/// Where the source file comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Local source file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Download the source file first
    #[arg(long)]
    pub url: Option<String>,
}

/// A source file on disk. Downloads live in a temp dir removed on drop.
#[derive(Debug)]
pub struct Input {
    path: PathBuf,
    _download_dir: Option<TempDir>,
}

impl Input {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InputArgs {
    pub async fn fetch(&self) -> Result<Input> {
        match (&self.file, &self.url) {
            (Some(file), _) => Ok(Input {
                path: file.clone(),
                _download_dir: None,
            }),
            (None, Some(url)) => {
                let dir = TempDir::new()?;
                let path = fetch_to_dir(url, dir.path()).await?;
                Ok(Input {
                    path,
                    _download_dir: Some(dir),
                })
            }
            (None, None) => anyhow::bail!("either --file or --url is required"),
        }
    }
}

/// Where the document goes and how its provenance is labelled.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Store under this cache key instead of printing
    #[arg(long)]
    pub key: Option<String>,

    #[arg(long)]
    pub source: Option<String>,

    #[arg(long)]
    pub link: Option<String>,

    #[arg(long)]
    pub license: Option<String>,

    #[arg(long)]
    pub info: Option<String>,
}

impl OutputArgs {
    pub fn overrides(&self) -> ProvenanceOverrides {
        ProvenanceOverrides {
            source: self.source.clone(),
            link: self.link.clone(),
            license: self.license.clone(),
            info: self.info.clone(),
        }
    }
}

/// Stores the document when a key is given, otherwise returns its JSON.
pub fn publish<T: Serialize>(
    document: &Document<T>,
    output: &OutputArgs,
    settings: &Settings,
) -> Result<String> {
    let json = document.to_json().context("serialising document")?;

    match &output.key {
        Some(key) => {
            let mut cache = settings.open_cache()?;
            store(&mut cache, key, &json)
        }
        None => Ok(json),
    }
}

pub fn store(cache: &mut impl Cache, key: &str, json: &str) -> Result<String> {
    cache.set(key, json.as_bytes())?;
    info!(key, bytes = json.len(), "document stored");

    Ok(format!("Stored {} bytes under key `{}`", json.len(), key))
}

// -- Tests -------------------------------------------------------------------
