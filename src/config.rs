//! Runtime settings resolved from flags, environment and platform defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::{cache::FileCache, population::PopulationTable};

const APP_DIR: &str = "chartfeed";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub cache_dir: PathBuf,
    /// Alternative population table. The embedded table is used when absent.
    pub population: Option<PathBuf>,
}

impl Settings {
    /// Explicit values win; the cache falls back to the platform cache dir.
    pub fn resolve(cache_dir: Option<PathBuf>, population: Option<PathBuf>) -> Result<Self> {
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => default_cache_dir()?,
        };
        debug!(cache_dir = %cache_dir.display(), "settings resolved");

        Ok(Settings {
            cache_dir,
            population,
        })
    }

    pub fn population_table(&self) -> Result<PopulationTable> {
        let table = match &self.population {
            Some(path) => PopulationTable::from_path(path)
                .with_context(|| format!("loading population table {}", path.display()))?,
            None => PopulationTable::embedded().context("loading embedded population table")?,
        };
        debug!(countries = table.len(), "population table loaded");
        Ok(table)
    }

    pub fn open_cache(&self) -> Result<FileCache> {
        Ok(FileCache::open(&self.cache_dir)?)
    }
}

fn default_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
        .map(|base| base.join(APP_DIR))
        .context("no cache directory available, pass --cache-dir")
}

// -- Tests -------------------------------------------------------------------
