use anyhow::{anyhow, Context, Result};

use crate::{cache::Cache, config::Settings};

/// Returns the document stored under `key` verbatim.
pub fn get(key: &str, settings: &Settings) -> Result<String> {
    let cache = settings.open_cache()?;
    let bytes = cache
        .get(key)?
        .ok_or_else(|| anyhow!("Nothing stored under key `{}`", key))?;

    String::from_utf8(bytes).with_context(|| format!("value under key `{}` is not UTF-8", key))
}

// -- Tests -------------------------------------------------------------------
