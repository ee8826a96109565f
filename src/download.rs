//! Fetches remote source files to local temporary storage.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Error, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::cli::create_spinner;

const DEFAULT_FILE_NAME: &str = "download";

/// Streams the response body to `file_path`, switching the spinner to a
/// progress bar when the server reports a content length.
pub async fn download_file(url: &str, file_path: &Path, progress_bar: &ProgressBar) -> Result<u64, Error> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        return Err(anyhow!("Failed to download {}: {}", url, response.status()));
    }

    let total_size = response.content_length().unwrap_or(0);
    if total_size > 0 {
        progress_bar.set_length(total_size);
        progress_bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {eta}")?
                .progress_chars("=> "),
        );
    }

    let mut file = File::create(file_path)?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.context("Error reading chunk")?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        progress_bar.set_position(downloaded);
    }
    file.flush()?;

    Ok(downloaded)
}

/// Downloads `url` into `dir` and returns the path of the saved file.
pub async fn fetch_to_dir(url: &str, dir: &Path) -> Result<PathBuf> {
    let file_path = dir.join(file_name_from_url(url));

    let bar = create_spinner(format!("Downloading {}...", url));
    let bytes = download_file(url, &file_path, &bar).await?;
    bar.finish_with_message("Download complete");
    info!(url, bytes, path = %file_path.display(), "source downloaded");

    Ok(file_path)
}

/// Last path segment of the URL without query or fragment.
pub fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && !name.contains(':'))
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string()
}

// -- Tests -------------------------------------------------------------------
