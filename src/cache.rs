//! Key-value persistence for finished documents.

use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::CacheError;

/// Store and retrieve values by key.
pub trait Cache {
    /// Returns the stored value, or `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), CacheError>;
}

/// Keys become file names, so they are restricted to a safe alphabet.
pub fn validate_key(key: &str) -> Result<(), CacheError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(CacheError::InvalidKey {
            key: key.to_string(),
        })
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn open(dir: &Path) -> Result<Self, CacheError> {
        fs::create_dir_all(dir).map_err(|source| CacheError::Open {
            path: dir.to_path_buf(),
            source,
        })?;

        Ok(FileCache {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        validate_key(key)?;

        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        validate_key(key)?;
        let write_error = |source| CacheError::Write {
            key: key.to_string(),
            source,
        };

        // Write next to the target and rename, so readers never see a partial value
        let mut file = NamedTempFile::new_in(&self.dir).map_err(write_error)?;
        file.write_all(value).map_err(write_error)?;
        file.persist(self.path_for(key))
            .map_err(|e| write_error(e.error))?;

        debug!(key, bytes = value.len(), "cache value written");
        Ok(())
    }
}

/// In-process cache.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

// -- Tests -------------------------------------------------------------------
