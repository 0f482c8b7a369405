//! Extracted-page store and output files
//!
//! The extractor leaves one JSON page record per file in a flat directory.
//! [`PageStore`] lists that directory, loads records one by one and locates
//! the file behind a page URL. The free functions read and write the JSON and
//! text artifacts the tool produces.

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MigrationError;
use crate::page::PageRecord;
use crate::pipeline::PageFailure;

/// Longest file stem the extractor writes
const CRAWLER_STEM_MAX: usize = 100;

/// Records loaded from a store, with the files that could not be read
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub records: Vec<PageRecord>,
    pub errors: Vec<PageFailure>,
}

/// Directory of extracted page records
#[derive(Debug, Clone)]
pub struct PageStore {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl PageStore {
    /// Open an extracted-pages directory
    ///
    /// Lists `*.json` files sorted by name. Subdirectories are ignored.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::MissingFile` when the directory does not
    /// exist and `MigrationError::Io` when it cannot be listed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, MigrationError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(MigrationError::MissingFile(dir.display().to_string()));
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(|e| MigrationError::Io(format!("failed to read {}: {}", dir.display(), e)))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MigrationError::Io(format!("failed to read {}: {}", dir.display(), e)))?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        debug!("found {} page files in {}", files.len(), dir.display());
        Ok(Self { dir, files })
    }

    /// Page files in name order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Load one page record
    pub fn load(&self, path: &Path) -> Result<PageRecord, MigrationError> {
        read_json(path)
    }

    /// Load every page record, recording unreadable files instead of failing
    pub fn load_all(&self) -> LoadOutcome {
        let mut outcome = LoadOutcome::default();
        for path in &self.files {
            match self.load(path) {
                Ok(record) => outcome.records.push(record),
                Err(error) => {
                    warn!("error parsing {}: {}", path.display(), error);
                    outcome.errors.push(PageFailure {
                        source: path.display().to_string(),
                        error,
                    });
                }
            }
        }
        outcome
    }

    /// Locate the record file for a page URL
    ///
    /// Tries, in order: the URL with `/`, `:` and `#` replaced by `_`; the
    /// same without its query string; the URL without its fragment; the
    /// extractor's own naming (every non-alphanumeric character replaced by
    /// `_`, at most 100 characters). Falls back to the first file whose name
    /// contains the URL's last path segment.
    pub fn find_data_file(&self, url: &str) -> Option<PathBuf> {
        let encoded = encode_url(url);
        let without_query = match encoded.find('?') {
            Some(pos) => encoded[..pos].to_string(),
            None => encoded.clone(),
        };
        let without_fragment = encode_url(url.split('#').next().unwrap_or(url));
        let candidates = [encoded, without_query, without_fragment, crawler_stem(url)];

        for stem in &candidates {
            let path = self.dir.join(format!("{}.json", stem));
            if path.is_file() {
                return Some(path);
            }
        }

        let last_segment = url
            .rsplit('/')
            .next()
            .and_then(|segment| segment.split('#').next())
            .unwrap_or_default();
        if last_segment.is_empty() {
            return None;
        }

        self.files
            .iter()
            .find(|path| {
                path.file_name()
                    .is_some_and(|name| name.to_string_lossy().contains(last_segment))
            })
            .cloned()
    }
}

/// Replace `/`, `:` and `#` with `_`
fn encode_url(url: &str) -> String {
    url.replace(['/', ':', '#'], "_")
}

/// File stem the extractor uses for a URL
pub fn crawler_stem(url: &str) -> String {
    url.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(CRAWLER_STEM_MAX)
        .collect()
}

/// Read and deserialize a JSON file
///
/// # Errors
///
/// `MigrationError::MissingFile` when the file does not exist,
/// `MigrationError::Io` when it cannot be read and `MigrationError::Json`
/// when it does not parse.
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, MigrationError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MigrationError::MissingFile(path.display().to_string()));
    }
    let contents = fs::read_to_string(path)
        .map_err(|e| MigrationError::Io(format!("failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| MigrationError::Json(format!("{}: {}", path.display(), e)))
}

/// Serialize a value as pretty JSON and write it, creating parent directories
pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<(), MigrationError> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)
}

/// Write a text file, creating parent directories
pub fn write_text<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), MigrationError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            MigrationError::Io(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }
    fs::write(path, contents)
        .map_err(|e| MigrationError::Io(format!("failed to write {}: {}", path.display(), e)))
}
