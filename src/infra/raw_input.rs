use chrono::Utc;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::app::ports::{RawInputPort, RawSnapshotPort};
use crate::constants::RAW_FILE_PREFIX;
use crate::error::{Result, ScraperError};
use crate::types::{RawEntry, RawRecord};

/// Raw records stored as one or more concatenated JSON arrays
pub struct JsonRawInput {
    path: PathBuf,
}

impl JsonRawInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Input backed by the newest raw file in `dir`
    pub fn latest_in(dir: &Path) -> Result<Self> {
        Ok(Self::new(latest_raw_file(dir)?))
    }

    fn unavailable(&self, reason: impl Into<String>) -> ScraperError {
        ScraperError::InputUnavailable {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl RawInputPort for JsonRawInput {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_entries(&self) -> Result<Vec<RawEntry>> {
        let text = fs::read_to_string(&self.path).map_err(|e| self.unavailable(e.to_string()))?;
        let entries = parse_entries(&text).map_err(|e| self.unavailable(e.to_string()))?;
        info!("📁 Loaded {} raw entries from {}", entries.len(), self.describe());
        Ok(entries)
    }
}

/// Flatten every top-level JSON value in `text` into entries. A top-level
/// array contributes its items, anything else counts as one entry. A syntax
/// error is fatal only when nothing could be read before it.
pub fn parse_entries(text: &str) -> Result<Vec<RawEntry>> {
    let mut entries = Vec::new();
    for value in serde_json::Deserializer::from_str(text).into_iter::<Value>() {
        match value {
            Ok(Value::Array(items)) => entries.extend(items),
            Ok(other) => entries.push(other),
            Err(e) if entries.is_empty() => return Err(e.into()),
            Err(e) => {
                warn!("Ignoring unreadable tail of raw input after {} entries: {}", entries.len(), e);
                break;
            }
        }
    }
    Ok(entries)
}

/// Newest `*.json` file in `dir` by modification time, file name breaking ties
pub fn latest_raw_file(dir: &Path) -> Result<PathBuf> {
    let unavailable = |reason: String| ScraperError::InputUnavailable {
        path: dir.to_path_buf(),
        reason,
    };

    let read_dir = fs::read_dir(dir).map_err(|e| unavailable(e.to_string()))?;
    let mut candidates: Vec<(SystemTime, PathBuf)> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();

    candidates.sort();
    let (_, latest) = candidates
        .pop()
        .ok_or_else(|| unavailable("no raw JSON files found".to_string()))?;
    debug!("Latest raw input: {}", latest.display());
    Ok(latest)
}

/// Saves each extraction as `leiloeiros_<timestamp>.json` in a directory
pub struct JsonRawSnapshot {
    dir: PathBuf,
}

impl JsonRawSnapshot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl RawSnapshotPort for JsonRawSnapshot {
    fn save(&self, records: &[RawRecord]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let filepath = self.dir.join(format!("{RAW_FILE_PREFIX}{timestamp}.json"));

        let json_content = serde_json::to_string_pretty(records)?;
        fs::write(&filepath, json_content)?;

        info!("💾 Saved {} raw records to {}", records.len(), filepath.display());
        Ok(filepath)
    }
}
