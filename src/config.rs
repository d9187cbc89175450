use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::*;
use crate::error::{Result, ScraperError};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorConfig,
    pub paths: PathsConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub base_url: String,
    pub page_param: String,
    pub max_pages: u32,
    pub delay_seconds: f64,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub selectors: ListingSelectors,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            delay_seconds: DEFAULT_DELAY_SECONDS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            selectors: ListingSelectors::default(),
        }
    }
}

impl ExtractorConfig {
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_seconds.max(0.0)).unwrap_or(Duration::ZERO)
    }
}

/// CSS selectors for the registry listing table. Column selectors are
/// relative to a row.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// Must match on every listing page, even one without rows
    pub listing: String,
    pub row: String,
    pub name: String,
    pub registration_id: String,
    pub site: String,
    pub email: String,
    pub phone: String,
    pub city: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            listing: "table".to_string(),
            row: "table tbody tr".to_string(),
            name: "td:nth-child(1)".to_string(),
            registration_id: "td:nth-child(2)".to_string(),
            site: "td:nth-child(3)".to_string(),
            email: "td:nth-child(4)".to_string(),
            phone: "td:nth-child(5)".to_string(),
            city: "td:nth-child(6)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub raw_dir: PathBuf,
    pub output_dir: PathBuf,
    pub csv_file: String,
    pub json_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(DEFAULT_RAW_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            csv_file: DEFAULT_CSV_FILE.to_string(),
            json_file: DEFAULT_JSON_FILE.to_string(),
        }
    }
}

impl PathsConfig {
    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_file)
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(&self.json_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl Config {
    /// Load `path` (defaults when the file does not exist), then apply
    /// environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(path.as_ref())?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Override values from a variable lookup (the process environment in
    /// production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.extractor.base_url = url;
        }
        if let Some(raw) = lookup(ENV_MAX_PAGES) {
            self.extractor.max_pages = parse_override(ENV_MAX_PAGES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DELAY_SECONDS) {
            self.extractor.delay_seconds = parse_override(ENV_DELAY_SECONDS, &raw)?;
        }
        if let Some(dir) = lookup(ENV_RAW_DIR) {
            self.paths.raw_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.paths.output_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}

fn parse_override<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ScraperError::Config(format!("{key} has an invalid value: {raw:?}")))
}
