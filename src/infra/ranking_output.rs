use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::ports::RankingOutputPort;
use crate::error::Result;
use crate::types::{Category, ScoredRecord};

/// One line of the tabular artifact; absent values are empty cells
#[derive(Debug, Serialize)]
struct TableRow<'a> {
    name: &'a str,
    registration_id: &'a str,
    site: &'a str,
    email: &'a str,
    phone: &'a str,
    tech_score: u8,
    category: Category,
}

impl<'a> From<&'a ScoredRecord> for TableRow<'a> {
    fn from(scored: &'a ScoredRecord) -> Self {
        let r = &scored.record;
        Self {
            name: &r.name,
            registration_id: r.registration_id.as_deref().unwrap_or(""),
            site: r.site.as_deref().unwrap_or(""),
            email: r.email.as_deref().unwrap_or(""),
            phone: r.phone.as_deref().unwrap_or(""),
            tech_score: scored.tech_score,
            category: scored.category,
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Ranking as CSV for spreadsheets and the dashboard
pub struct CsvRankingWriter {
    path: PathBuf,
}

impl CsvRankingWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RankingOutputPort for CsvRankingWriter {
    fn write_ranking(&self, ranked: &[ScoredRecord]) -> Result<PathBuf> {
        ensure_parent(&self.path)?;
        let mut writer = csv::Writer::from_path(&self.path)?;
        if ranked.is_empty() {
            // serde only emits the header alongside the first row
            writer.write_record([
                "name",
                "registration_id",
                "site",
                "email",
                "phone",
                "tech_score",
                "category",
            ])?;
        }
        for scored in ranked {
            writer.serialize(TableRow::from(scored))?;
        }
        writer.flush()?;

        info!("💾 Saved CSV ranking to {}", self.path.display());
        Ok(self.path.clone())
    }
}

/// Ranking as a JSON array of scored records
pub struct JsonRankingWriter {
    path: PathBuf,
}

impl JsonRankingWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RankingOutputPort for JsonRankingWriter {
    fn write_ranking(&self, ranked: &[ScoredRecord]) -> Result<PathBuf> {
        ensure_parent(&self.path)?;
        let json_content = serde_json::to_string_pretty(ranked)?;
        fs::write(&self.path, json_content)?;

        info!("💾 Saved JSON ranking to {}", self.path.display());
        Ok(self.path.clone())
    }
}
