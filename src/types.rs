use crate::error::{Result, ScraperError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// One raw entry of the input file, before it is known to be a readable record
pub type RawEntry = Value;

/// One auctioneer as scraped from the registry listing
///
/// Field names from the registry's own exports (`nome`, `matricula`,
/// `telefone`, `cidade`) are accepted as aliases. Every field except the
/// name tolerates `null`, absence and numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, alias = "matricula", deserialize_with = "lenient_text")]
    pub registration_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub site: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(default, alias = "telefone", deserialize_with = "lenient_text")]
    pub phone: String,
    #[serde(
        default,
        alias = "cidade",
        deserialize_with = "lenient_text",
        skip_serializing_if = "String::is_empty"
    )]
    pub city: String,
}

impl RawRecord {
    /// Read a raw entry; fails when the entry has no usable identifying name
    pub fn from_entry(entry: &RawEntry) -> Result<Self> {
        if !entry.is_object() {
            return Err(ScraperError::MissingField(
                "entry is not a record object".into(),
            ));
        }
        serde_json::from_value(entry.clone())
            .map_err(|e| ScraperError::MissingField(format!("name ({e})")))
    }
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// A raw record after field cleaning; invalid values are `None`, never dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub name: String,
    pub registration_id: Option<String>,
    pub site: Option<String>,
    pub email: Option<String>,
    pub is_corporate_email: bool,
    pub phone: Option<String>,
    pub city: Option<String>,
}

impl NormalizedRecord {
    pub fn site_present(&self) -> bool {
        self.site.is_some()
    }
}

/// Digital-presence tier of an auctioneer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    GiantPortal,
    MidConsolidated,
    SmallWithSite,
    OfflineNoSite,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::GiantPortal,
        Category::MidConsolidated,
        Category::SmallWithSite,
        Category::OfflineNoSite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::GiantPortal => "GIANT_PORTAL",
            Category::MidConsolidated => "MID_CONSOLIDATED",
            Category::SmallWithSite => "SMALL_WITH_SITE",
            Category::OfflineNoSite => "OFFLINE_NO_SITE",
        }
    }

    /// Label used in the sales team's reports
    pub fn label(&self) -> &'static str {
        match self {
            Category::GiantPortal => "Gigante (Portal)",
            Category::MidConsolidated => "Médio (Consolidado)",
            Category::SmallWithSite => "Pequeno (Com Site)",
            Category::OfflineNoSite => "Offline/Sem Site",
        }
    }

    /// Small and offline auctioneers are the outreach targets
    pub fn is_opportunity(&self) -> bool {
        matches!(self, Category::SmallWithSite | Category::OfflineNoSite)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized record with its score and tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: NormalizedRecord,
    pub tech_score: u8,
    pub category: Category,
}

/// Number of scored records per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub giant_portal: usize,
    pub mid_consolidated: usize,
    pub small_with_site: usize,
    pub offline_no_site: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::GiantPortal => self.giant_portal,
            Category::MidConsolidated => self.mid_consolidated,
            Category::SmallWithSite => self.small_with_site,
            Category::OfflineNoSite => self.offline_no_site,
        }
    }

    pub fn increment(&mut self, category: Category) {
        let slot = match category {
            Category::GiantPortal => &mut self.giant_portal,
            Category::MidConsolidated => &mut self.mid_consolidated,
            Category::SmallWithSite => &mut self.small_with_site,
            Category::OfflineNoSite => &mut self.offline_no_site,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// Aggregates of one pipeline run, recomputed from the full scored set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_records: usize,
    pub skipped_records: usize,
    pub category_counts: CategoryCounts,
    pub mean_tech_score: f64,
    pub with_site: usize,
    pub corporate_emails: usize,
    pub opportunities: usize,
}
