use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::Result;
use crate::types::{RawEntry, RawRecord, ScoredRecord};

// Extract-side ports
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<HttpGetResult, String>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Where extracted raw records are kept for later pipeline runs
pub trait RawSnapshotPort: Send + Sync {
    fn save(&self, records: &[RawRecord]) -> Result<PathBuf>;
}

// Rank-side ports
pub trait RawInputPort: Send + Sync {
    /// Human readable origin, for logs
    fn describe(&self) -> String;

    /// Every raw entry of the input, readable or not
    fn load_entries(&self) -> Result<Vec<RawEntry>>;
}

pub trait RankingOutputPort: Send + Sync {
    /// Write the ranked records and return the artifact location
    fn write_ranking(&self, ranked: &[ScoredRecord]) -> Result<PathBuf>;
}
