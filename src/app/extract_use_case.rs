use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::apis::registry::{Extraction, RegistryExtractor};
use crate::app::ports::RawSnapshotPort;
use crate::error::Result;

pub struct ExtractOutcome {
    pub extraction: Extraction,
    pub snapshot: Option<PathBuf>,
}

/// Crawls the registry and keeps the raw records for later ranking runs
pub struct ExtractUseCase {
    extractor: RegistryExtractor,
    snapshot: Box<dyn RawSnapshotPort>,
}

impl ExtractUseCase {
    pub fn new(extractor: RegistryExtractor, snapshot: Box<dyn RawSnapshotPort>) -> Self {
        Self { extractor, snapshot }
    }

    /// Nothing is saved when the crawl found no records
    pub async fn execute(&self, max_pages: u32, delay: Duration) -> Result<ExtractOutcome> {
        let extraction = self.extractor.fetch_with_report(max_pages, delay).await;

        if extraction.records.is_empty() {
            warn!("No records extracted; keeping previous raw snapshots untouched");
            return Ok(ExtractOutcome {
                extraction,
                snapshot: None,
            });
        }

        let path = self.snapshot.save(&extraction.records)?;
        info!("📥 Extraction stored at {}", path.display());
        Ok(ExtractOutcome {
            extraction,
            snapshot: Some(path),
        })
    }
}
