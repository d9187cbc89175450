use metrics::{counter, histogram};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::processing::{clean_name, process_record};
use super::summary::summarize;
use crate::error::{Result, ScraperError};
use crate::types::{RawEntry, RawRecord, RunSummary, ScoredRecord};

/// Outcome of one pipeline pass over a raw record set
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    /// Scored records in input order
    pub records: Vec<ScoredRecord>,
    pub summary: RunSummary,
    /// Why each skipped entry was unreadable, by input position
    pub skipped: Vec<(usize, String)>,
}

impl PipelineRun {
    /// Records ranked by score, highest first; ties keep input order
    pub fn ranked(&self) -> Vec<ScoredRecord> {
        rank(&self.records)
    }
}

pub fn rank(records: &[ScoredRecord]) -> Vec<ScoredRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| b.tech_score.cmp(&a.tech_score));
    ranked
}

pub struct Pipeline;

impl Pipeline {
    /// Read one entry; entries without an identifying name are unreadable
    fn read_entry(entry: &RawEntry) -> Result<RawRecord> {
        let raw = RawRecord::from_entry(entry)?;
        if clean_name(&raw.name).is_empty() {
            return Err(ScraperError::MissingField(format!(
                "name has no usable text: {:?}",
                raw.name
            )));
        }
        Ok(raw)
    }

    /// Score every readable entry; unreadable ones are counted, not fatal
    #[instrument(skip(entries), fields(entry_count = entries.len()))]
    pub fn run(entries: &[RawEntry]) -> PipelineRun {
        let t_run = std::time::Instant::now();
        let mut records = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();

        for (i, entry) in entries.iter().enumerate() {
            match Self::read_entry(entry) {
                Ok(raw) => {
                    let scored = process_record(&raw);
                    debug!(
                        name = %scored.record.name,
                        score = scored.tech_score,
                        category = %scored.category,
                        "Scored record {}",
                        i
                    );
                    records.push(scored);
                }
                Err(e) => {
                    warn!("Skipping unreadable entry {}: {}", i, e);
                    skipped.push((i, e.to_string()));
                }
            }
        }

        let summary = summarize(&records, skipped.len());

        counter!("leiloeiros_records_scored_total").increment(records.len() as u64);
        counter!("leiloeiros_records_skipped_total").increment(skipped.len() as u64);
        histogram!("leiloeiros_pipeline_duration_seconds").record(t_run.elapsed().as_secs_f64());

        info!(
            "✅ Scored {} records ({} skipped, mean score {:.1})",
            summary.total_records, summary.skipped_records, summary.mean_tech_score
        );

        PipelineRun {
            records,
            summary,
            skipped,
        }
    }
}
