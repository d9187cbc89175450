pub mod classify;
pub mod normalize;
pub mod scoring;

pub use classify::classify;
pub use normalize::{clean_name, normalize};
pub use scoring::{score, ScoreBreakdown};

use crate::types::{RawRecord, ScoredRecord};

/// Normalize, score and classify one record, in that order
pub fn process_record(raw: &RawRecord) -> ScoredRecord {
    let record = normalize(raw);
    let tech_score = score(&record);
    let category = classify(tech_score, record.site_present());
    ScoredRecord {
        record,
        tech_score,
        category,
    }
}
