use crate::types::{CategoryCounts, RunSummary, ScoredRecord};

/// Running totals threaded through the aggregation pass
#[derive(Debug, Default, Clone)]
pub struct SummaryAccumulator {
    counts: CategoryCounts,
    records: usize,
    score_sum: u64,
    with_site: usize,
    corporate_emails: usize,
    opportunities: usize,
}

impl SummaryAccumulator {
    pub fn add(mut self, scored: &ScoredRecord) -> Self {
        self.counts.increment(scored.category);
        self.records += 1;
        self.score_sum += u64::from(scored.tech_score);
        self.with_site += usize::from(scored.record.site_present());
        self.corporate_emails += usize::from(scored.record.is_corporate_email);
        self.opportunities += usize::from(scored.category.is_opportunity());
        self
    }

    pub fn finish(self, skipped_records: usize) -> RunSummary {
        let mean_tech_score = if self.records == 0 {
            0.0
        } else {
            self.score_sum as f64 / self.records as f64
        };
        RunSummary {
            total_records: self.records,
            skipped_records,
            category_counts: self.counts,
            mean_tech_score,
            with_site: self.with_site,
            corporate_emails: self.corporate_emails,
            opportunities: self.opportunities,
        }
    }
}

/// Single pass over the scored set
pub fn summarize(records: &[ScoredRecord], skipped_records: usize) -> RunSummary {
    records
        .iter()
        .fold(SummaryAccumulator::default(), SummaryAccumulator::add)
        .finish(skipped_records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, NormalizedRecord};

    fn scored(score: u8, category: Category, site: bool) -> ScoredRecord {
        ScoredRecord {
            record: NormalizedRecord {
                name: "Leiloeiro".to_string(),
                registration_id: None,
                site: site.then(|| "http://www.leiloes.com.br".to_string()),
                email: None,
                is_corporate_email: false,
                phone: None,
                city: None,
            },
            tech_score: score,
            category,
        }
    }

    #[test]
    fn test_summary_counts_and_mean() {
        let records = vec![
            scored(100, Category::GiantPortal, true),
            scored(60, Category::MidConsolidated, true),
            scored(0, Category::OfflineNoSite, false),
            scored(20, Category::OfflineNoSite, false),
        ];

        let summary = summarize(&records, 3);

        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.skipped_records, 3);
        assert_eq!(summary.category_counts.total(), 4);
        assert_eq!(summary.category_counts.offline_no_site, 2);
        assert_eq!(summary.with_site, 2);
        assert_eq!(summary.opportunities, 2);
        assert!((summary.mean_tech_score - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_run_has_zero_mean() {
        let summary = summarize(&[], 0);
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.mean_tech_score, 0.0);
    }
}
