use crate::constants::{
    CORPORATE_EMAIL_POINTS, MAX_SCORE, PHONE_POINTS, REGISTRATION_POINTS, SITE_POINTS,
};
use crate::types::NormalizedRecord;

/// Independent sub-scores of a record's digital presence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub site: u8,
    pub corporate_email: u8,
    pub phone: u8,
    pub registration: u8,
}

impl ScoreBreakdown {
    pub fn of(record: &NormalizedRecord) -> Self {
        Self {
            site: if record.site_present() { SITE_POINTS } else { 0 },
            corporate_email: if record.is_corporate_email { CORPORATE_EMAIL_POINTS } else { 0 },
            phone: if record.phone.is_some() { PHONE_POINTS } else { 0 },
            registration: if record.registration_id.is_some() { REGISTRATION_POINTS } else { 0 },
        }
    }

    /// Sum of the sub-scores, clamped to 0..=100
    pub fn total(&self) -> u8 {
        let sum = [self.site, self.corporate_email, self.phone, self.registration]
            .iter()
            .map(|points| u32::from(*points))
            .sum::<u32>();
        sum.min(u32::from(MAX_SCORE)) as u8
    }
}

/// TechScore of a normalized record, 0..=100
pub fn score(record: &NormalizedRecord) -> u8 {
    ScoreBreakdown::of(record).total()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(site: bool, corporate: bool, phone: bool, registration: bool) -> NormalizedRecord {
        NormalizedRecord {
            name: "Leiloeiro".to_string(),
            registration_id: registration.then(|| "12345".to_string()),
            site: site.then(|| "http://www.leiloes.com.br".to_string()),
            email: Some(if corporate { "contato@leiloes.com.br" } else { "b@gmail.com" }.to_string()),
            is_corporate_email: corporate,
            phone: phone.then(|| "11999990000".to_string()),
            city: None,
        }
    }

    #[test]
    fn test_all_signals_sum_to_max() {
        assert_eq!(score(&record(true, true, true, true)), 100);
    }

    #[test]
    fn test_each_signal_weight() {
        assert_eq!(score(&record(true, false, false, false)), 50);
        assert_eq!(score(&record(false, true, false, false)), 30);
        assert_eq!(score(&record(false, false, true, false)), 10);
        assert_eq!(score(&record(false, false, false, true)), 10);
        assert_eq!(score(&record(false, false, false, false)), 0);
    }

    #[test]
    fn test_score_is_bounded_and_deterministic_for_every_combination() {
        for mask in 0u8..16 {
            let r = record(mask & 1 != 0, mask & 2 != 0, mask & 4 != 0, mask & 8 != 0);
            let first = score(&r);
            assert!(first <= 100);
            assert_eq!(first, score(&r));
        }
    }

    #[test]
    fn test_total_clamps_oversized_breakdown() {
        let breakdown = ScoreBreakdown {
            site: 200,
            corporate_email: 200,
            phone: 200,
            registration: 200,
        };
        assert_eq!(breakdown.total(), 100);
    }
}
