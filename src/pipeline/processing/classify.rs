use crate::constants::{GIANT_THRESHOLD, MID_THRESHOLD};
use crate::types::Category;

/// Tier of an auctioneer. Without a valid site the record is offline
/// whatever its other signals scored.
pub fn classify(score: u8, site_present: bool) -> Category {
    if !site_present {
        return Category::OfflineNoSite;
    }
    match score {
        s if s > GIANT_THRESHOLD => Category::GiantPortal,
        s if s >= MID_THRESHOLD => Category::MidConsolidated,
        _ => Category::SmallWithSite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(100, true), Category::GiantPortal);
        assert_eq!(classify(81, true), Category::GiantPortal);
        assert_eq!(classify(80, true), Category::MidConsolidated);
        assert_eq!(classify(40, true), Category::MidConsolidated);
        assert_eq!(classify(39, true), Category::SmallWithSite);
        assert_eq!(classify(0, true), Category::SmallWithSite);
    }

    #[test]
    fn test_no_site_is_always_offline() {
        for score in 0..=100 {
            assert_eq!(classify(score, false), Category::OfflineNoSite);
        }
    }

    #[test]
    fn test_site_tiers_do_not_overlap() {
        for score in 0..=100u8 {
            let expected = if score > 80 {
                Category::GiantPortal
            } else if score >= 40 {
                Category::MidConsolidated
            } else {
                Category::SmallWithSite
            };
            assert_eq!(classify(score, true), expected, "score {score}");
        }
    }
}
