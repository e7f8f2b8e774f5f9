use super::{FeedError, ObservationSource};
use crate::types::MarketObservation;

/// Built-in six-market batch, used when no feed is configured or the feed
/// has never loaded.
pub fn sample_observations() -> Vec<MarketObservation> {
    vec![
        MarketObservation::new("Will BTC break $100k by end of 2024?", 45.0, 38.0, 156, "1.2M"),
        MarketObservation::new("Will an ETH ETF be approved in 2024?", 62.0, 58.0, 89, "890K"),
        MarketObservation::new("Will SOL reach $200 in Q4?", 38.0, 32.0, 67, "560K"),
        MarketObservation::new("Will DeFi TVL pass $200B by year end?", 55.0, 52.0, 45, "420K"),
        MarketObservation::new("Will the US enter a recession?", 28.0, 35.0, 234, "2.1M"),
        MarketObservation::new("Will gold break $3000?", 72.0, 45.0, 112, "780K"),
    ]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSource;

impl ObservationSource for SampleSource {
    fn name(&self) -> String {
        "sample".to_string()
    }

    fn fetch(&self) -> Result<Vec<MarketObservation>, FeedError> {
        Ok(sample_observations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::summarize;
    use crate::types::AlertTier;

    #[test]
    fn sample_batch_has_no_positive_ev() {
        // every quoted odds is below 100, so no market pays more than the stake
        let summary = summarize(&sample_observations());
        assert_eq!(summary.total, 6);
        assert_eq!(summary.positive_ev_count, 0);
        assert_eq!(summary.valid_odds_count, 6);
        assert_eq!(summary.average_kelly_percent, 0.0);
        assert_eq!(summary.alert_tier, AlertTier::None);
    }
}
