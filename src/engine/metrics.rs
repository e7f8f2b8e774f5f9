//! Per-market metrics
//!
//! Combines the edge, Kelly and confidence calculations into the single
//! `evaluate` entry point used by the portfolio aggregator.

use serde::{Deserialize, Serialize};

use super::confidence::confidence_score;
use super::edge::estimate_edge;
use super::kelly::compute_capped_kelly;
use crate::types::{non_finite, ConfidenceBand, TradeSignal};

/// Minimum risk/reward ratio for a market to be tradeable
pub const MIN_RISK_REWARD: f64 = 2.0;
/// Inclusive band of quoted odds considered reliable
pub const VALID_ODDS_MIN: f64 = 20.0;
pub const VALID_ODDS_MAX: f64 = 80.0;

/// Derived analytics for one market
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Expected value per unit stake, signed; overflows to infinity on extreme inputs
    #[serde(with = "non_finite")]
    pub ev: f64,
    /// May be infinite or NaN when the loss probability is zero
    #[serde(with = "non_finite")]
    pub risk_reward: f64,
    /// Bankroll fraction in `[0, 0.25]`
    pub kelly: f64,
    /// Integer score in `[0, 95]`
    pub confidence: u8,
    pub is_positive_ev: bool,
    pub risk_reward_ok: bool,
    pub odds_in_valid_range: bool,
}

impl MetricResult {
    pub fn signal(&self) -> TradeSignal {
        TradeSignal::from_flags(self.is_positive_ev, self.risk_reward_ok)
    }

    pub fn confidence_band(&self) -> ConfidenceBand {
        ConfidenceBand::from_score(self.confidence)
    }

    pub fn kelly_percent(&self) -> f64 {
        self.kelly * 100.0
    }
}

/// Evaluate one market.
///
/// `win_rate_percent` is the trader's edge estimate and `payout_odds_percent`
/// the quoted odds, both on a 0-100 scale. No range is enforced; extreme
/// inputs produce extreme but defined outputs, including a non-finite
/// risk/reward when the win rate is 100.
pub fn evaluate(win_rate_percent: f64, payout_odds_percent: f64, volume_label: &str) -> MetricResult {
    let edge = estimate_edge(win_rate_percent, payout_odds_percent);
    let kelly = compute_capped_kelly(win_rate_percent, payout_odds_percent);
    let confidence = confidence_score(payout_odds_percent, volume_label);

    MetricResult {
        ev: edge.ev,
        risk_reward: edge.risk_reward,
        kelly: kelly.f_capped,
        confidence,
        is_positive_ev: edge.ev > 0.0,
        risk_reward_ok: edge.risk_reward >= MIN_RISK_REWARD,
        odds_in_valid_range: (VALID_ODDS_MIN..=VALID_ODDS_MAX).contains(&payout_odds_percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn btc_reference_market() {
        let m = evaluate(38.0, 45.0, "1.2M");
        assert!((m.ev - -0.829).abs() < 1e-9);
        assert!(!m.is_positive_ev);
        assert!(!m.risk_reward_ok);
        assert_eq!(m.kelly, 0.0);
        assert_eq!(m.confidence, 95);
        assert!(m.odds_in_valid_range);
        assert_eq!(m.signal(), TradeSignal::Watch);
    }

    #[test]
    fn eth_reference_market() {
        let m = evaluate(58.0, 62.0, "890K");
        assert!((m.ev - -0.6404).abs() < 1e-9);
        assert!(!m.is_positive_ev);
    }

    #[test]
    fn tradeable_when_ev_and_ratio_clear() {
        let m = evaluate(60.0, 250.0, "");
        assert!(m.is_positive_ev);
        assert!(m.risk_reward_ok);
        assert_eq!(m.kelly, 0.25);
        assert!(!m.odds_in_valid_range);
        assert_eq!(m.signal(), TradeSignal::Tradeable);
        assert!((m.kelly_percent() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn positive_ev_with_thin_ratio_is_watch() {
        let m = evaluate(70.0, 160.0, "");
        assert!(m.is_positive_ev);
        assert!(!m.risk_reward_ok);
        assert_eq!(m.signal(), TradeSignal::Watch);
    }

    #[test]
    fn infinite_ratio_passes_threshold() {
        let m = evaluate(100.0, 150.0, "");
        assert!(m.risk_reward.is_infinite());
        assert!(m.risk_reward_ok);
    }

    #[test]
    fn nan_ratio_fails_threshold() {
        let m = evaluate(100.0, 100.0, "");
        assert!(m.risk_reward.is_nan());
        assert!(!m.risk_reward_ok);
        assert!(!m.is_positive_ev);
    }

    #[test]
    fn valid_odds_band_is_inclusive() {
        assert!(evaluate(50.0, 20.0, "").odds_in_valid_range);
        assert!(evaluate(50.0, 80.0, "").odds_in_valid_range);
        assert!(!evaluate(50.0, 19.99, "").odds_in_valid_range);
        assert!(!evaluate(50.0, 80.01, "").odds_in_valid_range);
    }

    #[test]
    fn deterministic_for_same_input() {
        let a = evaluate(45.0, 72.0, "780K");
        let b = evaluate(45.0, 72.0, "780K");
        assert_eq!(a, b);
    }
}
