//! Portfolio Aggregator
//!
//! Runs the metrics engine over a batch of markets and rolls the results up:
//! - EV ranking (stable, descending)
//! - Positive-EV and valid-odds counts
//! - Average Kelly allocation and suggested position size
//! - Alert tier for the whole batch

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::engine::{evaluate, MetricResult};
use crate::types::{AlertTier, ConfidenceBand, MarketObservation, TradeSignal};

/// Upper bound on the suggested position, in percent of bankroll
pub const MAX_SUGGESTED_POSITION_PERCENT: f64 = 10.0;
/// Multiplier applied to the average Kelly percent before the cap
pub const POSITION_KELLY_MULTIPLIER: f64 = 2.0;
/// Fixed per-trade stop, in percent of bankroll
pub const MAX_RISK_PER_TRADE_PERCENT: f64 = 2.0;

/// One market with its computed metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMarket {
    pub observation: MarketObservation,
    pub metrics: MetricResult,
    pub signal: TradeSignal,
    pub confidence_band: ConfidenceBand,
}

impl ScoredMarket {
    pub fn score(observation: &MarketObservation) -> Self {
        // Historical win rate is the trader's edge; quoted odds are the payout.
        let metrics = evaluate(
            observation.historical_win_rate,
            observation.yes_odds,
            &observation.volume,
        );
        Self {
            observation: observation.clone(),
            signal: metrics.signal(),
            confidence_band: metrics.confidence_band(),
            metrics,
        }
    }
}

/// Batch-level rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sorted by EV, highest first; equal EV keeps input order
    ranked_results: Vec<ScoredMarket>,
    pub total: usize,
    pub positive_ev_count: usize,
    pub valid_odds_count: usize,
    pub tradeable_count: usize,
    /// Mean of per-market Kelly x 100
    pub average_kelly_percent: f64,
    /// `min(average_kelly_percent * 2, 10)`
    pub suggested_position_percent: f64,
    pub max_risk_percent: f64,
    pub alert_tier: AlertTier,
}

impl Default for PortfolioSummary {
    fn default() -> Self {
        Self {
            ranked_results: Vec::new(),
            total: 0,
            positive_ev_count: 0,
            valid_odds_count: 0,
            tradeable_count: 0,
            average_kelly_percent: 0.0,
            suggested_position_percent: 0.0,
            max_risk_percent: MAX_RISK_PER_TRADE_PERCENT,
            alert_tier: AlertTier::None,
        }
    }
}

impl PortfolioSummary {
    /// Read-only view of the ranking
    pub fn ranked_results(&self) -> &[ScoredMarket] {
        &self.ranked_results
    }

    pub fn best(&self) -> Option<&ScoredMarket> {
        self.ranked_results.first()
    }

    pub fn tradeable(&self) -> impl Iterator<Item = &ScoredMarket> {
        self.ranked_results
            .iter()
            .filter(|m| m.signal == TradeSignal::Tradeable)
    }

    pub fn is_empty(&self) -> bool {
        self.ranked_results.is_empty()
    }
}

/// Summarize a batch of observations.
///
/// Never fails: an empty batch yields a zeroed summary with `AlertTier::None`,
/// and non-finite risk/reward values are carried through unchanged.
pub fn summarize(observations: &[MarketObservation]) -> PortfolioSummary {
    if observations.is_empty() {
        return PortfolioSummary::default();
    }

    let scored: Vec<ScoredMarket> = observations.iter().map(ScoredMarket::score).collect();
    let total = scored.len();

    let positive_ev_count = scored.iter().filter(|m| m.metrics.is_positive_ev).count();
    let valid_odds_count = scored
        .iter()
        .filter(|m| m.metrics.odds_in_valid_range)
        .count();
    let tradeable_count = scored
        .iter()
        .filter(|m| m.signal == TradeSignal::Tradeable)
        .count();

    let total_kelly: f64 = scored.iter().map(|m| m.metrics.kelly).sum();
    let average_kelly_percent = (total_kelly / total as f64) * 100.0;
    let suggested_position_percent =
        (average_kelly_percent * POSITION_KELLY_MULTIPLIER).min(MAX_SUGGESTED_POSITION_PERCENT);

    let alert_tier = AlertTier::classify(positive_ev_count, total);

    let mut ranked_results = scored;
    // Vec::sort_by is stable; -0.0 and 0.0 compare equal here.
    ranked_results.sort_by(|a, b| rank_by_ev(a.metrics.ev, b.metrics.ev));

    debug!(
        total,
        positive_ev = positive_ev_count,
        valid_odds = valid_odds_count,
        tradeable = tradeable_count,
        avg_kelly_pct = average_kelly_percent,
        alert = %alert_tier,
        "Portfolio summarized"
    );

    PortfolioSummary {
        ranked_results,
        total,
        positive_ev_count,
        valid_odds_count,
        tradeable_count,
        average_kelly_percent,
        suggested_position_percent,
        max_risk_percent: MAX_RISK_PER_TRADE_PERCENT,
        alert_tier,
    }
}

/// Descending EV order with NaN after every number, so the comparator stays
/// a total order even when overflow produced a NaN EV.
fn rank_by_ev(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
