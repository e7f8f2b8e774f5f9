//! Terminal rendering of a portfolio summary

use std::fmt::Write;

use crate::portfolio::{PortfolioSummary, ScoredMarket};
use crate::types::AlertTier;

/// `2.25:1`, with `∞:1` / `-∞:1` for infinite ratios and `n/a` for NaN
pub fn format_risk_reward(ratio: f64) -> String {
    if ratio.is_nan() {
        "n/a".to_string()
    } else if ratio == f64::INFINITY {
        "∞:1".to_string()
    } else if ratio == f64::NEG_INFINITY {
        "-∞:1".to_string()
    } else {
        format!("{:.2}:1", ratio)
    }
}

/// EV fraction as a signed percent with one decimal
pub fn format_ev(ev: f64) -> String {
    format!("{:+.1}%", ev * 100.0)
}

pub fn alert_message(summary: &PortfolioSummary) -> String {
    match summary.alert_tier {
        AlertTier::None => {
            "No positive-EV opportunities: every market is negative expectation, stay on the sidelines"
                .to_string()
        }
        AlertTier::Caution => format!(
            "Only {}/{} opportunities have positive EV",
            summary.positive_ev_count, summary.total
        ),
        AlertTier::Good => format!(
            "{}/{} opportunities have positive EV",
            summary.positive_ev_count, summary.total
        ),
    }
}

fn render_row(out: &mut String, rank: usize, m: &ScoredMarket) {
    let odds_flag = if m.metrics.odds_in_valid_range { ' ' } else { '!' };
    let _ = writeln!(
        out,
        "{:>4}  {:<6} {:>8} {:>9} {:>6.1}% {:>4} {:<6} {:>5.1}%{} {:>5.1}% {:>6}  {}",
        rank,
        m.signal.to_string(),
        format_ev(m.metrics.ev),
        format_risk_reward(m.metrics.risk_reward),
        m.metrics.kelly_percent(),
        m.metrics.confidence,
        m.confidence_band.to_string(),
        m.observation.yes_odds,
        odds_flag,
        m.observation.historical_win_rate,
        m.observation.volume,
        m.observation.title,
    );
}

/// Ranked table plus the fund-management rollup. `top == 0` prints every row.
pub fn render_text(summary: &PortfolioSummary, top: usize) -> String {
    let mut out = String::new();

    if summary.is_empty() {
        out.push_str("No markets in feed\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>4}  {:<6} {:>8} {:>9} {:>7} {:>4} {:<6} {:>7} {:>6} {:>6}  {}",
        "RANK", "SIGNAL", "EV", "R:R", "KELLY", "CONF", "", "YES", "WIN", "VOL", "MARKET"
    );

    let limit = if top == 0 { summary.total } else { top };
    for (i, m) in summary.ranked_results().iter().take(limit).enumerate() {
        render_row(&mut out, i + 1, m);
    }
    if limit < summary.total {
        let _ = writeln!(out, "      ... {} more", summary.total - limit);
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "Suggested position: {:.1}%   Avg Kelly: {:.1}%   Max risk/trade: -{:.1}%",
        summary.suggested_position_percent, summary.average_kelly_percent, summary.max_risk_percent
    );
    let _ = writeln!(
        out,
        "Positive EV: {}/{}   Valid odds (20-80%): {}/{}   Tradeable: {}",
        summary.positive_ev_count,
        summary.total,
        summary.valid_odds_count,
        summary.total,
        summary.tradeable_count
    );
    let _ = writeln!(out, "[{}] {}", summary.alert_tier, alert_message(summary));

    out
}
