//! Core types used throughout EvBoard
//!
//! Defines the market observation fed into the engine and the small
//! classification enums attached to its output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One market as delivered by the external data feed.
///
/// Percent fields are on a 0-100 scale. The engine never mutates an
/// observation; it is read and copied into ranked output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketObservation {
    /// Human label, opaque to the engine
    pub title: String,
    /// Quoted probability of YES, used as payout odds
    pub yes_odds: f64,
    /// Empirical win rate of the market's reference class
    pub historical_win_rate: f64,
    /// Observations backing the win rate (informational only)
    #[serde(default)]
    pub sample_size: u32,
    /// Liquidity label such as "1.2M" or "890K"
    pub volume: String,
}

impl MarketObservation {
    pub fn new(
        title: impl Into<String>,
        yes_odds: f64,
        historical_win_rate: f64,
        sample_size: u32,
        volume: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            yes_odds,
            historical_win_rate,
            sample_size,
            volume: volume.into(),
        }
    }
}

/// Per-market recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSignal {
    /// Positive EV and risk/reward at or above the minimum
    Tradeable,
    Watch,
}

impl Default for TradeSignal {
    fn default() -> Self {
        TradeSignal::Watch
    }
}

impl TradeSignal {
    pub fn from_flags(is_positive_ev: bool, risk_reward_ok: bool) -> Self {
        if is_positive_ev && risk_reward_ok {
            TradeSignal::Tradeable
        } else {
            TradeSignal::Watch
        }
    }
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSignal::Tradeable => write!(f, "BUY"),
            TradeSignal::Watch => write!(f, "WATCH"),
        }
    }
}

/// Coarse bucket over the 0-95 confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    pub const HIGH_THRESHOLD: u8 = 70;
    pub const MEDIUM_THRESHOLD: u8 = 40;

    pub fn from_score(confidence: u8) -> Self {
        if confidence >= Self::HIGH_THRESHOLD {
            ConfidenceBand::High
        } else if confidence >= Self::MEDIUM_THRESHOLD {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceBand::Low => write!(f, "low"),
            ConfidenceBand::Medium => write!(f, "medium"),
            ConfidenceBand::High => write!(f, "high"),
        }
    }
}

/// How many opportunities in a batch carry positive EV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertTier {
    /// No positive-EV market at all
    None,
    /// Some, but fewer than 30% of the batch
    Caution,
    Good,
}

impl Default for AlertTier {
    fn default() -> Self {
        AlertTier::None
    }
}

impl AlertTier {
    /// Share of the batch below which a non-empty positive set is only a caution
    pub const CAUTION_RATIO: f64 = 0.3;

    pub fn classify(positive_ev_count: usize, total: usize) -> Self {
        if total == 0 || positive_ev_count == 0 {
            AlertTier::None
        } else if (positive_ev_count as f64) < Self::CAUTION_RATIO * total as f64 {
            AlertTier::Caution
        } else {
            AlertTier::Good
        }
    }
}

impl fmt::Display for AlertTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertTier::None => write!(f, "NONE"),
            AlertTier::Caution => write!(f, "CAUTION"),
            AlertTier::Good => write!(f, "GOOD"),
        }
    }
}

/// Serde adapter for f64 fields that may legitimately be infinite or NaN.
///
/// Finite values stay plain JSON numbers; non-finite values become the
/// strings `"Infinity"`, `"-Infinity"` and `"NaN"` instead of `null`.
pub mod non_finite {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        struct NonFiniteVisitor;

        impl<'de> Visitor<'de> for NonFiniteVisitor {
            type Value = f64;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number or one of \"Infinity\", \"-Infinity\", \"NaN\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
                match v {
                    "Infinity" | "inf" => Ok(f64::INFINITY),
                    "-Infinity" | "-inf" => Ok(f64::NEG_INFINITY),
                    "NaN" => Ok(f64::NAN),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(NonFiniteVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_uses_camel_case_feed_fields() {
        let json = r#"{"title":"BTC 100k","yesOdds":45,"volume":"1.2M","historicalWinRate":38,"sampleSize":156}"#;
        let obs: MarketObservation = serde_json::from_str(json).unwrap();

        assert_eq!(obs.title, "BTC 100k");
        assert_eq!(obs.yes_odds, 45.0);
        assert_eq!(obs.historical_win_rate, 38.0);
        assert_eq!(obs.sample_size, 156);
        assert_eq!(obs.volume, "1.2M");
    }

    #[test]
    fn sample_size_defaults_to_zero() {
        let json = r#"{"title":"x","yesOdds":50,"volume":"","historicalWinRate":50}"#;
        let obs: MarketObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.sample_size, 0);
    }

    #[test]
    fn signal_requires_both_flags() {
        assert_eq!(TradeSignal::from_flags(true, true), TradeSignal::Tradeable);
        assert_eq!(TradeSignal::from_flags(true, false), TradeSignal::Watch);
        assert_eq!(TradeSignal::from_flags(false, true), TradeSignal::Watch);
        assert_eq!(TradeSignal::Tradeable.to_string(), "BUY");
    }

    #[test]
    fn confidence_band_edges() {
        assert_eq!(ConfidenceBand::from_score(95), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(70), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(69), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(40), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(39), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_score(0), ConfidenceBand::Low);
    }

    #[test]
    fn alert_tier_thresholds() {
        assert_eq!(AlertTier::classify(0, 0), AlertTier::None);
        assert_eq!(AlertTier::classify(0, 6), AlertTier::None);
        // 1 < 0.3 * 6 = 1.8
        assert_eq!(AlertTier::classify(1, 6), AlertTier::Caution);
        assert_eq!(AlertTier::classify(2, 6), AlertTier::Good);
        // 3 == 0.3 * 10 is not below the ratio
        assert_eq!(AlertTier::classify(3, 10), AlertTier::Good);
        assert_eq!(AlertTier::classify(1, 1), AlertTier::Good);
    }

    #[derive(Serialize, Deserialize)]
    struct Wrapped {
        #[serde(with = "non_finite")]
        value: f64,
    }

    #[test]
    fn non_finite_values_survive_json() {
        let json = serde_json::to_string(&Wrapped { value: f64::INFINITY }).unwrap();
        assert_eq!(json, r#"{"value":"Infinity"}"#);
        let back: Wrapped = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value, f64::INFINITY);

        let json = serde_json::to_string(&Wrapped { value: f64::NAN }).unwrap();
        let back: Wrapped = serde_json::from_str(&json).unwrap();
        assert!(back.value.is_nan());

        let json = serde_json::to_string(&Wrapped { value: 2.25 }).unwrap();
        assert_eq!(json, r#"{"value":2.25}"#);
    }
}
