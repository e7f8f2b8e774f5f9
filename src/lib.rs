//! EvBoard Library
//!
//! Expected-value ranking for prediction markets:
//! - Per-market EV, risk/reward, capped Kelly and confidence (`engine`)
//! - Batch ranking and fund-management rollup (`portfolio`)
//! - Feed loading with last-known-good fallback (`feed`)
//!
//! # Example
//!
//! ```
//! use evboard::engine::evaluate;
//! use evboard::portfolio::summarize;
//! use evboard::types::{AlertTier, MarketObservation};
//!
//! let m = evaluate(38.0, 45.0, "1.2M");
//! assert!(!m.is_positive_ev);
//!
//! let summary = summarize(&[MarketObservation::new("BTC 100k", 45.0, 38.0, 156, "1.2M")]);
//! assert_eq!(summary.alert_tier, AlertTier::None);
//! ```

pub mod config;
pub mod engine;
pub mod feed;
pub mod persistence;
pub mod portfolio;
pub mod report;
pub mod types;

pub use engine::{evaluate, MetricResult};
pub use portfolio::{summarize, PortfolioSummary, ScoredMarket};
pub use types::{AlertTier, ConfidenceBand, MarketObservation, TradeSignal};
