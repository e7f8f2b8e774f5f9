//! Expected-value engine.
//!
//! Pure per-market calculations: no I/O and no state kept between calls.

pub mod confidence;
pub mod edge;
pub mod kelly;
pub mod metrics;

pub use confidence::{confidence_score, parse_volume_label, volume_multiplier, VolumeLabel};
pub use edge::{estimate_edge, EdgeQuote};
pub use kelly::{compute_capped_kelly, KellyQuote, KELLY_CAP};
pub use metrics::{evaluate, MetricResult};
