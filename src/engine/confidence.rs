//! Confidence scoring from odds deviation and traded volume.
//!
//! Odds far from a coin flip are treated as more informative, and deeper
//! markets scale the score up to fixed caps.

/// Weight of the odds deviation term
pub const DEVIATION_WEIGHT: f64 = 0.6;
/// Floor contributed regardless of deviation
pub const BASE_WEIGHT: f64 = 0.4;
pub const MAX_CONFIDENCE: u8 = 95;

const MILLIONS_FACTOR: f64 = 2.0;
const MILLIONS_CAP: f64 = 3.0;
const THOUSANDS_DIVISOR: f64 = 500.0;
const THOUSANDS_OFFSET: f64 = 0.5;
const THOUSANDS_CAP: f64 = 2.0;

/// Volume label decoded into its unit and numeric prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeLabel {
    Millions(f64),
    Thousands(f64),
    /// No recognized unit, or no number in front of it
    Unscaled,
}

/// Decode a label such as `"1.2M"` or `"890K"`.
///
/// `M` wins over `K` when both appear. The number is the leading decimal
/// literal of the label; a unit without a readable number is `Unscaled`.
pub fn parse_volume_label(label: &str) -> VolumeLabel {
    let millions = label.contains('M');
    if !millions && !label.contains('K') {
        return VolumeLabel::Unscaled;
    }

    match leading_number(label) {
        Some(value) if millions => VolumeLabel::Millions(value),
        Some(value) => VolumeLabel::Thousands(value),
        None => VolumeLabel::Unscaled,
    }
}

/// Liquidity multiplier applied to the confidence score.
pub fn volume_multiplier(label: &str) -> f64 {
    match parse_volume_label(label) {
        VolumeLabel::Millions(m) => (m * MILLIONS_FACTOR).min(MILLIONS_CAP),
        VolumeLabel::Thousands(k) => (k / THOUSANDS_DIVISOR + THOUSANDS_OFFSET).min(THOUSANDS_CAP),
        VolumeLabel::Unscaled => 1.0,
    }
}

/// Integer confidence in `[0, MAX_CONFIDENCE]`.
pub fn confidence_score(odds_percent: f64, volume_label: &str) -> u8 {
    let deviation = (odds_percent - 50.0).abs() / 50.0;
    let raw = (deviation * DEVIATION_WEIGHT + BASE_WEIGHT) * volume_multiplier(volume_label) * 100.0;

    let score = raw.min(MAX_CONFIDENCE as f64).round();
    if score.is_nan() || score <= 0.0 {
        0
    } else {
        score as u8
    }
}

/// Longest prefix of `s` (after leading whitespace) that reads as a decimal
/// literal: optional sign, digits with an optional fraction, optional exponent.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unit_and_prefix() {
        assert_eq!(parse_volume_label("1.2M"), VolumeLabel::Millions(1.2));
        assert_eq!(parse_volume_label("890K"), VolumeLabel::Thousands(890.0));
        assert_eq!(parse_volume_label(" 2.1M USDC"), VolumeLabel::Millions(2.1));
        assert_eq!(parse_volume_label("5e2K"), VolumeLabel::Thousands(500.0));
        assert_eq!(parse_volume_label(".5M"), VolumeLabel::Millions(0.5));
        assert_eq!(parse_volume_label("3.M"), VolumeLabel::Millions(3.0));
    }

    #[test]
    fn millions_checked_before_thousands() {
        assert_eq!(parse_volume_label("1.5MK"), VolumeLabel::Millions(1.5));
    }

    #[test]
    fn unrecognized_labels_are_unscaled() {
        assert_eq!(parse_volume_label("420000"), VolumeLabel::Unscaled);
        assert_eq!(parse_volume_label(""), VolumeLabel::Unscaled);
        assert_eq!(parse_volume_label("1.2m"), VolumeLabel::Unscaled);
        assert_eq!(parse_volume_label("MAX"), VolumeLabel::Unscaled);
        assert_eq!(parse_volume_label("-.K"), VolumeLabel::Unscaled);
        assert_eq!(volume_multiplier("n/a"), 1.0);
    }

    #[test]
    fn multiplier_caps() {
        assert!((volume_multiplier("1.2M") - 2.4).abs() < 1e-12);
        assert_eq!(volume_multiplier("2.1M"), 3.0);
        assert!((volume_multiplier("560K") - 1.62).abs() < 1e-12);
        assert_eq!(volume_multiplier("890K"), 2.0);
    }

    #[test]
    fn confidence_matches_reference_markets() {
        assert_eq!(confidence_score(45.0, "1.2M"), 95);
        assert_eq!(confidence_score(38.0, "560K"), 88);
        assert_eq!(confidence_score(55.0, "420K"), 62);
        // coin flip without volume: 0.4 * 1 * 100
        assert_eq!(confidence_score(50.0, ""), 40);
    }

    #[test]
    fn confidence_floored_at_zero() {
        assert_eq!(confidence_score(50.0, "-3M"), 0);
        assert_eq!(confidence_score(50.0, "0K"), 20);
    }

    #[test]
    fn confidence_never_exceeds_cap() {
        for odds in [0.0, 1.0, 25.0, 50.0, 75.0, 100.0, 1e12] {
            for vol in ["", "9M", "100K", "1K", "junk"] {
                assert!(confidence_score(odds, vol) <= MAX_CONFIDENCE);
            }
        }
    }
}
