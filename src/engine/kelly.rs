/// Fractional-Kelly ceiling applied to every market.
pub const KELLY_CAP: f64 = 0.25;

#[derive(Debug, Clone, Copy)]
pub struct KellyQuote {
    /// Net odds `payout - 1`
    pub b: f64,
    pub p: f64,
    pub f_raw: f64,
    pub f_capped: f64,
}

/// Kelly fraction `(b*p - q) / b`, clamped into `[0, KELLY_CAP]`.
///
/// No edge (`b <= 0`) always sizes to zero.
pub fn compute_capped_kelly(win_rate_percent: f64, payout_odds_percent: f64) -> KellyQuote {
    let p = win_rate_percent / 100.0;
    let q = 1.0 - p;
    let b = payout_odds_percent / 100.0 - 1.0;

    let f_raw = if b > 0.0 { ((b * p) - q) / b } else { 0.0 };
    // f64::max drops NaN, so overflowed inputs still land on 0
    let f_capped = f_raw.max(0.0).min(KELLY_CAP);

    KellyQuote {
        b,
        p,
        f_raw,
        f_capped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kelly_zero_without_edge() {
        let q = compute_capped_kelly(90.0, 100.0);
        assert_eq!(q.f_capped, 0.0);
        let q = compute_capped_kelly(58.0, 62.0);
        assert_eq!(q.f_capped, 0.0);
    }

    #[test]
    fn kelly_zero_when_negative_edge() {
        // b = 0.5, p = 0.5: (0.25 - 0.5) / 0.5 < 0
        let q = compute_capped_kelly(50.0, 150.0);
        assert!(q.f_raw < 0.0);
        assert_eq!(q.f_capped, 0.0);
    }

    #[test]
    fn kelly_below_cap_passes_through() {
        // b = 0.6, p = 0.7: (0.42 - 0.3) / 0.6 = 0.2
        let q = compute_capped_kelly(70.0, 160.0);
        assert!((q.f_capped - 0.2).abs() < 1e-9);
    }

    #[test]
    fn kelly_capped_at_quarter() {
        let q = compute_capped_kelly(60.0, 250.0);
        assert!(q.f_raw > KELLY_CAP);
        assert_eq!(q.f_capped, KELLY_CAP);
    }

    #[test]
    fn kelly_bounded_for_extreme_inputs() {
        for (w, o) in [
            (-500.0, 1e6),
            (1e9, 101.0),
            (f64::MAX, f64::MAX),
            (50.0, 100.000001),
        ] {
            let q = compute_capped_kelly(w, o);
            assert!((0.0..=KELLY_CAP).contains(&q.f_capped), "{w} {o}");
        }
    }
}
