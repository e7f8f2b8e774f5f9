/// Stake lost on a losing outcome; the risk/reward model assumes a 1:1 stop.
pub const AVG_LOSS: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct EdgeQuote {
    pub win_frac: f64,
    pub loss_frac: f64,
    pub payout_frac: f64,
    /// Net gain per unit stake on a win (`payout_frac - 1`)
    pub avg_win: f64,
    pub ev: f64,
    /// Infinite or NaN when `loss_frac` is zero
    pub risk_reward: f64,
}

/// EV and risk/reward from percent inputs.
///
/// `ev = p * (payout - 1) - (1 - p)`, with a winning outcome netting
/// `payout - 1` and a losing one costing the whole stake.
pub fn estimate_edge(win_rate_percent: f64, payout_odds_percent: f64) -> EdgeQuote {
    let win_frac = win_rate_percent / 100.0;
    let loss_frac = 1.0 - win_frac;
    let payout_frac = payout_odds_percent / 100.0;

    let avg_win = payout_frac - 1.0;
    let ev = win_frac * avg_win - loss_frac * AVG_LOSS;
    let risk_reward = (win_frac * avg_win) / (loss_frac * AVG_LOSS);

    EdgeQuote {
        win_frac,
        loss_frac,
        payout_frac,
        avg_win,
        ev,
        risk_reward,
    }
}
