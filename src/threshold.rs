use std::collections::BTreeSet;

use crate::analyzer::Factor;
use crate::config::ScoringConfig;

pub const MIN_WIN_PROBABILITY: f64 = 0.50;
pub const MAX_WIN_PROBABILITY: f64 = 0.95;

const FACTOR_COUNT: usize = 4;

/// Qualification bar given which factors had usable evidence.
///
/// With head-to-head history present, each missing factor lowers the bar by
/// `threshold_relax_step`. Without it the bar is raised once by `missing_h2h_penalty`.
pub fn adaptive_threshold(factors_used: &BTreeSet<Factor>, cfg: &ScoringConfig) -> f64 {
    let base = cfg.threshold;
    if !cfg.adaptive_threshold {
        return base;
    }
    let present = factors_used.len().min(FACTOR_COUNT);
    if present == FACTOR_COUNT {
        return base;
    }
    if factors_used.contains(&Factor::H2h) {
        base - (FACTOR_COUNT - present) as f64 * cfg.threshold_relax_step
    } else {
        base + cfg.missing_h2h_penalty
    }
}

/// Logistic map of |score| around the base threshold, kept within [0.50, 0.95].
pub fn win_probability(total_score: f64, cfg: &ScoringConfig) -> f64 {
    let scale = if cfg.probability_scale.is_finite() && cfg.probability_scale > 0.0 {
        cfg.probability_scale
    } else {
        1.0
    };
    let x = (total_score.abs() - cfg.threshold) / scale;
    let p = 1.0 / (1.0 + (-x).exp());
    if p.is_nan() {
        return MIN_WIN_PROBABILITY;
    }
    p.max(MIN_WIN_PROBABILITY).min(MAX_WIN_PROBABILITY)
}
