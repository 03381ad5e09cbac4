use crate::clamp_points;
use crate::config::MomentumConfig;
use crate::evidence::RecentMatch;
use crate::score::{Margin, classify_margin};

const ACTIVE_STREAK: usize = 3;
const CONFIDENCE_GAP: f64 = 0.3;

/// Short-horizon momentum, positive for A. Callers pass the same windowed
/// recent-match slices the form evaluator sees.
pub fn momentum_score(
    form_a: &[RecentMatch],
    form_b: &[RecentMatch],
    cfg: &MomentumConfig,
) -> Option<f64> {
    if form_a.is_empty() || form_b.is_empty() {
        return None;
    }

    let mut points = 0.0_f64;

    let streak_a = current_streak(form_a);
    let streak_b = current_streak(form_b);
    if streak_a >= ACTIVE_STREAK && streak_b == 0 {
        points += cfg.streak_bonus;
    } else if streak_b >= ACTIVE_STREAK && streak_a == 0 {
        points -= cfg.streak_bonus;
    }

    let conf_a = win_confidence(form_a);
    let conf_b = win_confidence(form_b);
    if conf_a > conf_b + CONFIDENCE_GAP {
        points += cfg.confidence_bonus;
    } else if conf_b > conf_a + CONFIDENCE_GAP {
        points -= cfg.confidence_bonus;
    }

    Some(clamp_points(points, cfg.max_points))
}

/// Consecutive wins ending at the most recent match.
pub fn current_streak(matches: &[RecentMatch]) -> usize {
    matches.iter().rev().take_while(|m| m.is_win()).count()
}

/// How comfortably a side has been winning, in [0, 1]; 0.5 with no wins.
pub fn win_confidence(matches: &[RecentMatch]) -> f64 {
    let scores: Vec<f64> = matches
        .iter()
        .filter(|m| m.is_win())
        .map(|m| match classify_margin(&m.score) {
            Margin::Straight => 1.0,
            Margin::DroppedSet | Margin::Decider => 0.6,
            Margin::Unclassified => 0.8,
        })
        .collect();
    if scores.is_empty() {
        return 0.5;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
