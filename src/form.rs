use chrono::NaiveDate;

use crate::clamp_points;
use crate::config::FormConfig;
use crate::evidence::RecentMatch;

const RECENT_SWING_WINDOW: usize = 3;
const QUALITY_GAP: f64 = 0.2;
const NEUTRAL_QUALITY: f64 = 0.5;

/// The most recent `n` matches (input is ordered most recent last).
pub fn latest(matches: &[RecentMatch], n: usize) -> &[RecentMatch] {
    &matches[matches.len().saturating_sub(n)..]
}

/// Recent-form points, positive for A. `None` if either side has no recent matches.
pub fn form_score(
    form_a: &[RecentMatch],
    form_b: &[RecentMatch],
    as_of: NaiveDate,
    cfg: &FormConfig,
) -> Option<f64> {
    let form_a = latest(form_a, cfg.window);
    let form_b = latest(form_b, cfg.window);
    if form_a.is_empty() || form_b.is_empty() {
        return None;
    }

    let wins_a = count_wins(form_a) as f64;
    let wins_b = count_wins(form_b) as f64;
    let mut points = (wins_a - wins_b) * cfg.per_win_points;

    let recent_a = count_wins(latest(form_a, RECENT_SWING_WINDOW));
    let recent_b = count_wins(latest(form_b, RECENT_SWING_WINDOW));
    if recent_a == RECENT_SWING_WINDOW && recent_b <= 1 {
        points += cfg.recent_swing_bonus;
    } else if recent_b == RECENT_SWING_WINDOW && recent_a <= 1 {
        points -= cfg.recent_swing_bonus;
    }

    if has_win_streak(form_a, cfg.win_streak_length) {
        points += cfg.win_streak_bonus;
    }
    if has_win_streak(form_b, cfg.win_streak_length) {
        points -= cfg.win_streak_bonus;
    }

    let quality_a = opponent_quality(form_a);
    let quality_b = opponent_quality(form_b);
    if quality_a > quality_b + QUALITY_GAP {
        points += cfg.quality_bonus;
    } else if quality_b > quality_a + QUALITY_GAP {
        points -= cfg.quality_bonus;
    }

    points += rest_adjustment(form_a, as_of, cfg) - rest_adjustment(form_b, as_of, cfg);

    Some(clamp_points(points, cfg.max_points))
}

fn count_wins(matches: &[RecentMatch]) -> usize {
    matches.iter().filter(|m| m.is_win()).count()
}

fn has_win_streak(matches: &[RecentMatch], length: usize) -> bool {
    length > 0 && matches.len() >= length && latest(matches, length).iter().all(RecentMatch::is_win)
}

/// Average strength of beaten opponents in [0, 1]; 0.5 when no win has a known rank.
pub fn opponent_quality(matches: &[RecentMatch]) -> f64 {
    let scores: Vec<f64> = matches
        .iter()
        .filter(|m| m.is_win())
        .filter_map(|m| m.opponent_rank)
        // Rank 0 is a placeholder for an unknown opponent.
        .filter(|rank| *rank > 0)
        .map(|rank| match rank {
            1..=10 => 1.0,
            11..=50 => 0.8,
            51..=100 => 0.6,
            _ => 0.4,
        })
        .collect();
    if scores.is_empty() {
        return NEUTRAL_QUALITY;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Fatigue (negative) or freshness (positive) from how many dated matches fall in the
/// last 7 and 14 days.
pub fn rest_adjustment(matches: &[RecentMatch], as_of: NaiveDate, cfg: &FormConfig) -> f64 {
    let mut last_7 = 0usize;
    let mut last_14 = 0usize;
    for m in matches {
        let Some(date) = m.date else { continue };
        let days_ago = (as_of - date).num_days();
        if days_ago <= 7 {
            last_7 += 1;
        }
        if days_ago <= 14 {
            last_14 += 1;
        }
    }

    if last_7 >= 5 {
        -cfg.fatigue_penalty
    } else if last_7 >= 3 {
        -cfg.busy_penalty
    } else if last_14 == 0 {
        -cfg.inactivity_penalty
    } else if (1..=2).contains(&last_7) {
        cfg.freshness_bonus
    } else {
        0.0
    }
}
