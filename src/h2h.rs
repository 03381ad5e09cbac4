use chrono::NaiveDate;
use tracing::trace;

use crate::clamp_points;
use crate::config::H2hConfig;
use crate::evidence::{MatchObservation, Side};
use crate::score::{Margin, classify_margin};

const DOMINANCE_MIN_MATCHES: usize = 3;
const QUALITY_DOMINANCE_LEVEL: f64 = 0.8;

/// Time-decayed head-to-head points, positive for A. `None` when no meeting has a
/// known winner.
pub fn h2h_score(matches: &[MatchObservation], as_of: NaiveDate, cfg: &H2hConfig) -> Option<f64> {
    let mut total_points = 0.0_f64;
    let mut wins_a = 0usize;
    let mut wins_b = 0usize;

    for m in matches {
        let Some(winner) = m.winner else { continue };
        let points = cfg.base_points * recency_multiplier(m.date, as_of, cfg);
        trace!(?winner, date = ?m.date, points, "h2h meeting");
        total_points += winner.sign() * points;
        match winner {
            Side::A => wins_a += 1,
            Side::B => wins_b += 1,
        }
    }

    let decided = wins_a + wins_b;
    if decided == 0 {
        return None;
    }

    if decided >= DOMINANCE_MIN_MATCHES {
        if wins_a == decided {
            total_points += cfg.dominance_bonus;
        } else if wins_b == decided {
            total_points -= cfg.dominance_bonus;
        }
    }

    let level = dominance_level(matches);
    if level >= QUALITY_DOMINANCE_LEVEL && wins_a > wins_b {
        total_points += cfg.quality_bonus;
    } else if level <= -QUALITY_DOMINANCE_LEVEL && wins_b > wins_a {
        total_points -= cfg.quality_bonus;
    }

    Some(clamp_points(total_points, cfg.max_points))
}

/// Average signed margin of the decided meetings, in [-1, 1].
pub fn dominance_level(matches: &[MatchObservation]) -> f64 {
    let mut sum = 0.0_f64;
    let mut n = 0usize;
    for m in matches {
        let Some(winner) = m.winner else { continue };
        sum += winner.sign() * margin_dominance(classify_margin(&m.score));
        n += 1;
    }
    if n == 0 { 0.0 } else { sum / n as f64 }
}

fn margin_dominance(margin: Margin) -> f64 {
    match margin {
        Margin::Straight => 1.0,
        Margin::DroppedSet => 0.6,
        Margin::Decider => 0.5,
        Margin::Unclassified => 0.7,
    }
}

fn recency_multiplier(date: Option<NaiveDate>, as_of: NaiveDate, cfg: &H2hConfig) -> f64 {
    let Some(date) = date else {
        return 1.0;
    };
    let days_ago = (as_of - date).num_days();
    if days_ago <= 180 {
        cfg.very_recent_multiplier
    } else if days_ago <= 365 {
        cfg.recent_multiplier
    } else if days_ago > 730 {
        cfg.stale_multiplier
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn meeting(days_ago: i64, winner: Side, score: &str) -> MatchObservation {
        MatchObservation {
            date: Some(today() - Duration::days(days_ago)),
            winner: Some(winner),
            score: score.to_string(),
            ..MatchObservation::default()
        }
    }

    #[test]
    fn empty_history_is_not_evidence() {
        let cfg = H2hConfig::default();
        assert_eq!(h2h_score(&[], today(), &cfg), None);
        let undecided = vec![MatchObservation::default()];
        assert_eq!(h2h_score(&undecided, today(), &cfg), None);
    }

    #[test]
    fn recent_sweep_hits_the_cap() {
        let cfg = H2hConfig::default();
        let matches = vec![
            meeting(10, Side::A, "2-0"),
            meeting(20, Side::A, "2-0"),
            meeting(30, Side::A, "2-0"),
        ];
        // 3 * 16 + 10 dominance + 5 quality = 63, capped.
        assert_eq!(h2h_score(&matches, today(), &cfg), Some(40.0));
    }

    #[test]
    fn uncapped_sweep_adds_both_bonuses() {
        let cfg = H2hConfig {
            max_points: 100.0,
            ..H2hConfig::default()
        };
        let matches = vec![
            meeting(10, Side::B, "0-2"),
            meeting(20, Side::B, "6-1 6-2"),
            meeting(30, Side::B, "2-0"),
        ];
        assert_eq!(h2h_score(&matches, today(), &cfg), Some(-63.0));
    }

    #[test]
    fn decay_buckets() {
        let cfg = H2hConfig::default();
        let one = |days| h2h_score(&[meeting(days, Side::A, "2-1")], today(), &cfg).unwrap();
        assert_eq!(one(100), 16.0);
        assert_eq!(one(300), 12.0);
        assert_eq!(one(500), 8.0);
        assert_eq!(one(1000), 4.0);
    }

    #[test]
    fn decay_bucket_edges_are_inclusive() {
        let cfg = H2hConfig::default();
        let one = |days| h2h_score(&[meeting(days, Side::A, "2-1")], today(), &cfg).unwrap();
        assert_eq!(one(180), 16.0);
        assert_eq!(one(181), 12.0);
        assert_eq!(one(365), 12.0);
        assert_eq!(one(366), 8.0);
        assert_eq!(one(730), 8.0);
        assert_eq!(one(731), 4.0);
        // Dated after `as_of`: treated as very recent.
        assert_eq!(one(-5), 16.0);
    }

    #[test]
    fn undated_meeting_uses_base_weight() {
        let cfg = H2hConfig::default();
        let m = MatchObservation {
            winner: Some(Side::B),
            score: "2-1".to_string(),
            ..MatchObservation::default()
        };
        assert_eq!(h2h_score(&[m], today(), &cfg), Some(-8.0));
    }

    #[test]
    fn quality_bonus_needs_win_majority() {
        let cfg = H2hConfig::default();
        // Split record: dominance averages to zero, no bonuses.
        let matches = vec![meeting(10, Side::A, "2-0"), meeting(10, Side::B, "2-0")];
        assert_eq!(h2h_score(&matches, today(), &cfg), Some(0.0));
    }

    #[test]
    fn dominance_level_mixes_margins() {
        let matches = vec![
            meeting(1, Side::A, "2-0"),
            meeting(1, Side::A, "2-1"),
            meeting(1, Side::B, "3-2"),
            meeting(1, Side::A, "w/o"),
        ];
        let level = dominance_level(&matches);
        assert!((level - (1.0 + 0.6 - 0.5 + 0.7) / 4.0).abs() < 1e-12);
    }
}
