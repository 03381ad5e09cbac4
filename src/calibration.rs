use serde::Serialize;

use crate::analyzer::{AnalysisResult, Confidence};
use crate::evidence::Side;

/// A scored match that named a favorite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    pub favorite: Side,
    pub probability: f64,
    pub confidence: Confidence,
    pub qualifies: bool,
}

impl Pick {
    pub fn from_result(result: &AnalysisResult) -> Option<Self> {
        Some(Self {
            favorite: result.favorite?,
            probability: result.win_probability,
            confidence: result.confidence,
            qualifies: result.qualifies,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub samples: usize,
    pub brier: f64,
    pub log_loss: f64,
    pub accuracy: f64,
}

impl Metrics {
    fn empty() -> Self {
        Self {
            samples: 0,
            brier: 0.0,
            log_loss: 0.0,
            accuracy: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationBin {
    pub bucket_start: f64,
    pub bucket_end: f64,
    pub count: usize,
    pub avg_pred: f64,
    pub actual_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierHitRate {
    pub confidence: Confidence,
    pub picks: usize,
    pub hits: usize,
    pub hit_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestReport {
    pub matches: usize,
    /// Matches scored exactly level, so no favorite to check.
    pub undecided: usize,
    pub all_picks: Metrics,
    pub qualified_picks: Metrics,
    pub tiers: Vec<TierHitRate>,
    pub bins: Vec<CalibrationBin>,
}

/// Brier score, log loss and accuracy of the favorite's probability against who won.
pub fn evaluate_picks(picks: &[Pick], winners: &[Side]) -> Metrics {
    if picks.is_empty() || picks.len() != winners.len() {
        return Metrics::empty();
    }

    let mut brier_sum = 0.0_f64;
    let mut log_loss_sum = 0.0_f64;
    let mut correct = 0usize;

    for (pick, winner) in picks.iter().zip(winners) {
        let p = pick.probability.clamp(1e-12, 1.0 - 1e-12);
        let hit = pick.favorite == *winner;
        let y = if hit { 1.0 } else { 0.0 };
        brier_sum += (p - y).powi(2);
        log_loss_sum += if hit { -p.ln() } else { -(1.0 - p).ln() };
        if hit {
            correct += 1;
        }
    }

    let n = picks.len() as f64;
    Metrics {
        samples: picks.len(),
        brier: brier_sum / n,
        log_loss: log_loss_sum / n,
        accuracy: correct as f64 / n,
    }
}

/// Reliability table over the reported probability range [0.5, 1.0].
pub fn calibration_bins(picks: &[Pick], winners: &[Side], bins: usize) -> Vec<CalibrationBin> {
    let bins = bins.max(2);
    let width = 0.5 / bins as f64;
    let mut counts = vec![0usize; bins];
    let mut pred_sum = vec![0.0_f64; bins];
    let mut actual_sum = vec![0.0_f64; bins];

    for (pick, winner) in picks.iter().zip(winners) {
        let p = pick.probability.clamp(0.5, 1.0);
        let idx = (((p - 0.5) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
        pred_sum[idx] += p;
        if pick.favorite == *winner {
            actual_sum[idx] += 1.0;
        }
    }

    (0..bins)
        .map(|i| {
            let count = counts[i];
            let (avg_pred, actual_rate) = if count > 0 {
                (pred_sum[i] / count as f64, actual_sum[i] / count as f64)
            } else {
                (0.0, 0.0)
            };
            CalibrationBin {
                bucket_start: 0.5 + i as f64 * width,
                bucket_end: 0.5 + (i + 1) as f64 * width,
                count,
                avg_pred,
                actual_rate,
            }
        })
        .collect()
}

/// Hit rate per confidence tier, strongest tier first. Empty tiers are kept.
pub fn tier_hit_rates(picks: &[Pick], winners: &[Side]) -> Vec<TierHitRate> {
    [
        Confidence::VeryHigh,
        Confidence::High,
        Confidence::Medium,
        Confidence::Low,
    ]
    .into_iter()
    .map(|confidence| {
        let mut n = 0usize;
        let mut hits = 0usize;
        for (pick, winner) in picks.iter().zip(winners) {
            if pick.confidence != confidence {
                continue;
            }
            n += 1;
            if pick.favorite == *winner {
                hits += 1;
            }
        }
        TierHitRate {
            confidence,
            picks: n,
            hits,
            hit_rate: if n > 0 { hits as f64 / n as f64 } else { 0.0 },
        }
    })
    .collect()
}

pub fn backtest(results: &[AnalysisResult], winners: &[Side], bins: usize) -> BacktestReport {
    let mut picks = Vec::with_capacity(results.len());
    let mut pick_winners = Vec::with_capacity(results.len());
    let mut undecided = 0usize;
    for (result, winner) in results.iter().zip(winners) {
        match Pick::from_result(result) {
            Some(pick) => {
                picks.push(pick);
                pick_winners.push(*winner);
            }
            None => undecided += 1,
        }
    }

    let (qualified, qualified_winners): (Vec<Pick>, Vec<Side>) = picks
        .iter()
        .zip(&pick_winners)
        .filter(|(p, _)| p.qualifies)
        .map(|(p, w)| (*p, *w))
        .unzip();

    BacktestReport {
        matches: results.len().min(winners.len()),
        undecided,
        all_picks: evaluate_picks(&picks, &pick_winners),
        qualified_picks: evaluate_picks(&qualified, &qualified_winners),
        tiers: tier_hit_rates(&picks, &pick_winners),
        bins: calibration_bins(&picks, &pick_winners, bins),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(favorite: Side, probability: f64, confidence: Confidence, qualifies: bool) -> Pick {
        Pick {
            favorite,
            probability,
            confidence,
            qualifies,
        }
    }

    #[test]
    fn perfect_confident_picks_have_tiny_brier() {
        let picks = vec![
            pick(Side::A, 0.95, Confidence::VeryHigh, true),
            pick(Side::B, 0.95, Confidence::VeryHigh, true),
        ];
        let m = evaluate_picks(&picks, &[Side::A, Side::B]);
        assert_eq!(m.samples, 2);
        assert_eq!(m.accuracy, 1.0);
        assert!((m.brier - 0.0025).abs() < 1e-12);
    }

    #[test]
    fn wrong_pick_is_penalized() {
        let picks = vec![pick(Side::A, 0.9, Confidence::High, true)];
        let m = evaluate_picks(&picks, &[Side::B]);
        assert_eq!(m.accuracy, 0.0);
        assert!((m.brier - 0.81).abs() < 1e-12);
        assert!((m.log_loss - -(0.1_f64).ln()).abs() < 1e-9);
    }

    #[test]
    fn mismatched_lengths_yield_empty_metrics() {
        let picks = vec![pick(Side::A, 0.6, Confidence::Low, false)];
        assert_eq!(evaluate_picks(&picks, &[]).samples, 0);
    }

    #[test]
    fn bins_cover_reported_range() {
        let picks = vec![
            pick(Side::A, 0.5, Confidence::Low, false),
            pick(Side::A, 0.95, Confidence::VeryHigh, true),
        ];
        let bins = calibration_bins(&picks, &[Side::A, Side::B], 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[0].actual_rate, 1.0);
        assert_eq!(bins[4].count, 1);
        assert_eq!(bins[4].actual_rate, 0.0);
        assert!((bins[4].bucket_end - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tier_rates_split_by_confidence() {
        let picks = vec![
            pick(Side::A, 0.9, Confidence::VeryHigh, true),
            pick(Side::A, 0.9, Confidence::VeryHigh, true),
            pick(Side::B, 0.55, Confidence::Low, false),
        ];
        let tiers = tier_hit_rates(&picks, &[Side::A, Side::B, Side::A]);
        assert_eq!(tiers[0].confidence, Confidence::VeryHigh);
        assert_eq!((tiers[0].picks, tiers[0].hits), (2, 1));
        assert_eq!(tiers[3].hit_rate, 0.0);
        assert_eq!(tiers[1].picks, 0);
    }
}
