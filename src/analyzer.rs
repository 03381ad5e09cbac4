use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfidenceCuts, ScoringConfig};
use crate::evidence::{MatchEvidence, Side};
use crate::form::{form_score, latest};
use crate::h2h::h2h_score;
use crate::momentum::momentum_score;
use crate::surface::surface_score;
use crate::threshold::{adaptive_threshold, win_probability};
use crate::tournament::{TournamentTier, classify_tournament};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    H2h,
    CurrentForm,
    SurfaceForm,
    Momentum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    MissingFormData,
    MissingSurfaceData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Confidence {
    pub fn from_score(total_score: f64, cuts: &ConfidenceCuts) -> Self {
        let s = total_score.abs();
        if s >= cuts.very_high {
            Confidence::VeryHigh
        } else if s >= cuts.high {
            Confidence::High
        } else if s >= cuts.medium {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
            Confidence::VeryHigh => "very_high",
        }
    }
}

/// Signed per-factor points; each lies within its configured cap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub h2h: f64,
    pub current_form: f64,
    pub surface_form: f64,
    pub momentum: f64,
}

impl FactorBreakdown {
    pub fn sum(&self) -> f64 {
        self.h2h + self.current_form + self.surface_form + self.momentum
    }

    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::H2h => self.h2h,
            Factor::CurrentForm => self.current_form,
            Factor::SurfaceForm => self.surface_form,
            Factor::Momentum => self.momentum,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_score: f64,
    pub score_before_weight: f64,
    pub breakdown: FactorBreakdown,
    pub favorite: Option<Side>,
    pub favorite_score: f64,
    pub confidence: Confidence,
    pub qualifies: bool,
    pub threshold_used: f64,
    pub win_probability: f64,
    pub tournament_tier: TournamentTier,
    pub tournament_weight: f64,
    pub h2h_matches: usize,
    pub factors_used: BTreeSet<Factor>,
    pub warnings: BTreeSet<Warning>,
}

/// Scores one match. Pure: the same evidence and config always give the same result.
pub fn analyze(evidence: &MatchEvidence, cfg: &ScoringConfig) -> AnalysisResult {
    let mut breakdown = FactorBreakdown::default();
    let mut factors_used = BTreeSet::new();
    let mut warnings = BTreeSet::new();

    if let Some(points) = h2h_score(&evidence.h2h, evidence.as_of, &cfg.h2h) {
        breakdown.h2h = points;
        factors_used.insert(Factor::H2h);
    }

    let recent_a = &evidence.side_a.recent_matches;
    let recent_b = &evidence.side_b.recent_matches;
    match form_score(recent_a, recent_b, evidence.as_of, &cfg.form) {
        Some(points) => {
            breakdown.current_form = points;
            factors_used.insert(Factor::CurrentForm);
        }
        None => {
            warnings.insert(Warning::MissingFormData);
        }
    }

    match surface_score(
        evidence.surface.as_deref(),
        &evidence.side_a,
        &evidence.side_b,
        cfg.form.window,
        &cfg.surface,
    ) {
        Some(points) => {
            breakdown.surface_form = points;
            factors_used.insert(Factor::SurfaceForm);
        }
        None => {
            warnings.insert(Warning::MissingSurfaceData);
        }
    }

    let window_a = latest(recent_a, cfg.form.window);
    let window_b = latest(recent_b, cfg.form.window);
    if let Some(points) = momentum_score(window_a, window_b, &cfg.momentum) {
        breakdown.momentum = points;
        factors_used.insert(Factor::Momentum);
    }

    let score_before_weight = breakdown.sum();
    let tournament_tier = classify_tournament(&evidence.tournament, &cfg.tier_rules);
    let tournament_weight = cfg.tier_weights.weight(tournament_tier);
    let total_score = score_before_weight * tournament_weight;

    let favorite = if total_score > 0.0 {
        Some(Side::A)
    } else if total_score < 0.0 {
        Some(Side::B)
    } else {
        None
    };
    let favorite_score = if favorite.is_some() {
        total_score.abs()
    } else {
        0.0
    };

    let threshold_used = adaptive_threshold(&factors_used, cfg);
    let qualifies = total_score.abs() >= threshold_used;
    let confidence = Confidence::from_score(total_score, &cfg.confidence);
    let win_probability = win_probability(total_score, cfg);

    debug!(
        player_a = %evidence.side_a.name,
        player_b = %evidence.side_b.name,
        h2h = breakdown.h2h,
        form = breakdown.current_form,
        surface = breakdown.surface_form,
        momentum = breakdown.momentum,
        tier = tournament_tier.label(),
        tournament_weight,
        total_score,
        threshold_used,
        qualifies,
        confidence = confidence.label(),
        win_probability,
        "match analysed"
    );

    AnalysisResult {
        total_score,
        score_before_weight,
        breakdown,
        favorite,
        favorite_score,
        confidence,
        qualifies,
        threshold_used,
        win_probability,
        tournament_tier,
        tournament_weight,
        h2h_matches: evidence.h2h.len(),
        factors_used,
        warnings,
    }
}
