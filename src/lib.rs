pub mod analyzer;
pub mod batch;
pub mod calibration;
pub mod config;
pub mod evidence;
pub mod form;
pub mod h2h;
pub mod momentum;
pub mod score;
pub mod surface;
pub mod threshold;
pub mod tournament;

pub use analyzer::{AnalysisResult, Confidence, Factor, FactorBreakdown, Warning, analyze};
pub use config::{ConfigError, ScoringConfig};
pub use evidence::{
    CompetitorEvidence, MatchEvidence, MatchObservation, MatchResult, RecentMatch, Side,
    SurfaceRecord,
};

/// Clamps signed factor points to [-cap, cap]; a negative cap is read as its magnitude.
pub(crate) fn clamp_points(points: f64, cap: f64) -> f64 {
    let cap = cap.abs();
    points.max(-cap).min(cap)
}
