use serde::{Deserialize, Serialize};

use crate::clamp_points;
use crate::config::SurfaceConfig;
use crate::evidence::{CompetitorEvidence, RecentMatch};
use crate::form::latest;

const SPECIALIST_WIN_RATE: f64 = 0.80;
const SPECIALIST_EDGE: f64 = 0.15;
const EXPERIENCED_MATCHES: u32 = 10;
const INEXPERIENCED_MATCHES: u32 = 5;
const TRANSITION_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Clay,
    Grass,
    Hard,
}

impl Surface {
    pub fn tag(self) -> &'static str {
        match self {
            Surface::Clay => "clay",
            Surface::Grass => "grass",
            Surface::Hard => "hard",
        }
    }

    /// Guesses the surface from free text such as a tournament row.
    pub fn detect(text: &str) -> Option<Surface> {
        let text = text.to_lowercase();
        let has = |keys: &[&str]| keys.iter().any(|k| text.contains(k));
        if has(&["clay", "ziemia", "antuka", "roland garros", "monte carlo"]) {
            Some(Surface::Clay)
        } else if has(&["grass", "trawa", "wimbledon"]) {
            Some(Surface::Grass)
        } else if has(&["hard", "twarda", "us open", "australian open"]) {
            Some(Surface::Hard)
        } else {
            None
        }
    }
}

/// Surface-specific points, positive for A. `None` when the surface is unknown or
/// either side has no record on it.
pub fn surface_score(
    surface: Option<&str>,
    side_a: &CompetitorEvidence,
    side_b: &CompetitorEvidence,
    form_window: usize,
    cfg: &SurfaceConfig,
) -> Option<f64> {
    let surface = surface.map(str::trim).filter(|s| !s.is_empty())?;
    let rec_a = side_a.surface_record(surface)?;
    let rec_b = side_b.surface_record(surface)?;

    let wr_a = rec_a.win_rate();
    let wr_b = rec_b.win_rate();
    let advantage = wr_a - wr_b;
    let mut points = advantage * cfg.winrate_multiplier;

    if wr_a >= SPECIALIST_WIN_RATE && advantage >= SPECIALIST_EDGE {
        points += cfg.specialist_bonus;
    } else if wr_b >= SPECIALIST_WIN_RATE && advantage <= -SPECIALIST_EDGE {
        points -= cfg.specialist_bonus;
    }

    if rec_a.total >= EXPERIENCED_MATCHES && rec_b.total < INEXPERIENCED_MATCHES {
        points += cfg.experience_bonus;
    } else if rec_b.total >= EXPERIENCED_MATCHES && rec_a.total < INEXPERIENCED_MATCHES {
        points -= cfg.experience_bonus;
    }

    if let (Some(recent_a), Some(recent_b)) = (rec_a.recent_win_rate(), rec_b.recent_win_rate()) {
        points += (recent_a - recent_b) * cfg.recent_form_multiplier;
    }

    let form_a = latest(&side_a.recent_matches, form_window);
    let form_b = latest(&side_b.recent_matches, form_window);
    if !form_a.is_empty() && !form_b.is_empty() {
        points += transition(surface, form_a, cfg) - transition(surface, form_b, cfg);
    }

    Some(clamp_points(points, cfg.max_points))
}

/// How settled a side is on the surface, from its last five matches anywhere.
pub fn transition(surface: &str, matches: &[RecentMatch], cfg: &SurfaceConfig) -> f64 {
    let recent = latest(matches, TRANSITION_WINDOW);
    if recent.is_empty() {
        return 0.0;
    }
    let on_surface = recent.iter().filter(|m| m.played_on(surface)).count();
    if recent.len() == TRANSITION_WINDOW && on_surface == TRANSITION_WINDOW {
        cfg.transition_bonus
    } else if on_surface >= 3 {
        cfg.transition_partial_bonus
    } else if on_surface <= 1 {
        -cfg.transition_penalty
    } else {
        0.0
    }
}
