use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentTier {
    GrandSlam,
    Masters1000,
    Atp500,
    /// Named event that matched no rule.
    Atp250,
    Challenger,
    /// No descriptor at all.
    Unknown,
}

impl TournamentTier {
    pub fn label(self) -> &'static str {
        match self {
            TournamentTier::GrandSlam => "grand_slam",
            TournamentTier::Masters1000 => "masters_1000",
            TournamentTier::Atp500 => "atp_500",
            TournamentTier::Atp250 => "atp_250",
            TournamentTier::Challenger => "challenger",
            TournamentTier::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierWeights {
    pub grand_slam: f64,
    pub masters_1000: f64,
    pub atp_500: f64,
    pub atp_250: f64,
    pub challenger: f64,
    pub unknown: f64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            grand_slam: 1.5,
            masters_1000: 1.3,
            atp_500: 1.1,
            atp_250: 1.0,
            challenger: 0.8,
            unknown: 1.0,
        }
    }
}

impl TierWeights {
    pub fn weight(&self, tier: TournamentTier) -> f64 {
        match tier {
            TournamentTier::GrandSlam => self.grand_slam,
            TournamentTier::Masters1000 => self.masters_1000,
            TournamentTier::Atp500 => self.atp_500,
            TournamentTier::Atp250 => self.atp_250,
            TournamentTier::Challenger => self.challenger,
            TournamentTier::Unknown => self.unknown,
        }
    }

    pub fn all(&self) -> [f64; 6] {
        [
            self.grand_slam,
            self.masters_1000,
            self.atp_500,
            self.atp_250,
            self.challenger,
            self.unknown,
        ]
    }
}

/// A descriptor containing any keyword (case-insensitive substring) maps to `tier`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    pub tier: TournamentTier,
    pub keywords: Vec<String>,
}

impl TierRule {
    fn new(tier: TournamentTier, keywords: &[&str]) -> Self {
        Self {
            tier,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn matches(&self, descriptor_lower: &str) -> bool {
        self.keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .any(|k| descriptor_lower.contains(&k))
    }
}

/// Checked in order; the first matching rule wins.
pub fn default_tier_rules() -> Vec<TierRule> {
    vec![
        TierRule::new(
            TournamentTier::GrandSlam,
            &[
                "wimbledon",
                "us open",
                "roland garros",
                "australian open",
                "french open",
                "open usa",
                "open australii",
            ],
        ),
        TierRule::new(
            TournamentTier::Masters1000,
            &[
                "indian wells",
                "miami",
                "monte carlo",
                "madrid",
                "rome",
                "canada",
                "montreal",
                "toronto",
                "cincinnati",
                "shanghai",
                "paris",
                "masters",
            ],
        ),
        TierRule::new(TournamentTier::Atp500, &["atp 500", "atp500"]),
        TierRule::new(TournamentTier::Challenger, &["challenger"]),
    ]
}

pub fn classify_tournament(descriptor: &str, rules: &[TierRule]) -> TournamentTier {
    let lower = descriptor.trim().to_lowercase();
    if lower.is_empty() {
        return TournamentTier::Unknown;
    }
    rules
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.tier)
        .unwrap_or(TournamentTier::Atp250)
}
