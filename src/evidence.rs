use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    #[serde(alias = "a", alias = "player_a", alias = "home")]
    A,
    #[serde(alias = "b", alias = "player_b", alias = "away")]
    B,
}

impl Side {
    /// Positive points favor A, negative favor B.
    pub fn sign(self) -> f64 {
        match self {
            Side::A => 1.0,
            Side::B => -1.0,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Result of a match from the point of view of the side that owns the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    #[serde(rename = "W", alias = "w", alias = "win")]
    Win,
    #[serde(rename = "L", alias = "l", alias = "loss")]
    Loss,
}

/// A past meeting between the two sides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchObservation {
    #[serde(default, with = "date_text")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub winner: Option<Side>,
    #[serde(default)]
    pub score: String,
    #[serde(default)]
    pub surface: Option<String>,
    #[serde(default)]
    pub opponent_rank: Option<u32>,
}

/// One of a side's own recent matches against anybody.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecentMatch {
    #[serde(default, with = "date_text")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub result: Option<MatchResult>,
    #[serde(default)]
    pub score: String,
    #[serde(default)]
    pub surface: Option<String>,
    #[serde(default)]
    pub opponent_rank: Option<u32>,
}

impl RecentMatch {
    pub fn is_win(&self) -> bool {
        self.result == Some(MatchResult::Win)
    }

    pub fn played_on(&self, surface: &str) -> bool {
        self.surface
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(surface.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceRecord {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub total: u32,
    // Collaborators usually precompute this; fall back to wins/total when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub recent_form: Vec<MatchResult>,
}

impl SurfaceRecord {
    pub fn new(wins: u32, total: u32, recent_form: Vec<MatchResult>) -> Self {
        Self {
            wins,
            total,
            win_rate: None,
            recent_form,
        }
    }

    pub fn win_rate(&self) -> f64 {
        match self.win_rate {
            Some(rate) if rate.is_finite() => rate,
            _ if self.total > 0 => self.wins as f64 / self.total as f64,
            _ => 0.0,
        }
    }

    pub fn recent_win_rate(&self) -> Option<f64> {
        if self.recent_form.is_empty() {
            return None;
        }
        let wins = self
            .recent_form
            .iter()
            .filter(|r| **r == MatchResult::Win)
            .count();
        Some(wins as f64 / self.recent_form.len() as f64)
    }

    /// Builds a record for `surface` out of a side's own recent matches (most recent last).
    /// Only the five latest results on the surface are kept as recent form.
    pub fn from_recent(surface: &str, matches: &[RecentMatch]) -> Self {
        let mut wins = 0u32;
        let mut total = 0u32;
        let mut recent_form = Vec::new();
        for m in matches.iter().rev() {
            if !m.played_on(surface) {
                continue;
            }
            let Some(result) = m.result else { continue };
            total += 1;
            if result == MatchResult::Win {
                wins += 1;
            }
            if recent_form.len() < 5 {
                recent_form.push(result);
            }
        }
        recent_form.reverse();
        Self::new(wins, total, recent_form)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompetitorEvidence {
    #[serde(default)]
    pub name: String,
    /// Most recent last.
    #[serde(default)]
    pub recent_matches: Vec<RecentMatch>,
    #[serde(default)]
    pub surface_stats: BTreeMap<String, SurfaceRecord>,
}

impl CompetitorEvidence {
    pub fn surface_record(&self, surface: &str) -> Option<&SurfaceRecord> {
        let surface = surface.trim();
        self.surface_stats.get(surface).or_else(|| {
            self.surface_stats
                .iter()
                .find(|(k, _)| k.trim().eq_ignore_ascii_case(surface))
                .map(|(_, v)| v)
        })
    }
}

/// Everything known about one upcoming match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvidence {
    /// The day the analysis is made for; all recency windows are measured from here.
    #[serde(with = "date_text::required")]
    pub as_of: NaiveDate,
    #[serde(default)]
    pub h2h: Vec<MatchObservation>,
    #[serde(default)]
    pub side_a: CompetitorEvidence,
    #[serde(default)]
    pub side_b: CompetitorEvidence,
    #[serde(default)]
    pub surface: Option<String>,
    #[serde(default)]
    pub tournament: String,
}

impl MatchEvidence {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            h2h: Vec::new(),
            side_a: CompetitorEvidence::default(),
            side_b: CompetitorEvidence::default(),
            surface: None,
            tournament: String::new(),
        }
    }

    /// Same match seen from the other chair: sides exchanged, H2H winners flipped.
    pub fn swapped(&self) -> Self {
        let h2h = self
            .h2h
            .iter()
            .map(|m| MatchObservation {
                winner: m.winner.map(Side::other),
                ..m.clone()
            })
            .collect();
        Self {
            as_of: self.as_of,
            h2h,
            side_a: self.side_b.clone(),
            side_b: self.side_a.clone(),
            surface: self.surface.clone(),
            tournament: self.tournament.clone(),
        }
    }

    pub fn side(&self, side: Side) -> &CompetitorEvidence {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }
}

/// Reads one evidence object or an array of them. Records without `as_of` are
/// stamped with `default_as_of`.
pub fn parse_evidence_json(
    raw: &str,
    default_as_of: NaiveDate,
) -> Result<Vec<MatchEvidence>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };
    let stamp = default_as_of.format("%Y-%m-%d").to_string();
    items
        .into_iter()
        .map(|mut item| {
            if let Some(obj) = item.as_object_mut() {
                obj.entry("as_of")
                    .or_insert_with(|| serde_json::Value::String(stamp.clone()));
            }
            serde_json::from_value(item)
        })
        .collect()
}

const DATE_FORMATS: [&str; 3] = ["%d.%m.%y", "%d.%m.%Y", "%Y-%m-%d"];

/// Lenient date parsing: "15.08.24", "15.08.2024" or "2024-08-15".
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    // Some feeds append a kick-off time after the date.
    let s = s.split_whitespace().next().unwrap_or(s);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Serde adapter: unparseable dates become `None` instead of failing the whole record.
pub mod date_text {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::evidence::parse_match_date;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, ser: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => ser.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(de)?;
        Ok(raw.as_deref().and_then(parse_match_date))
    }

    pub mod required {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        use crate::evidence::parse_match_date;

        pub fn serialize<S: Serializer>(date: &NaiveDate, ser: S) -> Result<S::Ok, S::Error> {
            ser.serialize_str(&date.format("%Y-%m-%d").to_string())
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
            let raw = String::deserialize(de)?;
            parse_match_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
        }
    }
}
