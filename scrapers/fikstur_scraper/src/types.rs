use serde::{Deserialize, Serialize};

use crate::config::TeamConfig;

/// One upcoming fixture of the tracked team.
///
/// Field names on the wire follow the Turkish API contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchRecord {
    #[serde(rename = "tarih")]
    pub date: String,
    #[serde(rename = "saat")]
    pub time: String,
    #[serde(rename = "evSahibi")]
    pub home_team: String,
    #[serde(rename = "deplasman")]
    pub away_team: String,
    #[serde(rename = "stadyum")]
    pub venue: String,
}

impl MatchRecord {
    /// Builds a record with the venue derived from the home team.
    pub fn new(date: &str, time: &str, home_team: &str, away_team: &str, team: &TeamConfig) -> Self {
        let home_team = home_team.trim().to_string();
        Self {
            date: date.trim().to_string(),
            time: time.trim().to_string(),
            venue: team.venue_for(&home_team),
            away_team: away_team.trim().to_string(),
            home_team,
        }
    }

    /// Both teams present and not the same team.
    pub fn has_distinct_teams(&self) -> bool {
        teams_are_distinct(&self.home_team, &self.away_team)
    }

    pub fn same_fixture(&self, other: &MatchRecord) -> bool {
        self.home_team == other.home_team
            && self.away_team == other.away_team
            && self.time == other.time
    }
}

pub fn teams_are_distinct(home: &str, away: &str) -> bool {
    let home = home.trim();
    let away = away.trim();
    !home.is_empty() && !away.is_empty() && home.to_lowercase() != away.to_lowercase()
}

/// Successful `/api/fikstur` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixtureReport {
    pub success: bool,
    pub count: usize,
    pub matches: Vec<MatchRecord>,
}

impl FixtureReport {
    pub fn new(matches: Vec<MatchRecord>) -> Self {
        Self {
            success: true,
            count: matches.len(),
            matches,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorReport {
    pub success: bool,
    pub error: String,
}

impl ErrorReport {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
