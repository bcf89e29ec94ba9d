use std::fmt;

use crate::model::{Event, MatchInfo};
use crate::stats::{TeamStats, team_stats};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winner {
    Team(String),
    Draw,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Team(name) => f.write_str(name),
            Winner::Draw => f.write_str("Draw"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub home_team: String,
    pub away_team: String,
    pub home_score: u8,
    pub away_score: u8,
    pub winner: Winner,
    pub home_stats: TeamStats,
    pub away_stats: TeamStats,
}

impl MatchSummary {
    pub fn totals(&self) -> TeamStats {
        self.home_stats + self.away_stats
    }
}

pub fn decide_winner(home_team: &str, away_team: &str, home_score: u8, away_score: u8) -> Winner {
    if home_score > away_score {
        Winner::Team(home_team.to_string())
    } else if home_score < away_score {
        Winner::Team(away_team.to_string())
    } else {
        Winner::Draw
    }
}

pub fn match_summary(
    home_team: &str,
    away_team: &str,
    home_score: u8,
    away_score: u8,
    events: &[Event],
) -> MatchSummary {
    MatchSummary {
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        home_score,
        away_score,
        winner: decide_winner(home_team, away_team, home_score, away_score),
        home_stats: team_stats(events, home_team),
        away_stats: team_stats(events, away_team),
    }
}

pub fn summarize(info: &MatchInfo, events: &[Event]) -> MatchSummary {
    match_summary(
        &info.home_team,
        &info.away_team,
        info.home_score,
        info.away_score,
        events,
    )
}
