use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

use crate::error::DataError;

/// StatsBomb pitch coordinates: 120 x 80, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_slice(coords: &[f64]) -> Option<Self> {
        match coords {
            [x, y, ..] if x.is_finite() && y.is_finite() => Some(Self::new(*x, *y)),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Pass,
    Shot,
    Other(String),
}

impl EventKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Pass" => EventKind::Pass,
            "Shot" => EventKind::Shot,
            other => EventKind::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EventKind::Pass => "Pass",
            EventKind::Shot => "Shot",
            EventKind::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub index: u32,
    pub period: u8,
    pub minute: u16,
    pub second: u8,
    pub kind: EventKind,
    pub team: String,
    pub player: Option<String>,
    pub location: Option<Location>,
    pub pass_end_location: Option<Location>,
    pub shot_outcome: Option<String>,
}

impl Event {
    pub fn new(index: u32, minute: u16, kind: EventKind, team: &str) -> Self {
        Self {
            index,
            period: if minute < 45 { 1 } else { 2 },
            minute,
            second: 0,
            kind,
            team: team.to_string(),
            player: None,
            location: None,
            pass_end_location: None,
            shot_outcome: None,
        }
    }

    pub fn by(mut self, player: &str) -> Self {
        self.player = Some(player.to_string());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.location = Some(Location::new(x, y));
        self
    }

    pub fn pass_to(mut self, x: f64, y: f64) -> Self {
        self.pass_end_location = Some(Location::new(x, y));
        self
    }

    pub fn outcome(mut self, outcome: &str) -> Self {
        self.shot_outcome = Some(outcome.to_string());
        self
    }

    pub fn is_by(&self, player: &str) -> bool {
        self.player.as_deref() == Some(player)
    }

    pub fn origin(&self) -> Result<Location, DataError> {
        self.location.ok_or(DataError::MissingField {
            field: "location",
            index: self.index,
        })
    }

    pub fn pass_segment(&self) -> Result<(Location, Location), DataError> {
        let from = self.origin()?;
        let to = self.pass_end_location.ok_or(DataError::MissingField {
            field: "pass_end_location",
            index: self.index,
        })?;
        Ok((from, to))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionSeason {
    pub competition_id: u32,
    pub competition_name: String,
    pub country_name: String,
    pub season_id: u32,
    pub season_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub match_id: u64,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u8,
    pub away_score: u8,
    pub match_date: Option<NaiveDate>,
}

impl MatchInfo {
    pub fn label(&self) -> String {
        let date = self
            .match_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "date n/a".to_string());
        format!("{} vs {} ({date})", self.home_team, self.away_team)
    }

    pub fn score_label(&self) -> String {
        format!("{} - {}", self.home_score, self.away_score)
    }
}

/// Distinct competition names in listing order.
pub fn competition_names(rows: &[CompetitionSeason]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.competition_name.as_str()))
        .map(|row| row.competition_name.clone())
        .collect()
}

pub fn seasons_of<'a>(rows: &'a [CompetitionSeason], competition: &str) -> Vec<&'a CompetitionSeason> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| row.competition_name == competition)
        .filter(|row| seen.insert((row.competition_id, row.season_id)))
        .collect()
}

pub fn sort_matches_by_date(matches: &mut [MatchInfo]) {
    matches.sort_by(|a, b| a.match_date.cmp(&b.match_date).then(a.match_id.cmp(&b.match_id)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(comp_id: u32, comp: &str, season_id: u32, season: &str) -> CompetitionSeason {
        CompetitionSeason {
            competition_id: comp_id,
            competition_name: comp.to_string(),
            country_name: "Europe".to_string(),
            season_id,
            season_name: season.to_string(),
        }
    }

    #[test]
    fn competition_names_keep_first_seen_order() {
        let rows = vec![
            row(16, "Champions League", 4, "2018/2019"),
            row(11, "La Liga", 90, "2020/2021"),
            row(16, "Champions League", 1, "2017/2018"),
        ];
        assert_eq!(competition_names(&rows), vec!["Champions League", "La Liga"]);
    }

    #[test]
    fn seasons_are_deduplicated_per_competition() {
        let rows = vec![
            row(16, "Champions League", 4, "2018/2019"),
            row(16, "Champions League", 4, "2018/2019"),
            row(16, "Champions League", 1, "2017/2018"),
            row(11, "La Liga", 90, "2020/2021"),
        ];
        let seasons = seasons_of(&rows, "Champions League");
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[1].season_name, "2017/2018");
    }

    #[test]
    fn location_requires_two_finite_coords() {
        assert_eq!(Location::from_slice(&[1.0, 2.0, 0.5]), Some(Location::new(1.0, 2.0)));
        assert_eq!(Location::from_slice(&[1.0]), None);
        assert_eq!(Location::from_slice(&[f64::NAN, 2.0]), None);
    }

    #[test]
    fn match_label_includes_date() {
        let m = MatchInfo {
            match_id: 1,
            home_team: "Barcelona".to_string(),
            away_team: "Real Madrid".to_string(),
            home_score: 2,
            away_score: 1,
            match_date: NaiveDate::from_ymd_opt(2021, 4, 10),
        };
        assert_eq!(m.label(), "Barcelona vs Real Madrid (2021-04-10)");
    }
}
