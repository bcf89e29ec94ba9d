use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::http_cache::HttpCache;
use crate::http_client::http_client;
use crate::model::{CompetitionSeason, Event, EventKind, Location, MatchInfo};
use crate::provider::EventSource;

/// StatsBomb open data served as static JSON files.
pub struct StatsBombOpenData {
    base_url: String,
    timeout: Duration,
    cache: HttpCache,
}

impl StatsBombOpenData {
    pub fn new(base_url: &str, timeout: Duration, cache: HttpCache) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            cache,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            &cfg.data_url,
            cfg.request_timeout,
            HttpCache::new(cfg.http_cache_dir()),
        )
    }

    pub fn competitions_url(&self) -> String {
        format!("{}/competitions.json", self.base_url)
    }

    pub fn matches_url(&self, competition_id: u32, season_id: u32) -> String {
        format!("{}/matches/{competition_id}/{season_id}.json", self.base_url)
    }

    pub fn events_url(&self, match_id: u64) -> String {
        format!("{}/events/{match_id}.json", self.base_url)
    }

    fn get(&self, url: &str) -> Result<String> {
        let client = http_client(self.timeout)?;
        self.cache.fetch(client, url)
    }
}

impl EventSource for StatsBombOpenData {
    #[instrument(skip(self))]
    fn competitions(&self) -> Result<Vec<CompetitionSeason>> {
        let body = self
            .get(&self.competitions_url())
            .context("competitions request failed")?;
        parse_competitions_json(&body)
    }

    #[instrument(skip(self))]
    fn matches(&self, competition_id: u32, season_id: u32) -> Result<Vec<MatchInfo>> {
        let body = self
            .get(&self.matches_url(competition_id, season_id))
            .context("matches request failed")?;
        parse_matches_json(&body)
    }

    #[instrument(skip(self))]
    fn events(&self, match_id: u64) -> Result<Vec<Event>> {
        let body = self
            .get(&self.events_url(match_id))
            .context("events request failed")?;
        parse_events_json(&body)
    }

    fn name(&self) -> &'static str {
        "statsbomb"
    }
}

#[derive(Debug, Deserialize)]
struct SbCompetition {
    competition_id: u32,
    season_id: u32,
    competition_name: String,
    #[serde(default)]
    country_name: Option<String>,
    season_name: String,
}

#[derive(Debug, Deserialize)]
struct SbMatch {
    match_id: u64,
    #[serde(default)]
    match_date: Option<String>,
    home_team: SbHomeTeam,
    away_team: SbAwayTeam,
    #[serde(default)]
    home_score: Option<u8>,
    #[serde(default)]
    away_score: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct SbHomeTeam {
    home_team_name: String,
}

#[derive(Debug, Deserialize)]
struct SbAwayTeam {
    away_team_name: String,
}

#[derive(Debug, Deserialize)]
struct SbNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SbEvent {
    #[serde(default)]
    index: u32,
    #[serde(default)]
    period: u8,
    #[serde(default)]
    minute: u16,
    #[serde(default)]
    second: u8,
    #[serde(rename = "type")]
    kind: SbNamed,
    team: SbNamed,
    #[serde(default)]
    player: Option<SbNamed>,
    #[serde(default)]
    location: Option<Vec<f64>>,
    #[serde(default)]
    pass: Option<SbPass>,
    #[serde(default)]
    shot: Option<SbShot>,
}

#[derive(Debug, Deserialize)]
struct SbPass {
    #[serde(default)]
    end_location: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct SbShot {
    #[serde(default)]
    outcome: Option<SbNamed>,
}

fn is_blank(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == "null"
}

pub fn parse_competitions_json(raw: &str) -> Result<Vec<CompetitionSeason>> {
    if is_blank(raw) {
        return Ok(Vec::new());
    }
    let rows: Vec<SbCompetition> =
        serde_json::from_str(raw.trim()).context("invalid competitions json")?;
    Ok(rows
        .into_iter()
        .map(|row| CompetitionSeason {
            competition_id: row.competition_id,
            competition_name: row.competition_name,
            country_name: row.country_name.unwrap_or_default(),
            season_id: row.season_id,
            season_name: row.season_name,
        })
        .collect())
}

pub fn parse_matches_json(raw: &str) -> Result<Vec<MatchInfo>> {
    if is_blank(raw) {
        return Ok(Vec::new());
    }
    let rows: Vec<SbMatch> = serde_json::from_str(raw.trim()).context("invalid matches json")?;
    Ok(rows
        .into_iter()
        .map(|row| MatchInfo {
            match_id: row.match_id,
            home_team: row.home_team.home_team_name,
            away_team: row.away_team.away_team_name,
            home_score: row.home_score.unwrap_or(0),
            away_score: row.away_score.unwrap_or(0),
            match_date: row
                .match_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        })
        .collect())
}

pub fn parse_events_json(raw: &str) -> Result<Vec<Event>> {
    if is_blank(raw) {
        return Ok(Vec::new());
    }
    let rows: Vec<SbEvent> = serde_json::from_str(raw.trim()).context("invalid events json")?;
    let mut events: Vec<Event> = rows.into_iter().map(normalize_event).collect();
    // Files are written in index order; keep it that way if one is not.
    events.sort_by_key(|e| e.index);
    debug!(events = events.len(), "parsed match events");
    Ok(events)
}

fn normalize_event(row: SbEvent) -> Event {
    let kind = EventKind::from_name(&row.kind.name);
    let pass_end_location = match kind {
        EventKind::Pass => row
            .pass
            .and_then(|p| p.end_location)
            .and_then(|coords| Location::from_slice(&coords)),
        _ => None,
    };
    let shot_outcome = match kind {
        EventKind::Shot => row.shot.and_then(|s| s.outcome).map(|o| o.name),
        _ => None,
    };
    Event {
        index: row.index,
        period: row.period,
        minute: row.minute,
        second: row.second,
        kind,
        team: row.team.name,
        player: row.player.map(|p| p.name),
        location: row
            .location
            .as_deref()
            .and_then(Location::from_slice),
        pass_end_location,
        shot_outcome,
    }
}
