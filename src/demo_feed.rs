use anyhow::{Result, anyhow};
use chrono::{Duration as ChronoDuration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{CompetitionSeason, Event, EventKind, MatchInfo};
use crate::provider::EventSource;

const TEAMS: [&str; 4] = ["Northbridge", "Eastfield Rovers", "Port Alder", "Kingsmoor Athletic"];
const SQUADS: [[&str; 6]; 4] = [
    ["A. Stone", "R. Vega", "M. Holt", "J. Nox", "T. Vale", "K. Rook"],
    ["L. Park", "D. Moss", "I. Noor", "C. Hale", "V. Ash", "B. Lind"],
    ["O. Reyes", "F. Dunn", "G. Amar", "H. Sato", "E. Kerr", "N. Polo"],
    ["S. Quinn", "W. Birch", "Y. Tamm", "U. Obi", "Z. Fenn", "P. Roux"],
];
const FIXTURES: [(usize, usize); 6] = [(0, 1), (2, 3), (0, 2), (1, 3), (0, 3), (1, 2)];
const MISSES: [&str; 5] = ["Saved", "Off T", "Blocked", "Wayward", "Post"];
const FILLER: [&str; 4] = ["Pressure", "Carry", "Ball Recovery", "Duel"];
const LAST_MINUTE: u16 = 93;

struct DemoSeason {
    competition_id: u32,
    competition_name: &'static str,
    season_id: u32,
    season_name: &'static str,
    start: (i32, u32, u32),
}

const SEASONS: [DemoSeason; 3] = [
    DemoSeason {
        competition_id: 1,
        competition_name: "Demo League",
        season_id: 10,
        season_name: "2023/2024",
        start: (2023, 8, 12),
    },
    DemoSeason {
        competition_id: 1,
        competition_name: "Demo League",
        season_id: 11,
        season_name: "2024/2025",
        start: (2024, 8, 17),
    },
    DemoSeason {
        competition_id: 2,
        competition_name: "Demo Cup",
        season_id: 20,
        season_name: "2024",
        start: (2024, 6, 14),
    },
];

/// Offline source with seeded synthetic data; the same ids always produce
/// the same matches and events.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSource;

impl EventSource for DemoSource {
    fn competitions(&self) -> Result<Vec<CompetitionSeason>> {
        Ok(SEASONS
            .iter()
            .map(|s| CompetitionSeason {
                competition_id: s.competition_id,
                competition_name: s.competition_name.to_string(),
                country_name: "Demo".to_string(),
                season_id: s.season_id,
                season_name: s.season_name.to_string(),
            })
            .collect())
    }

    fn matches(&self, competition_id: u32, season_id: u32) -> Result<Vec<MatchInfo>> {
        if find_season(competition_id, season_id).is_none() {
            return Err(anyhow!(
                "unknown demo season {competition_id}/{season_id}"
            ));
        }
        Ok((0..FIXTURES.len() as u64)
            .filter_map(|k| demo_match(encode_match_id(competition_id, season_id, k)))
            .collect())
    }

    fn events(&self, match_id: u64) -> Result<Vec<Event>> {
        let (info, home, away) =
            decode_fixture(match_id).ok_or_else(|| anyhow!("unknown demo match {match_id}"))?;
        Ok(generate_events(&info, home, away))
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}

fn find_season(competition_id: u32, season_id: u32) -> Option<&'static DemoSeason> {
    SEASONS
        .iter()
        .find(|s| s.competition_id == competition_id && s.season_id == season_id)
}

fn encode_match_id(competition_id: u32, season_id: u32, k: u64) -> u64 {
    u64::from(competition_id) * 1_000_000 + u64::from(season_id) * 100 + k
}

fn decode_fixture(match_id: u64) -> Option<(MatchInfo, usize, usize)> {
    let competition_id = u32::try_from(match_id / 1_000_000).ok()?;
    let season_id = u32::try_from((match_id % 1_000_000) / 100).ok()?;
    let k = (match_id % 100) as usize;
    let season = find_season(competition_id, season_id)?;
    let (home, away) = *FIXTURES.get(k)?;

    let mut rng = StdRng::seed_from_u64(match_id);
    let (y, m, d) = season.start;
    let match_date = NaiveDate::from_ymd_opt(y, m, d)
        .map(|start| start + ChronoDuration::days(7 * k as i64));
    let info = MatchInfo {
        match_id,
        home_team: TEAMS[home].to_string(),
        away_team: TEAMS[away].to_string(),
        home_score: rng.gen_range(0..4),
        away_score: rng.gen_range(0..4),
        match_date,
    };
    Some((info, home, away))
}

fn demo_match(match_id: u64) -> Option<MatchInfo> {
    decode_fixture(match_id).map(|(info, ..)| info)
}

fn generate_events(info: &MatchInfo, home: usize, away: usize) -> Vec<Event> {
    let mut rng = StdRng::seed_from_u64(info.match_id ^ 0x5eed);
    let home_goals = goal_minutes(&mut rng, info.home_score);
    let away_goals = goal_minutes(&mut rng, info.away_score);

    let mut events = Vec::new();
    let mut index = 0u32;
    let mut push = |events: &mut Vec<Event>, event: Event| {
        index += 1;
        events.push(Event { index, ..event });
    };

    for team in [&info.home_team, &info.away_team] {
        push(
            &mut events,
            Event::new(0, 0, EventKind::Other("Starting XI".to_string()), team),
        );
    }

    for minute in 0..=LAST_MINUTE {
        for (side, goals) in [(home, &home_goals), (away, &away_goals)] {
            let team = TEAMS[side];
            // Home attacks towards x = 120, away towards x = 0.
            let attacking_right = side == home;

            for _ in 0..rng.gen_range(0..5) {
                let player = SQUADS[side][rng.gen_range(0..SQUADS[side].len())];
                let x = rng.gen_range(5.0..115.0);
                let y = rng.gen_range(2.0..78.0);
                let dx = rng.gen_range(-10.0..30.0) * if attacking_right { 1.0 } else { -1.0 };
                let dy = rng.gen_range(-15.0..15.0);
                let end_x = f64::clamp(x + dx, 0.0, 120.0);
                let end_y = f64::clamp(y + dy, 0.0, 80.0);
                push(
                    &mut events,
                    Event::new(0, minute, EventKind::Pass, team)
                        .by(player)
                        .at(round1(x), round1(y))
                        .pass_to(round1(end_x), round1(end_y)),
                );
            }

            if rng.gen_bool(0.3) {
                let player = SQUADS[side][rng.gen_range(0..SQUADS[side].len())];
                let name = FILLER[rng.gen_range(0..FILLER.len())];
                push(
                    &mut events,
                    Event::new(0, minute, EventKind::Other(name.to_string()), team)
                        .by(player)
                        .at(round1(rng.gen_range(0.0..120.0)), round1(rng.gen_range(0.0..80.0))),
                );
            }

            let scored = goals.contains(&minute);
            if scored || rng.gen_bool(0.1) {
                // Strikers take most of the shots.
                let player = SQUADS[side][rng.gen_range(3..SQUADS[side].len())];
                let depth = rng.gen_range(4.0..28.0);
                let x = if attacking_right { 120.0 - depth } else { depth };
                let y = rng.gen_range(22.0..58.0);
                let outcome = if scored {
                    "Goal"
                } else {
                    MISSES[rng.gen_range(0..MISSES.len())]
                };
                push(
                    &mut events,
                    Event::new(0, minute, EventKind::Shot, team)
                        .by(player)
                        .at(round1(x), round1(y))
                        .outcome(outcome),
                );
            }
        }
    }

    events
}

fn goal_minutes(rng: &mut StdRng, goals: u8) -> Vec<u16> {
    let mut minutes = Vec::with_capacity(usize::from(goals));
    while minutes.len() < usize::from(goals) {
        let minute = rng.gen_range(1..=LAST_MINUTE);
        if !minutes.contains(&minute) {
            minutes.push(minute);
        }
    }
    minutes
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
