use std::collections::VecDeque;
use std::sync::Arc;

use crate::model::{self, CompetitionSeason, Event, MatchInfo};
use crate::stats::{self, MinuteRange, PlayerStats};
use crate::summary::{self, MatchSummary};

pub const MAX_MINUTE: u16 = 120;
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Match,
    Players,
    Charts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Competition,
    Season,
    Match,
    Player1,
    Player2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchCompetitions,
    FetchMatches { competition_id: u32, season_id: u32 },
    FetchEvents { match_id: u64 },
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetCompetitions(Arc<Vec<CompetitionSeason>>),
    SetMatches {
        competition_id: u32,
        season_id: u32,
        matches: Arc<Vec<MatchInfo>>,
    },
    SetEvents {
        match_id: u64,
        events: Arc<Vec<Event>>,
    },
    Log(String),
}

pub struct AppState {
    pub view: View,
    pub focus: Focus,
    pub competitions: Arc<Vec<CompetitionSeason>>,
    pub competition_names: Vec<String>,
    pub competition_selected: usize,
    pub season_selected: usize,
    pub matches: Vec<MatchInfo>,
    pub matches_key: Option<(u32, u32)>,
    pub match_selected: usize,
    pub events: Arc<Vec<Event>>,
    pub events_match_id: Option<u64>,
    pub players: Vec<String>,
    pub player1_selected: usize,
    pub player2_selected: usize,
    pub minutes: MinuteRange,
    pub loading: Option<String>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: View::Match,
            focus: Focus::Competition,
            competitions: Arc::new(Vec::new()),
            competition_names: Vec::new(),
            competition_selected: 0,
            season_selected: 0,
            matches: Vec::new(),
            matches_key: None,
            match_selected: 0,
            events: Arc::new(Vec::new()),
            events_match_id: None,
            players: Vec::new(),
            player1_selected: 0,
            player2_selected: 0,
            minutes: MinuteRange::default(),
            loading: None,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn selected_competition(&self) -> Option<&str> {
        self.competition_names
            .get(self.competition_selected)
            .map(String::as_str)
    }

    pub fn seasons(&self) -> Vec<&CompetitionSeason> {
        match self.selected_competition() {
            Some(name) => model::seasons_of(&self.competitions, name),
            None => Vec::new(),
        }
    }

    pub fn selected_season(&self) -> Option<&CompetitionSeason> {
        self.seasons().get(self.season_selected).copied()
    }

    pub fn selected_match(&self) -> Option<&MatchInfo> {
        self.matches.get(self.match_selected)
    }

    /// Events of the selected match, or nothing while they are in flight.
    pub fn current_events(&self) -> Option<&[Event]> {
        let selected = self.selected_match()?;
        (self.events_match_id == Some(selected.match_id)).then(|| self.events.as_slice())
    }

    pub fn player1(&self) -> Option<&str> {
        self.players.get(self.player1_selected).map(String::as_str)
    }

    /// Candidates for the second slot: everyone except player 1.
    pub fn player2_choices(&self) -> Vec<&str> {
        let first = self.player1();
        self.players
            .iter()
            .map(String::as_str)
            .filter(|name| Some(*name) != first)
            .collect()
    }

    pub fn player2(&self) -> Option<&str> {
        self.player2_choices().get(self.player2_selected).copied()
    }

    pub fn summary(&self) -> Option<MatchSummary> {
        let info = self.selected_match()?;
        let events = self.current_events()?;
        Some(summary::summarize(info, events))
    }

    /// Totals over the whole match; the minute window does not apply.
    pub fn player_match_stats(&self, player: &str) -> PlayerStats {
        let events = self.current_events().unwrap_or(&[]);
        stats::player_stats(events, player, MinuteRange::FULL_MATCH)
    }

    /// Totals inside the current minute window.
    pub fn player_stats(&self, player: &str) -> PlayerStats {
        let events = self.current_events().unwrap_or(&[]);
        stats::player_stats(events, player, self.minutes)
    }

    pub fn player_events(&self, player: &str) -> Vec<&Event> {
        let events = self.current_events().unwrap_or(&[]);
        stats::player_events(events, player, self.minutes)
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Competition => Focus::Season,
            Focus::Season => Focus::Match,
            Focus::Match => Focus::Player1,
            Focus::Player1 => Focus::Player2,
            Focus::Player2 => Focus::Competition,
        };
    }

    pub fn cycle_focus_back(&mut self) {
        self.focus = match self.focus {
            Focus::Competition => Focus::Player2,
            Focus::Season => Focus::Competition,
            Focus::Match => Focus::Season,
            Focus::Player1 => Focus::Match,
            Focus::Player2 => Focus::Player1,
        };
    }

    pub fn select_next(&mut self) -> Option<ProviderCommand> {
        self.move_selection(1)
    }

    pub fn select_prev(&mut self) -> Option<ProviderCommand> {
        self.move_selection(-1)
    }

    /// Moves the focused list and returns the fetch the new selection needs.
    pub fn move_selection(&mut self, step: isize) -> Option<ProviderCommand> {
        match self.focus {
            Focus::Competition => {
                let len = self.competition_names.len();
                if !step_index(&mut self.competition_selected, len, step) {
                    return None;
                }
                self.season_selected = 0;
                self.request_matches()
            }
            Focus::Season => {
                let len = self.seasons().len();
                if !step_index(&mut self.season_selected, len, step) {
                    return None;
                }
                self.request_matches()
            }
            Focus::Match => {
                let len = self.matches.len();
                if !step_index(&mut self.match_selected, len, step) {
                    return None;
                }
                self.request_events()
            }
            Focus::Player1 => {
                let len = self.players.len();
                if step_index(&mut self.player1_selected, len, step) {
                    let len2 = self.player2_choices().len();
                    self.player2_selected = self.player2_selected.min(len2.saturating_sub(1));
                }
                None
            }
            Focus::Player2 => {
                let len = self.player2_choices().len();
                step_index(&mut self.player2_selected, len, step);
                None
            }
        }
    }

    pub fn shift_minutes_lo(&mut self, delta: i32) {
        let lo = clamp_minute(i32::from(self.minutes.lo) + delta).min(self.minutes.hi);
        self.minutes.lo = lo;
    }

    pub fn shift_minutes_hi(&mut self, delta: i32) {
        let hi = clamp_minute(i32::from(self.minutes.hi) + delta).max(self.minutes.lo);
        self.minutes.hi = hi;
    }

    pub fn reset_minutes(&mut self) {
        self.minutes = MinuteRange::default();
    }

    fn request_matches(&mut self) -> Option<ProviderCommand> {
        let season = self.selected_season()?;
        let (competition_id, season_id) = (season.competition_id, season.season_id);
        self.matches.clear();
        self.matches_key = Some((competition_id, season_id));
        self.match_selected = 0;
        self.clear_events();
        self.loading = Some("matches".to_string());
        Some(ProviderCommand::FetchMatches {
            competition_id,
            season_id,
        })
    }

    fn request_events(&mut self) -> Option<ProviderCommand> {
        let match_id = self.selected_match()?.match_id;
        self.clear_events();
        self.loading = Some("events".to_string());
        Some(ProviderCommand::FetchEvents { match_id })
    }

    fn clear_events(&mut self) {
        self.events = Arc::new(Vec::new());
        self.events_match_id = None;
        self.players.clear();
        self.player1_selected = 0;
        self.player2_selected = 0;
    }
}

fn step_index(index: &mut usize, len: usize, step: isize) -> bool {
    if len == 0 {
        return false;
    }
    let next = index.saturating_add_signed(step).min(len - 1);
    if next == *index {
        return false;
    }
    *index = next;
    true
}

fn clamp_minute(value: i32) -> u16 {
    value.clamp(0, i32::from(MAX_MINUTE)) as u16
}

/// Applies a provider update and returns the follow-up fetch, if any.
pub fn apply_delta(state: &mut AppState, delta: Delta) -> Option<ProviderCommand> {
    match delta {
        Delta::SetCompetitions(rows) => {
            state.competition_names = model::competition_names(&rows);
            state.competitions = rows;
            state.competition_selected = 0;
            state.season_selected = 0;
            state.push_log(format!(
                "[INFO] {} competitions loaded",
                state.competition_names.len()
            ));
            let next = state.request_matches();
            if next.is_none() {
                state.loading = None;
            }
            next
        }
        Delta::SetMatches {
            competition_id,
            season_id,
            matches,
        } => {
            if state.matches_key != Some((competition_id, season_id)) {
                // A newer season was selected while this one was loading.
                return None;
            }
            let mut rows = matches.as_ref().clone();
            model::sort_matches_by_date(&mut rows);
            state.push_log(format!("[INFO] {} matches loaded", rows.len()));
            state.matches = rows;
            state.match_selected = 0;
            let next = state.request_events();
            if next.is_none() {
                state.loading = None;
            }
            next
        }
        Delta::SetEvents { match_id, events } => {
            if state.selected_match().map(|m| m.match_id) != Some(match_id) {
                return None;
            }
            state.players = stats::players(&events);
            state.push_log(format!(
                "[INFO] {} events, {} players",
                events.len(),
                state.players.len()
            ));
            state.events = events;
            state.events_match_id = Some(match_id);
            state.player1_selected = 0;
            state.player2_selected = 0;
            state.loading = None;
            None
        }
        Delta::Log(msg) => {
            if msg.starts_with("[WARN]") {
                state.loading = None;
            }
            state.push_log(msg);
            None
        }
    }
}
