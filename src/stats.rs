use std::collections::HashSet;
use std::iter::Sum;
use std::ops::Add;

use crate::error::DataError;
use crate::model::{Event, EventKind};

pub const GOAL_OUTCOME: &str = "Goal";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatLine {
    pub goals: u32,
    pub passes: u32,
    pub shots: u32,
}

pub type TeamStats = StatLine;
pub type PlayerStats = StatLine;

impl StatLine {
    fn record(&mut self, event: &Event) {
        match event.kind {
            EventKind::Pass => self.passes += 1,
            EventKind::Shot => {
                self.shots += 1;
                if is_goal(event) {
                    self.goals += 1;
                }
            }
            EventKind::Other(_) => {}
        }
    }

    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> Self {
        let mut line = StatLine::default();
        for event in events {
            line.record(event);
        }
        line
    }
}

impl Add for StatLine {
    type Output = StatLine;

    fn add(self, rhs: StatLine) -> StatLine {
        StatLine {
            goals: self.goals + rhs.goals,
            passes: self.passes + rhs.passes,
            shots: self.shots + rhs.shots,
        }
    }
}

impl Sum for StatLine {
    fn sum<I: Iterator<Item = StatLine>>(iter: I) -> StatLine {
        iter.fold(StatLine::default(), Add::add)
    }
}

/// Inclusive minute window. `lo > hi` is allowed and selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteRange {
    pub lo: u16,
    pub hi: u16,
}

impl Default for MinuteRange {
    fn default() -> Self {
        Self { lo: 0, hi: 90 }
    }
}

impl MinuteRange {
    /// Every minute, stoppage and extra time included.
    pub const FULL_MATCH: MinuteRange = MinuteRange { lo: 0, hi: u16::MAX };

    pub fn new(lo: u16, hi: u16) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, minute: u16) -> bool {
        self.lo <= minute && minute <= self.hi
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.is_empty() {
            return Err(DataError::InvalidRange {
                lo: self.lo,
                hi: self.hi,
            });
        }
        Ok(())
    }

    /// Splits into `[lo, at]` and `[at + 1, hi]`; either half may be empty.
    pub fn split_at(&self, at: u16) -> (MinuteRange, MinuteRange) {
        let left = MinuteRange::new(self.lo, at.min(self.hi));
        let right = match at.checked_add(1) {
            Some(next) => MinuteRange::new(next.max(self.lo), self.hi),
            None => MinuteRange::new(1, 0),
        };
        (left, right)
    }

    pub fn label(&self) -> String {
        format!("{}'-{}'", self.lo, self.hi)
    }
}

pub fn is_goal(event: &Event) -> bool {
    event.kind == EventKind::Shot && event.shot_outcome.as_deref() == Some(GOAL_OUTCOME)
}

pub fn team_stats(events: &[Event], team: &str) -> TeamStats {
    StatLine::from_events(events.iter().filter(|e| e.team == team))
}

pub fn player_stats(events: &[Event], player: &str, range: MinuteRange) -> PlayerStats {
    StatLine::from_events(player_events_iter(events, player, range))
}

pub fn player_events<'a>(events: &'a [Event], player: &str, range: MinuteRange) -> Vec<&'a Event> {
    player_events_iter(events, player, range).collect()
}

fn player_events_iter<'a, 'p>(
    events: &'a [Event],
    player: &'p str,
    range: MinuteRange,
) -> impl Iterator<Item = &'a Event> {
    events
        .iter()
        .filter(move |e| e.is_by(player) && range.contains(e.minute))
}

/// Players with at least one attributed event, in order of first appearance.
pub fn players(events: &[Event]) -> Vec<String> {
    let mut seen = HashSet::new();
    events
        .iter()
        .filter_map(|e| e.player.as_deref())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}
