use anyhow::Result;

use crate::model::{CompetitionSeason, Event, MatchInfo};

/// Where competitions, matches and match events come from.
pub trait EventSource {
    fn competitions(&self) -> Result<Vec<CompetitionSeason>>;

    fn matches(&self, competition_id: u32, season_id: u32) -> Result<Vec<MatchInfo>>;

    fn events(&self, match_id: u64) -> Result<Vec<Event>>;

    fn name(&self) -> &'static str;
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn competitions(&self) -> Result<Vec<CompetitionSeason>> {
        (**self).competitions()
    }

    fn matches(&self, competition_id: u32, season_id: u32) -> Result<Vec<MatchInfo>> {
        (**self).matches(competition_id, season_id)
    }

    fn events(&self, match_id: u64) -> Result<Vec<Event>> {
        (**self).events(match_id)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
