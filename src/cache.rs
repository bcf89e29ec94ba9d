use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use tracing::{debug, info};

use crate::model::{CompetitionSeason, Event, MatchInfo};
use crate::provider::EventSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Competitions,
    Matches { competition_id: u32, season_id: u32 },
    Events { match_id: u64 },
}

/// Session-lifetime memoization in front of an [`EventSource`].
///
/// The first request for a key hits the source; every later request with the
/// same key gets the same `Arc` back. Failed fetches are not remembered.
pub struct SnapshotCache<S> {
    source: S,
    competitions: Mutex<Option<Arc<Vec<CompetitionSeason>>>>,
    matches: Mutex<HashMap<(u32, u32), Arc<Vec<MatchInfo>>>>,
    events: Mutex<HashMap<u64, Arc<Vec<Event>>>>,
}

impl<S: EventSource> SnapshotCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            competitions: Mutex::new(None),
            matches: Mutex::new(HashMap::new()),
            events: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn competitions(&self) -> Result<Arc<Vec<CompetitionSeason>>> {
        let mut guard = self
            .competitions
            .lock()
            .map_err(|_| anyhow!("competitions cache lock poisoned"))?;
        if let Some(hit) = guard.as_ref() {
            debug!(key = ?CacheKey::Competitions, "cache hit");
            return Ok(Arc::clone(hit));
        }
        let rows = Arc::new(self.source.competitions()?);
        info!(source = self.source.name(), rows = rows.len(), "fetched competitions");
        *guard = Some(Arc::clone(&rows));
        Ok(rows)
    }

    pub fn matches(&self, competition_id: u32, season_id: u32) -> Result<Arc<Vec<MatchInfo>>> {
        let key = CacheKey::Matches {
            competition_id,
            season_id,
        };
        memoize(&self.matches, (competition_id, season_id), key, || {
            self.source.matches(competition_id, season_id)
        })
    }

    pub fn events(&self, match_id: u64) -> Result<Arc<Vec<Event>>> {
        memoize(&self.events, match_id, CacheKey::Events { match_id }, || {
            self.source.events(match_id)
        })
    }

    pub fn contains(&self, key: CacheKey) -> bool {
        match key {
            CacheKey::Competitions => self
                .competitions
                .lock()
                .map(|g| g.is_some())
                .unwrap_or(false),
            CacheKey::Matches {
                competition_id,
                season_id,
            } => self
                .matches
                .lock()
                .map(|g| g.contains_key(&(competition_id, season_id)))
                .unwrap_or(false),
            CacheKey::Events { match_id } => self
                .events
                .lock()
                .map(|g| g.contains_key(&match_id))
                .unwrap_or(false),
        }
    }
}

fn memoize<K, T>(
    slot: &Mutex<HashMap<K, Arc<Vec<T>>>>,
    id: K,
    key: CacheKey,
    fetch: impl FnOnce() -> Result<Vec<T>>,
) -> Result<Arc<Vec<T>>>
where
    K: Eq + Hash,
{
    let mut guard = slot
        .lock()
        .map_err(|_| anyhow!("snapshot cache lock poisoned"))?;
    if let Some(hit) = guard.get(&id) {
        debug!(?key, "cache hit");
        return Ok(Arc::clone(hit));
    }
    let rows = Arc::new(fetch()?);
    info!(?key, rows = rows.len(), "cached provider snapshot");
    guard.insert(id, Arc::clone(&rows));
    Ok(rows)
}
