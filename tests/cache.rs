use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

use anyhow::{Result, bail};
use sb_terminal::cache::{CacheKey, SnapshotCache};
use sb_terminal::feed;
use sb_terminal::model::{CompetitionSeason, Event, EventKind, MatchInfo};
use sb_terminal::provider::EventSource;
use sb_terminal::state::{Delta, ProviderCommand};

#[derive(Default)]
struct CountingSource {
    competitions: AtomicUsize,
    matches: AtomicUsize,
    events: AtomicUsize,
}

impl EventSource for CountingSource {
    fn competitions(&self) -> Result<Vec<CompetitionSeason>> {
        self.competitions.fetch_add(1, Ordering::SeqCst);
        Ok(vec![CompetitionSeason {
            competition_id: 1,
            competition_name: "Test League".to_string(),
            country_name: "Nowhere".to_string(),
            season_id: 7,
            season_name: "2024".to_string(),
        }])
    }

    fn matches(&self, competition_id: u32, season_id: u32) -> Result<Vec<MatchInfo>> {
        self.matches.fetch_add(1, Ordering::SeqCst);
        if competition_id != 1 {
            bail!("unknown competition {competition_id}");
        }
        Ok(vec![MatchInfo {
            match_id: u64::from(season_id) * 10,
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            home_score: 1,
            away_score: 0,
            match_date: None,
        }])
    }

    fn events(&self, match_id: u64) -> Result<Vec<Event>> {
        let n = self.events.fetch_add(1, Ordering::SeqCst);
        if match_id == 0 && n == 0 {
            bail!("transient failure");
        }
        Ok(vec![Event::new(1, 3, EventKind::Pass, "A").by("X")])
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

#[test]
fn repeated_requests_share_one_snapshot() {
    let cache = SnapshotCache::new(CountingSource::default());
    let first = cache.competitions().expect("competitions");
    let second = cache.competitions().expect("competitions");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.source().competitions.load(Ordering::SeqCst), 1);

    let a = cache.events(42).expect("events");
    let b = cache.events(42).expect("events");
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.source().events.load(Ordering::SeqCst), 1);
}

#[test]
fn keys_are_independent() {
    let cache = SnapshotCache::new(CountingSource::default());
    let s7 = cache.matches(1, 7).expect("season 7");
    let s8 = cache.matches(1, 8).expect("season 8");
    assert_eq!(s7[0].match_id, 70);
    assert_eq!(s8[0].match_id, 80);
    cache.matches(1, 7).expect("season 7 again");
    assert_eq!(cache.source().matches.load(Ordering::SeqCst), 2);
    assert!(cache.contains(CacheKey::Matches {
        competition_id: 1,
        season_id: 8
    }));
    assert!(!cache.contains(CacheKey::Events { match_id: 70 }));
    assert!(!cache.contains(CacheKey::Competitions));
}

#[test]
fn failures_are_not_cached() {
    let cache = SnapshotCache::new(CountingSource::default());
    assert!(cache.events(0).is_err());
    assert!(!cache.contains(CacheKey::Events { match_id: 0 }));
    let retry = cache.events(0).expect("second attempt succeeds");
    assert_eq!(retry.len(), 1);
    assert_eq!(cache.source().events.load(Ordering::SeqCst), 2);
}

#[test]
fn worker_answers_commands_and_reports_errors() {
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let worker = feed::spawn_provider(SnapshotCache::new(CountingSource::default()), tx, cmd_rx);

    cmd_tx.send(ProviderCommand::FetchCompetitions).expect("send");
    cmd_tx
        .send(ProviderCommand::FetchMatches {
            competition_id: 9,
            season_id: 1,
        })
        .expect("send");
    cmd_tx
        .send(ProviderCommand::FetchEvents { match_id: 70 })
        .expect("send");
    drop(cmd_tx);
    worker.join().expect("worker exits when commands close");

    let deltas: Vec<Delta> = rx.iter().collect();
    assert_eq!(deltas.len(), 3);
    assert!(matches!(&deltas[0], Delta::SetCompetitions(rows) if rows.len() == 1));
    assert!(matches!(&deltas[1], Delta::Log(msg) if msg.starts_with("[WARN] Matches fetch error")));
    assert!(matches!(&deltas[2], Delta::SetEvents { match_id: 70, events } if events.len() == 1));
}
