use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::cache::SnapshotCache;
use crate::provider::EventSource;
use crate::state::{Delta, ProviderCommand};

/// Runs provider calls off the UI thread until the command channel closes.
pub fn spawn_provider<S>(
    cache: SnapshotCache<S>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()>
where
    S: EventSource + Send + 'static,
{
    thread::spawn(move || {
        info!(source = cache.source().name(), "provider worker started");
        for cmd in cmd_rx {
            if !handle_command(&cache, cmd, &tx) {
                break;
            }
        }
        info!("provider worker stopped");
    })
}

/// Returns `false` once the UI side has hung up.
pub fn handle_command<S: EventSource>(
    cache: &SnapshotCache<S>,
    cmd: ProviderCommand,
    tx: &Sender<Delta>,
) -> bool {
    let delta = match cmd {
        ProviderCommand::FetchCompetitions => match cache.competitions() {
            Ok(rows) => Delta::SetCompetitions(rows),
            Err(err) => warn_delta("Competitions fetch error", &err),
        },
        ProviderCommand::FetchMatches {
            competition_id,
            season_id,
        } => match cache.matches(competition_id, season_id) {
            Ok(matches) => Delta::SetMatches {
                competition_id,
                season_id,
                matches,
            },
            Err(err) => warn_delta("Matches fetch error", &err),
        },
        ProviderCommand::FetchEvents { match_id } => match cache.events(match_id) {
            Ok(events) => Delta::SetEvents { match_id, events },
            Err(err) => warn_delta("Events fetch error", &err),
        },
    };
    tx.send(delta).is_ok()
}

fn warn_delta(what: &str, err: &anyhow::Error) -> Delta {
    warn!(error = %format!("{err:#}"), "{what}");
    Delta::Log(format!("[WARN] {what}: {err}"))
}
