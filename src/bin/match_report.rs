use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use sb_terminal::config::{self, Config, SourceKind};
use sb_terminal::demo_feed::DemoSource;
use sb_terminal::export;
use sb_terminal::logging;
use sb_terminal::model::{Event, MatchInfo};
use sb_terminal::provider::EventSource;
use sb_terminal::stats::{self, MinuteRange, StatLine};
use sb_terminal::statsbomb::{self, StatsBombOpenData};
use sb_terminal::summary;

const USAGE: &str = "usage: match_report --match <id> [--events <file>] [--player <name>] \
[--minutes lo-hi] [--home <name> --away <name> --score h-a] [--csv <path>]";

#[derive(Debug, Default)]
struct Args {
    match_id: Option<u64>,
    events: Option<PathBuf>,
    player: Option<String>,
    minutes: Option<MinuteRange>,
    home: Option<String>,
    away: Option<String>,
    score: Option<(u8, u8)>,
    csv: Option<PathBuf>,
}

fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    while let Some(flag) = argv.next() {
        let mut value = || argv.next().with_context(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--match" => args.match_id = Some(value()?.parse().context("invalid --match")?),
            "--events" => args.events = Some(PathBuf::from(value()?)),
            "--player" => args.player = Some(value()?),
            "--minutes" => args.minutes = Some(parse_pair(&value()?, "--minutes")?),
            "--home" => args.home = Some(value()?),
            "--away" => args.away = Some(value()?),
            "--score" => args.score = Some(parse_pair(&value()?, "--score")?),
            "--csv" => args.csv = Some(PathBuf::from(value()?)),
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument {other}\n{USAGE}"),
        }
    }
    Ok(args)
}

fn parse_pair<T>(raw: &str, flag: &str) -> Result<T>
where
    T: PairArg,
{
    let (a, b) = raw
        .split_once('-')
        .with_context(|| format!("{flag} expects a-b, got {raw}"))?;
    let a = a.trim().parse().with_context(|| format!("invalid {flag}"))?;
    let b = b.trim().parse().with_context(|| format!("invalid {flag}"))?;
    Ok(T::from_pair(a, b))
}

trait PairArg {
    type Part: std::str::FromStr<Err = std::num::ParseIntError>;
    fn from_pair(a: Self::Part, b: Self::Part) -> Self;
}

impl PairArg for MinuteRange {
    type Part = u16;
    fn from_pair(a: u16, b: u16) -> Self {
        MinuteRange::new(a, b)
    }
}

impl PairArg for (u8, u8) {
    type Part = u8;
    fn from_pair(a: u8, b: u8) -> Self {
        (a, b)
    }
}

fn load_events(args: &Args, cfg: &Config, match_id: u64) -> Result<Vec<Event>> {
    if let Some(path) = &args.events {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        return statsbomb::parse_events_json(&raw);
    }
    let source: Box<dyn EventSource> = match cfg.source {
        SourceKind::Demo => Box::new(DemoSource),
        SourceKind::StatsBomb => Box::new(StatsBombOpenData::from_config(cfg)),
    };
    info!(source = source.name(), match_id, "fetching events");
    source.events(match_id)
}

/// Teams in order of first appearance in the events.
fn infer_teams(events: &[Event]) -> (String, String) {
    let mut teams: Vec<&str> = Vec::new();
    for event in events {
        if !teams.contains(&event.team.as_str()) {
            teams.push(&event.team);
        }
    }
    let home = teams.first().copied().unwrap_or("Home").to_string();
    let away = teams.get(1).copied().unwrap_or("Away").to_string();
    (home, away)
}

fn counted_goals(events: &[Event], team: &str) -> u8 {
    let goals = stats::team_stats(events, team).goals;
    u8::try_from(goals).unwrap_or(u8::MAX)
}

/// Builds the match header from the flags, filling whatever was not given
/// from the events: teams by first appearance, score by counted goals.
fn resolve_match(args: &Args, match_id: u64, events: &[Event]) -> Result<MatchInfo> {
    let (home_team, away_team) = match (&args.home, &args.away) {
        (Some(home), Some(away)) => (home.clone(), away.clone()),
        (None, None) => infer_teams(events),
        _ => bail!("--home and --away must be given together\n{USAGE}"),
    };
    let (home_score, away_score) = match args.score {
        Some(score) => score,
        None => (
            counted_goals(events, &home_team),
            counted_goals(events, &away_team),
        ),
    };
    Ok(MatchInfo {
        match_id,
        home_team,
        away_team,
        home_score,
        away_score,
        match_date: None,
    })
}

fn print_line(label: &str, line: StatLine) {
    println!(
        "  {label:<24} goals {:>3}  passes {:>4}  shots {:>3}",
        line.goals, line.passes, line.shots
    );
}

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init_stderr_logging();
    let cfg = Config::from_env();

    let args = parse_args(std::env::args().skip(1))?;
    let Some(match_id) = args.match_id else {
        bail!("--match is required\n{USAGE}");
    };

    let events = load_events(&args, &cfg, match_id)?;
    let info = resolve_match(&args, match_id, &events)?;

    let summary = summary::summarize(&info, &events);
    println!("Match {match_id}: {}", info.score_label());
    println!("Winner: {}", summary.winner);
    print_line(&summary.home_team, summary.home_stats);
    print_line(&summary.away_team, summary.away_stats);
    print_line("Total", summary.totals());

    let Some(player) = &args.player else {
        return Ok(());
    };
    let range = args.minutes.unwrap_or_default();
    if let Err(err) = range.validate() {
        warn!(%err, "minute window is empty");
    }
    let player_stats = stats::player_stats(&events, player, range);
    println!("Player {player} {}", range.label());
    print_line(player, player_stats);

    if let Some(path) = &args.csv {
        let rows = stats::player_events(&events, player, range);
        let file =
            File::create(path).with_context(|| format!("failed creating {}", path.display()))?;
        let written = export::write_player_events_csv(file, &rows)?;
        info!(path = %path.display(), rows = written, "wrote player events");
    }
    Ok(())
}
