mod common;

use sb_terminal::model::{Event, EventKind};
use sb_terminal::stats;
use sb_terminal::statsbomb::{parse_events_json, parse_matches_json};
use sb_terminal::summary::{self, Winner};
use common::read_fixture;

#[test]
fn draw_when_scores_level() {
    let events = vec![
        Event::new(1, 10, EventKind::Shot, "A").by("X").outcome("Goal"),
        Event::new(2, 20, EventKind::Shot, "B").by("Y").outcome("Goal"),
        Event::new(3, 30, EventKind::Pass, "B").by("Y"),
    ];
    let s = summary::match_summary("A", "B", 2, 2, &events);
    assert_eq!(s.winner, Winner::Draw);
    assert_eq!(s.winner.to_string(), "Draw");
    assert_eq!(
        s.totals().goals,
        stats::team_stats(&events, "A").goals + stats::team_stats(&events, "B").goals
    );
    assert_eq!(s.totals().passes, 1);
}

#[test]
fn winner_has_strictly_higher_score() {
    for (home, away) in [(0u8, 0u8), (1, 0), (0, 3), (4, 4), (5, 2)] {
        let winner = summary::decide_winner("Home", "Away", home, away);
        match winner {
            Winner::Draw => assert_eq!(home, away),
            Winner::Team(ref name) if name == "Home" => assert!(home > away),
            Winner::Team(ref name) => {
                assert_eq!(name, "Away");
                assert!(away > home);
            }
        }
    }
}

#[test]
fn summary_uses_stated_score_not_event_goals() {
    let events = vec![Event::new(1, 10, EventKind::Shot, "A").outcome("Goal")];
    let s = summary::match_summary("A", "B", 0, 1, &events);
    assert_eq!(s.winner, Winner::Team("B".to_string()));
    assert_eq!(s.home_stats.goals, 1);
}

#[test]
fn summarize_fixture_match() {
    let matches = parse_matches_json(&read_fixture("matches.json")).expect("matches");
    let events = parse_events_json(&read_fixture("events.json")).expect("events");
    let info = matches
        .iter()
        .find(|m| m.match_id == 9002)
        .expect("fixture match");

    let s = summary::summarize(info, &events);
    assert_eq!(s.home_team, "Alpha FC");
    assert_eq!(s.away_team, "Beta United");
    assert_eq!(s.winner, Winner::Draw);
    assert_eq!(s.home_stats.passes, 4);
    assert_eq!(s.away_stats.shots, 2);
    let totals = s.totals();
    assert_eq!((totals.goals, totals.passes, totals.shots), (2, 5, 4));
}

#[test]
fn summary_is_idempotent() {
    let events = parse_events_json(&read_fixture("events.json")).expect("events");
    let a = summary::match_summary("Alpha FC", "Beta United", 1, 1, &events);
    let b = summary::match_summary("Alpha FC", "Beta United", 1, 1, &events);
    assert_eq!(a, b);
}
