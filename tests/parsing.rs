mod common;

use sb_terminal::model::{EventKind, Location};
use sb_terminal::statsbomb::{parse_competitions_json, parse_events_json, parse_matches_json};
use common::read_fixture;

#[test]
fn parses_competitions_fixture() {
    let raw = read_fixture("competitions.json");
    let rows = parse_competitions_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].competition_id, 43);
    assert_eq!(rows[0].season_id, 106);
    assert_eq!(rows[0].competition_name, "FIFA World Cup");
    assert_eq!(rows[0].country_name, "International");
    assert_eq!(rows[1].season_name, "2020/2021");
}

#[test]
fn parses_matches_fixture() {
    let raw = read_fixture("matches.json");
    let rows = parse_matches_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].match_id, 9002);
    assert_eq!(rows[0].home_team, "Alpha FC");
    assert_eq!(rows[0].away_team, "Beta United");
    assert_eq!((rows[0].home_score, rows[0].away_score), (1, 1));
    assert_eq!(rows[0].label(), "Alpha FC vs Beta United (2022-12-18)");
}

#[test]
fn parses_events_fixture_in_index_order() {
    let raw = read_fixture("events.json");
    let events = parse_events_json(&raw).expect("fixture should parse");
    assert_eq!(events.len(), 12);
    let indices: Vec<u32> = events.iter().map(|e| e.index).collect();
    assert_eq!(indices, (1..=12).collect::<Vec<_>>());

    let kickoff = &events[0];
    assert_eq!(kickoff.kind, EventKind::Other("Starting XI".to_string()));
    assert_eq!(kickoff.player, None);
    assert_eq!(kickoff.location, None);

    let pass = &events[2];
    assert_eq!(pass.kind, EventKind::Pass);
    assert_eq!(pass.player.as_deref(), Some("Xavi Test"));
    assert_eq!(pass.location, Some(Location::new(60.0, 40.0)));
    assert_eq!(pass.pass_end_location, Some(Location::new(70.0, 35.0)));
    assert_eq!(pass.shot_outcome, None);

    let goal = &events[3];
    assert_eq!(goal.kind, EventKind::Shot);
    assert_eq!(goal.minute, 10);
    assert_eq!(goal.shot_outcome.as_deref(), Some("Goal"));
    assert_eq!(goal.pass_end_location, None);
}

#[test]
fn keeps_events_with_missing_optional_fields() {
    let raw = read_fixture("events.json");
    let events = parse_events_json(&raw).expect("fixture should parse");

    let no_end = events.iter().find(|e| e.index == 8).expect("index 8");
    assert_eq!(no_end.kind, EventKind::Pass);
    assert_eq!(no_end.pass_end_location, None);

    let no_location = events.iter().find(|e| e.index == 9).expect("index 9");
    assert_eq!(no_location.kind, EventKind::Shot);
    assert_eq!(no_location.location, None);
    assert_eq!(no_location.shot_outcome.as_deref(), Some("Off T"));
}

#[test]
fn blank_payloads_parse_as_empty() {
    assert!(parse_events_json("").expect("empty").is_empty());
    assert!(parse_matches_json("null").expect("null").is_empty());
    assert!(parse_competitions_json("  \n").expect("blank").is_empty());
}

#[test]
fn malformed_payload_is_an_error() {
    assert!(parse_events_json("{\"not\": \"a list\"}").is_err());
    assert!(parse_matches_json("[{\"match_id\": 1}]").is_err());
}
