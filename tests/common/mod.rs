#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use sb_terminal::model::Event;
use sb_terminal::statsbomb::parse_events_json;

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn fixture_events() -> Vec<Event> {
    parse_events_json(&read_fixture("events.json")).expect("fixture should parse")
}
