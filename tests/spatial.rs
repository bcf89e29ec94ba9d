mod common;

use sb_terminal::model::{Event, EventKind, Location};
use sb_terminal::spatial::{self, PassVector, SpatialPrimitive};
use common::fixture_events;

#[test]
fn worked_example_pass_vector() {
    let events = vec![
        Event::new(1, 10, EventKind::Shot, "A")
            .by("X")
            .at(90.0, 40.0)
            .outcome("Goal"),
        Event::new(2, 12, EventKind::Pass, "A")
            .by("X")
            .at(50.0, 40.0)
            .pass_to(60.0, 45.0),
    ];
    assert_eq!(
        spatial::pass_vectors(&events, "X"),
        vec![PassVector {
            from: Location::new(50.0, 40.0),
            to: Location::new(60.0, 45.0),
            owner: "X".to_string(),
        }]
    );
}

#[test]
fn pass_vector_count_matches_complete_passes() {
    let events = fixture_events();
    for player in ["Xavi Test", "Yann Probe", "Zed Sample"] {
        let expected = events
            .iter()
            .filter(|e| {
                e.player.as_deref() == Some(player)
                    && e.kind == EventKind::Pass
                    && e.location.is_some()
                    && e.pass_end_location.is_some()
            })
            .count();
        assert_eq!(spatial::pass_vectors(&events, player).len(), expected, "{player}");
    }
    assert_eq!(spatial::pass_vectors(&events, "Xavi Test").len(), 3);
    assert!(spatial::pass_vectors(&events, "Zed Sample").is_empty());
}

#[test]
fn pass_vectors_are_not_minute_filtered() {
    let events = fixture_events();
    let vectors = spatial::pass_vectors(&events, "Xavi Test");
    let last = vectors.last().expect("stoppage time pass");
    assert_eq!(last.from, Location::new(20.0, 60.0));
    assert_eq!(last.to, Location::new(40.0, 70.0));
}

#[test]
fn shot_points_skip_missing_location() {
    let events = fixture_events();
    let xavi = spatial::shot_points(&events, "Xavi Test");
    assert_eq!(xavi.len(), 1);
    assert!(xavi[0].scored);
    assert_eq!(xavi[0].at, Location::new(108.0, 38.0));

    let yann = spatial::shot_points(&events, "Yann Probe");
    let scored: Vec<bool> = yann.iter().map(|p| p.scored).collect();
    assert_eq!(scored, vec![false, true]);
    assert!(yann.iter().all(|p| p.owner == "Yann Probe"));
}

#[test]
fn primitives_interleave_in_event_order() {
    let events = fixture_events();
    let kinds: Vec<&str> = spatial::primitives(&events, "Xavi Test")
        .iter()
        .map(|p| match p {
            SpatialPrimitive::Pass(_) => "pass",
            SpatialPrimitive::Shot(_) => "shot",
        })
        .collect();
    assert_eq!(kinds, vec!["pass", "shot", "pass", "pass"]);
}

#[test]
fn unknown_player_has_no_primitives() {
    let events = fixture_events();
    assert!(spatial::pass_vectors(&events, "Nobody").is_empty());
    assert!(spatial::shot_points(&events, "Nobody").is_empty());
    assert!(spatial::primitives(&[], "Xavi Test").is_empty());
}
