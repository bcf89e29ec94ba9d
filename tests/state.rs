use std::sync::Arc;

use sb_terminal::demo_feed::DemoSource;
use sb_terminal::model::{Event, EventKind, MatchInfo};
use sb_terminal::provider::EventSource;
use sb_terminal::state::{AppState, Delta, Focus, MAX_MINUTE, ProviderCommand, View, apply_delta};
use sb_terminal::stats::MinuteRange;

fn loaded_state() -> AppState {
    let source = DemoSource;
    let mut state = AppState::new();
    let next = apply_delta(
        &mut state,
        Delta::SetCompetitions(Arc::new(source.competitions().expect("competitions"))),
    );
    let Some(ProviderCommand::FetchMatches {
        competition_id,
        season_id,
    }) = next
    else {
        panic!("expected a matches request, got {next:?}");
    };
    let matches = source.matches(competition_id, season_id).expect("matches");
    let next = apply_delta(
        &mut state,
        Delta::SetMatches {
            competition_id,
            season_id,
            matches: Arc::new(matches),
        },
    );
    let Some(ProviderCommand::FetchEvents { match_id }) = next else {
        panic!("expected an events request, got {next:?}");
    };
    let events = source.events(match_id).expect("events");
    assert_eq!(
        apply_delta(
            &mut state,
            Delta::SetEvents {
                match_id,
                events: Arc::new(events),
            },
        ),
        None
    );
    state
}

fn info(match_id: u64) -> MatchInfo {
    MatchInfo {
        match_id,
        home_team: "A".to_string(),
        away_team: "B".to_string(),
        home_score: 2,
        away_score: 1,
        match_date: None,
    }
}

#[test]
fn competitions_chain_into_matches_and_events() {
    let state = loaded_state();
    assert_eq!(state.competition_names, vec!["Demo League", "Demo Cup"]);
    assert_eq!(state.selected_competition(), Some("Demo League"));
    assert_eq!(state.seasons().len(), 2);
    assert!(!state.matches.is_empty());
    assert!(state.current_events().is_some());
    assert!(!state.players.is_empty());
    assert_eq!(state.loading, None);
    assert!(state.summary().is_some());
}

#[test]
fn matches_are_sorted_by_date() {
    let state = loaded_state();
    let dates: Vec<_> = state.matches.iter().map(|m| m.match_date).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[test]
fn stale_matches_are_ignored() {
    let mut state = loaded_state();
    let before = state.matches.clone();
    let next = apply_delta(
        &mut state,
        Delta::SetMatches {
            competition_id: 99,
            season_id: 99,
            matches: Arc::new(vec![info(1)]),
        },
    );
    assert_eq!(next, None);
    assert_eq!(state.matches, before);
}

#[test]
fn stale_events_are_ignored() {
    let mut state = loaded_state();
    let players = state.players.clone();
    let next = apply_delta(
        &mut state,
        Delta::SetEvents {
            match_id: 12345,
            events: Arc::new(vec![Event::new(1, 1, EventKind::Pass, "A").by("Ghost")]),
        },
    );
    assert_eq!(next, None);
    assert_eq!(state.players, players);
}

#[test]
fn changing_competition_requests_its_first_season() {
    let mut state = loaded_state();
    state.focus = Focus::Competition;
    let next = state.select_next();
    assert_eq!(
        next,
        Some(ProviderCommand::FetchMatches {
            competition_id: 2,
            season_id: 20,
        })
    );
    assert!(state.matches.is_empty());
    assert!(state.current_events().is_none());
    assert_eq!(state.loading.as_deref(), Some("matches"));
    // Already at the end of the list.
    assert_eq!(state.select_next(), None);
}

#[test]
fn changing_match_requests_events() {
    let mut state = loaded_state();
    state.focus = Focus::Match;
    let next = state.select_next();
    let expected = state.selected_match().map(|m| m.match_id).expect("second match");
    assert_eq!(next, Some(ProviderCommand::FetchEvents { match_id: expected }));
    assert!(state.players.is_empty());
}

#[test]
fn player_two_never_equals_player_one() {
    let mut state = loaded_state();
    assert!(state.players.len() > 2);
    state.focus = Focus::Player2;
    for _ in 0..state.players.len() {
        assert_ne!(state.player1(), state.player2());
        assert!(!state.player2_choices().contains(&state.player1().unwrap_or_default()));
        state.select_next();
    }
    state.focus = Focus::Player1;
    state.select_next();
    assert_ne!(state.player1(), state.player2());
    assert!(state.player2().is_some());
}

#[test]
fn minute_window_is_clamped_and_ordered() {
    let mut state = AppState::new();
    assert_eq!(state.minutes, MinuteRange::new(0, 90));
    state.shift_minutes_lo(-5);
    assert_eq!(state.minutes.lo, 0);
    state.shift_minutes_hi(500);
    assert_eq!(state.minutes.hi, MAX_MINUTE);
    state.shift_minutes_hi(-(MAX_MINUTE as i32) - 10);
    assert_eq!(state.minutes.hi, state.minutes.lo);
    state.shift_minutes_lo(30);
    assert!(state.minutes.lo <= state.minutes.hi);
    state.reset_minutes();
    assert_eq!(state.minutes, MinuteRange::default());
}

#[test]
fn player_stats_follow_minute_window() {
    let mut state = loaded_state();
    let player = state.player1().expect("player").to_string();
    let full = state.player_stats(&player);
    state.minutes = MinuteRange::new(1, 0);
    assert_eq!(state.player_stats(&player), Default::default());
    assert!(state.player_events(&player).is_empty());
    state.reset_minutes();
    assert_eq!(state.player_stats(&player), full);
}

#[test]
fn warning_log_clears_loading() {
    let mut state = AppState::new();
    state.loading = Some("events".to_string());
    apply_delta(&mut state, Delta::Log("[INFO] still going".to_string()));
    assert!(state.loading.is_some());
    apply_delta(&mut state, Delta::Log("[WARN] Events fetch error: boom".to_string()));
    assert_eq!(state.loading, None);
    assert_eq!(state.logs.back().map(String::as_str), Some("[WARN] Events fetch error: boom"));
}

#[test]
fn focus_cycles_both_ways() {
    let mut state = AppState::new();
    for _ in 0..5 {
        state.cycle_focus();
    }
    assert_eq!(state.focus, Focus::Competition);
    state.cycle_focus_back();
    assert_eq!(state.focus, Focus::Player2);
    state.set_view(View::Charts);
    assert_eq!(state.view, View::Charts);
}

#[test]
fn empty_competitions_stop_loading() {
    let mut state = AppState::new();
    state.loading = Some("competitions".to_string());
    let next = apply_delta(&mut state, Delta::SetCompetitions(Arc::new(Vec::new())));
    assert_eq!(next, None);
    assert_eq!(state.loading, None);
    assert!(state.summary().is_none());
}

#[test]
fn stoppage_time_goal_shows_in_match_totals_only() {
    let mut state = AppState::new();
    let competitions = vec![sb_terminal::model::CompetitionSeason {
        competition_id: 1,
        competition_name: "League".to_string(),
        country_name: "Nowhere".to_string(),
        season_id: 2,
        season_name: "2024".to_string(),
    }];
    apply_delta(&mut state, Delta::SetCompetitions(Arc::new(competitions)));
    apply_delta(
        &mut state,
        Delta::SetMatches {
            competition_id: 1,
            season_id: 2,
            matches: Arc::new(vec![info(9)]),
        },
    );
    let late_goal = Event::new(1, 93, EventKind::Shot, "A")
        .by("X")
        .outcome("Goal");
    apply_delta(
        &mut state,
        Delta::SetEvents {
            match_id: 9,
            events: Arc::new(vec![late_goal]),
        },
    );

    assert_eq!(state.minutes, MinuteRange::default());
    assert_eq!(state.summary().expect("summary").home_stats.goals, 1);
    let whole = state.player_match_stats("X");
    assert_eq!((whole.goals, whole.shots), (1, 1));
    assert_eq!(state.player_stats("X").goals, 0);
    assert!(state.player_events("X").is_empty());
}
