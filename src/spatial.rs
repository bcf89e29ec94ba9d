use tracing::debug;

use crate::model::{Event, EventKind, Location};
use crate::stats::is_goal;

#[derive(Debug, Clone, PartialEq)]
pub struct PassVector {
    pub from: Location,
    pub to: Location,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShotPoint {
    pub at: Location,
    pub scored: bool,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpatialPrimitive {
    Pass(PassVector),
    Shot(ShotPoint),
}

pub fn pass_vectors(events: &[Event], player: &str) -> Vec<PassVector> {
    events
        .iter()
        .filter(|e| e.is_by(player) && e.kind == EventKind::Pass)
        .filter_map(|e| to_pass_vector(e, player))
        .collect()
}

pub fn shot_points(events: &[Event], player: &str) -> Vec<ShotPoint> {
    events
        .iter()
        .filter(|e| e.is_by(player) && e.kind == EventKind::Shot)
        .filter_map(|e| to_shot_point(e, player))
        .collect()
}

/// Passes and shots of one player interleaved in event order.
pub fn primitives(events: &[Event], player: &str) -> Vec<SpatialPrimitive> {
    events
        .iter()
        .filter(|e| e.is_by(player))
        .filter_map(|e| match e.kind {
            EventKind::Pass => to_pass_vector(e, player).map(SpatialPrimitive::Pass),
            EventKind::Shot => to_shot_point(e, player).map(SpatialPrimitive::Shot),
            EventKind::Other(_) => None,
        })
        .collect()
}

fn to_pass_vector(event: &Event, player: &str) -> Option<PassVector> {
    match event.pass_segment() {
        Ok((from, to)) => Some(PassVector {
            from,
            to,
            owner: player.to_string(),
        }),
        Err(err) => {
            debug!(%err, "skipping pass without coordinates");
            None
        }
    }
}

fn to_shot_point(event: &Event, player: &str) -> Option<ShotPoint> {
    match event.origin() {
        Ok(at) => Some(ShotPoint {
            at,
            scored: is_goal(event),
            owner: player.to_string(),
        }),
        Err(err) => {
            debug!(%err, "skipping shot without location");
            None
        }
    }
}
