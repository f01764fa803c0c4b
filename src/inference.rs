use serde::{Deserialize, Serialize};

use crate::event::{Event, EventType};
use crate::features::{self, FeatureVector};
use crate::game_state::{GameState, Possession};

/// Per-event output of a single-game replay, for callers that want a
/// probability trajectory: the raw state alongside the model input. The
/// classifier itself lives outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub event_num: u32,
    pub period: u32,
    /// Period clock, as carried on the event.
    pub time_remaining_sec: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub score_diff: i64,
    pub possession: Possession,
    pub event_type: EventType,
    pub description: Option<String>,
    pub features: FeatureVector,
}

/// Replay one game against fixed pre-game ratings, one snapshot per event.
///
/// Ratings are inputs here, never computed or updated, so this works on a
/// game that is still in progress or whose final outcome is unknown.
pub fn replay_snapshots(events: &[Event], home_elo: f64, away_elo: f64) -> Vec<EventSnapshot> {
    let mut out = Vec::with_capacity(events.len());
    let mut state = GameState::tip_off();
    for event in events {
        state = state.apply(event);
        out.push(EventSnapshot {
            event_num: event.event_num,
            period: state.period,
            time_remaining_sec: state.time_remaining_sec,
            home_score: state.home_score,
            away_score: state.away_score,
            score_diff: state.score_diff(),
            possession: state.possession,
            event_type: event.event_type,
            description: event.description.clone(),
            features: features::extract(&state, Some(home_elo), Some(away_elo)),
        });
    }
    out
}
