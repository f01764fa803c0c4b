use serde::{Deserialize, Serialize};

use crate::game_state::GameState;

/// Flat model input for one moment of a game. Ratings are `None` when the
/// replay runs without the rating book (`--no-elo`), which serializes as an
/// empty column rather than a fabricated default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Total seconds left in the game, not the period clock.
    pub time_remaining_sec: u32,
    pub score_diff: i64,
    pub period: u32,
    /// 1 = home ball, 0 = away ball, empty = undetermined.
    pub possession_home: Option<u8>,
    pub is_home_court: u8,
    pub home_elo: Option<f64>,
    pub away_elo: Option<f64>,
}

/// Pure feature extraction from a state snapshot and the frozen pre-game
/// ratings. Sampling every Nth event is the caller's row-selection policy;
/// it never changes what this computes for a given state.
pub fn extract(state: &GameState, home_elo: Option<f64>, away_elo: Option<f64>) -> FeatureVector {
    FeatureVector {
        time_remaining_sec: state.game_seconds_remaining(),
        score_diff: state.score_diff(),
        period: state.period,
        possession_home: state.possession.home_indicator(),
        is_home_court: u8::from(state.is_home_court),
        home_elo,
        away_elo,
    }
}

/// One labeled output row of the training table. Kept flat so it maps
/// one-to-one onto CSV columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub game_id: String,
    pub event_num: u32,
    pub time_remaining_sec: u32,
    pub score_diff: i64,
    pub period: u32,
    pub possession_home: Option<u8>,
    pub is_home_court: u8,
    pub home_elo: Option<f64>,
    pub away_elo: Option<f64>,
    pub label_home_win: u8,
}

impl TrainingRow {
    pub fn new(game_id: &str, event_num: u32, features: FeatureVector, home_won: bool) -> Self {
        Self {
            game_id: game_id.to_string(),
            event_num,
            time_remaining_sec: features.time_remaining_sec,
            score_diff: features.score_diff,
            period: features.period,
            possession_home: features.possession_home,
            is_home_court: features.is_home_court,
            home_elo: features.home_elo,
            away_elo: features.away_elo,
            label_home_win: u8::from(home_won),
        }
    }
}
