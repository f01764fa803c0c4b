use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::manifest::{GameMeta, season_schedule};

#[derive(Debug, Clone, Copy)]
pub struct EloConfig {
    pub k: f64,
    pub initial: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            k: 20.0,
            initial: 1500.0,
        }
    }
}

/// Pre-game ratings for one game, as written to the companion file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameElo {
    pub game_id: String,
    pub home_elo: f64,
    pub away_elo: f64,
}

/// Season-scoped team ratings. Keys are (season_id, team_id), so two seasons
/// never share rating state and every team restarts at the initial rating.
///
/// Caller contract: `record_result` is called exactly once per completed
/// game, in ascending game-date order within a season. The book cannot
/// detect ordering violations; out-of-order updates silently corrupt every
/// later pre-game lookup in that season.
#[derive(Debug, Clone)]
pub struct EloBook {
    cfg: EloConfig,
    ratings: HashMap<(String, u32), f64>,
}

impl Default for EloBook {
    fn default() -> Self {
        Self::new(EloConfig::default())
    }
}

impl EloBook {
    pub fn new(cfg: EloConfig) -> Self {
        Self {
            cfg,
            ratings: HashMap::new(),
        }
    }

    pub fn rating_of(&self, season_id: &str, team_id: u32) -> f64 {
        self.ratings
            .get(&(season_id.to_string(), team_id))
            .copied()
            .unwrap_or(self.cfg.initial)
    }

    /// Standard pairwise update from one final score. Basketball has no
    /// draws: the home side scores 1.0 on a win, 0.0 otherwise, and both
    /// teams move by the same magnitude in opposite directions.
    pub fn record_result(
        &mut self,
        season_id: &str,
        home_team_id: u32,
        away_team_id: u32,
        pts_home: i32,
        pts_away: i32,
    ) {
        let home_elo = self.rating_of(season_id, home_team_id);
        let away_elo = self.rating_of(season_id, away_team_id);

        let expected_home = expected_score(home_elo, away_elo);
        let actual_home = if pts_home > pts_away { 1.0 } else { 0.0 };
        let delta = self.cfg.k * (actual_home - expected_home);

        self.ratings
            .insert((season_id.to_string(), home_team_id), home_elo + delta);
        self.ratings
            .insert((season_id.to_string(), away_team_id), away_elo - delta);
    }
}

/// Expected score for team A against team B (probability A wins).
pub fn expected_score(elo_a: f64, elo_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((elo_b - elo_a) / 400.0))
}

/// Pre-game ratings for every game in the manifest with a known result.
/// Seasons are independent folds; within a season games are visited in
/// game-date order, each team starting from the initial rating.
pub fn pregame_elos(manifest: &[GameMeta], cfg: EloConfig) -> Vec<GameElo> {
    let mut out = Vec::new();
    for (season_id, games) in season_schedule(manifest) {
        let mut book = EloBook::new(cfg);
        for game in games {
            let (Some(pts_home), Some(pts_away)) = (game.pts_home, game.pts_away) else {
                continue;
            };
            out.push(GameElo {
                game_id: game.game_id.clone(),
                home_elo: book.rating_of(&season_id, game.home_team_id),
                away_elo: book.rating_of(&season_id, game.away_team_id),
            });
            book.record_result(
                &season_id,
                game.home_team_id,
                game.away_team_id,
                pts_home,
                pts_away,
            );
        }
    }
    out
}
