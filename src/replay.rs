use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::elo::{EloBook, EloConfig, GameElo};
use crate::event::Event;
use crate::features::{self, TrainingRow};
use crate::game_state::GameState;
use crate::manifest::{GameMeta, season_schedule};

#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    /// Emit a row for every Nth event (1 = every event).
    pub every_n: usize,
    /// When false, skip the rating book entirely and emit empty ratings.
    pub use_elo: bool,
    /// Cap on games replayed, in manifest order. For testing.
    pub limit: Option<usize>,
    pub elo: EloConfig,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            every_n: 1,
            use_elo: true,
            limit: None,
            elo: EloConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplayOutput {
    pub rows: Vec<TrainingRow>,
    pub game_elos: Vec<GameElo>,
    pub games_replayed: usize,
    pub games_skipped: usize,
}

/// Replay one game's ordered events, emitting a labeled row for the first
/// event and every Nth event after it. The pre-game ratings are frozen for
/// the whole game.
pub fn replay_game(
    game_id: &str,
    events: &[Event],
    elos: Option<(f64, f64)>,
    home_won: bool,
    every_n: usize,
) -> Vec<TrainingRow> {
    let every_n = every_n.max(1);
    let (home_elo, away_elo) = match elos {
        Some((home, away)) => (Some(home), Some(away)),
        None => (None, None),
    };

    let mut rows = Vec::with_capacity(events.len() / every_n + 1);
    let mut state = GameState::tip_off();
    for (idx, event) in events.iter().enumerate() {
        state = state.apply(event);
        if idx % every_n != 0 {
            continue;
        }
        let features = features::extract(&state, home_elo, away_elo);
        rows.push(TrainingRow::new(game_id, event.event_num, features, home_won));
    }
    rows
}

/// Replay one season's games in the order given, threading a fresh rating
/// book through them. Games must already be date-sorted; the book sees each
/// result exactly once, after that game's rows are emitted.
///
/// Malformed games (no events, or no final score in the manifest) are
/// skipped with a warning and never update the book.
pub fn replay_season(
    season_id: &str,
    games: &[GameMeta],
    events_by_game: &HashMap<String, Vec<Event>>,
    opts: &ReplayOptions,
) -> ReplayOutput {
    let mut book = EloBook::new(opts.elo);
    let mut out = ReplayOutput::default();

    for game in games {
        let Some(home_won) = game.home_won() else {
            warn!(
                game_id = %game.game_id,
                season_id,
                "skipping game with no final score in manifest"
            );
            out.games_skipped += 1;
            continue;
        };
        let events = events_by_game.get(&game.game_id);
        let Some(events) = events.filter(|e| !e.is_empty()) else {
            warn!(game_id = %game.game_id, season_id, "skipping game with empty event stream");
            out.games_skipped += 1;
            continue;
        };

        let elos = opts.use_elo.then(|| {
            (
                book.rating_of(season_id, game.home_team_id),
                book.rating_of(season_id, game.away_team_id),
            )
        });
        out.rows
            .extend(replay_game(&game.game_id, events, elos, home_won, opts.every_n));
        out.games_replayed += 1;

        if let Some((home_elo, away_elo)) = elos {
            out.game_elos.push(GameElo {
                game_id: game.game_id.clone(),
                home_elo,
                away_elo,
            });
            // Commit the final result only now, so this game's own rows saw
            // strictly pre-game ratings.
            book.record_result(
                season_id,
                game.home_team_id,
                game.away_team_id,
                game.pts_home.unwrap_or_default(),
                game.pts_away.unwrap_or_default(),
            );
        }
    }

    out
}

/// Replay the whole corpus. Seasons are independent rating namespaces, so
/// they run in parallel; within a season replay is strictly sequential.
/// Output rows are concatenated in season order for deterministic reruns.
pub fn replay_corpus(
    manifest: &[GameMeta],
    events_by_game: &HashMap<String, Vec<Event>>,
    opts: &ReplayOptions,
) -> ReplayOutput {
    let manifest = match opts.limit {
        Some(limit) => &manifest[..limit.min(manifest.len())],
        None => manifest,
    };

    let seasons: Vec<(String, Vec<GameMeta>)> = season_schedule(manifest).into_iter().collect();
    let per_season: Vec<ReplayOutput> = seasons
        .par_iter()
        .map(|(season_id, games)| replay_season(season_id, games, events_by_game, opts))
        .collect();

    let mut out = ReplayOutput::default();
    for season in per_season {
        out.rows.extend(season.rows);
        out.game_elos.extend(season.game_elos);
        out.games_replayed += season.games_replayed;
        out.games_skipped += season.games_skipped;
    }

    info!(
        games = out.games_replayed,
        skipped = out.games_skipped,
        rows = out.rows.len(),
        "corpus replay complete"
    );
    out
}
