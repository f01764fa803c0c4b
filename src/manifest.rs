use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the games manifest: identity, chronology, and final score.
/// `pts_home`/`pts_away` may be absent for games that never finished; such
/// games are skipped by the replay and never reach the rating book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMeta {
    pub game_id: String,
    pub game_date: NaiveDate,
    pub season_id: String,
    pub home_team_id: u32,
    pub away_team_id: u32,
    #[serde(default)]
    pub pts_home: Option<i32>,
    #[serde(default)]
    pub pts_away: Option<i32>,
}

impl GameMeta {
    /// Home-win label from the final score; `None` when the score is unknown.
    pub fn home_won(&self) -> Option<bool> {
        let (Some(home), Some(away)) = (self.pts_home, self.pts_away) else {
            return None;
        };
        Some(home > away)
    }
}

/// Load the games manifest CSV.
pub fn load_manifest(path: &Path) -> Result<Vec<GameMeta>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open games manifest {}", path.display()))?;
    let mut games = Vec::new();
    for row in reader.deserialize::<GameMeta>() {
        games.push(row.with_context(|| format!("decode manifest row in {}", path.display()))?);
    }
    Ok(games)
}

/// Group the manifest by season and sort each season by game date. The
/// resulting order is the order the rating book must see games in; ties on
/// date break by game_id so reruns are deterministic.
pub fn season_schedule(manifest: &[GameMeta]) -> BTreeMap<String, Vec<GameMeta>> {
    let mut seasons: BTreeMap<String, Vec<GameMeta>> = BTreeMap::new();
    for game in manifest {
        seasons
            .entry(game.season_id.clone())
            .or_default()
            .push(game.clone());
    }
    for games in seasons.values_mut() {
        games.sort_by(|a, b| {
            a.game_date
                .cmp(&b.game_date)
                .then_with(|| a.game_id.cmp(&b.game_id))
        });
    }
    seasons
}
