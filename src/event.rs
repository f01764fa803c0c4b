use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Suffix used by the parse step for per-game event files: `<game_id>_events.csv`.
const EVENTS_FILE_SUFFIX: &str = "_events.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Normalized play-by-play event vocabulary produced by the parse step.
/// Anything the parser did not recognize arrives as `Other` and is treated
/// as a clock-only transition downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[serde(rename = "made_2")]
    Made2,
    #[serde(rename = "made_3")]
    Made3,
    #[serde(rename = "miss_2")]
    Miss2,
    #[serde(rename = "miss_3")]
    Miss3,
    FreeThrowMade,
    FreeThrowMiss,
    Turnover,
    Rebound,
    Foul,
    Violation,
    Substitution,
    Timeout,
    JumpBall,
    Ejection,
    PeriodStart,
    PeriodEnd,
    InstantReplay,
    Other,
}

impl EventType {
    fn from_tag(tag: &str) -> EventType {
        match tag {
            "made_2" => EventType::Made2,
            "made_3" => EventType::Made3,
            "miss_2" => EventType::Miss2,
            "miss_3" => EventType::Miss3,
            "free_throw_made" => EventType::FreeThrowMade,
            "free_throw_miss" => EventType::FreeThrowMiss,
            "turnover" => EventType::Turnover,
            "rebound" => EventType::Rebound,
            "foul" => EventType::Foul,
            "violation" => EventType::Violation,
            "substitution" => EventType::Substitution,
            "timeout" => EventType::Timeout,
            "jump_ball" => EventType::JumpBall,
            "ejection" => EventType::Ejection,
            "period_start" => EventType::PeriodStart,
            "period_end" => EventType::PeriodEnd,
            "instant_replay" => EventType::InstantReplay,
            _ => EventType::Other,
        }
    }
}

// Unknown tags fold into `Other` rather than failing the row, so new parser
// vocabulary never breaks replay of older corpora.
impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(EventType::from_tag(&tag))
    }
}

/// One normalized play-by-play record. Scores are cumulative as carried by
/// the parse step; `time_remaining_sec` is the period clock, not game clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub game_id: String,
    pub event_num: u32,
    pub period: u32,
    pub time_remaining_sec: u32,
    pub home_score: u32,
    pub away_score: u32,
    #[serde(default)]
    pub possession: Option<Side>,
    pub event_type: EventType,
    #[serde(default)]
    pub points_scored: u8,
    #[serde(default)]
    pub description: Option<String>,
}

/// Load one game's event stream, sorted by `event_num`.
pub fn load_game_events(path: &Path) -> Result<Vec<Event>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open events file {}", path.display()))?;
    let mut events = Vec::new();
    for row in reader.deserialize::<Event>() {
        events.push(row.with_context(|| format!("decode event row in {}", path.display()))?);
    }
    events.sort_by_key(|e| e.event_num);
    Ok(events)
}

/// Discover and load every `<game_id>_events.csv` under `dir`.
///
/// A file that fails to decode loses only that game: it is logged and left
/// out of the map, so the replay's skip accounting picks it up. Only an
/// unreadable directory is a hard error.
pub fn load_events_dir(dir: &Path) -> Result<HashMap<String, Vec<Event>>> {
    if !dir.is_dir() {
        return Err(anyhow!("games directory not found: {}", dir.display()));
    }
    let mut by_game = HashMap::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let path = entry.context("read games dir entry")?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(game_id) = name.strip_suffix(EVENTS_FILE_SUFFIX) else {
            continue;
        };
        match load_game_events(&path) {
            Ok(events) => {
                by_game.insert(game_id.to_string(), events);
            }
            Err(err) => {
                warn!(file = %path.display(), error = %err, "skipping undecodable events file");
            }
        }
    }
    Ok(by_game)
}

pub fn events_path(dir: &Path, game_id: &str) -> std::path::PathBuf {
    dir.join(format!("{game_id}{EVENTS_FILE_SUFFIX}"))
}
