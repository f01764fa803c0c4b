use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hoopstate::elo::{EloConfig, GameElo, pregame_elos};
use hoopstate::event::{events_path, load_events_dir, load_game_events};
use hoopstate::export;
use hoopstate::inference::replay_snapshots;
use hoopstate::manifest::load_manifest;
use hoopstate::replay::{ReplayOptions, replay_corpus};

#[derive(Parser)]
#[command(name = "hoopstate")]
#[command(about = "Replay normalized NBA play-by-play into win-probability training data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay every game in the manifest and write the training table
    Replay {
        #[arg(long, default_value = "data/raw/games_manifest.csv")]
        manifest: PathBuf,
        #[arg(long, default_value = "data/parsed/games")]
        games_dir: PathBuf,
        #[arg(long, default_value = "data/parsed/training_dataset.csv")]
        out: PathBuf,
        /// Companion file with pre-game ratings per game
        #[arg(long, default_value = "data/parsed/game_elos.csv")]
        elos_out: PathBuf,
        /// Emit a row every N events (1 = every event)
        #[arg(long, default_value = "1")]
        every_n: usize,
        /// Skip rating lookups and emit empty rating columns
        #[arg(long)]
        no_elo: bool,
        /// Replay at most this many games (for testing)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Compute pre-game ratings for the manifest without replaying events
    Elos {
        #[arg(long, default_value = "data/raw/games_manifest.csv")]
        manifest: PathBuf,
        #[arg(long, default_value = "data/parsed/game_elos.csv")]
        out: PathBuf,
    },
    /// Replay one game and print per-event snapshots as JSON lines
    Game {
        #[arg(long)]
        game_id: String,
        #[arg(long, default_value = "data/parsed/games")]
        games_dir: PathBuf,
        /// Pre-game ratings CSV; missing games fall back to 1500
        #[arg(long)]
        elos: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay {
            manifest,
            games_dir,
            out,
            elos_out,
            every_n,
            no_elo,
            limit,
        } => run_replay(
            &manifest, &games_dir, &out, &elos_out, every_n, no_elo, limit,
        ),
        Commands::Elos { manifest, out } => run_elos(&manifest, &out),
        Commands::Game {
            game_id,
            games_dir,
            elos,
        } => run_game(&game_id, &games_dir, elos.as_deref()),
    }
}

fn run_replay(
    manifest_path: &Path,
    games_dir: &Path,
    out: &Path,
    elos_out: &Path,
    every_n: usize,
    no_elo: bool,
    limit: Option<usize>,
) -> Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let events_by_game = load_events_dir(games_dir)?;

    let opts = ReplayOptions {
        every_n,
        use_elo: !no_elo,
        limit,
        elo: EloConfig::default(),
    };
    let output = replay_corpus(&manifest, &events_by_game, &opts);
    if output.rows.is_empty() {
        // Every game skipping is the degenerate case of the skip policy,
        // not a failure.
        println!("No rows produced ({} games skipped)", output.games_skipped);
        return Ok(());
    }

    export::write_training_csv(out, &output.rows)?;
    if !no_elo {
        export::write_game_elos_csv(elos_out, &output.game_elos)?;
    }

    println!(
        "Replayed {} games ({} skipped), wrote {} rows to {}",
        output.games_replayed,
        output.games_skipped,
        output.rows.len(),
        out.display()
    );
    Ok(())
}

fn run_elos(manifest_path: &Path, out: &Path) -> Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let elos = pregame_elos(&manifest, EloConfig::default());
    export::write_game_elos_csv(out, &elos)?;
    println!("Wrote pre-game ratings for {} games to {}", elos.len(), out.display());
    Ok(())
}

fn run_game(game_id: &str, games_dir: &Path, elos_path: Option<&Path>) -> Result<()> {
    let events = load_game_events(&events_path(games_dir, game_id))?;
    if events.is_empty() {
        return Err(anyhow!("game {game_id} has no events"));
    }

    let (home_elo, away_elo) = match elos_path {
        Some(path) => lookup_game_elo(path, game_id)?.unwrap_or((1500.0, 1500.0)),
        None => (1500.0, 1500.0),
    };

    let stdout = std::io::stdout().lock();
    let mut writer = std::io::BufWriter::new(stdout);
    for snapshot in replay_snapshots(&events, home_elo, away_elo) {
        serde_json::to_writer(&mut writer, &snapshot).context("encode snapshot json")?;
        std::io::Write::write_all(&mut writer, b"\n").context("write snapshot line")?;
    }
    Ok(())
}

fn lookup_game_elo(path: &Path, game_id: &str) -> Result<Option<(f64, f64)>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open game elos {}", path.display()))?;
    for row in reader.deserialize::<GameElo>() {
        let row = row.with_context(|| format!("decode game elo row in {}", path.display()))?;
        if row.game_id == game_id {
            return Ok(Some((row.home_elo, row.away_elo)));
        }
    }
    Ok(None)
}
