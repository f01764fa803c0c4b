use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::elo::GameElo;
use crate::features::TrainingRow;

pub fn write_training_rows<W: Write>(writer: W, rows: &[TrainingRow]) -> Result<()> {
    write_records(writer, rows)
}

pub fn write_game_elos<W: Write>(writer: W, elos: &[GameElo]) -> Result<()> {
    write_records(writer, elos)
}

pub fn write_training_csv(path: &Path, rows: &[TrainingRow]) -> Result<()> {
    write_training_rows(create_file(path)?, rows)
        .with_context(|| format!("write training rows to {}", path.display()))?;
    info!(rows = rows.len(), path = %path.display(), "wrote training table");
    Ok(())
}

pub fn write_game_elos_csv(path: &Path, elos: &[GameElo]) -> Result<()> {
    write_game_elos(create_file(path)?, elos)
        .with_context(|| format!("write game elos to {}", path.display()))?;
    info!(games = elos.len(), path = %path.display(), "wrote pre-game elo table");
    Ok(())
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    File::create(path).with_context(|| format!("create output file {}", path.display()))
}

fn write_records<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer
            .serialize(record)
            .context("serialize csv record")?;
    }
    csv_writer.flush().context("flush csv writer")?;
    Ok(())
}
