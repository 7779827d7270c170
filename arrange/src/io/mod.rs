use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use svg::Document;

use crate::scene::Scene;

pub mod cli;
pub mod svg_export;

/// Everything a run produces, written as a single JSON document: the
/// summary plus the scene with the new poses applied.
#[derive(Serialize, Clone, Debug)]
pub struct ArrangeReport {
    pub status: String,
    pub bed_count: usize,
    pub arranged: usize,
    pub canceled: bool,
    pub unarranged: Vec<String>,
    pub scene: Scene,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("could not open file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("could not parse file: {}", path.display()))
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("could not create file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)
        .with_context(|| format!("could not write file: {}", path.display()))?;
    info!("report written to {:?}", fs::canonicalize(path)?);
    Ok(())
}

pub fn write_svg(document: &Document, path: &Path) -> Result<()> {
    svg::save(path, document)
        .with_context(|| format!("could not write svg file: {}", path.display()))?;
    info!("svg written to {:?}", fs::canonicalize(path)?);
    Ok(())
}

pub fn init_logger(level_filter: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");
            let timestamp = jiff::Zoned::now().strftime("%H:%M:%S");

            let prefix = format!("[{}] [{}] <{}>", record.level(), timestamp, thread_name);
            out.finish(format_args!("{prefix:<27}{message}"))
        })
        .level(level_filter)
        .chain(std::io::stdout())
        .apply()
        .context("could not initialize logger")?;
    Ok(())
}
