use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON scene to arrange
    #[arg(short, long, value_name = "FILE")]
    pub input_file: PathBuf,
    /// Folder receiving the report and per-bed SVG renderings
    #[arg(short, long, value_name = "FOLDER")]
    pub output_folder: PathBuf,
    /// Optional JSON file with arrangement parameters
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    /// Only rearrange instances marked as selected
    #[arg(long)]
    pub selected_only: bool,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
}
