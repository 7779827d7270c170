use std::fs;

use anyhow::{Context, Result};
use arrange::io;
use arrange::io::ArrangeReport;
use arrange::io::cli::Cli;
use arrange::io::svg_export::bed_to_svg;
use arrange::job::{ArrangeJob, ArrangeMode, apply_pose};
use arrange::params::ArrangeParams;
use arrange::scene::Scene;
use clap::Parser;
use log::{info, warn};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let params = match args.config_file {
        None => {
            warn!("[MAIN] no config file provided, using defaults (--config-file to override)");
            ArrangeParams::default()
        }
        Some(path) => io::read_json(&path).context("incorrect config file format")?,
    };
    info!("[MAIN] params: {params:?}");

    let scene: Scene = io::read_json(args.input_file.as_path())?;
    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no usable name")?;

    if !args.output_folder.exists() {
        fs::create_dir_all(&args.output_folder)
            .with_context(|| format!("could not create output folder: {:?}", args.output_folder))?;
    }

    let mode = match args.selected_only {
        true => ArrangeMode::SelectedOnly,
        false => ArrangeMode::All,
    };

    let mut arranged_scene = scene.clone();
    let mut arrange_job = ArrangeJob::new(&scene, params, mode);
    arrange_job.prepare();
    let outcome = arrange_job.process()?;
    arrange_job.write_back(&mut |source, pose| {
        apply_pose(&mut arranged_scene, source, pose);
    });

    let report = ArrangeReport {
        status: outcome.status.clone(),
        bed_count: outcome.bed_count,
        arranged: outcome.arranged,
        canceled: outcome.canceled,
        unarranged: arrange_job.source_names(&outcome.unarranged),
        scene: arranged_scene.clone(),
    };
    io::write_json(
        &report,
        &args.output_folder.join(format!("sol_{input_stem}.json")),
    )?;

    for bed in 0..outcome.bed_count.max(1) {
        let document = bed_to_svg(&arranged_scene, bed);
        let svg_path = args
            .output_folder
            .join(format!("sol_{input_stem}_{bed}.svg"));
        io::write_svg(&document, &svg_path)?;
    }

    Ok(())
}
