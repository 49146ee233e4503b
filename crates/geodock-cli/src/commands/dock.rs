use crate::cli::{DockArgs, RunArgs};
use crate::config::{AppConfig, build_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use geodock::core::io::loader::PdbLoader;
use geodock::engine::progress::ProgressReporter;
use geodock::workflows::runner::{DockingResult, DockingRunner};
use std::path::Path;
use tracing::info;

pub async fn run(args: DockArgs) -> Result<()> {
    execute(
        &args.run,
        &args.partner1,
        &args.partner2,
        args.output.as_deref(),
    )
    .await
}

/// Builds a runner from the layered configuration and docks one pair.
pub async fn execute(
    run_args: &RunArgs,
    partner1: &Path,
    partner2: &Path,
    output: Option<&Path>,
) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(run_args, output)?;
    execute_with_config(&config, partner1, partner2).await
}

pub async fn execute_with_config(
    config: &AppConfig,
    partner1: &Path,
    partner2: &Path,
) -> Result<()> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Docking {} with {}...",
        partner1.display(),
        partner2.display()
    );
    let result = tokio::task::block_in_place(|| dock_blocking(config, partner1, partner2, &reporter));
    progress_handler.finish();
    let result = result?;

    print_summary(&result);
    Ok(())
}

fn dock_blocking(
    config: &AppConfig,
    partner1: &Path,
    partner2: &Path,
    reporter: &ProgressReporter,
) -> Result<DockingResult> {
    info!("Loading models...");
    let runner = DockingRunner::new(&config.runner, &config.backend, reporter)?
        .with_loader(Box::new(PdbLoader::new(config.chain)));
    info!("Invoking the docking workflow...");
    Ok(runner.dock_with_progress(partner1, partner2, None, reporter)?)
}

fn print_summary(result: &DockingResult) {
    println!(
        "✓ Predicted complex: chain A ({} residues), chain B ({} residues)",
        result.complex.partner1.coords.len(),
        result.complex.partner2.coords.len()
    );
    println!(
        "  Embedding: {:.2} s, docking: {:.2} s",
        result.timings.embedding.as_secs_f64(),
        result.timings.docking.as_secs_f64()
    );
    if let Some(bytes) = result.peak_memory_bytes {
        println!("  Peak memory: {:.2} MB", bytes as f64 / (1024.0 * 1024.0));
    }
    match &result.output_path {
        Some(path) => println!("  Written to: {}", path.display()),
        None => println!("  No output path configured; the complex was not written."),
    }
}
