use anyhow::{Context, Result};

use cricket_records::config::PipelineConfig;
use cricket_records::pipeline;

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = PipelineConfig::from_env_and_args();
    let names = config
        .load_names()
        .context("unable to load full-name table")?;

    println!("Step 1: cleaning season workbooks");
    let summary = pipeline::run_normalize(&config, &names);
    for outcome in &summary.outcomes {
        println!(
            "{}: {} sheet(s) -> {}",
            outcome.discipline,
            outcome.sheets.len(),
            outcome.output.display()
        );
    }
    for (discipline, err) in &summary.failures {
        println!("{discipline}: skipped ({err})");
    }
    println!("Unique players: {}", summary.unique_players());
    println!("Sample player IDs:");
    for (name, id) in summary.sample() {
        println!("  {name}: {id}");
    }
    if summary.warning_count() > 0 {
        println!("Warnings: {}", summary.warning_count());
    }

    println!("Step 2: combining career records");
    let report = pipeline::run_combine(&config)
        .context("combining cleaned workbooks failed")?;
    for (sheet, rows) in &report.sheets {
        println!("{sheet}: {rows} rows");
    }
    println!("Output: {}", config.combined_path().display());
    Ok(())
}
