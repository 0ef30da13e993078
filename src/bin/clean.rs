use anyhow::{Result, anyhow};

use cricket_records::config::PipelineConfig;
use cricket_records::pipeline;

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = PipelineConfig::from_env_and_args();
    let names = config.load_names()?;
    let summary = pipeline::run_normalize(&config, &names);

    println!("Cleaning complete");
    println!("Input: {}", config.input_dir.display());
    println!("Output: {}", config.output_dir.display());
    for outcome in &summary.outcomes {
        let warnings: usize = outcome.sheets.iter().map(|s| s.warnings.len()).sum();
        println!(
            "{}: sheets={} warnings={} file={}",
            outcome.discipline,
            outcome.sheets.len(),
            warnings,
            outcome.output.display()
        );
    }
    println!("Unique players: {}", summary.unique_players());
    for (name, id) in summary.sample() {
        println!("  {name}: {id}");
    }

    if summary.outcomes.is_empty() {
        return Err(anyhow!(
            "no source workbooks found in {}",
            config.input_dir.display()
        ));
    }
    Ok(())
}
