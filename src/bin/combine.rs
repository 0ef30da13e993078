use anyhow::{Context, Result};

use cricket_records::config::PipelineConfig;
use cricket_records::pipeline;

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = PipelineConfig::from_env_and_args();
    let report = pipeline::run_combine(&config).with_context(|| {
        format!(
            "unable to combine cleaned workbooks in {}",
            config.output_dir.display()
        )
    })?;

    println!("Combine complete");
    println!("Output: {}", config.combined_path().display());
    println!("Players: {}", report.players);
    for (sheet, rows) in &report.sheets {
        println!("{sheet}: {rows} rows");
    }
    Ok(())
}
