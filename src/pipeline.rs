use log::{error, info};

use crate::aggregate::{self, DisciplineSummary};
use crate::config::PipelineConfig;
use crate::discipline::Discipline;
use crate::error::{PipelineError, Result};
use crate::export::{self, ExportProgress, ExportReport};
use crate::identity::{PlayerId, PlayerRegistry};
use crate::names::FullNameTable;
use crate::normalize::{self, NormalizeOutcome};
use crate::workbook_io;

pub const SUMMARY_SAMPLE: usize = 5;

#[derive(Debug)]
pub struct NormalizeSummary {
    pub outcomes: Vec<NormalizeOutcome>,
    pub failures: Vec<(Discipline, PipelineError)>,
    pub registry: PlayerRegistry,
}

impl NormalizeSummary {
    pub fn unique_players(&self) -> usize {
        self.registry.len()
    }

    pub fn sample(&self) -> Vec<(&str, PlayerId)> {
        self.registry.iter().take(SUMMARY_SAMPLE).collect()
    }

    pub fn warning_count(&self) -> usize {
        self.outcomes
            .iter()
            .flat_map(|o| &o.sheets)
            .map(|s| s.warnings.len())
            .sum()
    }
}

/// Cleans every discipline's workbook with one shared registry. A missing or
/// unreadable workbook abandons that discipline only.
pub fn run_normalize(config: &PipelineConfig, names: &FullNameTable) -> NormalizeSummary {
    let mut registry = PlayerRegistry::new();
    let mut outcomes = Vec::new();
    let mut failures = Vec::new();

    for discipline in Discipline::ALL {
        let input = config.input_path(discipline);
        match normalize::normalize_file(
            discipline,
            &input,
            &config.output_dir,
            &mut registry,
            names,
        ) {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                error!("{discipline}: {err}");
                failures.push((discipline, err));
            }
        }
    }

    info!(
        "normalized {} of {} discipline(s); {} unique players",
        outcomes.len(),
        Discipline::ALL.len(),
        registry.len()
    );
    NormalizeSummary {
        outcomes,
        failures,
        registry,
    }
}

pub fn load_summaries(
    config: &PipelineConfig,
    discipline: Discipline,
) -> Result<Vec<DisciplineSummary>> {
    let path = config.cleaned_path(discipline);
    if !path.is_file() {
        return Err(PipelineError::MissingSource { discipline, path });
    }
    info!("{discipline}: reading {}", path.display());
    let sheets = workbook_io::read_workbook(&path)?;
    Ok(aggregate::summarize(discipline, &sheets))
}

/// Aggregates the cleaned workbooks into the combined report. Every cleaned
/// workbook must exist.
pub fn run_combine_with_progress(
    config: &PipelineConfig,
    on_progress: impl FnMut(ExportProgress),
) -> Result<ExportReport> {
    let mut loaded = Vec::with_capacity(Discipline::ALL.len());
    for discipline in Discipline::ALL {
        loaded.push((discipline, load_summaries(config, discipline)?));
    }
    let inputs: Vec<(Discipline, &[DisciplineSummary])> = loaded
        .iter()
        .map(|(d, summaries)| (*d, summaries.as_slice()))
        .collect();
    export::export_records_with_progress(&config.combined_path(), &inputs, on_progress)
}

pub fn run_combine(config: &PipelineConfig) -> Result<ExportReport> {
    run_combine_with_progress(config, |progress| {
        info!(
            "[{}/{}] {}",
            progress.current, progress.total, progress.message
        )
    })
}
