use std::collections::BTreeMap;
use std::path::Path;

use log::info;

use crate::aggregate::DisciplineSummary;
use crate::combine::{self, IDENTITY_HEADERS};
use crate::discipline::Discipline;
use crate::error::Result;
use crate::table::{Cell, Sheet};
use crate::workbook_io;

pub const COMBINED_FILE_NAME: &str = "All_Players_Records.xlsx";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// `(sheet name, data rows)` in write order.
    pub sheets: Vec<(String, usize)>,
    pub players: usize,
}

impl ExportReport {
    pub fn rows(&self, sheet: &str) -> Option<usize> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, rows)| *rows)
    }
}

pub struct ExportProgress {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

pub fn summary_sheet(
    discipline: Discipline,
    summaries: &[DisciplineSummary],
    spans: &BTreeMap<String, String>,
) -> Sheet {
    let stats = discipline.stat_columns();
    let header = IDENTITY_HEADERS
        .iter()
        .map(|h| h.to_string())
        .chain(stats.iter().map(|s| s.label.to_string()))
        .collect();
    let mut sheet = Sheet::new(discipline.label(), header);

    for summary in summaries {
        let mut row = vec![
            summary
                .player_id
                .map_or_else(Cell::placeholder, |id| Cell::text(id.to_string())),
            Cell::text(summary.player.clone()),
            Cell::text(
                summary
                    .full_name
                    .clone()
                    .unwrap_or_else(|| summary.player.clone()),
            ),
            spans
                .get(&summary.player)
                .map_or_else(Cell::placeholder, |span| Cell::text(span.clone())),
            Cell::Number(summary.seasons_played() as f64),
        ];
        row.extend(summary.stats.iter().cloned());
        sheet.push_row(row);
    }

    for column in stats
        .iter()
        .filter(|s| discipline.text_columns().contains(&s.name))
    {
        sheet.mark_text(column.label);
    }
    sheet
}

pub fn export_records_with_progress(
    path: &Path,
    inputs: &[(Discipline, &[DisciplineSummary])],
    mut on_progress: impl FnMut(ExportProgress),
) -> Result<ExportReport> {
    let total = inputs.len() + 2;
    let mut current = 0usize;

    let all: Vec<&[DisciplineSummary]> = inputs.iter().map(|(_, s)| *s).collect();
    let spans = crate::aggregate::player_spans(&all);
    on_progress(ExportProgress {
        current,
        total,
        message: format!("Computed spans for {} players", spans.len()),
    });

    let mut sheets = Vec::with_capacity(inputs.len() + 1);
    for (discipline, summaries) in inputs {
        sheets.push(summary_sheet(*discipline, summaries, &spans));
        current += 1;
        on_progress(ExportProgress {
            current,
            total,
            message: format!("{discipline}: {} players", summaries.len()),
        });
    }

    let table = combine::combine(inputs, &spans);
    let players = table.records.len();
    sheets.push(table.to_sheet());
    current += 1;
    on_progress(ExportProgress {
        current,
        total,
        message: format!("Combined: {players} players"),
    });

    workbook_io::write_workbook(path, &sheets)?;
    current += 1;
    on_progress(ExportProgress {
        current,
        total,
        message: format!("Saved {}", path.display()),
    });
    info!("combined workbook saved to {}", path.display());

    Ok(ExportReport {
        sheets: sheets
            .iter()
            .map(|s| (s.name.clone(), s.row_count()))
            .collect(),
        players,
    })
}

pub fn export_records(
    path: &Path,
    inputs: &[(Discipline, &[DisciplineSummary])],
) -> Result<ExportReport> {
    export_records_with_progress(path, inputs, |_| {})
}
