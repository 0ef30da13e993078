use std::collections::{BTreeMap, HashSet};

use crate::aggregate::DisciplineSummary;
use crate::discipline::{
    Discipline, FULL_NAME, PLAYER, PLAYER_ID, SEASONS_PLAYED, SPAN_YEARS, StatColumn,
};
use crate::identity::PlayerId;
use crate::table::{Cell, PLACEHOLDER, Sheet};

pub const COMBINED_SHEET: &str = "Combined";

pub const IDENTITY_HEADERS: [&str; 5] =
    [PLAYER_ID, PLAYER, FULL_NAME, SPAN_YEARS, SEASONS_PLAYED];

#[derive(Debug, Clone)]
pub struct CombinedColumn {
    pub discipline: Discipline,
    pub stat: &'static StatColumn,
    pub header: String,
}

impl CombinedColumn {
    pub fn default_cell(&self) -> Cell {
        if self.stat.reduce.is_text() {
            Cell::placeholder()
        } else {
            Cell::Number(0.0)
        }
    }

    pub fn is_text(&self) -> bool {
        self.discipline.text_columns().contains(&self.stat.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRecord {
    pub player: String,
    pub player_id: Option<PlayerId>,
    pub full_name: Option<String>,
    pub span: Option<String>,
    pub seasons_played: usize,
    pub stats: Vec<Cell>,
}

#[derive(Debug, Clone)]
pub struct CombinedTable {
    pub columns: Vec<CombinedColumn>,
    pub records: Vec<CombinedRecord>,
}

/// Stat headers for the joined view. A name already used by an earlier
/// discipline gets the later discipline's suffix, so batting keeps bare names
/// and bowling's `Runs` becomes `Runs_bowl`.
pub fn combined_columns(disciplines: &[Discipline]) -> Vec<CombinedColumn> {
    let mut seen: HashSet<&'static str> = HashSet::new();
    let mut columns = Vec::new();
    for &discipline in disciplines {
        let stats = discipline.stat_columns();
        for stat in stats {
            let header = if seen.contains(stat.name) {
                format!("{}{}", stat.name, discipline.suffix())
            } else {
                stat.name.to_string()
            };
            columns.push(CombinedColumn {
                discipline,
                stat,
                header,
            });
        }
        seen.extend(stats.iter().map(|s| s.name));
    }
    columns
}

/// Outer join on short name. Players missing from a discipline get that
/// discipline's defaults; id and seasons played take the maximum seen, full
/// name the first real value.
pub fn combine(
    inputs: &[(Discipline, &[DisciplineSummary])],
    spans: &BTreeMap<String, String>,
) -> CombinedTable {
    let disciplines: Vec<Discipline> = inputs.iter().map(|(d, _)| *d).collect();
    let columns = combined_columns(&disciplines);
    let defaults: Vec<Cell> = columns.iter().map(CombinedColumn::default_cell).collect();

    let mut merged: BTreeMap<&str, CombinedRecord> = BTreeMap::new();
    let mut offset = 0;
    for (discipline, summaries) in inputs {
        let width = discipline.stat_columns().len();
        for summary in summaries.iter() {
            let record = merged
                .entry(summary.player.as_str())
                .or_insert_with(|| CombinedRecord {
                    player: summary.player.clone(),
                    player_id: None,
                    full_name: None,
                    span: spans.get(&summary.player).cloned(),
                    seasons_played: 0,
                    stats: defaults.clone(),
                });

            record.player_id = record.player_id.max(summary.player_id);
            record.seasons_played = record.seasons_played.max(summary.seasons_played());
            if record.full_name.is_none() {
                record.full_name = summary
                    .full_name
                    .clone()
                    .filter(|name| !name.trim().is_empty() && name.trim() != PLACEHOLDER);
            }

            for (i, cell) in summary.stats.iter().take(width).enumerate() {
                let slot = offset + i;
                record.stats[slot] = if cell.is_blank() {
                    defaults[slot].clone()
                } else {
                    cell.clone()
                };
            }
        }
        offset += width;
    }

    CombinedTable {
        columns,
        records: merged.into_values().collect(),
    }
}

impl CombinedTable {
    pub fn headers(&self) -> Vec<String> {
        IDENTITY_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(self.columns.iter().map(|c| c.header.clone()))
            .collect()
    }

    pub fn record(&self, player: &str) -> Option<&CombinedRecord> {
        self.records.iter().find(|r| r.player == player)
    }

    pub fn value(&self, player: &str, header: &str) -> Option<&Cell> {
        let idx = self.columns.iter().position(|c| c.header == header)?;
        self.record(player)?.stats.get(idx)
    }

    pub fn to_sheet(&self) -> Sheet {
        let mut sheet = Sheet::new(COMBINED_SHEET, self.headers());
        for record in &self.records {
            let mut row = vec![
                record
                    .player_id
                    .map_or_else(Cell::placeholder, |id| Cell::text(id.to_string())),
                Cell::text(record.player.clone()),
                Cell::text(record.full_name.as_deref().unwrap_or(&record.player)),
                record.span.clone().map_or_else(Cell::placeholder, Cell::Text),
                Cell::Number(record.seasons_played as f64),
            ];
            row.extend(record.stats.iter().cloned());
            sheet.push_row(row);
        }
        for column in self.columns.iter().filter(|c| c.is_text()) {
            sheet.mark_text(&column.header);
        }
        sheet
    }
}
