use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::discipline::{
    BBI, Discipline, FULL_NAME, HS, HS_NUMERIC, NOT_OUT_STATUS, PLAYER, PLAYER_ID, SEASON,
    cleaned_name,
};
use crate::error::{PipelineError, Result};
use crate::high_score;
use crate::identity::PlayerRegistry;
use crate::names::FullNameTable;
use crate::table::{Cell, PLACEHOLDER, Sheet};
use crate::workbook_io;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("valid year pattern"));

#[derive(Debug, Default)]
pub struct SheetReport {
    pub sheet: String,
    pub season: i32,
    pub deleted: Vec<String>,
    pub renamed: Vec<(String, String)>,
    pub identity_rows: usize,
    pub empty_deleted: Vec<String>,
    pub moved: Vec<String>,
    pub derived_rows: usize,
    pub warnings: Vec<PipelineError>,
}

#[derive(Debug)]
pub struct NormalizeOutcome {
    pub discipline: Discipline,
    pub output: PathBuf,
    pub sheets: Vec<SheetReport>,
}

/// First four-digit run in a sheet label, e.g. `Batting_2019` -> 2019; 0 when
/// the label has none.
pub fn season_from_label(label: &str) -> i32 {
    YEAR_RE
        .find(label)
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .unwrap_or(0)
}

pub fn normalize_file(
    discipline: Discipline,
    input: &Path,
    output_dir: &Path,
    registry: &mut PlayerRegistry,
    names: &FullNameTable,
) -> Result<NormalizeOutcome> {
    if !input.is_file() {
        return Err(PipelineError::MissingSource {
            discipline,
            path: input.to_path_buf(),
        });
    }
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| discipline.input_file_name().to_string());
    info!("{discipline}: transforming '{file_name}'");

    let mut sheets = workbook_io::read_workbook(input)?;
    let reports = normalize_workbook(&mut sheets, discipline, registry, names);

    let output = output_dir.join(cleaned_name(&file_name));
    workbook_io::write_workbook(&output, &sheets)?;
    info!(
        "{discipline}: saved {} sheet(s) to {}",
        sheets.len(),
        output.display()
    );

    Ok(NormalizeOutcome {
        discipline,
        output,
        sheets: reports,
    })
}

pub fn normalize_workbook(
    sheets: &mut [Sheet],
    discipline: Discipline,
    registry: &mut PlayerRegistry,
    names: &FullNameTable,
) -> Vec<SheetReport> {
    sheets
        .iter_mut()
        .map(|sheet| {
            let report = normalize_sheet(sheet, discipline, registry, names);
            log_report(&report);
            report
        })
        .collect()
}

pub fn normalize_sheet(
    sheet: &mut Sheet,
    discipline: Discipline,
    registry: &mut PlayerRegistry,
    names: &FullNameTable,
) -> SheetReport {
    let mut report = SheetReport {
        sheet: sheet.name.clone(),
        season: season_from_label(&sheet.name),
        ..SheetReport::default()
    };

    for name in discipline.columns_to_delete() {
        if sheet.delete_column(name) {
            report.deleted.push(name.to_string());
        }
    }

    for (old, new) in discipline.renames() {
        if sheet.rename_column(old, new) {
            report.renamed.push((old.to_string(), new.to_string()));
        }
    }

    match attach_identity(sheet, registry, names) {
        Ok(rows) => report.identity_rows = rows,
        Err(err) => report.warnings.push(err),
    }

    if let Err(err) = insert_season(sheet, report.season) {
        report.warnings.push(err);
    }

    report.empty_deleted = sheet.delete_empty_columns();
    report.moved = sheet.move_columns_to_end(discipline.columns_to_move_to_end());

    if discipline == Discipline::Batting {
        match derive_high_score(sheet) {
            Ok(rows) => report.derived_rows = rows,
            Err(err) => report.warnings.push(err),
        }
    }

    for name in discipline.text_columns() {
        if !sheet.mark_text(name) && *name == BBI {
            report
                .warnings
                .push(PipelineError::missing_column(&sheet.name, name));
        }
    }

    report
}

/// Puts `Player_ID` before and `Full_Name` after the player column. Blank
/// names get the placeholder and do not consume an identifier.
pub fn attach_identity(
    sheet: &mut Sheet,
    registry: &mut PlayerRegistry,
    names: &FullNameTable,
) -> Result<usize> {
    let players: Vec<String> = sheet
        .column(PLAYER)
        .ok_or_else(|| PipelineError::missing_column(&sheet.name, PLAYER))?
        .into_iter()
        .map(|cell| cell.display().trim().to_string())
        .collect();

    let mut ids = Vec::with_capacity(players.len());
    let mut full_names = Vec::with_capacity(players.len());
    for player in &players {
        if player.is_empty() || player == PLACEHOLDER {
            ids.push(Cell::placeholder());
            full_names.push(Cell::placeholder());
            continue;
        }
        ids.push(Cell::text(registry.resolve(player).to_string()));
        full_names.push(Cell::text(names.resolve(player)));
    }

    sheet.insert_column_before(PLAYER, PLAYER_ID, ids);
    sheet.insert_column_after(PLAYER, FULL_NAME, full_names);
    Ok(players.len())
}

pub fn insert_season(sheet: &mut Sheet, season: i32) -> Result<()> {
    if !sheet.has_column(PLAYER) {
        return Err(PipelineError::missing_column(&sheet.name, PLAYER));
    }
    let anchor = if sheet.has_column(FULL_NAME) {
        FULL_NAME
    } else {
        PLAYER
    };
    let values = vec![Cell::Number(f64::from(season)); sheet.row_count()];
    sheet.insert_column_after(anchor, SEASON, values);
    Ok(())
}

pub fn derive_high_score(sheet: &mut Sheet) -> Result<usize> {
    let scores: Vec<Cell> = sheet
        .column(HS)
        .ok_or_else(|| PipelineError::missing_column(&sheet.name, HS))?
        .into_iter()
        .cloned()
        .collect();

    let numeric = scores
        .iter()
        .map(|hs| high_score::numeric_formula(HS, hs))
        .collect();
    let status = scores
        .iter()
        .map(|hs| high_score::status_formula(HS, hs))
        .collect();

    sheet.insert_column_after(HS, HS_NUMERIC, numeric);
    sheet.insert_column_after(HS_NUMERIC, NOT_OUT_STATUS, status);
    Ok(scores.len())
}

fn log_report(report: &SheetReport) {
    info!("processing sheet: {}", report.sheet);
    for name in &report.deleted {
        debug!("  removed column '{name}'");
    }
    for (old, new) in &report.renamed {
        debug!("  renamed '{old}' to '{new}'");
    }
    if report.identity_rows > 0 {
        debug!(
            "  assigned ids and full names for {} rows",
            report.identity_rows
        );
    }
    if !report.empty_deleted.is_empty() {
        debug!(
            "  deleted {} empty column(s): {}",
            report.empty_deleted.len(),
            report.empty_deleted.join(", ")
        );
    }
    for name in &report.moved {
        debug!("  moved column '{name}' to the end");
    }
    if report.derived_rows > 0 {
        debug!("  derived high-score fields for {} rows", report.derived_rows);
    }
    for warning in &report.warnings {
        warn!("  {warning}; step skipped");
    }
}
