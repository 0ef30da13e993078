use std::fs;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use log::debug;
use rust_xlsxwriter::{Format, Formula, Workbook, Worksheet, XlsxError};

use crate::error::{PipelineError, Result};
use crate::table::{Cell, FormulaCell, Sheet};

/// Reads every sheet of an xlsx file; the first row of each is the header.
pub fn read_workbook(path: &Path) -> Result<Vec<Sheet>> {
    let read_err = |source| PipelineError::ReadWorkbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(read_err)?;
    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name).map_err(read_err)?;
        let sheet = sheet_from_range(&name, &range);
        debug!(
            "read sheet '{}' ({} columns, {} rows)",
            name,
            sheet.width(),
            sheet.row_count()
        );
        sheets.push(sheet);
    }
    Ok(sheets)
}

fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();
    let header = rows
        .next()
        .map(|row| {
            row.iter()
                .map(|data| cell_from_data(data).display().trim().to_string())
                .collect()
        })
        .unwrap_or_default();
    let body = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    Sheet::from_rows(name, header, body)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Float(n) => Cell::Number(*n),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::text(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Writes all sheets in one save. The file is built next to `path` and then
/// renamed over it, so readers never see a half-written workbook.
pub fn write_workbook(path: &Path, sheets: &[Sheet]) -> Result<()> {
    let write_err = |source| PipelineError::WriteWorkbook {
        path: path.to_path_buf(),
        source,
    };
    let io_err = |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = Workbook::new();
    let text_format = Format::new().set_num_format("@");
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name).map_err(write_err)?;
        write_sheet(worksheet, sheet, &text_format).map_err(write_err)?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("xlsx.tmp");
    if let Err(err) = workbook.save(&tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(err));
    }
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(err));
    }
    Ok(())
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &Sheet,
    text_format: &Format,
) -> std::result::Result<(), XlsxError> {
    for (col_idx, name) in sheet.header().iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, name)?;
    }

    for (row_idx, row) in sheet.rows().iter().enumerate() {
        let xl_row = row_idx as u32 + 1;
        for (col_idx, cell) in row.iter().enumerate() {
            let xl_col = col_idx as u16;
            let as_text = sheet.is_text(&sheet.header()[col_idx]);
            match cell {
                Cell::Empty => {}
                Cell::Number(_) if as_text => {
                    worksheet.write_string_with_format(
                        xl_row,
                        xl_col,
                        cell.display(),
                        text_format,
                    )?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(xl_row, xl_col, *n)?;
                }
                Cell::Text(s) if as_text => {
                    worksheet.write_string_with_format(xl_row, xl_col, s, text_format)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(xl_row, xl_col, s)?;
                }
                Cell::Formula(formula) => match formula_for(sheet, row_idx, formula) {
                    Some(f) => {
                        worksheet.write_formula(xl_row, xl_col, f)?;
                    }
                    None => match formula.cached.value() {
                        Cell::Number(n) => {
                            worksheet.write_number(xl_row, xl_col, *n)?;
                        }
                        other if !other.is_blank() => {
                            worksheet.write_string(xl_row, xl_col, other.display())?;
                        }
                        _ => {}
                    },
                },
            }
        }
    }
    Ok(())
}

fn formula_for(sheet: &Sheet, row_idx: usize, formula: &FormulaCell) -> Option<Formula> {
    let text = formula_text(sheet, row_idx, formula)?;
    Some(Formula::new(text).set_result(formula.cached.display()))
}

/// Resolves the formula's source column to an A1 reference on the same row.
fn formula_text(sheet: &Sheet, row_idx: usize, formula: &FormulaCell) -> Option<String> {
    let source_col = sheet.column_index(&formula.source)?;
    let address = format!("{}{}", column_letter(source_col), row_idx + 2);
    Some(formula.template.replace("{cell}", &address))
}

/// Zero-based column index to spreadsheet letters: 0 -> A, 26 -> AA.
pub fn column_letter(idx: usize) -> String {
    let mut n = idx + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}
