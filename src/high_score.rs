use crate::table::{Cell, FormulaCell, PLACEHOLDER};

/// Suffix the source uses to flag an unbeaten innings, e.g. `109*`.
pub const NOT_OUT_MARKER: char = '*';

pub const NOT_OUT: &str = "Not Out";
pub const OUT: &str = "Out";

const NUMERIC_FORMULA: &str = r#"=IF({cell}="-", "-", VALUE(SUBSTITUTE({cell},"*","")))"#;
const STATUS_FORMULA: &str =
    r#"=IF({cell}="-", "-", IF(ISNUMBER(FIND("*", {cell})), "Not Out", "Out"))"#;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighScore {
    pub runs: f64,
    pub not_out: bool,
}

pub fn parse(cell: &Cell) -> Option<HighScore> {
    match cell.value() {
        Cell::Number(n) => Some(HighScore {
            runs: *n,
            not_out: false,
        }),
        Cell::Text(raw) => {
            let raw = raw.trim();
            if raw == PLACEHOLDER {
                return None;
            }
            let not_out = raw.contains(NOT_OUT_MARKER);
            let runs = raw.replace(NOT_OUT_MARKER, "").trim().parse::<f64>().ok()?;
            Some(HighScore { runs, not_out })
        }
        _ => None,
    }
}

/// Runs part of a high score; the placeholder passes through.
pub fn numeric_cell(hs: &Cell) -> Cell {
    if hs.is_placeholder() {
        return Cell::placeholder();
    }
    parse(hs).map_or(Cell::Empty, |score| Cell::Number(score.runs))
}

/// `Not Out` when the marker is present, `Out` otherwise; the placeholder
/// passes through.
pub fn status_cell(hs: &Cell) -> Cell {
    if hs.is_placeholder() {
        return Cell::placeholder();
    }
    let not_out = hs.display().contains(NOT_OUT_MARKER);
    Cell::text(if not_out { NOT_OUT } else { OUT })
}

pub fn numeric_formula(source: &str, hs: &Cell) -> Cell {
    Cell::Formula(FormulaCell {
        template: NUMERIC_FORMULA,
        source: source.to_string(),
        cached: Box::new(numeric_cell(hs)),
    })
}

pub fn status_formula(source: &str, hs: &Cell) -> Cell {
    Cell::Formula(FormulaCell {
        template: STATUS_FORMULA,
        source: source.to_string(),
        cached: Box::new(status_cell(hs)),
    })
}
