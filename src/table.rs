use std::collections::BTreeSet;

/// Text written wherever a value is unknown or not applicable.
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Formula(FormulaCell),
}

/// A formula that refers to another column of the same row by header name.
/// The reference is resolved to a cell address only when the sheet is written.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaCell {
    pub template: &'static str,
    pub source: String,
    pub cached: Box<Cell>,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn placeholder() -> Self {
        Self::Text(PLACEHOLDER.to_string())
    }

    pub fn value(&self) -> &Cell {
        match self {
            Cell::Formula(formula) => formula.cached.value(),
            other => other,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) | Cell::Formula(_) => false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.value(), Cell::Text(s) if s.trim() == PLACEHOLDER)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value() {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn display(&self) -> String {
        match self.value() {
            Cell::Empty => String::new(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.clone(),
            Cell::Formula(_) => String::new(),
        }
    }
}

pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    header: Vec<String>,
    rows: Vec<Vec<Cell>>,
    text_columns: BTreeSet<String>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, header: Vec<String>) -> Self {
        Self {
            name: name.into(),
            header,
            rows: Vec::new(),
            text_columns: BTreeSet::new(),
        }
    }

    pub fn from_rows(name: impl Into<String>, header: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut sheet = Self::new(name, header);
        for row in rows {
            sheet.push_row(row);
        }
        sheet
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.header.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    pub fn rename_column(&mut self, old: &str, new: &str) -> bool {
        let Some(idx) = self.column_index(old) else {
            return false;
        };
        self.header[idx] = new.to_string();
        if self.text_columns.remove(old) {
            self.text_columns.insert(new.to_string());
        }
        true
    }

    pub fn delete_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.remove_at(idx);
        true
    }

    pub fn insert_column_before(&mut self, anchor: &str, name: &str, values: Vec<Cell>) -> bool {
        let Some(idx) = self.column_index(anchor) else {
            return false;
        };
        self.insert_at(idx, name, values);
        true
    }

    pub fn insert_column_after(&mut self, anchor: &str, name: &str, values: Vec<Cell>) -> bool {
        let Some(idx) = self.column_index(anchor) else {
            return false;
        };
        self.insert_at(idx + 1, name, values);
        true
    }

    pub fn push_column(&mut self, name: &str, values: Vec<Cell>) {
        let idx = self.header.len();
        self.insert_at(idx, name, values);
    }

    /// Deletes every column whose data rows are all blank and returns the
    /// deleted headers in sheet order.
    pub fn delete_empty_columns(&mut self) -> Vec<String> {
        let empty: Vec<usize> = (0..self.header.len())
            .filter(|&idx| self.rows.iter().all(|row| row[idx].is_blank()))
            .collect();
        let names = empty.iter().map(|&idx| self.header[idx].clone()).collect();
        for idx in empty.into_iter().rev() {
            self.remove_at(idx);
        }
        names
    }

    pub fn move_columns_to_end(&mut self, names: &[&str]) -> Vec<String> {
        let mut moved = Vec::new();
        for name in names {
            let Some(idx) = self.column_index(name) else {
                continue;
            };
            let (header, values) = self.remove_at(idx);
            let text = self.text_columns.contains(&header);
            self.push_column(&header, values);
            if text {
                self.text_columns.insert(header.clone());
            }
            moved.push(header);
        }
        moved
    }

    pub fn mark_text(&mut self, name: &str) -> bool {
        if !self.has_column(name) {
            return false;
        }
        self.text_columns.insert(name.to_string());
        true
    }

    pub fn is_text(&self, name: &str) -> bool {
        self.text_columns.contains(name)
    }

    fn insert_at(&mut self, idx: usize, name: &str, values: Vec<Cell>) {
        self.header.insert(idx, name.to_string());
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.insert(idx, values.next().unwrap_or(Cell::Empty));
        }
    }

    fn remove_at(&mut self, idx: usize) -> (String, Vec<Cell>) {
        let header = self.header.remove(idx);
        self.text_columns.remove(&header);
        let values = self.rows.iter_mut().map(|row| row.remove(idx)).collect();
        (header, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Sheet {
        Sheet::from_rows(
            "Batting_2010",
            headers(&["Player", "Blank", "Runs", "Junk"]),
            vec![
                vec![Cell::text("MS Dhoni"), Cell::Empty, Cell::Number(287.0), Cell::text(" ")],
                vec![Cell::text("SK Raina"), Cell::Empty, Cell::Number(520.0), Cell::Empty],
            ],
        )
    }

    #[test]
    fn empty_column_deletion_is_idempotent() {
        let mut sheet = sample();
        assert_eq!(sheet.delete_empty_columns(), vec!["Blank", "Junk"]);
        assert_eq!(sheet.header(), &["Player", "Runs"]);
        assert!(sheet.delete_empty_columns().is_empty());
        assert_eq!(sheet.width(), 2);
    }

    #[test]
    fn move_to_end_keeps_order_and_values() {
        let mut sheet = Sheet::from_rows(
            "s",
            headers(&["Hundreds", "Player", "Ducks", "Runs"]),
            vec![vec![
                Cell::Number(1.0),
                Cell::text("A"),
                Cell::Number(2.0),
                Cell::Number(3.0),
            ]],
        );
        let moved = sheet.move_columns_to_end(&["Ducks", "Fifties", "Hundreds"]);
        assert_eq!(moved, vec!["Ducks", "Hundreds"]);
        assert_eq!(sheet.header(), &["Player", "Runs", "Ducks", "Hundreds"]);
        assert_eq!(sheet.cell(0, "Hundreds"), Some(&Cell::Number(1.0)));
        assert_eq!(sheet.cell(0, "Ducks"), Some(&Cell::Number(2.0)));
    }

    #[test]
    fn insert_relative_to_named_column() {
        let mut sheet = sample();
        assert!(sheet.insert_column_before("Player", "Player_ID", vec![Cell::text("001")]));
        assert!(sheet.insert_column_after("Player", "Full_Name", Vec::new()));
        assert!(!sheet.insert_column_after("Missing", "X", Vec::new()));
        assert_eq!(&sheet.header()[..3], &["Player_ID", "Player", "Full_Name"]);
        assert_eq!(sheet.cell(0, "Player_ID"), Some(&Cell::text("001")));
        assert_eq!(sheet.cell(1, "Player_ID"), Some(&Cell::Empty));
    }

    #[test]
    fn rename_carries_text_format() {
        let mut sheet = sample();
        sheet.mark_text("Runs");
        sheet.rename_column("Runs", "Runs_bowl");
        assert!(sheet.is_text("Runs_bowl"));
        assert!(!sheet.is_text("Runs"));
    }

    #[test]
    fn numbers_display_without_trailing_zero() {
        assert_eq!(Cell::Number(45.0).display(), "45");
        assert_eq!(Cell::Number(31.5).display(), "31.5");
        assert_eq!(Cell::text(" 12 ").as_number(), Some(12.0));
        assert_eq!(Cell::placeholder().as_number(), None);
    }
}
