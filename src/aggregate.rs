use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::discipline::{Discipline, FULL_NAME, PLAYER, PLAYER_ID, Reduce, SEASON, StatColumn};
use crate::error::PipelineError;
use crate::identity::PlayerId;
use crate::table::{Cell, PLACEHOLDER, Sheet};

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digits pattern"));

const EMPTY_DISMISSALS: [&str; 5] = ["", "0", "0.0", "nan", PLACEHOLDER];

#[derive(Debug, Clone, PartialEq)]
pub struct DisciplineSummary {
    pub discipline: Discipline,
    pub player: String,
    pub player_id: Option<PlayerId>,
    pub full_name: Option<String>,
    pub seasons: BTreeSet<i32>,
    /// Reduced values, aligned with `discipline.stat_columns()`.
    pub stats: Vec<Cell>,
}

impl DisciplineSummary {
    pub fn seasons_played(&self) -> usize {
        self.seasons.len()
    }

    pub fn stat(&self, name: &str) -> Option<&Cell> {
        let idx = self
            .discipline
            .stat_columns()
            .iter()
            .position(|c| c.name == name)?;
        self.stats.get(idx)
    }
}

struct PlayerRows {
    ids: Vec<Cell>,
    full_names: Vec<Cell>,
    seasons: BTreeSet<i32>,
    values: Vec<Vec<Cell>>,
}

impl PlayerRows {
    fn new(stat_count: usize) -> Self {
        Self {
            ids: Vec::new(),
            full_names: Vec::new(),
            seasons: BTreeSet::new(),
            values: vec![Vec::new(); stat_count],
        }
    }
}

pub fn clean_header(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

/// Groups every row of every sheet by short name and reduces each group.
/// Output is sorted by short name.
pub fn summarize(discipline: Discipline, sheets: &[Sheet]) -> Vec<DisciplineSummary> {
    let stats = discipline.stat_columns();
    let mut groups: BTreeMap<String, PlayerRows> = BTreeMap::new();

    for sheet in sheets {
        let mut columns: HashMap<String, usize> = HashMap::new();
        for (idx, header) in sheet.header().iter().enumerate() {
            columns.entry(clean_header(header)).or_insert(idx);
        }
        let Some(&player_idx) = columns.get(PLAYER) else {
            warn!(
                "{discipline}: {}; sheet left out of the summary",
                PipelineError::missing_column(&sheet.name, PLAYER)
            );
            continue;
        };
        let lookup = |row: &[Cell], name: &str| -> Cell {
            columns
                .get(name)
                .map(|&idx| row[idx].value().clone())
                .unwrap_or(Cell::Empty)
        };

        for row in sheet.rows() {
            let row = row.as_slice();
            let player = row[player_idx].display().trim().to_string();
            if player.is_empty() || player == PLACEHOLDER {
                continue;
            }
            let group = groups
                .entry(player)
                .or_insert_with(|| PlayerRows::new(stats.len()));
            group.ids.push(lookup(row, PLAYER_ID));
            group.full_names.push(lookup(row, FULL_NAME));
            if let Some(season) = lookup(row, SEASON).as_number() {
                group.seasons.insert(season as i32);
            }
            for (slot, column) in group.values.iter_mut().zip(stats) {
                slot.push(column_value(row, column, &lookup));
            }
        }
    }

    debug!("{discipline}: {} players summarized", groups.len());
    groups
        .into_iter()
        .map(|(player, rows)| DisciplineSummary {
            discipline,
            player_id: rows.ids.iter().find_map(PlayerId::from_cell),
            full_name: first_present(&rows.full_names).map(|c| c.display()),
            seasons: rows.seasons,
            stats: stats
                .iter()
                .zip(&rows.values)
                .map(|(column, values)| reduce(column.reduce, values))
                .collect(),
            player,
        })
        .collect()
}

fn column_value(
    row: &[Cell],
    column: &StatColumn,
    lookup: &impl Fn(&[Cell], &str) -> Cell,
) -> Cell {
    let value = lookup(row, column.source);
    match column.fallback {
        Some(fallback) if value.is_blank() => (fallback.derive)(&lookup(row, fallback.from)),
        _ => value,
    }
}

pub fn reduce(rule: Reduce, values: &[Cell]) -> Cell {
    match rule {
        Reduce::First => first_present(values).cloned().unwrap_or(Cell::Empty),
        Reduce::Sum => Cell::Number(
            values
                .iter()
                .map(|v| v.as_number().unwrap_or(0.0))
                .sum(),
        ),
        Reduce::Mean => {
            let nums: Vec<f64> = values.iter().filter_map(Cell::as_number).collect();
            if nums.is_empty() {
                Cell::Empty
            } else {
                Cell::Number(nums.iter().sum::<f64>() / nums.len() as f64)
            }
        }
        Reduce::Max => values
            .iter()
            .filter_map(Cell::as_number)
            .reduce(f64::max)
            .map_or(Cell::Empty, Cell::Number),
        Reduce::BestFigures => best_figures(values),
        Reduce::MostDismissals => most_dismissals(values),
        Reduce::DismissalTotal => dismissal_total(values),
    }
}

fn first_present(values: &[Cell]) -> Option<&Cell> {
    values.iter().map(Cell::value).find(|v| !v.is_blank())
}

pub fn parse_figures(raw: &str) -> Option<(u32, u32)> {
    let (wickets, runs) = raw.trim().split_once('/')?;
    Some((wickets.trim().parse().ok()?, runs.trim().parse().ok()?))
}

/// Most wickets wins; equal wickets go to the fewest runs. Values that do
/// not parse are ignored.
pub fn best_figures(values: &[Cell]) -> Cell {
    values
        .iter()
        .filter_map(|v| parse_figures(&v.display()))
        .min_by_key(|&(wickets, runs)| (Reverse(wickets), runs))
        .map_or_else(Cell::placeholder, |(wickets, runs)| {
            Cell::text(format!("{wickets}/{runs}"))
        })
}

/// The longest value with a parenthesised breakdown, e.g. `3 (3ct 0st)`;
/// otherwise the first meaningful value; otherwise the placeholder.
pub fn most_dismissals(values: &[Cell]) -> Cell {
    let candidates: Vec<String> = values
        .iter()
        .map(|v| v.display().trim().to_string())
        .filter(|s| !EMPTY_DISMISSALS.contains(&s.as_str()))
        .collect();

    let detailed = candidates
        .iter()
        .filter(|s| s.contains('('))
        .fold(None::<&String>, |best, s| match best {
            Some(b) if b.len() >= s.len() => Some(b),
            _ => Some(s),
        });

    detailed
        .or_else(|| candidates.first())
        .map_or_else(Cell::placeholder, |s| Cell::text(s.clone()))
}

pub fn dismissal_total(values: &[Cell]) -> Cell {
    let total = values
        .iter()
        .filter_map(|v| {
            let text = v.display();
            DIGITS_RE
                .find(&text)
                .and_then(|m| m.as_str().parse::<f64>().ok())
        })
        .sum();
    Cell::Number(total)
}

/// `2013` for a single season, `2010-2015` for a range. Season 0 (a sheet
/// label without a year) is ignored.
pub fn render_span(seasons: impl IntoIterator<Item = i32>) -> Option<String> {
    let mut years = seasons.into_iter().filter(|&s| s > 0);
    let first = years.next()?;
    let (min, max) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    if min == max {
        Some(min.to_string())
    } else {
        Some(format!("{min}-{max}"))
    }
}

pub fn player_spans(summaries: &[&[DisciplineSummary]]) -> BTreeMap<String, String> {
    let mut seasons: BTreeMap<&str, BTreeSet<i32>> = BTreeMap::new();
    for summary in summaries.iter().flat_map(|s| s.iter()) {
        seasons
            .entry(summary.player.as_str())
            .or_default()
            .extend(summary.seasons.iter().copied());
    }
    seasons
        .into_iter()
        .filter_map(|(player, years)| render_span(years).map(|span| (player.to_string(), span)))
        .collect()
}
