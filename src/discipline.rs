use std::fmt;

use crate::high_score;
use crate::table::Cell;

pub const PLAYER: &str = "Player";
pub const PLAYER_ID: &str = "Player_ID";
pub const FULL_NAME: &str = "Full_Name";
pub const SEASON: &str = "Season";
pub const SPAN_YEARS: &str = "Span_Years";
pub const SEASONS_PLAYED: &str = "Seasons_Played";

pub const HS: &str = "HS";
pub const HS_NUMERIC: &str = "HS_Numeric";
pub const NOT_OUT_STATUS: &str = "Not_out_status";
pub const BBI: &str = "BBI";
pub const MD: &str = "MD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Discipline {
    Batting,
    Bowling,
    Fielding,
}

/// How a player's per-season values collapse into one career value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduce {
    First,
    Sum,
    Mean,
    Max,
    BestFigures,
    MostDismissals,
    DismissalTotal,
}

impl Reduce {
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Reduce::First | Reduce::BestFigures | Reduce::MostDismissals
        )
    }
}

#[derive(Clone, Copy)]
pub struct Fallback {
    pub from: &'static str,
    pub derive: fn(&Cell) -> Cell,
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fallback")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StatColumn {
    pub name: &'static str,
    /// Header on the standalone discipline sheet.
    pub label: &'static str,
    pub source: &'static str,
    pub reduce: Reduce,
    pub fallback: Option<Fallback>,
}

const fn stat(name: &'static str, reduce: Reduce) -> StatColumn {
    StatColumn {
        name,
        label: name,
        source: name,
        reduce,
        fallback: None,
    }
}

const fn labelled(name: &'static str, label: &'static str, reduce: Reduce) -> StatColumn {
    StatColumn {
        name,
        label,
        source: name,
        reduce,
        fallback: None,
    }
}

const fn derived(name: &'static str, reduce: Reduce, derive: fn(&Cell) -> Cell) -> StatColumn {
    StatColumn {
        name,
        label: name,
        source: name,
        reduce,
        fallback: Some(Fallback { from: HS, derive }),
    }
}

static BATTING_STATS: [StatColumn; 15] = [
    stat("Mat", Reduce::Sum),
    stat("Inns", Reduce::Sum),
    stat("NO", Reduce::Sum),
    stat("Runs", Reduce::Sum),
    stat(HS, Reduce::First),
    derived(HS_NUMERIC, Reduce::Max, high_score::numeric_cell),
    derived(NOT_OUT_STATUS, Reduce::First, high_score::status_cell),
    stat("Ave", Reduce::Mean),
    stat("BF", Reduce::Sum),
    stat("SR", Reduce::Mean),
    stat("Fours", Reduce::Sum),
    stat("Sixes", Reduce::Sum),
    stat("Ducks", Reduce::Sum),
    stat("Fifties", Reduce::Sum),
    stat("Hundreds", Reduce::Sum),
];

static BOWLING_STATS: [StatColumn; 12] = [
    stat("Mat", Reduce::Sum),
    stat("Inns", Reduce::Sum),
    stat("Overs", Reduce::Sum),
    stat("Mdns", Reduce::Sum),
    stat("Runs", Reduce::Sum),
    stat("Wkts", Reduce::Sum),
    stat(BBI, Reduce::BestFigures),
    stat("Ave", Reduce::Mean),
    stat("Econ", Reduce::Mean),
    stat("SR", Reduce::Mean),
    stat("4_Wkts", Reduce::Sum),
    stat("5_Wkts", Reduce::Sum),
];

static FIELDING_STATS: [StatColumn; 10] = [
    labelled("Mat_field", "Mat", Reduce::Sum),
    labelled("Inns_field", "Inns", Reduce::Sum),
    stat("Dis", Reduce::Sum),
    stat("Ct", Reduce::Sum),
    stat("St", Reduce::Sum),
    stat("Ct_Wk", Reduce::Sum),
    stat("Ct_Fi", Reduce::Sum),
    stat(MD, Reduce::MostDismissals),
    StatColumn {
        name: "MD_Numeric",
        label: "MD_Numeric",
        source: MD,
        reduce: Reduce::DismissalTotal,
        fallback: None,
    },
    stat("D/I", Reduce::Mean),
];

impl Discipline {
    pub const ALL: [Discipline; 3] = [
        Discipline::Batting,
        Discipline::Bowling,
        Discipline::Fielding,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Discipline::Batting => "Batting",
            Discipline::Bowling => "Bowling",
            Discipline::Fielding => "Fielding",
        }
    }

    pub fn input_file_name(self) -> &'static str {
        match self {
            Discipline::Batting => "batting_records.xlsx",
            Discipline::Bowling => "bowling_records.xlsx",
            Discipline::Fielding => "fielding_records.xlsx",
        }
    }

    pub fn cleaned_file_name(self) -> String {
        cleaned_name(self.input_file_name())
    }

    pub fn columns_to_delete(self) -> &'static [&'static str] {
        match self {
            Discipline::Batting => &["col15"],
            Discipline::Bowling => &["col14"],
            Discipline::Fielding => &["col11"],
        }
    }

    pub fn renames(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Discipline::Batting => &[
                ("100", "Hundreds"),
                ("50", "Fifties"),
                ("0", "Ducks"),
                ("4s", "Fours"),
                ("6s", "Sixes"),
            ],
            Discipline::Bowling => &[("4", "4_Wkts"), ("5", "5_Wkts")],
            Discipline::Fielding => &[
                ("Ct Wk", "Ct_Wk"),
                ("Ct Fi", "Ct_Fi"),
                ("Mat", "Mat_field"),
                ("Inns", "Inns_field"),
            ],
        }
    }

    pub fn columns_to_move_to_end(self) -> &'static [&'static str] {
        match self {
            Discipline::Batting => &["Ducks", "Fifties", "Hundreds"],
            Discipline::Bowling => &["4_Wkts", "5_Wkts"],
            Discipline::Fielding => &[],
        }
    }

    pub fn text_columns(self) -> &'static [&'static str] {
        match self {
            Discipline::Batting => &[],
            Discipline::Bowling => &[BBI],
            Discipline::Fielding => &[MD],
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Discipline::Batting => "_bat",
            Discipline::Bowling => "_bowl",
            Discipline::Fielding => "_field",
        }
    }

    pub fn stat_columns(self) -> &'static [StatColumn] {
        match self {
            Discipline::Batting => &BATTING_STATS,
            Discipline::Bowling => &BOWLING_STATS,
            Discipline::Fielding => &FIELDING_STATS,
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `batting_records.xlsx` -> `batting_records_cleaned.xlsx`.
pub fn cleaned_name(file_name: &str) -> String {
    match file_name.strip_suffix(".xlsx") {
        Some(stem) => format!("{stem}_cleaned.xlsx"),
        None => format!("{file_name}_cleaned"),
    }
}
