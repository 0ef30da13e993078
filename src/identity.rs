use std::collections::HashMap;
use std::fmt;

use crate::table::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Reads an identifier back from a cleaned sheet cell. Zero and
    /// non-numeric cells carry no identifier.
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        let n = cell.as_number()?;
        if n < 1.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
            return None;
        }
        Some(PlayerId(n as u32))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Short name -> identifier table for one run.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    ids: HashMap<String, PlayerId>,
    order: Vec<String>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, short_name: &str) -> PlayerId {
        let key = short_name.trim();
        if let Some(id) = self.ids.get(key) {
            return *id;
        }
        let id = PlayerId(self.order.len() as u32 + 1);
        self.ids.insert(key.to_string(), id);
        self.order.push(key.to_string());
        id
    }

    pub fn get(&self, short_name: &str) -> Option<PlayerId> {
        self.ids.get(short_name.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, PlayerId)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.ids.get(name).map(|id| (name.as_str(), *id)))
    }
}
