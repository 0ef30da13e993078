use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PipelineError, Result};

const BUILTIN_NAMES: &str = include_str!("../data/full_names.json");

/// Short name -> expanded full name. Unknown names resolve to themselves.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FullNameTable {
    names: HashMap<String, String>,
}

impl FullNameTable {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    /// The table shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_NAMES)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn resolve<'a>(&'a self, short_name: &'a str) -> &'a str {
        self.names
            .get(short_name)
            .map(String::as_str)
            .unwrap_or(short_name)
    }

    pub fn insert(&mut self, short_name: impl Into<String>, full_name: impl Into<String>) {
        self.names.insert(short_name.into(), full_name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
