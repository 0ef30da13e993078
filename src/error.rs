use std::path::PathBuf;

use thiserror::Error;

use crate::discipline::Discipline;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{discipline} source not found at {}", path.display())]
    MissingSource {
        discipline: Discipline,
        path: PathBuf,
    },

    #[error("column '{column}' not found in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    #[error("failed reading workbook {}: {source}", path.display())]
    ReadWorkbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("failed writing workbook {}: {source}", path.display())]
    WriteWorkbook {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid full-name table: {0}")]
    NameTable(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn missing_column(sheet: &str, column: &str) -> Self {
        Self::MissingColumn {
            sheet: sheet.to_string(),
            column: column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
