use std::path::PathBuf;

use crate::discipline::Discipline;
use crate::error::Result;
use crate::export::COMBINED_FILE_NAME;
use crate::names::FullNameTable;

pub const INPUT_DIR_ENV: &str = "CRICKET_INPUT_DIR";
pub const OUTPUT_DIR_ENV: &str = "CRICKET_OUTPUT_DIR";
pub const FULL_NAMES_ENV: &str = "CRICKET_FULL_NAMES";

const DEFAULT_INPUT_DIR: &str = "data/raw";
const DEFAULT_OUTPUT_DIR: &str = "data/final";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Replacement full-name table; the built-in one is used when unset.
    pub full_names: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            full_names: None,
        }
    }
}

impl PipelineConfig {
    /// Flags win over environment, environment over defaults. `.env.local`
    /// and `.env` are loaded first when present.
    pub fn from_env_and_args() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::resolve(&args, |key| std::env::var(key).ok())
    }

    pub fn resolve(args: &[String], env: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |flag: &str, key: &str| {
            parse_path_arg(args, flag).or_else(|| {
                env(key)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
            })
        };
        let defaults = Self::default();
        Self {
            input_dir: pick("--input-dir", INPUT_DIR_ENV).unwrap_or(defaults.input_dir),
            output_dir: pick("--output-dir", OUTPUT_DIR_ENV).unwrap_or(defaults.output_dir),
            full_names: pick("--names", FULL_NAMES_ENV),
        }
    }

    pub fn input_path(&self, discipline: Discipline) -> PathBuf {
        self.input_dir.join(discipline.input_file_name())
    }

    pub fn cleaned_path(&self, discipline: Discipline) -> PathBuf {
        self.output_dir.join(discipline.cleaned_file_name())
    }

    pub fn combined_path(&self) -> PathBuf {
        self.output_dir.join(COMBINED_FILE_NAME)
    }

    pub fn load_names(&self) -> Result<FullNameTable> {
        match &self.full_names {
            Some(path) => FullNameTable::from_path(path),
            None => FullNameTable::builtin(),
        }
    }
}

/// Accepts `--flag=value` and `--flag value`; blank values are skipped.
pub fn parse_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next.trim()));
            }
        }
    }
    None
}
