use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::normalize::clean_code;

/// Path of an optional JSON config file.
pub const CONFIG_ENV: &str = "RUSTY_OUTCOMES_CONFIG";
/// Overrides `data_dir` from the config file.
pub const DATA_DIR_ENV: &str = "RUSTY_OUTCOMES_DATA_DIR";

/// A labelled CIP choice for the career outcome page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipChoice {
    pub label: String,
    pub code: String,
}

impl CipChoice {
    fn new(label: &str, code: &str) -> Self {
        Self {
            label: label.to_string(),
            code: code.to_string(),
        }
    }
}

/// Where the dashboard finds its data and how page 1 is seeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub career_file: String,
    pub conferred_file: String,
    /// Preferred lower end of the career year range; clamped into the data.
    pub career_start_year: i32,
    pub cip_catalogue: Vec<CipChoice>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            career_file: "outcome_data.csv".to_string(),
            conferred_file: "DegreeConferred.csv".to_string(),
            career_start_year: 2019,
            cip_catalogue: vec![
                CipChoice::new(
                    "Teacher Education and Professional Development, Specific Subject Areas (13.13)",
                    "13.13",
                ),
                CipChoice::new("Foreign Languages, Literatures, and Linguistics (16)", "16"),
            ],
        }
    }
}

impl DashboardConfig {
    /// Read `$RUSTY_OUTCOMES_CONFIG` if set, then apply `$RUSTY_OUTCOMES_DATA_DIR`.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(text).context("invalid dashboard config")?;
        for choice in &mut config.cip_catalogue {
            choice.code = clean_code(&choice.code);
        }
        Ok(config)
    }

    pub fn career_path(&self) -> PathBuf {
        self.data_dir.join(&self.career_file)
    }

    pub fn conferred_path(&self) -> PathBuf {
        self.data_dir.join(&self.conferred_file)
    }
}
