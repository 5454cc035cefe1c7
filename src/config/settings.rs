//! User settings for budgetwise
//!
//! Manages user preferences: currency symbol, how monthly projections treat
//! years without data, and whether default categories are seeded.

use serde::{Deserialize, Serialize};

use super::paths::BudgetPaths;
use crate::error::BudgetError;

/// How projections treat years that have no estimate for the requested month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionPolicy {
    /// Average only over years that have an entry for the month
    #[default]
    SparseYears,
    /// Every year with any estimate counts; a missing month counts as zero
    ZeroFillYears,
}

impl std::fmt::Display for ProjectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionPolicy::SparseYears => write!(f, "sparse-years"),
            ProjectionPolicy::ZeroFillYears => write!(f, "zero-fill-years"),
        }
    }
}

impl std::str::FromStr for ProjectionPolicy {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "sparse" | "sparse-years" => Ok(ProjectionPolicy::SparseYears),
            "zero-fill" | "zero-fill-years" => Ok(ProjectionPolicy::ZeroFillYears),
            other => Err(BudgetError::Config(format!(
                "Unknown projection policy '{}' (use sparse-years or zero-fill-years)",
                other
            ))),
        }
    }
}

/// User settings for budgetwise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Averaging policy for monthly projections
    #[serde(default)]
    pub projection_policy: ProjectionPolicy,

    /// Whether `init` creates the default category set
    #[serde(default = "default_seed_categories")]
    pub seed_default_categories: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_seed_categories() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            projection_policy: ProjectionPolicy::default(),
            seed_default_categories: default_seed_categories(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BudgetPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
