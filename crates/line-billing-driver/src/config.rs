//! Driver configuration.

use std::path::{Path, PathBuf};

use line_billing_core::RateTable;

use crate::{DriverError, Result};

/// Default dataset location when `DATASET_PATH` is unset.
pub const DEFAULT_DATASET_PATH: &str = "dataset.json";

/// Driver configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// Path to the JSON dataset (default: `dataset.json`).
    pub dataset_path: PathBuf,

    /// Where to write the JSON report; stdout when unset.
    pub report_path: Option<PathBuf>,

    /// Fee and rate table applied to every contract.
    pub rates: RateTable,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            report_path: None,
            rates: RateTable::default(),
        }
    }
}

impl DriverConfig {
    /// Load configuration from the process environment.
    ///
    /// Reads `DATASET_PATH`, `REPORT_PATH` and `RATES_PATH`. When `RATES_PATH`
    /// is set, the rate table is loaded from that JSON file; fields missing
    /// from the file keep their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate table file cannot be read or parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through `var`, which looks up one variable by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate table file cannot be read or parsed.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| var(key).filter(|value| !value.trim().is_empty());

        let rates = match non_empty("RATES_PATH") {
            Some(path) => {
                let rates = load_rates_file(Path::new(&path))?;
                tracing::info!(path = %path, "Loaded rate table from file");
                rates
            }
            None => {
                tracing::debug!("RATES_PATH not set, using default rate table");
                RateTable::default()
            }
        };

        Ok(Self {
            dataset_path: non_empty("DATASET_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH), PathBuf::from),
            report_path: non_empty("REPORT_PATH").map(PathBuf::from),
            rates,
        })
    }

    /// Set the dataset path.
    #[must_use]
    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }

    /// Set the report path.
    #[must_use]
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Set the rate table.
    #[must_use]
    pub fn with_rates(mut self, rates: RateTable) -> Self {
        self.rates = rates;
        self
    }
}

/// Load a rate table from a JSON file.
fn load_rates_file(path: &Path) -> Result<RateTable> {
    let contents = std::fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?;
    let rates: RateTable = serde_json::from_str(&contents)?;

    if rates.has_negative_rate() {
        return Err(DriverError::Configuration(format!(
            "per-minute rates must not be negative in {}",
            path.display()
        )));
    }

    Ok(rates)
}
