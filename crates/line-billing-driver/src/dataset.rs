//! Call-record datasets.
//!
//! A dataset is a JSON document listing phone lines with their contracts,
//! the calls placed between them, and the dates lines are cancelled on:
//!
//! ```json
//! {
//!   "lines": [
//!     { "number": "867-5309",
//!       "contract": { "type": "term", "start": "2024-01-01", "end": "2024-12-31" } },
//!     { "number": "555-0100",
//!       "contract": { "type": "prepaid", "start": "2024-01-01", "balance_mills": 25000 } }
//!   ],
//!   "calls": [
//!     { "src_number": "867-5309", "dst_number": "555-0100",
//!       "time": "2024-01-05T10:00:00", "duration": 90 }
//!   ],
//!   "cancellations": [
//!     { "number": "867-5309", "date": "2024-01-31" }
//!   ]
//! }
//! ```

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use line_billing_core::{Call, Contract, PhoneNumber, RateTable};

use crate::{DriverError, Result};

/// A full dataset: lines, calls and cancellations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Phone lines and their contracts.
    pub lines: Vec<LineRecord>,

    /// Calls placed between lines, in any order.
    #[serde(default)]
    pub calls: Vec<Call>,

    /// Lines to close, and when.
    #[serde(default)]
    pub cancellations: Vec<CancellationRecord>,
}

impl Dataset {
    /// Parse a dataset from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid dataset.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid dataset.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?;
        let dataset = Self::from_json(&contents)?;
        tracing::info!(
            path = %path.display(),
            lines = dataset.lines.len(),
            calls = dataset.calls.len(),
            cancellations = dataset.cancellations.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }
}

/// A phone line and the contract it is signed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    /// The line's number.
    pub number: PhoneNumber,

    /// The line's contract.
    pub contract: ContractRecord,
}

/// Contract terms as written in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ContractRecord {
    /// A term contract.
    Term {
        /// Activation date.
        start: NaiveDate,
        /// End of the term; absent for an indefinite term.
        #[serde(default)]
        end: Option<NaiveDate>,
    },

    /// A month-to-month contract.
    Mtm {
        /// Activation date.
        start: NaiveDate,
    },

    /// A prepaid contract.
    Prepaid {
        /// Activation date.
        start: NaiveDate,
        /// Opening credit in mills.
        balance_mills: i64,
    },
}

impl ContractRecord {
    /// Activation date.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        match self {
            Self::Term { start, .. } | Self::Mtm { start } | Self::Prepaid { start, .. } => *start,
        }
    }

    /// Build the contract these terms describe, priced with `rates`.
    #[must_use]
    pub fn build(&self, rates: RateTable) -> Contract {
        let contract = match *self {
            Self::Term { start, end } => Contract::term(start, end),
            Self::Mtm { start } => Contract::month_to_month(start),
            Self::Prepaid {
                start,
                balance_mills,
            } => Contract::prepaid(start, balance_mills),
        };
        contract.with_rates(rates)
    }
}

/// A request to close a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationRecord {
    /// The line to close.
    pub number: PhoneNumber,

    /// Cancellation date. Its month is the month the line is closed in, and
    /// it is the "today" a term contract's end date is compared against.
    pub date: NaiveDate,
}

impl CancellationRecord {
    /// `(year, month)` the cancellation falls in.
    #[must_use]
    pub fn period(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}
