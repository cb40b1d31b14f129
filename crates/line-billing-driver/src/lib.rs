//! Billing driver for line-billing.
//!
//! This crate feeds call-record datasets through the contracts in
//! `line-billing-core`:
//!
//! - **Configuration**: `DriverConfig`, loaded from the environment
//! - **Datasets**: `Dataset`, the JSON lines/calls/cancellations document
//! - **Lines**: `PhoneLine`, a contract plus its bill history
//! - **Driver**: `BillingDriver`, which advances the lines month by month
//! - **Reports**: `Report`, the per-line bills and settlements
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use line_billing_core::{format_mills, RateTable};
//! use line_billing_driver::{run_dataset, Dataset};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = Dataset::load(Path::new("dataset.json"))?;
//! let report = run_dataset(&dataset, RateTable::default())?;
//! println!("Total billed: {}", format_mills(report.grand_total()));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod line;
pub mod report;

pub use config::DriverConfig;
pub use dataset::{CancellationRecord, ContractRecord, Dataset, LineRecord};
pub use driver::{run_dataset, BillingDriver};
pub use error::{DriverError, Result};
pub use line::PhoneLine;
pub use report::{LineReport, Report};
