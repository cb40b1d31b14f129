//! Core types for line-billing.
//!
//! This crate provides the contract policies and the monthly bookkeeping they drive:
//!
//! - **Rates**: `RateTable`, the fee and per-minute rate constants
//! - **Calls**: `Call`, a placed call with its duration in seconds
//! - **Bills**: `Bill`, `BillSummary`
//! - **Contracts**: `Contract`, `ContractKind`, `Policy`
//! - **Identifiers**: `PhoneNumber`
//!
//! # Lifecycle
//!
//! A driver advances time month by month. Each month it hands every active
//! contract a fresh [`Bill`] through [`Contract::new_month`], bills the calls
//! placed that month with [`Contract::bill_call`], and eventually closes the
//! line with [`Contract::cancel_contract`], which returns the one-time
//! settlement for closing the line.
//!
//! # Amounts
//!
//! Amounts are `i64` mills (thousandths of a dollar), so the prepaid rate of
//! $0.025 per minute and every balance derived from it are exact. Use
//! [`format_mills`] to render an amount as dollars.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bill;
pub mod call;
pub mod contract;
pub mod error;
pub mod ids;
pub mod rates;

pub use bill::{Bill, BillSummary};
pub use call::{billed_minutes, Call};
pub use contract::{Contract, ContractKind, Policy};
pub use error::{ContractError, Result};
pub use ids::{IdError, PhoneNumber};
pub use rates::{
    format_mills, RateTable, MILLS_PER_DOLLAR, MTM_MINS_COST, MTM_MONTHLY_FEE, PREPAID_MINS_COST, TERM_DEPOSIT, TERM_MINS,
    TERM_MINS_COST, TERM_MONTHLY_FEE, TOP_UP_AMOUNT, TOP_UP_THRESHOLD,
};
