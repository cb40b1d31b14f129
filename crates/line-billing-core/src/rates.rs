//! Fee and rate table for line-billing.
//!
//! Every contract policy reads its fees and rates from one [`RateTable`],
//! so the table can be audited, overridden from configuration and tested
//! on its own.
//!
//! Amounts are integer mills (thousandths of a dollar). The prepaid rate of
//! $0.025 per minute is 25 mills, so every fee, rate and balance is exact.

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Mills in one dollar.
pub const MILLS_PER_DOLLAR: i64 = 1_000;

/// Month-to-month monthly fee in mills ($50).
pub const MTM_MONTHLY_FEE: i64 = 50_000;

/// Term monthly fee in mills ($20).
pub const TERM_MONTHLY_FEE: i64 = 20_000;

/// Term deposit charged on the first month, in mills ($300).
pub const TERM_DEPOSIT: i64 = 300_000;

/// Free minutes included with a term contract each month.
pub const TERM_MINS: u32 = 100;

/// Month-to-month cost per minute in mills ($0.05).
pub const MTM_MINS_COST: i64 = 50;

/// Term cost per minute in mills ($0.10).
pub const TERM_MINS_COST: i64 = 100;

/// Prepaid cost per minute in mills ($0.025).
pub const PREPAID_MINS_COST: i64 = 25;

/// Prepaid balance below which a top-up is applied, in mills (-$10).
pub const TOP_UP_THRESHOLD: i64 = -10_000;

/// Prepaid top-up credit in mills ($25).
pub const TOP_UP_AMOUNT: i64 = 25_000;

/// Fees and per-minute rates for every contract policy, in mills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    /// Term monthly fee.
    pub term_monthly_fee_mills: i64,

    /// Term deposit, charged on the month the contract starts.
    pub term_deposit_mills: i64,

    /// Term per-minute rate.
    pub term_minute_rate_mills: i64,

    /// Free minutes per month on a term contract.
    pub term_free_minutes: u32,

    /// Month-to-month monthly fee.
    pub mtm_monthly_fee_mills: i64,

    /// Month-to-month per-minute rate.
    pub mtm_minute_rate_mills: i64,

    /// Prepaid per-minute rate.
    pub prepaid_minute_rate_mills: i64,

    /// A prepaid balance strictly below this is topped up.
    pub top_up_threshold_mills: i64,

    /// Credit added by a prepaid top-up.
    pub top_up_amount_mills: i64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            term_monthly_fee_mills: TERM_MONTHLY_FEE,
            term_deposit_mills: TERM_DEPOSIT,
            term_minute_rate_mills: TERM_MINS_COST,
            term_free_minutes: TERM_MINS,
            mtm_monthly_fee_mills: MTM_MONTHLY_FEE,
            mtm_minute_rate_mills: MTM_MINS_COST,
            prepaid_minute_rate_mills: PREPAID_MINS_COST,
            top_up_threshold_mills: TOP_UP_THRESHOLD,
            top_up_amount_mills: TOP_UP_AMOUNT,
        }
    }
}

impl RateTable {
    /// Settlement for closing a term contract after its end date.
    ///
    /// The deposit is returned, less the last monthly fee. Negative means
    /// money goes back to the customer.
    #[must_use]
    pub const fn term_refund(&self) -> i64 {
        self.term_monthly_fee_mills - self.term_deposit_mills
    }

    /// Whether any per-minute rate is negative.
    #[must_use]
    pub const fn has_negative_rate(&self) -> bool {
        self.term_minute_rate_mills < 0
            || self.mtm_minute_rate_mills < 0
            || self.prepaid_minute_rate_mills < 0
    }
}

/// Format `mills` as dollars with three decimal places, e.g. `-$280.000`.
#[must_use]
pub fn format_mills(mills: i64) -> String {
    let sign = if mills < 0 { "-" } else { "" };
    let abs = mills.unsigned_abs();
    let per_dollar = MILLS_PER_DOLLAR.unsigned_abs();
    format!("{sign}${}.{:03}", abs / per_dollar, abs % per_dollar)
}
