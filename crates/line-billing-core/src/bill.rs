//! Monthly bills for line-billing.
//!
//! A [`Bill`] is the running total for one phone line for one month. The
//! contract configures it at the start of the month and adds minutes to it
//! as calls are billed. Amounts are in mills.

use serde::{Deserialize, Serialize};

/// The running total for one phone line for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    /// Month this bill covers (1-12).
    pub month: u32,

    /// Year this bill covers.
    pub year: i32,

    /// Policy label set by the contract (`TERM`, `MTM`, `PREPAID`).
    pub billing_type: String,

    /// Per-minute rate applied to billed minutes.
    pub min_rate_mills: i64,

    /// Flat charges for the month. Negative when prepaid credit is carried in.
    pub fixed_cost_mills: i64,

    /// Free minutes consumed so far this month.
    pub free_min: u64,

    /// Minutes billed at `min_rate_mills` so far this month.
    pub billed_min: u64,
}

impl Bill {
    /// Create an empty bill for `month`/`year`.
    #[must_use]
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            billing_type: String::new(),
            min_rate_mills: 0,
            fixed_cost_mills: 0,
            free_min: 0,
            billed_min: 0,
        }
    }

    /// Increase (or, with a negative amount, decrease) the month's flat charge.
    pub fn add_fixed_cost(&mut self, amount_mills: i64) {
        self.fixed_cost_mills += amount_mills;
    }

    /// Record the policy label and per-minute rate for this month.
    pub fn set_rates(&mut self, kind: impl Into<String>, per_minute_rate_mills: i64) {
        self.billing_type = kind.into();
        self.min_rate_mills = per_minute_rate_mills;
    }

    /// Record `minutes` drawn from a free-minute pool.
    pub fn add_free_minutes(&mut self, minutes: u64) {
        self.free_min += minutes;
    }

    /// Record `minutes` billed at the current per-minute rate.
    pub fn add_billed_minutes(&mut self, minutes: u64) {
        self.billed_min += minutes;
    }

    /// Cost of the billed minutes alone.
    #[must_use]
    pub fn usage_cost(&self) -> i64 {
        i64::try_from(self.billed_min)
            .unwrap_or(i64::MAX)
            .saturating_mul(self.min_rate_mills)
    }

    /// Total owed for the month: fixed cost plus billed minutes at the rate.
    #[must_use]
    pub fn get_cost(&self) -> i64 {
        self.fixed_cost_mills.saturating_add(self.usage_cost())
    }

    /// Snapshot of this bill for reporting.
    #[must_use]
    pub fn summary(&self) -> BillSummary {
        BillSummary {
            month: self.month,
            year: self.year,
            billing_type: self.billing_type.clone(),
            min_rate_mills: self.min_rate_mills,
            fixed_cost_mills: self.fixed_cost_mills,
            free_min: self.free_min,
            billed_min: self.billed_min,
            total_mills: self.get_cost(),
        }
    }
}

/// A reporting snapshot of a [`Bill`], including its total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSummary {
    /// Month covered (1-12).
    pub month: u32,
    /// Year covered.
    pub year: i32,
    /// Policy label.
    pub billing_type: String,
    /// Per-minute rate.
    pub min_rate_mills: i64,
    /// Flat charges.
    pub fixed_cost_mills: i64,
    /// Free minutes consumed.
    pub free_min: u64,
    /// Minutes billed.
    pub billed_min: u64,
    /// Total owed for the month.
    pub total_mills: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bill_is_empty() {
        let bill = Bill::new(1, 2024);
        assert_eq!(bill.free_min, 0);
        assert_eq!(bill.billed_min, 0);
        assert_eq!(bill.get_cost(), 0);
    }

    #[test]
    fn cost_is_fixed_plus_billed_minutes() {
        let mut bill = Bill::new(1, 2024);
        bill.set_rates("MTM", 50);
        bill.add_fixed_cost(50_000);
        bill.add_billed_minutes(10);
        bill.add_free_minutes(7);

        assert_eq!(bill.usage_cost(), 500);
        assert_eq!(bill.get_cost(), 50_500);
        assert_eq!(bill.free_min, 7);
    }

    #[test]
    fn prepaid_rate_is_exact() {
        let mut bill = Bill::new(1, 2024);
        bill.set_rates("PREPAID", 25);
        bill.add_billed_minutes(408);
        assert_eq!(bill.usage_cost(), 10_200);
    }

    #[test]
    fn negative_fixed_cost_reduces_total() {
        let mut bill = Bill::new(2, 2024);
        bill.add_fixed_cost(-12_500);
        assert_eq!(bill.get_cost(), -12_500);
    }

    #[test]
    fn summary_carries_total() {
        let mut bill = Bill::new(5, 2024);
        bill.set_rates("TERM", 100);
        bill.add_fixed_cost(20_000);
        bill.add_billed_minutes(3);

        let summary = bill.summary();
        assert_eq!(summary.billing_type, "TERM");
        assert_eq!(summary.month, 5);
        assert_eq!(summary.total_mills, 20_300);
    }
}
