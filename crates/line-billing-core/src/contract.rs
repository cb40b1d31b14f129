//! Phone-line contracts for line-billing.
//!
//! A [`Contract`] holds the per-line lifecycle shared by every pricing
//! policy: it owns the current month's [`Bill`], bills calls into it and
//! computes the settlement owed when the line is closed. The pricing rules
//! themselves live in the closed set of [`Policy`] variants.
//!
//! # Lifecycle
//!
//! 1. [`Contract::new_month`] hands the contract a fresh bill and charges the
//!    policy's monthly fixed cost. It is not idempotent: calling it twice for
//!    the same month charges the fixed cost twice.
//! 2. [`Contract::bill_call`] adds each call placed that month.
//! 3. [`Contract::cancel_contract`] closes the line and returns the one-time
//!    settlement. The month's bill is unaffected by the settlement.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Bill, Call, ContractError, RateTable, Result};

/// Pricing policy of a contract, without its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    /// Fixed term with a deposit and monthly free minutes.
    Term,

    /// Month-to-month with a higher fee and a lower per-minute rate.
    MonthToMonth,

    /// Prepaid balance carried from month to month.
    Prepaid,
}

impl ContractKind {
    /// Label recorded on bills for this policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Term => "TERM",
            Self::MonthToMonth => "MTM",
            Self::Prepaid => "PREPAID",
        }
    }
}

impl std::fmt::Display for ContractKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pricing policy of a contract and the state it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Policy {
    /// Term contract.
    Term {
        /// Contractual end date; `None` for an indefinite term.
        end: Option<NaiveDate>,
        /// Free minutes available each month.
        free_minutes: u64,
    },

    /// Month-to-month contract.
    MonthToMonth,

    /// Prepaid contract.
    Prepaid {
        /// Remaining credit in mills. Negative means the customer owes money.
        balance_mills: i64,
    },
}

impl Policy {
    /// The kind of this policy.
    #[must_use]
    pub const fn kind(&self) -> ContractKind {
        match self {
            Self::Term { .. } => ContractKind::Term,
            Self::MonthToMonth => ContractKind::MonthToMonth,
            Self::Prepaid { .. } => ContractKind::Prepaid,
        }
    }
}

/// A contract for one phone line.
#[derive(Debug, Clone)]
pub struct Contract {
    /// Activation date; cleared on cancellation.
    start: Option<NaiveDate>,

    /// Bill for the current month.
    bill: Option<Bill>,

    rates: RateTable,

    policy: Policy,
}

impl Contract {
    /// Create a term contract running from `start` to `end`.
    #[must_use]
    pub fn term(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        let rates = RateTable::default();
        Self::new(
            start,
            Policy::Term {
                end,
                free_minutes: u64::from(rates.term_free_minutes),
            },
        )
    }

    /// Create a month-to-month contract starting on `start`.
    #[must_use]
    pub fn month_to_month(start: NaiveDate) -> Self {
        Self::new(start, Policy::MonthToMonth)
    }

    /// Create a prepaid contract starting on `start` with `balance_mills` credit.
    #[must_use]
    pub fn prepaid(start: NaiveDate, balance_mills: i64) -> Self {
        Self::new(start, Policy::Prepaid { balance_mills })
    }

    fn new(start: NaiveDate, policy: Policy) -> Self {
        Self {
            start: Some(start),
            bill: None,
            rates: RateTable::default(),
            policy,
        }
    }

    /// Use `rates` instead of the default rate table.
    ///
    /// A term contract's monthly free minutes are re-initialized from the table.
    #[must_use]
    pub fn with_rates(mut self, rates: RateTable) -> Self {
        if let Policy::Term { free_minutes, .. } = &mut self.policy {
            *free_minutes = u64::from(rates.term_free_minutes);
        }
        self.rates = rates;
        self
    }

    /// Start a new month with a freshly created `bill`.
    ///
    /// Charges the policy's fixed costs and sets its per-minute rate on the
    /// bill, then keeps it as the current bill. Returns the bill it replaces.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Cancelled` if the contract was cancelled.
    pub fn new_month(&mut self, month: u32, year: i32, mut bill: Bill) -> Result<Option<Bill>> {
        let start = self.start.ok_or(ContractError::Cancelled)?;
        let rates = &self.rates;

        match &mut self.policy {
            Policy::Term { .. } => {
                if month == start.month() && year == start.year() {
                    bill.add_fixed_cost(rates.term_deposit_mills);
                }
                bill.add_fixed_cost(rates.term_monthly_fee_mills);
                bill.set_rates(ContractKind::Term.as_str(), rates.term_minute_rate_mills);
            }
            Policy::MonthToMonth => {
                bill.add_fixed_cost(rates.mtm_monthly_fee_mills);
                bill.set_rates(ContractKind::MonthToMonth.as_str(), rates.mtm_minute_rate_mills);
            }
            Policy::Prepaid { balance_mills } => {
                // Last month's usage is settled against the balance before carry-over.
                if let Some(previous) = &self.bill {
                    *balance_mills -= previous.usage_cost();
                }
                bill.add_fixed_cost(-*balance_mills);

                if *balance_mills < rates.top_up_threshold_mills {
                    *balance_mills += rates.top_up_amount_mills;
                    tracing::info!(balance_mills = *balance_mills, "Prepaid balance topped up");
                }
                bill.set_rates(
                    ContractKind::Prepaid.as_str(),
                    rates.prepaid_minute_rate_mills,
                );
            }
        }

        tracing::debug!(
            kind = %self.policy.kind(),
            month,
            year,
            fixed_cost_mills = bill.fixed_cost_mills,
            "New month started"
        );

        Ok(self.bill.replace(bill))
    }

    /// Add `call` to the current bill.
    ///
    /// Minutes are the call duration rounded up. A term contract draws them
    /// from its monthly free-minute pool first; when a call is longer than
    /// the pool's remaining capacity, the remainder of that call is billed.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Cancelled` if the contract was cancelled, or
    /// `ContractError::NoActiveBill` if no month has been started.
    pub fn bill_call(&mut self, call: &Call) -> Result<()> {
        if self.start.is_none() {
            return Err(ContractError::Cancelled);
        }
        let bill = self.bill.as_mut().ok_or(ContractError::NoActiveBill)?;
        let minutes = call.billed_minutes();

        match &self.policy {
            Policy::Term { free_minutes, .. } if bill.free_min < *free_minutes => {
                let free = (*free_minutes - bill.free_min).min(minutes);
                bill.add_free_minutes(free);
                if minutes > free {
                    bill.add_billed_minutes(minutes - free);
                }
            }
            _ => bill.add_billed_minutes(minutes),
        }

        tracing::debug!(
            src = %call.src_number,
            duration = call.duration,
            minutes,
            free_min = bill.free_min,
            billed_min = bill.billed_min,
            "Call billed"
        );

        Ok(())
    }

    /// Cancel the contract as of today's local date.
    ///
    /// See [`Contract::cancel_contract_at`].
    ///
    /// # Errors
    ///
    /// Same as [`Contract::cancel_contract_at`].
    pub fn cancel_contract(&mut self) -> Result<i64> {
        self.cancel_contract_at(Local::now().date_naive())
    }

    /// Cancel the contract as of `today` and return the settlement in mills.
    ///
    /// - Month-to-month: the current bill's total.
    /// - Term: if the end date is strictly before `today`, the deposit is
    ///   refunded less the last monthly fee (a negative amount); otherwise
    ///   the deposit is forfeited and the settlement is zero.
    /// - Prepaid: remaining credit is refunded; debt is forgiven.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Cancelled` if the contract was already
    /// cancelled, or `ContractError::NoActiveBill` if no month has been
    /// started. The contract is unchanged on error.
    pub fn cancel_contract_at(&mut self, today: NaiveDate) -> Result<i64> {
        if self.start.is_none() {
            return Err(ContractError::Cancelled);
        }
        let bill = self.bill.as_ref().ok_or(ContractError::NoActiveBill)?;

        let settlement = match &self.policy {
            Policy::Term { end, .. } => {
                if end.is_some_and(|end| end < today) {
                    self.rates.term_refund()
                } else {
                    0
                }
            }
            Policy::MonthToMonth => bill.get_cost(),
            Policy::Prepaid { balance_mills } => (*balance_mills).max(0),
        };

        self.start = None;
        tracing::info!(
            kind = %self.policy.kind(),
            %today,
            settlement_mills = settlement,
            "Contract cancelled"
        );

        Ok(settlement)
    }

    /// Activation date, or `None` once cancelled.
    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Whether the contract is still active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// The current month's bill, if a month has been started.
    #[must_use]
    pub const fn bill(&self) -> Option<&Bill> {
        self.bill.as_ref()
    }

    /// Remove and return the current bill.
    pub fn take_bill(&mut self) -> Option<Bill> {
        self.bill.take()
    }

    /// Pricing policy and its state.
    #[must_use]
    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Kind of pricing policy.
    #[must_use]
    pub const fn kind(&self) -> ContractKind {
        self.policy.kind()
    }

    /// Rate table in use.
    #[must_use]
    pub const fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Prepaid balance in mills; `None` for other policies.
    #[must_use]
    pub const fn balance(&self) -> Option<i64> {
        match self.policy {
            Policy::Prepaid { balance_mills } => Some(balance_mills),
            _ => None,
        }
    }

    /// Term end date; `None` for other policies or an indefinite term.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        match self.policy {
            Policy::Term { end, .. } => end,
            _ => None,
        }
    }

    /// Monthly free minutes of a term contract; `None` for other policies.
    #[must_use]
    pub const fn free_minutes(&self) -> Option<u64> {
        match self.policy {
            Policy::Term { free_minutes, .. } => Some(free_minutes),
            _ => None,
        }
    }
}
