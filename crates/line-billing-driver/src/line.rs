//! Phone lines and their bill history.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use line_billing_core::{Bill, BillSummary, Call, Contract, ContractError, PhoneNumber};

use crate::{DriverError, Result};

/// One phone line: its number, its contract and every bill it has had.
#[derive(Debug, Clone)]
pub struct PhoneLine {
    number: PhoneNumber,
    contract: Contract,
    /// Bills the contract has handed back, keyed by `(year, month)`.
    history: BTreeMap<(i32, u32), Bill>,
    settlement_mills: Option<i64>,
}

impl PhoneLine {
    /// Create a line for `number` signed under `contract`.
    #[must_use]
    pub fn new(number: PhoneNumber, contract: Contract) -> Self {
        Self {
            number,
            contract,
            history: BTreeMap::new(),
            settlement_mills: None,
        }
    }

    /// Start `month`/`year` with a fresh bill, archiving the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the contract is cancelled.
    pub fn new_month(&mut self, month: u32, year: i32) -> Result<()> {
        let previous = self
            .contract
            .new_month(month, year, Bill::new(month, year))
            .map_err(|e| self.contract_error(e))?;

        if let Some(bill) = previous {
            self.history.insert((bill.year, bill.month), bill);
        }
        Ok(())
    }

    /// Bill an outgoing `call` to the current month.
    ///
    /// # Errors
    ///
    /// Returns an error if no month is active or the contract is cancelled.
    pub fn make_call(&mut self, call: &Call) -> Result<()> {
        self.contract
            .bill_call(call)
            .map_err(|e| self.contract_error(e))
    }

    /// Cancel the line as of `today` and return the settlement in mills.
    ///
    /// # Errors
    ///
    /// Returns an error if no month is active or the line is already cancelled.
    pub fn cancel(&mut self, today: NaiveDate) -> Result<i64> {
        let settlement = self
            .contract
            .cancel_contract_at(today)
            .map_err(|e| self.contract_error(e))?;

        if let Some(bill) = self.contract.take_bill() {
            self.history.insert((bill.year, bill.month), bill);
        }
        self.settlement_mills = Some(settlement);
        Ok(settlement)
    }

    /// Whether the line is active and its current bill is for `month`/`year`.
    #[must_use]
    pub fn is_billing(&self, month: u32, year: i32) -> bool {
        self.contract.is_active()
            && self
                .contract
                .bill()
                .is_some_and(|bill| bill.month == month && bill.year == year)
    }

    /// Whether the contract has started by `month`/`year`.
    #[must_use]
    pub fn has_started_by(&self, month: u32, year: i32) -> bool {
        self.contract
            .start()
            .is_some_and(|start| (start.year(), start.month()) <= (year, month))
    }

    /// The bill for `month`/`year`, current or archived.
    #[must_use]
    pub fn get_bill(&self, month: u32, year: i32) -> Option<&Bill> {
        self.contract
            .bill()
            .filter(|bill| bill.month == month && bill.year == year)
            .or_else(|| self.history.get(&(year, month)))
    }

    /// Summaries of every bill, oldest first.
    #[must_use]
    pub fn bill_summaries(&self) -> Vec<BillSummary> {
        let mut summaries: Vec<BillSummary> = self.history.values().map(Bill::summary).collect();
        if let Some(current) = self.contract.bill() {
            if !self.history.contains_key(&(current.year, current.month)) {
                summaries.push(current.summary());
            }
        }
        summaries
    }

    /// The line's number.
    #[must_use]
    pub const fn number(&self) -> &PhoneNumber {
        &self.number
    }

    /// The line's contract.
    #[must_use]
    pub const fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Settlement in mills recorded when the line was cancelled.
    #[must_use]
    pub const fn settlement(&self) -> Option<i64> {
        self.settlement_mills
    }

    fn contract_error(&self, source: ContractError) -> DriverError {
        DriverError::Contract {
            number: self.number.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn line(contract: Contract) -> PhoneLine {
        PhoneLine::new("867-5309".parse().unwrap(), contract)
    }

    fn call(month: u32, duration: u64) -> Call {
        Call::new(
            "867-5309".parse().unwrap(),
            "555-0100".parse().unwrap(),
            date(2024, month, 3).and_hms_opt(9, 0, 0).unwrap(),
            duration,
        )
    }

    #[test]
    fn archives_bills_month_by_month() {
        let mut line = line(Contract::month_to_month(date(2024, 1, 1)));
        line.new_month(1, 2024).unwrap();
        line.make_call(&call(1, 120)).unwrap();
        line.new_month(2, 2024).unwrap();

        assert_eq!(line.get_bill(1, 2024).unwrap().billed_min, 2);
        assert_eq!(line.get_bill(2, 2024).unwrap().billed_min, 0);
        assert!(line.get_bill(3, 2024).is_none());

        let summaries = line.bill_summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].month, 1);
        assert_eq!(summaries[1].month, 2);
    }

    #[test]
    fn cancel_archives_final_bill() {
        let mut line = line(Contract::term(date(2024, 1, 1), Some(date(2024, 12, 31))));
        line.new_month(1, 2024).unwrap();
        let settlement = line.cancel(date(2024, 1, 31)).unwrap();

        assert_eq!(settlement, 0);
        assert_eq!(line.settlement(), Some(0));
        assert!(!line.contract().is_active());
        assert_eq!(line.get_bill(1, 2024).unwrap().get_cost(), 320_000);
        assert_eq!(line.bill_summaries().len(), 1);
    }

    #[test]
    fn billing_window_tracks_current_month() {
        let mut line = line(Contract::month_to_month(date(2024, 2, 10)));
        assert!(!line.has_started_by(1, 2024));
        assert!(line.has_started_by(2, 2024));
        assert!(!line.is_billing(2, 2024));

        line.new_month(2, 2024).unwrap();
        assert!(line.is_billing(2, 2024));
        assert!(!line.is_billing(3, 2024));
    }

    #[test]
    fn contract_errors_name_the_line() {
        let mut line = line(Contract::month_to_month(date(2024, 1, 1)));
        let err = line.make_call(&call(1, 60)).unwrap_err();
        assert!(matches!(
            err,
            DriverError::Contract {
                source: ContractError::NoActiveBill,
                ..
            }
        ));
        assert!(err.to_string().contains("867-5309"));
    }
}
