//! Month-by-month billing driver.
//!
//! The driver owns every [`PhoneLine`] and advances time one month at a
//! time: each month it starts a fresh bill on every active line, then
//! replays that month's calls and cancellations in date order. A
//! cancellation takes effect at the end of its day, so calls placed later
//! than that day are not billed to the closed line.

use std::collections::BTreeMap;

use chrono::Datelike;

use line_billing_core::{Call, Contract, PhoneNumber, RateTable};

use crate::dataset::{CancellationRecord, Dataset};
use crate::report::{LineReport, Report};
use crate::{DriverError, PhoneLine, Result};

/// Drives contracts through months of calls and cancellations.
#[derive(Debug, Clone, Default)]
pub struct BillingDriver {
    rates: RateTable,
    lines: BTreeMap<PhoneNumber, PhoneLine>,
}

impl BillingDriver {
    /// Create a driver with no lines, pricing contracts with `rates`.
    #[must_use]
    pub fn new(rates: RateTable) -> Self {
        Self {
            rates,
            lines: BTreeMap::new(),
        }
    }

    /// Create a driver holding every line in `dataset`.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::DuplicateLine` if two lines share a number.
    pub fn from_dataset(dataset: &Dataset, rates: RateTable) -> Result<Self> {
        let mut driver = Self::new(rates);
        for record in &dataset.lines {
            let contract = record.contract.build(driver.rates);
            driver.add_line(record.number.clone(), contract)?;
        }
        Ok(driver)
    }

    /// Add a line signed under `contract`.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::DuplicateLine` if the number is already in use.
    pub fn add_line(&mut self, number: PhoneNumber, contract: Contract) -> Result<()> {
        if self.lines.contains_key(&number) {
            return Err(DriverError::DuplicateLine(number));
        }
        tracing::debug!(number = %number, kind = %contract.kind(), "Line added");
        self.lines
            .insert(number.clone(), PhoneLine::new(number, contract));
        Ok(())
    }

    /// Look up a line by number.
    #[must_use]
    pub fn line(&self, number: &PhoneNumber) -> Option<&PhoneLine> {
        self.lines.get(number)
    }

    /// Start `month`/`year` on every active line whose contract has started.
    ///
    /// Returns the number of lines billed this month.
    ///
    /// # Errors
    ///
    /// Returns an error if a contract rejects the new month.
    pub fn start_month(&mut self, month: u32, year: i32) -> Result<usize> {
        let mut started = 0;
        for line in self.lines.values_mut() {
            if line.contract().is_active() && line.has_started_by(month, year) {
                line.new_month(month, year)?;
                started += 1;
            }
        }
        tracing::info!(month, year, lines = started, "Month started");
        Ok(started)
    }

    /// Bill `call` to the line it was placed from.
    ///
    /// Returns `false` when the call is skipped because its line is unknown
    /// or is not being billed for the month the call was placed in.
    ///
    /// # Errors
    ///
    /// Returns an error if the contract rejects the call.
    pub fn bill_call(&mut self, call: &Call) -> Result<bool> {
        let Some(line) = self.lines.get_mut(&call.src_number) else {
            tracing::warn!(src = %call.src_number, "Call from unknown line skipped");
            return Ok(false);
        };

        if !line.is_billing(call.month(), call.year()) {
            tracing::warn!(
                src = %call.src_number,
                time = %call.time,
                "Call outside the line's active month skipped"
            );
            return Ok(false);
        }

        line.make_call(call)?;
        Ok(true)
    }

    /// Cancel the line named by `record` and return its settlement in mills.
    ///
    /// Returns `None` when the cancellation is skipped because the line has
    /// not been billed for any month yet.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::UnknownLine` for an unknown number, or an error
    /// if the contract cannot be cancelled.
    pub fn cancel(&mut self, record: &CancellationRecord) -> Result<Option<i64>> {
        let line = self
            .lines
            .get_mut(&record.number)
            .ok_or_else(|| DriverError::UnknownLine(record.number.clone()))?;

        if line.contract().is_active() && line.contract().bill().is_none() {
            tracing::warn!(
                number = %record.number,
                date = %record.date,
                "Cancellation before the line started skipped"
            );
            return Ok(None);
        }

        let settlement = line.cancel(record.date)?;
        tracing::info!(
            number = %record.number,
            date = %record.date,
            settlement_mills = settlement,
            "Line cancelled"
        );
        Ok(Some(settlement))
    }

    /// Bill every month from the earliest contract start or call through the
    /// latest call or cancellation, then report.
    ///
    /// Within a month, calls and cancellations are applied in date order. A
    /// cancellation comes after every call placed on or before its date.
    ///
    /// # Errors
    ///
    /// Returns an error if any contract rejects an operation.
    pub fn run(&mut self, calls: &[Call], cancellations: &[CancellationRecord]) -> Result<Report> {
        let mut calls: Vec<&Call> = calls.iter().collect();
        calls.sort_by_key(|call| call.time);
        let mut cancellations: Vec<&CancellationRecord> = cancellations.iter().collect();
        cancellations.sort_by_key(|record| record.date);

        let Some((first, last)) = self.period_range(&calls, &cancellations) else {
            tracing::info!("Nothing to bill");
            return Ok(self.report());
        };

        let mut calls = calls.into_iter().peekable();
        let mut cancellations = cancellations.into_iter().peekable();
        let mut skipped = 0_usize;
        let (mut year, mut month) = first;

        while (year, month) <= last {
            self.start_month(month, year)?;

            while let Some(call) = calls.next_if(|call| (call.year(), call.month()) <= (year, month)) {
                while let Some(record) = cancellations.next_if(|record| record.date < call.time.date()) {
                    if self.cancel(record)?.is_none() {
                        skipped += 1;
                    }
                }
                if !self.bill_call(call)? {
                    skipped += 1;
                }
            }

            while let Some(record) = cancellations.next_if(|record| record.period() <= (year, month)) {
                if self.cancel(record)?.is_none() {
                    skipped += 1;
                }
            }

            (year, month) = next_month(year, month);
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Some records were not applied");
        }

        Ok(self.report())
    }

    /// Snapshot of every line's bills and settlement.
    #[must_use]
    pub fn report(&self) -> Report {
        Report {
            lines: self.lines.values().map(LineReport::from).collect(),
        }
    }

    /// First and last `(year, month)` to bill, or `None` with nothing to bill.
    fn period_range(
        &self,
        calls: &[&Call],
        cancellations: &[&CancellationRecord],
    ) -> Option<((i32, u32), (i32, u32))> {
        let starts = self
            .lines
            .values()
            .filter_map(|line| line.contract().start())
            .map(|start| (start.year(), start.month()));
        let call_periods = calls.iter().map(|call| (call.year(), call.month()));

        let first = starts.chain(call_periods.clone()).min()?;
        let last = call_periods
            .chain(cancellations.iter().map(|record| record.period()))
            .max()
            .map_or(first, |last| last.max(first));

        Some((first, last))
    }
}

/// Bill every month of `dataset` with `rates`.
///
/// # Errors
///
/// Returns an error if the dataset has duplicate lines, cancels an unknown
/// line, or drives a contract out of order.
pub fn run_dataset(dataset: &Dataset, rates: RateTable) -> Result<Report> {
    let mut driver = BillingDriver::from_dataset(dataset, rates)?;
    driver.run(&dataset.calls, &dataset.cancellations)
}

/// The `(year, month)` after `month` of `year`.
const fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn number(s: &str) -> PhoneNumber {
        s.parse().unwrap()
    }

    fn call(src: &str, year: i32, month: u32, duration: u64) -> Call {
        Call::new(
            number(src),
            number("999-9999"),
            date(year, month, 2).and_hms_opt(8, 0, 0).unwrap(),
            duration,
        )
    }

    #[test]
    fn next_month_wraps_year() {
        assert_eq!(next_month(2024, 1), (2024, 2));
        assert_eq!(next_month(2024, 12), (2025, 1));
    }

    #[test]
    fn duplicate_lines_are_rejected() {
        let mut driver = BillingDriver::default();
        driver
            .add_line(number("555-0100"), Contract::month_to_month(date(2024, 1, 1)))
            .unwrap();
        let err = driver
            .add_line(number("555-0100"), Contract::month_to_month(date(2024, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, DriverError::DuplicateLine(_)));
    }

    #[test]
    fn lines_start_billing_in_their_start_month() {
        let mut driver = BillingDriver::default();
        driver
            .add_line(number("555-0100"), Contract::month_to_month(date(2024, 1, 1)))
            .unwrap();
        driver
            .add_line(number("555-0200"), Contract::month_to_month(date(2024, 3, 1)))
            .unwrap();

        let report = driver
            .run(&[call("555-0200", 2024, 3, 60)], &[])
            .unwrap();

        assert_eq!(report.line(&number("555-0100")).unwrap().bills.len(), 3);
        let late = report.line(&number("555-0200")).unwrap();
        assert_eq!(late.bills.len(), 1);
        assert_eq!(late.bills[0].billed_min, 1);
    }

    #[test]
    fn calls_from_unknown_lines_are_skipped() {
        let mut driver = BillingDriver::default();
        driver
            .add_line(number("555-0100"), Contract::month_to_month(date(2024, 1, 1)))
            .unwrap();
        assert!(!driver.bill_call(&call("555-0300", 2024, 1, 60)).unwrap());
    }

    #[test]
    fn cancelling_unknown_line_fails() {
        let mut driver = BillingDriver::default();
        let record = CancellationRecord {
            number: number("555-0300"),
            date: date(2024, 1, 31),
        };
        assert!(matches!(
            driver.cancel(&record),
            Err(DriverError::UnknownLine(_))
        ));
    }

    #[test]
    fn cancelled_lines_stop_receiving_bills() {
        let mut driver = BillingDriver::default();
        driver
            .add_line(number("555-0100"), Contract::month_to_month(date(2024, 1, 1)))
            .unwrap();

        let report = driver
            .run(
                &[call("555-0100", 2024, 3, 60)],
                &[CancellationRecord {
                    number: number("555-0100"),
                    date: date(2024, 1, 31),
                }],
            )
            .unwrap();

        let line = report.line(&number("555-0100")).unwrap();
        assert!(!line.active);
        assert_eq!(line.bills.len(), 1);
        assert_eq!(line.settlement_mills, Some(50_000));
    }

    #[test]
    fn cancellation_before_line_starts_is_skipped() {
        let mut driver = BillingDriver::default();
        driver
            .add_line(number("555-0100"), Contract::month_to_month(date(2024, 1, 1)))
            .unwrap();
        driver
            .add_line(number("555-0200"), Contract::month_to_month(date(2024, 3, 1)))
            .unwrap();

        let early = CancellationRecord {
            number: number("555-0200"),
            date: date(2024, 1, 15),
        };
        let report = driver
            .run(&[call("555-0200", 2024, 3, 60)], &[early])
            .unwrap();

        assert_eq!(report.line(&number("555-0100")).unwrap().bills.len(), 3);
        let late = report.line(&number("555-0200")).unwrap();
        assert!(late.active);
        assert!(late.settlement_mills.is_none());
        assert_eq!(late.bills.len(), 1);
        assert_eq!(late.bills[0].billed_min, 1);
    }

    #[test]
    fn calls_after_cancellation_date_are_not_billed() {
        let mut driver = BillingDriver::default();
        driver
            .add_line(number("555-0100"), Contract::month_to_month(date(2024, 1, 1)))
            .unwrap();

        let at = |day: u32| date(2024, 1, day).and_hms_opt(9, 0, 0).unwrap();
        let calls = [
            Call::new(number("555-0100"), number("999-9999"), at(10), 120),
            Call::new(number("555-0100"), number("999-9999"), at(25), 600),
        ];
        let cancellation = CancellationRecord {
            number: number("555-0100"),
            date: date(2024, 1, 10),
        };

        let report = driver.run(&calls, &[cancellation]).unwrap();
        let line = report.line(&number("555-0100")).unwrap();

        // The call on the cancellation date is billed, the later one is not.
        assert_eq!(line.bills.len(), 1);
        assert_eq!(line.bills[0].billed_min, 2);
        assert_eq!(line.settlement_mills, Some(50_000 + 100));
    }

    #[test]
    fn empty_driver_reports_nothing() {
        let mut driver = BillingDriver::default();
        let report = driver.run(&[], &[]).unwrap();
        assert!(report.lines.is_empty());
    }
}
