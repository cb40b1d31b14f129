//! Billing reports.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use line_billing_core::{BillSummary, ContractKind, PhoneNumber};

use crate::{DriverError, PhoneLine, Result};

/// Result of a billing pass over a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// One entry per line, ordered by number.
    pub lines: Vec<LineReport>,
}

/// Bills and settlement for one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineReport {
    /// The line's number.
    pub number: PhoneNumber,

    /// Pricing policy.
    pub kind: ContractKind,

    /// Whether the line is still active.
    pub active: bool,

    /// Monthly bills, oldest first.
    pub bills: Vec<BillSummary>,

    /// One-time settlement in mills, if the line was cancelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_mills: Option<i64>,
}

impl From<&PhoneLine> for LineReport {
    fn from(line: &PhoneLine) -> Self {
        Self {
            number: line.number().clone(),
            kind: line.contract().kind(),
            active: line.contract().is_active(),
            bills: line.bill_summaries(),
            settlement_mills: line.settlement(),
        }
    }
}

impl Report {
    /// Find the report for `number`.
    #[must_use]
    pub fn line(&self, number: &PhoneNumber) -> Option<&LineReport> {
        self.lines.iter().find(|line| &line.number == number)
    }

    /// Sum in mills of every monthly bill plus every settlement.
    #[must_use]
    pub fn grand_total(&self) -> i64 {
        self.lines
            .iter()
            .map(|line| {
                line.bills.iter().map(|bill| bill.total_mills).sum::<i64>()
                    + line.settlement_mills.unwrap_or(0)
            })
            .sum()
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report to `path`, or to stdout when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_to(&self, path: Option<&Path>) -> Result<()> {
        let json = self.to_json()?;
        match path {
            Some(path) => {
                std::fs::write(path, json).map_err(|e| DriverError::io(path, e))?;
                tracing::info!(path = %path.display(), "Report written");
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{json}").map_err(|e| DriverError::io("<stdout>", e))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(total_mills: i64) -> BillSummary {
        BillSummary {
            month: 1,
            year: 2024,
            billing_type: "MTM".into(),
            min_rate_mills: 50,
            fixed_cost_mills: 50_000,
            free_min: 0,
            billed_min: 0,
            total_mills,
        }
    }

    fn report() -> Report {
        Report {
            lines: vec![
                LineReport {
                    number: "555-0100".parse().unwrap(),
                    kind: ContractKind::MonthToMonth,
                    active: true,
                    bills: vec![summary(50_000), summary(51_500)],
                    settlement_mills: None,
                },
                LineReport {
                    number: "867-5309".parse().unwrap(),
                    kind: ContractKind::Term,
                    active: false,
                    bills: vec![summary(320_000)],
                    settlement_mills: Some(-280_000),
                },
            ],
        }
    }

    #[test]
    fn grand_total_includes_settlements() {
        assert_eq!(
            report().grand_total(),
            50_000 + 51_500 + 320_000 - 280_000
        );
    }

    #[test]
    fn finds_line_by_number() {
        let report = report();
        let number = "867-5309".parse().unwrap();
        assert_eq!(report.line(&number).unwrap().kind, ContractKind::Term);
        assert!(report.line(&"111-1111".parse().unwrap()).is_none());
    }

    #[test]
    fn json_omits_missing_settlement() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["lines"][0].get("settlement_mills").is_none());
        assert_eq!(value["lines"][1]["settlement_mills"], -280_000);
        assert_eq!(value["lines"][1]["kind"], "term");
    }

    #[test]
    fn writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report().write_to(Some(path.as_path())).unwrap();

        let written: Report =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, report());
    }
}
