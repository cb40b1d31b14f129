//! Call records for line-billing.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::PhoneNumber;

/// Round a duration in seconds up to whole minutes.
///
/// Partial minutes are always billed as whole minutes.
#[must_use]
pub const fn billed_minutes(duration_secs: u64) -> u64 {
    duration_secs.div_ceil(60)
}

/// A call placed from one phone line to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// The calling line.
    pub src_number: PhoneNumber,

    /// The called line.
    pub dst_number: PhoneNumber,

    /// When the call was placed.
    pub time: NaiveDateTime,

    /// Call length in whole seconds.
    pub duration: u64,
}

impl Call {
    /// Create a new call record.
    #[must_use]
    pub fn new(
        src_number: PhoneNumber,
        dst_number: PhoneNumber,
        time: NaiveDateTime,
        duration: u64,
    ) -> Self {
        Self {
            src_number,
            dst_number,
            time,
            duration,
        }
    }

    /// Month the call was placed in (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.time.month()
    }

    /// Year the call was placed in.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.time.year()
    }

    /// Duration rounded up to whole minutes.
    #[must_use]
    pub const fn billed_minutes(&self) -> u64 {
        billed_minutes(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn call(duration: u64) -> Call {
        Call::new(
            "867-5309".parse().unwrap(),
            "555-0100".parse().unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            duration,
        )
    }

    #[test]
    fn minutes_round_up() {
        assert_eq!(billed_minutes(0), 0);
        assert_eq!(billed_minutes(1), 1);
        assert_eq!(billed_minutes(59), 1);
        assert_eq!(billed_minutes(60), 1);
        assert_eq!(billed_minutes(61), 2);
        assert_eq!(billed_minutes(90), 2);
        assert_eq!(billed_minutes(6000), 100);
    }

    #[test]
    fn call_month_and_year() {
        let call = call(61);
        assert_eq!(call.month(), 3);
        assert_eq!(call.year(), 2024);
        assert_eq!(call.billed_minutes(), 2);
    }
}
