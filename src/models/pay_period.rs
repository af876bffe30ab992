//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type used to restrict a payroll
//! calculation to a date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive date range that payroll is computed over.
///
/// # Example
///
/// ```
/// use classroom_ledger::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let pay_period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
/// };
///
/// assert!(pay_period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Checks if a given date falls within this pay period.
    ///
    /// The check is inclusive of both start and end dates.
    ///
    /// # Arguments
    ///
    /// * `date` - The date to check.
    ///
    /// # Returns
    ///
    /// `true` if the date is within the pay period (inclusive), `false` otherwise.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Returns true if `date` passes the optional period filter.
pub(crate) fn in_period(period: Option<&PayPeriod>, date: NaiveDate) -> bool {
    period.is_none_or(|p| p.contains_date(date))
}
