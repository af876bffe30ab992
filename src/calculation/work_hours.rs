//! Assistant hours and pay from a clock-in/clock-out pair.

use chrono::NaiveTime;
use rust_decimal::Decimal;

/// Decimal places kept on derived hours and pay.
const ROUNDING_DP: u32 = 2;

/// Hours worked and pay earned for one timesheet entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkedTime {
    /// Hours between clock-in and clock-out, never negative.
    pub hours: Decimal,
    /// Pay for those hours at the given rate.
    pub pay: Decimal,
}

/// Computes hours as whole minutes divided by 60, clamped at zero.
///
/// A clock-out before clock-in yields zero hours; shifts do not wrap past
/// midnight.
///
/// # Example
///
/// ```
/// use classroom_ledger::calculation::hours_between;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
///
/// let start = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
/// let end = NaiveTime::from_hms_opt(20, 30, 0).unwrap();
/// assert_eq!(hours_between(start, end), Decimal::new(25, 1));
/// assert_eq!(hours_between(end, start), Decimal::ZERO);
/// ```
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> Decimal {
    let minutes = (end - start).num_minutes().max(0);
    (Decimal::from(minutes) / Decimal::from(60)).round_dp(ROUNDING_DP)
}

/// Computes hours and pay for a time range at `hourly_rate`.
///
/// Pay is taken from the exact minute count so rounding the displayed hours
/// does not shift it.
pub fn compute_worked_time(start: NaiveTime, end: NaiveTime, hourly_rate: Decimal) -> WorkedTime {
    let minutes = Decimal::from((end - start).num_minutes().max(0));
    WorkedTime {
        hours: (minutes / Decimal::from(60)).round_dp(ROUNDING_DP),
        pay: (minutes * hourly_rate / Decimal::from(60)).round_dp(ROUNDING_DP),
    }
}
