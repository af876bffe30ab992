//! Session arithmetic over a weekly schedule.
//!
//! Both functions walk the calendar one day at a time and treat the start
//! date itself as eligible. Multi-year ranges therefore cost one step per day.

use chrono::{Datelike, NaiveDate};

use crate::models::WeeklySchedule;

/// Counts the days in `[start_date, end_date]` whose weekday appears in `schedule`.
///
/// A weekday with several slots in the schedule still counts once per day.
///
/// # Arguments
///
/// * `start_date` - First day of the range (inclusive), if known
/// * `end_date` - Last day of the range (inclusive), if known
/// * `schedule` - The class's recurring meeting slots
///
/// # Returns
///
/// The number of meeting days, or 0 if either date is missing, the schedule
/// is empty, or `end_date` precedes `start_date`.
///
/// # Example
///
/// ```
/// use classroom_ledger::calculation::sessions_between;
/// use classroom_ledger::models::{ClassSession, WeeklySchedule};
/// use chrono::{NaiveDate, NaiveTime, Weekday};
///
/// let slot = |day| ClassSession {
///     day_of_week: day,
///     start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
///     end_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
/// };
/// let schedule = WeeklySchedule::new(vec![slot(Weekday::Mon), slot(Weekday::Wed)]);
///
/// let count = sessions_between(
///     NaiveDate::from_ymd_opt(2024, 1, 1),
///     NaiveDate::from_ymd_opt(2024, 1, 31),
///     &schedule,
/// );
/// assert_eq!(count, 9);
/// ```
pub fn sessions_between(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    schedule: &WeeklySchedule,
) -> u32 {
    let (Some(start), Some(end)) = (start_date, end_date) else {
        return 0;
    };
    if schedule.is_empty() {
        return 0;
    }

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| schedule.meets_on(day.weekday()))
        .count() as u32
}

/// Finds the date on which the `session_count`-th meeting falls.
///
/// # Arguments
///
/// * `start_date` - The first eligible day
/// * `session_count` - How many meetings the window must contain
/// * `schedule` - The class's recurring meeting slots
///
/// # Returns
///
/// The date of the last meeting, or `start_date` unchanged when
/// `session_count` is 0 or the schedule is empty.
///
/// # Example
///
/// ```
/// use classroom_ledger::calculation::end_date_from_session_count;
/// use classroom_ledger::models::{ClassSession, WeeklySchedule};
/// use chrono::{NaiveDate, NaiveTime, Weekday};
///
/// let schedule = WeeklySchedule::new(vec![ClassSession {
///     day_of_week: Weekday::Mon,
///     start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
///     end_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
/// }]);
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = end_date_from_session_count(start, 3, &schedule);
/// assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
/// ```
pub fn end_date_from_session_count(
    start_date: NaiveDate,
    session_count: u32,
    schedule: &WeeklySchedule,
) -> NaiveDate {
    if session_count == 0 || schedule.is_empty() {
        return start_date;
    }

    start_date
        .iter_days()
        .filter(|day| schedule.meets_on(day.weekday()))
        .nth(session_count as usize - 1)
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassSession;
    use chrono::{NaiveTime, Weekday};
    use proptest::prelude::*;

    fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_schedule(days: &[Weekday]) -> WeeklySchedule {
        WeeklySchedule::new(
            days.iter()
                .map(|day| ClassSession {
                    day_of_week: *day,
                    start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_january_2024_monday_wednesday() {
        let schedule = make_schedule(&[Weekday::Mon, Weekday::Wed]);
        let count = sessions_between(
            Some(make_date(2024, 1, 1)),
            Some(make_date(2024, 1, 31)),
            &schedule,
        );
        assert_eq!(count, 9);
    }

    #[test]
    fn test_single_day_range() {
        let schedule = make_schedule(&[Weekday::Mon]);
        // 2024-01-01 is a Monday
        let monday = make_date(2024, 1, 1);
        let tuesday = make_date(2024, 1, 2);
        assert_eq!(sessions_between(Some(monday), Some(monday), &schedule), 1);
        assert_eq!(sessions_between(Some(tuesday), Some(tuesday), &schedule), 0);
    }

    #[test]
    fn test_reversed_range_is_zero() {
        let schedule = make_schedule(&[Weekday::Mon, Weekday::Wed]);
        let count = sessions_between(
            Some(make_date(2024, 1, 31)),
            Some(make_date(2024, 1, 1)),
            &schedule,
        );
        assert_eq!(count, 0);
    }

    #[test]
    fn test_missing_dates_or_schedule_is_zero() {
        let schedule = make_schedule(&[Weekday::Mon]);
        assert_eq!(sessions_between(None, Some(make_date(2024, 1, 31)), &schedule), 0);
        assert_eq!(sessions_between(Some(make_date(2024, 1, 1)), None, &schedule), 0);
        assert_eq!(
            sessions_between(
                Some(make_date(2024, 1, 1)),
                Some(make_date(2024, 1, 31)),
                &WeeklySchedule::default()
            ),
            0
        );
    }

    #[test]
    fn test_two_slots_on_same_day_count_once() {
        let schedule = make_schedule(&[Weekday::Sat, Weekday::Sat]);
        let count = sessions_between(
            Some(make_date(2024, 1, 1)),
            Some(make_date(2024, 1, 31)),
            &schedule,
        );
        assert_eq!(count, 4);
    }

    #[test]
    fn test_end_date_degenerate_inputs_return_start() {
        let start = make_date(2024, 1, 1);
        let schedule = make_schedule(&[Weekday::Mon]);
        assert_eq!(end_date_from_session_count(start, 0, &schedule), start);
        assert_eq!(
            end_date_from_session_count(start, 5, &WeeklySchedule::default()),
            start
        );
    }

    #[test]
    fn test_end_date_counts_start_day() {
        let schedule = make_schedule(&[Weekday::Mon, Weekday::Wed]);
        let start = make_date(2024, 1, 1);
        assert_eq!(end_date_from_session_count(start, 1, &schedule), start);
        assert_eq!(
            end_date_from_session_count(start, 9, &schedule),
            make_date(2024, 1, 31)
        );
    }

    #[test]
    fn test_end_date_skips_to_first_matching_day() {
        let schedule = make_schedule(&[Weekday::Fri]);
        // 2024-01-01 is a Monday; the first Friday is the 5th
        assert_eq!(
            end_date_from_session_count(make_date(2024, 1, 1), 1, &schedule),
            make_date(2024, 1, 5)
        );
    }

    fn weekday_set() -> impl Strategy<Value = Vec<Weekday>> {
        proptest::sample::subsequence(
            vec![
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
            ],
            1..=7,
        )
    }

    proptest! {
        #[test]
        fn prop_end_date_round_trips(
            offset in 0i64..3650,
            sessions in 1u32..400,
            days in weekday_set(),
        ) {
            let schedule = make_schedule(&days);
            let start = make_date(2020, 1, 1) + chrono::Duration::days(offset);
            let end = end_date_from_session_count(start, sessions, &schedule);
            prop_assert_eq!(sessions_between(Some(start), Some(end), &schedule), sessions);
        }

        #[test]
        fn prop_count_never_exceeds_days_in_range(
            offset in 0i64..3650,
            length in -30i64..800,
            days in weekday_set(),
        ) {
            let schedule = make_schedule(&days);
            let start = make_date(2020, 1, 1) + chrono::Duration::days(offset);
            let end = start + chrono::Duration::days(length);
            let count = sessions_between(Some(start), Some(end), &schedule);
            prop_assert!(i64::from(count) <= (length + 1).max(0));
        }
    }
}
