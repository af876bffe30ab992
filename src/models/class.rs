//! Class and weekly schedule models.

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::serde_formats::{hh_mm, optional_id, weekday_index};

/// One recurring meeting slot of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    /// The weekday the class meets on.
    #[serde(with = "weekday_index")]
    pub day_of_week: Weekday,
    /// Start of the slot.
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    /// End of the slot.
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
}

impl ClassSession {
    /// Returns true if both slots fall on the same weekday and their times intersect.
    pub fn overlaps(&self, other: &ClassSession) -> bool {
        self.day_of_week == other.day_of_week
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}

/// The ordered set of recurring meeting slots of a class.
///
/// # Example
///
/// ```
/// use classroom_ledger::models::{ClassSession, WeeklySchedule};
/// use chrono::{NaiveTime, Weekday};
///
/// let evening = |day| ClassSession {
///     day_of_week: day,
///     start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
///     end_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
/// };
/// let schedule = WeeklySchedule::new(vec![evening(Weekday::Mon), evening(Weekday::Wed)]);
///
/// assert!(schedule.meets_on(Weekday::Wed));
/// assert!(!schedule.meets_on(Weekday::Fri));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule(Vec<ClassSession>);

impl WeeklySchedule {
    /// Creates a schedule from its slots, keeping their order.
    pub fn new(sessions: Vec<ClassSession>) -> Self {
        Self(sessions)
    }

    /// The slots in stored order.
    pub fn sessions(&self) -> &[ClassSession] {
        &self.0
    }

    /// Returns true if the schedule has no slots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any slot falls on `day`.
    pub fn meets_on(&self, day: Weekday) -> bool {
        self.0.iter().any(|s| s.day_of_week == day)
    }

    /// The slots falling on `day`, in stored order.
    pub fn slots_on(&self, day: Weekday) -> impl Iterator<Item = &ClassSession> {
        self.0.iter().filter(move |s| s.day_of_week == day)
    }

    /// Index pairs of slots sharing a weekday with intersecting times.
    pub fn overlapping_slots(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.0.iter().enumerate() {
            for (j, b) in self.0.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

/// Lifecycle status of a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassStatus {
    /// Running; appears in scheduling views and accepts enrollments.
    #[default]
    Active,
    /// Finished; retained for payroll and enrollment history.
    Closed,
}

/// A class taught at the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    /// Unique identifier (class code).
    pub id: String,
    /// Display name.
    pub name: String,
    /// The nominal teacher.
    pub teacher_id: String,
    /// The nominal assistant, if any.
    #[serde(
        default,
        deserialize_with = "optional_id::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub assistant_id: Option<String>,
    /// Recurring meeting slots.
    pub schedule: WeeklySchedule,
    /// Default tuition charged per session.
    pub tuition_per_session: Decimal,
    /// First day of the enrollment window (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the enrollment window (inclusive).
    pub end_date: NaiveDate,
    /// Maximum number of enrolled students.
    pub max_students: u32,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ClassStatus,
}

impl Class {
    /// Returns true if the class is running.
    pub fn is_active(&self) -> bool {
        self.status == ClassStatus::Active
    }
}
