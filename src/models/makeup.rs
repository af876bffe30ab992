//! Makeup lesson model and its status state machine.
//!
//! A makeup lesson starts out `scheduled` and is resolved exactly once, to
//! either `completed` or `cancelled`. Both outcomes are terminal.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::serde_formats::{hh_mm, optional_id};
use crate::error::{CenterError, CenterResult};

/// Status of a makeup lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MakeupStatus {
    /// Planned, not yet held.
    Scheduled,
    /// Held; consumes one of the student's sessions.
    Completed,
    /// Called off; the student returns to the waitlist.
    Cancelled,
}

impl MakeupStatus {
    /// Returns true for `completed` and `cancelled`.
    pub fn is_terminal(self) -> bool {
        self != MakeupStatus::Scheduled
    }
}

impl fmt::Display for MakeupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MakeupStatus::Scheduled => write!(f, "scheduled"),
            MakeupStatus::Completed => write!(f, "completed"),
            MakeupStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The outcome a scheduled makeup lesson is resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MakeupOutcome {
    /// The lesson took place.
    Completed,
    /// The lesson was called off.
    Cancelled,
}

impl From<MakeupOutcome> for MakeupStatus {
    fn from(outcome: MakeupOutcome) -> Self {
        match outcome {
            MakeupOutcome::Completed => MakeupStatus::Completed,
            MakeupOutcome::Cancelled => MakeupStatus::Cancelled,
        }
    }
}

/// Who leads a makeup lesson. Exactly one kind of staff is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum StaffAssignment {
    /// Led by a teacher, who is paid the lesson's fixed pay.
    Teacher(String),
    /// Led by an assistant.
    Assistant(String),
}

/// A compensatory one-off session for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeupLesson {
    /// Unique identifier for the lesson.
    pub id: String,
    /// The student being compensated.
    pub student_id: String,
    /// The class whose session was missed.
    pub original_class_id: String,
    /// The attendance record marking the absence, if any.
    #[serde(
        default,
        deserialize_with = "optional_id::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_attendance_id: Option<String>,
    /// Set when a teacher leads the lesson.
    #[serde(
        default,
        deserialize_with = "optional_id::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub teacher_id: Option<String>,
    /// Set when an assistant leads the lesson.
    #[serde(
        default,
        deserialize_with = "optional_id::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub assistant_id: Option<String>,
    /// Date of the lesson.
    pub date: NaiveDate,
    /// Start time.
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    /// End time.
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
    /// Fixed pay for the leading teacher.
    #[serde(default)]
    pub teacher_pay: Decimal,
    /// Current status.
    pub status: MakeupStatus,
}

impl MakeupLesson {
    /// Returns the assigned staff, teacher first if the record carries both.
    pub fn staff(&self) -> Option<StaffAssignment> {
        match (&self.teacher_id, &self.assistant_id) {
            (Some(teacher), _) => Some(StaffAssignment::Teacher(teacher.clone())),
            (None, Some(assistant)) => Some(StaffAssignment::Assistant(assistant.clone())),
            (None, None) => None,
        }
    }

    /// Returns true unless the lesson was cancelled.
    pub fn is_live(&self) -> bool {
        self.status != MakeupStatus::Cancelled
    }

    /// Moves a scheduled lesson to its terminal outcome.
    ///
    /// # Errors
    ///
    /// Returns [`CenterError::InvalidTransition`] if the lesson was already
    /// completed or cancelled; the lesson is left unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use classroom_ledger::models::{MakeupLesson, MakeupOutcome, MakeupStatus};
    /// use chrono::{NaiveDate, NaiveTime};
    /// use rust_decimal::Decimal;
    ///
    /// let mut lesson = MakeupLesson {
    ///     id: "MAKEUP-1".to_string(),
    ///     student_id: "S1".to_string(),
    ///     original_class_id: "C1".to_string(),
    ///     original_attendance_id: None,
    ///     teacher_id: Some("T1".to_string()),
    ///     assistant_id: None,
    ///     date: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
    ///     start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    ///     end_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
    ///     teacher_pay: Decimal::new(200000, 0),
    ///     status: MakeupStatus::Scheduled,
    /// };
    ///
    /// lesson.resolve(MakeupOutcome::Completed).unwrap();
    /// assert_eq!(lesson.status, MakeupStatus::Completed);
    /// assert!(lesson.resolve(MakeupOutcome::Cancelled).is_err());
    /// ```
    pub fn resolve(&mut self, outcome: MakeupOutcome) -> CenterResult<()> {
        let target = MakeupStatus::from(outcome);
        if self.status.is_terminal() {
            return Err(CenterError::InvalidTransition {
                makeup_id: self.id.clone(),
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }
}
