//! Makeup waitlist derivation.
//!
//! The waitlist is never stored. It is recomputed from attendance records and
//! makeup lessons each time it is needed.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{AttendanceRecord, AttendanceStatus, MakeupLesson};

/// A student owed a makeup lesson for a missed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistItem {
    /// The attendance record marking the absence.
    pub attendance_id: String,
    /// The class whose session was missed.
    pub class_id: String,
    /// The date of the missed session.
    pub date: NaiveDate,
    /// The student owed the makeup.
    pub student_id: String,
}

/// Returns true if a live makeup lesson already covers the absence.
fn has_live_makeup(attendance_id: &str, student_id: &str, makeups: &[MakeupLesson]) -> bool {
    makeups.iter().any(|m| {
        m.is_live()
            && m.student_id == student_id
            && m.original_attendance_id.as_deref() == Some(attendance_id)
    })
}

/// Lists every absent-makeup status that has no live makeup lesson yet.
///
/// Items follow record order, then the order of students on each record.
/// Cancelling a makeup lesson puts its student back on the waitlist.
pub fn makeup_waitlist(records: &[AttendanceRecord], makeups: &[MakeupLesson]) -> Vec<WaitlistItem> {
    records
        .iter()
        .flat_map(|record| {
            record
                .student_statuses
                .iter()
                .filter(|s| s.status == AttendanceStatus::AbsentMakeup)
                .filter(|s| !has_live_makeup(&record.id, &s.student_id, makeups))
                .map(move |s| WaitlistItem {
                    attendance_id: record.id.clone(),
                    class_id: record.class_id.clone(),
                    date: record.date,
                    student_id: s.student_id.clone(),
                })
        })
        .collect()
}

/// Finds the waitlist entry for a student's absence, if it is still open.
pub fn find_waitlist_item(
    attendance_id: &str,
    student_id: &str,
    records: &[AttendanceRecord],
    makeups: &[MakeupLesson],
) -> Option<WaitlistItem> {
    let record = records.iter().find(|r| r.id == attendance_id)?;
    if record.status_of(student_id) != Some(AttendanceStatus::AbsentMakeup)
        || has_live_makeup(attendance_id, student_id, makeups)
    {
        return None;
    }
    Some(WaitlistItem {
        attendance_id: record.id.clone(),
        class_id: record.class_id.clone(),
        date: record.date,
        student_id: student_id.to_string(),
    })
}
