//! Attendance record model.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::serde_formats::{option_hh_mm, optional_id};

/// What happened to one student at one class meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    /// Attended the session.
    Present,
    /// Missed the session without makeup entitlement.
    Absent,
    /// Missed the session and is owed a makeup lesson.
    AbsentMakeup,
}

impl AttendanceStatus {
    /// Returns true if the session counts against the student's purchased sessions.
    ///
    /// A session owed as a makeup is consumed later by the makeup lesson instead.
    pub fn consumes_session(self) -> bool {
        self != AttendanceStatus::AbsentMakeup
    }
}

/// One student's status on an attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendance {
    /// The student.
    pub student_id: String,
    /// What happened.
    pub status: AttendanceStatus,
}

/// What actually happened at one meeting of a class.
///
/// At most one record exists per (class, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: String,
    /// The class that met.
    pub class_id: String,
    /// The calendar date of the meeting.
    pub date: NaiveDate,
    /// Per-student statuses.
    #[serde(default)]
    pub student_statuses: Vec<StudentAttendance>,
    /// The teacher who was scheduled to teach that day.
    pub teacher_id: String,
    /// Whether that teacher showed up.
    pub teacher_present: bool,
    /// The assistant working that day, if any.
    #[serde(
        default,
        deserialize_with = "optional_id::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub assistant_id: Option<String>,
    /// Assistant clock-in time.
    #[serde(default, with = "option_hh_mm", skip_serializing_if = "Option::is_none")]
    pub ta_start_time: Option<NaiveTime>,
    /// Assistant clock-out time.
    #[serde(default, with = "option_hh_mm", skip_serializing_if = "Option::is_none")]
    pub ta_end_time: Option<NaiveTime>,
}

impl AttendanceRecord {
    /// Returns the status recorded for `student_id`, if the student is on the record.
    pub fn status_of(&self, student_id: &str) -> Option<AttendanceStatus> {
        self.student_statuses
            .iter()
            .find(|s| s.student_id == student_id)
            .map(|s| s.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"present\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::AbsentMakeup).unwrap(),
            "\"absent-makeup\""
        );
    }

    #[test]
    fn test_only_owed_makeup_does_not_consume() {
        assert!(AttendanceStatus::Present.consumes_session());
        assert!(AttendanceStatus::Absent.consumes_session());
        assert!(!AttendanceStatus::AbsentMakeup.consumes_session());
    }

    #[test]
    fn test_deserialize_record_with_assistant_times() {
        let json = r#"{
            "id": "ATT-1",
            "classId": "C1",
            "date": "2024-03-10",
            "studentStatuses": [
                {"studentId": "S1", "status": "present"},
                {"studentId": "S2", "status": "absent-makeup"}
            ],
            "teacherId": "T1",
            "teacherPresent": true,
            "assistantId": "TA1",
            "taStartTime": "18:00",
            "taEndTime": "20:00"
        }"#;

        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status_of("S2"), Some(AttendanceStatus::AbsentMakeup));
        assert_eq!(record.status_of("S3"), None);
        assert_eq!(
            record.ta_end_time,
            Some(NaiveTime::from_hms_opt(20, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_record_without_assistant_omits_fields() {
        let record = AttendanceRecord {
            id: "ATT-2".to_string(),
            class_id: "C1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            student_statuses: vec![],
            teacher_id: "T1".to_string(),
            teacher_present: false,
            assistant_id: None,
            ta_start_time: None,
            ta_end_time: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("assistantId"));
        assert!(!json.contains("taStartTime"));
        let back: AttendanceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
