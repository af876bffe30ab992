//! Session consumption and enrollment validity.
//!
//! A session is consumed when the student appears on an attendance record of
//! the class with any status other than absent-makeup, or when a makeup
//! lesson for the student and class is completed.

use chrono::NaiveDate;

use crate::models::{AttendanceRecord, Enrollment, MakeupLesson, MakeupStatus};

/// Counts the sessions a student has used up in a class.
///
/// Attendance records are counted regardless of the enrollment window.
pub fn consumed_sessions(
    student_id: &str,
    class_id: &str,
    records: &[AttendanceRecord],
    makeups: &[MakeupLesson],
) -> u32 {
    let attended = records
        .iter()
        .filter(|r| r.class_id == class_id)
        .filter(|r| r.status_of(student_id).is_some_and(|s| s.consumes_session()))
        .count();

    let made_up = makeups
        .iter()
        .filter(|m| {
            m.student_id == student_id
                && m.original_class_id == class_id
                && m.status == MakeupStatus::Completed
        })
        .count();

    (attended + made_up) as u32
}

/// Returns the sessions left on an enrollment, never below zero.
///
/// # Example
///
/// ```
/// use classroom_ledger::calculation::remaining_sessions;
/// use classroom_ledger::models::{Enrollment, PaymentStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let enrollment = Enrollment {
///     id: "E1".to_string(),
///     student_id: "S1".to_string(),
///     class_id: "C1".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
///     calculated_sessions: 9,
///     tuition_per_session: Decimal::new(300_000, 0),
///     material_fee: Decimal::ZERO,
///     total_tuition: Decimal::new(2_700_000, 0),
///     paid_amount: Decimal::ZERO,
///     status: PaymentStatus::Unpaid,
/// };
///
/// assert_eq!(remaining_sessions(&enrollment, &[], &[]), 9);
/// ```
pub fn remaining_sessions(
    enrollment: &Enrollment,
    records: &[AttendanceRecord],
    makeups: &[MakeupLesson],
) -> u32 {
    let consumed = consumed_sessions(
        &enrollment.student_id,
        &enrollment.class_id,
        records,
        makeups,
    );
    enrollment.calculated_sessions.saturating_sub(consumed)
}

/// Returns true if some enrollment of the student in the class covers `date`.
pub fn is_enrolled_on(
    student_id: &str,
    class_id: &str,
    date: NaiveDate,
    enrollments: &[Enrollment],
) -> bool {
    enrollments
        .iter()
        .any(|e| e.student_id == student_id && e.class_id == class_id && e.covers(date))
}

/// The students validly enrolled in a class on `date`, in enrollment order.
///
/// A student holding several covering enrollments is listed once.
pub fn valid_students_on(class_id: &str, date: NaiveDate, enrollments: &[Enrollment]) -> Vec<String> {
    let mut students: Vec<String> = Vec::new();
    for enrollment in enrollments
        .iter()
        .filter(|e| e.class_id == class_id && e.covers(date))
    {
        if !students.contains(&enrollment.student_id) {
            students.push(enrollment.student_id.clone());
        }
    }
    students
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, PaymentStatus, StudentAttendance};
    use chrono::NaiveTime;
    use rust_decimal::Decimal;

    fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_enrollment(id: &str, student: &str, sessions: u32, start: NaiveDate, end: NaiveDate) -> Enrollment {
        Enrollment {
            id: id.to_string(),
            student_id: student.to_string(),
            class_id: "C1".to_string(),
            start_date: start,
            end_date: end,
            calculated_sessions: sessions,
            tuition_per_session: Decimal::new(100_000, 0),
            material_fee: Decimal::ZERO,
            total_tuition: Decimal::new(100_000, 0) * Decimal::from(sessions),
            paid_amount: Decimal::ZERO,
            status: PaymentStatus::Unpaid,
        }
    }

    fn make_record(day: u32, statuses: &[(&str, AttendanceStatus)]) -> AttendanceRecord {
        AttendanceRecord {
            id: format!("ATT-{}", day),
            class_id: "C1".to_string(),
            date: make_date(2024, 1, day),
            student_statuses: statuses
                .iter()
                .map(|(student, status)| StudentAttendance {
                    student_id: student.to_string(),
                    status: *status,
                })
                .collect(),
            teacher_id: "T1".to_string(),
            teacher_present: true,
            assistant_id: None,
            ta_start_time: None,
            ta_end_time: None,
        }
    }

    fn make_makeup(student: &str, status: MakeupStatus) -> MakeupLesson {
        MakeupLesson {
            id: "MAKEUP-1".to_string(),
            student_id: student.to_string(),
            original_class_id: "C1".to_string(),
            original_attendance_id: Some("ATT-3".to_string()),
            teacher_id: Some("T1".to_string()),
            assistant_id: None,
            date: make_date(2024, 1, 20),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
            teacher_pay: Decimal::new(200_000, 0),
            status,
        }
    }

    #[test]
    fn test_present_and_absent_consume_but_owed_makeup_does_not() {
        let records = vec![
            make_record(1, &[("S1", AttendanceStatus::Present)]),
            make_record(3, &[("S1", AttendanceStatus::AbsentMakeup)]),
            make_record(8, &[("S1", AttendanceStatus::Absent)]),
            make_record(10, &[("S2", AttendanceStatus::Present)]),
        ];
        assert_eq!(consumed_sessions("S1", "C1", &records, &[]), 2);
    }

    #[test]
    fn test_only_completed_makeups_consume() {
        let makeups = vec![
            make_makeup("S1", MakeupStatus::Completed),
            make_makeup("S1", MakeupStatus::Scheduled),
            make_makeup("S1", MakeupStatus::Cancelled),
            make_makeup("S2", MakeupStatus::Completed),
        ];
        assert_eq!(consumed_sessions("S1", "C1", &[], &makeups), 1);
    }

    #[test]
    fn test_remaining_is_clamped_at_zero() {
        let enrollment = make_enrollment("E1", "S1", 1, make_date(2024, 1, 1), make_date(2024, 1, 31));
        let records = vec![
            make_record(1, &[("S1", AttendanceStatus::Present)]),
            make_record(3, &[("S1", AttendanceStatus::Present)]),
            make_record(8, &[("S1", AttendanceStatus::Present)]),
        ];
        assert_eq!(remaining_sessions(&enrollment, &records, &[]), 0);
    }

    #[test]
    fn test_remaining_counts_records_outside_window() {
        let enrollment = make_enrollment("E1", "S1", 5, make_date(2024, 1, 8), make_date(2024, 1, 31));
        let records = vec![make_record(1, &[("S1", AttendanceStatus::Present)])];
        assert_eq!(remaining_sessions(&enrollment, &records, &[]), 4);
    }

    #[test]
    fn test_valid_students_respect_window_and_dedupe() {
        let enrollments = vec![
            make_enrollment("E1", "S1", 5, make_date(2024, 1, 1), make_date(2024, 1, 15)),
            make_enrollment("E2", "S2", 5, make_date(2024, 1, 10), make_date(2024, 1, 31)),
            make_enrollment("E3", "S1", 5, make_date(2024, 1, 5), make_date(2024, 1, 31)),
        ];

        assert_eq!(
            valid_students_on("C1", make_date(2024, 1, 3), &enrollments),
            vec!["S1".to_string()]
        );
        assert_eq!(
            valid_students_on("C1", make_date(2024, 1, 12), &enrollments),
            vec!["S1".to_string(), "S2".to_string()]
        );
        assert!(valid_students_on("C2", make_date(2024, 1, 12), &enrollments).is_empty());
        assert!(is_enrolled_on("S2", "C1", make_date(2024, 1, 31), &enrollments));
        assert!(!is_enrolled_on("S2", "C1", make_date(2024, 2, 1), &enrollments));
    }
}
