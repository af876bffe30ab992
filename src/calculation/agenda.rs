//! Day agenda and substitute detection.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::models::serde_formats::hh_mm;
use crate::models::{AttendanceRecord, Class, MakeupLesson, MakeupStatus, StaffAssignment};

/// Returns true if the record's teacher is not the class's nominal teacher.
pub fn is_substitute(class: &Class, record: &AttendanceRecord) -> bool {
    record.teacher_id != class.teacher_id
}

/// What an agenda entry refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgendaItem {
    /// One scheduled slot of a regular class.
    #[serde(rename_all = "camelCase")]
    Class {
        /// The class.
        class_id: String,
        /// The class's display name.
        class_name: String,
        /// True once attendance has been taken for the date.
        attendance_taken: bool,
        /// The record's teacher if attendance was taken, else the nominal teacher.
        teacher_id: String,
        /// The record's assistant if any, else the nominal assistant.
        assistant_id: Option<String>,
        /// True if someone other than the nominal teacher taught.
        is_substitute: bool,
    },
    /// A live makeup lesson.
    #[serde(rename_all = "camelCase")]
    Makeup {
        /// The makeup lesson.
        makeup_id: String,
        /// The student being compensated.
        student_id: String,
        /// The class whose session was missed.
        original_class_id: String,
        /// True once the lesson is completed.
        completed: bool,
        /// Who leads the lesson.
        staff: Option<StaffAssignment>,
    },
}

/// One entry of a day's agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEntry {
    /// Start time.
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    /// End time.
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
    /// The class slot or makeup lesson.
    #[serde(flatten)]
    pub item: AgendaItem,
}

/// Builds the agenda for `date`.
///
/// Every active class contributes one entry per slot on that weekday, and
/// every makeup lesson on that date that was not cancelled contributes one
/// entry. Entries are sorted by start time; ties keep classes before makeups.
pub fn day_agenda(
    date: NaiveDate,
    classes: &[Class],
    records: &[AttendanceRecord],
    makeups: &[MakeupLesson],
) -> Vec<AgendaEntry> {
    let weekday = date.weekday();
    let mut entries = Vec::new();

    for class in classes.iter().filter(|c| c.is_active()) {
        let record = records
            .iter()
            .find(|r| r.class_id == class.id && r.date == date);
        for slot in class.schedule.slots_on(weekday) {
            entries.push(AgendaEntry {
                start_time: slot.start_time,
                end_time: slot.end_time,
                item: AgendaItem::Class {
                    class_id: class.id.clone(),
                    class_name: class.name.clone(),
                    attendance_taken: record.is_some(),
                    teacher_id: record
                        .map(|r| r.teacher_id.clone())
                        .unwrap_or_else(|| class.teacher_id.clone()),
                    assistant_id: record
                        .and_then(|r| r.assistant_id.clone())
                        .or_else(|| class.assistant_id.clone()),
                    is_substitute: record.is_some_and(|r| is_substitute(class, r)),
                },
            });
        }
    }

    for makeup in makeups.iter().filter(|m| m.date == date && m.is_live()) {
        entries.push(AgendaEntry {
            start_time: makeup.start_time,
            end_time: makeup.end_time,
            item: AgendaItem::Makeup {
                makeup_id: makeup.id.clone(),
                student_id: makeup.student_id.clone(),
                original_class_id: makeup.original_class_id.clone(),
                completed: makeup.status == MakeupStatus::Completed,
                staff: makeup.staff(),
            },
        });
    }

    entries.sort_by_key(|e| e.start_time);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassSession, ClassStatus, WeeklySchedule};
    use chrono::Weekday;
    use rust_decimal::Decimal;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn make_class(id: &str, day: Weekday, start: NaiveTime, status: ClassStatus) -> Class {
        Class {
            id: id.to_string(),
            name: format!("Class {}", id),
            teacher_id: "T1".to_string(),
            assistant_id: Some("TA1".to_string()),
            schedule: WeeklySchedule::new(vec![ClassSession {
                day_of_week: day,
                start_time: start,
                end_time: time(21, 0),
            }]),
            tuition_per_session: Decimal::new(300_000, 0),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            max_students: 10,
            status,
        }
    }

    fn make_record(class_id: &str, date: NaiveDate, teacher: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: "ATT-1".to_string(),
            class_id: class_id.to_string(),
            date,
            student_statuses: vec![],
            teacher_id: teacher.to_string(),
            teacher_present: true,
            assistant_id: None,
            ta_start_time: None,
            ta_end_time: None,
        }
    }

    fn make_makeup(date: NaiveDate, start: NaiveTime, status: MakeupStatus) -> MakeupLesson {
        MakeupLesson {
            id: "MAKEUP-1".to_string(),
            student_id: "S1".to_string(),
            original_class_id: "C1".to_string(),
            original_attendance_id: None,
            teacher_id: None,
            assistant_id: Some("TA2".to_string()),
            date,
            start_time: start,
            end_time: time(20, 0),
            teacher_pay: Decimal::ZERO,
            status,
        }
    }

    // 2024-03-11 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    #[test]
    fn test_agenda_sorted_by_start_time() {
        let classes = vec![
            make_class("C1", Weekday::Mon, time(19, 0), ClassStatus::Active),
            make_class("C2", Weekday::Mon, time(17, 0), ClassStatus::Active),
            make_class("C3", Weekday::Tue, time(8, 0), ClassStatus::Active),
        ];
        let makeups = vec![make_makeup(monday(), time(18, 0), MakeupStatus::Scheduled)];

        let agenda = day_agenda(monday(), &classes, &[], &makeups);
        let starts: Vec<NaiveTime> = agenda.iter().map(|e| e.start_time).collect();
        assert_eq!(starts, vec![time(17, 0), time(18, 0), time(19, 0)]);
    }

    #[test]
    fn test_closed_classes_and_cancelled_makeups_are_hidden() {
        let classes = vec![make_class("C1", Weekday::Mon, time(19, 0), ClassStatus::Closed)];
        let makeups = vec![make_makeup(monday(), time(18, 0), MakeupStatus::Cancelled)];
        assert!(day_agenda(monday(), &classes, &[], &makeups).is_empty());
    }

    #[test]
    fn test_substitute_is_flagged_and_effective_teacher_reported() {
        let classes = vec![make_class("C1", Weekday::Mon, time(19, 0), ClassStatus::Active)];
        let records = vec![make_record("C1", monday(), "T2")];

        let agenda = day_agenda(monday(), &classes, &records, &[]);
        match &agenda[0].item {
            AgendaItem::Class {
                attendance_taken,
                teacher_id,
                assistant_id,
                is_substitute,
                ..
            } => {
                assert!(*attendance_taken);
                assert_eq!(teacher_id, "T2");
                assert_eq!(assistant_id.as_deref(), Some("TA1"));
                assert!(*is_substitute);
            }
            _ => panic!("Expected a class entry"),
        }
    }

    #[test]
    fn test_untaken_class_uses_nominal_teacher() {
        let classes = vec![make_class("C1", Weekday::Mon, time(19, 0), ClassStatus::Active)];
        let agenda = day_agenda(monday(), &classes, &[], &[]);
        let json = serde_json::to_value(&agenda[0]).unwrap();
        assert_eq!(json["type"], "class");
        assert_eq!(json["teacherId"], "T1");
        assert_eq!(json["isSubstitute"], false);
        assert_eq!(json["startTime"], "19:00");
    }

    #[test]
    fn test_makeup_entry_reports_staff() {
        let makeups = vec![make_makeup(monday(), time(18, 0), MakeupStatus::Completed)];
        let agenda = day_agenda(monday(), &[], &[], &makeups);
        let json = serde_json::to_value(&agenda[0]).unwrap();
        assert_eq!(json["type"], "makeup");
        assert_eq!(json["completed"], true);
        assert_eq!(json["staff"]["kind"], "assistant");
    }
}
