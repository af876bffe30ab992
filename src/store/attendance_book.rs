//! Attendance sheets, makeup lessons, assistant timesheets and the agenda.

use chrono::{Datelike, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::collection::generate_id;
use super::drafts::{AttendanceSheet, MakeupDraft, WorkLogDraft};
use super::CenterStore;
use crate::calculation::{
    AgendaEntry, WaitlistItem, compute_worked_time, day_agenda, makeup_waitlist,
    valid_students_on,
};
use crate::error::CenterResult;
use crate::models::{
    AttendanceRecord, AttendanceStatus, MakeupLesson, MakeupOutcome, MakeupStatus,
    StaffAssignment, StudentAttendance, TaWorkLog,
};

const DEFAULT_TA_START: (u32, u32) = (18, 0);
const DEFAULT_TA_END: (u32, u32) = (20, 0);

/// A saved attendance record and the timesheet entry it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAttendance {
    /// The stored record.
    pub record: AttendanceRecord,
    /// The assistant's timesheet entry for the meeting, if one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_log: Option<TaWorkLog>,
}

impl CenterStore {
    /// Prepares the attendance form for a class meeting.
    ///
    /// Only students validly enrolled on `date` appear. An existing record's
    /// statuses are filtered down to those students; otherwise every valid
    /// student starts as present.
    pub fn open_attendance_sheet(
        &self,
        class_id: &str,
        date: NaiveDate,
    ) -> CenterResult<AttendanceSheet> {
        let class = self.classes.require(class_id)?;
        let valid = valid_students_on(class_id, date, self.enrollments.as_slice());
        let existing = self
            .attendance_records
            .iter()
            .find(|r| r.class_id == class_id && r.date == date);

        let sheet = match existing {
            Some(record) => AttendanceSheet {
                class_id: class_id.to_string(),
                date,
                student_statuses: record
                    .student_statuses
                    .iter()
                    .filter(|s| valid.contains(&s.student_id))
                    .cloned()
                    .collect(),
                teacher_id: record.teacher_id.clone(),
                teacher_present: record.teacher_present,
                assistant_id: record.assistant_id.clone(),
                ta_start_time: record.ta_start_time,
                ta_end_time: record.ta_end_time,
            },
            None => {
                let slot = class.schedule.slots_on(date.weekday()).next();
                AttendanceSheet {
                    class_id: class_id.to_string(),
                    date,
                    student_statuses: valid
                        .into_iter()
                        .map(|student_id| StudentAttendance {
                            student_id,
                            status: AttendanceStatus::Present,
                        })
                        .collect(),
                    teacher_id: class.teacher_id.clone(),
                    teacher_present: true,
                    assistant_id: class.assistant_id.clone(),
                    ta_start_time: Some(
                        slot.map(|s| s.start_time)
                            .unwrap_or_else(|| clock(DEFAULT_TA_START)),
                    ),
                    ta_end_time: Some(
                        slot.map(|s| s.end_time)
                            .unwrap_or_else(|| clock(DEFAULT_TA_END)),
                    ),
                }
            }
        };
        Ok(sheet)
    }

    /// Stores an attendance sheet, replacing any record for the same class and date.
    ///
    /// A replaced record keeps its id so makeup lessons referencing it stay
    /// linked. When the sheet names an assistant with clock-in and clock-out
    /// times, the assistant's timesheet entry for the same class and date is
    /// replaced too.
    pub fn save_attendance(&mut self, sheet: AttendanceSheet) -> CenterResult<SavedAttendance> {
        sheet.validate(self)?;

        let previous_id = self
            .attendance_records
            .iter()
            .find(|r| r.class_id == sheet.class_id && r.date == sheet.date)
            .map(|r| r.id.clone());
        let replaced = self
            .attendance_records
            .retain(|r| !(r.class_id == sheet.class_id && r.date == sheet.date));

        let record = AttendanceRecord {
            id: previous_id.unwrap_or_else(|| generate_id("ATT")),
            class_id: sheet.class_id.clone(),
            date: sheet.date,
            student_statuses: sheet.student_statuses,
            teacher_id: sheet.teacher_id,
            teacher_present: sheet.teacher_present,
            assistant_id: sheet.assistant_id.clone(),
            ta_start_time: sheet.ta_start_time,
            ta_end_time: sheet.ta_end_time,
        };
        self.attendance_records.push(record.clone());
        info!(
            attendance_id = %record.id,
            class_id = %record.class_id,
            date = %record.date,
            replaced,
            "Saved attendance"
        );

        let work_log = match (sheet.assistant_id, sheet.ta_start_time, sheet.ta_end_time) {
            (Some(assistant_id), Some(start), Some(end)) => {
                Some(self.replace_class_work_log(&assistant_id, &record, start, end)?)
            }
            (Some(assistant_id), _, _) => {
                debug!(assistant_id = %assistant_id, "Assistant listed without times; no work log written");
                None
            }
            _ => None,
        };

        Ok(SavedAttendance { record, work_log })
    }

    fn replace_class_work_log(
        &mut self,
        assistant_id: &str,
        record: &AttendanceRecord,
        start: NaiveTime,
        end: NaiveTime,
    ) -> CenterResult<TaWorkLog> {
        let rate = self.assistants.require(assistant_id)?.hourly_rate;
        let worked = compute_worked_time(start, end, rate);
        let log = TaWorkLog {
            id: generate_id("LOG-ATT"),
            assistant_id: assistant_id.to_string(),
            date: record.date,
            start_time: start,
            end_time: end,
            total_hours: worked.hours,
            pay_amount: worked.pay,
            class_id: Some(record.class_id.clone()),
            description: format!(
                "Class support: {}",
                self.class_name(&record.class_id).unwrap_or("N/A")
            ),
        };

        self.ta_work_logs.retain(|l| {
            !(l.class_id.as_deref() == Some(record.class_id.as_str()) && l.date == record.date)
        });
        self.ta_work_logs.push_front(log.clone());
        info!(
            log_id = %log.id,
            assistant_id = %assistant_id,
            hours = %log.total_hours,
            pay = %log.pay_amount,
            "Recorded class support hours"
        );
        Ok(log)
    }

    /// Absences still waiting for a makeup lesson.
    pub fn waitlist(&self) -> Vec<WaitlistItem> {
        makeup_waitlist(
            self.attendance_records.as_slice(),
            self.makeup_lessons.as_slice(),
        )
    }

    /// Schedules a makeup lesson for a waitlisted absence.
    ///
    /// Lessons led by an assistant carry no teacher pay.
    pub fn schedule_makeup(&mut self, draft: MakeupDraft) -> CenterResult<MakeupLesson> {
        draft.validate(self)?;
        let original_class_id = self
            .attendance_records
            .require(&draft.attendance_id)?
            .class_id
            .clone();

        let (teacher_id, assistant_id, teacher_pay) = match draft.staff {
            StaffAssignment::Teacher(id) => (Some(id), None, draft.teacher_pay),
            StaffAssignment::Assistant(id) => (None, Some(id), Decimal::ZERO),
        };
        let lesson = MakeupLesson {
            id: generate_id("MAKEUP"),
            student_id: draft.student_id,
            original_class_id,
            original_attendance_id: Some(draft.attendance_id),
            teacher_id,
            assistant_id,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            teacher_pay,
            status: MakeupStatus::Scheduled,
        };
        info!(
            makeup_id = %lesson.id,
            student_id = %lesson.student_id,
            date = %lesson.date,
            "Scheduled makeup lesson"
        );
        self.makeup_lessons.push(lesson.clone());
        Ok(lesson)
    }

    /// Marks a scheduled makeup lesson completed or cancelled.
    pub fn resolve_makeup(
        &mut self,
        makeup_id: &str,
        outcome: MakeupOutcome,
    ) -> CenterResult<MakeupLesson> {
        let lesson = self.makeup_lessons.require_mut(makeup_id)?;
        lesson.resolve(outcome)?;
        info!(makeup_id = %makeup_id, status = %lesson.status, "Resolved makeup lesson");
        Ok(lesson.clone())
    }

    /// Adds a manual timesheet entry at the assistant's current rate.
    pub fn add_work_log(&mut self, draft: WorkLogDraft) -> CenterResult<TaWorkLog> {
        draft.validate(self)?;
        let rate = self.assistants.require(&draft.assistant_id)?.hourly_rate;
        let worked = compute_worked_time(draft.start_time, draft.end_time, rate);
        let description = match (draft.description, &draft.class_id) {
            (Some(text), _) if !text.trim().is_empty() => text,
            (_, Some(class_id)) => format!(
                "Class support: {}",
                self.class_name(class_id).unwrap_or("N/A")
            ),
            (_, None) => "Part-time work".to_string(),
        };

        let log = TaWorkLog {
            id: generate_id("LOG"),
            assistant_id: draft.assistant_id,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            total_hours: worked.hours,
            pay_amount: worked.pay,
            class_id: draft.class_id,
            description,
        };
        info!(log_id = %log.id, assistant_id = %log.assistant_id, pay = %log.pay_amount, "Added work log");
        self.ta_work_logs.push_front(log.clone());
        Ok(log)
    }

    /// Class meetings and makeup lessons on `date`, ordered by start time.
    pub fn day_agenda(&self, date: NaiveDate) -> Vec<AgendaEntry> {
        day_agenda(
            date,
            self.classes.as_slice(),
            self.attendance_records.as_slice(),
            self.makeup_lessons.as_slice(),
        )
    }
}

fn clock((hour, minute): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CenterError;
    use crate::models::{
        ActivityStatus, Assistant, Class, ClassSession, ClassStatus, Enrollment, PaymentStatus,
        Student, Teacher, WeeklySchedule,
    };
    use chrono::Weekday;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn make_date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn enrollment(id: &str, student: &str, start: u32, end: u32) -> Enrollment {
        Enrollment {
            id: id.to_string(),
            student_id: student.to_string(),
            class_id: "C1".to_string(),
            start_date: make_date(start),
            end_date: make_date(end),
            calculated_sessions: 4,
            tuition_per_session: dec(300_000),
            material_fee: Decimal::ZERO,
            total_tuition: dec(1_200_000),
            paid_amount: Decimal::ZERO,
            status: PaymentStatus::Unpaid,
        }
    }

    /// Class C1 meets Sundays 18:00-19:30; S1 enrolled all month, S2 from the 15th.
    fn make_store() -> CenterStore {
        let mut store = CenterStore::default();
        for id in ["S1", "S2"] {
            store.students.push(Student {
                id: id.to_string(),
                name: id.to_string(),
                phone: String::new(),
                email: String::new(),
                status: ActivityStatus::Active,
            });
        }
        store.teachers.push(Teacher {
            id: "T1".to_string(),
            name: "Ms. Lan".to_string(),
            phone: String::new(),
            hourly_rate: dec(200_000),
            salary_tiers: vec![],
            expertise: vec![],
        });
        store.assistants.push(Assistant {
            id: "TA1".to_string(),
            name: "Thu".to_string(),
            phone: String::new(),
            hourly_rate: dec(45_000),
            status: ActivityStatus::Active,
        });
        store.classes.push(Class {
            id: "C1".to_string(),
            name: "Kids English".to_string(),
            teacher_id: "T1".to_string(),
            assistant_id: Some("TA1".to_string()),
            schedule: WeeklySchedule::new(vec![ClassSession {
                day_of_week: Weekday::Sun,
                start_time: time(18, 0),
                end_time: time(19, 30),
            }]),
            tuition_per_session: dec(300_000),
            start_date: make_date(1),
            end_date: make_date(31),
            max_students: 10,
            status: ClassStatus::Active,
        });
        store.enrollments.push(enrollment("E1", "S1", 1, 31));
        store.enrollments.push(enrollment("E2", "S2", 15, 31));
        store
    }

    fn mark(sheet: &mut AttendanceSheet, student: &str, status: AttendanceStatus) {
        if let Some(entry) = sheet
            .student_statuses
            .iter_mut()
            .find(|s| s.student_id == student)
        {
            entry.status = status;
        }
    }

    #[test]
    fn test_new_sheet_defaults_from_class() {
        let store = make_store();
        let sheet = store.open_attendance_sheet("C1", make_date(10)).unwrap();

        let students: Vec<&str> = sheet
            .student_statuses
            .iter()
            .map(|s| s.student_id.as_str())
            .collect();
        assert_eq!(students, vec!["S1"]);
        assert_eq!(sheet.student_statuses[0].status, AttendanceStatus::Present);
        assert_eq!(sheet.teacher_id, "T1");
        assert!(sheet.teacher_present);
        assert_eq!(sheet.assistant_id.as_deref(), Some("TA1"));
        assert_eq!(sheet.ta_start_time, Some(time(18, 0)));
        assert_eq!(sheet.ta_end_time, Some(time(19, 30)));
    }

    #[test]
    fn test_existing_sheet_filtered_to_valid_students() {
        let mut store = make_store();
        let mut sheet = store.open_attendance_sheet("C1", make_date(17)).unwrap();
        mark(&mut sheet, "S2", AttendanceStatus::Absent);
        store.save_attendance(sheet).unwrap();

        store.enrollments.remove("E2");
        let reopened = store.open_attendance_sheet("C1", make_date(17)).unwrap();
        assert_eq!(reopened.student_statuses.len(), 1);
        assert_eq!(reopened.student_statuses[0].student_id, "S1");
    }

    #[test]
    fn test_save_twice_keeps_one_record() {
        let mut store = make_store();
        let sheet = store.open_attendance_sheet("C1", make_date(17)).unwrap();
        let first = store.save_attendance(sheet.clone()).unwrap();

        let mut second_sheet = sheet;
        second_sheet.teacher_present = false;
        let second = store.save_attendance(second_sheet).unwrap();

        assert_eq!(store.attendance_records.len(), 1);
        assert_eq!(first.record.id, second.record.id);
        assert!(!store.attendance_records.as_slice()[0].teacher_present);
        // one work log per class and date
        assert_eq!(store.ta_work_logs.len(), 1);
    }

    #[test]
    fn test_save_writes_assistant_work_log() {
        let mut store = make_store();
        let sheet = store.open_attendance_sheet("C1", make_date(10)).unwrap();
        let saved = store.save_attendance(sheet).unwrap();

        let log = saved.work_log.unwrap();
        assert_eq!(log.total_hours, Decimal::new(15, 1));
        assert_eq!(log.pay_amount, dec(67_500));
        assert_eq!(log.class_id.as_deref(), Some("C1"));
        assert_eq!(log.description, "Class support: Kids English");
    }

    #[test]
    fn test_save_rejects_unknown_class() {
        let mut store = make_store();
        let mut sheet = store.open_attendance_sheet("C1", make_date(10)).unwrap();
        sheet.class_id = "C9".to_string();
        assert!(matches!(
            store.save_attendance(sheet),
            Err(CenterError::Validation { .. })
        ));
        assert!(store.attendance_records.is_empty());
    }

    #[test]
    fn test_makeup_leaves_waitlist_and_cancel_returns_it() {
        let mut store = make_store();
        let mut sheet = store.open_attendance_sheet("C1", make_date(10)).unwrap();
        mark(&mut sheet, "S1", AttendanceStatus::AbsentMakeup);
        let saved = store.save_attendance(sheet).unwrap();

        let waitlist = store.waitlist();
        assert_eq!(waitlist.len(), 1);
        assert_eq!(waitlist[0].student_id, "S1");
        assert_eq!(waitlist[0].date, make_date(10));

        let lesson = store
            .schedule_makeup(MakeupDraft {
                attendance_id: saved.record.id.clone(),
                student_id: "S1".to_string(),
                date: make_date(12),
                start_time: time(18, 0),
                end_time: time(19, 30),
                staff: StaffAssignment::Teacher("T1".to_string()),
                teacher_pay: dec(200_000),
            })
            .unwrap();
        assert_eq!(lesson.original_class_id, "C1");
        assert!(store.waitlist().is_empty());

        let cancelled = store
            .resolve_makeup(&lesson.id, MakeupOutcome::Cancelled)
            .unwrap();
        assert_eq!(cancelled.status, MakeupStatus::Cancelled);
        assert_eq!(store.waitlist().len(), 1);

        assert!(matches!(
            store.resolve_makeup(&lesson.id, MakeupOutcome::Completed),
            Err(CenterError::InvalidTransition { .. })
        ));
        assert!(matches!(
            store.resolve_makeup("MAKEUP-9", MakeupOutcome::Completed),
            Err(CenterError::NotFound { .. })
        ));
    }

    #[test]
    fn test_assistant_led_makeup_has_no_teacher_pay() {
        let mut store = make_store();
        let mut sheet = store.open_attendance_sheet("C1", make_date(10)).unwrap();
        mark(&mut sheet, "S1", AttendanceStatus::AbsentMakeup);
        let saved = store.save_attendance(sheet).unwrap();

        let lesson = store
            .schedule_makeup(MakeupDraft {
                attendance_id: saved.record.id,
                student_id: "S1".to_string(),
                date: make_date(12),
                start_time: time(17, 0),
                end_time: time(18, 0),
                staff: StaffAssignment::Assistant("TA1".to_string()),
                teacher_pay: dec(200_000),
            })
            .unwrap();
        assert_eq!(lesson.teacher_pay, Decimal::ZERO);
        assert_eq!(lesson.staff(), Some(StaffAssignment::Assistant("TA1".to_string())));
    }

    #[test]
    fn test_manual_work_log_descriptions() {
        let mut store = make_store();
        let free = store
            .add_work_log(WorkLogDraft {
                assistant_id: "TA1".to_string(),
                date: make_date(5),
                start_time: time(9, 0),
                end_time: time(11, 0),
                class_id: None,
                description: None,
            })
            .unwrap();
        assert_eq!(free.description, "Part-time work");
        assert_eq!(free.pay_amount, dec(90_000));

        let linked = store
            .add_work_log(WorkLogDraft {
                assistant_id: "TA1".to_string(),
                date: make_date(6),
                start_time: time(9, 0),
                end_time: time(10, 0),
                class_id: Some("C1".to_string()),
                description: None,
            })
            .unwrap();
        assert_eq!(linked.description, "Class support: Kids English");
        // newest first
        assert_eq!(store.ta_work_logs.as_slice()[0].id, linked.id);
    }

    #[test]
    fn test_agenda_lists_class_and_makeup() {
        let mut store = make_store();
        let mut sheet = store.open_attendance_sheet("C1", make_date(10)).unwrap();
        mark(&mut sheet, "S1", AttendanceStatus::AbsentMakeup);
        let saved = store.save_attendance(sheet).unwrap();
        store
            .schedule_makeup(MakeupDraft {
                attendance_id: saved.record.id,
                student_id: "S1".to_string(),
                date: make_date(17),
                start_time: time(16, 0),
                end_time: time(17, 0),
                staff: StaffAssignment::Teacher("T1".to_string()),
                teacher_pay: dec(200_000),
            })
            .unwrap();

        let agenda = store.day_agenda(make_date(17));
        assert_eq!(agenda.len(), 2);
        assert_eq!(agenda[0].start_time, time(16, 0));
        assert!(store.day_agenda(make_date(18)).is_empty());
    }
}
