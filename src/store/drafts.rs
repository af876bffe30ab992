//! Draft inputs and their staged validation.
//!
//! A draft is collected first and validated as a whole before anything is
//! written to the store. Validation reports every violated rule at once.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CenterStore;
use crate::calculation::{find_waitlist_item, is_enrolled_on};
use crate::error::{CenterError, CenterResult, FieldViolation};
use crate::models::serde_formats::{hh_mm, option_hh_mm, optional_id};
use crate::models::{
    ActivityStatus, SalaryTier, StaffAssignment, StudentAttendance, TransactionType,
    WeeklySchedule,
};

/// Collects violations for one entity kind.
struct Violations {
    entity: &'static str,
    list: Vec<FieldViolation>,
}

impl Violations {
    fn new(entity: &'static str) -> Self {
        Self {
            entity,
            list: Vec::new(),
        }
    }

    fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.list.push(FieldViolation {
                field: field.to_string(),
                message: message.to_string(),
            });
        }
    }

    fn not_blank(&mut self, value: &str, field: &str) {
        self.check(!value.trim().is_empty(), field, "must not be empty");
    }

    fn not_negative(&mut self, value: Decimal, field: &str) {
        self.check(value >= Decimal::ZERO, field, "must not be negative");
    }

    fn positive(&mut self, value: Decimal, field: &str) {
        self.check(value > Decimal::ZERO, field, "must be greater than zero");
    }

    fn finish(self) -> CenterResult<()> {
        if self.list.is_empty() {
            Ok(())
        } else {
            Err(CenterError::Validation {
                entity: self.entity.to_string(),
                violations: self.list,
            })
        }
    }
}

/// Fields of a new or edited student.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    /// Full name.
    pub name: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Whether the student is still studying.
    #[serde(default)]
    pub status: ActivityStatus,
}

impl StudentDraft {
    /// Checks the draft.
    pub fn validate(&self, _store: &CenterStore) -> CenterResult<()> {
        let mut v = Violations::new("student");
        v.not_blank(&self.name, "name");
        v.finish()
    }
}

/// Fields of a new or edited teacher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDraft {
    /// Full name.
    pub name: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Fallback per-session rate.
    pub hourly_rate: Decimal,
    /// Salary tiers in any order.
    #[serde(default)]
    pub salary_tiers: Vec<SalaryTier>,
    /// Expertise tags.
    #[serde(default)]
    pub expertise: Vec<String>,
}

impl TeacherDraft {
    /// Checks the draft.
    pub fn validate(&self, _store: &CenterStore) -> CenterResult<()> {
        let mut v = Violations::new("teacher");
        v.not_blank(&self.name, "name");
        v.not_negative(self.hourly_rate, "hourlyRate");
        for (i, tier) in self.salary_tiers.iter().enumerate() {
            let field = format!("salaryTiers[{}]", i);
            v.check(
                tier.min_students <= tier.max_students,
                &field,
                "minStudents must not exceed maxStudents",
            );
            v.not_negative(tier.rate, &field);
        }
        v.finish()
    }

    /// The tiers sorted ascending by `min_students`.
    pub fn sorted_tiers(&self) -> Vec<SalaryTier> {
        let mut tiers = self.salary_tiers.clone();
        tiers.sort_by_key(|t| t.min_students);
        tiers
    }
}

/// Fields of a new or edited assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantDraft {
    /// Full name.
    pub name: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Pay per hour worked.
    pub hourly_rate: Decimal,
    /// Whether the assistant still works at the center.
    #[serde(default)]
    pub status: ActivityStatus,
}

impl AssistantDraft {
    /// Checks the draft.
    pub fn validate(&self, _store: &CenterStore) -> CenterResult<()> {
        let mut v = Violations::new("assistant");
        v.not_blank(&self.name, "name");
        v.not_negative(self.hourly_rate, "hourlyRate");
        v.finish()
    }
}

/// Fields of a new or edited class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDraft {
    /// Class code; generated when absent.
    #[serde(default, deserialize_with = "optional_id::deserialize")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// The nominal teacher.
    pub teacher_id: String,
    /// The nominal assistant.
    #[serde(default, deserialize_with = "optional_id::deserialize")]
    pub assistant_id: Option<String>,
    /// Recurring meeting slots.
    #[serde(default)]
    pub schedule: WeeklySchedule,
    /// Default tuition per session.
    pub tuition_per_session: Decimal,
    /// First day of the class.
    pub start_date: NaiveDate,
    /// Last day of the class.
    pub end_date: NaiveDate,
    /// Capacity.
    pub max_students: u32,
}

impl ClassDraft {
    /// Checks the draft. `editing` names the class being replaced, if any.
    pub fn validate(&self, store: &CenterStore, editing: Option<&str>) -> CenterResult<()> {
        let mut v = Violations::new("class");
        v.not_blank(&self.name, "name");
        v.check(
            !self.schedule.is_empty(),
            "schedule",
            "needs at least one session",
        );
        for (i, slot) in self.schedule.sessions().iter().enumerate() {
            v.check(
                slot.start_time < slot.end_time,
                &format!("schedule[{}]", i),
                "end time must be after start time",
            );
        }
        v.not_negative(self.tuition_per_session, "tuitionPerSession");
        v.check(
            self.start_date <= self.end_date,
            "endDate",
            "must not be before startDate",
        );
        v.check(self.max_students >= 1, "maxStudents", "must be at least 1");
        v.check(
            store.teachers.contains(&self.teacher_id),
            "teacherId",
            "unknown teacher",
        );
        if let Some(assistant_id) = &self.assistant_id {
            v.check(
                store.assistants.contains(assistant_id),
                "assistantId",
                "unknown assistant",
            );
        }
        if let (None, Some(id)) = (editing, &self.id) {
            v.check(!store.classes.contains(id), "id", "already in use");
        }
        v.finish()
    }
}

/// Largest package an enrollment may buy: ten years of daily sessions.
pub const MAX_SESSION_COUNT: u32 = 3_650;

/// Fields of a new enrollment.
///
/// The window ends either at `end_date` or after `session_count` sessions;
/// exactly one of the two must be given.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDraft {
    /// The student enrolling.
    pub student_id: String,
    /// The class enrolled in.
    pub class_id: String,
    /// First day of the paid window.
    pub start_date: NaiveDate,
    /// Last day of the paid window.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Number of sessions to buy, from which the end date is derived.
    #[serde(default)]
    pub session_count: Option<u32>,
    /// Tuition per session; the class rate when absent.
    #[serde(default)]
    pub tuition_per_session: Option<Decimal>,
    /// One-off material fee.
    #[serde(default)]
    pub material_fee: Decimal,
    /// Amount paid up front.
    #[serde(default)]
    pub initial_payment: Decimal,
    /// Date of the up-front payment; today when absent.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

impl EnrollmentDraft {
    /// Checks the draft, including the class capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CenterError::Validation`] listing every broken rule, or
    /// [`CenterError::ClassFull`] if the draft is otherwise valid but the
    /// class has no free seat.
    pub fn validate(&self, store: &CenterStore) -> CenterResult<()> {
        let mut v = Violations::new("enrollment");
        v.check(
            store.students.contains(&self.student_id),
            "studentId",
            "unknown student",
        );
        let class = store.classes.get(&self.class_id);
        match class {
            Some(class) => v.check(class.is_active(), "classId", "class is closed"),
            None => v.check(false, "classId", "unknown class"),
        }
        match (self.end_date, self.session_count) {
            (Some(end), None) => v.check(
                self.start_date <= end,
                "endDate",
                "must not be before startDate",
            ),
            (None, Some(count)) => v.check(
                (1..=MAX_SESSION_COUNT).contains(&count),
                "sessionCount",
                &format!("must be between 1 and {}", MAX_SESSION_COUNT),
            ),
            _ => v.check(
                false,
                "endDate",
                "give either endDate or sessionCount",
            ),
        }
        if let Some(rate) = self.tuition_per_session {
            v.not_negative(rate, "tuitionPerSession");
        }
        v.not_negative(self.material_fee, "materialFee");
        v.not_negative(self.initial_payment, "initialPayment");
        v.finish()?;

        if let Some(class) = class {
            let others = distinct_other_students(store, &self.class_id, &self.student_id);
            if others >= class.max_students as usize {
                return Err(CenterError::ClassFull {
                    class_id: class.id.clone(),
                    max_students: class.max_students,
                });
            }
        }
        Ok(())
    }
}

/// Counts the distinct students other than `student_id` enrolled in a class.
fn distinct_other_students(store: &CenterStore, class_id: &str, student_id: &str) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    for enrollment in store
        .enrollments
        .iter()
        .filter(|e| e.class_id == class_id && e.student_id != student_id)
    {
        if !seen.contains(&enrollment.student_id.as_str()) {
            seen.push(&enrollment.student_id);
        }
    }
    seen.len()
}

/// A payment against an enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    /// Amount paid.
    pub amount: Decimal,
    /// Date paid; today when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl PaymentDraft {
    /// Checks the amount.
    ///
    /// # Errors
    ///
    /// Returns [`CenterError::InvalidPayment`] if the amount is not positive.
    pub fn validate(&self) -> CenterResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(CenterError::InvalidPayment {
                amount: self.amount,
            });
        }
        Ok(())
    }
}

/// The attendance form for one class meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSheet {
    /// The class that met.
    pub class_id: String,
    /// The date of the meeting.
    pub date: NaiveDate,
    /// Per-student statuses.
    #[serde(default)]
    pub student_statuses: Vec<StudentAttendance>,
    /// The teacher who taught.
    pub teacher_id: String,
    /// Whether that teacher was present.
    pub teacher_present: bool,
    /// The assistant working, if any.
    #[serde(default, deserialize_with = "optional_id::deserialize")]
    pub assistant_id: Option<String>,
    /// Assistant clock-in time.
    #[serde(default, with = "option_hh_mm")]
    pub ta_start_time: Option<NaiveTime>,
    /// Assistant clock-out time.
    #[serde(default, with = "option_hh_mm")]
    pub ta_end_time: Option<NaiveTime>,
}

impl AttendanceSheet {
    /// Checks the sheet against the store.
    pub fn validate(&self, store: &CenterStore) -> CenterResult<()> {
        let mut v = Violations::new("attendance");
        v.check(
            store.classes.contains(&self.class_id),
            "classId",
            "unknown class",
        );
        v.not_blank(&self.teacher_id, "teacherId");
        if let Some(assistant_id) = &self.assistant_id {
            v.check(
                store.assistants.contains(assistant_id),
                "assistantId",
                "unknown assistant",
            );
        }
        for (i, entry) in self.student_statuses.iter().enumerate() {
            v.check(
                is_enrolled_on(
                    &entry.student_id,
                    &self.class_id,
                    self.date,
                    store.enrollments.as_slice(),
                ),
                &format!("studentStatuses[{}]", i),
                "student is not enrolled in the class on this date",
            );
        }
        v.finish()
    }
}

/// Fields of a new makeup lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeupDraft {
    /// The attendance record marking the absence.
    pub attendance_id: String,
    /// The student owed the makeup.
    pub student_id: String,
    /// Date of the lesson.
    pub date: NaiveDate,
    /// Start time.
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    /// End time.
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
    /// Who leads the lesson.
    pub staff: StaffAssignment,
    /// Fixed pay for a leading teacher; ignored for assistants.
    pub teacher_pay: Decimal,
}

impl MakeupDraft {
    /// Checks the draft, including that the absence is still waitlisted.
    pub fn validate(&self, store: &CenterStore) -> CenterResult<()> {
        let mut v = Violations::new("makeup lesson");
        v.check(
            find_waitlist_item(
                &self.attendance_id,
                &self.student_id,
                store.attendance_records.as_slice(),
                store.makeup_lessons.as_slice(),
            )
            .is_some(),
            "attendanceId",
            "student is not waiting for a makeup of this session",
        );
        v.check(
            self.start_time < self.end_time,
            "endTime",
            "must be after startTime",
        );
        match &self.staff {
            StaffAssignment::Teacher(id) => {
                v.check(store.teachers.contains(id), "staff", "unknown teacher")
            }
            StaffAssignment::Assistant(id) => {
                v.check(store.assistants.contains(id), "staff", "unknown assistant")
            }
        }
        v.not_negative(self.teacher_pay, "teacherPay");
        v.finish()
    }
}

/// Fields of a manual timesheet entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogDraft {
    /// The assistant who worked.
    pub assistant_id: String,
    /// Date worked.
    pub date: NaiveDate,
    /// Clock-in time.
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    /// Clock-out time.
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
    /// The class supported, if any.
    #[serde(default, deserialize_with = "optional_id::deserialize")]
    pub class_id: Option<String>,
    /// Free-text description; derived when absent.
    #[serde(default)]
    pub description: Option<String>,
}

impl WorkLogDraft {
    /// Checks the draft.
    pub fn validate(&self, store: &CenterStore) -> CenterResult<()> {
        let mut v = Violations::new("work log");
        v.check(
            store.assistants.contains(&self.assistant_id),
            "assistantId",
            "unknown assistant",
        );
        if let Some(class_id) = &self.class_id {
            v.check(store.classes.contains(class_id), "classId", "unknown class");
        }
        v.check(
            self.start_time < self.end_time,
            "endTime",
            "must be after startTime",
        );
        v.finish()
    }
}

/// Fields of a manual ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Category.
    pub category: String,
    /// Amount.
    pub amount: Decimal,
    /// Date of the entry.
    pub date: NaiveDate,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Student the money relates to.
    #[serde(default, deserialize_with = "optional_id::deserialize")]
    pub student_id: Option<String>,
}

impl TransactionDraft {
    /// Checks the draft.
    pub fn validate(&self, _store: &CenterStore) -> CenterResult<()> {
        let mut v = Violations::new("transaction");
        v.not_blank(&self.category, "category");
        v.positive(self.amount, "amount");
        v.finish()
    }
}
