//! Payroll aggregation for teachers and assistants.
//!
//! Teachers earn the tier rate for every regular session they were present
//! at, with headcount taken from the full class roster, plus the fixed pay of
//! every completed makeup lesson they led. Assistants earn the pay stored on
//! their timesheet entries.

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::rate_resolution::{RateSource, resolve_rate};
use crate::models::{
    AttendanceRecord, AuditTrace, Class, Enrollment, MakeupLesson, MakeupStatus, PayCategory,
    PayLine, PayPeriod, PayTotals, PayrollResult, StaffRole, TaWorkLog, Teacher, in_period,
};

/// One regular session a teacher is paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegularSession {
    /// The attendance record of the session.
    pub attendance_id: String,
    /// The class taught.
    pub class_id: String,
    /// The date taught.
    pub date: NaiveDate,
    /// Number of enrollments in the class.
    pub headcount: u32,
    /// Per-session rate at that headcount.
    pub rate: Decimal,
}

/// Counts the enrollments of a class, regardless of their windows.
pub fn class_headcount(class_id: &str, enrollments: &[Enrollment]) -> u32 {
    enrollments.iter().filter(|e| e.class_id == class_id).count() as u32
}

/// Lists the regular sessions a teacher was present at.
pub fn teacher_work_log(
    teacher: &Teacher,
    records: &[AttendanceRecord],
    enrollments: &[Enrollment],
) -> Vec<RegularSession> {
    records
        .iter()
        .filter(|r| r.teacher_id == teacher.id && r.teacher_present)
        .map(|r| {
            let headcount = class_headcount(&r.class_id, enrollments);
            RegularSession {
                attendance_id: r.id.clone(),
                class_id: r.class_id.clone(),
                date: r.date,
                headcount,
                rate: super::rate_for_headcount(teacher, headcount),
            }
        })
        .collect()
}

/// Lists the completed makeup lessons a teacher led.
pub fn teacher_makeup_lessons<'a>(
    teacher_id: &str,
    makeups: &'a [MakeupLesson],
) -> Vec<&'a MakeupLesson> {
    makeups
        .iter()
        .filter(|m| m.teacher_id.as_deref() == Some(teacher_id) && m.status == MakeupStatus::Completed)
        .collect()
}

/// Sums regular session rates and makeup pay.
pub fn total_salary(sessions: &[RegularSession], makeups: &[&MakeupLesson]) -> Decimal {
    sessions.iter().map(|s| s.rate).sum::<Decimal>()
        + makeups.iter().map(|m| m.teacher_pay).sum::<Decimal>()
}

/// Inputs for a teacher payroll calculation.
pub struct TeacherPayrollInput<'a> {
    /// The teacher being paid.
    pub teacher: &'a Teacher,
    /// Every class, used to flag sessions of deleted classes.
    pub classes: &'a [Class],
    /// Every attendance record.
    pub records: &'a [AttendanceRecord],
    /// Every enrollment.
    pub enrollments: &'a [Enrollment],
    /// Every makeup lesson.
    pub makeups: &'a [MakeupLesson],
    /// Restricts the calculation to a date range.
    pub pay_period: Option<&'a PayPeriod>,
}

/// Computes a teacher's payroll with a full audit trace.
pub fn calculate_teacher_payroll(input: TeacherPayrollInput<'_>) -> PayrollResult {
    let start_time = Instant::now();
    let teacher = input.teacher;
    let mut trace = AuditTrace::default();
    let mut pay_lines = Vec::new();

    let sessions: Vec<RegularSession> = teacher_work_log(teacher, input.records, input.enrollments)
        .into_iter()
        .filter(|s| in_period(input.pay_period, s.date))
        .collect();

    for session in &sessions {
        if !input.classes.iter().any(|c| c.id == session.class_id) {
            trace.warn(
                "CLASS_NOT_FOUND",
                format!(
                    "Attendance {} refers to missing class {}; paid at headcount {}",
                    session.attendance_id, session.class_id, session.headcount
                ),
                "medium",
            );
        }

        let step_number = trace.steps.len() as u32 + 1;
        let lookup = resolve_rate(teacher, session.headcount, step_number);
        if lookup.source == RateSource::Fallback {
            trace.warn(
                "FALLBACK_RATE",
                format!(
                    "No salary tier covers {} students in class {} on {}",
                    session.headcount, session.class_id, session.date
                ),
                "low",
            );
        }
        trace.steps.push(lookup.audit_step);

        pay_lines.push(PayLine {
            date: session.date,
            source_id: session.attendance_id.clone(),
            class_id: Some(session.class_id.clone()),
            category: PayCategory::RegularSession,
            headcount: Some(session.headcount),
            hours: None,
            rate: session.rate,
            amount: session.rate,
        });
    }

    let makeups: Vec<&MakeupLesson> = teacher_makeup_lessons(&teacher.id, input.makeups)
        .into_iter()
        .filter(|m| in_period(input.pay_period, m.date))
        .collect();

    for makeup in &makeups {
        trace.record(
            "makeup_pay",
            "Makeup Lesson Pay",
            serde_json::json!({
                "makeup_id": makeup.id,
                "student_id": makeup.student_id,
                "date": makeup.date.to_string()
            }),
            serde_json::json!({ "amount": makeup.teacher_pay.to_string() }),
            format!("Completed makeup lesson pays fixed {}", makeup.teacher_pay),
        );
        pay_lines.push(PayLine {
            date: makeup.date,
            source_id: makeup.id.clone(),
            class_id: Some(makeup.original_class_id.clone()),
            category: PayCategory::MakeupSession,
            headcount: None,
            hours: None,
            rate: makeup.teacher_pay,
            amount: makeup.teacher_pay,
        });
    }

    let gross_pay = total_salary(&sessions, &makeups);
    trace.record(
        "total_salary",
        "Total Salary",
        serde_json::json!({
            "regular_sessions": sessions.len(),
            "makeup_sessions": makeups.len()
        }),
        serde_json::json!({ "gross_pay": gross_pay.to_string() }),
        format!(
            "{} regular sessions and {} makeup lessons total {}",
            sessions.len(),
            makeups.len(),
            gross_pay
        ),
    );

    trace.duration_us = start_time.elapsed().as_micros() as u64;

    PayrollResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        staff_id: teacher.id.clone(),
        role: StaffRole::Teacher,
        pay_period: input.pay_period.copied(),
        pay_lines,
        totals: PayTotals {
            gross_pay,
            regular_sessions: sessions.len() as u32,
            makeup_sessions: makeups.len() as u32,
            total_hours: Decimal::ZERO,
        },
        audit_trace: trace,
    }
}

/// Computes an assistant's payroll from their timesheet entries.
///
/// Each entry contributes the pay stored on it, so later rate changes do not
/// alter past entries.
pub fn calculate_assistant_payroll(
    assistant_id: &str,
    logs: &[TaWorkLog],
    pay_period: Option<&PayPeriod>,
) -> PayrollResult {
    let start_time = Instant::now();
    let mut trace = AuditTrace::default();

    let pay_lines: Vec<PayLine> = logs
        .iter()
        .filter(|l| l.assistant_id == assistant_id && in_period(pay_period, l.date))
        .map(|l| PayLine {
            date: l.date,
            source_id: l.id.clone(),
            class_id: l.class_id.clone(),
            category: PayCategory::AssistantHours,
            headcount: None,
            hours: Some(l.total_hours),
            rate: if l.total_hours.is_zero() {
                Decimal::ZERO
            } else {
                (l.pay_amount / l.total_hours).round_dp(2)
            },
            amount: l.pay_amount,
        })
        .collect();

    let gross_pay: Decimal = pay_lines.iter().map(|l| l.amount).sum();
    let total_hours: Decimal = pay_lines.iter().filter_map(|l| l.hours).sum();

    trace.record(
        "assistant_pay",
        "Assistant Timesheet Pay",
        serde_json::json!({
            "assistant_id": assistant_id,
            "entries": pay_lines.len()
        }),
        serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "total_hours": total_hours.to_string()
        }),
        format!(
            "{} timesheet entries totalling {} hours pay {}",
            pay_lines.len(),
            total_hours,
            gross_pay
        ),
    );
    trace.duration_us = start_time.elapsed().as_micros() as u64;

    PayrollResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        staff_id: assistant_id.to_string(),
        role: StaffRole::Assistant,
        pay_period: pay_period.copied(),
        pay_lines,
        totals: PayTotals {
            gross_pay,
            regular_sessions: 0,
            makeup_sessions: 0,
            total_hours,
        },
        audit_trace: trace,
    }
}
