//! Request types for the classroom ledger API.
//!
//! Most endpoints accept the store's draft types directly. The types here
//! cover the remaining bodies and query strings.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::FinanceConfig;
use crate::models::serde_formats::hh_mm;
use crate::models::{ClassStatus, MakeupOutcome, PayPeriod, StaffAssignment, TransactionType};
use crate::store::MakeupDraft;

/// Body of `POST /enrollments/class-term`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTermRequest {
    /// The student to enroll.
    pub student_id: String,
    /// The class whose term to cover.
    pub class_id: String,
}

/// Body of `PUT /enrollments/:id/totals`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideTotalsRequest {
    /// New material fee.
    #[serde(default)]
    pub material_fee: Option<Decimal>,
    /// New billed total.
    #[serde(default)]
    pub total_tuition: Option<Decimal>,
}

/// Body of `PUT /classes/:id/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassStatusRequest {
    /// The new status.
    pub status: ClassStatus,
}

/// Body of `POST /makeups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMakeupRequest {
    /// The attendance record marking the absence.
    pub attendance_id: String,
    /// The student owed the makeup.
    pub student_id: String,
    /// Date of the lesson.
    pub date: NaiveDate,
    /// Start time, `HH:MM`.
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    /// End time, `HH:MM`.
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
    /// Who leads the lesson.
    pub staff: StaffAssignment,
    /// Teacher pay; the configured default when absent.
    #[serde(default)]
    pub teacher_pay: Option<Decimal>,
}

impl ScheduleMakeupRequest {
    /// Converts the request into a draft, filling in the default pay.
    pub fn into_draft(self, finance: &FinanceConfig) -> MakeupDraft {
        MakeupDraft {
            attendance_id: self.attendance_id,
            student_id: self.student_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            staff: self.staff,
            teacher_pay: self.teacher_pay.unwrap_or(finance.default_makeup_pay),
        }
    }
}

/// Body of `POST /makeups/:id/resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveMakeupRequest {
    /// `completed` or `cancelled`.
    pub outcome: MakeupOutcome,
}

/// Body of `PATCH /transactions/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditTransactionRequest {
    /// New category.
    #[serde(default)]
    pub category: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Query of `GET /attendance/sheet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetQuery {
    /// The class.
    pub class_id: String,
    /// The meeting date.
    pub date: NaiveDate,
}

/// Query of `GET /schedule/agenda`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaQuery {
    /// The day to list.
    pub date: NaiveDate,
}

/// Optional inclusive date range used by payroll and finance queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    /// First day of the range.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the range.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl PeriodQuery {
    /// The pay period, when both ends are given.
    pub fn period(&self) -> Option<PayPeriod> {
        match (self.start_date, self.end_date) {
            (Some(start_date), Some(end_date)) => Some(PayPeriod {
                start_date,
                end_date,
            }),
            _ => None,
        }
    }
}

/// Query of `GET /transactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionQuery {
    /// Restricts the list to one kind.
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionType>,
}

/// Query of `GET /enrollments/expiring`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpiringQuery {
    /// Remaining-session threshold; the configured one when absent.
    #[serde(default)]
    pub threshold: Option<u32>,
}
