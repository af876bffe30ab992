//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and its associated structures
//! that capture all outputs from a payroll calculation, including pay lines,
//! totals, and audit traces.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayPeriod;

/// Represents the category of pay for a pay line.
///
/// # Example
///
/// ```
/// use classroom_ledger::models::PayCategory;
///
/// let category = PayCategory::RegularSession;
/// assert_eq!(format!("{:?}", category), "RegularSession");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayCategory {
    /// A regular class session taught by a teacher, paid at the tier rate.
    RegularSession,
    /// A completed makeup lesson, paid at its fixed teacher pay.
    MakeupSession,
    /// Hours logged by an assistant.
    AssistantHours,
}

/// Represents a single line item in a payroll calculation.
///
/// # Example
///
/// ```
/// use classroom_ledger::models::{PayLine, PayCategory};
/// use rust_decimal::Decimal;
/// use chrono::NaiveDate;
///
/// let pay_line = PayLine {
///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     source_id: "ATT-1".to_string(),
///     class_id: Some("C1".to_string()),
///     category: PayCategory::RegularSession,
///     headcount: Some(4),
///     hours: None,
///     rate: Decimal::new(250_000, 0),
///     amount: Decimal::new(250_000, 0),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayLine {
    /// The date this pay line applies to.
    pub date: NaiveDate,
    /// The attendance record, makeup lesson or work log this line came from.
    pub source_id: String,
    /// The class involved, if any.
    pub class_id: Option<String>,
    /// The category of pay.
    pub category: PayCategory,
    /// Roster size used for rate resolution, for regular sessions.
    pub headcount: Option<u32>,
    /// Hours worked, for assistant hours.
    pub hours: Option<Decimal>,
    /// The rate applied (per session, or per hour for assistants).
    pub rate: Decimal,
    /// The total amount for this pay line.
    pub amount: Decimal,
}

/// Summary totals for a payroll calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayTotals {
    /// Sum of all pay line amounts.
    pub gross_pay: Decimal,
    /// Number of regular sessions paid.
    pub regular_sessions: u32,
    /// Number of makeup lessons paid.
    pub makeup_sessions: u32,
    /// Total assistant hours.
    pub total_hours: Decimal,
}

/// Represents a single step in the calculation audit trail.
///
/// Each step records which rule was applied, what inputs it received,
/// what output it produced, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStep {
    /// The sequential number of this step in the calculation.
    pub step_number: u32,
    /// A unique identifier for the rule that was applied.
    pub rule_id: String,
    /// A human-readable name for the rule.
    pub rule_name: String,
    /// The input values provided to the rule (as JSON).
    pub input: serde_json::Value,
    /// The output values produced by the rule (as JSON).
    pub output: serde_json::Value,
    /// A human-readable explanation of why this result was produced.
    pub reasoning: String,
}

/// Represents a warning generated during calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A unique code identifying the warning type.
    pub code: String,
    /// A human-readable warning message.
    pub message: String,
    /// The severity level of the warning (e.g., "low", "medium", "high").
    pub severity: String,
}

/// Contains the complete audit trail for a payroll calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Appends a step, numbering it after the existing ones.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: &str, message: String, severity: &str) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message,
            severity: severity.to_string(),
        });
    }
}

/// Whether a payroll result is for a teacher or an assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// A teacher.
    Teacher,
    /// A teaching assistant.
    Assistant,
}

/// The complete result of a payroll calculation for one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollResult {
    /// A unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the ledger that performed the calculation.
    pub engine_version: String,
    /// The staff member the result is for.
    pub staff_id: String,
    /// Teacher or assistant.
    pub role: StaffRole,
    /// The date range filter, if one was applied.
    pub pay_period: Option<PayPeriod>,
    /// Individual pay lines, in source order.
    pub pay_lines: Vec<PayLine>,
    /// Summary totals.
    pub totals: PayTotals,
    /// The complete audit trail for this calculation.
    pub audit_trace: AuditTrace,
}

impl PayrollResult {
    /// Returns the pay lines of one category.
    pub fn lines_of(&self, category: PayCategory) -> impl Iterator<Item = &PayLine> {
        self.pay_lines.iter().filter(move |l| l.category == category)
    }
}
