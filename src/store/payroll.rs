//! Payroll queries over the stored records.

use tracing::info;

use super::CenterStore;
use crate::calculation::{TeacherPayrollInput, calculate_assistant_payroll, calculate_teacher_payroll};
use crate::error::CenterResult;
use crate::models::{PayPeriod, PayrollResult, Teacher};

impl CenterStore {
    /// Computes a teacher's pay, optionally restricted to a pay period.
    pub fn teacher_payroll(
        &self,
        teacher_id: &str,
        pay_period: Option<&PayPeriod>,
    ) -> CenterResult<PayrollResult> {
        let teacher = self.teachers.require(teacher_id)?;
        let result = self.payroll_for(teacher, pay_period);
        info!(
            teacher_id = %teacher_id,
            gross_pay = %result.totals.gross_pay,
            regular_sessions = result.totals.regular_sessions,
            makeup_sessions = result.totals.makeup_sessions,
            "Calculated teacher payroll"
        );
        Ok(result)
    }

    /// Computes an assistant's pay from their timesheet entries.
    pub fn assistant_payroll(
        &self,
        assistant_id: &str,
        pay_period: Option<&PayPeriod>,
    ) -> CenterResult<PayrollResult> {
        self.assistants.require(assistant_id)?;
        let result =
            calculate_assistant_payroll(assistant_id, self.ta_work_logs.as_slice(), pay_period);
        info!(
            assistant_id = %assistant_id,
            gross_pay = %result.totals.gross_pay,
            hours = %result.totals.total_hours,
            "Calculated assistant payroll"
        );
        Ok(result)
    }

    /// Payroll for every teacher and then every assistant.
    pub fn payroll_overview(&self, pay_period: Option<&PayPeriod>) -> Vec<PayrollResult> {
        let teachers = self.teachers.iter().map(|t| self.payroll_for(t, pay_period));
        let assistants = self.assistants.iter().map(|a| {
            calculate_assistant_payroll(&a.id, self.ta_work_logs.as_slice(), pay_period)
        });
        teachers.chain(assistants).collect()
    }

    fn payroll_for(&self, teacher: &Teacher, pay_period: Option<&PayPeriod>) -> PayrollResult {
        calculate_teacher_payroll(TeacherPayrollInput {
            teacher,
            classes: self.classes.as_slice(),
            records: self.attendance_records.as_slice(),
            enrollments: self.enrollments.as_slice(),
            makeups: self.makeup_lessons.as_slice(),
            pay_period,
        })
    }
}
