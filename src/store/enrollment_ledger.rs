//! Enrollment lifecycle: creation, payments, overrides and progress views.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::collection::generate_id;
use super::drafts::{EnrollmentDraft, PaymentDraft};
use super::CenterStore;
use crate::calculation::{
    consumed_sessions, end_date_from_session_count, remaining_sessions, sessions_between,
};
use crate::config::FinanceConfig;
use crate::error::{CenterError, CenterResult, FieldViolation};
use crate::models::{Enrollment, PaymentStatus, Transaction, TransactionType};

/// An enrollment after a payment, with the ledger entry it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    /// The updated enrollment.
    pub enrollment: Enrollment,
    /// The income entry appended for the payment.
    pub transaction: Transaction,
}

/// How far a student has got through an enrollment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentProgress {
    /// The enrollment.
    pub enrollment_id: String,
    /// The enrolled student.
    pub student_id: String,
    /// The class.
    pub class_id: String,
    /// Sessions purchased.
    pub calculated_sessions: u32,
    /// Sessions consumed by attendance and completed makeups.
    pub attended: u32,
    /// Sessions left, never below zero.
    pub remaining: u32,
    /// Unpaid tuition, never below zero.
    pub outstanding_balance: Decimal,
    /// Payment status.
    pub status: PaymentStatus,
}

impl CenterStore {
    /// Creates an enrollment and records the initial payment, if any.
    ///
    /// The session count is fixed here from the window and the class's
    /// current schedule and is not recomputed when the schedule changes.
    ///
    /// # Arguments
    ///
    /// * `draft` - The enrollment to create
    /// * `finance` - Supplies the category of the payment transaction
    ///
    /// # Returns
    ///
    /// The stored enrollment, or a validation/capacity error with nothing
    /// written.
    pub fn create_enrollment(
        &mut self,
        draft: EnrollmentDraft,
        finance: &FinanceConfig,
    ) -> CenterResult<Enrollment> {
        draft.validate(self)?;
        let class = self.classes.require(&draft.class_id)?;

        let end_date = match (draft.end_date, draft.session_count) {
            (Some(end), _) => end,
            (None, count) => {
                end_date_from_session_count(draft.start_date, count.unwrap_or(0), &class.schedule)
            }
        };
        let calculated_sessions =
            sessions_between(Some(draft.start_date), Some(end_date), &class.schedule);
        let tuition_per_session = draft
            .tuition_per_session
            .unwrap_or(class.tuition_per_session);
        let total_tuition =
            Enrollment::formula_total(calculated_sessions, tuition_per_session, draft.material_fee);

        let enrollment = Enrollment {
            id: generate_id("E"),
            student_id: draft.student_id,
            class_id: draft.class_id,
            start_date: draft.start_date,
            end_date,
            calculated_sessions,
            tuition_per_session,
            material_fee: draft.material_fee,
            total_tuition,
            paid_amount: draft.initial_payment,
            status: PaymentStatus::derive(draft.initial_payment, total_tuition),
        };

        info!(
            enrollment_id = %enrollment.id,
            student_id = %enrollment.student_id,
            class_id = %enrollment.class_id,
            sessions = calculated_sessions,
            total = %total_tuition,
            "Created enrollment"
        );

        if draft.initial_payment > Decimal::ZERO {
            let description = format!(
                "Tuition payment from {} - {}",
                self.student_name(&enrollment.student_id).unwrap_or("N/A"),
                self.class_name(&enrollment.class_id).unwrap_or("N/A"),
            );
            let transaction = tuition_transaction(
                &enrollment,
                draft.initial_payment,
                draft.payment_date,
                description,
                finance,
            );
            info!(transaction_id = %transaction.id, amount = %transaction.amount, "Recorded initial payment");
            self.transactions.push_front(transaction);
        }

        self.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    /// Enrolls a student for the class's whole term at the class rate.
    ///
    /// # Errors
    ///
    /// Returns [`CenterError::Validation`] on `studentId` if the student
    /// already holds an enrollment in the class.
    pub fn enroll_for_class_term(
        &mut self,
        student_id: &str,
        class_id: &str,
        finance: &FinanceConfig,
    ) -> CenterResult<Enrollment> {
        let class = self.classes.require(class_id)?;
        if self
            .enrollments
            .iter()
            .any(|e| e.class_id == class_id && e.student_id == student_id)
        {
            return Err(CenterError::Validation {
                entity: "enrollment".to_string(),
                violations: vec![FieldViolation {
                    field: "studentId".to_string(),
                    message: "student is already enrolled in this class".to_string(),
                }],
            });
        }
        let draft = EnrollmentDraft {
            student_id: student_id.to_string(),
            class_id: class_id.to_string(),
            start_date: class.start_date,
            end_date: Some(class.end_date),
            session_count: None,
            tuition_per_session: Some(class.tuition_per_session),
            material_fee: Decimal::ZERO,
            initial_payment: Decimal::ZERO,
            payment_date: None,
        };
        self.create_enrollment(draft, finance)
    }

    /// Records a later payment against an enrollment.
    ///
    /// # Errors
    ///
    /// Returns [`CenterError::InvalidPayment`] for a non-positive amount and
    /// [`CenterError::NotFound`] for an unknown enrollment. Nothing is
    /// written in either case.
    pub fn record_payment(
        &mut self,
        enrollment_id: &str,
        draft: PaymentDraft,
        finance: &FinanceConfig,
    ) -> CenterResult<PaymentReceipt> {
        draft.validate()?;
        let description = {
            let enrollment = self.enrollments.require(enrollment_id)?;
            format!(
                "Tuition debt collected from {} - {}",
                self.student_name(&enrollment.student_id).unwrap_or("N/A"),
                self.class_name(&enrollment.class_id).unwrap_or("N/A"),
            )
        };

        let enrollment = self.enrollments.require_mut(enrollment_id)?;
        enrollment.apply_payment(draft.amount)?;
        let enrollment = enrollment.clone();

        let transaction =
            tuition_transaction(&enrollment, draft.amount, draft.date, description, finance);
        info!(
            enrollment_id = %enrollment_id,
            amount = %draft.amount,
            paid = %enrollment.paid_amount,
            status = ?enrollment.status,
            "Recorded payment"
        );
        self.transactions.push_front(transaction.clone());

        Ok(PaymentReceipt {
            enrollment,
            transaction,
        })
    }

    /// Overrides the material fee and/or the billed total.
    ///
    /// A new material fee alone recomputes the total from the formula; an
    /// explicit total is stored as given. The status is re-derived either way.
    pub fn override_totals(
        &mut self,
        enrollment_id: &str,
        material_fee: Option<Decimal>,
        total_tuition: Option<Decimal>,
    ) -> CenterResult<Enrollment> {
        let mut violations = Vec::new();
        for (field, value) in [("materialFee", material_fee), ("totalTuition", total_tuition)] {
            if value.is_some_and(|v| v < Decimal::ZERO) {
                violations.push(FieldViolation {
                    field: field.to_string(),
                    message: "must not be negative".to_string(),
                });
            }
        }
        if !violations.is_empty() {
            return Err(CenterError::Validation {
                entity: "enrollment".to_string(),
                violations,
            });
        }

        let enrollment = self.enrollments.require_mut(enrollment_id)?;
        if let Some(fee) = material_fee {
            enrollment.material_fee = fee;
        }
        enrollment.total_tuition = total_tuition.unwrap_or_else(|| {
            Enrollment::formula_total(
                enrollment.calculated_sessions,
                enrollment.tuition_per_session,
                enrollment.material_fee,
            )
        });
        enrollment.refresh_status();

        if enrollment.has_total_drift() {
            warn!(
                enrollment_id = %enrollment_id,
                total = %enrollment.total_tuition,
                "Enrollment total no longer matches sessions x rate + material fee"
            );
        }
        info!(enrollment_id = %enrollment_id, status = ?enrollment.status, "Overrode enrollment totals");
        Ok(enrollment.clone())
    }

    /// Deletes a single enrollment. Its transactions are kept.
    pub fn delete_enrollment(&mut self, enrollment_id: &str) -> CenterResult<Enrollment> {
        let enrollment = self
            .enrollments
            .remove(enrollment_id)
            .ok_or_else(|| CenterError::not_found("enrollment", enrollment_id))?;
        info!(enrollment_id = %enrollment_id, "Deleted enrollment");
        Ok(enrollment)
    }

    /// Sessions left on an enrollment.
    pub fn remaining_sessions(&self, enrollment_id: &str) -> CenterResult<u32> {
        let enrollment = self.enrollments.require(enrollment_id)?;
        Ok(remaining_sessions(
            enrollment,
            self.attendance_records.as_slice(),
            self.makeup_lessons.as_slice(),
        ))
    }

    /// Progress of one enrollment.
    pub fn enrollment_progress(&self, enrollment_id: &str) -> CenterResult<EnrollmentProgress> {
        let enrollment = self.enrollments.require(enrollment_id)?;
        Ok(self.progress_of(enrollment))
    }

    /// Progress of every enrollment, in stored order.
    pub fn all_progress(&self) -> Vec<EnrollmentProgress> {
        self.enrollments.iter().map(|e| self.progress_of(e)).collect()
    }

    /// Enrollments not yet fully paid.
    pub fn pending_payments(&self) -> Vec<&Enrollment> {
        self.enrollments
            .iter()
            .filter(|e| e.status != PaymentStatus::Paid)
            .collect()
    }

    /// Enrollments with at most `threshold` sessions left.
    pub fn expiring_enrollments(&self, threshold: u32) -> Vec<EnrollmentProgress> {
        self.all_progress()
            .into_iter()
            .filter(|p| p.remaining <= threshold)
            .collect()
    }

    fn progress_of(&self, enrollment: &Enrollment) -> EnrollmentProgress {
        let records = self.attendance_records.as_slice();
        let makeups = self.makeup_lessons.as_slice();
        EnrollmentProgress {
            enrollment_id: enrollment.id.clone(),
            student_id: enrollment.student_id.clone(),
            class_id: enrollment.class_id.clone(),
            calculated_sessions: enrollment.calculated_sessions,
            attended: consumed_sessions(
                &enrollment.student_id,
                &enrollment.class_id,
                records,
                makeups,
            ),
            remaining: remaining_sessions(enrollment, records, makeups),
            outstanding_balance: enrollment.outstanding_balance(),
            status: enrollment.status,
        }
    }
}

fn tuition_transaction(
    enrollment: &Enrollment,
    amount: Decimal,
    date: Option<NaiveDate>,
    description: String,
    finance: &FinanceConfig,
) -> Transaction {
    Transaction {
        id: generate_id("TX"),
        kind: TransactionType::Income,
        category: finance.tuition_category.clone(),
        amount,
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
        description,
        student_id: Some(enrollment.student_id.clone()),
        enrollment_id: Some(enrollment.id.clone()),
    }
}
