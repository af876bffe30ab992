//! Enrollment model and payment status derivation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CenterError, CenterResult};

/// How much of an enrollment's tuition has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Paid amount covers the total tuition.
    Paid,
    /// Something has been paid but less than the total.
    Partial,
    /// Nothing has been paid.
    Unpaid,
}

impl PaymentStatus {
    /// Derives the status from the paid amount and the total tuition.
    ///
    /// Covering the total wins over everything else, so a zero-tuition
    /// enrollment is paid even when nothing was paid. Overpayment is paid.
    ///
    /// # Example
    ///
    /// ```
    /// use classroom_ledger::models::PaymentStatus;
    /// use rust_decimal::Decimal;
    ///
    /// let total = Decimal::new(1_000_000, 0);
    /// assert_eq!(PaymentStatus::derive(Decimal::ZERO, total), PaymentStatus::Unpaid);
    /// assert_eq!(PaymentStatus::derive(Decimal::new(500_000, 0), total), PaymentStatus::Partial);
    /// assert_eq!(PaymentStatus::derive(Decimal::new(1_200_000, 0), total), PaymentStatus::Paid);
    /// ```
    pub fn derive(paid_amount: Decimal, total_tuition: Decimal) -> Self {
        if paid_amount >= total_tuition {
            PaymentStatus::Paid
        } else if paid_amount > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

/// A student's paid claim on a bounded number of sessions of one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    /// Unique identifier for the enrollment.
    pub id: String,
    /// The enrolled student.
    pub student_id: String,
    /// The class enrolled in.
    pub class_id: String,
    /// First day of the paid window (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the paid window (inclusive).
    pub end_date: NaiveDate,
    /// Sessions purchased, fixed when the enrollment was created.
    pub calculated_sessions: u32,
    /// Tuition charged per session.
    pub tuition_per_session: Decimal,
    /// One-off material fee.
    #[serde(default)]
    pub material_fee: Decimal,
    /// Amount billed; normally the formula total but may be overridden.
    pub total_tuition: Decimal,
    /// Sum of all payments so far.
    #[serde(default)]
    pub paid_amount: Decimal,
    /// Status derived from `paid_amount` and `total_tuition`.
    pub status: PaymentStatus,
}

impl Enrollment {
    /// Computes `sessions × tuition_per_session + material_fee`.
    pub fn formula_total(sessions: u32, tuition_per_session: Decimal, material_fee: Decimal) -> Decimal {
        Decimal::from(sessions) * tuition_per_session + material_fee
    }

    /// Returns true if `date` lies within the paid window (inclusive).
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Returns the unpaid part of the tuition, never below zero.
    pub fn outstanding_balance(&self) -> Decimal {
        (self.total_tuition - self.paid_amount).max(Decimal::ZERO)
    }

    /// Returns true if the stored total differs from the formula total.
    pub fn has_total_drift(&self) -> bool {
        self.total_tuition
            != Self::formula_total(
                self.calculated_sessions,
                self.tuition_per_session,
                self.material_fee,
            )
    }

    /// Re-derives `status` from the current amounts.
    pub fn refresh_status(&mut self) {
        self.status = PaymentStatus::derive(self.paid_amount, self.total_tuition);
    }

    /// Adds a payment and re-derives the status.
    ///
    /// # Errors
    ///
    /// Returns [`CenterError::InvalidPayment`] and leaves the enrollment
    /// untouched if `amount` is not positive.
    pub fn apply_payment(&mut self, amount: Decimal) -> CenterResult<()> {
        if amount <= Decimal::ZERO {
            return Err(CenterError::InvalidPayment { amount });
        }
        self.paid_amount += amount;
        self.refresh_status();
        Ok(())
    }
}
