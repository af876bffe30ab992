//! The financial ledger: manual entries, text edits, deletes and totals.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::collection::generate_id;
use super::drafts::TransactionDraft;
use super::CenterStore;
use crate::error::{CenterError, CenterResult, FieldViolation};
use crate::models::{PayPeriod, Transaction, TransactionType, in_period};

/// Ledger totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    /// Sum of income entries.
    pub total_income: Decimal,
    /// Sum of expense entries.
    pub total_expense: Decimal,
    /// Income minus expense.
    pub net: Decimal,
    /// Tuition still owed across all enrollments.
    pub outstanding_tuition: Decimal,
}

impl CenterStore {
    /// Appends a manual ledger entry.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> CenterResult<Transaction> {
        draft.validate(self)?;
        let transaction = Transaction {
            id: generate_id("TX"),
            kind: draft.kind,
            category: draft.category,
            amount: draft.amount,
            date: draft.date,
            description: draft.description,
            student_id: draft.student_id,
            enrollment_id: None,
        };
        info!(
            transaction_id = %transaction.id,
            kind = ?transaction.kind,
            amount = %transaction.amount,
            "Added transaction"
        );
        self.transactions.push_front(transaction.clone());
        Ok(transaction)
    }

    /// Edits the free-text fields of an entry.
    ///
    /// Amount, date and links are fixed once written, so editing never
    /// touches the enrollment a payment was applied to.
    pub fn edit_transaction_text(
        &mut self,
        transaction_id: &str,
        category: Option<String>,
        description: Option<String>,
    ) -> CenterResult<Transaction> {
        if category.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(CenterError::Validation {
                entity: "transaction".to_string(),
                violations: vec![FieldViolation {
                    field: "category".to_string(),
                    message: "must not be empty".to_string(),
                }],
            });
        }
        let transaction = self.transactions.require_mut(transaction_id)?;
        if let Some(category) = category {
            transaction.category = category;
        }
        if let Some(description) = description {
            transaction.description = description;
        }
        info!(transaction_id = %transaction_id, "Edited transaction");
        Ok(transaction.clone())
    }

    /// Removes an entry. The enrollment it may have paid is left untouched.
    pub fn delete_transaction(&mut self, transaction_id: &str) -> CenterResult<Transaction> {
        let transaction = self
            .transactions
            .remove(transaction_id)
            .ok_or_else(|| CenterError::not_found("transaction", transaction_id))?;
        info!(transaction_id = %transaction_id, amount = %transaction.amount, "Deleted transaction");
        Ok(transaction)
    }

    /// Entries of one kind, or all entries, newest first.
    pub fn transactions_of(&self, kind: Option<TransactionType>) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| kind.is_none_or(|k| t.kind == k))
            .collect()
    }

    /// Totals over the entries dated within `period`, or all entries.
    pub fn finance_summary(&self, period: Option<&PayPeriod>) -> FinanceSummary {
        let mut summary = FinanceSummary::default();
        for transaction in self.transactions.iter().filter(|t| in_period(period, t.date)) {
            match transaction.kind {
                TransactionType::Income => summary.total_income += transaction.amount,
                TransactionType::Expense => summary.total_expense += transaction.amount,
            }
        }
        summary.net = summary.total_income - summary.total_expense;
        summary.outstanding_tuition = self
            .enrollments
            .iter()
            .map(|e| e.outstanding_balance())
            .sum();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FinanceConfig;
    use crate::models::{Enrollment, PaymentStatus};
    use crate::store::PaymentDraft;
    use chrono::NaiveDate;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn make_date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn draft(kind: TransactionType, category: &str, amount: i64, day: u32) -> TransactionDraft {
        TransactionDraft {
            kind,
            category: category.to_string(),
            amount: dec(amount),
            date: make_date(day),
            description: String::new(),
            student_id: None,
        }
    }

    #[test]
    fn test_add_and_summarize() {
        let mut store = CenterStore::default();
        store
            .add_transaction(draft(TransactionType::Income, "Events", 3_000_000, 2))
            .unwrap();
        store
            .add_transaction(draft(TransactionType::Expense, "Rent", 1_200_000, 5))
            .unwrap();
        store
            .add_transaction(draft(TransactionType::Expense, "Utilities", 300_000, 20))
            .unwrap();

        let summary = store.finance_summary(None);
        assert_eq!(summary.total_income, dec(3_000_000));
        assert_eq!(summary.total_expense, dec(1_500_000));
        assert_eq!(summary.net, dec(1_500_000));

        let period = PayPeriod {
            start_date: make_date(1),
            end_date: make_date(10),
        };
        assert_eq!(store.finance_summary(Some(&period)).net, dec(1_800_000));

        assert_eq!(store.transactions_of(Some(TransactionType::Expense)).len(), 2);
        assert_eq!(store.transactions_of(None).len(), 3);
        // newest first
        assert_eq!(store.transactions_of(None)[0].category, "Utilities");
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let mut store = CenterStore::default();
        let result = store.add_transaction(draft(TransactionType::Expense, "Rent", 0, 1));
        assert!(matches!(result, Err(CenterError::Validation { .. })));
        assert!(store.transactions.is_empty());
    }

    #[test]
    fn test_edit_text_only() {
        let mut store = CenterStore::default();
        let tx = store
            .add_transaction(draft(TransactionType::Income, "Other", 500_000, 1))
            .unwrap();
        let edited = store
            .edit_transaction_text(&tx.id, Some("Textbook sales".to_string()), None)
            .unwrap();
        assert_eq!(edited.category, "Textbook sales");
        assert_eq!(edited.amount, dec(500_000));
        assert!(store.edit_transaction_text(&tx.id, Some(" ".to_string()), None).is_err());
    }

    #[test]
    fn test_deleting_payment_leaves_enrollment_paid() {
        let mut store = CenterStore::default();
        store.enrollments.push(Enrollment {
            id: "E1".to_string(),
            student_id: "S1".to_string(),
            class_id: "C1".to_string(),
            start_date: make_date(1),
            end_date: make_date(31),
            calculated_sessions: 4,
            tuition_per_session: dec(250_000),
            material_fee: Decimal::ZERO,
            total_tuition: dec(1_000_000),
            paid_amount: Decimal::ZERO,
            status: PaymentStatus::Unpaid,
        });
        let receipt = store
            .record_payment(
                "E1",
                PaymentDraft {
                    amount: dec(1_000_000),
                    date: Some(make_date(3)),
                },
                &FinanceConfig::default(),
            )
            .unwrap();

        store.delete_transaction(&receipt.transaction.id).unwrap();
        let enrollment = store.enrollments.get("E1").unwrap();
        assert_eq!(enrollment.paid_amount, dec(1_000_000));
        assert_eq!(enrollment.status, PaymentStatus::Paid);
        assert!(store.transactions.is_empty());
        assert_eq!(store.finance_summary(None).outstanding_tuition, Decimal::ZERO);
    }
}
