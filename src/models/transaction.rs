//! Financial transaction model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::serde_formats::optional_id;

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

/// An entry in the append-only financial ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier for the entry.
    pub id: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Category, usually one of the suggested categories.
    pub category: String,
    /// Amount, always positive.
    pub amount: Decimal,
    /// Date of the entry.
    pub date: NaiveDate,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Student the money came from, for tuition payments.
    #[serde(
        default,
        deserialize_with = "optional_id::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub student_id: Option<String>,
    /// Enrollment the payment was applied to.
    #[serde(
        default,
        deserialize_with = "optional_id::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub enrollment_id: Option<String>,
}
