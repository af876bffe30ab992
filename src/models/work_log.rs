//! Assistant timesheet model.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::serde_formats::{hh_mm, optional_id};

/// A timesheet entry for an assistant.
///
/// `total_hours` and `pay_amount` are fixed when the entry is created, so a
/// later change to the assistant's hourly rate does not touch past entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaWorkLog {
    /// Unique identifier for the entry.
    pub id: String,
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
    /// Hours between clock-in and clock-out, never negative.
    pub total_hours: Decimal,
    /// `total_hours × hourly rate` at the time of entry.
    pub pay_amount: Decimal,
    /// The class supported, if any.
    #[serde(
        default,
        deserialize_with = "optional_id::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub class_id: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}
