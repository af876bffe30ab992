//! Student model.

use serde::{Deserialize, Serialize};

/// Whether a person is currently attending or working at the center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    /// Currently attending or working.
    #[default]
    Active,
    /// Left the center; kept for history.
    Inactive,
}

/// A student of the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Unique identifier for the student.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Whether the student is still studying.
    #[serde(default)]
    pub status: ActivityStatus,
}
