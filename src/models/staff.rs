//! Teacher and assistant models.
//!
//! Teachers are paid per regular session from a headcount-tiered rate table;
//! assistants are paid by the hour from their timesheets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ActivityStatus;

/// A headcount range mapped to a flat per-session pay rate.
///
/// Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryTier {
    /// Smallest headcount covered by this tier.
    pub min_students: u32,
    /// Largest headcount covered by this tier.
    pub max_students: u32,
    /// Pay for one session taught at this headcount.
    pub rate: Decimal,
}

impl SalaryTier {
    /// Returns true if `count` lies within the tier's inclusive range.
    ///
    /// # Example
    ///
    /// ```
    /// use classroom_ledger::models::SalaryTier;
    /// use rust_decimal::Decimal;
    ///
    /// let tier = SalaryTier { min_students: 3, max_students: 5, rate: Decimal::new(250000, 0) };
    /// assert!(tier.covers(3));
    /// assert!(tier.covers(5));
    /// assert!(!tier.covers(6));
    /// ```
    pub fn covers(&self, count: u32) -> bool {
        self.min_students <= count && count <= self.max_students
    }
}

/// A teacher at the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    /// Unique identifier for the teacher.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Fallback per-session rate used when no tier matches the headcount.
    pub hourly_rate: Decimal,
    /// Tiers sorted ascending by `min_students`.
    #[serde(default)]
    pub salary_tiers: Vec<SalaryTier>,
    /// Expertise tags (e.g., "HSK 6", "Kids").
    #[serde(default)]
    pub expertise: Vec<String>,
}

/// A teaching assistant paid by the hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    /// Unique identifier for the assistant.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Pay per hour worked.
    pub hourly_rate: Decimal,
    /// Whether the assistant still works at the center.
    #[serde(default)]
    pub status: ActivityStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_teacher_with_tiers() {
        let json = r#"{
            "id": "T1",
            "name": "Teacher Wang",
            "phone": "0888111222",
            "hourlyRate": 250000,
            "expertise": ["HSK 6", "Conversation"],
            "salaryTiers": [
                {"minStudents": 1, "maxStudents": 2, "rate": 150000},
                {"minStudents": 3, "maxStudents": 5, "rate": 250000}
            ]
        }"#;

        let teacher: Teacher = serde_json::from_str(json).unwrap();
        assert_eq!(teacher.hourly_rate, Decimal::new(250000, 0));
        assert_eq!(teacher.salary_tiers.len(), 2);
        assert_eq!(teacher.salary_tiers[1].min_students, 3);
        assert_eq!(teacher.expertise, vec!["HSK 6", "Conversation"]);
    }

    #[test]
    fn test_teacher_without_tiers_defaults_to_empty() {
        let teacher: Teacher =
            serde_json::from_str(r#"{"id": "T2", "name": "Li", "hourlyRate": "200000"}"#).unwrap();
        assert!(teacher.salary_tiers.is_empty());
        assert!(teacher.expertise.is_empty());
    }

    #[test]
    fn test_tier_bounds_are_inclusive() {
        let tier = SalaryTier {
            min_students: 1,
            max_students: 2,
            rate: Decimal::new(150000, 0),
        };
        assert!(!tier.covers(0));
        assert!(tier.covers(1));
        assert!(tier.covers(2));
        assert!(!tier.covers(3));
    }

    #[test]
    fn test_assistant_round_trip() {
        let assistant = Assistant {
            id: "TA1".to_string(),
            name: "Le Thu Trang".to_string(),
            phone: "0912344556".to_string(),
            hourly_rate: Decimal::new(45000, 0),
            status: ActivityStatus::Active,
        };

        let json = serde_json::to_string(&assistant).unwrap();
        assert!(json.contains("\"hourlyRate\""));
        let deserialized: Assistant = serde_json::from_str(&json).unwrap();
        assert_eq!(assistant, deserialized);
    }
}
