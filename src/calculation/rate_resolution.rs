//! Per-session rate lookup for teachers.
//!
//! A teacher's salary tiers map a headcount range to a flat per-session rate.
//! Tiers are scanned in stored order and the first one covering the headcount
//! wins; with tiers sorted ascending that gives the lower range priority
//! where ranges overlap.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, Teacher};

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// A salary tier covered the headcount.
    Tier,
    /// No tier matched; the teacher's fallback rate was used.
    Fallback,
}

/// The result of a rate lookup, including the rate and audit step.
#[derive(Debug, Clone)]
pub struct RateLookupResult {
    /// The per-session rate.
    pub rate: Decimal,
    /// Whether a tier or the fallback supplied the rate.
    pub source: RateSource,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Returns the per-session rate a teacher earns at `headcount`.
///
/// # Example
///
/// ```
/// use classroom_ledger::calculation::rate_for_headcount;
/// use classroom_ledger::models::{SalaryTier, Teacher};
/// use rust_decimal::Decimal;
///
/// let teacher = Teacher {
///     id: "T1".to_string(),
///     name: "Teacher Wang".to_string(),
///     phone: String::new(),
///     hourly_rate: Decimal::new(200_000, 0),
///     salary_tiers: vec![
///         SalaryTier { min_students: 1, max_students: 2, rate: Decimal::new(150_000, 0) },
///         SalaryTier { min_students: 3, max_students: 5, rate: Decimal::new(250_000, 0) },
///     ],
///     expertise: vec![],
/// };
///
/// assert_eq!(rate_for_headcount(&teacher, 2), Decimal::new(150_000, 0));
/// assert_eq!(rate_for_headcount(&teacher, 0), Decimal::new(200_000, 0));
/// ```
pub fn rate_for_headcount(teacher: &Teacher, headcount: u32) -> Decimal {
    teacher
        .salary_tiers
        .iter()
        .find(|tier| tier.covers(headcount))
        .map(|tier| tier.rate)
        .unwrap_or(teacher.hourly_rate)
}

/// Resolves the per-session rate and records how it was chosen.
///
/// # Arguments
///
/// * `teacher` - The teacher whose tiers are consulted
/// * `headcount` - The class roster size
/// * `step_number` - The number given to the produced audit step
pub fn resolve_rate(teacher: &Teacher, headcount: u32, step_number: u32) -> RateLookupResult {
    let matched = teacher
        .salary_tiers
        .iter()
        .position(|tier| tier.covers(headcount));

    let (rate, source, reasoning) = match matched {
        Some(index) => {
            let tier = &teacher.salary_tiers[index];
            (
                tier.rate,
                RateSource::Tier,
                format!(
                    "Headcount {} falls in tier {}-{}: {} per session",
                    headcount, tier.min_students, tier.max_students, tier.rate
                ),
            )
        }
        None => (
            teacher.hourly_rate,
            RateSource::Fallback,
            format!(
                "No tier covers headcount {}, using fallback rate {}",
                headcount, teacher.hourly_rate
            ),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "rate_for_headcount".to_string(),
        rule_name: "Rate For Headcount".to_string(),
        input: serde_json::json!({
            "teacher_id": teacher.id,
            "headcount": headcount,
            "tier_count": teacher.salary_tiers.len()
        }),
        output: serde_json::json!({
            "rate": rate.to_string(),
            "source": source,
            "tier_index": matched
        }),
        reasoning,
    };

    RateLookupResult {
        rate,
        source,
        audit_step,
    }
}
