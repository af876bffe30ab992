//! Calculation logic for the classroom ledger.
//!
//! This module contains the pure functions the store builds on: session
//! arithmetic over weekly schedules, tiered rate resolution, session
//! consumption, the makeup waitlist, the day agenda, assistant hours and
//! payroll aggregation.

mod agenda;
mod consumption;
mod payroll;
mod rate_resolution;
mod sessions;
mod waitlist;
mod work_hours;

pub use agenda::{AgendaEntry, AgendaItem, day_agenda, is_substitute};
pub use consumption::{consumed_sessions, is_enrolled_on, remaining_sessions, valid_students_on};
pub use payroll::{
    RegularSession, TeacherPayrollInput, calculate_assistant_payroll, calculate_teacher_payroll,
    class_headcount, teacher_makeup_lessons, teacher_work_log, total_salary,
};
pub use rate_resolution::{RateLookupResult, RateSource, rate_for_headcount, resolve_rate};
pub use sessions::{end_date_from_session_count, sessions_between};
pub use waitlist::{WaitlistItem, find_waitlist_item, makeup_waitlist};
pub use work_hours::{WorkedTime, compute_worked_time, hours_between};
