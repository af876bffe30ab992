//! Core data models for the classroom ledger.
//!
//! This module contains all the domain models used throughout the crate.
//! Every entity serializes with camelCase field names so that the whole
//! store round-trips through the persisted blob unchanged.

mod attendance;
mod class;
mod enrollment;
mod makeup;
mod pay_period;
mod payroll_result;
pub mod serde_formats;
mod staff;
mod student;
mod transaction;
mod work_log;

pub use attendance::{AttendanceRecord, AttendanceStatus, StudentAttendance};
pub use class::{Class, ClassSession, ClassStatus, WeeklySchedule};
pub use enrollment::{Enrollment, PaymentStatus};
pub use makeup::{MakeupLesson, MakeupOutcome, MakeupStatus, StaffAssignment};
pub(crate) use pay_period::in_period;
pub use pay_period::PayPeriod;
pub use payroll_result::{
    AuditStep, AuditTrace, AuditWarning, PayCategory, PayLine, PayTotals, PayrollResult,
    StaffRole,
};
pub use staff::{Assistant, SalaryTier, Teacher};
pub use student::{ActivityStatus, Student};
pub use transaction::{Transaction, TransactionType};
pub use work_log::TaWorkLog;
