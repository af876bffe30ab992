//! The in-memory repository of all center data.
//!
//! [`CenterStore`] holds one [`Collection`] per entity kind and is the only
//! place entities are created, changed or deleted. Every mutation validates
//! its draft first and commits only when every rule holds, so a rejected
//! operation leaves the store untouched. Cascading deletes live here too.
//!
//! # Example
//!
//! ```
//! use classroom_ledger::store::{CenterStore, StudentDraft};
//!
//! let mut store = CenterStore::default();
//! let student = store
//!     .create_student(StudentDraft {
//!         name: "Tran Thi B".to_string(),
//!         ..Default::default()
//!     })
//!     .unwrap();
//! assert_eq!(store.student_name(&student.id), Some("Tran Thi B"));
//! ```

mod attendance_book;
mod center_store;
mod collection;
mod drafts;
mod enrollment_ledger;
mod finance;
mod payroll;
mod roster;

pub use attendance_book::SavedAttendance;
pub use center_store::{CenterStore, DeleteOutcome, OrphanReport};
pub use collection::{Collection, Entity, generate_id};
pub use drafts::{
    AssistantDraft, AttendanceSheet, ClassDraft, EnrollmentDraft, MAX_SESSION_COUNT, MakeupDraft,
    PaymentDraft, StudentDraft, TeacherDraft, TransactionDraft, WorkLogDraft,
};
pub use enrollment_ledger::{EnrollmentProgress, PaymentReceipt};
pub use finance::FinanceSummary;
