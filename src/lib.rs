//! Back office for a language training center.
//!
//! This crate keeps the center's students, staff, classes, enrollments,
//! attendance, makeup lessons, timesheets and transactions in one in-memory
//! store, and derives from them the session counts, tuition balances and
//! payroll the center runs on. Changes are cached locally at once and
//! replicated to a remote document store after a quiet period.
//!
//! # Modules
//!
//! - [`calculation`]: pure session, consumption and payroll arithmetic
//! - [`store`]: the entity store and its operations
//! - [`persistence`]: remote document store, local cache and startup load
//! - [`sync`]: debounced replication of the store
//! - [`api`]: the HTTP surface

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod persistence;
pub mod store;
pub mod sync;
