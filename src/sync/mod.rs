//! Background replication of local changes.

mod scheduler;

pub use scheduler::{SyncScheduler, SyncStatus};
