//! HTTP API module for the classroom ledger.
//!
//! This module provides the REST endpoints over the center store: roster
//! management, enrollments and payments, attendance and makeups, payroll,
//! the finance ledger, export and sync status.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AgendaQuery, ClassStatusRequest, ClassTermRequest, EditTransactionRequest, ExpiringQuery,
    OverrideTotalsRequest, PeriodQuery, ResolveMakeupRequest, ScheduleMakeupRequest, SheetQuery,
    TransactionQuery,
};
pub use response::{ApiError, ApiErrorResponse, ExportResponse, SyncStatusResponse};
pub use state::AppState;
