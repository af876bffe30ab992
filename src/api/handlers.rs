//! HTTP request handlers for the classroom ledger API.
//!
//! This module contains the handler functions for all API endpoints. Each
//! request is tagged with a correlation id that appears in every log line
//! written while serving it.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::CenterResult;
use crate::persistence::export_snapshot;
use crate::store::{
    AssistantDraft, AttendanceSheet, ClassDraft, EnrollmentDraft, PaymentDraft, StudentDraft,
    TeacherDraft, TransactionDraft, WorkLogDraft,
};

use super::request::{
    AgendaQuery, ClassStatusRequest, ClassTermRequest, EditTransactionRequest, ExpiringQuery,
    OverrideTotalsRequest, PeriodQuery, ResolveMakeupRequest, ScheduleMakeupRequest, SheetQuery,
    TransactionQuery,
};
use super::response::{ApiError, ApiErrorResponse, ExportResponse, SyncStatusResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/:id", put(update_student).delete(delete_student))
        .route("/teachers", get(list_teachers).post(create_teacher))
        .route("/teachers/:id", put(update_teacher).delete(delete_teacher))
        .route("/assistants", get(list_assistants).post(create_assistant))
        .route(
            "/assistants/:id",
            put(update_assistant).delete(delete_assistant),
        )
        .route("/classes", get(list_classes).post(create_class))
        .route("/classes/:id", put(update_class).delete(delete_class))
        .route("/classes/:id/status", put(set_class_status))
        .route("/enrollments", get(list_enrollments).post(create_enrollment))
        .route("/enrollments/class-term", post(enroll_for_class_term))
        .route("/enrollments/progress", get(all_progress))
        .route("/enrollments/pending", get(pending_payments))
        .route("/enrollments/expiring", get(expiring_enrollments))
        .route(
            "/enrollments/:id",
            get(enrollment_progress).delete(delete_enrollment),
        )
        .route("/enrollments/:id/payments", post(record_payment))
        .route("/enrollments/:id/totals", put(override_totals))
        .route("/attendance", get(list_attendance).post(save_attendance))
        .route("/attendance/sheet", get(open_attendance_sheet))
        .route("/makeups", get(list_makeups).post(schedule_makeup))
        .route("/makeups/waitlist", get(waitlist))
        .route("/makeups/:id/resolve", post(resolve_makeup))
        .route("/work-logs", get(list_work_logs).post(add_work_log))
        .route("/work-logs/:id", delete(delete_work_log))
        .route("/payroll", get(payroll_overview))
        .route("/payroll/teachers/:id", get(teacher_payroll))
        .route("/payroll/assistants/:id", get(assistant_payroll))
        .route("/transactions", get(list_transactions).post(add_transaction))
        .route(
            "/transactions/:id",
            patch(edit_transaction).delete(delete_transaction),
        )
        .route("/finance/summary", get(finance_summary))
        .route("/schedule/agenda", get(day_agenda))
        .route("/export", post(export))
        .route("/sync/status", get(sync_status))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn respond<T: Serialize>(correlation_id: Uuid, status: StatusCode, result: CenterResult<T>) -> Response {
    match result {
        Ok(body) => json_response(status, body),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Request failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Unwraps a JSON body or builds the error response for it.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(json_response(StatusCode::BAD_REQUEST, error))
}

/// Unwraps a query string or builds the error response for it.
fn parse_query<T>(
    correlation_id: Uuid,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, Response> {
    query.map(|Query(q)| q).map_err(|rejection| {
        let message = rejection.body_text();
        warn!(correlation_id = %correlation_id, error = %message, "Invalid query string");
        json_response(StatusCode::BAD_REQUEST, ApiError::validation_error(message))
    })
}

macro_rules! try_parse {
    ($parsed:expr) => {
        match $parsed {
            Ok(value) => value,
            Err(response) => return response,
        }
    };
}

// ---- students, teachers, assistants ----

async fn list_students(State(state): State<AppState>) -> Response {
    let students = state.read(|s, _| s.students.as_slice().to_vec()).await;
    json_response(StatusCode::OK, students)
}

async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<StudentDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Creating student");
    let draft = try_parse!(parse_body(correlation_id, payload));
    let result = state.mutate(|s, _| s.create_student(draft)).await;
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StudentDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, student_id = %id, "Updating student");
    let draft = try_parse!(parse_body(correlation_id, payload));
    let result = state.mutate(|s, _| s.update_student(&id, draft)).await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn delete_student(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, student_id = %id, "Deleting student");
    let result = state.mutate(|s, _| s.delete_student(&id)).await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn list_teachers(State(state): State<AppState>) -> Response {
    let teachers = state.read(|s, _| s.teachers.as_slice().to_vec()).await;
    json_response(StatusCode::OK, teachers)
}

async fn create_teacher(
    State(state): State<AppState>,
    payload: Result<Json<TeacherDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Creating teacher");
    let draft = try_parse!(parse_body(correlation_id, payload));
    let result = state.mutate(|s, _| s.create_teacher(draft)).await;
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TeacherDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, teacher_id = %id, "Updating teacher");
    let draft = try_parse!(parse_body(correlation_id, payload));
    let result = state.mutate(|s, _| s.update_teacher(&id, draft)).await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn delete_teacher(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, teacher_id = %id, "Deleting teacher");
    let result = state.mutate(|s, _| s.delete_teacher(&id)).await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn list_assistants(State(state): State<AppState>) -> Response {
    let assistants = state.read(|s, _| s.assistants.as_slice().to_vec()).await;
    json_response(StatusCode::OK, assistants)
}

async fn create_assistant(
    State(state): State<AppState>,
    payload: Result<Json<AssistantDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Creating assistant");
    let draft = try_parse!(parse_body(correlation_id, payload));
    let result = state.mutate(|s, _| s.create_assistant(draft)).await;
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn update_assistant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AssistantDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, assistant_id = %id, "Updating assistant");
    let draft = try_parse!(parse_body(correlation_id, payload));
    let result = state.mutate(|s, _| s.update_assistant(&id, draft)).await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn delete_assistant(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, assistant_id = %id, "Deleting assistant");
    let result = state.mutate(|s, _| s.delete_assistant(&id)).await;
    respond(correlation_id, StatusCode::OK, result)
}

// ---- classes ----

async fn list_classes(State(state): State<AppState>) -> Response {
    let classes = state.read(|s, _| s.classes.as_slice().to_vec()).await;
    json_response(StatusCode::OK, classes)
}

async fn create_class(
    State(state): State<AppState>,
    payload: Result<Json<ClassDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Creating class");
    let draft = try_parse!(parse_body(correlation_id, payload));
    let result = state.mutate(|s, _| s.create_class(draft)).await;
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ClassDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, class_id = %id, "Updating class");
    let draft = try_parse!(parse_body(correlation_id, payload));
    let result = state.mutate(|s, _| s.update_class(&id, draft)).await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn set_class_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ClassStatusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = try_parse!(parse_body(correlation_id, payload));
    info!(correlation_id = %correlation_id, class_id = %id, status = ?request.status, "Changing class status");
    let result = state
        .mutate(|s, _| s.set_class_status(&id, request.status))
        .await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn delete_class(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, class_id = %id, "Deleting class");
    let result = state.mutate(|s, _| s.delete_class(&id)).await;
    respond(correlation_id, StatusCode::OK, result)
}

// ---- enrollments ----

async fn list_enrollments(State(state): State<AppState>) -> Response {
    let enrollments = state.read(|s, _| s.enrollments.as_slice().to_vec()).await;
    json_response(StatusCode::OK, enrollments)
}

async fn create_enrollment(
    State(state): State<AppState>,
    payload: Result<Json<EnrollmentDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let draft = try_parse!(parse_body(correlation_id, payload));
    info!(
        correlation_id = %correlation_id,
        student_id = %draft.student_id,
        class_id = %draft.class_id,
        "Creating enrollment"
    );
    let result = state
        .mutate(|s, config| s.create_enrollment(draft, config.finance()))
        .await;
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn enroll_for_class_term(
    State(state): State<AppState>,
    payload: Result<Json<ClassTermRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = try_parse!(parse_body(correlation_id, payload));
    info!(
        correlation_id = %correlation_id,
        student_id = %request.student_id,
        class_id = %request.class_id,
        "Enrolling for class term"
    );
    let result = state
        .mutate(|s, config| {
            s.enroll_for_class_term(&request.student_id, &request.class_id, config.finance())
        })
        .await;
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn all_progress(State(state): State<AppState>) -> Response {
    let progress = state.read(|s, _| s.all_progress()).await;
    json_response(StatusCode::OK, progress)
}

async fn enrollment_progress(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.read(|s, _| s.enrollment_progress(&id)).await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn delete_enrollment(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, enrollment_id = %id, "Deleting enrollment");
    let result = state.mutate(|s, _| s.delete_enrollment(&id)).await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PaymentDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let draft = try_parse!(parse_body(correlation_id, payload));
    info!(
        correlation_id = %correlation_id,
        enrollment_id = %id,
        amount = %draft.amount,
        "Recording payment"
    );
    let result = state
        .mutate(|s, config| s.record_payment(&id, draft, config.finance()))
        .await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn override_totals(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<OverrideTotalsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, enrollment_id = %id, "Overriding enrollment totals");
    let request = try_parse!(parse_body(correlation_id, payload));
    let result = state
        .mutate(|s, _| s.override_totals(&id, request.material_fee, request.total_tuition))
        .await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn pending_payments(State(state): State<AppState>) -> Response {
    let pending = state
        .read(|s, _| s.pending_payments().into_iter().cloned().collect::<Vec<_>>())
        .await;
    json_response(StatusCode::OK, pending)
}

async fn expiring_enrollments(
    State(state): State<AppState>,
    query: Result<Query<ExpiringQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_parse!(parse_query(correlation_id, query));
    let expiring = state
        .read(|s, config| {
            s.expiring_enrollments(
                query
                    .threshold
                    .unwrap_or(config.finance().expiring_threshold),
            )
        })
        .await;
    json_response(StatusCode::OK, expiring)
}

// ---- attendance and makeups ----

async fn list_attendance(State(state): State<AppState>) -> Response {
    let records = state
        .read(|s, _| s.attendance_records.as_slice().to_vec())
        .await;
    json_response(StatusCode::OK, records)
}

async fn open_attendance_sheet(
    State(state): State<AppState>,
    query: Result<Query<SheetQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_parse!(parse_query(correlation_id, query));
    let result = state
        .read(|s, _| s.open_attendance_sheet(&query.class_id, query.date))
        .await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn save_attendance(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceSheet>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let sheet = try_parse!(parse_body(correlation_id, payload));
    info!(
        correlation_id = %correlation_id,
        class_id = %sheet.class_id,
        date = %sheet.date,
        "Saving attendance"
    );
    let result = state.mutate(|s, _| s.save_attendance(sheet)).await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn list_makeups(State(state): State<AppState>) -> Response {
    let makeups = state.read(|s, _| s.makeup_lessons.as_slice().to_vec()).await;
    json_response(StatusCode::OK, makeups)
}

async fn waitlist(State(state): State<AppState>) -> Response {
    let items = state.read(|s, _| s.waitlist()).await;
    json_response(StatusCode::OK, items)
}

async fn schedule_makeup(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleMakeupRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = try_parse!(parse_body(correlation_id, payload));
    info!(
        correlation_id = %correlation_id,
        attendance_id = %request.attendance_id,
        student_id = %request.student_id,
        "Scheduling makeup lesson"
    );
    let result = state
        .mutate(|s, config| s.schedule_makeup(request.into_draft(config.finance())))
        .await;
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn resolve_makeup(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ResolveMakeupRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = try_parse!(parse_body(correlation_id, payload));
    info!(correlation_id = %correlation_id, makeup_id = %id, outcome = ?request.outcome, "Resolving makeup lesson");
    let result = state
        .mutate(|s, _| s.resolve_makeup(&id, request.outcome))
        .await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn list_work_logs(State(state): State<AppState>) -> Response {
    let logs = state.read(|s, _| s.ta_work_logs.as_slice().to_vec()).await;
    json_response(StatusCode::OK, logs)
}

async fn add_work_log(
    State(state): State<AppState>,
    payload: Result<Json<WorkLogDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let draft = try_parse!(parse_body(correlation_id, payload));
    info!(correlation_id = %correlation_id, assistant_id = %draft.assistant_id, "Adding work log");
    let result = state.mutate(|s, _| s.add_work_log(draft)).await;
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn delete_work_log(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, log_id = %id, "Deleting work log");
    let result = state.mutate(|s, _| s.delete_work_log(&id)).await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn day_agenda(
    State(state): State<AppState>,
    query: Result<Query<AgendaQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_parse!(parse_query(correlation_id, query));
    let agenda = state.read(|s, _| s.day_agenda(query.date)).await;
    json_response(StatusCode::OK, agenda)
}

// ---- payroll ----

async fn payroll_overview(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let period = try_parse!(parse_query(correlation_id, query)).period();
    info!(correlation_id = %correlation_id, "Calculating payroll overview");
    let results = state
        .read(|s, _| s.payroll_overview(period.as_ref()))
        .await;
    json_response(StatusCode::OK, results)
}

async fn teacher_payroll(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let period = try_parse!(parse_query(correlation_id, query)).period();
    info!(correlation_id = %correlation_id, teacher_id = %id, "Calculating teacher payroll");
    let result = state
        .read(|s, _| s.teacher_payroll(&id, period.as_ref()))
        .await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn assistant_payroll(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let period = try_parse!(parse_query(correlation_id, query)).period();
    info!(correlation_id = %correlation_id, assistant_id = %id, "Calculating assistant payroll");
    let result = state
        .read(|s, _| s.assistant_payroll(&id, period.as_ref()))
        .await;
    respond(correlation_id, StatusCode::OK, result)
}

// ---- finance ----

async fn list_transactions(
    State(state): State<AppState>,
    query: Result<Query<TransactionQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_parse!(parse_query(correlation_id, query));
    let transactions = state
        .read(|s, _| {
            s.transactions_of(query.kind)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
        .await;
    json_response(StatusCode::OK, transactions)
}

async fn add_transaction(
    State(state): State<AppState>,
    payload: Result<Json<TransactionDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let draft = try_parse!(parse_body(correlation_id, payload));
    info!(correlation_id = %correlation_id, amount = %draft.amount, "Adding transaction");
    let result = state.mutate(|s, _| s.add_transaction(draft)).await;
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn edit_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EditTransactionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, transaction_id = %id, "Editing transaction");
    let request = try_parse!(parse_body(correlation_id, payload));
    let result = state
        .mutate(|s, _| s.edit_transaction_text(&id, request.category, request.description))
        .await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn delete_transaction(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, transaction_id = %id, "Deleting transaction");
    let result = state.mutate(|s, _| s.delete_transaction(&id)).await;
    respond(correlation_id, StatusCode::OK, result)
}

async fn finance_summary(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let period = try_parse!(parse_query(correlation_id, query)).period();
    let summary = state
        .read(|s, _| s.finance_summary(period.as_ref()))
        .await;
    json_response(StatusCode::OK, summary)
}

// ---- persistence ----

async fn export(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Exporting snapshot");
    let store = state.snapshot().await;
    let sync = state.config().sync();
    let result = export_snapshot(
        &store,
        &sync.export_dir,
        &sync.export_prefix,
        Utc::now().date_naive(),
    )
    .await
    .map(|path| ExportResponse { path });
    respond(correlation_id, StatusCode::OK, result)
}

async fn sync_status(State(state): State<AppState>) -> Response {
    json_response(
        StatusCode::OK,
        SyncStatusResponse {
            status: state.sync().status(),
            load_source: state.load_source(),
        },
    )
}
