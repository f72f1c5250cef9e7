//! Student endpoints. Each one builds a single message and dispatches it.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::StudentId;
use domain::{
    DisenrollCommand, EditPersonalInfoCommand, EnrollCommand, GetListQuery, Messages,
    RegisterCommand, StudentSummary, TransferCommand, UnregisterCommand,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub messages: Messages,
}

// -- Request types --
//
// Bodies use camelCase field names (`course1Grade`); unknown fields are rejected.

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub enrolled: Option<String>,
    pub number: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewStudentDto {
    pub name: String,
    pub email: String,
    pub course1: Option<String>,
    pub course1_grade: Option<String>,
    pub course2: Option<String>,
    pub course2_grade: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudentPersonalInfoDto {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudentEnrollmentDto {
    pub course: String,
    pub grade: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudentTransferDto {
    pub course: String,
    pub grade: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudentDisenrollmentDto {
    #[serde(default)]
    pub comment: String,
}

fn ok() -> Json<Value> {
    Json(json!({}))
}

// -- Handlers --

/// GET /api/students: list students, optionally filtered.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<StudentSummary>>, ApiError> {
    let query = GetListQuery::new(params.enrolled, params.number);
    let students = state.messages.dispatch(query).await?;
    Ok(Json(students))
}

/// POST /api/students: register a student with up to two courses.
#[tracing::instrument(skip(state, dto))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<NewStudentDto>,
) -> Result<Json<Value>, ApiError> {
    let cmd = RegisterCommand::new(
        dto.name,
        dto.email,
        dto.course1,
        dto.course1_grade,
        dto.course2,
        dto.course2_grade,
    );
    state.messages.dispatch(cmd).await?;
    Ok(ok())
}

/// DELETE /api/students/{id}: unregister a student.
#[tracing::instrument(skip(state))]
pub async fn unregister(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let cmd = UnregisterCommand::new(StudentId::new(id));
    state.messages.dispatch(cmd).await?;
    Ok(ok())
}

/// PUT /api/students/{id}: replace name and email.
#[tracing::instrument(skip(state, dto))]
pub async fn edit_personal_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(dto): Json<StudentPersonalInfoDto>,
) -> Result<Json<Value>, ApiError> {
    let cmd = EditPersonalInfoCommand::new(StudentId::new(id), dto.name, dto.email);
    state.messages.dispatch(cmd).await?;
    Ok(ok())
}

/// POST /api/students/{id}/enrollments: enroll in a course.
#[tracing::instrument(skip(state))]
pub async fn enroll(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(dto): Json<StudentEnrollmentDto>,
) -> Result<Json<Value>, ApiError> {
    let cmd = EnrollCommand::new(StudentId::new(id), dto.course, dto.grade);
    state.messages.dispatch(cmd).await?;
    Ok(ok())
}

/// PUT /api/students/{id}/enrollments/{number}: move an enrollment.
#[tracing::instrument(skip(state))]
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Path((id, number)): Path<(i64, usize)>,
    Json(dto): Json<StudentTransferDto>,
) -> Result<Json<Value>, ApiError> {
    let cmd = TransferCommand::new(StudentId::new(id), number, dto.course, dto.grade);
    state.messages.dispatch(cmd).await?;
    Ok(ok())
}

/// POST /api/students/{id}/enrollments/{number}/deletion: disenroll with a comment.
#[tracing::instrument(skip(state))]
pub async fn disenroll(
    State(state): State<Arc<AppState>>,
    Path((id, number)): Path<(i64, usize)>,
    Json(dto): Json<StudentDisenrollmentDto>,
) -> Result<Json<Value>, ApiError> {
    let cmd = DisenrollCommand::new(StudentId::new(id), number, dto.comment);
    state.messages.dispatch(cmd).await?;
    Ok(ok())
}
