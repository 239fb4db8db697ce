use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Serialize;

use crate::auth::policy::{authorize, Action};
use crate::errors::AppError;
use crate::models::resume::{ResumeRow, ResumeView, SortOrder, StatusLogRow, StatusLogView};
use crate::models::user::User;
use crate::resumes::validation::{
    CreateResumeRequest, ListResumesQuery, UpdateResumeRequest, UpdateStatusRequest,
};
use crate::resumes::{service, transition};
use crate::response::{messages, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeletedResume {
    pub id: i64,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<CreateResumeRequest>, JsonRejection>,
) -> Result<ApiResponse<ResumeRow>, AppError> {
    let new = json_body(payload)?.validate(user.id)?;
    let resume = service::create_resume(state.store.as_ref(), &user, new).await?;
    Ok(ApiResponse::created(messages::RESUME_CREATED, resume))
}

/// GET /api/v1/resumes?sort=asc|desc&status=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    query: Result<Query<ListResumesQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<ResumeView>>, AppError> {
    let Query(params) = query.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let order = SortOrder::parse(params.sort.as_deref());
    let resumes =
        service::list_resumes(state.store.as_ref(), &user, order, params.status.as_deref())
            .await?;
    Ok(ApiResponse::ok(messages::RESUME_LISTED, resumes))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<ResumeView>, AppError> {
    let id = path_id(path)?;
    let resume = service::get_resume(state.store.as_ref(), &user, id).await?;
    Ok(ApiResponse::ok(messages::RESUME_READ, resume))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateResumeRequest>, JsonRejection>,
) -> Result<ApiResponse<ResumeRow>, AppError> {
    let id = path_id(path)?;
    let patch = json_body(payload)?.validate()?;
    let resume = service::update_resume(state.store.as_ref(), &user, id, patch).await?;
    Ok(ApiResponse::ok(messages::RESUME_UPDATED, resume))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<DeletedResume>, AppError> {
    let id = path_id(path)?;
    let id = service::delete_resume(state.store.as_ref(), &user, id).await?;
    Ok(ApiResponse::ok(messages::RESUME_DELETED, DeletedResume { id }))
}

/// PATCH /api/v1/resumes/:id/status
///
/// Role check runs before the path and body are looked at, so non-recruiters always get 403.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<ApiResponse<StatusLogRow>, AppError> {
    authorize(&user, Action::TransitionStatus)?;
    let id = path_id(path)?;
    let req = json_body(payload)?;
    req.validate()?;
    let log =
        transition::transition_status(state.store.as_ref(), user.id, id, req.status, req.reason)
            .await?;
    Ok(ApiResponse::ok(messages::STATUS_UPDATED, log))
}

/// GET /api/v1/resumes/:id/logs
pub async fn handle_list_status_logs(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<Vec<StatusLogView>>, AppError> {
    authorize(&user, Action::ReadStatusLogs)?;
    let id = path_id(path)?;
    let logs = transition::list_status_logs(state.store.as_ref(), id).await?;
    Ok(ApiResponse::ok(messages::STATUS_LOGS_LISTED, logs))
}
