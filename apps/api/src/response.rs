use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope: `{ "status": 200, "message": "...", "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: &'static str, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, data)
    }

    pub fn created(message: &'static str, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    fn with_status(status: StatusCode, message: &'static str, data: T) -> Self {
        Self {
            status: status.as_u16(),
            message,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

pub mod messages {
    pub const RESUME_CREATED: &str = "Resume created";
    pub const RESUME_LISTED: &str = "Resumes retrieved";
    pub const RESUME_READ: &str = "Resume retrieved";
    pub const RESUME_UPDATED: &str = "Resume updated";
    pub const RESUME_DELETED: &str = "Resume deleted";
    pub const STATUS_UPDATED: &str = "Resume status updated";
    pub const STATUS_LOGS_LISTED: &str = "Resume status logs retrieved";
}
