//! Request bodies and the presence checks run before any handler logic.
//!
//! Partial updates are presence-based: a field missing from the body (or `null`) is left
//! unchanged, a field that is present must carry non-blank text.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeStatus;
use crate::store::{NewResume, ResumePatch};

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateResumeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ResumeStatus,
    pub reason: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListResumesQuery {
    pub sort: Option<String>,
    pub status: Option<String>,
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

impl CreateResumeRequest {
    pub fn validate(self, author_id: i64) -> Result<NewResume, AppError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)?;
        Ok(NewResume {
            author_id,
            title: self.title,
            content: self.content,
        })
    }
}

impl UpdateResumeRequest {
    pub fn validate(self) -> Result<ResumePatch, AppError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(content) = &self.content {
            require_text("content", content)?;
        }
        Ok(ResumePatch {
            title: self.title,
            content: self.content,
        })
    }
}

impl UpdateStatusRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("reason", &self.reason)
    }
}

/// Empty `status=` is treated as absent; anything else must name a known status.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<ResumeStatus>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(AppError::Validation),
    }
}
