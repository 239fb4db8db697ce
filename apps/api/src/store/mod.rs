//! Persistence gateway: everything the resume service and the status workflow need from
//! storage, behind a trait so the handle can be injected through `AppState`.
//!
//! `AppState` holds an `Arc<dyn ResumeStore>`. Production uses [`postgres::PgStore`];
//! tests use the in-memory store, which honours the same transactional contract.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::resume::{
    ResumeRow, ResumeStatus, ResumeView, SortOrder, StatusLogRow, StatusLogView,
};
use crate::models::user::User;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Row-level conditions applied when reading resumes.
/// `None` means "no restriction" for that column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResumeFilter {
    pub author_id: Option<i64>,
    pub status: Option<ResumeStatus>,
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub author_id: i64,
    pub title: String,
    pub content: String,
}

/// Fields to overwrite on update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct ResumePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewStatusLog {
    pub recruiter_id: i64,
    pub resume_id: i64,
    pub old_status: ResumeStatus,
    pub new_status: ResumeStatus,
    pub reason: String,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn list_resumes(
        &self,
        filter: ResumeFilter,
        order: SortOrder,
    ) -> Result<Vec<ResumeView>, AppError>;

    async fn find_resume(
        &self,
        id: i64,
        filter: ResumeFilter,
    ) -> Result<Option<ResumeView>, AppError>;

    async fn create_resume(&self, new: NewResume) -> Result<ResumeRow, AppError>;

    /// Applies `patch` to the resume `id` owned by `author_id`. `None` if no such row.
    async fn update_resume(
        &self,
        id: i64,
        author_id: i64,
        patch: ResumePatch,
    ) -> Result<Option<ResumeRow>, AppError>;

    /// Deletes the resume `id` owned by `author_id`, returning its id. `None` if no such row.
    async fn delete_resume(&self, id: i64, author_id: i64) -> Result<Option<i64>, AppError>;

    /// Audit entries for a resume, newest first.
    async fn list_status_logs(&self, resume_id: i64) -> Result<Vec<StatusLogView>, AppError>;

    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError>;
}

/// A unit of work. Nothing written through it is visible to others until `commit`;
/// dropping it without committing rolls everything back.
#[async_trait]
pub trait StoreTx: Send {
    /// Reads a resume and holds it against concurrent writers until the unit of work ends.
    async fn lock_resume(&mut self, id: i64) -> Result<Option<ResumeRow>, AppError>;

    async fn set_status(&mut self, id: i64, status: ResumeStatus) -> Result<ResumeRow, AppError>;

    async fn insert_status_log(&mut self, log: NewStatusLog) -> Result<StatusLogRow, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    async fn rollback(self: Box<Self>) -> Result<(), AppError>;
}
