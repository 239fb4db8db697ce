use tracing::info;

use crate::auth::policy::{authorize, Action, Scope};
use crate::errors::AppError;
use crate::models::resume::{ResumeRow, ResumeStatus, ResumeView, SortOrder};
use crate::models::user::User;
use crate::resumes::validation::parse_status_filter;
use crate::store::{NewResume, ResumePatch, ResumeStore};

/// Lists the resumes visible to `requester`. The raw status filter is only read, and
/// only validated, for callers whose scope is unrestricted; owners always get their
/// full list whatever the filter says.
pub async fn list_resumes(
    store: &dyn ResumeStore,
    requester: &User,
    order: SortOrder,
    status: Option<&str>,
) -> Result<Vec<ResumeView>, AppError> {
    let scope = authorize(requester, Action::ListResumes)?;
    let status = match scope {
        Scope::All => parse_status_filter(status)?,
        Scope::OwnedBy(_) => None,
    };
    store.list_resumes(scope.filter(status), order).await
}

/// Missing and out-of-scope ids both come back as the same `NotFound`.
pub async fn get_resume(
    store: &dyn ResumeStore,
    requester: &User,
    id: i64,
) -> Result<ResumeView, AppError> {
    let scope = authorize(requester, Action::ReadResume)?;
    store
        .find_resume(id, scope.filter(None))
        .await?
        .ok_or_else(|| AppError::resume_not_found(id))
}

pub async fn create_resume(
    store: &dyn ResumeStore,
    requester: &User,
    new: NewResume,
) -> Result<ResumeRow, AppError> {
    let scope = authorize(requester, Action::CreateResume)?;
    let new = NewResume {
        author_id: scope.owner().unwrap_or(requester.id),
        ..new
    };
    let resume = store.create_resume(new).await?;
    info!("User {} created resume {}", resume.author_id, resume.id);
    Ok(resume)
}

/// Applies only the supplied fields. Status is never touched here.
pub async fn update_resume(
    store: &dyn ResumeStore,
    requester: &User,
    id: i64,
    patch: ResumePatch,
) -> Result<ResumeRow, AppError> {
    let author_id = authorize(requester, Action::UpdateResume)?
        .owner()
        .unwrap_or(requester.id);
    let resume = store
        .update_resume(id, author_id, patch)
        .await?
        .ok_or_else(|| AppError::resume_not_found(id))?;
    info!("User {author_id} updated resume {id}");
    Ok(resume)
}

pub async fn delete_resume(
    store: &dyn ResumeStore,
    requester: &User,
    id: i64,
) -> Result<i64, AppError> {
    let author_id = authorize(requester, Action::DeleteResume)?
        .owner()
        .unwrap_or(requester.id);
    let deleted = store
        .delete_resume(id, author_id)
        .await?
        .ok_or_else(|| AppError::resume_not_found(id))?;
    info!("User {author_id} deleted resume {deleted}");
    Ok(deleted)
}
