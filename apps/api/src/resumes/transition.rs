//! Status transitions and their audit trail.
//!
//! The resume's new status and the log row describing it are written in one unit of
//! work: either both become visible or neither does. The resume row is locked from the
//! read until commit, so every log's `old_status` is the status it actually replaced.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::resume::{ResumeStatus, StatusLogRow, StatusLogView};
use crate::store::{NewStatusLog, ResumeStore};

/// Moves resume `resume_id` to `new_status` and records who did it and why.
///
/// The caller must already have passed the role guard. A transition to the current
/// status is still recorded. Any error leaves both the resume and the log untouched;
/// an uncommitted unit of work rolls back when dropped.
pub async fn transition_status(
    store: &dyn ResumeStore,
    recruiter_id: i64,
    resume_id: i64,
    new_status: ResumeStatus,
    reason: String,
) -> Result<StatusLogRow, AppError> {
    let mut tx = store.begin().await?;

    let Some(current) = tx.lock_resume(resume_id).await? else {
        tx.rollback().await?;
        warn!("Status transition requested for missing resume {resume_id}");
        return Err(AppError::resume_not_found(resume_id));
    };

    let updated = tx.set_status(resume_id, new_status).await?;

    let log = tx
        .insert_status_log(NewStatusLog {
            recruiter_id,
            resume_id,
            old_status: current.status,
            new_status: updated.status,
            reason,
        })
        .await?;

    tx.commit().await?;

    info!(
        "Recruiter {recruiter_id} moved resume {resume_id} from {} to {}",
        log.old_status, log.new_status
    );
    Ok(log)
}

/// Audit entries for a resume, newest first. Unknown ids yield an empty list.
pub async fn list_status_logs(
    store: &dyn ResumeStore,
    resume_id: i64,
) -> Result<Vec<StatusLogView>, AppError> {
    store.list_status_logs(resume_id).await
}
