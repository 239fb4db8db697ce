//! Role policy: which rows a caller may touch for a given action.
//!
//! Pure functions only. Handlers resolve a [`Scope`] first and hand it to the store as
//! query conditions, so rows outside the scope are never loaded.

use crate::errors::AppError;
use crate::models::resume::ResumeStatus;
use crate::models::user::User;
use crate::store::ResumeFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateResume,
    ListResumes,
    ReadResume,
    UpdateResume,
    DeleteResume,
    TransitionStatus,
    ReadStatusLogs,
}

/// Rows an authorized caller may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    OwnedBy(i64),
}

impl Scope {
    pub fn owner(self) -> Option<i64> {
        match self {
            Scope::All => None,
            Scope::OwnedBy(author_id) => Some(author_id),
        }
    }

    /// Row conditions for this scope. The status filter only narrows an unrestricted
    /// scope; owner-scoped callers always see all of their own rows.
    pub fn filter(self, status: Option<ResumeStatus>) -> ResumeFilter {
        match self {
            Scope::All => ResumeFilter {
                author_id: None,
                status,
            },
            Scope::OwnedBy(author_id) => ResumeFilter {
                author_id: Some(author_id),
                status: None,
            },
        }
    }
}

/// The policy table. `None` means the role may not perform the action at all.
pub fn scope_for(user: &User, action: Action) -> Option<Scope> {
    match action {
        // Writes to resume content are owner-only, recruiters included.
        Action::CreateResume | Action::UpdateResume | Action::DeleteResume => {
            Some(Scope::OwnedBy(user.id))
        }
        Action::ListResumes | Action::ReadResume => Some(if user.is_recruiter() {
            Scope::All
        } else {
            Scope::OwnedBy(user.id)
        }),
        Action::TransitionStatus | Action::ReadStatusLogs => {
            user.is_recruiter().then_some(Scope::All)
        }
    }
}

/// Resolves the scope or fails with `Forbidden` when the role may not act at all.
pub fn authorize(user: &User, action: Action) -> Result<Scope, AppError> {
    scope_for(user, action).ok_or_else(|| {
        tracing::warn!("User {} denied {:?}", user.id, action);
        AppError::Forbidden
    })
}
