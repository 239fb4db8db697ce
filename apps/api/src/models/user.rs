use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Applicant,
    /// Reviewer role: sees every resume, moves status, reads audit logs.
    Recruiter,
}

/// An authenticated caller, as resolved by the identity middleware.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn is_recruiter(&self) -> bool {
        self.role == Role::Recruiter
    }
}
