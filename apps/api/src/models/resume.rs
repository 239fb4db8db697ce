use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Application state of a resume. Only the status transition workflow changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resume_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResumeStatus {
    #[default]
    Submitted,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl ResumeStatus {
    pub const ALL: [ResumeStatus; 6] = [
        ResumeStatus::Submitted,
        ResumeStatus::Screening,
        ResumeStatus::Interview,
        ResumeStatus::Offer,
        ResumeStatus::Hired,
        ResumeStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResumeStatus::Submitted => "SUBMITTED",
            ResumeStatus::Screening => "SCREENING",
            ResumeStatus::Interview => "INTERVIEW",
            ResumeStatus::Offer => "OFFER",
            ResumeStatus::Hired => "HIRED",
            ResumeStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ResumeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResumeStatus {
    type Err = String;

    /// Case-insensitive, for query strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        ResumeStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| format!("unknown resume status '{s}'"))
    }
}

/// Ordering of resume listings by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Case-insensitive `asc` / `desc`. Anything else, including nothing, is `Desc`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Full resume row as stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub status: ResumeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-facing projection: the author is exposed by display name only.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeView {
    pub id: i64,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub status: ResumeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One immutable audit entry per status transition.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StatusLogRow {
    pub id: i64,
    pub recruiter_id: i64,
    pub resume_id: i64,
    pub old_status: ResumeStatus,
    pub new_status: ResumeStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StatusLogView {
    pub id: i64,
    pub recruiter_name: String,
    pub resume_id: i64,
    pub old_status: ResumeStatus,
    pub new_status: ResumeStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
