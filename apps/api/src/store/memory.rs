//! In-memory `ResumeStore` for tests.
//!
//! A unit of work holds the table lock from `begin` until it ends and writes to a staged
//! copy, so uncommitted changes are invisible and a dropped transaction leaves no trace.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::errors::AppError;
use crate::models::resume::{
    ResumeRow, ResumeStatus, ResumeView, SortOrder, StatusLogRow, StatusLogView,
};
use crate::models::user::{Role, User};
use crate::store::{NewResume, NewStatusLog, ResumeFilter, ResumePatch, ResumeStore, StoreTx};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    resumes: BTreeMap<i64, ResumeRow>,
    logs: Vec<StatusLogRow>,
    last_resume_id: i64,
    last_log_id: i64,
}

impl Tables {
    fn user_name(&self, id: i64) -> String {
        self.users
            .get(&id)
            .map(|u| u.name.clone())
            .unwrap_or_default()
    }

    fn view(&self, resume: &ResumeRow) -> ResumeView {
        ResumeView {
            id: resume.id,
            author_name: self.user_name(resume.author_id),
            title: resume.title.clone(),
            content: resume.content.clone(),
            status: resume.status,
            created_at: resume.created_at,
            updated_at: resume.updated_at,
        }
    }
}

fn filter_matches(filter: ResumeFilter, resume: &ResumeRow) -> bool {
    filter.author_id.map_or(true, |a| a == resume.author_id)
        && filter.status.map_or(true, |s| s == resume.status)
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_log_insert: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, id: i64, name: &str, role: Role) -> User {
        let user = User {
            id,
            email: format!("{}@example.com", name.to_lowercase()),
            name: name.to_string(),
            role,
        };
        self.tables.lock().await.users.insert(id, user.clone());
        user
    }

    /// Makes every subsequent audit log insert fail, simulating a storage fault
    /// between the status update and the log write.
    pub fn fail_log_inserts(&self, fail: bool) {
        self.fail_log_insert.store(fail, Ordering::SeqCst);
    }

    /// Raw row, bypassing any scope. Test assertions only.
    pub async fn resume_row(&self, id: i64) -> Option<ResumeRow> {
        self.tables.lock().await.resumes.get(&id).cloned()
    }

    pub async fn log_count(&self) -> usize {
        self.tables.lock().await.logs.len()
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn list_resumes(
        &self,
        filter: ResumeFilter,
        order: SortOrder,
    ) -> Result<Vec<ResumeView>, AppError> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<&ResumeRow> = tables
            .resumes
            .values()
            .filter(|r| filter_matches(filter, r))
            .collect();
        rows.sort_by_key(|r| (r.created_at, r.id));
        if order == SortOrder::Desc {
            rows.reverse();
        }
        Ok(rows.into_iter().map(|r| tables.view(r)).collect())
    }

    async fn find_resume(
        &self,
        id: i64,
        filter: ResumeFilter,
    ) -> Result<Option<ResumeView>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .resumes
            .get(&id)
            .filter(|r| filter_matches(filter, r))
            .map(|r| tables.view(r)))
    }

    async fn create_resume(&self, new: NewResume) -> Result<ResumeRow, AppError> {
        let mut tables = self.tables.lock().await;
        tables.last_resume_id += 1;
        let now = Utc::now();
        let row = ResumeRow {
            id: tables.last_resume_id,
            author_id: new.author_id,
            title: new.title,
            content: new.content,
            status: ResumeStatus::default(),
            created_at: now,
            updated_at: now,
        };
        tables.resumes.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_resume(
        &self,
        id: i64,
        author_id: i64,
        patch: ResumePatch,
    ) -> Result<Option<ResumeRow>, AppError> {
        let mut tables = self.tables.lock().await;
        let Some(row) = tables
            .resumes
            .get_mut(&id)
            .filter(|r| r.author_id == author_id)
        else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(content) = patch.content {
            row.content = content;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_resume(&self, id: i64, author_id: i64) -> Result<Option<i64>, AppError> {
        let mut tables = self.tables.lock().await;
        let owned = tables
            .resumes
            .get(&id)
            .is_some_and(|r| r.author_id == author_id);
        if !owned {
            return Ok(None);
        }
        tables.resumes.remove(&id);
        tables.logs.retain(|l| l.resume_id != id);
        Ok(Some(id))
    }

    async fn list_status_logs(&self, resume_id: i64) -> Result<Vec<StatusLogView>, AppError> {
        let tables = self.tables.lock().await;
        let mut logs: Vec<&StatusLogRow> = tables
            .logs
            .iter()
            .filter(|l| l.resume_id == resume_id)
            .collect();
        logs.sort_by_key(|l| std::cmp::Reverse((l.created_at, l.id)));
        Ok(logs
            .into_iter()
            .map(|l| StatusLogView {
                id: l.id,
                recruiter_name: tables.user_name(l.recruiter_id),
                resume_id: l.resume_id,
                old_status: l.old_status,
                new_status: l.new_status,
                reason: l.reason.clone(),
                created_at: l.created_at,
            })
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTx {
            guard,
            staged,
            fail_log_insert: self.fail_log_insert.load(Ordering::SeqCst),
        }))
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    fail_log_insert: bool,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn lock_resume(&mut self, id: i64) -> Result<Option<ResumeRow>, AppError> {
        Ok(self.staged.resumes.get(&id).cloned())
    }

    async fn set_status(&mut self, id: i64, status: ResumeStatus) -> Result<ResumeRow, AppError> {
        let row = self
            .staged
            .resumes
            .get_mut(&id)
            .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
        row.status = status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn insert_status_log(&mut self, log: NewStatusLog) -> Result<StatusLogRow, AppError> {
        if self.fail_log_insert {
            return Err(AppError::Database(sqlx::Error::Protocol(
                "injected fault: status log insert".to_string(),
            )));
        }
        self.staged.last_log_id += 1;
        let row = StatusLogRow {
            id: self.staged.last_log_id,
            recruiter_id: log.recruiter_id,
            resume_id: log.resume_id,
            old_status: log.old_status,
            new_status: log.new_status,
            reason: log.reason,
            created_at: Utc::now(),
        };
        self.staged.logs.push(row.clone());
        Ok(row)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryTx {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        Ok(())
    }
}
