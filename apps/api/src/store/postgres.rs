use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::errors::AppError;
use crate::models::resume::{
    ResumeRow, ResumeStatus, ResumeView, SortOrder, StatusLogRow, StatusLogView,
};
use crate::models::user::User;
use crate::store::{NewResume, NewStatusLog, ResumeFilter, ResumePatch, ResumeStore, StoreTx};

const RESUME_COLUMNS: &str = "id, author_id, title, content, status, created_at, updated_at";

const RESUME_VIEW_SELECT: &str = r#"
    SELECT r.id, u.name AS author_name, r.title, r.content, r.status, r.created_at, r.updated_at
    FROM resumes r
    JOIN users u ON u.id = r.author_id
    WHERE TRUE"#;

// Write timestamps must be clock_timestamp(), the time of the write itself. NOW() is the
// transaction start, which precedes any wait on the `FOR UPDATE` row lock.

const UPDATE_RESUME_SQL: &str = r#"
    UPDATE resumes
    SET title = COALESCE($3, title),
        content = COALESCE($4, content),
        updated_at = clock_timestamp()
    WHERE id = $1 AND author_id = $2
    RETURNING id, author_id, title, content, status, created_at, updated_at"#;

const SET_STATUS_SQL: &str = r#"
    UPDATE resumes
    SET status = $2, updated_at = clock_timestamp()
    WHERE id = $1
    RETURNING id, author_id, title, content, status, created_at, updated_at"#;

const INSERT_STATUS_LOG_SQL: &str = r#"
    INSERT INTO resume_status_logs
        (recruiter_id, resume_id, old_status, new_status, reason, created_at)
    VALUES ($1, $2, $3, $4, $5, clock_timestamp())
    RETURNING id, recruiter_id, resume_id, old_status, new_status, reason, created_at"#;

/// `ResumeStore` backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends the filter as `AND` conditions so out-of-scope rows never leave the database.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: ResumeFilter) {
    if let Some(author_id) = filter.author_id {
        qb.push(" AND r.author_id = ").push_bind(author_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND r.status = ").push_bind(status);
    }
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, email, name, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_resumes(
        &self,
        filter: ResumeFilter,
        order: SortOrder,
    ) -> Result<Vec<ResumeView>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(RESUME_VIEW_SELECT);
        push_filter(&mut qb, filter);
        let dir = order.as_sql();
        qb.push(format!(" ORDER BY r.created_at {dir}, r.id {dir}"));

        Ok(qb.build_query_as::<ResumeView>().fetch_all(&self.pool).await?)
    }

    async fn find_resume(
        &self,
        id: i64,
        filter: ResumeFilter,
    ) -> Result<Option<ResumeView>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(RESUME_VIEW_SELECT);
        qb.push(" AND r.id = ").push_bind(id);
        push_filter(&mut qb, filter);

        Ok(qb
            .build_query_as::<ResumeView>()
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_resume(&self, new: NewResume) -> Result<ResumeRow, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(&format!(
            "INSERT INTO resumes (author_id, title, content) VALUES ($1, $2, $3) RETURNING {RESUME_COLUMNS}"
        ))
        .bind(new.author_id)
        .bind(new.title)
        .bind(new.content)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_resume(
        &self,
        id: i64,
        author_id: i64,
        patch: ResumePatch,
    ) -> Result<Option<ResumeRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(UPDATE_RESUME_SQL)
        .bind(id)
        .bind(author_id)
        .bind(patch.title)
        .bind(patch.content)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_resume(&self, id: i64, author_id: i64) -> Result<Option<i64>, AppError> {
        Ok(sqlx::query_scalar::<_, i64>(
            "DELETE FROM resumes WHERE id = $1 AND author_id = $2 RETURNING id",
        )
        .bind(id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_status_logs(&self, resume_id: i64) -> Result<Vec<StatusLogView>, AppError> {
        Ok(sqlx::query_as::<_, StatusLogView>(
            r#"
            SELECT l.id, u.name AS recruiter_name, l.resume_id, l.old_status, l.new_status,
                   l.reason, l.created_at
            FROM resume_status_logs l
            JOIN users u ON u.id = l.recruiter_id
            WHERE l.resume_id = $1
            ORDER BY l.created_at DESC, l.id DESC
            "#,
        )
        .bind(resume_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }
}

/// Wraps a sqlx transaction; sqlx rolls back on drop if `commit` was never reached.
pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn lock_resume(&mut self, id: i64) -> Result<Option<ResumeRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?)
    }

    async fn set_status(&mut self, id: i64, status: ResumeStatus) -> Result<ResumeRow, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(SET_STATUS_SQL)
        .bind(id)
        .bind(status)
        .fetch_one(&mut *self.tx)
        .await?)
    }

    async fn insert_status_log(&mut self, log: NewStatusLog) -> Result<StatusLogRow, AppError> {
        Ok(sqlx::query_as::<_, StatusLogRow>(INSERT_STATUS_LOG_SQL)
        .bind(log.recruiter_id)
        .bind(log.resume_id)
        .bind(log.old_status)
        .bind(log.new_status)
        .bind(log.reason)
        .fetch_one(&mut *self.tx)
        .await?)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let PgTx { tx } = *self;
        Ok(tx.commit().await?)
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        let PgTx { tx } = *self;
        Ok(tx.rollback().await?)
    }
}
