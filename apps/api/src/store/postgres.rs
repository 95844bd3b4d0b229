use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::interview::InterviewRow;
use crate::models::resume::ResumeRow;
use crate::store::{InterviewStore, ResumeStore, StoreError};

#[derive(Clone)]
pub struct PgInterviewStore {
    pool: PgPool,
}

impl PgInterviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    async fn insert(&self, row: &InterviewRow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO interviews
                (id, user_id, title, description, experience_years, resume_id,
                 questions, messages, finished, feedback, score, version, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.experience_years)
        .bind(row.resume_id)
        .bind(&row.questions)
        .bind(&row.messages)
        .bind(row.finished)
        .bind(&row.feedback)
        .bind(row.score)
        .bind(row.version)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_owned(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<InterviewRow>, StoreError> {
        Ok(sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<InterviewRow>, StoreError> {
        Ok(sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn save(&self, row: &InterviewRow) -> Result<InterviewRow, StoreError> {
        let saved = sqlx::query_as::<_, InterviewRow>(
            r#"
            UPDATE interviews
            SET messages = $1, finished = $2, feedback = $3, score = $4,
                version = version + 1
            WHERE id = $5 AND version = $6
            RETURNING *
            "#,
        )
        .bind(&row.messages)
        .bind(row.finished)
        .bind(&row.feedback)
        .bind(row.score)
        .bind(row.id)
        .bind(row.version)
        .fetch_optional(&self.pool)
        .await?;

        match saved {
            Some(saved) => {
                debug!("Saved interview {} at version {}", saved.id, saved.version);
                Ok(saved)
            }
            None => Err(StoreError::Conflict { id: row.id }),
        }
    }

    async fn set_feedback(
        &self,
        user_id: Uuid,
        id: Uuid,
        feedback: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE interviews
            SET feedback = $1, version = version + 1
            WHERE id = $2 AND user_id = $3
            "#,
        )
        .bind(feedback)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM interviews WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn insert(&self, row: &ResumeRow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO resumes (id, user_id, filename, original_name, upload_date, parsed_text)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(&row.filename)
        .bind(&row.original_name)
        .bind(row.upload_date)
        .bind(&row.parsed_text)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<ResumeRow>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY upload_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn rename(
        &self,
        user_id: Uuid,
        id: Uuid,
        new_name: &str,
    ) -> Result<Option<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "UPDATE resumes SET original_name = $1 WHERE id = $2 AND user_id = $3 RETURNING *",
        )
        .bind(new_name)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "DELETE FROM resumes WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
