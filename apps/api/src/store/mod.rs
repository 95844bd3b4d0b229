//! Persistence seams. Handlers and the interview flow only see these traits;
//! `AppState` carries them as `Arc<dyn _>` so tests can swap in memory stores.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::interview::InterviewRow;
use crate::models::resume::ResumeRow;

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The row changed (or vanished) since it was read.
    #[error("interview {id} was modified concurrently")]
    Conflict { id: Uuid },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn insert(&self, row: &InterviewRow) -> Result<(), StoreError>;

    async fn get_owned(&self, user_id: Uuid, id: Uuid)
        -> Result<Option<InterviewRow>, StoreError>;

    /// Newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<InterviewRow>, StoreError>;

    /// Writes the transcript and assessment fields if `row.version` still matches
    /// the stored version. Returns the row with its bumped version.
    async fn save(&self, row: &InterviewRow) -> Result<InterviewRow, StoreError>;

    /// Overwrites feedback directly. Returns false when no owned row matched.
    async fn set_feedback(
        &self,
        user_id: Uuid,
        id: Uuid,
        feedback: &str,
    ) -> Result<bool, StoreError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert(&self, row: &ResumeRow) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<ResumeRow>, StoreError>;

    async fn get_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<ResumeRow>, StoreError>;

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<ResumeRow>, StoreError>;

    /// Newest upload first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, StoreError>;

    async fn rename(
        &self,
        user_id: Uuid,
        id: Uuid,
        new_name: &str,
    ) -> Result<Option<ResumeRow>, StoreError>;

    /// Removes the record and hands it back so the caller can remove the file.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Option<ResumeRow>, StoreError>;
}
