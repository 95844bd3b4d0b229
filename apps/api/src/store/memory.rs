//! In-memory stores for tests. Same semantics as the Postgres stores,
//! including the version check on `save`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::interview::InterviewRow;
use crate::models::resume::ResumeRow;
use crate::store::{InterviewStore, ResumeStore, StoreError};

#[derive(Default)]
pub struct MemoryInterviewStore {
    rows: Mutex<HashMap<Uuid, InterviewRow>>,
}

impl MemoryInterviewStore {
    /// Reads a row regardless of owner, for assertions.
    pub fn snapshot(&self, id: Uuid) -> Option<InterviewRow> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl InterviewStore for MemoryInterviewStore {
    async fn insert(&self, row: &InterviewRow) -> Result<(), StoreError> {
        self.rows.lock().unwrap().insert(row.id, row.clone());
        Ok(())
    }

    async fn get_owned(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<InterviewRow>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<InterviewRow>, StoreError> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn save(&self, row: &InterviewRow) -> Result<InterviewRow, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let stored = rows
            .get_mut(&row.id)
            .filter(|stored| stored.version == row.version)
            .ok_or(StoreError::Conflict { id: row.id })?;
        stored.messages = row.messages.clone();
        stored.finished = row.finished;
        stored.feedback = row.feedback.clone();
        stored.score = row.score;
        stored.version += 1;
        Ok(stored.clone())
    }

    async fn set_feedback(
        &self,
        user_id: Uuid,
        id: Uuid,
        feedback: &str,
    ) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id).filter(|r| r.user_id == user_id) {
            Some(row) => {
                row.feedback = Some(feedback.to_string());
                row.version += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.get(&id).is_some_and(|r| r.user_id == user_id) {
            rows.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[derive(Default)]
pub struct MemoryResumeStore {
    rows: Mutex<HashMap<Uuid, ResumeRow>>,
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn insert(&self, row: &ResumeRow) -> Result<(), StoreError> {
        self.rows.lock().unwrap().insert(row.id, row.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn get_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<ResumeRow>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, StoreError> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(rows)
    }

    async fn rename(
        &self,
        user_id: Uuid,
        id: Uuid,
        new_name: &str,
    ) -> Result<Option<ResumeRow>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .get_mut(&id)
            .filter(|r| r.user_id == user_id)
            .map(|r| {
                r.original_name = new_name.to_string();
                r.clone()
            }))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.get(&id).is_some_and(|r| r.user_id == user_id) {
            return Ok(rows.remove(&id));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::{MessageRole, NewInterview};

    fn row(user_id: Uuid) -> InterviewRow {
        InterviewRow::new(
            user_id,
            NewInterview {
                title: "SRE".to_string(),
                description: String::new(),
                experience_years: 1.0,
                resume_id: None,
                questions: vec![],
            },
        )
    }

    #[tokio::test]
    async fn test_save_rejects_stale_version() {
        let store = MemoryInterviewStore::default();
        let original = row(Uuid::new_v4());
        store.insert(&original).await.unwrap();

        let mut first = original.clone();
        first.push(MessageRole::Candidate, "answer one");
        let saved = store.save(&first).await.unwrap();
        assert_eq!(saved.version, 1);

        let mut second = original.clone();
        second.push(MessageRole::Candidate, "answer two");
        let err = store.save(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));

        let stored = store.snapshot(original.id).unwrap();
        assert_eq!(stored.messages().len(), 1);
        assert_eq!(stored.messages()[0].content, "answer one");
    }
}
