//! Test doubles shared across module tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::auth::{issue_token, TokenVerifier};
use crate::errors::AppError;
use crate::llm_client::{ChatModel, ChatTurn, Completion};
use crate::models::resume::ResumeRow;
use crate::resumes::files::FileStore;
use crate::state::AppState;
use crate::store::memory::{MemoryInterviewStore, MemoryResumeStore};
use crate::store::{ResumeStore, StoreError};

pub const TEST_JWT_SECRET: &str = "test-secret-do-not-use";

/// A `ChatModel` that replays queued completions and records every call.
/// When the queue runs dry it answers `Interviewer turn N`.
#[derive(Default)]
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Completion>>,
    conversations: Mutex<Vec<Vec<ChatTurn>>>,
    prompts: Mutex<Vec<String>>,
    calls: Mutex<usize>,
}

impl ScriptedChat {
    pub fn with_replies(replies: impl IntoIterator<Item = Completion>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn generated(texts: &[&str]) -> Self {
        Self::with_replies(texts.iter().map(|t| Completion::Generated(t.to_string())))
    }

    pub fn conversations(&self) -> Vec<Vec<ChatTurn>> {
        self.conversations.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Completion {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Completion::Generated(format!("Interviewer turn {}", *calls)))
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn converse(&self, history: &[ChatTurn]) -> Completion {
        self.conversations.lock().unwrap().push(history.to_vec());
        self.next_reply()
    }

    async fn complete(&self, prompt: &str) -> Completion {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.next_reply()
    }
}

#[derive(Default)]
pub struct MemoryFileStore {
    files: Mutex<HashMap<String, Bytes>>,
}

impl MemoryFileStore {
    pub fn contains(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), AppError> {
        self.files.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, AppError> {
        Ok(self.files.lock().unwrap().get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.files.lock().unwrap().remove(key).is_some())
    }
}

/// A `ResumeStore` whose database is down: every call fails.
pub struct UnavailableResumeStore;

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::RowNotFound)
}

#[async_trait]
impl ResumeStore for UnavailableResumeStore {
    async fn insert(&self, _row: &ResumeRow) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn get(&self, _id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Err(unavailable())
    }

    async fn get_owned(&self, _user_id: Uuid, _id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Err(unavailable())
    }

    async fn get_many(&self, _ids: &[Uuid]) -> Result<Vec<ResumeRow>, StoreError> {
        Err(unavailable())
    }

    async fn list(&self, _user_id: Uuid) -> Result<Vec<ResumeRow>, StoreError> {
        Err(unavailable())
    }

    async fn rename(
        &self,
        _user_id: Uuid,
        _id: Uuid,
        _new_name: &str,
    ) -> Result<Option<ResumeRow>, StoreError> {
        Err(unavailable())
    }

    async fn delete(&self, _user_id: Uuid, _id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Err(unavailable())
    }
}

/// Everything a router test needs, with handles kept for assertions.
pub struct TestApp {
    pub state: AppState,
    pub interviews: Arc<MemoryInterviewStore>,
    pub resumes: Arc<MemoryResumeStore>,
    pub files: Arc<MemoryFileStore>,
    pub chat: Arc<ScriptedChat>,
}

impl TestApp {
    pub fn new(chat: ScriptedChat) -> Self {
        let interviews = Arc::new(MemoryInterviewStore::default());
        let resumes = Arc::new(MemoryResumeStore::default());
        let files = Arc::new(MemoryFileStore::default());
        let chat = Arc::new(chat);
        let state = AppState {
            interviews: interviews.clone(),
            resumes: resumes.clone(),
            files: files.clone(),
            chat: chat.clone(),
            tokens: TokenVerifier::new(TEST_JWT_SECRET),
        };
        Self {
            state,
            interviews,
            resumes,
            files,
            chat,
        }
    }

    /// `Cookie` header value authenticating `user_id`.
    pub fn cookie_for(user_id: Uuid) -> String {
        format!("token={}", issue_token(TEST_JWT_SECRET, user_id))
    }
}
