use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::llm_client::ChatModel;
use crate::resumes::files::FileStore;
use crate::store::{InterviewStore, ResumeStore};

/// Shared application state injected into all route handlers via Axum extractors.
/// Every collaborator is a trait object built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub interviews: Arc<dyn InterviewStore>,
    pub resumes: Arc<dyn ResumeStore>,
    /// Résumé binaries: local disk or S3, chosen by `RESUME_STORAGE`.
    pub files: Arc<dyn FileStore>,
    /// Production: `LlmClient`.
    pub chat: Arc<dyn ChatModel>,
    pub tokens: TokenVerifier,
}
