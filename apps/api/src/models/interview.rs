use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Who produced a turn in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    Candidate,
    Interviewer,
}

impl MessageRole {
    /// Upper-case label used when rendering a transcript for assessment.
    pub fn label(self) -> &'static str {
        match self {
            MessageRole::Candidate => "CANDIDATE",
            MessageRole::Interviewer => "INTERVIEWER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// One mock-interview run. Messages are embedded and their order is the
/// conversation order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub experience_years: f64,
    pub resume_id: Option<Uuid>,
    pub questions: Json<Vec<String>>,
    pub messages: Json<Vec<Message>>,
    pub finished: bool,
    pub feedback: Option<String>,
    pub score: Option<f64>,
    /// Bumped on every write; saves compare against it.
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

/// Validated fields for a new session.
#[derive(Debug, Clone)]
pub struct NewInterview {
    pub title: String,
    pub description: String,
    pub experience_years: f64,
    pub resume_id: Option<Uuid>,
    pub questions: Vec<String>,
}

impl InterviewRow {
    pub fn new(user_id: Uuid, fields: NewInterview) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: fields.title,
            description: fields.description,
            experience_years: fields.experience_years,
            resume_id: fields.resume_id,
            questions: Json(fields.questions),
            messages: Json(Vec::new()),
            finished: false,
            feedback: None,
            score: None,
            version: 0,
            created_at: Utc::now(),
        }
    }

    /// Returns the session to its pre-conversation state.
    pub fn reset(&mut self) {
        self.messages.0.clear();
        self.finished = false;
        self.feedback = None;
        self.score = None;
    }

    pub fn push(&mut self, role: MessageRole, content: impl Into<String>) -> &Message {
        self.messages.0.push(Message::new(role, content));
        // just pushed, so the vec is non-empty
        &self.messages.0[self.messages.0.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages.0
    }

    /// Locks the session with its assessment. The score is clamped to [0, 10].
    pub fn finalize(&mut self, score: f64, feedback: String) {
        self.score = Some(clamp_score(score));
        self.feedback = Some(feedback);
        self.finished = true;
    }
}

/// Clamps a score into [0, 10]; NaN becomes 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 10.0)
    }
}
