//! Axum route handlers for interview sessions and the mock-interview flow.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::interview::driver::{ConversationDriver, StartOutcome};
use crate::interview::finalizer::{FinishOutcome, Finalizer};
use crate::interview::seed::generate_seed_questions;
use crate::models::interview::{InterviewRow, Message, NewInterview};
use crate::models::resume::ResumeSummary;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Clients send years either as a JSON number or as the raw text of a form field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ExperienceYears {
    Number(f64),
    Text(String),
    /// Any other JSON shape; rejected by `resolve`.
    Other(serde_json::Value),
}

impl ExperienceYears {
    pub fn resolve(&self) -> Result<f64, AppError> {
        let years = match self {
            ExperienceYears::Number(n) => *n,
            ExperienceYears::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::Validation(format!("Invalid experienceYears value '{s}'")))?,
            ExperienceYears::Other(value) => {
                return Err(AppError::Validation(format!(
                    "experienceYears must be a number or numeric string, got {value}"
                )))
            }
        };
        if !years.is_finite() || years < 0.0 {
            return Err(AppError::Validation(format!(
                "experienceYears must be a non-negative number, got {years}"
            )));
        }
        Ok(years)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub experience_years: Option<ExperienceYears>,
    /// Empty string means "no résumé".
    #[serde(default)]
    pub resume_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: Message,
}

/// A session plus the résumé it was created with, if that résumé still exists.
#[derive(Debug, Serialize)]
pub struct InterviewListing {
    #[serde(flatten)]
    pub interview: InterviewRow,
    pub resume: Option<ResumeSummary>,
}

// ────────────────────────────────────────────────────────────────────────────
// Session CRUD
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/interviews
///
/// Creates a session. With an owned, parsed résumé the session is seeded with
/// résumé-grounded questions; a seeding failure leaves the list empty.
pub async fn handle_create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateInterviewRequest>,
) -> Result<(StatusCode, Json<InterviewRow>), AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let experience_years = req
        .experience_years
        .as_ref()
        .ok_or_else(|| AppError::Validation("experienceYears is required".to_string()))?
        .resolve()?;

    let resume_id = parse_resume_id(req.resume_id.as_deref())?;
    let mut questions = Vec::new();
    if let Some(resume_id) = resume_id {
        let resume = state
            .resumes
            .get_owned(user.user_id, resume_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
        if let Some(text) = resume.text() {
            questions = generate_seed_questions(state.chat.as_ref(), text).await;
        }
    }

    let row = InterviewRow::new(
        user.user_id,
        NewInterview {
            title: title.to_string(),
            description: req.description.unwrap_or_default().trim().to_string(),
            experience_years,
            resume_id,
            questions,
        },
    );
    state.interviews.insert(&row).await?;

    info!(
        "Created interview {} for user {} ({} seed questions)",
        row.id,
        user.user_id,
        row.questions.len()
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/interviews
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<InterviewRow>>, AppError> {
    Ok(Json(state.interviews.list(user.user_id).await?))
}

/// GET /api/interviews/:id
pub async fn handle_get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewRow>, AppError> {
    let row = state
        .interviews
        .get_owned(user.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))?;
    Ok(Json(row))
}

/// PATCH /api/interviews/:id/feedback
pub async fn handle_save_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<FeedbackRequest>,
) -> Result<StatusCode, AppError> {
    // feedback, once set, is never blank
    if req.feedback.trim().is_empty() {
        return Err(AppError::Validation("feedback cannot be empty".to_string()));
    }

    if state
        .interviews
        .set_feedback(user.user_id, id, &req.feedback)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Interview {id} not found")))
    }
}

/// DELETE /api/interviews/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.interviews.delete(user.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Interview {id} not found")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Mock interview flow
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/mockinterview
///
/// Sessions with their résumé summary joined in. A résumé that was deleted,
/// or that belongs to someone else, shows as `null`.
pub async fn handle_list_with_resumes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<InterviewListing>>, AppError> {
    let interviews = state.interviews.list(user.user_id).await?;

    let mut ids: Vec<Uuid> = interviews.iter().filter_map(|i| i.resume_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let resumes: HashMap<Uuid, ResumeSummary> = if ids.is_empty() {
        HashMap::new()
    } else {
        state
            .resumes
            .get_many(&ids)
            .await?
            .iter()
            .filter(|r| r.user_id == user.user_id)
            .map(|r| (r.id, ResumeSummary::from(r)))
            .collect()
    };

    let listings = interviews
        .into_iter()
        .map(|interview| {
            let resume = interview.resume_id.and_then(|id| resumes.get(&id).cloned());
            InterviewListing { interview, resume }
        })
        .collect();
    Ok(Json(listings))
}

/// POST /api/mockinterview/:id/start
pub async fn handle_start(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StartOutcome>, AppError> {
    let driver = ConversationDriver::new(
        state.interviews.as_ref(),
        state.resumes.as_ref(),
        state.chat.as_ref(),
    );
    Ok(Json(driver.start_session(user.user_id, id).await?))
}

/// POST /api/mockinterview/:id/message
pub async fn handle_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let driver = ConversationDriver::new(
        state.interviews.as_ref(),
        state.resumes.as_ref(),
        state.chat.as_ref(),
    );
    let message = driver
        .continue_session(user.user_id, id, &req.content)
        .await?;
    Ok(Json(MessageResponse { message }))
}

/// POST /api/mockinterview/:id/finish
pub async fn handle_finish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FinishOutcome>, AppError> {
    let finalizer = Finalizer::new(
        state.interviews.as_ref(),
        state.resumes.as_ref(),
        state.chat.as_ref(),
    );
    Ok(Json(finalizer.finish_session(user.user_id, id).await?))
}

fn parse_resume_id(raw: Option<&str>) -> Result<Option<Uuid>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid resumeId '{s}'"))),
    }
}
