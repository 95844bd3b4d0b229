//! Builds the instruction text the interviewer model receives.
//!
//! Formatting is pure and deterministic. The only I/O is résumé lookup, and
//! every failure there degrades to the job-only template.

use tracing::warn;
use uuid::Uuid;

use crate::interview::prompts::{
    FOLLOW_UP_GUIDANCE, JOB_ONLY_INSTRUCTION_TEMPLATE, RESUME_INSTRUCTION_TEMPLATE,
};
use crate::llm_client::prompts::fill_template;
use crate::models::interview::InterviewRow;
use crate::store::ResumeStore;

/// Session attributes the instruction embeds.
#[derive(Debug, Clone, Copy)]
pub struct SessionBrief<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub experience_years: f64,
}

impl<'a> From<&'a InterviewRow> for SessionBrief<'a> {
    fn from(row: &'a InterviewRow) -> Self {
        Self {
            title: &row.title,
            description: &row.description,
            experience_years: row.experience_years,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResumeContext {
    Available(String),
    Absent,
}

impl ResumeContext {
    pub fn is_available(&self) -> bool {
        matches!(self, ResumeContext::Available(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ResumeContext::Available(text) => Some(text),
            ResumeContext::Absent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStage {
    Opening,
    FollowUp,
}

/// Looks up the session's résumé text. Never fails: a missing id, a dangling
/// reference, blank text, or a store error all yield `Absent`.
pub async fn resolve_resume_context(
    resumes: &dyn ResumeStore,
    resume_id: Option<Uuid>,
) -> ResumeContext {
    let Some(resume_id) = resume_id else {
        return ResumeContext::Absent;
    };

    match resumes.get(resume_id).await {
        Ok(Some(resume)) => resume
            .text()
            .map(|t| ResumeContext::Available(t.to_string()))
            .unwrap_or(ResumeContext::Absent),
        Ok(None) => ResumeContext::Absent,
        Err(e) => {
            warn!("Resume {resume_id} lookup failed, continuing without it: {e}");
            ResumeContext::Absent
        }
    }
}

pub fn compose_instruction(
    brief: SessionBrief<'_>,
    resume: &ResumeContext,
    stage: PromptStage,
) -> String {
    let years = brief.experience_years.to_string();

    let mut instruction = match resume {
        ResumeContext::Available(resume_text) => fill_template(
            RESUME_INSTRUCTION_TEMPLATE,
            &[
                ("experience_years", &years),
                ("resume_text", resume_text),
                ("title", brief.title),
                ("description", brief.description),
            ],
        ),
        ResumeContext::Absent => fill_template(
            JOB_ONLY_INSTRUCTION_TEMPLATE,
            &[
                ("experience_years", &years),
                ("title", brief.title),
                ("description", brief.description),
            ],
        ),
    };

    if stage == PromptStage::FollowUp {
        instruction.push_str(FOLLOW_UP_GUIDANCE);
    }

    instruction
}
