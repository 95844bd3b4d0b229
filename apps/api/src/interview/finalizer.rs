//! Turns a transcript into a score in [0, 10] plus written feedback, then
//! locks the session.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::composer::{resolve_resume_context, ResumeContext};
use crate::interview::driver::load_owned;
use crate::interview::prompts::{
    FEEDBACK_PROMPT_TEMPLATE, RESUME_APPENDIX_TEMPLATE, SCORE_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{ChatModel, Completion};
use crate::models::interview::{clamp_score, Message};
use crate::store::{InterviewStore, ResumeStore};

/// Used when the model answers the feedback prompt with nothing.
const EMPTY_FEEDBACK_DEFAULT: &str =
    "No written feedback was produced for this interview. Review the transcript and try another session.";

#[derive(Debug, Clone, Serialize)]
pub struct FinishOutcome {
    pub score: f64,
    pub feedback: String,
}

pub struct Finalizer<'a> {
    interviews: &'a dyn InterviewStore,
    resumes: &'a dyn ResumeStore,
    chat: &'a dyn ChatModel,
}

impl<'a> Finalizer<'a> {
    pub fn new(
        interviews: &'a dyn InterviewStore,
        resumes: &'a dyn ResumeStore,
        chat: &'a dyn ChatModel,
    ) -> Self {
        Self {
            interviews,
            resumes,
            chat,
        }
    }

    /// Scores the transcript, writes feedback and marks the session finished.
    ///
    /// The two model calls are independent. If either one degrades nothing is
    /// persisted and the session stays open, so it can be finished again.
    pub async fn finish_session(
        &self,
        owner: Uuid,
        session_id: Uuid,
    ) -> Result<FinishOutcome, AppError> {
        let mut session = load_owned(self.interviews, owner, session_id).await?;

        let resume = resolve_resume_context(self.resumes, session.resume_id).await;
        let transcript = render_transcript(session.messages());
        let resume_context = resume_appendix(&resume);
        let values = [
            ("transcript", transcript.as_str()),
            ("resume_context", resume_context.as_str()),
        ];

        let raw_score = self
            .chat
            .complete(&fill_template(SCORE_PROMPT_TEMPLATE, &values))
            .await;
        let raw_feedback = self
            .chat
            .complete(&fill_template(FEEDBACK_PROMPT_TEMPLATE, &values))
            .await;

        let (raw_score, raw_feedback) = match (raw_score, raw_feedback) {
            (Completion::Generated(score), Completion::Generated(feedback)) => (score, feedback),
            (Completion::Degraded { reason }, _) | (_, Completion::Degraded { reason }) => {
                return Err(AppError::Llm(format!(
                    "Could not finalize interview {session_id}: {reason}"
                )));
            }
        };

        let score = parse_score(&raw_score);
        let feedback = if raw_feedback.trim().is_empty() {
            EMPTY_FEEDBACK_DEFAULT.to_string()
        } else {
            raw_feedback
        };

        session.finalize(score, feedback.clone());
        self.interviews.save(&session).await?;

        info!("Finalized interview {session_id} with score {score}");

        Ok(FinishOutcome { score, feedback })
    }
}

/// One `ROLE: text` line per message.
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn resume_appendix(resume: &ResumeContext) -> String {
    match resume.text() {
        Some(text) => fill_template(RESUME_APPENDIX_TEMPLATE, &[("resume_text", text)]),
        None => String::new(),
    }
}

/// Reads the leading number of a model reply, the way a lenient float parser
/// would (`"7.5/10"` is 7.5, `"1e1"` is 10). A dangling exponent marker is
/// ignored. Anything unparsable scores 0. Clamped to [0, 10].
pub fn parse_score(raw: &str) -> f64 {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || has_digits {
            has_digits |= frac_end > frac_start;
            end = frac_end;
        }
    }

    if !has_digits {
        return 0.0;
    }
    // exponent only counts when at least one digit follows
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    text[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .map(clamp_score)
        .unwrap_or(0.0)
}
