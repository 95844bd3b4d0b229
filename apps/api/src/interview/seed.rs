//! Seed questions drawn from a résumé when a session is created.

use tracing::{debug, warn};

use crate::interview::prompts::SEED_QUESTIONS_PROMPT_TEMPLATE;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{strip_json_fences, ChatModel, Completion};

const MAX_SEED_QUESTIONS: usize = 10;

/// Best effort: any model or parse failure yields an empty list.
pub async fn generate_seed_questions(chat: &dyn ChatModel, resume_text: &str) -> Vec<String> {
    let prompt = fill_template(SEED_QUESTIONS_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);

    match chat.complete(&prompt).await {
        Completion::Generated(text) => parse_questions(&text),
        Completion::Degraded { reason } => {
            warn!("Seed question generation degraded, creating session without them: {reason}");
            Vec::new()
        }
    }
}

fn parse_questions(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(strip_json_fences(raw)) {
        Ok(questions) => questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .take(MAX_SEED_QUESTIONS)
            .collect(),
        Err(e) => {
            debug!("Seed questions were not a JSON string array: {e}");
            Vec::new()
        }
    }
}
