//! One request/response cycle with the interviewer model.
//!
//! Flow per turn: load owned session, compose instruction, rebuild the full
//! history, call the model, append the reply, then compare-and-swap save.
//!
//! The whole transcript is resent on every turn; there is no windowing.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::composer::{
    compose_instruction, resolve_resume_context, PromptStage, SessionBrief,
};
use crate::llm_client::prompts::FALLBACK_REPLY;
use crate::llm_client::{ChatModel, ChatTurn, Completion};
use crate::models::interview::{InterviewRow, Message, MessageRole};
use crate::store::{InterviewStore, ResumeStore};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOutcome {
    pub message: Message,
    pub has_resume: bool,
}

/// Collaborators are borrowed from `AppState`; nothing here is global.
pub struct ConversationDriver<'a> {
    interviews: &'a dyn InterviewStore,
    resumes: &'a dyn ResumeStore,
    chat: &'a dyn ChatModel,
}

impl<'a> ConversationDriver<'a> {
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

    /// Begins (or restarts) the conversation. Any prior transcript and
    /// assessment are discarded; the session ends up with exactly one
    /// interviewer message.
    pub async fn start_session(
        &self,
        owner: Uuid,
        session_id: Uuid,
    ) -> Result<StartOutcome, AppError> {
        let mut session = load_owned(self.interviews, owner, session_id).await?;

        let resume = resolve_resume_context(self.resumes, session.resume_id).await;
        let instruction =
            compose_instruction(SessionBrief::from(&session), &resume, PromptStage::Opening);

        let reply = self.chat.converse(&[ChatTurn::user(instruction)]).await;
        let reply = reply_or_fallback(session_id, reply);

        session.reset();
        let message = session.push(MessageRole::Interviewer, reply).clone();
        self.interviews.save(&session).await?;

        info!(
            "Started interview {session_id} (resume: {})",
            resume.is_available()
        );

        Ok(StartOutcome {
            message,
            has_resume: resume.is_available(),
        })
    }

    /// Records the candidate's answer and returns the interviewer's next turn.
    pub async fn continue_session(
        &self,
        owner: Uuid,
        session_id: Uuid,
        candidate_text: &str,
    ) -> Result<Message, AppError> {
        if candidate_text.trim().is_empty() {
            return Err(AppError::Validation("content cannot be empty".to_string()));
        }

        let mut session = load_owned(self.interviews, owner, session_id).await?;
        if session.finished {
            return Err(AppError::Conflict(format!(
                "Interview {session_id} is finished; start it again to continue"
            )));
        }

        session.push(MessageRole::Candidate, candidate_text);

        let resume = resolve_resume_context(self.resumes, session.resume_id).await;
        let instruction =
            compose_instruction(SessionBrief::from(&session), &resume, PromptStage::FollowUp);
        let history = build_history(instruction, session.messages());

        let reply = self.chat.converse(&history).await;
        let reply = reply_or_fallback(session_id, reply);

        let message = session.push(MessageRole::Interviewer, reply).clone();
        let saved = self.interviews.save(&session).await?;

        info!(
            "Interview {session_id}: turn recorded, {} messages",
            saved.messages().len()
        );

        Ok(message)
    }
}

/// Instruction first, then every message mapped onto the model's two roles.
pub fn build_history(instruction: String, messages: &[Message]) -> Vec<ChatTurn> {
    std::iter::once(ChatTurn::user(instruction))
        .chain(messages.iter().map(|m| match m.role {
            MessageRole::Candidate => ChatTurn::user(m.content.clone()),
            MessageRole::Interviewer => ChatTurn::assistant(m.content.clone()),
        }))
        .collect()
}

pub(crate) async fn load_owned(
    interviews: &dyn InterviewStore,
    owner: Uuid,
    session_id: Uuid,
) -> Result<InterviewRow, AppError> {
    interviews
        .get_owned(owner, session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {session_id} not found")))
}

fn reply_or_fallback(session_id: Uuid, reply: Completion) -> String {
    match reply {
        Completion::Generated(text) => text,
        Completion::Degraded { reason } => {
            warn!("Interview {session_id}: interviewer model degraded ({reason}), storing fallback reply");
            FALLBACK_REPLY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ChatRole;
    use crate::models::interview::NewInterview;
    use crate::models::resume::ResumeRow;
    use crate::store::memory::{MemoryInterviewStore, MemoryResumeStore};
    use crate::testing::{ScriptedChat, UnavailableResumeStore};

    struct Fixture {
        interviews: MemoryInterviewStore,
        resumes: MemoryResumeStore,
        owner: Uuid,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                interviews: MemoryInterviewStore::default(),
                resumes: MemoryResumeStore::default(),
                owner: Uuid::new_v4(),
            }
        }

        async fn session(&self, resume_id: Option<Uuid>) -> Uuid {
            let row = InterviewRow::new(
                self.owner,
                NewInterview {
                    title: "Backend Engineer".to_string(),
                    description: "Design HTTP APIs".to_string(),
                    experience_years: 3.0,
                    resume_id,
                    questions: vec![],
                },
            );
            self.interviews.insert(&row).await.unwrap();
            row.id
        }

        fn driver<'a>(&'a self, chat: &'a ScriptedChat) -> ConversationDriver<'a> {
            ConversationDriver::new(&self.interviews, &self.resumes, chat)
        }
    }

    #[tokio::test]
    async fn test_start_produces_single_interviewer_message() {
        let fx = Fixture::new();
        let id = fx.session(None).await;
        let chat = ScriptedChat::generated(&["Tell me about an API you designed."]);

        let outcome = fx.driver(&chat).start_session(fx.owner, id).await.unwrap();

        assert!(!outcome.has_resume);
        assert_eq!(outcome.message.role, MessageRole::Interviewer);
        assert_eq!(outcome.message.content, "Tell me about an API you designed.");

        let stored = fx.interviews.snapshot(id).unwrap();
        assert_eq!(stored.messages().len(), 1);

        let calls = chat.conversations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 1);
        assert_eq!(calls[0][0].role, ChatRole::User);
        assert!(calls[0][0].content.contains("Backend Engineer"));
        assert!(!calls[0][0].content.contains("RESUME"));
    }

    #[tokio::test]
    async fn test_restart_resets_finished_session() {
        let fx = Fixture::new();
        let id = fx.session(None).await;
        let chat = ScriptedChat::default();
        let driver = fx.driver(&chat);

        driver.start_session(fx.owner, id).await.unwrap();
        driver.continue_session(fx.owner, id, "My answer").await.unwrap();

        let mut finished = fx.interviews.snapshot(id).unwrap();
        finished.finalize(6.0, "Decent".to_string());
        fx.interviews.save(&finished).await.unwrap();

        driver.start_session(fx.owner, id).await.unwrap();

        let stored = fx.interviews.snapshot(id).unwrap();
        assert_eq!(stored.messages().len(), 1);
        assert_eq!(stored.messages()[0].role, MessageRole::Interviewer);
        assert!(!stored.finished);
        assert!(stored.score.is_none());
        assert!(stored.feedback.is_none());
    }

    #[tokio::test]
    async fn test_start_with_resume_reports_presence_and_embeds_text() {
        let fx = Fixture::new();
        let resume = ResumeRow::new(
            fx.owner,
            "1-2-cv.txt".into(),
            "cv.txt".into(),
            Some("Maintained a payments gateway in Go".into()),
        );
        fx.resumes.insert(&resume).await.unwrap();
        let id = fx.session(Some(resume.id)).await;
        let chat = ScriptedChat::default();

        let outcome = fx.driver(&chat).start_session(fx.owner, id).await.unwrap();

        assert!(outcome.has_resume);
        assert!(chat.conversations()[0][0]
            .content
            .contains("Maintained a payments gateway in Go"));
    }

    #[tokio::test]
    async fn test_dangling_resume_reference_reads_as_absent() {
        let fx = Fixture::new();
        let id = fx.session(Some(Uuid::new_v4())).await;
        let chat = ScriptedChat::default();

        let outcome = fx.driver(&chat).start_session(fx.owner, id).await.unwrap();

        assert!(!outcome.has_resume);
    }

    #[tokio::test]
    async fn test_resume_store_failure_starts_without_resume() {
        let fx = Fixture::new();
        let id = fx.session(Some(Uuid::new_v4())).await;
        let chat = ScriptedChat::default();
        let resumes = UnavailableResumeStore;
        let driver = ConversationDriver::new(&fx.interviews, &resumes, &chat);

        let outcome = driver.start_session(fx.owner, id).await.unwrap();

        assert!(!outcome.has_resume);
        assert_eq!(outcome.message.role, MessageRole::Interviewer);
        assert!(!chat.conversations()[0][0].content.contains("RESUME"));
        assert_eq!(fx.interviews.snapshot(id).unwrap().messages().len(), 1);
    }

    #[tokio::test]
    async fn test_continue_alternates_roles_in_call_order() {
        let fx = Fixture::new();
        let id = fx.session(None).await;
        let chat = ScriptedChat::generated(&["Q1", "Q2", "Q3"]);
        let driver = fx.driver(&chat);

        driver.start_session(fx.owner, id).await.unwrap();
        let second = driver.continue_session(fx.owner, id, "A1").await.unwrap();
        let third = driver.continue_session(fx.owner, id, "A2").await.unwrap();
        assert_eq!(second.content, "Q2");
        assert_eq!(third.content, "Q3");

        let stored = fx.interviews.snapshot(id).unwrap();
        let transcript: Vec<_> = stored
            .messages()
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect();
        assert_eq!(
            transcript,
            vec![
                (MessageRole::Interviewer, "Q1"),
                (MessageRole::Candidate, "A1"),
                (MessageRole::Interviewer, "Q2"),
                (MessageRole::Candidate, "A2"),
                (MessageRole::Interviewer, "Q3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_continue_resends_full_history() {
        let fx = Fixture::new();
        let id = fx.session(None).await;
        let chat = ScriptedChat::generated(&["Q1", "Q2", "Q3"]);
        let driver = fx.driver(&chat);

        driver.start_session(fx.owner, id).await.unwrap();
        driver.continue_session(fx.owner, id, "A1").await.unwrap();
        driver.continue_session(fx.owner, id, "A2").await.unwrap();

        let last = chat.conversations().pop().unwrap();
        let roles: Vec<_> = last.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User,
            ]
        );
        assert!(last[0].content.contains("exactly one new question"));
        assert_eq!(last[4].content, "A2");
    }

    #[tokio::test]
    async fn test_degraded_model_stores_fallback_reply() {
        let fx = Fixture::new();
        let id = fx.session(None).await;
        let chat = ScriptedChat::with_replies([
            Completion::Generated("Q1".into()),
            Completion::Degraded {
                reason: "503".into(),
            },
        ]);
        let driver = fx.driver(&chat);

        driver.start_session(fx.owner, id).await.unwrap();
        let reply = driver.continue_session(fx.owner, id, "A1").await.unwrap();

        assert_eq!(reply.content, FALLBACK_REPLY);
        assert_eq!(fx.interviews.snapshot(id).unwrap().messages().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_or_foreign_session_is_not_found() {
        let fx = Fixture::new();
        let id = fx.session(None).await;
        let chat = ScriptedChat::default();
        let driver = fx.driver(&chat);

        let err = driver.start_session(Uuid::new_v4(), id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = driver
            .continue_session(fx.owner, Uuid::new_v4(), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(chat.conversations().is_empty());
    }

    #[tokio::test]
    async fn test_continue_rejects_finished_session_and_blank_text() {
        let fx = Fixture::new();
        let id = fx.session(None).await;
        let chat = ScriptedChat::default();
        let driver = fx.driver(&chat);
        driver.start_session(fx.owner, id).await.unwrap();

        let err = driver.continue_session(fx.owner, id, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut row = fx.interviews.snapshot(id).unwrap();
        row.finalize(5.0, "ok".into());
        fx.interviews.save(&row).await.unwrap();

        let err = driver.continue_session(fx.owner, id, "late answer").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(fx.interviews.snapshot(id).unwrap().messages().len(), 1);
    }

    #[test]
    fn test_build_history_maps_roles() {
        let messages = vec![
            Message::new(MessageRole::Interviewer, "Q"),
            Message::new(MessageRole::Candidate, "A"),
        ];
        let history = build_history("instruction".to_string(), &messages);
        assert_eq!(
            history,
            vec![
                ChatTurn::user("instruction"),
                ChatTurn::assistant("Q"),
                ChatTurn::user("A"),
            ]
        );
    }
}
