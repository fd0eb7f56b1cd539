//! Interview conversation state machine.
//!
//! ```text
//! GreetingPending --start--> AwaitingUserTurn --5th assistant reply--> ClosingSent
//! ```
//!
//! The greeting counts as the first assistant reply, so the closing sequence
//! runs while handling the 4th user transcript. `ClosingSent` is terminal:
//! further transcripts are ignored and the peer decides when to hang up.
//!
//! Model calls go straight to [`ChatModel::complete`] with no backoff.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::llm_client::prompts::clip;
use crate::llm_client::{ChatModel, LlmError, LlmInput, Turn};
use crate::models::chat::HrPersonalityRow;

/// Assistant replies after which the interview is wrapped up.
pub const MAX_QUESTIONS: u32 = 5;
pub const DESCRIPTION_LIMIT: usize = 800;

pub const GREETING_PROMPT: &str = "Start the interview with a warm greeting. Do not introduce \
    yourself with a name, just say hello and welcome the candidate, then ask the first interview question.";
pub const CLOSING_PROMPT: &str = "The interview is now complete. Please thank the candidate, give \
    brief overall feedback on their performance, and say goodbye.";
pub const INTERVIEW_END_MESSAGE: &str = "Interview complete.";
pub const AI_ERROR_MESSAGE: &str = "Failed to get response from AI interviewer.";

const GUIDELINES: &str = "Guidelines:\n\
    - Greet the candidate warmly (do NOT introduce yourself with a name)\n\
    - Ask behavioral and technical questions relevant to the role\n\
    - Give brief, encouraging feedback on answers\n\
    - Keep your responses concise (under 30 seconds of speech)\n\
    - Be professional but friendly\n\
    - After 4-5 questions, wrap up with closing remarks and feedback";

fn default_job_title() -> String {
    "this role".to_string()
}

fn default_company() -> String {
    "the company".to_string()
}

/// First frame sent by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewInit {
    #[serde(default = "default_job_title")]
    pub job_title: String,
    #[serde(default = "default_company")]
    pub company: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    UserTranscript {
        #[serde(default)]
        transcript: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected,
    AiResponse { text: String, turn_complete: bool },
    InterviewEnd { message: String },
    Error { message: String },
}

impl ServerMessage {
    pub fn ai_response(text: impl Into<String>) -> Self {
        ServerMessage::AiResponse {
            text: text.into(),
            turn_complete: true,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum OutboxError {
    #[error("peer disconnected")]
    Closed,

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where the session writes its events.
#[async_trait]
pub trait Outbox: Send {
    async fn send(&mut self, message: ServerMessage) -> Result<(), OutboxError>;
}

#[async_trait]
impl Outbox for WebSocket {
    async fn send(&mut self, message: ServerMessage) -> Result<(), OutboxError> {
        let text = serde_json::to_string(&message)?;
        WebSocket::send(self, Message::Text(text)).await.map_err(|e| {
            debug!("Interview socket send failed: {e}");
            OutboxError::Closed
        })
    }
}

#[async_trait]
impl Outbox for Vec<ServerMessage> {
    async fn send(&mut self, message: ServerMessage) -> Result<(), OutboxError> {
        self.push(message);
        Ok(())
    }
}

/// Persona style (or a generic interviewer) followed by the fixed guidelines.
pub fn build_system_instruction(init: &InterviewInit, personality: Option<&HrPersonalityRow>) -> String {
    let description = clip(&init.description, DESCRIPTION_LIMIT);
    let intro = match personality {
        Some(p) => format!(
            "{}\n\nYou are conducting a live practice interview with a candidate \
             for the '{}' role at {}.\nJob description:\n{description}\n\n",
            p.style, init.job_title, init.company
        ),
        None => format!(
            "You are a professional HR interviewer at {}. \
             You are conducting a live practice interview for the '{}' role.\n\
             Job description:\n{description}\n\n",
            init.company, init.job_title
        ),
    };
    intro + GUIDELINES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    GreetingPending,
    AwaitingUserTurn,
    ClosingSent,
}

/// One connection's interview. Owned by the socket task; never shared.
#[derive(Debug)]
pub struct InterviewSession {
    turns: Vec<Turn>,
    questions_asked: u32,
    phase: Phase,
}

impl InterviewSession {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_instruction)],
            questions_asked: 0,
            phase: Phase::GreetingPending,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn questions_asked(&self) -> u32 {
        self.questions_asked
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Sends the greeting. The session accepts transcripts afterwards even
    /// if the greeting call failed.
    pub async fn start<O: Outbox>(
        &mut self,
        model: &dyn ChatModel,
        out: &mut O,
    ) -> Result<(), OutboxError> {
        if self.phase != Phase::GreetingPending {
            return Ok(());
        }
        self.turns.push(Turn::user(GREETING_PROMPT));
        self.phase = Phase::AwaitingUserTurn;

        match self.reply(model).await {
            Ok(text) => {
                self.record_reply(&text);
                out.send(ServerMessage::ai_response(text)).await
            }
            Err(e) => {
                error!("Interview greeting failed: {e}");
                out.send(ServerMessage::error(AI_ERROR_MESSAGE)).await
            }
        }
    }

    /// Handles one user transcript. Blank transcripts and anything after the
    /// closing are ignored without emitting events.
    pub async fn handle_transcript<O: Outbox>(
        &mut self,
        model: &dyn ChatModel,
        out: &mut O,
        transcript: &str,
    ) -> Result<(), OutboxError> {
        if self.phase != Phase::AwaitingUserTurn {
            debug!("Ignoring transcript in phase {:?}", self.phase);
            return Ok(());
        }
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Ok(());
        }

        self.turns.push(Turn::user(transcript));
        match self.reply(model).await {
            Ok(text) => {
                self.record_reply(&text);
                out.send(ServerMessage::ai_response(text)).await?;
            }
            Err(e) => {
                error!("Interview reply failed: {e}");
                return out.send(ServerMessage::error(AI_ERROR_MESSAGE)).await;
            }
        }

        if self.questions_asked >= MAX_QUESTIONS {
            self.close(model, out).await?;
        }
        Ok(())
    }

    async fn close<O: Outbox>(&mut self, model: &dyn ChatModel, out: &mut O) -> Result<(), OutboxError> {
        self.turns.push(Turn::user(CLOSING_PROMPT));
        match self.reply(model).await {
            Ok(text) => {
                self.turns.push(Turn::assistant(text.as_str()));
                out.send(ServerMessage::ai_response(text)).await?;
                out.send(ServerMessage::InterviewEnd {
                    message: INTERVIEW_END_MESSAGE.to_string(),
                })
                .await?;
                self.phase = Phase::ClosingSent;
                info!("Interview closed after {} questions", self.questions_asked);
                Ok(())
            }
            Err(e) => {
                error!("Interview closing failed: {e}");
                out.send(ServerMessage::error(AI_ERROR_MESSAGE)).await
            }
        }
    }

    async fn reply(&self, model: &dyn ChatModel) -> Result<String, LlmError> {
        let text = model.complete(LlmInput::Messages(&self.turns)).await?;
        Ok(text.trim().to_string())
    }

    fn record_reply(&mut self, text: &str) {
        self.turns.push(Turn::assistant(text));
        self.questions_asked += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::llm_client::Role;

    /// Numbers its replies; fails on the listed (1-based) calls.
    struct ScriptedModel {
        calls: AtomicUsize,
        fail_on: Vec<usize>,
    }

    impl ScriptedModel {
        fn new() -> Self {
            Self::failing_on(&[])
        }

        fn failing_on(calls: &[usize]) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: calls.to_vec(),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, input: LlmInput<'_>) -> Result<String, LlmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            assert!(matches!(input, LlmInput::Messages(_)));
            if self.fail_on.contains(&n) {
                return Err(LlmError::EmptyContent);
            }
            Ok(format!("  reply {n}  "))
        }
    }

    fn count(events: &[ServerMessage], pred: fn(&ServerMessage) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    fn is_ai(e: &ServerMessage) -> bool {
        matches!(e, ServerMessage::AiResponse { .. })
    }

    fn is_end(e: &ServerMessage) -> bool {
        matches!(e, ServerMessage::InterviewEnd { .. })
    }

    fn is_error(e: &ServerMessage) -> bool {
        matches!(e, ServerMessage::Error { .. })
    }

    #[tokio::test]
    async fn test_five_transcripts_produce_six_replies_and_one_end() {
        let model = ScriptedModel::new();
        let mut out: Vec<ServerMessage> = Vec::new();
        let mut session = InterviewSession::new("system");

        session.start(&model, &mut out).await.unwrap();
        for i in 0..5 {
            session
                .handle_transcript(&model, &mut out, &format!("answer {i}"))
                .await
                .unwrap();
        }

        assert_eq!(count(&out, is_ai), 6);
        assert_eq!(count(&out, is_end), 1);
        assert!(is_end(out.last().unwrap()));
        assert_eq!(session.phase(), Phase::ClosingSent);
        assert_eq!(session.questions_asked(), MAX_QUESTIONS);
        // greeting + 4 replies + closing; the 5th transcript never reaches the model
        assert_eq!(model.calls(), 6);
    }

    #[tokio::test]
    async fn test_closing_follows_reply_in_same_step() {
        let model = ScriptedModel::new();
        let mut out: Vec<ServerMessage> = Vec::new();
        let mut session = InterviewSession::new("system");

        session.start(&model, &mut out).await.unwrap();
        for i in 0..3 {
            session.handle_transcript(&model, &mut out, &format!("a{i}")).await.unwrap();
        }
        assert_eq!(out.len(), 4);

        session.handle_transcript(&model, &mut out, "a3").await.unwrap();
        assert_eq!(
            &out[4..],
            &[
                ServerMessage::ai_response("reply 5"),
                ServerMessage::ai_response("reply 6"),
                ServerMessage::InterviewEnd {
                    message: INTERVIEW_END_MESSAGE.to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_whitespace_transcript_is_a_no_op() {
        let model = ScriptedModel::new();
        let mut out: Vec<ServerMessage> = Vec::new();
        let mut session = InterviewSession::new("system");
        session.start(&model, &mut out).await.unwrap();
        let turns_before = session.turns().len();

        session.handle_transcript(&model, &mut out, "   \n\t").await.unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(session.questions_asked(), 1);
        assert_eq!(session.turns().len(), turns_before);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_transcript_is_trimmed_and_replies_appended() {
        let model = ScriptedModel::new();
        let mut out: Vec<ServerMessage> = Vec::new();
        let mut session = InterviewSession::new("system");
        session.start(&model, &mut out).await.unwrap();
        session.handle_transcript(&model, &mut out, "  I like Rust  ").await.unwrap();

        let roles: Vec<Role> = session.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(session.turns()[3].content, "I like Rust");
        assert_eq!(session.turns()[4].content, "reply 2");
    }

    #[tokio::test]
    async fn test_failure_emits_error_and_keeps_state() {
        let model = ScriptedModel::failing_on(&[2]);
        let mut out: Vec<ServerMessage> = Vec::new();
        let mut session = InterviewSession::new("system");
        session.start(&model, &mut out).await.unwrap();

        session.handle_transcript(&model, &mut out, "first").await.unwrap();
        assert!(is_error(out.last().unwrap()));
        assert_eq!(session.questions_asked(), 1);
        // the user turn stays appended
        assert_eq!(session.turns().last().unwrap().content, "first");

        session.handle_transcript(&model, &mut out, "second").await.unwrap();
        assert_eq!(out.last().unwrap(), &ServerMessage::ai_response("reply 3"));
        assert_eq!(session.questions_asked(), 2);
    }

    #[tokio::test]
    async fn test_failed_greeting_still_accepts_transcripts() {
        let model = ScriptedModel::failing_on(&[1]);
        let mut out: Vec<ServerMessage> = Vec::new();
        let mut session = InterviewSession::new("system");

        session.start(&model, &mut out).await.unwrap();
        assert_eq!(out, vec![ServerMessage::error(AI_ERROR_MESSAGE)]);
        assert_eq!(session.phase(), Phase::AwaitingUserTurn);
        assert_eq!(session.questions_asked(), 0);

        session.handle_transcript(&model, &mut out, "hello").await.unwrap();
        assert_eq!(session.questions_asked(), 1);
    }

    #[tokio::test]
    async fn test_transcripts_after_close_are_ignored() {
        let model = ScriptedModel::new();
        let mut out: Vec<ServerMessage> = Vec::new();
        let mut session = InterviewSession::new("system");
        session.start(&model, &mut out).await.unwrap();
        for i in 0..4 {
            session.handle_transcript(&model, &mut out, &format!("a{i}")).await.unwrap();
        }
        let events = out.len();
        let calls = model.calls();

        session.handle_transcript(&model, &mut out, "one more thing").await.unwrap();
        assert_eq!(out.len(), events);
        assert_eq!(model.calls(), calls);
    }

    #[test]
    fn test_server_messages_serialize_with_type_tag() {
        assert_eq!(
            serde_json::to_value(ServerMessage::Connected).unwrap(),
            serde_json::json!({ "type": "connected" })
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::ai_response("hi")).unwrap(),
            serde_json::json!({ "type": "ai_response", "text": "hi", "turn_complete": true })
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::error(AI_ERROR_MESSAGE)).unwrap(),
            serde_json::json!({ "type": "error", "message": "Failed to get response from AI interviewer." })
        );
    }

    #[test]
    fn test_client_message_parsing() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"user_transcript","transcript":"hi"}"#).unwrap();
        let ClientMessage::UserTranscript { transcript } = msg;
        assert_eq!(transcript, "hi");
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"ping"}"#).is_err());
    }

    #[test]
    fn test_init_defaults() {
        let init: InterviewInit = serde_json::from_str("{}").unwrap();
        assert_eq!(init.job_title, "this role");
        assert_eq!(init.company, "the company");
        assert_eq!(init.description, "");
    }

    #[test]
    fn test_system_instruction_generic_and_clipped() {
        let init = InterviewInit {
            job_title: "SRE".to_string(),
            company: "Acme".to_string(),
            description: "d".repeat(1000),
        };
        let instruction = build_system_instruction(&init, None);
        assert!(instruction.starts_with("You are a professional HR interviewer at Acme."));
        assert!(instruction.contains(&"d".repeat(DESCRIPTION_LIMIT)));
        assert!(!instruction.contains(&"d".repeat(DESCRIPTION_LIMIT + 1)));
        assert!(instruction.ends_with("wrap up with closing remarks and feedback"));
    }
}
