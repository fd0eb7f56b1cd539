//! WebSocket driver for the interview state machine.
//!
//! Frame order: client init → `connected` → greeting → transcript loop.
//! An unparseable init closes the socket with 1011; later frames that do
//! not parse are skipped.

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::chat::find_personality;
use crate::interview::session::{
    build_system_instruction, ClientMessage, InterviewInit, InterviewSession, Outbox, OutboxError,
    ServerMessage,
};
use crate::state::AppState;

#[derive(Debug, Error)]
enum SocketError {
    #[error("invalid init payload: {0}")]
    InvalidInit(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Outbox(#[from] OutboxError),
}

/// The client side of an interview connection.
#[async_trait]
pub trait InterviewPeer: Outbox {
    /// Next text (or UTF-8 binary) payload; `None` once the peer is gone.
    async fn recv_payload(&mut self) -> Option<String>;

    /// Ends the connection with close code 1011.
    async fn close_with_error(&mut self);
}

#[async_trait]
impl InterviewPeer for WebSocket {
    async fn recv_payload(&mut self) -> Option<String> {
        while let Some(frame) = self.recv().await {
            match frame {
                Ok(Message::Text(text)) => return Some(text),
                Ok(Message::Binary(bytes)) => {
                    return Some(String::from_utf8_lossy(&bytes).into_owned())
                }
                Ok(Message::Close(_)) => return None,
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Err(e) => {
                    debug!("Interview socket receive failed: {e}");
                    return None;
                }
            }
        }
        None
    }

    async fn close_with_error(&mut self) {
        let frame = CloseFrame {
            code: close_code::ERROR,
            reason: "".into(),
        };
        if let Err(e) = WebSocket::send(self, Message::Close(Some(frame))).await {
            debug!("Close frame not delivered: {e}");
        }
    }
}

/// GET /ws/interview/:application_id
pub async fn handle_interview_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> Response {
    ws.on_upgrade(move |mut socket| async move {
        run_interview(&mut socket, &state, &application_id).await
    })
}

async fn run_interview<P: InterviewPeer>(peer: &mut P, state: &AppState, application_id: &str) {
    info!("Interview socket opened: {application_id}");
    match drive(peer, state).await {
        Ok(()) | Err(SocketError::Outbox(OutboxError::Closed)) => {
            info!("Interview socket closed: {application_id}");
        }
        Err(e) => {
            error!("Interview socket {application_id} failed: {e}");
            peer.close_with_error().await;
        }
    }
}

async fn drive<P: InterviewPeer>(peer: &mut P, state: &AppState) -> Result<(), SocketError> {
    let Some(raw) = peer.recv_payload().await else {
        return Ok(());
    };
    let init: InterviewInit = serde_json::from_str(&raw)?;

    let model = match state.llm.model() {
        Ok(model) => model,
        Err(e) => {
            warn!("Interview requested while AI is disabled");
            peer.send(ServerMessage::error(e.to_string())).await?;
            return Ok(());
        }
    };
    let personality = find_personality(&state.db, &init.company).await?;

    let mut session = InterviewSession::new(build_system_instruction(&init, personality.as_ref()));
    peer.send(ServerMessage::Connected).await?;
    session.start(model.as_ref(), &mut *peer).await?;

    while let Some(raw) = peer.recv_payload().await {
        match serde_json::from_str::<ClientMessage>(&raw) {
            Ok(ClientMessage::UserTranscript { transcript }) => {
                session
                    .handle_transcript(model.as_ref(), &mut *peer, &transcript)
                    .await?;
            }
            Err(e) => debug!("Skipping unrecognised interview frame: {e}"),
        }
    }
    Ok(())
}
