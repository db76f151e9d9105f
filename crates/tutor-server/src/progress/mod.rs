//! Gamified progress over WebSocket.
//!
//! [`ProgressHub`] owns one [`ProgressSession`] per open connection and turns
//! client frames into server frames. It never touches a socket, so the socket
//! loop in [`ws`] stays thin and the protocol can be tested directly.
//!
//! Frames are JSON objects `{"event": <name>, "data": <payload>}` in both
//! directions. Clients send `answer_submission` (any payload) and
//! `reset_progress`; the server answers with `progress_update` or `error`.

pub mod ws;

use dashmap::DashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use tutor_core::progress::{SessionSummary, MAX_PROGRESS};
use tutor_core::{ProgressRules, ProgressSession, ProgressUpdate};

/// Unique connection identifier (UUID v4 newtype).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle held by the task serving one connection.
///
/// Owns the connection's RNG; the session itself lives in the hub.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    rng: ChaCha8Rng,
}

impl Connection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

/// A frame sent by the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    AnswerSubmission(Value),
    ResetProgress,
}

#[derive(Debug, Deserialize)]
struct ClientFrame {
    event: String,
    #[serde(default)]
    data: Value,
}

impl ClientEvent {
    /// Parses one text frame.
    pub fn from_frame(text: &str) -> Result<Self, String> {
        let frame: ClientFrame =
            serde_json::from_str(text).map_err(|err| format!("invalid frame: {}", err))?;
        match frame.event.as_str() {
            "answer_submission" => Ok(ClientEvent::AnswerSubmission(frame.data)),
            "reset_progress" => Ok(ClientEvent::ResetProgress),
            other => Err(format!("unknown event '{}'", other)),
        }
    }
}

/// A frame sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    ProgressUpdate(ProgressUpdate),
    Error { message: String },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }
}

/// Aggregate view over the connected sessions (`GET /stats`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressStats {
    pub total_users: usize,
    pub average_progress: f64,
    pub total_answers: u64,
    pub global_accuracy: f64,
    pub users_at_100_percent: usize,
}

/// Registry of progress sessions, keyed by connection.
///
/// Every connection gets its own ChaCha stream derived from the hub seed, so a
/// fixed seed makes each connection's answer sequence reproducible.
pub struct ProgressHub {
    sessions: DashMap<ConnectionId, ProgressSession>,
    rules: ProgressRules,
    seed: u64,
    next_stream: AtomicU64,
}

impl ProgressHub {
    pub fn new(rules: ProgressRules, seed: u64) -> Self {
        ProgressHub {
            sessions: DashMap::new(),
            rules,
            seed,
            next_stream: AtomicU64::new(0),
        }
    }

    pub fn rules(&self) -> &ProgressRules {
        &self.rules
    }

    /// Opens a session and returns the greeting to send.
    pub fn connect(&self) -> (Connection, ServerEvent) {
        let id = ConnectionId(Uuid::new_v4());
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(self.next_stream.fetch_add(1, Ordering::Relaxed));

        let session = ProgressSession::new();
        let greeting = ServerEvent::ProgressUpdate(session.greeting());
        self.sessions.insert(id, session);
        (Connection { id, rng }, greeting)
    }

    /// Applies one client event to the connection's session.
    pub fn handle(&self, conn: &mut Connection, event: ClientEvent) -> ServerEvent {
        let Some(mut session) = self.sessions.get_mut(&conn.id) else {
            return ServerEvent::error("session not found");
        };
        let update = match event {
            ClientEvent::AnswerSubmission(payload) => {
                tracing::debug!(connection = %conn.id, payload = %payload, "answer submitted");
                session.submit_answer(&self.rules, &mut conn.rng)
            }
            ClientEvent::ResetProgress => {
                tracing::debug!(connection = %conn.id, "progress reset");
                session.reset()
            }
        };
        ServerEvent::ProgressUpdate(update)
    }

    /// Parses and applies a text frame; bad frames yield an `error` event.
    pub fn handle_frame(&self, conn: &mut Connection, text: &str) -> ServerEvent {
        match ClientEvent::from_frame(text) {
            Ok(event) => self.handle(conn, event),
            Err(message) => {
                tracing::debug!(connection = %conn.id, error = %message, "rejected frame");
                ServerEvent::error(message)
            }
        }
    }

    /// Closes the session, returning its summary.
    pub fn disconnect(&self, conn: Connection) -> Option<SessionSummary> {
        self.sessions
            .remove(&conn.id)
            .map(|(_, session)| session.summary())
    }

    pub fn connected_users(&self) -> usize {
        self.sessions.len()
    }

    pub fn stats(&self) -> ProgressStats {
        let mut total_progress = 0u64;
        let mut total_answers = 0u64;
        let mut correct_answers = 0u64;
        let mut users_at_100_percent = 0;
        for entry in self.sessions.iter() {
            let session = entry.value();
            total_progress += u64::from(session.progress());
            total_answers += u64::from(session.total_answers());
            correct_answers += u64::from(session.correct_answers());
            if session.progress() >= MAX_PROGRESS {
                users_at_100_percent += 1;
            }
        }

        let total_users = self.sessions.len();
        let average_progress = if total_users == 0 {
            0.0
        } else {
            total_progress as f64 / total_users as f64
        };
        let global_accuracy = if total_answers == 0 {
            0.0
        } else {
            correct_answers as f64 / total_answers as f64 * 100.0
        };

        ProgressStats {
            total_users,
            average_progress,
            total_answers,
            global_accuracy,
            users_at_100_percent,
        }
    }
}
