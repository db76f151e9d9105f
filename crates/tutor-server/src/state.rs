//! Application state shared by the HTTP handlers.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::agent::TutorAgent;
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::sessions::SessionStore;

/// Shared application state for the HTTP server.
///
/// The master RNG sits behind a `tokio::sync::Mutex`; handlers only hold it
/// long enough to fork a per-request generator with [`AppState::fork_rng`].
#[derive(Clone)]
pub struct AppState {
    /// Conversations and learner profiles, keyed by session id.
    pub sessions: Arc<SessionStore>,
    /// LLM agent (possibly disabled).
    pub agent: Arc<TutorAgent>,
    /// Master RNG for demo responses.
    pub rng: Arc<tokio::sync::Mutex<ChaCha8Rng>>,
}

impl AppState {
    /// Creates the state for a running server.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let agent = TutorAgent::new(config.llm(), config.llm_timeout)?;
        if !agent.is_configured() {
            tracing::warn!("no API key configured, /api/body will serve demo responses");
        }
        let seed = config.rng_seed.unwrap_or_else(rand::random);
        Ok(Self::with_agent(agent, seed))
    }

    /// State with the agent disabled and a fixed seed (for testing).
    pub fn offline(seed: u64) -> Self {
        Self::with_agent(TutorAgent::disabled(), seed)
    }

    pub fn with_agent(agent: TutorAgent, seed: u64) -> Self {
        AppState {
            sessions: Arc::new(SessionStore::new()),
            agent: Arc::new(agent),
            rng: Arc::new(tokio::sync::Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// A generator for one request, seeded from the master RNG.
    pub async fn fork_rng(&self) -> ChaCha8Rng {
        let seed: u64 = self.rng.lock().await.gen();
        ChaCha8Rng::seed_from_u64(seed)
    }
}
