use std::sync::Arc;

use crate::config::OutputLimits;
use crate::llm_client::GenerationService;
use crate::prompt::ruleset::Ruleset;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generation backend. `LlmClient` in production, a scripted mock in tests.
    pub generator: Arc<dyn GenerationService>,
    pub sessions: Arc<SessionStore>,
    /// Loaded once at startup and passed through to every request untouched.
    pub ruleset: Arc<Ruleset>,
    pub limits: OutputLimits,
}
