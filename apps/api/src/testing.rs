//! Test doubles shared by the pipeline and router tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::OutputLimits;
use crate::llm_client::{GenerationResult, GenerationService};
use crate::prompt::assembler::GenerationRequest;
use crate::prompt::ruleset::Ruleset;
use crate::session::store::SessionStore;
use crate::state::AppState;

pub const MOCK_DEFAULT_TEXT: &str = "### Mock result";

/// Scripted generator: hands out queued results in order, then a default success.
#[derive(Default)]
pub struct MockGenerator {
    scripted: Mutex<VecDeque<GenerationResult>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(GenerationRequest, u32)>>,
}

impl MockGenerator {
    pub fn new(results: Vec<GenerationResult>) -> Self {
        Self {
            scripted: Mutex::new(results.into()),
            ..Default::default()
        }
    }

    pub fn succeeding(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| GenerationResult::Success {
                    text: t.to_string(),
                })
                .collect(),
        )
    }

    pub fn failing(error: &str) -> Self {
        Self::new(vec![GenerationResult::Failure {
            error: error.to_string(),
        }])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(GenerationRequest, u32)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for MockGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
        max_output_tokens: u32,
    ) -> GenerationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((request.clone(), max_output_tokens));
        self.scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| GenerationResult::Success {
                text: MOCK_DEFAULT_TEXT.to_string(),
            })
    }
}

pub fn test_ruleset() -> Ruleset {
    Ruleset {
        version: "test-rules".to_string(),
        text: "TEST RULESET".to_string(),
    }
}

pub fn test_state<G: GenerationService + 'static>(generator: Arc<G>) -> AppState {
    AppState {
        generator,
        sessions: Arc::new(SessionStore::new()),
        ruleset: Arc::new(test_ruleset()),
        limits: OutputLimits::default(),
    }
}
