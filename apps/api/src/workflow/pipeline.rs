//! Submission pipeline — the one path every form submission takes.
//!
//! Flow: collect (validate) → assemble → generate → store → present.
//!
//! A rejected form never reaches the generator and never touches a stored
//! result. A generation failure is stored like any other result; the operator
//! sees it and may resubmit.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::collector::{collect_full_intake, collect_quick_lookup, Rejected};
use crate::intake::models::{FullIntakeForm, IntakePath, QuickLookupForm};
use crate::presenter::{present_session, SessionView};
use crate::prompt::assembler::{assemble_full, assemble_quick, GenerationRequest};
use crate::session::store::SubmissionGuard;
use crate::state::AppState;

/// Path A: personalized strategy with COI list.
pub async fn submit_strategy(
    state: &AppState,
    session_id: Uuid,
    form: &FullIntakeForm,
) -> Result<SessionView, AppError> {
    let request =
        collect_full_intake(form).map(|record| assemble_full(&record, &state.ruleset));
    run_submission(state, session_id, IntakePath::Strategy, request).await
}

/// Path B: quick COI lookup.
pub async fn submit_lookup(
    state: &AppState,
    session_id: Uuid,
    form: &QuickLookupForm,
) -> Result<SessionView, AppError> {
    let request =
        collect_quick_lookup(form).map(|record| assemble_quick(&record, &state.ruleset));
    run_submission(state, session_id, IntakePath::Lookup, request).await
}

async fn run_submission(
    state: &AppState,
    session_id: Uuid,
    path: IntakePath,
    request: Result<GenerationRequest, Rejected>,
) -> Result<SessionView, AppError> {
    let request = match request {
        Ok(request) => request,
        Err(rejected) => {
            // The operator stays on this path's form; stored results are untouched.
            state.sessions.set_path(session_id, path).await?;
            warn!("Session {session_id}: path {path} submission rejected ({rejected})");
            return Err(rejected.into());
        }
    };

    state.sessions.begin_submission(session_id, path).await?;
    // Released on drop if the caller goes away before the result is stored.
    let guard = SubmissionGuard::new(Arc::clone(&state.sessions), session_id, path);

    let max_output_tokens = state.limits.for_path(path);
    info!(
        "Session {session_id}: generating path {path} (ruleset {}, task {} chars)",
        state.ruleset.version,
        request.task.len()
    );

    let result = state.generator.generate(&request, max_output_tokens).await;

    if result.is_success() {
        info!("Session {session_id}: path {path} result stored");
    } else {
        warn!("Session {session_id}: path {path} generation failed, failure stored");
    }

    let completed = state
        .sessions
        .complete_submission(session_id, path, result)
        .await;
    guard.disarm();

    Ok(present_session(&completed?))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::intake::models::FieldInput;
    use crate::llm_client::{GenerationResult, GenerationService};
    use crate::presenter::RenderedResult;
    use crate::session::state::SessionPhase;
    use crate::testing::{test_state, MockGenerator, MOCK_DEFAULT_TEXT};

    /// Never answers, like a web-search call the client gave up on.
    struct StalledGenerator;

    #[async_trait]
    impl GenerationService for StalledGenerator {
        async fn generate(&self, _request: &GenerationRequest, _max_tokens: u32) -> GenerationResult {
            std::future::pending().await
        }
    }

    fn strategy_form(zip: &str, segments: &str) -> FullIntakeForm {
        FullIntakeForm {
            zip: zip.to_string(),
            segments: FieldInput::Text(segments.to_string()),
            ..Default::default()
        }
    }

    fn lookup_form(zip: &str) -> QuickLookupForm {
        QuickLookupForm {
            zip: zip.to_string(),
            coi_type: "cpa_tax_advisor".to_string(),
            extra_context: String::new(),
        }
    }

    #[tokio::test]
    async fn test_strategy_submission_end_to_end() {
        let generator = Arc::new(MockGenerator::succeeding(&["### Report\n..."]));
        let state = test_state(generator.clone());
        let session = state.sessions.create().await;

        let view = submit_strategy(
            &state,
            session.id,
            &strategy_form("07302", "Affluent Mid-Career Families"),
        )
        .await
        .unwrap();

        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        let (request, max_tokens) = &requests[0];
        assert!(request.task.contains("07302"));
        assert!(request.task.contains("Affluent Mid-Career Families"));
        assert!(request.task.contains("up to 125 total"));
        assert_eq!(request.instructions, "TEST RULESET");
        assert_eq!(*max_tokens, state.limits.strategy);

        assert_eq!(
            state
                .sessions
                .get_result(session.id, IntakePath::Strategy)
                .await
                .unwrap(),
            Some(GenerationResult::Success {
                text: "### Report\n...".to_string()
            })
        );
        assert_eq!(view.phase, SessionPhase::ResultShown(IntakePath::Strategy));
        assert_eq!(
            view.result,
            RenderedResult::Markdown {
                text: "### Report\n...".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_zip_never_reaches_generator() {
        let generator = Arc::new(MockGenerator::default());
        let state = test_state(generator.clone());
        let session = state.sessions.create().await;

        let err = submit_lookup(&state, session.id, &lookup_form(""))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref msg) if msg == "zip required"));
        assert_eq!(generator.call_count(), 0);
        let stored = state.sessions.get(session.id).await.unwrap();
        assert_eq!(stored.phase(), SessionPhase::PathSelected(IntakePath::Lookup));
        assert!(stored.get_result(IntakePath::Lookup).is_none());
    }

    #[tokio::test]
    async fn test_rejected_submission_keeps_prior_result() {
        let generator = Arc::new(MockGenerator::succeeding(&["first"]));
        let state = test_state(generator.clone());
        let session = state.sessions.create().await;

        submit_strategy(&state, session.id, &strategy_form("10001", ""))
            .await
            .unwrap();
        assert!(submit_strategy(&state, session.id, &strategy_form("  ", ""))
            .await
            .is_err());

        assert_eq!(generator.call_count(), 1);
        let stored = state.sessions.get(session.id).await.unwrap();
        assert_eq!(
            stored.get_result(IntakePath::Strategy),
            Some(&GenerationResult::Success {
                text: "first".to_string()
            })
        );
        assert_eq!(stored.phase(), SessionPhase::ResultShown(IntakePath::Strategy));
    }

    #[tokio::test]
    async fn test_generation_failure_is_stored_and_rendered() {
        let generator = Arc::new(MockGenerator::failing("HTTP error: connection reset"));
        let state = test_state(generator.clone());
        let session = state.sessions.create().await;

        let view = submit_lookup(&state, session.id, &lookup_form("07302"))
            .await
            .unwrap();

        assert!(matches!(
            state
                .sessions
                .get_result(session.id, IntakePath::Lookup)
                .await
                .unwrap(),
            Some(GenerationResult::Failure { .. })
        ));
        assert!(matches!(view.result, RenderedResult::Error { .. }));
        assert_eq!(view.phase, SessionPhase::ResultShown(IntakePath::Lookup));
    }

    #[tokio::test]
    async fn test_second_submission_overwrites_first() {
        let generator = Arc::new(MockGenerator::succeeding(&["first result", "second result"]));
        let state = test_state(generator.clone());
        let session = state.sessions.create().await;

        submit_strategy(&state, session.id, &strategy_form("07302", ""))
            .await
            .unwrap();
        submit_strategy(&state, session.id, &strategy_form("10001", ""))
            .await
            .unwrap();

        let requests = generator.requests();
        assert!(requests[1].0.task.contains("10001"));
        assert_eq!(
            state
                .sessions
                .get_result(session.id, IntakePath::Strategy)
                .await
                .unwrap(),
            Some(GenerationResult::Success {
                text: "second result".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_identical_submissions_always_regenerate() {
        let generator = Arc::new(MockGenerator::default());
        let state = test_state(generator.clone());
        let session = state.sessions.create().await;

        for _ in 0..2 {
            submit_lookup(&state, session.id, &lookup_form("07302"))
                .await
                .unwrap();
        }

        assert_eq!(generator.call_count(), 2);
        assert_eq!(generator.requests()[1].1, state.limits.lookup);
    }

    #[tokio::test]
    async fn test_failure_on_one_path_keeps_other_path_result() {
        let generator = Arc::new(MockGenerator::new(vec![
            GenerationResult::Success {
                text: "strategy ok".to_string(),
            },
            GenerationResult::Failure {
                error: "timeout".to_string(),
            },
        ]));
        let state = test_state(generator.clone());
        let session = state.sessions.create().await;

        submit_strategy(&state, session.id, &strategy_form("07302", ""))
            .await
            .unwrap();
        submit_lookup(&state, session.id, &lookup_form("07302"))
            .await
            .unwrap();

        let stored = state.sessions.get(session.id).await.unwrap();
        assert!(stored.get_result(IntakePath::Strategy).unwrap().is_success());
        assert!(!stored.get_result(IntakePath::Lookup).unwrap().is_success());
    }

    #[tokio::test]
    async fn test_submission_while_in_flight_conflicts() {
        let generator = Arc::new(MockGenerator::default());
        let state = test_state(generator.clone());
        let session = state.sessions.create().await;
        state
            .sessions
            .begin_submission(session.id, IntakePath::Strategy)
            .await
            .unwrap();

        let err = submit_strategy(&state, session.id, &strategy_form("07302", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(generator.call_count(), 0);

        let view = submit_lookup(&state, session.id, &lookup_form("07302"))
            .await
            .unwrap();
        assert_eq!(
            view.result,
            RenderedResult::Markdown {
                text: MOCK_DEFAULT_TEXT.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let generator = Arc::new(MockGenerator::default());
        let state = test_state(generator.clone());

        let err = submit_lookup(&state, Uuid::new_v4(), &lookup_form("07302"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_submission_releases_path() {
        let state = test_state(Arc::new(StalledGenerator));
        let session = state.sessions.create().await;

        let attempt = tokio::time::timeout(
            Duration::from_millis(50),
            submit_strategy(&state, session.id, &strategy_form("07302", "")),
        )
        .await;
        assert!(attempt.is_err());

        let stored = state.sessions.get(session.id).await.unwrap();
        assert!(stored.in_flight_paths().is_empty());
        assert_eq!(stored.phase(), SessionPhase::PathSelected(IntakePath::Strategy));
        assert!(stored.get_result(IntakePath::Strategy).is_none());
        assert!(state
            .sessions
            .begin_submission(session.id, IntakePath::Strategy)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_resubmission_keeps_prior_result() {
        let generator = Arc::new(MockGenerator::succeeding(&["first"]));
        let state = test_state(generator);
        let session = state.sessions.create().await;
        submit_strategy(&state, session.id, &strategy_form("07302", ""))
            .await
            .unwrap();

        let stalled = AppState {
            generator: Arc::new(StalledGenerator),
            ..state.clone()
        };
        let attempt = tokio::time::timeout(
            Duration::from_millis(50),
            submit_strategy(&stalled, session.id, &strategy_form("10001", "")),
        )
        .await;
        assert!(attempt.is_err());

        let view = submit_strategy(&state, session.id, &strategy_form("10001", ""))
            .await
            .unwrap();
        assert_eq!(
            view.result,
            RenderedResult::Markdown {
                text: MOCK_DEFAULT_TEXT.to_string()
            }
        );
    }
}
