//! Result Presenter — shows the latest result for a path exactly as returned.
//!
//! The text is never parsed or checked against the table contract; it is handed
//! to the operator's view as markdown. Failures get their own shape so the view
//! can style them apart from successful output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::intake::models::IntakePath;
use crate::llm_client::GenerationResult;
use crate::session::state::{Session, SessionPhase};

pub const RESUBMIT_HINT: &str = "You can resubmit the form to try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedResult {
    Empty,
    Markdown { text: String },
    Error { message: String, hint: String },
}

pub fn render(result: Option<&GenerationResult>) -> RenderedResult {
    match result {
        None => RenderedResult::Empty,
        Some(GenerationResult::Success { text }) => RenderedResult::Markdown { text: text.clone() },
        Some(GenerationResult::Failure { error }) => RenderedResult::Error {
            message: format!("Generation failed: {error}"),
            hint: RESUBMIT_HINT.to_string(),
        },
    }
}

/// What the operator's screen shows for a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub phase: SessionPhase,
    pub selected_path: Option<IntakePath>,
    pub in_flight: Vec<IntakePath>,
    /// Rendered result of the selected path only.
    pub result: RenderedResult,
}

pub fn present_session(session: &Session) -> SessionView {
    let result = session
        .get_path()
        .map(|path| render(session.get_result(path)))
        .unwrap_or(RenderedResult::Empty);

    SessionView {
        session_id: session.id,
        created_at: session.created_at,
        phase: session.phase(),
        selected_path: session.get_path(),
        in_flight: session.in_flight_paths(),
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_none_is_empty() {
        assert_eq!(render(None), RenderedResult::Empty);
    }

    #[test]
    fn test_render_success_is_verbatim() {
        let text = "### Report\n| Name | Role/Specialty |\n|---|---|\n";
        let result = GenerationResult::Success {
            text: text.to_string(),
        };
        assert_eq!(
            render(Some(&result)),
            RenderedResult::Markdown {
                text: text.to_string()
            }
        );
    }

    #[test]
    fn test_render_failure_is_distinct() {
        let result = GenerationResult::Failure {
            error: "HTTP error: connection refused".to_string(),
        };
        match render(Some(&result)) {
            RenderedResult::Error { message, hint } => {
                assert!(message.contains("connection refused"));
                assert_eq!(hint, RESUBMIT_HINT);
            }
            other => panic!("expected error rendering, got {other:?}"),
        }
    }

    #[test]
    fn test_rendered_result_json_shape() {
        let json = serde_json::to_value(RenderedResult::Markdown {
            text: "hi".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"kind": "markdown", "text": "hi"}));
    }

    #[test]
    fn test_present_session_shows_selected_path_only() {
        let mut session = Session::new();
        session.set_result(
            IntakePath::Strategy,
            GenerationResult::Success {
                text: "strategy".to_string(),
            },
        );
        session.set_path(IntakePath::Lookup);

        let view = present_session(&session);
        assert_eq!(view.selected_path, Some(IntakePath::Lookup));
        assert_eq!(view.result, RenderedResult::Empty);

        session.set_path(IntakePath::Strategy);
        let view = present_session(&session);
        assert_eq!(
            view.result,
            RenderedResult::Markdown {
                text: "strategy".to_string()
            }
        );
    }

    #[test]
    fn test_session_view_flattens_phase() {
        let view = present_session(&Session::new());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["result"]["kind"], "empty");
        assert!(json["selected_path"].is_null());
    }
}
