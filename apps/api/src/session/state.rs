//! Per-session state: the selected path, one result slot per path, and the
//! visible phase of the intake flow.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::intake::models::IntakePath;
use crate::llm_client::GenerationResult;

/// Visible phase of a session.
///
/// Idle → PathSelected(p) → Submitted(p) → ResultShown(p) → Submitted(p) …
/// Switching paths jumps to the new path's ResultShown if it has a stored
/// result, PathSelected otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "path", rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    PathSelected(IntakePath),
    Submitted(IntakePath),
    ResultShown(IntakePath),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    selected_path: Option<IntakePath>,
    phase: SessionPhase,
    strategy_result: Option<GenerationResult>,
    lookup_result: Option<GenerationResult>,
    strategy_in_flight: bool,
    lookup_in_flight: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            selected_path: None,
            phase: SessionPhase::Idle,
            strategy_result: None,
            lookup_result: None,
            strategy_in_flight: false,
            lookup_in_flight: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn get_path(&self) -> Option<IntakePath> {
        self.selected_path
    }

    /// Selects a path and shows whatever that path last produced.
    pub fn set_path(&mut self, path: IntakePath) {
        self.selected_path = Some(path);
        self.phase = if self.is_in_flight(path) {
            SessionPhase::Submitted(path)
        } else if self.get_result(path).is_some() {
            SessionPhase::ResultShown(path)
        } else {
            SessionPhase::PathSelected(path)
        };
    }

    pub fn get_result(&self, path: IntakePath) -> Option<&GenerationResult> {
        match path {
            IntakePath::Strategy => self.strategy_result.as_ref(),
            IntakePath::Lookup => self.lookup_result.as_ref(),
        }
    }

    /// Overwrites the slot for `path`. The previous result is dropped.
    pub fn set_result(&mut self, path: IntakePath, result: GenerationResult) {
        match path {
            IntakePath::Strategy => self.strategy_result = Some(result),
            IntakePath::Lookup => self.lookup_result = Some(result),
        }
    }

    pub fn is_in_flight(&self, path: IntakePath) -> bool {
        match path {
            IntakePath::Strategy => self.strategy_in_flight,
            IntakePath::Lookup => self.lookup_in_flight,
        }
    }

    pub fn in_flight_paths(&self) -> Vec<IntakePath> {
        [IntakePath::Strategy, IntakePath::Lookup]
            .into_iter()
            .filter(|p| self.is_in_flight(*p))
            .collect()
    }

    /// Marks `path` as submitted. Returns false if it already has a call in flight.
    pub fn begin_submission(&mut self, path: IntakePath) -> bool {
        if self.is_in_flight(path) {
            return false;
        }
        self.set_in_flight(path, true);
        self.selected_path = Some(path);
        self.phase = SessionPhase::Submitted(path);
        true
    }

    /// Stores the outcome of a submission. The phase only moves to ResultShown
    /// if the operator is still looking at `path`.
    pub fn complete_submission(&mut self, path: IntakePath, result: GenerationResult) {
        self.set_result(path, result);
        self.set_in_flight(path, false);
        if self.selected_path == Some(path) {
            self.phase = SessionPhase::ResultShown(path);
        }
    }

    /// Releases the in-flight slot for `path` without storing a result.
    /// A session still waiting on `path` falls back to that path's visible state.
    pub fn abort_submission(&mut self, path: IntakePath) {
        self.set_in_flight(path, false);
        if self.phase == SessionPhase::Submitted(path) {
            self.set_path(path);
        }
    }

    fn set_in_flight(&mut self, path: IntakePath, value: bool) {
        match path {
            IntakePath::Strategy => self.strategy_in_flight = value,
            IntakePath::Lookup => self.lookup_in_flight = value,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
