//! In-memory session store, injected into handlers through `AppState`.
//!
//! The lock guards map access only; it is never held across a generation call.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::intake::models::IntakePath;
use crate::llm_client::GenerationResult;
use crate::session::state::Session;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(Uuid),

    #[error("A generation for path {0} is already in progress")]
    InFlight(IntakePath),
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session with everything empty.
    pub async fn create(&self) -> Session {
        let session = Session::new();
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session.clone());
        info!("Session {} started ({} active)", session.id, sessions.len());
        session
    }

    /// Returns a snapshot of the session.
    pub async fn get(&self, id: Uuid) -> Result<Session, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Ends a session and drops its state.
    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!("Session {id} ended"))
            .ok_or(SessionError::NotFound(id))
    }

    /// Applies `f` to the session under the write lock and returns the updated snapshot.
    pub async fn update<F>(&self, id: Uuid, f: F) -> Result<Session, SessionError>
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        f(session);
        Ok(session.clone())
    }

    pub async fn set_path(&self, id: Uuid, path: IntakePath) -> Result<Session, SessionError> {
        self.update(id, |s| s.set_path(path)).await
    }

    pub async fn get_result(
        &self,
        id: Uuid,
        path: IntakePath,
    ) -> Result<Option<GenerationResult>, SessionError> {
        Ok(self.get(id).await?.get_result(path).cloned())
    }

    /// Claims the in-flight slot for `path`.
    pub async fn begin_submission(
        &self,
        id: Uuid,
        path: IntakePath,
    ) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        if !session.begin_submission(path) {
            return Err(SessionError::InFlight(path));
        }
        debug!("Session {id}: path {path} submitted");
        Ok(session.clone())
    }

    /// Stores the generation outcome and releases the in-flight slot.
    pub async fn complete_submission(
        &self,
        id: Uuid,
        path: IntakePath,
        result: GenerationResult,
    ) -> Result<Session, SessionError> {
        self.update(id, |s| s.complete_submission(path, result))
            .await
    }

    /// Releases the in-flight slot for `path` without storing a result.
    pub async fn abort_submission(&self, id: Uuid, path: IntakePath) {
        if let Some(session) = self.sessions.write().await.get_mut(&id) {
            session.abort_submission(path);
        }
    }

    /// Non-blocking variant of `abort_submission`. Returns false if the lock is busy.
    fn try_abort_submission(&self, id: Uuid, path: IntakePath) -> bool {
        match self.sessions.try_write() {
            Ok(mut sessions) => {
                if let Some(session) = sessions.get_mut(&id) {
                    session.abort_submission(path);
                }
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
impl SessionStore {
    pub async fn get_path(&self, id: Uuid) -> Result<Option<IntakePath>, SessionError> {
        Ok(self.get(id).await?.get_path())
    }

    pub async fn set_result(
        &self,
        id: Uuid,
        path: IntakePath,
        result: GenerationResult,
    ) -> Result<Session, SessionError> {
        self.update(id, |s| s.set_result(path, result)).await
    }
}

/// Holds a claimed in-flight slot. Dropping it before `disarm` releases the
/// slot, so a submission cancelled mid-generation never locks its path.
pub struct SubmissionGuard {
    sessions: Arc<SessionStore>,
    id: Uuid,
    path: IntakePath,
    armed: bool,
}

impl SubmissionGuard {
    pub fn new(sessions: Arc<SessionStore>, id: Uuid, path: IntakePath) -> Self {
        Self {
            sessions,
            id,
            path,
            armed: true,
        }
    }

    /// Call once the submission has been completed through the store.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(
            "Session {}: path {} submission dropped before completion, releasing slot",
            self.id, self.path
        );
        if self.sessions.try_abort_submission(self.id, self.path) {
            return;
        }
        // Lock busy: finish the release on the runtime.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let sessions = Arc::clone(&self.sessions);
            let (id, path) = (self.id, self.path);
            handle.spawn(async move { sessions.abort_submission(id, path).await });
        }
    }
}
