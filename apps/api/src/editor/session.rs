//! In-memory editing sessions.
//!
//! Each session owns one document snapshot. Edits run under the store's write
//! lock and swap in a new `Arc<Document>`; readers clone the `Arc` and keep a
//! consistent view no matter what happens afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::editor::drag::{DragController, DragState, DropOutcome, GestureEvent, Unchanged};
use crate::editor::seed::seed_document;
use crate::errors::{AppError, EditError};
use crate::models::resume::Document;
use crate::render::template::{Design, DesignUpdate};

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    document: Arc<Document>,
    design: Design,
    drag: DragController,
    /// Bumped on every change to the document or design.
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Session {
    fn new(document: Document) -> Self {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            document: Arc::new(document),
            design: Design::default(),
            drag: DragController::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = Utc::now();
    }

    fn replace_document(&mut self, document: Document) {
        self.document = Arc::new(document);
        self.touch();
    }

    fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            revision: self.revision,
            document: Arc::clone(&self.document),
            design: self.design,
            drag: self.drag.state().clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub revision: u64,
    pub document: Arc<Document>,
    pub design: Design,
    pub drag: DragState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What renderers receive: an immutable document plus the design at one instant.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub document: Arc<Document>,
    pub design: Design,
    pub revision: u64,
}

/// How a finished gesture ended, as reported to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DropReport {
    Moved { from: usize, to: usize },
    Unchanged { reason: Unchanged },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragView {
    /// Present only after a drop or cancel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DropReport>,
    pub session: SessionView,
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    max_sessions: usize,
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }

    /// Opens a session seeded with the sample resume.
    pub async fn create(&self) -> Result<SessionView, AppError> {
        self.create_with(seed_document()).await
    }

    pub async fn create_with(&self, document: Document) -> Result<SessionView, AppError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            return Err(AppError::Capacity(self.max_sessions));
        }
        let session = Session::new(document);
        let view = session.view();
        info!("Session {} created ({} open)", session.id, sessions.len() + 1);
        sessions.insert(session.id, session);
        Ok(view)
    }

    pub async fn view(&self, id: Uuid) -> Result<SessionView, AppError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .map(Session::view)
            .ok_or_else(|| session_not_found(id))
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<Snapshot, AppError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or_else(|| session_not_found(id))?;
        Ok(Snapshot {
            document: Arc::clone(&session.document),
            design: session.design,
            revision: session.revision,
        })
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&id).ok_or_else(|| session_not_found(id))?;
        info!("Session {id} closed ({} open)", sessions.len());
        Ok(())
    }

    /// Runs one mutator against the current snapshot.
    ///
    /// On error the snapshot is left as it was. A mutator that returns an
    /// equal document does not bump the revision.
    pub async fn apply<F>(&self, id: Uuid, op: &'static str, edit: F) -> Result<SessionView, AppError>
    where
        F: FnOnce(&Document) -> Result<Document, EditError>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

        let next = edit(&session.document)?;
        if next == *session.document {
            debug!("Session {id}: {op} left the document unchanged");
        } else {
            session.replace_document(next);
            info!("Session {id}: applied {op} (revision {})", session.revision);
        }
        Ok(session.view())
    }

    pub async fn set_design(&self, id: Uuid, update: &DesignUpdate) -> Result<SessionView, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

        let design = session.design.apply(update)?;
        if design != session.design {
            session.design = design;
            session.touch();
            info!(
                "Session {id}: design set to {} at {}pt",
                design.template.id(),
                design.style.font_size
            );
        }
        Ok(session.view())
    }

    /// Feeds one gesture event to the session's drag controller.
    pub async fn drag(&self, id: Uuid, event: GestureEvent) -> Result<DragView, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

        let outcome = session.drag.handle(&session.document, event)?;
        let report = outcome.map(|outcome| match outcome {
            DropOutcome::Moved { from, to, document } => {
                session.replace_document(document);
                info!("Session {id}: section moved {from} -> {to} by drag");
                DropReport::Moved { from, to }
            }
            DropOutcome::Unchanged(reason) => {
                debug!("Session {id}: gesture ended without a move ({reason:?})");
                DropReport::Unchanged { reason }
            }
        });

        Ok(DragView {
            outcome: report,
            session: session.view(),
        })
    }
}
