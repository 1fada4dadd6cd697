use std::collections::HashSet;
use std::sync::Arc;

use super::cursor::ActiveCursor;
use super::event::{SessionEvent, SessionListener};
use super::message::{Message, MessageRole};
use super::model::{Session, SessionPurpose, SessionSummary, now_millis};
use crate::error::{Result, TestOpsError};
use crate::id::IdGenerator;
use crate::storage::{KeyValueStore, KeyValueStoreExt, SESSIONS_KEY};

/// Why hydration fell back to a fresh default session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapReason {
    /// Nothing stored under the sessions key.
    Missing,
    /// The stored value could not be read or is not an array of sessions.
    Corrupted(String),
    /// The stored array was empty.
    Empty,
}

/// Result of [`SessionManager::hydrate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationOutcome {
    /// Sessions were loaded; the first one is active.
    Restored { session_count: usize },
    /// A new `general` session was created and made active.
    Bootstrapped {
        session_id: String,
        reason: BootstrapReason,
    },
}

/// Owns the session collection, the active cursor and the persistence of both.
///
/// `SessionManager` is responsible for:
/// - Creating, selecting and removing sessions
/// - Appending messages to the active session
/// - Hydrating from the key/value store at startup
/// - Re-serializing the whole collection after every mutation
///
/// Sessions are kept most-recent-first: new sessions are inserted at the
/// front. The cursor never references a session that is not in the
/// collection.
pub struct SessionManager {
    pub(crate) sessions: Vec<Session>,
    pub(crate) cursor: ActiveCursor,
    store: Arc<dyn KeyValueStore>,
    ids: Arc<dyn IdGenerator>,
    listeners: Vec<SessionListener>,
}

impl SessionManager {
    /// Creates an empty manager. Call [`hydrate`](Self::hydrate) before use.
    ///
    /// # Arguments
    ///
    /// * `store` - Durable key/value backend for the sessions snapshot
    /// * `ids` - Identifier source for sessions and messages
    pub fn new(store: Arc<dyn KeyValueStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            sessions: Vec::new(),
            cursor: ActiveCursor::default(),
            store,
            ids,
            listeners: Vec::new(),
        }
    }

    /// Registers a callback invoked after every mutation.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Loads the sessions snapshot from the store.
    ///
    /// A missing, unreadable or malformed snapshot is treated as an empty
    /// collection. An empty collection is bootstrapped with one `general`
    /// session. Errors are logged, never returned.
    pub fn hydrate(&mut self) -> HydrationOutcome {
        self.sessions.clear();
        self.cursor.clear();

        let loaded = match self.store.load_json::<Vec<Session>>(SESSIONS_KEY) {
            Ok(Some(sessions)) if sessions.is_empty() => Err(BootstrapReason::Empty),
            Ok(Some(sessions)) => Ok(sessions),
            Ok(None) => Err(BootstrapReason::Missing),
            Err(err) => {
                tracing::warn!(
                    "[SessionManager] Failed to parse stored sessions, starting empty: {}",
                    err
                );
                Err(BootstrapReason::Corrupted(err.to_string()))
            }
        };

        let outcome = match loaded {
            Ok(sessions) => {
                self.sessions = dedupe_by_id(sessions);
                self.cursor.load(&self.sessions[0]);
                tracing::info!(
                    "[SessionManager] Restored {} session(s), active: {}",
                    self.sessions.len(),
                    self.sessions[0].id
                );
                HydrationOutcome::Restored {
                    session_count: self.sessions.len(),
                }
            }
            Err(reason) => {
                let session_id = self.insert_new(SessionPurpose::General);
                if let Err(err) = self.persist() {
                    tracing::warn!(
                        "[SessionManager] Bootstrap session {} kept in memory only: {}",
                        session_id,
                        err
                    );
                }
                tracing::info!(
                    "[SessionManager] Bootstrapped default session {} ({:?})",
                    session_id,
                    reason
                );
                HydrationOutcome::Bootstrapped { session_id, reason }
            }
        };

        self.emit(SessionEvent::Hydrated {
            session_count: self.sessions.len(),
        });
        outcome
    }

    /// Creates a session for `purpose`, makes it active and persists.
    ///
    /// # Returns
    ///
    /// The new session's identifier.
    ///
    /// # Errors
    ///
    /// Returns an error only if the snapshot cannot be written. The session
    /// is still created and active in memory in that case.
    pub fn create(&mut self, purpose: SessionPurpose) -> Result<String> {
        let session_id = self.insert_new(purpose);
        tracing::info!(
            "[SessionManager] Created {} session {}",
            purpose,
            session_id
        );

        self.emit(SessionEvent::Created {
            session_id: session_id.clone(),
            purpose,
        });
        self.persist()?;
        Ok(session_id)
    }

    /// Deletes a session. Unknown identifiers are ignored.
    ///
    /// If the removed session was active, the cursor moves to the first
    /// remaining session or is cleared when none remain.
    pub fn remove(&mut self, session_id: &str) -> Result<()> {
        let Some(index) = self.sessions.iter().position(|s| s.id == session_id) else {
            tracing::debug!("[SessionManager] remove: no session {}", session_id);
            return Ok(());
        };

        self.sessions.remove(index);
        tracing::info!("[SessionManager] Removed session {}", session_id);

        if self.cursor.is_active(session_id) {
            match self.sessions.first() {
                Some(first) => self.cursor.load(first),
                None => self.cursor.clear(),
            }
            self.emit(SessionEvent::Selected {
                session_id: self.cursor.session_id().map(str::to_string),
            });
        }

        self.emit(SessionEvent::Removed {
            session_id: session_id.to_string(),
        });
        self.persist()
    }

    /// Moves the cursor.
    ///
    /// `None` detaches the cursor. An unknown identifier leaves the cursor
    /// where it was.
    ///
    /// # Returns
    ///
    /// `false` if `session_id` names no session, `true` otherwise.
    pub fn select(&mut self, session_id: Option<&str>) -> bool {
        match session_id {
            None => self.cursor.clear(),
            Some(id) => match self.sessions.iter().find(|s| s.id == id) {
                Some(session) => self.cursor.load(session),
                None => {
                    tracing::debug!("[SessionManager] select: no session {}", id);
                    return false;
                }
            },
        }

        self.emit(SessionEvent::Selected {
            session_id: self.cursor.session_id().map(str::to_string),
        });
        true
    }

    /// Appends a message to the active session and persists.
    ///
    /// The timestamp never goes below the previous message's timestamp.
    ///
    /// # Errors
    ///
    /// - `NoActiveSession` if the cursor is detached; nothing is recorded
    /// - Storage errors if the snapshot cannot be written
    pub fn append_message(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Result<Message> {
        let id = self.ids.next_id();
        let session = self.active_session_mut()?;

        let now = now_millis();
        let timestamp = session
            .last_message()
            .map_or(now, |last| last.timestamp.max(now));
        let message = Message {
            id,
            role,
            content: content.into(),
            timestamp,
        };

        session.messages.push(message.clone());
        session.updated_at = session.updated_at.max(timestamp);
        let session_id = session.id.clone();

        if let Some(session) = self.sessions.iter().find(|s| s.id == session_id) {
            self.cursor.sync_messages(session);
        }

        self.emit(SessionEvent::MessageAppended {
            session_id,
            message_id: message.id.clone(),
        });
        self.persist()?;
        Ok(message)
    }

    /// Empties the working message list. Stored sessions are unchanged and
    /// the list is reloaded on the next append or cursor change.
    pub fn clear_messages(&mut self) {
        self.cursor.clear_messages();
    }

    /// Lists sessions most-recent-first.
    pub fn list(&self) -> Vec<SessionSummary> {
        self.sessions.iter().map(SessionSummary::from).collect()
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn get(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.cursor.session_id()
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.cursor.session_id().and_then(|id| self.get(id))
    }

    pub fn current_purpose(&self) -> Option<SessionPurpose> {
        self.cursor.purpose()
    }

    /// Working message list of the active session.
    pub fn messages(&self) -> &[Message] {
        self.cursor.messages()
    }

    /// Writes the full collection to the store.
    pub fn persist(&self) -> Result<()> {
        self.store
            .save_json(SESSIONS_KEY, &self.sessions)
            .inspect_err(|err| {
                tracing::warn!("[SessionManager] Failed to persist sessions: {}", err);
            })
    }

    pub(crate) fn active_session_mut(&mut self) -> Result<&mut Session> {
        let id = self
            .cursor
            .session_id()
            .ok_or(TestOpsError::NoActiveSession)?;
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| TestOpsError::not_found("Session", id))
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }

    fn insert_new(&mut self, purpose: SessionPurpose) -> String {
        let session = Session::new(self.ids.next_id(), purpose, now_millis());
        let session_id = session.id.clone();
        self.cursor.load(&session);
        self.sessions.insert(0, session);
        session_id
    }
}

/// Keeps the first occurrence of every session id.
fn dedupe_by_id(sessions: Vec<Session>) -> Vec<Session> {
    let mut seen = HashSet::new();
    sessions
        .into_iter()
        .filter(|session| {
            let fresh = seen.insert(session.id.clone());
            if !fresh {
                tracing::warn!(
                    "[SessionManager] Dropping duplicate session id {}",
                    session.id
                );
            }
            fresh
        })
        .collect()
}
