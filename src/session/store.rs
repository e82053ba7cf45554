//! Per-session navigation context
//!
//! The one piece of cross-request mutable state: the last result set
//! produced for each session and the mode that produced it. Stateless
//! follow-ups ("open result #3") resolve against it instead of
//! re-running the cascade.

use dashmap::DashMap;
use thiserror::Error;

use super::mode::FilterMode;
use crate::core::record::Record;

/// Recoverable, caller-visible selection failures. Both render as an
/// "invalid selection" outcome, never a process error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no context for this session or mode mismatch")]
    ContextMismatch,
    #[error("selection index {index} outside 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// The last result set for one session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub mode: FilterMode,
    pub results: Vec<Record>,
}

/// Concurrent session-id -> context map, last writer wins.
///
/// Interactions for the same session are usually serialized by the
/// transport, but the store does not depend on it: `store` overwrites
/// unconditionally and there is no merge.
pub struct SessionStore {
    sessions: DashMap<String, SessionContext>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Overwrite any prior context for this session.
    pub fn store(&self, session_id: &str, mode: FilterMode, results: Vec<Record>) {
        self.sessions
            .insert(session_id.to_string(), SessionContext { mode, results });
    }

    /// Cloned snapshot of the session's context.
    pub fn retrieve(&self, session_id: &str) -> Option<SessionContext> {
        self.sessions.get(session_id).map(|r| r.clone())
    }

    /// Resolve a selection against the stored context.
    ///
    /// A missing context or a mode other than `expected_mode` is a hard
    /// rejection; an index is only ever applied to the list produced by
    /// the matching mode.
    pub fn resolve(
        &self,
        session_id: &str,
        expected_mode: FilterMode,
        index: usize,
    ) -> Result<Record, ResolveError> {
        let ctx = self
            .sessions
            .get(session_id)
            .ok_or(ResolveError::ContextMismatch)?;
        if ctx.mode != expected_mode {
            return Err(ResolveError::ContextMismatch);
        }
        ctx.results
            .get(index)
            .cloned()
            .ok_or(ResolveError::IndexOutOfRange {
                index,
                len: ctx.results.len(),
            })
    }

    /// Clear the session's context ("return to start").
    pub fn reset(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
