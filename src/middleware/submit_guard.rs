use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::database::Table;
use crate::error::ApiError;

/// At most one in-flight mutation per (user, table).
///
/// A handler holds the returned [`SubmitTicket`] for the duration of its
/// store call; a second submission for the same pair while it is held is
/// rejected instead of queued.
#[derive(Debug, Clone, Default)]
pub struct SubmitGuard {
    inflight: Arc<Mutex<HashSet<(Uuid, Table)>>>,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self, user_id: Uuid, table: Table) -> Option<SubmitTicket> {
        let key = (user_id, table);
        let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        if !inflight.insert(key) {
            return None;
        }
        Some(SubmitTicket { guard: self.clone(), key })
    }

    pub fn begin(&self, user_id: Uuid, table: Table) -> Result<SubmitTicket, ApiError> {
        self.try_begin(user_id, table).ok_or_else(|| {
            tracing::warn!(user_id = %user_id, table = %table, "Duplicate submission rejected");
            ApiError::busy(format!("A {} submission is already in progress", table))
        })
    }

    pub fn in_flight(&self) -> usize {
        self.inflight.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Releases its (user, table) slot on drop.
#[derive(Debug)]
pub struct SubmitTicket {
    guard: SubmitGuard,
    key: (Uuid, Table),
}

impl Drop for SubmitTicket {
    fn drop(&mut self) {
        let mut inflight = self.guard.inflight.lock().unwrap_or_else(|e| e.into_inner());
        inflight.remove(&self.key);
    }
}
