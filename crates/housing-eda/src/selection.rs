//! Stale-response shadowing for feature selections.
//!
//! When the user picks a feature the page fires a request for its statistics
//! or distribution. Picking another feature before the first answer arrives
//! must not let that late answer overwrite the newer view. [`SelectionGate`]
//! hands out a ticket per selection and only accepts a response whose ticket
//! is still the latest.
//!
//! # Example
//!
//! ```
//! use housing_eda::selection::SelectionGate;
//!
//! let gate = SelectionGate::new();
//! let first = gate.begin();
//! let second = gate.begin();
//!
//! assert!(gate.apply(second, "RM"));
//! assert!(!gate.apply(first, "LSTAT"));
//! assert_eq!(gate.current(), Some("RM"));
//! ```
//!
//! # Thread Safety
//!
//! `SelectionGate` is `Send + Sync` for `T: Send + Sync` and cheap to clone;
//! clones share the same generation counter and value.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one selection. Later selections have larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SelectionTicket(u64);

impl SelectionTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Applied<T> {
    ticket: SelectionTicket,
    value: T,
}

/// Accepts only the response belonging to the most recent selection.
#[derive(Debug)]
pub struct SelectionGate<T> {
    generation: Arc<AtomicU64>,
    latest: Arc<RwLock<Option<Applied<T>>>>,
}

impl<T> Clone for SelectionGate<T> {
    fn clone(&self) -> Self {
        Self {
            generation: Arc::clone(&self.generation),
            latest: Arc::clone(&self.latest),
        }
    }
}

impl<T> Default for SelectionGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(SelectionGate<String>: Send, Sync, Clone);

impl<T> SelectionGate<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Start a new selection, superseding every ticket issued before.
    ///
    /// Waits for an [`apply`](Self::apply) in progress, so once this returns
    /// no earlier ticket can store a value.
    pub fn begin(&self) -> SelectionTicket {
        let _latest = self.latest.write();
        SelectionTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` belongs to the most recent selection.
    pub fn is_current(&self, ticket: SelectionTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Store `value` if `ticket` is still current. Returns whether it was applied.
    ///
    /// The check and the write happen under the lock [`begin`](Self::begin)
    /// also takes, so a response for a superseded ticket is always dropped.
    pub fn apply(&self, ticket: SelectionTicket, value: T) -> bool {
        let mut latest = self.latest.write();
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation.load(Ordering::SeqCst),
                "dropping stale selection response"
            );
            return false;
        }
        *latest = Some(Applied { ticket, value });
        true
    }

    /// Ticket of the value currently shown, if any.
    pub fn applied_ticket(&self) -> Option<SelectionTicket> {
        self.latest.read().as_ref().map(|applied| applied.ticket)
    }

    /// Drop the shown value without issuing a new ticket.
    pub fn clear(&self) {
        *self.latest.write() = None;
    }
}

impl<T: Clone> SelectionGate<T> {
    /// The most recently applied value.
    pub fn current(&self) -> Option<T> {
        self.latest.read().as_ref().map(|applied| applied.value.clone())
    }
}
