//! Stale-result suppression
//!
//! A view takes a [`Ticket`] before awaiting a request and applies the
//! result only if the ticket is still current. Unmounting (or any outside
//! owner holding a [`LifecycleHandle`]) advances the generation, so late
//! responses are dropped instead of applied to a view nobody shows.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation snapshot taken when a request starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Per-view generation counter
#[derive(Debug, Default)]
pub struct Lifecycle {
    generation: Arc<AtomicU64>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.load(Ordering::Acquire))
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Discard every outstanding ticket
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn handle(&self) -> LifecycleHandle {
        LifecycleHandle {
            generation: Arc::clone(&self.generation),
        }
    }
}

/// Cloneable handle that can retire a view's in-flight requests
#[derive(Debug, Clone)]
pub struct LifecycleHandle {
    generation: Arc<AtomicU64>,
}

impl LifecycleHandle {
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}
