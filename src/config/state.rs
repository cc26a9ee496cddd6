// Application state module
// Immutable configuration plus the live connection counter

use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::Config;

/// Application state shared by every connection task
pub struct AppState {
    pub config: Config,
    active_connections: AtomicUsize,
}

impl AppState {
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            active_connections: AtomicUsize::new(0),
        }
    }

    /// Reserve a connection slot, `None` when `max_connections` is reached
    pub fn try_acquire_connection(&self) -> Option<usize> {
        // Increment first, then check limit, so concurrent accepts cannot both pass
        let prev = self.active_connections.fetch_add(1, Ordering::SeqCst);
        if let Some(max_conn) = self.config.performance.max_connections {
            if prev >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
                self.active_connections.fetch_sub(1, Ordering::SeqCst);
                return None;
            }
        }
        Some(prev + 1)
    }

    pub fn release_connection(&self) {
        self.active_connections.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}
