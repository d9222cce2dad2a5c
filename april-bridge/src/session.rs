//! Process-lifetime engine session state.

use tracing::info;

/// State of the engine session owned by the render thread.
///
/// A session begins at the first render-surface creation and is reset when
/// the hosting activity is fully destroyed or the engine terminates.
/// The engine is initialized at most once per session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EngineSession {
    initialized: bool,
    running: bool,
    generation: u64,
}

impl EngineSession {
    /// Creates a fresh, uninitialized session.
    pub fn create() -> Self {
        Self::default()
    }

    /// Whether `init` already completed in this session.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the engine is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of sessions that were initialized before this one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
        self.running = true;
    }

    /// Forgets the current session; the next surface creation starts anew.
    pub fn reset(&mut self) {
        if self.initialized {
            info!(generation = self.generation, "engine session reset");
            self.generation += 1;
        }
        self.initialized = false;
        self.running = false;
    }
}
