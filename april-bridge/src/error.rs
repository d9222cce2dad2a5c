//! Error types for the bridge.
//!
//! ## Usage
//!
//! Engines report unrecoverable failures with [`EngineError`]; everything the
//! bridge itself can fail with is a [`BridgeError`].

use std::borrow::Cow;

use thiserror::Error;

/// Unrecoverable failure reported by the native engine.
///
/// Returning this from [`Engine::init`](crate::Engine::init) or from a
/// dispatch task tears the session down. It is never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
    message: Cow<'static, str>,
}

impl EngineError {
    /// Creates an engine error with a human readable message.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message passed by the engine.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The running OS lacks a primitive the bridge prefers; a fallback exists.
    #[error("platform capability missing: {0}")]
    PlatformCapabilityMissing(&'static str),
    /// Neither the modern nor the legacy dialog presentation worked.
    #[error("dialog could not be presented: {0}")]
    DialogPresentation(String),
    /// The engine reported a failure; the session is terminated.
    #[error("engine failure: {0}")]
    EngineFatal(#[from] EngineError),
    /// The session is gone and no longer accepts notifications.
    #[error("engine session terminated")]
    SessionTerminated,
    /// The dedicated render thread could not be spawned.
    #[error("failed to spawn render thread: {0}")]
    RenderThread(#[from] std::io::Error),
    /// The dedicated render thread panicked.
    #[error("render thread panicked")]
    RenderThreadPanicked,
}

/// Result alias used throughout the crate.
pub type BridgeResult<T> = Result<T, BridgeError>;
