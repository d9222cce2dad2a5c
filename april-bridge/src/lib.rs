//! april-bridge connects a single-threaded native game engine to a mobile OS
//! shell.
//!
//! The OS calls into the app from its UI thread; the engine may only be
//! touched from the render thread. The bridge queues every notification,
//! drains the queue at the start of each frame and owns the engine session
//! lifecycle around it.
//!
//! # Halves
//!
//! - [`PlatformBridge`] lives on the UI thread. It forwards lifecycle, input,
//!   focus and memory callbacks, presents dialogs, tracks the soft keyboard,
//!   follows the auto-rotate setting and measures the display.
//! - [`RenderLoopDriver`] lives on the render thread. It initializes the
//!   engine on the first surface, drains queued notifications before every
//!   frame and tears the session down when the engine stops.
//!
//! # Example
//!
//! ```
//! use april_bridge::{BridgeConfig, Engine, EngineError, FrameStatus};
//!
//! struct Game {
//!     frames: u32,
//! }
//!
//! impl Engine for Game {
//!     fn configure(&mut self, _data_path: &str, _archive_path: &str) {}
//!
//!     fn init(&mut self, _args: &[String]) -> Result<(), EngineError> {
//!         Ok(())
//!     }
//!
//!     fn render_frame(&mut self) -> FrameStatus {
//!         self.frames += 1;
//!         FrameStatus::from_continue(self.frames < 3)
//!     }
//!
//!     fn shutdown(&mut self) {}
//! }
//!
//! let config = BridgeConfig::default().with_package_path("/app.apk");
//! assert_eq!(config.launch_args(), vec!["/app.apk".to_string()]);
//! ```
//!
//! # Device quirks
//!
//! Some devices misreport their display or need a nudge to show the soft
//! keyboard. [`DeviceQuirkTable`] maps hardware identifiers to a
//! [`QuirkProfile`] that the keyboard tracker and the geometry probe consult.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod bridge;
pub mod config;
pub mod dialog;
pub mod engine;
pub mod entry_point;
pub mod error;
pub mod geometry;
pub mod keyboard;
pub mod logging;
pub mod orientation;
pub mod queue;
pub mod quirks;
pub mod render_loop;
pub mod render_thread;
pub mod session;
mod thread_utils;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(test)]
mod testing;

pub use crate::{
    bridge::{Platform, PlatformBridge},
    config::BridgeConfig,
    dialog::{
        ButtonRole, DialogAction, DialogCoordinator, DialogHandle, DialogIcon, DialogOutcome,
        DialogPresenter, DialogRequest, DialogSpec, PresentError,
    },
    engine::{Engine, FrameStatus, InputEvent, LifecycleState, TouchKind},
    entry_point::BridgeEntry,
    error::{BridgeError, BridgeResult, EngineError},
    geometry::{DisplayGeometry, DisplayGeometryProbe, DisplayMetrics, DisplaySource, FrameRect},
    keyboard::{
        ImeResult, InputMethod, KeyboardCorrection, KeyboardLayout, KeyboardLayoutObserver,
        KeyboardVisibilityTracker,
    },
    orientation::{OrientationAutoRotateWatcher, OrientationHost, ScreenOrientation, SettingsSource},
    queue::{DispatchTask, Dispatcher, EventDispatchQueue, RenderContext},
    quirks::{DeviceQuirkTable, HardwareIdentity, QuirkCache, QuirkProfile},
    render_loop::{DriverState, HostShell, RenderLoopDriver},
    render_thread::{FrameSignal, RenderThread},
    session::EngineSession,
};
