//! The render-thread side of the bridge.
//!
//! ## Usage
//!
//! Call the frame hooks of [`RenderLoopDriver`] from the thread that owns
//! the render surface: [`on_surface_created`](RenderLoopDriver::on_surface_created),
//! [`on_surface_changed`](RenderLoopDriver::on_surface_changed) and
//! [`on_draw_frame`](RenderLoopDriver::on_draw_frame).

use std::thread::{self, ThreadId};

use tracing::{debug, error, info, warn};

use crate::{
    config::BridgeConfig,
    engine::{Engine, FrameStatus},
    error::BridgeError,
    queue::{Dispatcher, EventDispatchQueue, RenderContext},
    session::EngineSession,
    thread_utils,
};

/// Lifecycle of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No engine session yet.
    Uninitialized,
    /// The engine is being configured and initialized.
    Initializing,
    /// Frames are being rendered.
    Running,
    /// The engine stopped; the host was asked to close.
    Terminated,
}

/// The OS shell hosting the engine.
pub trait HostShell: Send {
    /// Asks the host (the activity) to close.
    fn finish(&self);
}

/// Owns the engine and drives it from the render thread.
///
/// Notifications reach the engine only through the dispatch queue, which is
/// drained in full before every frame.
pub struct RenderLoopDriver<E: Engine, H: HostShell> {
    engine: E,
    shell: H,
    session: EngineSession,
    queue: EventDispatchQueue,
    config: BridgeConfig,
    state: DriverState,
    owner: Option<ThreadId>,
    frames: u64,
}

impl<E: Engine, H: HostShell> std::fmt::Debug for RenderLoopDriver<E, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderLoopDriver")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl<E: Engine, H: HostShell> RenderLoopDriver<E, H> {
    /// Creates a driver with its own dispatch queue.
    pub fn new(engine: E, shell: H, config: BridgeConfig) -> Self {
        Self {
            engine,
            shell,
            session: EngineSession::create(),
            queue: EventDispatchQueue::new(),
            config,
            state: DriverState::Uninitialized,
            owner: None,
            frames: 0,
        }
    }

    /// Submit handle for UI-thread collaborators.
    pub fn dispatcher(&self) -> Dispatcher {
        self.queue.dispatcher()
    }

    /// Current state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Current session.
    pub fn session(&self) -> &EngineSession {
        &self.session
    }

    /// Configuration the driver was created with.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Frames rendered in this driver's lifetime.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The render surface was created.
    ///
    /// The first signal initializes the engine; later ones (context loss)
    /// only notify it.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn on_surface_created(&mut self) {
        self.check_thread();
        match self.state {
            DriverState::Uninitialized => self.initialize(),
            DriverState::Running => self.engine.on_surface_created(),
            DriverState::Initializing => {
                warn!("surface created while the engine is initializing, ignoring");
            }
            DriverState::Terminated => debug!("surface created after termination, ignoring"),
        }
    }

    /// The render surface changed size.
    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        self.check_thread();
        debug!(width, height, "render surface changed");
    }

    /// Drains pending notifications, then renders one frame.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn on_draw_frame(&mut self) -> FrameStatus {
        self.check_thread();
        match self.state {
            DriverState::Running => {}
            DriverState::Terminated => return FrameStatus::Stop,
            DriverState::Uninitialized | DriverState::Initializing => {
                return FrameStatus::Continue;
            }
        }

        if let Some(status) = self.drain_pending() {
            return status;
        }

        let status = self.engine.render_frame();
        self.frames += 1;
        if status == FrameStatus::Stop {
            info!(frames = self.frames, "engine requested stop");
            self.finish();
        }
        status
    }

    /// Delivers queued notifications without rendering, used when the
    /// render thread is about to exit.
    pub(crate) fn flush(&mut self) {
        if self.state == DriverState::Running {
            self.drain_pending();
        }
    }

    /// Runs the queued tasks. Returns the frame status when no frame should
    /// be rendered afterwards.
    fn drain_pending(&mut self) -> Option<FrameStatus> {
        let drained = self
            .queue
            .drain(RenderContext::new(&mut self.engine, &mut self.session));
        if let Err(err) = drained {
            self.terminate(&err);
            return Some(FrameStatus::Stop);
        }
        if !self.session.is_initialized() {
            // The activity was destroyed; the next surface starts a new session.
            info!("engine session ended by the host");
            self.state = DriverState::Uninitialized;
            return Some(FrameStatus::Continue);
        }
        None
    }

    fn initialize(&mut self) {
        self.state = DriverState::Initializing;
        if self.config.demote_render_thread {
            thread_utils::demote_current_thread();
        }
        thread_utils::set_thread_name(&self.config.render_thread_name);

        self.engine
            .configure(&self.config.data_path, &self.config.archive_path);
        let args = self.config.launch_args();
        match self.engine.init(&args) {
            Ok(()) => {
                self.session.mark_initialized();
                self.queue.reopen();
                self.state = DriverState::Running;
                info!(
                    generation = self.session.generation(),
                    "engine initialized"
                );
            }
            Err(err) => self.terminate(&BridgeError::EngineFatal(err)),
        }
    }

    fn terminate(&mut self, reason: &BridgeError) {
        error!("terminating engine session: {reason}");
        self.finish();
    }

    fn finish(&mut self) {
        self.queue.close();
        if self.session.is_initialized() {
            self.engine.shutdown();
        }
        self.session.reset();
        self.state = DriverState::Terminated;
        self.shell.finish();
    }

    fn check_thread(&mut self) {
        let current = thread::current().id();
        match self.owner {
            None => self.owner = Some(current),
            Some(owner) => debug_assert_eq!(
                owner, current,
                "render loop entered from a thread other than the render thread"
            ),
        }
    }
}
