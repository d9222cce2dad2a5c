//! Runs a [`RenderLoopDriver`] on a dedicated thread.
//!
//! Hosts whose OS does not provide a render thread (desktop shells, tests)
//! feed the driver with [`FrameSignal`]s instead of calling its hooks.

use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
};

use tracing::{debug, info};

use crate::{
    engine::{Engine, FrameStatus},
    error::{BridgeError, BridgeResult},
    queue::Dispatcher,
    render_loop::{DriverState, HostShell, RenderLoopDriver},
};

/// A render-surface event delivered to the render thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSignal {
    /// The surface was created or recreated.
    SurfaceCreated,
    /// The surface changed size.
    SurfaceChanged {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// Time to render a frame.
    DrawFrame,
    /// Stop the thread after delivering queued notifications.
    Shutdown,
}

/// Handle to a render thread started by [`RenderThread::spawn`].
#[derive(Debug)]
pub struct RenderThread {
    signals: mpsc::Sender<FrameSignal>,
    dispatcher: Dispatcher,
    handle: JoinHandle<DriverState>,
}

impl RenderThread {
    /// Moves `driver` onto a new thread named after its configuration.
    pub fn spawn<E, H>(driver: RenderLoopDriver<E, H>) -> BridgeResult<Self>
    where
        E: Engine + 'static,
        H: HostShell + 'static,
    {
        let (signals, receiver) = mpsc::channel::<FrameSignal>();
        let dispatcher = driver.dispatcher();
        let handle = thread::Builder::new()
            .name(driver.config().render_thread_name.clone())
            .spawn(move || signal_loop(driver, receiver))?;
        Ok(Self {
            signals,
            dispatcher,
            handle,
        })
    }

    /// Sends a signal. Returns `false` once the thread has stopped.
    pub fn send(&self, signal: FrameSignal) -> bool {
        self.signals.send(signal).is_ok()
    }

    /// Submit handle of the driver's dispatch queue.
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Asks the thread to stop and waits for it, returning the final state.
    pub fn join(self) -> BridgeResult<DriverState> {
        // Fails only if the thread already stopped on its own.
        let _ = self.signals.send(FrameSignal::Shutdown);
        self.handle
            .join()
            .map_err(|_| BridgeError::RenderThreadPanicked)
    }
}

fn signal_loop<E: Engine, H: HostShell>(
    mut driver: RenderLoopDriver<E, H>,
    receiver: mpsc::Receiver<FrameSignal>,
) -> DriverState {
    for signal in receiver {
        match signal {
            FrameSignal::SurfaceCreated => driver.on_surface_created(),
            FrameSignal::SurfaceChanged { width, height } => {
                driver.on_surface_changed(width, height)
            }
            FrameSignal::DrawFrame => {
                if driver.on_draw_frame() == FrameStatus::Stop {
                    info!("render thread stopping after {} frames", driver.frames());
                    break;
                }
            }
            FrameSignal::Shutdown => {
                debug!("render thread shutdown requested");
                driver.flush();
                break;
            }
        }
    }
    driver.state()
}
