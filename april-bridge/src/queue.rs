//! Single-consumer task queue between the UI thread and the render thread.
//!
//! ## Usage
//!
//! UI-thread code holds a [`Dispatcher`] and submits work; the render loop
//! owns the [`EventDispatchQueue`] and drains it once per frame.

use std::{
    collections::VecDeque,
    fmt, mem,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::Mutex;
use tracing::{debug, error};

use crate::{
    engine::Engine,
    error::{BridgeError, BridgeResult, EngineError},
    session::EngineSession,
};

/// A unit of work that delivers one notification to the engine.
pub type DispatchTask = Box<dyn FnOnce(&mut RenderContext<'_>) -> Result<(), EngineError> + Send>;

/// What a task can reach while it runs on the render thread.
pub struct RenderContext<'a> {
    engine: &'a mut dyn Engine,
    session: &'a mut EngineSession,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(engine: &'a mut dyn Engine, session: &'a mut EngineSession) -> Self {
        Self { engine, session }
    }

    /// The engine, borrowed for the duration of the task.
    pub fn engine(&mut self) -> &mut dyn Engine {
        &mut *self.engine
    }

    /// The current session.
    pub fn session(&self) -> &EngineSession {
        self.session
    }

    /// Resets the session after the activity was destroyed.
    pub fn reset_session(&mut self) {
        self.session.reset();
    }
}

struct Shared {
    tasks: Mutex<VecDeque<DispatchTask>>,
    closed: AtomicBool,
}

/// Cloneable submit handle, usable from any thread.
#[derive(Clone)]
pub struct Dispatcher {
    shared: Arc<Shared>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pending", &self.shared.tasks.lock().len())
            .field("closed", &self.shared.closed.load(Ordering::Acquire))
            .finish()
    }
}

impl Dispatcher {
    /// Appends a task. Never blocks on the render thread.
    pub fn submit<F>(&self, task: F) -> BridgeResult<()>
    where
        F: FnOnce(&mut RenderContext<'_>) -> Result<(), EngineError> + Send + 'static,
    {
        let mut tasks = self.shared.tasks.lock();
        // Checked under the lock so a task cannot slip in behind `close`.
        if self.shared.closed.load(Ordering::Acquire) {
            debug!("dropping notification submitted after session termination");
            return Err(BridgeError::SessionTerminated);
        }
        tasks.push_back(Box::new(task));
        Ok(())
    }

    /// Submits a plain engine notification.
    pub fn notify<F>(&self, notification: F) -> BridgeResult<()>
    where
        F: FnOnce(&mut dyn Engine) + Send + 'static,
    {
        self.submit(move |context| {
            notification(context.engine());
            Ok(())
        })
    }

    /// Number of tasks waiting for the next drain.
    pub fn pending(&self) -> usize {
        self.shared.tasks.lock().len()
    }

    /// Whether the queue stopped accepting tasks.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }
}

/// Consumer end of the queue, owned by the render loop.
pub struct EventDispatchQueue {
    shared: Arc<Shared>,
}

impl fmt::Debug for EventDispatchQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatchQueue")
            .field("pending", &self.shared.tasks.lock().len())
            .finish()
    }
}

impl Default for EventDispatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDispatchQueue {
    /// Creates an empty, open queue.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                tasks: Mutex::new(VecDeque::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Returns a submit handle bound to this queue.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            shared: self.shared.clone(),
        }
    }

    /// Runs every task that was queued when the drain started, in order.
    ///
    /// Tasks submitted while draining wait for the next call. The first
    /// failing task aborts the drain and the rest of the batch is dropped.
    /// A task that ends the session stops the drain; the rest of the batch
    /// goes back to the front of the queue for the next session.
    pub(crate) fn drain(&mut self, mut context: RenderContext<'_>) -> BridgeResult<usize> {
        let mut batch = mem::take(&mut *self.shared.tasks.lock());
        let total = batch.len();
        let in_session = context.session().is_initialized();
        let mut ran = 0;
        while let Some(task) = batch.pop_front() {
            if let Err(err) = task(&mut context) {
                error!(
                    "dispatch task {} of {} failed, dropping {} queued notifications: {}",
                    ran + 1,
                    total,
                    batch.len(),
                    err
                );
                return Err(BridgeError::EngineFatal(err));
            }
            ran += 1;
            if in_session && !context.session().is_initialized() {
                if !batch.is_empty() {
                    debug!("session ended, deferring {} notifications", batch.len());
                    let mut tasks = self.shared.tasks.lock();
                    batch.append(&mut tasks);
                    *tasks = batch;
                }
                break;
            }
        }
        Ok(ran)
    }

    /// Stops accepting tasks and drops everything still queued.
    pub(crate) fn close(&mut self) {
        let mut tasks = self.shared.tasks.lock();
        self.shared.closed.store(true, Ordering::Release);
        let dropped = tasks.len();
        tasks.clear();
        if dropped > 0 {
            debug!("discarded {dropped} notifications on queue close");
        }
    }

    /// Accepts tasks again after the session was reset.
    pub(crate) fn reopen(&mut self) {
        self.shared.closed.store(false, Ordering::Release);
    }
}
