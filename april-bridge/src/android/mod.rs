//! Android backend.
//!
//! ## Usage
//!
//! ```ignore
//! let identity = android::hardware_identity(&app)?;
//! let (bridge, render) = BridgeEntry::new(engine, AndroidShell::new(app.clone()), AndroidPlatform::new(app))
//!     .hardware(identity)
//!     .spawn()?;
//! ```

mod jni;
mod platform;

use tracing::warn;
use winit::platform::android::activity::AndroidApp;

pub use self::{
    jni::AndroidJniError,
    platform::{AndroidPlatform, hardware_identity},
};
use crate::render_loop::HostShell;

/// Closes the activity when the engine stops.
#[derive(Debug, Clone)]
pub struct AndroidShell {
    app: AndroidApp,
}

impl AndroidShell {
    /// Wraps the running activity.
    pub fn new(app: AndroidApp) -> Self {
        Self { app }
    }
}

impl HostShell for AndroidShell {
    fn finish(&self) {
        let finished = jni::with_activity(&self.app, |env, activity| {
            env.call_method(activity, "finish", "()V", &[])
                .and_then(|value| value.v())
                .map_err(|err| jni::map_jni_error(env, err))
        });
        if let Err(err) = finished {
            warn!("failed to finish the activity: {err}");
        }
    }
}
