//! A stand-in engine that logs what it receives.

use std::time::Instant;

use april_bridge::{Engine, EngineError, FrameStatus, TouchKind};
use tracing::{debug, info};

/// Logs every notification and stops once the user confirms the quit dialog.
pub struct DemoEngine {
    started: Option<Instant>,
    frames: u64,
    quit: bool,
}

impl DemoEngine {
    pub fn new() -> Self {
        Self {
            started: None,
            frames: 0,
            quit: false,
        }
    }
}

impl Engine for DemoEngine {
    fn configure(&mut self, data_path: &str, archive_path: &str) {
        info!(data_path, archive_path, "engine configured");
    }

    fn init(&mut self, args: &[String]) -> Result<(), EngineError> {
        info!(?args, "engine init");
        self.started = Some(Instant::now());
        Ok(())
    }

    fn render_frame(&mut self) -> FrameStatus {
        self.frames += 1;
        if self.frames % 300 == 0 {
            let elapsed = self.started.map(|started| started.elapsed().as_secs_f32());
            debug!(frames = self.frames, ?elapsed, "still rendering");
        }
        FrameStatus::from_continue(!self.quit)
    }

    fn shutdown(&mut self) {
        info!(frames = self.frames, "engine shutdown");
    }

    fn key_down(&mut self, key_code: i32, char_code: u32) {
        debug!(key_code, char = ?char::from_u32(char_code), "key down");
    }

    fn key_up(&mut self, key_code: i32) {
        debug!(key_code, "key up");
    }

    fn touch(&mut self, kind: TouchKind, x: f32, y: f32, pointer_index: i32) {
        debug!(?kind, x, y, pointer_index, "touch");
    }

    fn on_create(&mut self) {
        info!("lifecycle: create");
    }

    fn on_start(&mut self) {
        info!("lifecycle: start");
    }

    fn on_resume(&mut self) {
        info!("lifecycle: resume");
    }

    fn on_pause(&mut self) {
        info!("lifecycle: pause");
    }

    fn on_stop(&mut self) {
        info!("lifecycle: stop");
    }

    fn on_destroy(&mut self) {
        info!("lifecycle: destroy");
    }

    fn on_dialog_yes(&mut self) {
        info!("quit confirmed");
        self.quit = true;
    }

    fn on_dialog_no(&mut self) {
        info!("quit declined");
    }

    fn on_dialog_cancel(&mut self) {
        info!("quit dialog dismissed");
    }

    fn on_window_focus_changed(&mut self, focused: bool) {
        info!(focused, "focus changed");
    }

    fn on_keyboard_changed(&mut self, visible: bool, height_ratio: f32) {
        info!(visible, height_ratio, "soft keyboard changed");
    }

    fn on_surface_created(&mut self) {
        info!("surface recreated");
    }
}
