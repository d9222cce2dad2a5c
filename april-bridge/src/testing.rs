//! Test doubles shared by the unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    dialog::{DialogHandle, DialogPresenter, DialogSpec, PresentError},
    engine::{Engine, FrameStatus, TouchKind},
    error::EngineError,
    geometry::{DisplayMetrics, DisplaySource, FrameRect},
    keyboard::InputMethod,
    orientation::{OrientationHost, ScreenOrientation, SettingsSource},
    render_loop::HostShell,
};

/// One observed engine call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Configure(String, String),
    Init(Vec<String>),
    Render,
    Shutdown,
    KeyDown(i32, u32),
    KeyUp(i32),
    Touch(TouchKind, f32, f32, i32),
    ButtonDown(i32, i32),
    ButtonUp(i32, i32),
    AxisChange(i32, i32, f32),
    Create,
    Start,
    Resume,
    Pause,
    Stop,
    Destroy,
    Restart,
    DialogOk,
    DialogYes,
    DialogNo,
    DialogCancel,
    FocusChanged(bool),
    KeyboardChanged(bool, f32),
    LowMemory,
    SurfaceCreated,
}

/// Engine that records every call; clones share the same log.
#[derive(Clone, Default)]
pub(crate) struct RecordingEngine {
    log: Arc<Mutex<Vec<Call>>>,
    /// Frames left before `render_frame` reports `Stop`.
    stop_after: Option<usize>,
    fail_init: bool,
}

impl RecordingEngine {
    pub(crate) fn stopping_after(frames: usize) -> Self {
        Self {
            stop_after: Some(frames),
            ..Self::default()
        }
    }

    pub(crate) fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.log.lock().clone()
    }

    pub(crate) fn count(&self, call: &Call) -> usize {
        self.log.lock().iter().filter(|c| *c == call).count()
    }

    fn push(&self, call: Call) {
        self.log.lock().push(call);
    }
}

impl Engine for RecordingEngine {
    fn configure(&mut self, data_path: &str, archive_path: &str) {
        self.push(Call::Configure(data_path.to_owned(), archive_path.to_owned()));
    }

    fn init(&mut self, args: &[String]) -> Result<(), EngineError> {
        self.push(Call::Init(args.to_vec()));
        if self.fail_init {
            return Err(EngineError::new("init failed"));
        }
        Ok(())
    }

    fn render_frame(&mut self) -> FrameStatus {
        self.push(Call::Render);
        match self.stop_after.as_mut() {
            Some(0) => FrameStatus::Stop,
            Some(left) => {
                *left -= 1;
                FrameStatus::from_continue(*left > 0)
            }
            None => FrameStatus::Continue,
        }
    }

    fn shutdown(&mut self) {
        self.push(Call::Shutdown);
    }

    fn key_down(&mut self, key_code: i32, char_code: u32) {
        self.push(Call::KeyDown(key_code, char_code));
    }

    fn key_up(&mut self, key_code: i32) {
        self.push(Call::KeyUp(key_code));
    }

    fn touch(&mut self, kind: TouchKind, x: f32, y: f32, pointer_index: i32) {
        self.push(Call::Touch(kind, x, y, pointer_index));
    }

    fn button_down(&mut self, controller: i32, button: i32) {
        self.push(Call::ButtonDown(controller, button));
    }

    fn button_up(&mut self, controller: i32, button: i32) {
        self.push(Call::ButtonUp(controller, button));
    }

    fn axis_change(&mut self, controller: i32, axis: i32, value: f32) {
        self.push(Call::AxisChange(controller, axis, value));
    }

    fn on_create(&mut self) {
        self.push(Call::Create);
    }

    fn on_start(&mut self) {
        self.push(Call::Start);
    }

    fn on_resume(&mut self) {
        self.push(Call::Resume);
    }

    fn on_pause(&mut self) {
        self.push(Call::Pause);
    }

    fn on_stop(&mut self) {
        self.push(Call::Stop);
    }

    fn on_destroy(&mut self) {
        self.push(Call::Destroy);
    }

    fn on_restart(&mut self) {
        self.push(Call::Restart);
    }

    fn on_dialog_ok(&mut self) {
        self.push(Call::DialogOk);
    }

    fn on_dialog_yes(&mut self) {
        self.push(Call::DialogYes);
    }

    fn on_dialog_no(&mut self) {
        self.push(Call::DialogNo);
    }

    fn on_dialog_cancel(&mut self) {
        self.push(Call::DialogCancel);
    }

    fn on_window_focus_changed(&mut self, focused: bool) {
        self.push(Call::FocusChanged(focused));
    }

    fn on_keyboard_changed(&mut self, visible: bool, height_ratio: f32) {
        self.push(Call::KeyboardChanged(visible, height_ratio));
    }

    fn on_low_memory(&mut self) {
        self.push(Call::LowMemory);
    }

    fn on_surface_created(&mut self) {
        self.push(Call::SurfaceCreated);
    }
}

/// Host shell that counts close requests.
#[derive(Clone, Default)]
pub(crate) struct CountingShell {
    finished: Arc<Mutex<usize>>,
}

impl CountingShell {
    pub(crate) fn finish_count(&self) -> usize {
        *self.finished.lock()
    }
}

impl HostShell for CountingShell {
    fn finish(&self) {
        *self.finished.lock() += 1;
    }
}

/// Which presentation path the fake platform supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum DialogSupport {
    #[default]
    Modern,
    LegacyOnly,
    ModernFails,
    Broken,
}

/// Everything the fake platform was asked to do.
#[derive(Debug, Default)]
pub(crate) struct PlatformLog {
    pub(crate) presented: Vec<(DialogHandle, DialogSpec)>,
    pub(crate) legacy_presented: Vec<(DialogHandle, DialogSpec)>,
    pub(crate) ime: Vec<&'static str>,
    pub(crate) orientation_writes: Vec<ScreenOrientation>,
}

/// In-memory stand-in for the OS services.
#[derive(Clone)]
pub(crate) struct FakePlatform {
    pub(crate) log: Arc<Mutex<PlatformLog>>,
    pub(crate) dialogs: DialogSupport,
    pub(crate) auto_rotate: Arc<Mutex<Option<bool>>>,
    pub(crate) orientation: Arc<Mutex<ScreenOrientation>>,
    pub(crate) metrics: DisplayMetrics,
    pub(crate) chrome_hidden: bool,
    pub(crate) visible_frame: FrameRect,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            log: Arc::default(),
            dialogs: DialogSupport::Modern,
            auto_rotate: Arc::default(),
            orientation: Arc::new(Mutex::new(ScreenOrientation::Landscape)),
            metrics: DisplayMetrics {
                width_px: 1080,
                height_px: 1920,
                xdpi: 400.0,
                ydpi: 400.0,
            },
            chrome_hidden: false,
            visible_frame: FrameRect::default(),
        }
    }
}

impl DialogPresenter for FakePlatform {
    fn present(&self, handle: DialogHandle, spec: &DialogSpec) -> Result<(), PresentError> {
        match self.dialogs {
            DialogSupport::Modern => {
                self.log.lock().presented.push((handle, spec.clone()));
                Ok(())
            }
            DialogSupport::LegacyOnly | DialogSupport::Broken => {
                Err(PresentError::Unsupported("DialogFragment"))
            }
            DialogSupport::ModernFails => {
                Err(PresentError::Failed("IllegalStateException".into()))
            }
        }
    }

    fn present_legacy(&self, handle: DialogHandle, spec: &DialogSpec) -> Result<(), PresentError> {
        match self.dialogs {
            DialogSupport::Broken => Err(PresentError::Failed("no window".into())),
            _ => {
                self.log.lock().legacy_presented.push((handle, spec.clone()));
                Ok(())
            }
        }
    }
}

impl InputMethod for FakePlatform {
    fn show_soft_input(&self) {
        self.log.lock().ime.push("show");
    }

    fn hide_soft_input(&self) {
        self.log.lock().ime.push("hide");
    }
}

impl SettingsSource for FakePlatform {
    fn auto_rotate_enabled(&self) -> Option<bool> {
        *self.auto_rotate.lock()
    }
}

impl OrientationHost for FakePlatform {
    fn requested_orientation(&self) -> ScreenOrientation {
        *self.orientation.lock()
    }

    fn set_requested_orientation(&self, orientation: ScreenOrientation) {
        *self.orientation.lock() = orientation;
        self.log.lock().orientation_writes.push(orientation);
    }
}

impl DisplaySource for FakePlatform {
    fn metrics(&self) -> DisplayMetrics {
        self.metrics
    }

    fn chrome_hidden(&self) -> bool {
        self.chrome_hidden
    }

    fn visible_frame(&self) -> FrameRect {
        self.visible_frame
    }
}
