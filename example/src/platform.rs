//! Desktop stand-ins for the mobile OS services.

use april_bridge::{
    DialogHandle, DialogPresenter, DialogSpec, DisplayMetrics, DisplaySource, FrameRect,
    HostShell, InputMethod, OrientationHost, PresentError, ScreenOrientation, SettingsSource,
};
use parking_lot::Mutex;
use tracing::info;
use winit::event_loop::EventLoopProxy;

/// Events the shell posts back to the event loop.
#[derive(Debug, Clone, Copy)]
pub enum ShellEvent {
    /// The engine stopped and the window should close.
    EngineStopped,
}

/// Closes the window when the engine stops.
pub struct DesktopShell {
    proxy: EventLoopProxy<ShellEvent>,
}

impl DesktopShell {
    pub fn new(proxy: EventLoopProxy<ShellEvent>) -> Self {
        Self { proxy }
    }
}

impl HostShell for DesktopShell {
    fn finish(&self) {
        let _ = self.proxy.send_event(ShellEvent::EngineStopped);
    }
}

/// Window-backed platform services.
pub struct DesktopPlatform {
    metrics: Mutex<DisplayMetrics>,
    auto_rotate: Mutex<bool>,
    orientation: Mutex<ScreenOrientation>,
}

impl DesktopPlatform {
    pub fn new() -> Self {
        Self {
            metrics: Mutex::new(DisplayMetrics::default()),
            auto_rotate: Mutex::new(false),
            orientation: Mutex::new(ScreenOrientation::Landscape),
        }
    }

    /// Records the window size and scale.
    pub fn set_window(&self, width: u32, height: u32, scale_factor: f64) {
        let dpi = (96.0 * scale_factor) as f32;
        *self.metrics.lock() = DisplayMetrics {
            width_px: i32::try_from(width).unwrap_or(i32::MAX),
            height_px: i32::try_from(height).unwrap_or(i32::MAX),
            xdpi: dpi,
            ydpi: dpi,
        };
    }

    /// Flips the simulated auto-rotate setting.
    pub fn toggle_auto_rotate(&self) -> bool {
        let mut enabled = self.auto_rotate.lock();
        *enabled = !*enabled;
        *enabled
    }
}

impl DialogPresenter for DesktopPlatform {
    fn present(&self, handle: DialogHandle, spec: &DialogSpec) -> Result<(), PresentError> {
        let labels: Vec<_> = spec
            .buttons
            .iter()
            .map(|button| format!("{:?}: {}", button.role, button.label))
            .collect();
        info!(
            handle = handle.id(),
            title = %spec.title,
            message = %spec.message,
            ?labels,
            "dialog shown, press Y / N to answer or Escape to dismiss"
        );
        Ok(())
    }

    fn present_legacy(&self, handle: DialogHandle, spec: &DialogSpec) -> Result<(), PresentError> {
        self.present(handle, spec)
    }
}

impl InputMethod for DesktopPlatform {
    fn show_soft_input(&self) {
        info!("soft keyboard requested");
    }

    fn hide_soft_input(&self) {
        info!("soft keyboard dismissed");
    }
}

impl SettingsSource for DesktopPlatform {
    fn auto_rotate_enabled(&self) -> Option<bool> {
        Some(*self.auto_rotate.lock())
    }
}

impl OrientationHost for DesktopPlatform {
    fn requested_orientation(&self) -> ScreenOrientation {
        *self.orientation.lock()
    }

    fn set_requested_orientation(&self, orientation: ScreenOrientation) {
        info!(?orientation, "requested orientation changed");
        *self.orientation.lock() = orientation;
    }
}

impl DisplaySource for DesktopPlatform {
    fn metrics(&self) -> DisplayMetrics {
        *self.metrics.lock()
    }

    fn chrome_hidden(&self) -> bool {
        false
    }

    fn visible_frame(&self) -> FrameRect {
        let metrics = self.metrics();
        FrameRect {
            left: 0,
            top: 0,
            right: metrics.width_px,
            bottom: metrics.height_px,
        }
    }
}
