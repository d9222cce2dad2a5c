//! Follows the system auto-rotate setting.

use tracing::debug;

/// Requested screen orientation of the host activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenOrientation {
    /// No preference.
    Unspecified,
    /// Fixed landscape.
    Landscape,
    /// Fixed portrait.
    Portrait,
    /// Any orientation the sensor picks.
    Sensor,
    /// Landscape, flipped by the sensor.
    SensorLandscape,
    /// Portrait, flipped by the sensor.
    SensorPortrait,
    /// Any other OS orientation code.
    Other(i32),
}

impl ScreenOrientation {
    /// Maps the OS orientation code.
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => Self::Unspecified,
            0 => Self::Landscape,
            1 => Self::Portrait,
            4 => Self::Sensor,
            6 => Self::SensorLandscape,
            7 => Self::SensorPortrait,
            other => Self::Other(other),
        }
    }

    /// The OS orientation code.
    pub fn code(self) -> i32 {
        match self {
            Self::Unspecified => -1,
            Self::Landscape => 0,
            Self::Portrait => 1,
            Self::Sensor => 4,
            Self::SensorLandscape => 6,
            Self::SensorPortrait => 7,
            Self::Other(code) => code,
        }
    }
}

/// Read access to system settings.
pub trait SettingsSource {
    /// The "auto-rotate enabled" setting, `None` if unset.
    fn auto_rotate_enabled(&self) -> Option<bool>;
}

/// The activity whose requested orientation is adjusted.
pub trait OrientationHost {
    /// Currently requested orientation.
    fn requested_orientation(&self) -> ScreenOrientation;

    /// Requests a new orientation.
    fn set_requested_orientation(&self, orientation: ScreenOrientation);
}

/// Orientation the activity should request after the setting changed.
///
/// Returns `None` when the current orientation stays. Applying the result
/// again yields `None`, so re-delivered notifications settle immediately.
pub fn auto_rotate_target(
    auto_rotate: bool,
    current: ScreenOrientation,
) -> Option<ScreenOrientation> {
    use ScreenOrientation::*;
    // `Other` may carry a code that has a named variant.
    match (auto_rotate, ScreenOrientation::from_code(current.code())) {
        (true, Landscape) => Some(SensorLandscape),
        (true, Portrait) => Some(SensorPortrait),
        (false, SensorLandscape) => Some(Landscape),
        (false, SensorPortrait) => Some(Portrait),
        _ => None,
    }
}

/// Reacts to changes of the auto-rotate system setting.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationAutoRotateWatcher;

impl OrientationAutoRotateWatcher {
    /// The watcher also receives notifications for its own writes, so toggles
    /// made concurrently by the settings app are never missed. This relies on
    /// [`auto_rotate_target`] being idempotent.
    pub const DELIVERS_SELF_NOTIFICATIONS: bool = true;

    /// Creates a watcher.
    pub fn new() -> Self {
        Self
    }

    /// Handles one change notification and returns the orientation written.
    pub fn on_change(
        &self,
        self_change: bool,
        settings: &dyn SettingsSource,
        host: &dyn OrientationHost,
    ) -> Option<ScreenOrientation> {
        let enabled = settings.auto_rotate_enabled().unwrap_or(false);
        let current = host.requested_orientation();
        let target = auto_rotate_target(enabled, current)?;
        debug!(
            self_change,
            enabled,
            from = ?current,
            to = ?target,
            "auto-rotate setting changed"
        );
        host.set_requested_orientation(target);
        Some(target)
    }
}
