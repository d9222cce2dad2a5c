//! Soft keyboard visibility.
//!
//! ## Usage
//!
//! Route explicit show/hide requests and the input method's result codes
//! through [`KeyboardVisibilityTracker`], and feed layout passes to
//! [`KeyboardLayoutObserver`] to learn how much of the view the keyboard
//! covers.

use std::sync::Arc;

use tracing::debug;

use crate::quirks::QuirkCache;

/// Outcome of a show/hide request as the input method reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImeResult {
    /// Was already shown.
    UnchangedShown,
    /// Was already hidden.
    UnchangedHidden,
    /// Became visible.
    Shown,
    /// Became hidden.
    Hidden,
}

impl ImeResult {
    /// Maps the OS result code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::UnchangedShown),
            1 => Some(Self::UnchangedHidden),
            2 => Some(Self::Shown),
            3 => Some(Self::Hidden),
            _ => None,
        }
    }

    /// Whether the keyboard is on screen afterwards.
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Shown | Self::UnchangedShown)
    }
}

/// The OS soft input method.
pub trait InputMethod {
    /// Shows the soft keyboard for the engine's view.
    fn show_soft_input(&self);

    /// Hides the soft keyboard.
    fn hide_soft_input(&self);
}

/// What the tracker did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardCorrection {
    /// The change was taken as genuine.
    None,
    /// One hide-then-show cycle was issued.
    Cycled,
}

/// Decides whether a visibility change needs a corrective hide/show cycle.
///
/// On devices whose profile sets `hack_keyboard_toggle`, the first visible
/// result after an explicit request triggers exactly one cycle.
#[derive(Debug)]
pub struct KeyboardVisibilityTracker {
    quirks: Arc<QuirkCache>,
    armed: bool,
    visible: bool,
}

impl KeyboardVisibilityTracker {
    /// Creates a tracker. It stays disarmed until the first explicit request.
    pub fn new(quirks: Arc<QuirkCache>) -> Self {
        Self {
            quirks,
            armed: false,
            visible: false,
        }
    }

    /// Explicitly shows the keyboard.
    pub fn request_show(&mut self, ime: &dyn InputMethod) {
        self.rearm();
        ime.show_soft_input();
    }

    /// Explicitly hides the keyboard.
    pub fn request_hide(&mut self, ime: &dyn InputMethod) {
        self.rearm();
        ime.hide_soft_input();
    }

    fn rearm(&mut self) {
        self.armed = self.quirks.profile().hack_keyboard_toggle;
    }

    /// Handles the input method's result for a show/hide request.
    pub fn on_result(&mut self, result: ImeResult, ime: &dyn InputMethod) -> KeyboardCorrection {
        self.visible = result.is_visible();
        if !(self.visible && self.armed) {
            return KeyboardCorrection::None;
        }
        self.armed = false;
        debug!(?result, "cycling soft keyboard to work around input method race");
        ime.hide_soft_input();
        ime.show_soft_input();
        KeyboardCorrection::Cycled
    }

    /// Last visibility reported by the input method.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the next visible result would trigger a cycle.
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

/// How much of the root view the keyboard covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardLayout {
    /// Whether the covered share exceeds the threshold.
    pub visible: bool,
    /// Covered share of the root view height, `1 - visible / root`. Not
    /// clamped: a visible frame taller than the root gives a negative ratio.
    pub height_ratio: f32,
}

/// Derives keyboard coverage from window layout passes.
#[derive(Debug, Clone, Copy)]
pub struct KeyboardLayoutObserver {
    threshold: f32,
}

impl KeyboardLayoutObserver {
    /// Creates an observer treating ratios above `threshold` as visible.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Computes coverage from the visible frame height and root view height.
    pub fn on_layout(&self, visible_height: i32, root_height: i32) -> Option<KeyboardLayout> {
        if root_height <= 0 {
            return None;
        }
        let height_ratio = 1.0 - visible_height as f32 / root_height as f32;
        Some(KeyboardLayout {
            visible: height_ratio > self.threshold,
            height_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::{
        ImeResult, KeyboardCorrection, KeyboardLayoutObserver, KeyboardVisibilityTracker,
    };
    use crate::{
        quirks::{HardwareIdentity, QuirkCache},
        testing::FakePlatform,
    };

    fn tracker(board: &str) -> KeyboardVisibilityTracker {
        KeyboardVisibilityTracker::new(Arc::new(QuirkCache::new(HardwareIdentity {
            manufacturer: "HTC".into(),
            model: "Test".into(),
            board: board.into(),
            sdk_version: 8,
        })))
    }

    #[rstest]
    #[case(0, Some(ImeResult::UnchangedShown), true)]
    #[case(1, Some(ImeResult::UnchangedHidden), false)]
    #[case(2, Some(ImeResult::Shown), true)]
    #[case(3, Some(ImeResult::Hidden), false)]
    fn result_codes(#[case] code: i32, #[case] expected: Option<ImeResult>, #[case] visible: bool) {
        let result = ImeResult::from_code(code);
        assert_eq!(result, expected);
        assert_eq!(result.map(ImeResult::is_visible), Some(visible));
    }

    #[test]
    fn unknown_result_code_is_ignored() {
        assert_eq!(ImeResult::from_code(7), None);
    }

    #[test]
    fn quirky_device_cycles_once_per_request() {
        let platform = FakePlatform::default();
        let mut tracker = tracker("mecha");

        tracker.request_show(&platform);
        assert_eq!(
            tracker.on_result(ImeResult::Shown, &platform),
            KeyboardCorrection::Cycled
        );
        assert_eq!(
            tracker.on_result(ImeResult::Shown, &platform),
            KeyboardCorrection::None
        );
        assert_eq!(platform.log.lock().ime, vec!["show", "hide", "show"]);

        tracker.request_hide(&platform);
        assert!(tracker.is_armed());
        assert_eq!(
            tracker.on_result(ImeResult::Hidden, &platform),
            KeyboardCorrection::None
        );
        assert!(tracker.is_armed());
        assert!(!tracker.is_visible());
    }

    #[test]
    fn regular_device_never_cycles() {
        let platform = FakePlatform::default();
        let mut tracker = tracker("msm8960");
        tracker.request_show(&platform);
        assert_eq!(
            tracker.on_result(ImeResult::Shown, &platform),
            KeyboardCorrection::None
        );
        assert_eq!(platform.log.lock().ime, vec!["show"]);
    }

    #[test]
    fn no_cycle_without_explicit_request() {
        let platform = FakePlatform::default();
        let mut tracker = tracker("mecha");
        assert_eq!(
            tracker.on_result(ImeResult::Shown, &platform),
            KeyboardCorrection::None
        );
        assert!(platform.log.lock().ime.is_empty());
    }

    #[test]
    fn layout_ratio_threshold() {
        let observer = KeyboardLayoutObserver::new(0.15);
        let open = observer.on_layout(1000, 2000).expect("root has height");
        assert!(open.visible);
        assert!((open.height_ratio - 0.5).abs() < f32::EPSILON);

        let closed = observer.on_layout(1900, 2000).expect("root has height");
        assert!(!closed.visible);
        assert!(observer.on_layout(100, 0).is_none());

        let taller = observer.on_layout(2200, 2000).expect("root has height");
        assert!(!taller.visible);
        assert!((taller.height_ratio + 0.1).abs() < 1e-6);
    }
}
