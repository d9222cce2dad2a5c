//! The UI-thread surface the OS shell talks to.
//!
//! ## Usage
//!
//! The host forwards every OS callback to the matching hook of
//! [`PlatformBridge`]. Hooks never touch the engine; they queue work for the
//! render thread or answer from platform services directly.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    config::BridgeConfig,
    dialog::{
        DialogAction, DialogCoordinator, DialogHandle, DialogOutcome, DialogPresenter,
        DialogRequest,
    },
    engine::{InputEvent, LifecycleState},
    error::BridgeResult,
    geometry::{DisplayGeometry, DisplayGeometryProbe, DisplaySource},
    keyboard::{
        ImeResult, InputMethod, KeyboardCorrection, KeyboardLayoutObserver,
        KeyboardVisibilityTracker,
    },
    orientation::{
        OrientationAutoRotateWatcher, OrientationHost, ScreenOrientation, SettingsSource,
    },
    queue::Dispatcher,
    quirks::QuirkCache,
};

/// Every OS service the bridge consumes.
pub trait Platform:
    DialogPresenter + InputMethod + SettingsSource + OrientationHost + DisplaySource
{
}

impl<T> Platform for T where
    T: DialogPresenter + InputMethod + SettingsSource + OrientationHost + DisplaySource
{
}

/// UI-thread half of the bridge.
#[derive(Debug)]
pub struct PlatformBridge<P: Platform> {
    platform: P,
    dispatcher: Dispatcher,
    quirks: Arc<QuirkCache>,
    dialogs: DialogCoordinator,
    keyboard: KeyboardVisibilityTracker,
    layout: KeyboardLayoutObserver,
    orientation: OrientationAutoRotateWatcher,
    geometry: DisplayGeometryProbe,
    lifecycle: Option<LifecycleState>,
}

impl<P: Platform> PlatformBridge<P> {
    /// Creates the bridge for `platform`, submitting through `dispatcher`.
    pub fn new(
        platform: P,
        dispatcher: Dispatcher,
        quirks: Arc<QuirkCache>,
        config: &BridgeConfig,
    ) -> Self {
        debug!(profile = ?quirks.profile(), "device quirks resolved");
        Self {
            dialogs: DialogCoordinator::new(dispatcher.clone()),
            keyboard: KeyboardVisibilityTracker::new(quirks.clone()),
            layout: KeyboardLayoutObserver::new(config.keyboard_visible_threshold),
            orientation: OrientationAutoRotateWatcher::new(),
            geometry: DisplayGeometryProbe::new(quirks.clone()),
            lifecycle: None,
            platform,
            dispatcher,
            quirks,
        }
    }

    /// The wrapped platform services.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Submit handle of the render thread's queue.
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Quirks of the running device.
    pub fn quirks(&self) -> &QuirkCache {
        &self.quirks
    }

    /// Forwards an activity lifecycle callback.
    ///
    /// Transitions the OS should never produce are logged but still
    /// forwarded in order. `Destroyed` also shuts the engine down and ends
    /// the session.
    pub fn on_lifecycle(&mut self, state: LifecycleState) -> BridgeResult<()> {
        if !state.can_follow(self.lifecycle) {
            warn!(from = ?self.lifecycle, to = ?state, "unexpected lifecycle transition");
        }
        self.lifecycle = Some(state);
        debug!(?state, "lifecycle");

        if state == LifecycleState::Destroyed {
            return self.dispatcher.submit(|context| {
                context.engine().on_destroy();
                context.engine().shutdown();
                context.reset_session();
                Ok(())
            });
        }
        self.dispatcher.notify(move |engine| state.notify(engine))
    }

    /// Last lifecycle state seen.
    pub fn lifecycle(&self) -> Option<LifecycleState> {
        self.lifecycle
    }

    /// Forwards an input event.
    pub fn on_input(&self, event: InputEvent) -> BridgeResult<()> {
        self.dispatcher.notify(move |engine| event.deliver(engine))
    }

    /// Forwards a window focus change.
    pub fn on_window_focus_changed(&self, focused: bool) -> BridgeResult<()> {
        debug!(focused, "window focus changed");
        self.dispatcher
            .notify(move |engine| engine.on_window_focus_changed(focused))
    }

    /// Forwards a low memory warning.
    pub fn on_low_memory(&self) -> BridgeResult<()> {
        warn!("system reports low memory");
        self.dispatcher.notify(|engine| engine.on_low_memory())
    }

    /// Handles a global layout pass of the content view.
    ///
    /// Zero-height roots are ignored.
    pub fn on_keyboard_layout(&self, visible_height: i32, root_height: i32) -> BridgeResult<()> {
        let Some(layout) = self.layout.on_layout(visible_height, root_height) else {
            return Ok(());
        };
        self.dispatcher.notify(move |engine| {
            engine.on_keyboard_changed(layout.visible, layout.height_ratio)
        })
    }

    /// Asks the input method to show the soft keyboard.
    pub fn show_virtual_keyboard(&mut self) {
        self.keyboard.request_show(&self.platform);
    }

    /// Asks the input method to hide the soft keyboard.
    pub fn hide_virtual_keyboard(&mut self) {
        self.keyboard.request_hide(&self.platform);
    }

    /// Handles the input method's result code for a show/hide request.
    pub fn on_keyboard_result(&mut self, code: i32) -> KeyboardCorrection {
        match ImeResult::from_code(code) {
            Some(result) => self.keyboard.on_result(result, &self.platform),
            None => {
                debug!(code, "ignoring unknown input method result");
                KeyboardCorrection::None
            }
        }
    }

    /// Last keyboard visibility reported by the input method.
    pub fn keyboard_visible(&self) -> bool {
        self.keyboard.is_visible()
    }

    /// Handles a change notification of the auto-rotate setting.
    pub fn on_settings_changed(&self, self_change: bool) -> Option<ScreenOrientation> {
        self.orientation
            .on_change(self_change, &self.platform, &self.platform)
    }

    /// Presents a dialog on behalf of the engine.
    pub fn show_dialog(&mut self, request: &DialogRequest) -> DialogHandle {
        self.dialogs.open(request, &self.platform)
    }

    /// Handles the user's answer to a presented dialog.
    pub fn on_dialog_result(
        &mut self,
        handle: DialogHandle,
        action: DialogAction,
    ) -> Option<DialogOutcome> {
        self.dialogs.resolve(handle, action)
    }

    /// The dialog coordinator.
    pub fn dialogs(&self) -> &DialogCoordinator {
        &self.dialogs
    }

    /// Current usable display geometry.
    pub fn display_geometry(&self) -> DisplayGeometry {
        self.geometry.measure(&self.platform)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::PlatformBridge;
    use crate::{
        config::BridgeConfig,
        dialog::{ButtonRole, DialogAction, DialogOutcome, DialogRequest},
        engine::{InputEvent, LifecycleState, TouchKind},
        error::BridgeError,
        keyboard::KeyboardCorrection,
        orientation::ScreenOrientation,
        quirks::{HardwareIdentity, QuirkCache},
        render_loop::{DriverState, RenderLoopDriver},
        testing::{Call, CountingShell, FakePlatform, RecordingEngine},
    };

    struct Harness {
        engine: RecordingEngine,
        shell: CountingShell,
        platform: FakePlatform,
        bridge: PlatformBridge<FakePlatform>,
        driver: RenderLoopDriver<RecordingEngine, CountingShell>,
    }

    fn harness(board: &str) -> Harness {
        let engine = RecordingEngine::default();
        let shell = CountingShell::default();
        let platform = FakePlatform::default();
        let config = BridgeConfig::default().with_demoted_render_thread(false);
        let driver = RenderLoopDriver::new(engine.clone(), shell.clone(), config.clone());
        let quirks = Arc::new(QuirkCache::new(HardwareIdentity {
            manufacturer: "HTC".into(),
            model: "Desire".into(),
            board: board.into(),
            sdk_version: 8,
        }));
        let bridge = PlatformBridge::new(platform.clone(), driver.dispatcher(), quirks, &config);
        Harness {
            engine,
            shell,
            platform,
            bridge,
            driver,
        }
    }

    impl Harness {
        /// Engine calls after configure and init.
        fn delivered(&self) -> Vec<Call> {
            self.engine.calls().into_iter().skip(2).collect()
        }
    }

    #[test]
    fn lifecycle_and_input_arrive_in_order() {
        let mut h = harness("bravo");
        h.driver.on_surface_created();
        h.bridge.on_lifecycle(LifecycleState::Created).expect("open");
        h.bridge.on_lifecycle(LifecycleState::Started).expect("open");
        h.bridge.on_lifecycle(LifecycleState::Resumed).expect("open");
        h.bridge
            .on_input(InputEvent::Touch {
                kind: TouchKind::Down,
                x: 10.0,
                y: 20.0,
                pointer_index: 0,
            })
            .expect("open");
        h.bridge.on_window_focus_changed(true).expect("open");
        h.bridge.on_low_memory().expect("open");
        h.driver.on_draw_frame();

        assert_eq!(
            h.delivered(),
            vec![
                Call::Create,
                Call::Start,
                Call::Resume,
                Call::Touch(TouchKind::Down, 10.0, 20.0, 0),
                Call::FocusChanged(true),
                Call::LowMemory,
                Call::Render,
            ]
        );
    }

    #[test]
    fn unexpected_transitions_are_still_forwarded() {
        let mut h = harness("bravo");
        h.driver.on_surface_created();
        h.bridge.on_lifecycle(LifecycleState::Resumed).expect("open");
        h.bridge.on_lifecycle(LifecycleState::Resumed).expect("open");
        h.driver.on_draw_frame();

        assert_eq!(h.bridge.lifecycle(), Some(LifecycleState::Resumed));
        assert_eq!(h.engine.count(&Call::Resume), 2);
    }

    #[test]
    fn destroyed_ends_the_session() {
        let mut h = harness("bravo");
        h.driver.on_surface_created();
        h.bridge.on_lifecycle(LifecycleState::Created).expect("open");
        h.bridge.on_lifecycle(LifecycleState::Destroyed).expect("open");
        h.driver.on_draw_frame();

        assert_eq!(
            h.delivered(),
            vec![Call::Create, Call::Destroy, Call::Shutdown]
        );
        assert_eq!(h.driver.state(), DriverState::Uninitialized);
        assert_eq!(h.shell.finish_count(), 0);
    }

    #[test]
    fn keyboard_layout_is_reported_with_its_ratio() {
        let mut h = harness("bravo");
        h.driver.on_surface_created();
        h.bridge.on_keyboard_layout(1200, 1920).expect("open");
        h.bridge.on_keyboard_layout(1900, 1920).expect("open");
        h.bridge.on_keyboard_layout(0, 0).expect("ignored");
        h.driver.on_draw_frame();

        let calls = h.delivered();
        assert_eq!(calls.len(), 3);
        match (&calls[0], &calls[1]) {
            (Call::KeyboardChanged(true, tall), Call::KeyboardChanged(false, short)) => {
                assert!((tall - 0.375).abs() < 1e-6);
                assert!(*short < 0.15);
            }
            other => panic!("unexpected calls {other:?}"),
        }
    }

    #[test]
    fn quirky_keyboard_is_cycled_once() {
        let mut h = harness("mecha");
        h.bridge.show_virtual_keyboard();
        assert_eq!(h.bridge.on_keyboard_result(2), KeyboardCorrection::Cycled);
        assert_eq!(h.bridge.on_keyboard_result(0), KeyboardCorrection::None);
        assert_eq!(h.bridge.on_keyboard_result(42), KeyboardCorrection::None);
        assert!(h.bridge.keyboard_visible());
        assert_eq!(h.platform.log.lock().ime, vec!["show", "hide", "show"]);
    }

    #[test]
    fn regular_keyboard_is_left_alone() {
        let mut h = harness("bravo");
        h.bridge.show_virtual_keyboard();
        assert_eq!(h.bridge.on_keyboard_result(2), KeyboardCorrection::None);
        h.bridge.hide_virtual_keyboard();
        assert_eq!(h.bridge.on_keyboard_result(3), KeyboardCorrection::None);
        assert!(!h.bridge.keyboard_visible());
        assert_eq!(h.platform.log.lock().ime, vec!["show", "hide"]);
    }

    #[test]
    fn auto_rotate_toggle_updates_orientation() {
        let h = harness("bravo");
        *h.platform.auto_rotate.lock() = Some(true);
        assert_eq!(
            h.bridge.on_settings_changed(false),
            Some(ScreenOrientation::SensorLandscape)
        );
        assert_eq!(h.bridge.on_settings_changed(true), None);
    }

    #[test]
    fn dialog_outcome_goes_through_the_queue() {
        let mut h = harness("bravo");
        h.driver.on_surface_created();
        let handle = h.bridge.show_dialog(
            &DialogRequest::new()
                .title("Quit?")
                .yes("Yes")
                .no("No")
                .cancel("Later"),
        );
        assert_eq!(h.bridge.dialogs().active(), Some(handle));
        assert_eq!(
            h.bridge
                .on_dialog_result(handle, DialogAction::Button(ButtonRole::Negative)),
            Some(DialogOutcome::No)
        );
        assert!(h.delivered().is_empty());

        h.driver.on_draw_frame();
        assert_eq!(h.delivered(), vec![Call::DialogNo, Call::Render]);
    }

    #[test]
    fn hooks_fail_after_termination() {
        let engine = RecordingEngine::stopping_after(1);
        let shell = CountingShell::default();
        let config = BridgeConfig::default().with_demoted_render_thread(false);
        let mut driver = RenderLoopDriver::new(engine, shell, config.clone());
        let quirks = Arc::new(QuirkCache::new(HardwareIdentity::default()));
        let mut bridge =
            PlatformBridge::new(FakePlatform::default(), driver.dispatcher(), quirks, &config);
        driver.on_surface_created();
        driver.on_draw_frame();

        assert!(matches!(
            bridge.on_lifecycle(LifecycleState::Paused),
            Err(BridgeError::SessionTerminated)
        ));
    }

    #[test]
    fn geometry_uses_the_platform_metrics() {
        let h = harness("bravo");
        let geometry = h.bridge.display_geometry();
        assert_eq!((geometry.width, geometry.height), (1920, 1080));
        assert!((geometry.dpi - 400.0).abs() < 1e-3);
    }
}
