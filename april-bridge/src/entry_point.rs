//! Bridge entry builder.
//!
//! ## Usage
//!
//! Hand the engine, the host shell and the platform services to
//! [`BridgeEntry`], then either [`build`](BridgeEntry::build) when the OS
//! owns the render thread or [`spawn`](BridgeEntry::spawn) to get a
//! dedicated one.

use std::sync::Arc;

use tracing::info;

use crate::{
    bridge::{Platform, PlatformBridge},
    config::BridgeConfig,
    engine::Engine,
    error::BridgeResult,
    logging,
    quirks::{HardwareIdentity, QuirkCache},
    render_loop::{HostShell, RenderLoopDriver},
    render_thread::RenderThread,
};

/// Builder wiring the UI-thread and render-thread halves together.
pub struct BridgeEntry<E: Engine, H: HostShell, P: Platform> {
    engine: E,
    shell: H,
    platform: P,
    config: BridgeConfig,
    hardware: HardwareIdentity,
}

impl<E: Engine, H: HostShell, P: Platform> BridgeEntry<E, H, P> {
    /// Creates a builder with the default configuration.
    pub fn new(engine: E, shell: H, platform: P) -> Self {
        Self {
            engine,
            shell,
            platform,
            config: BridgeConfig::default(),
            hardware: HardwareIdentity::default(),
        }
    }

    /// Overrides the bridge configuration.
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Identity of the running device, used to resolve quirks.
    pub fn hardware(mut self, hardware: HardwareIdentity) -> Self {
        self.hardware = hardware;
        self
    }

    /// Builds both halves for hosts whose OS drives the render thread.
    pub fn build(self) -> (PlatformBridge<P>, RenderLoopDriver<E, H>) {
        logging::init();
        logging::init_deadlock_detection();
        info!(
            manufacturer = %self.hardware.manufacturer,
            model = %self.hardware.model,
            sdk = self.hardware.sdk_version,
            "starting platform bridge"
        );

        let quirks = Arc::new(QuirkCache::new(self.hardware));
        let driver = RenderLoopDriver::new(self.engine, self.shell, self.config);
        let bridge = PlatformBridge::new(
            self.platform,
            driver.dispatcher(),
            quirks,
            driver.config(),
        );
        (bridge, driver)
    }

    /// Builds both halves and runs the driver on its own thread.
    pub fn spawn(self) -> BridgeResult<(PlatformBridge<P>, RenderThread)>
    where
        E: 'static,
        H: 'static,
    {
        let (bridge, driver) = self.build();
        let render = RenderThread::spawn(driver)?;
        Ok((bridge, render))
    }
}

#[cfg(test)]
mod tests {
    use super::BridgeEntry;
    use crate::{
        config::BridgeConfig,
        engine::LifecycleState,
        quirks::HardwareIdentity,
        render_loop::DriverState,
        render_thread::FrameSignal,
        testing::{Call, CountingShell, FakePlatform, RecordingEngine},
    };

    fn config() -> BridgeConfig {
        BridgeConfig::default()
            .with_package_path("/app.apk")
            .with_arg("--fullscreen")
            .with_demoted_render_thread(false)
    }

    #[test]
    fn built_halves_share_one_queue() {
        let engine = RecordingEngine::default();
        let (mut bridge, mut driver) =
            BridgeEntry::new(engine.clone(), CountingShell::default(), FakePlatform::default())
                .config(config())
                .build();

        driver.on_surface_created();
        bridge.on_lifecycle(LifecycleState::Created).expect("open");
        driver.on_draw_frame();

        assert_eq!(
            engine.calls(),
            vec![
                Call::Configure(".".into(), String::new()),
                Call::Init(vec!["/app.apk".into(), "--fullscreen".into()]),
                Call::Create,
                Call::Render,
            ]
        );
    }

    #[test]
    fn recreated_activity_reaches_the_new_session() {
        let engine = RecordingEngine::default();
        let (mut bridge, mut driver) =
            BridgeEntry::new(engine.clone(), CountingShell::default(), FakePlatform::default())
                .config(config())
                .build();

        driver.on_surface_created();
        bridge.on_lifecycle(LifecycleState::Created).expect("open");
        bridge.on_lifecycle(LifecycleState::Destroyed).expect("open");
        bridge.on_lifecycle(LifecycleState::Created).expect("open");
        driver.on_draw_frame();
        assert_eq!(driver.state(), DriverState::Uninitialized);

        driver.on_surface_created();
        driver.on_draw_frame();

        let init = Call::Init(vec!["/app.apk".into(), "--fullscreen".into()]);
        assert_eq!(
            &engine.calls()[1..],
            &[
                init.clone(),
                Call::Create,
                Call::Destroy,
                Call::Shutdown,
                Call::Configure(".".into(), String::new()),
                init,
                Call::Create,
                Call::Render,
            ]
        );
    }

    #[test]
    fn quirks_follow_the_hardware_identity() {
        let (bridge, _driver) = BridgeEntry::new(
            RecordingEngine::default(),
            CountingShell::default(),
            FakePlatform::default(),
        )
        .hardware(HardwareIdentity {
            manufacturer: "HTC".into(),
            model: "HTC One X".into(),
            board: "endeavoru".into(),
            sdk_version: 16,
        })
        .build();

        assert_eq!(bridge.quirks().profile().dpi_override, Some(312.0));
        assert_eq!(bridge.display_geometry().dpi, 312.0);
    }

    #[test]
    fn spawned_thread_runs_until_joined() {
        let engine = RecordingEngine::default();
        let (mut bridge, render) =
            BridgeEntry::new(engine.clone(), CountingShell::default(), FakePlatform::default())
                .config(config())
                .spawn()
                .expect("spawn");

        render.send(FrameSignal::SurfaceCreated);
        bridge.on_lifecycle(LifecycleState::Created).expect("open");
        bridge.on_lifecycle(LifecycleState::Started).expect("open");
        render.send(FrameSignal::DrawFrame);

        assert_eq!(render.join().expect("join"), DriverState::Running);
        assert_eq!(
            &engine.calls()[2..],
            &[Call::Create, Call::Start, Call::Render]
        );
    }
}
