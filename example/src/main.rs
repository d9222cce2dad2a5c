//! Runs the bridge in a desktop window.
//!
//! Keys: Escape opens the quit dialog (Y / N answer it, Escape dismisses),
//! K toggles the simulated soft keyboard, R toggles auto-rotate. Mouse
//! buttons act as touches.

mod engine;
mod platform;

use std::time::{Duration, Instant};

use april_bridge::{
    BridgeConfig, BridgeEntry, ButtonRole, DialogAction, DialogHandle, DialogIcon, DialogRequest,
    FrameSignal, HardwareIdentity, InputEvent, LifecycleState, PlatformBridge, RenderThread,
    TouchKind,
};
use tracing::{debug, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::{
    engine::DemoEngine,
    platform::{DesktopPlatform, DesktopShell, ShellEvent},
};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

struct App {
    bridge: PlatformBridge<DesktopPlatform>,
    render: Option<RenderThread>,
    window: Option<Window>,
    surface_created: bool,
    next_frame: Instant,
    cursor: PhysicalPosition<f64>,
    pressed: bool,
    dialog: Option<DialogHandle>,
    keyboard_shown: bool,
}

impl App {
    fn signal(&self, signal: FrameSignal) {
        let delivered = self
            .render
            .as_ref()
            .is_some_and(|render| render.send(signal));
        if !delivered {
            debug!(?signal, "render thread gone");
        }
    }

    fn lifecycle(&mut self, states: &[LifecycleState]) {
        for state in states {
            if let Err(err) = self.bridge.on_lifecycle(*state) {
                debug!(?state, "lifecycle not delivered: {err}");
            }
        }
    }

    fn input(&self, event: InputEvent) {
        if let Err(err) = self.bridge.on_input(event) {
            debug!("input not delivered: {err}");
        }
    }

    fn touch(&self, kind: TouchKind) {
        self.input(InputEvent::Touch {
            kind,
            x: self.cursor.x as f32,
            y: self.cursor.y as f32,
            pointer_index: 0,
        });
    }

    fn key(&mut self, event: &KeyEvent) {
        let key_code = key_code(&event.logical_key);
        if event.state == ElementState::Released {
            self.input(InputEvent::KeyUp { key_code });
            return;
        }
        let char_code = event
            .text
            .as_ref()
            .and_then(|text| text.chars().next())
            .map_or(0, u32::from);
        self.input(InputEvent::KeyDown {
            key_code,
            char_code,
        });
        if event.repeat {
            return;
        }

        match (&event.logical_key, self.dialog) {
            (Key::Named(NamedKey::Escape), None) => {
                let request = DialogRequest::new()
                    .title("Quit")
                    .message("Stop the engine and close the window?")
                    .yes("Yes")
                    .no("No")
                    .icon(DialogIcon::Alert);
                self.dialog = Some(self.bridge.show_dialog(&request));
            }
            (Key::Named(NamedKey::Escape), Some(handle)) => {
                self.answer(handle, DialogAction::Dismissed);
            }
            (Key::Character(c), Some(handle)) if c.eq_ignore_ascii_case("y") => {
                self.answer(handle, DialogAction::Button(ButtonRole::Positive));
            }
            (Key::Character(c), Some(handle)) if c.eq_ignore_ascii_case("n") => {
                self.answer(handle, DialogAction::Button(ButtonRole::Negative));
            }
            (Key::Character(c), None) if c.eq_ignore_ascii_case("k") => self.toggle_keyboard(),
            (Key::Character(c), None) if c.eq_ignore_ascii_case("r") => {
                let enabled = self.bridge.platform().toggle_auto_rotate();
                let written = self.bridge.on_settings_changed(false);
                info!(enabled, ?written, "auto-rotate toggled");
            }
            _ => {}
        }
    }

    fn answer(&mut self, handle: DialogHandle, action: DialogAction) {
        self.dialog = None;
        let outcome = self.bridge.on_dialog_result(handle, action);
        debug!(?outcome, "dialog answered");
    }

    fn toggle_keyboard(&mut self) {
        let root = self.bridge.display_geometry().height;
        self.keyboard_shown = !self.keyboard_shown;
        // No real input method here: report the result and layout it would
        // have produced.
        let (code, visible_height) = if self.keyboard_shown {
            self.bridge.show_virtual_keyboard();
            (2, root * 6 / 10)
        } else {
            self.bridge.hide_virtual_keyboard();
            (3, root)
        };
        let correction = self.bridge.on_keyboard_result(code);
        debug!(?correction, "keyboard result handled");
        if let Err(err) = self.bridge.on_keyboard_layout(visible_height, root) {
            debug!("keyboard layout not delivered: {err}");
        }
    }

    fn shut_down(&mut self) {
        if let Some(render) = self.render.take() {
            match render.join() {
                Ok(state) => info!(?state, "render thread stopped"),
                Err(err) => warn!("render thread failed: {err}"),
            }
        }
    }
}

impl ApplicationHandler<ShellEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attributes = Window::default_attributes().with_title("april-bridge");
            match event_loop.create_window(attributes) {
                Ok(window) => self.window = Some(window),
                Err(err) => {
                    warn!("failed to create window: {err}");
                    event_loop.exit();
                    return;
                }
            }
        }
        if !self.surface_created {
            self.surface_created = true;
            self.signal(FrameSignal::SurfaceCreated);
        }
        self.lifecycle(&[LifecycleState::Started, LifecycleState::Resumed]);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.lifecycle(&[LifecycleState::Paused, LifecycleState::Stopped]);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::Resized(size) => {
                let scale = self
                    .window
                    .as_ref()
                    .map_or(1.0, |window| window.scale_factor());
                self.bridge
                    .platform()
                    .set_window(size.width, size.height, scale);
                self.signal(FrameSignal::SurfaceChanged {
                    width: size.width,
                    height: size.height,
                });
                info!(geometry = ?self.bridge.display_geometry(), "window resized");
            }
            WindowEvent::Focused(focused) => {
                if let Err(err) = self.bridge.on_window_focus_changed(focused) {
                    debug!("focus change not delivered: {err}");
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.key(&event),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                if self.pressed {
                    self.touch(TouchKind::Move);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.pressed = state == ElementState::Pressed;
                self.touch(if self.pressed {
                    TouchKind::Down
                } else {
                    TouchKind::Up
                });
            }
            WindowEvent::CloseRequested => {
                self.lifecycle(&[
                    LifecycleState::Paused,
                    LifecycleState::Stopped,
                    LifecycleState::Destroyed,
                ]);
                event_loop.exit();
            }
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ShellEvent) {
        match event {
            ShellEvent::EngineStopped => {
                info!("engine stopped, closing");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            self.signal(FrameSignal::DrawFrame);
            self.next_frame = now + FRAME_INTERVAL;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shut_down();
    }
}

/// Android key code for the keys the demo cares about, `0` otherwise.
fn key_code(key: &Key) -> i32 {
    match key {
        Key::Named(NamedKey::Escape) => 111,
        Key::Named(NamedKey::Enter) => 66,
        Key::Named(NamedKey::Backspace) => 67,
        Key::Named(NamedKey::Space) => 62,
        Key::Named(NamedKey::ArrowUp) => 19,
        Key::Named(NamedKey::ArrowDown) => 20,
        Key::Named(NamedKey::ArrowLeft) => 21,
        Key::Named(NamedKey::ArrowRight) => 22,
        Key::Character(c) => match c.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some(letter @ 'a'..='z') => 29 + (letter as i32 - 'a' as i32),
            Some(digit @ '0'..='9') => 7 + (digit as i32 - '0' as i32),
            _ => 0,
        },
        _ => 0,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::<ShellEvent>::with_user_event().build()?;
    let config = BridgeConfig::default()
        .with_package_path(std::env::current_exe()?.display().to_string())
        .with_data_path(std::env::temp_dir().display().to_string());
    let hardware = HardwareIdentity {
        manufacturer: "desktop".to_string(),
        model: std::env::consts::OS.to_string(),
        board: std::env::consts::ARCH.to_string(),
        sdk_version: 0,
    };

    let (bridge, render) = BridgeEntry::new(
        DemoEngine::new(),
        DesktopShell::new(event_loop.create_proxy()),
        DesktopPlatform::new(),
    )
    .config(config)
    .hardware(hardware)
    .spawn()?;

    let mut app = App {
        bridge,
        render: Some(render),
        window: None,
        surface_created: false,
        next_frame: Instant::now(),
        cursor: PhysicalPosition::new(0.0, 0.0),
        pressed: false,
        dialog: None,
        keyboard_shown: false,
    };
    app.lifecycle(&[LifecycleState::Created]);
    event_loop.run_app(&mut app)?;
    Ok(())
}
