//! The native engine seam.
//!
//! ## Usage
//!
//! Implement [`Engine`] for the native engine binding. The bridge owns the
//! implementation on the render thread and is the only caller of it.

use crate::error::EngineError;

/// Result of one per-frame render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Keep rendering.
    Continue,
    /// The engine is done; the session terminates and the host closes.
    Stop,
}

impl FrameStatus {
    /// Maps the engine's `continue` boolean.
    pub fn from_continue(keep_going: bool) -> Self {
        if keep_going { Self::Continue } else { Self::Stop }
    }
}

/// Entry points of the single-threaded native engine.
///
/// Every method is called on the render thread only, in the relative order
/// `configure`, `init` (once), then notifications and `render_frame`, and
/// finally `shutdown`.
pub trait Engine: Send {
    /// Passes the host supplied data and archive paths before `init`.
    fn configure(&mut self, data_path: &str, archive_path: &str);

    /// Starts the engine. `args[0]` is the host package path.
    fn init(&mut self, args: &[String]) -> Result<(), EngineError>;

    /// Renders one frame.
    fn render_frame(&mut self) -> FrameStatus;

    /// Releases the engine.
    fn shutdown(&mut self);

    /// A key was pressed.
    fn key_down(&mut self, _key_code: i32, _char_code: u32) {}

    /// A key was released.
    fn key_up(&mut self, _key_code: i32) {}

    /// A touch pointer changed.
    fn touch(&mut self, _kind: TouchKind, _x: f32, _y: f32, _pointer_index: i32) {}

    /// A controller button was pressed.
    fn button_down(&mut self, _controller: i32, _button: i32) {}

    /// A controller button was released.
    fn button_up(&mut self, _controller: i32, _button: i32) {}

    /// A controller axis moved.
    fn axis_change(&mut self, _controller: i32, _axis: i32, _value: f32) {}

    /// Host activity was created.
    fn on_create(&mut self) {}

    /// Host activity was started.
    fn on_start(&mut self) {}

    /// Host activity was resumed.
    fn on_resume(&mut self) {}

    /// Host activity was paused.
    fn on_pause(&mut self) {}

    /// Host activity was stopped.
    fn on_stop(&mut self) {}

    /// Host activity was destroyed.
    fn on_destroy(&mut self) {}

    /// Host activity was restarted.
    fn on_restart(&mut self) {}

    /// The user accepted an "ok" dialog.
    fn on_dialog_ok(&mut self) {}

    /// The user picked "yes".
    fn on_dialog_yes(&mut self) {}

    /// The user picked "no".
    fn on_dialog_no(&mut self) {}

    /// The dialog was canceled.
    fn on_dialog_cancel(&mut self) {}

    /// The host window gained or lost focus.
    fn on_window_focus_changed(&mut self, _focused: bool) {}

    /// The soft keyboard covers `height_ratio` of the root view.
    fn on_keyboard_changed(&mut self, _visible: bool, _height_ratio: f32) {}

    /// The OS is low on memory.
    fn on_low_memory(&mut self) {}

    /// The render surface was recreated after the engine was initialized.
    fn on_surface_created(&mut self) {}
}

/// Lifecycle states of the hosting activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Activity created.
    Created,
    /// Activity started (visible).
    Started,
    /// Activity resumed (foreground).
    Resumed,
    /// Activity paused.
    Paused,
    /// Activity stopped (hidden).
    Stopped,
    /// Activity destroyed.
    Destroyed,
    /// Activity restarting after a stop.
    Restarted,
}

impl LifecycleState {
    /// Delivers the one engine notification this state maps to.
    pub fn notify(self, engine: &mut dyn Engine) {
        match self {
            Self::Created => engine.on_create(),
            Self::Started => engine.on_start(),
            Self::Resumed => engine.on_resume(),
            Self::Paused => engine.on_pause(),
            Self::Stopped => engine.on_stop(),
            Self::Destroyed => engine.on_destroy(),
            Self::Restarted => engine.on_restart(),
        }
    }

    /// Whether the OS can move from `previous` to `self`.
    ///
    /// `None` means no state was observed yet.
    pub fn can_follow(self, previous: Option<Self>) -> bool {
        use LifecycleState::*;
        match previous {
            None => self == Created,
            Some(previous) => matches!(
                (previous, self),
                (Created, Started)
                    | (Created, Destroyed)
                    | (Started, Resumed)
                    | (Started, Stopped)
                    | (Resumed, Paused)
                    | (Paused, Resumed)
                    | (Paused, Stopped)
                    | (Stopped, Restarted)
                    | (Stopped, Destroyed)
                    | (Restarted, Started)
                    | (Destroyed, Created)
            ),
        }
    }
}

/// Kind of a touch pointer change, from the OS motion action codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchKind {
    /// Pointer went down.
    Down,
    /// Pointer went up.
    Up,
    /// Pointer moved.
    Move,
    /// Gesture canceled by the OS.
    Cancel,
}

impl TouchKind {
    /// Maps a masked motion action code. Unknown codes yield `None`.
    pub fn from_action(action: i32) -> Option<Self> {
        match action {
            0 | 5 => Some(Self::Down),
            1 | 6 => Some(Self::Up),
            2 => Some(Self::Move),
            3 => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Input delivered from the UI thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key press with the translated character, `0` if none.
    KeyDown {
        /// OS key code.
        key_code: i32,
        /// Unicode character produced by the key.
        char_code: u32,
    },
    /// Key release.
    KeyUp {
        /// OS key code.
        key_code: i32,
    },
    /// Touch pointer change.
    Touch {
        /// What happened to the pointer.
        kind: TouchKind,
        /// Horizontal position in pixels.
        x: f32,
        /// Vertical position in pixels.
        y: f32,
        /// Pointer index within the gesture.
        pointer_index: i32,
    },
    /// Controller button press.
    ButtonDown {
        /// Controller index.
        controller: i32,
        /// Button code.
        button: i32,
    },
    /// Controller button release.
    ButtonUp {
        /// Controller index.
        controller: i32,
        /// Button code.
        button: i32,
    },
    /// Controller axis change.
    AxisChange {
        /// Controller index.
        controller: i32,
        /// Axis code.
        axis: i32,
        /// New axis value.
        value: f32,
    },
}

impl InputEvent {
    /// Delivers the event to its engine entry point.
    pub fn deliver(self, engine: &mut dyn Engine) {
        match self {
            Self::KeyDown {
                key_code,
                char_code,
            } => engine.key_down(key_code, char_code),
            Self::KeyUp { key_code } => engine.key_up(key_code),
            Self::Touch {
                kind,
                x,
                y,
                pointer_index,
            } => engine.touch(kind, x, y, pointer_index),
            Self::ButtonDown { controller, button } => engine.button_down(controller, button),
            Self::ButtonUp { controller, button } => engine.button_up(controller, button),
            Self::AxisChange {
                controller,
                axis,
                value,
            } => engine.axis_change(controller, axis, value),
        }
    }
}
