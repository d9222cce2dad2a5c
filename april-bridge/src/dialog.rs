//! Modal message dialogs.
//!
//! ## Usage
//!
//! Open a [`DialogRequest`] through [`DialogCoordinator::open`], present it
//! with the OS, and hand the user's choice back via
//! [`DialogCoordinator::resolve`]. The resulting [`DialogOutcome`] reaches the
//! engine as a dispatch task.

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{engine::Engine, error::BridgeError, queue::Dispatcher};

/// Icon shown next to the dialog title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DialogIcon {
    /// No icon.
    #[default]
    None,
    /// Information glyph.
    Info,
    /// Alert glyph.
    Alert,
}

impl DialogIcon {
    /// Maps the engine's icon code: 1 is info, 2 is alert.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Info,
            2 => Self::Alert,
            _ => Self::None,
        }
    }
}

/// A message box requested by the engine.
///
/// When `ok_label` is set the dialog is in "ok" mode and `yes_label` /
/// `no_label` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogRequest {
    /// Title text.
    pub title: Option<String>,
    /// Body text.
    pub message: Option<String>,
    /// Label of the single "ok" button.
    pub ok_label: Option<String>,
    /// Label of the "yes" button.
    pub yes_label: Option<String>,
    /// Label of the "no" button.
    pub no_label: Option<String>,
    /// Label of the neutral cancel button.
    pub cancel_label: Option<String>,
    /// Icon kind.
    pub icon: DialogIcon,
}

impl DialogRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the "ok" label, switching to "ok" mode.
    pub fn ok(mut self, label: impl Into<String>) -> Self {
        self.ok_label = Some(label.into());
        self
    }

    /// Sets the "yes" label.
    pub fn yes(mut self, label: impl Into<String>) -> Self {
        self.yes_label = Some(label.into());
        self
    }

    /// Sets the "no" label.
    pub fn no(mut self, label: impl Into<String>) -> Self {
        self.no_label = Some(label.into());
        self
    }

    /// Sets the cancel label.
    pub fn cancel(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = Some(label.into());
        self
    }

    /// Sets the icon.
    pub fn icon(mut self, icon: DialogIcon) -> Self {
        self.icon = icon;
        self
    }
}

/// The single result of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogOutcome {
    /// "ok" was selected.
    Ok,
    /// "yes" was selected.
    Yes,
    /// "no" was selected.
    No,
    /// The neutral button, back gesture or an outside touch.
    Cancel,
}

impl DialogOutcome {
    /// Delivers the matching engine notification.
    pub fn notify(self, engine: &mut dyn Engine) {
        match self {
            Self::Ok => engine.on_dialog_ok(),
            Self::Yes => engine.on_dialog_yes(),
            Self::No => engine.on_dialog_no(),
            Self::Cancel => engine.on_dialog_cancel(),
        }
    }
}

/// Button slot in the OS dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonRole {
    /// Right-most, accepting button.
    Positive,
    /// Declining button.
    Negative,
    /// Neutral button.
    Neutral,
}

/// A button of a presented dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogButton {
    /// Slot the button occupies.
    pub role: ButtonRole,
    /// Text on the button.
    pub label: String,
    /// Outcome of pressing it.
    pub outcome: DialogOutcome,
}

/// Declarative description the OS presents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSpec {
    /// Title text, empty when absent.
    pub title: String,
    /// Body text, empty when absent.
    pub message: String,
    /// Buttons in positive, negative, neutral order.
    pub buttons: Vec<DialogButton>,
    /// Icon glyph.
    pub icon: DialogIcon,
    /// Back gesture cancels.
    pub cancelable: bool,
    /// Touching outside cancels.
    pub cancel_on_touch_outside: bool,
}

impl DialogSpec {
    /// Builds the presentable spec, applying the "ok" versus "yes/no" rule.
    pub fn from_request(request: &DialogRequest) -> Self {
        let mut buttons = Vec::with_capacity(3);
        let mut push = |role, label: &Option<String>, outcome| {
            if let Some(label) = label {
                buttons.push(DialogButton {
                    role,
                    label: label.clone(),
                    outcome,
                });
            }
        };
        if request.ok_label.is_some() {
            push(ButtonRole::Positive, &request.ok_label, DialogOutcome::Ok);
        } else {
            push(ButtonRole::Positive, &request.yes_label, DialogOutcome::Yes);
            push(ButtonRole::Negative, &request.no_label, DialogOutcome::No);
        }
        push(
            ButtonRole::Neutral,
            &request.cancel_label,
            DialogOutcome::Cancel,
        );

        Self {
            title: request.title.clone().unwrap_or_default(),
            message: request.message.clone().unwrap_or_default(),
            buttons,
            icon: request.icon,
            cancelable: true,
            cancel_on_touch_outside: true,
        }
    }

    /// The button occupying `role`, if any.
    pub fn button(&self, role: ButtonRole) -> Option<&DialogButton> {
        self.buttons.iter().find(|button| button.role == role)
    }
}

/// Identifies one dialog request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogHandle(u64);

impl DialogHandle {
    /// Raw id, for passing through the OS.
    pub fn id(self) -> u64 {
        self.0
    }

    /// Rebuilds a handle from an id the OS passed back.
    pub fn from_id(id: u64) -> Self {
        Self(id)
    }
}

/// What the user did with a presented dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    /// A button was pressed.
    Button(ButtonRole),
    /// Back gesture, outside touch or any non-graceful dismissal.
    Dismissed,
}

impl DialogAction {
    /// Maps the OS button identifier (`-1` positive, `-2` negative, `-3`
    /// neutral). Anything else is a dismissal.
    pub fn from_button_code(code: i32) -> Self {
        match code {
            -1 => Self::Button(ButtonRole::Positive),
            -2 => Self::Button(ButtonRole::Negative),
            -3 => Self::Button(ButtonRole::Neutral),
            _ => Self::Dismissed,
        }
    }
}

/// Why presenting a dialog failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentError {
    /// The OS version lacks this presentation primitive.
    #[error("{0} is not available on this OS version")]
    Unsupported(&'static str),
    /// Presentation failed for another reason.
    #[error("{0}")]
    Failed(String),
}

/// The OS dialog presentation primitive.
pub trait DialogPresenter {
    /// Presents with the modern modal primitive.
    fn present(&self, handle: DialogHandle, spec: &DialogSpec) -> Result<(), PresentError>;

    /// Presents with the legacy mechanism of older OS versions.
    fn present_legacy(&self, handle: DialogHandle, spec: &DialogSpec) -> Result<(), PresentError>;
}

#[derive(Debug)]
struct ActiveDialog {
    handle: DialogHandle,
    spec: DialogSpec,
}

/// Tracks the single active dialog, owned by the UI thread.
#[derive(Debug)]
pub struct DialogCoordinator {
    dispatcher: Dispatcher,
    active: Option<ActiveDialog>,
    next_id: u64,
    last_failure: Option<BridgeError>,
}

impl DialogCoordinator {
    /// Creates a coordinator delivering outcomes through `dispatcher`.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            active: None,
            next_id: 1,
            last_failure: None,
        }
    }

    /// Presents `request`, superseding any unresolved dialog.
    ///
    /// Falls back to the legacy presentation when the modern one is missing
    /// or fails.
    /// If nothing can be presented the failure is recorded and no dialog is
    /// active afterwards.
    pub fn open(&mut self, request: &DialogRequest, presenter: &dyn DialogPresenter) -> DialogHandle {
        let handle = DialogHandle(self.next_id);
        self.next_id += 1;
        if let Some(previous) = self.active.take() {
            debug!(
                superseded = previous.handle.id(),
                "dialog replaced before it was resolved"
            );
        }

        let spec = DialogSpec::from_request(request);
        let presented = presenter.present(handle, &spec).or_else(|err| {
            match err {
                PresentError::Unsupported(primitive) => warn!(
                    "{}, falling back to legacy dialog",
                    BridgeError::PlatformCapabilityMissing(primitive)
                ),
                PresentError::Failed(reason) => {
                    warn!("modal dialog failed ({reason}), falling back to legacy dialog")
                }
            }
            presenter.present_legacy(handle, &spec)
        });

        match presented {
            Ok(()) => {
                self.last_failure = None;
                self.active = Some(ActiveDialog { handle, spec });
            }
            Err(err) => {
                let err = BridgeError::DialogPresentation(err.to_string());
                error!(handle = handle.id(), "{err}");
                self.last_failure = Some(err);
            }
        }
        handle
    }

    /// Resolves the active dialog and submits its outcome to the engine.
    ///
    /// Returns `None` for a handle that is no longer active, or for a button
    /// slot the dialog does not have.
    pub fn resolve(&mut self, handle: DialogHandle, action: DialogAction) -> Option<DialogOutcome> {
        let active = self.active.as_ref()?;
        if active.handle != handle {
            debug!(handle = handle.id(), "ignoring result of a superseded dialog");
            return None;
        }
        let outcome = match action {
            DialogAction::Dismissed => DialogOutcome::Cancel,
            DialogAction::Button(role) => active.spec.button(role)?.outcome,
        };
        self.active = None;

        if let Err(err) = self.dispatcher.notify(move |engine| outcome.notify(engine)) {
            debug!("dialog outcome {outcome:?} not delivered: {err}");
        }
        Some(outcome)
    }

    /// Handle of the unresolved dialog, if any.
    pub fn active(&self) -> Option<DialogHandle> {
        self.active.as_ref().map(|active| active.handle)
    }

    /// The last presentation failure, cleared by the next successful open.
    pub fn last_failure(&self) -> Option<&BridgeError> {
        self.last_failure.as_ref()
    }
}
