//! Platform services backed by the Android SDK.
//!
//! Dialogs are presented by the companion Java class
//! `com.april.bridge.DialogHost`, which the host app ships. It must expose
//!
//! ```text
//! static boolean supportsFragments();
//! static boolean show(Activity activity, long handle, String title, String message,
//!                     String positive, String negative, String neutral,
//!                     int icon, boolean legacy);
//! ```
//!
//! Empty button labels mean "no button". The host reports the user's choice
//! back through [`PlatformBridge::on_dialog_result`](crate::PlatformBridge::on_dialog_result).

use jni::objects::{JObject, JValue};
use tracing::{debug, warn};
use winit::platform::android::activity::AndroidApp;

use super::jni::{
    AndroidJniError, call_int, call_object, float_field, int_field, load_class, map_jni_error,
    static_string, with_activity,
};
use crate::{
    dialog::{ButtonRole, DialogHandle, DialogIcon, DialogPresenter, DialogSpec, PresentError},
    geometry::{DisplayMetrics, DisplaySource, FrameRect},
    keyboard::InputMethod,
    orientation::{OrientationHost, ScreenOrientation, SettingsSource},
    quirks::HardwareIdentity,
};

const DIALOG_HOST: &str = "com.april.bridge.DialogHost";
const SYSTEM_UI_FLAG_HIDE_NAVIGATION: i32 = 0x0000_0002;

/// Reads the device identity from `android.os.Build`.
pub fn hardware_identity(app: &AndroidApp) -> Result<HardwareIdentity, AndroidJniError> {
    with_activity(app, |env, _| {
        let sdk_version = env
            .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
            .and_then(|value| value.i())
            .map_err(|err| map_jni_error(env, err))?;
        Ok(HardwareIdentity {
            manufacturer: static_string(env, "android/os/Build", "MANUFACTURER")?,
            model: static_string(env, "android/os/Build", "MODEL")?,
            board: static_string(env, "android/os/Build", "BOARD")?,
            sdk_version: u32::try_from(sdk_version).unwrap_or_default(),
        })
    })
}

/// Android implementation of every platform trait.
#[derive(Debug, Clone)]
pub struct AndroidPlatform {
    app: AndroidApp,
}

impl AndroidPlatform {
    /// Wraps the running activity.
    pub fn new(app: AndroidApp) -> Self {
        Self { app }
    }

    /// The wrapped activity.
    pub fn app(&self) -> &AndroidApp {
        &self.app
    }

    fn decor_view<'local>(
        env: &mut jni::JNIEnv<'local>,
        activity: &JObject<'_>,
    ) -> Result<JObject<'local>, AndroidJniError> {
        let window = call_object(env, activity, "getWindow", "()Landroid/view/Window;", &[])?;
        call_object(env, &window, "getDecorView", "()Landroid/view/View;", &[])
    }

    fn input_method_manager<'local>(
        env: &mut jni::JNIEnv<'local>,
        activity: &JObject<'_>,
    ) -> Result<JObject<'local>, AndroidJniError> {
        let service = env
            .get_static_field(
                "android/content/Context",
                "INPUT_METHOD_SERVICE",
                "Ljava/lang/String;",
            )
            .and_then(|value| value.l())
            .map_err(|err| map_jni_error(env, err))?;
        call_object(
            env,
            activity,
            "getSystemService",
            "(Ljava/lang/String;)Ljava/lang/Object;",
            &[JValue::Object(&service)],
        )
    }

    fn present_with(
        &self,
        handle: DialogHandle,
        spec: &DialogSpec,
        legacy: bool,
    ) -> Result<bool, AndroidJniError> {
        with_activity(&self.app, |env, activity| {
            let class = load_class(env, activity, DIALOG_HOST)?;
            if !legacy {
                let supported = env
                    .call_static_method(&class, "supportsFragments", "()Z", &[])
                    .and_then(|value| value.z())
                    .map_err(|err| map_jni_error(env, err))?;
                if !supported {
                    return Ok(false);
                }
            }

            let label = |role| spec.button(role).map_or("", |button| button.label.as_str());
            let mut strings = Vec::with_capacity(5);
            for text in [
                spec.title.as_str(),
                spec.message.as_str(),
                label(ButtonRole::Positive),
                label(ButtonRole::Negative),
                label(ButtonRole::Neutral),
            ] {
                let value = env.new_string(text).map_err(|err| map_jni_error(env, err))?;
                strings.push(JObject::from(value));
            }
            let id = i64::try_from(handle.id()).unwrap_or(i64::MAX);
            let icon = match spec.icon {
                DialogIcon::None => 0,
                DialogIcon::Info => 1,
                DialogIcon::Alert => 2,
            };

            env.call_static_method(
                &class,
                "show",
                "(Landroid/app/Activity;JLjava/lang/String;Ljava/lang/String;\
                 Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;IZ)Z",
                &[
                    JValue::Object(activity),
                    JValue::Long(id),
                    JValue::Object(&strings[0]),
                    JValue::Object(&strings[1]),
                    JValue::Object(&strings[2]),
                    JValue::Object(&strings[3]),
                    JValue::Object(&strings[4]),
                    JValue::Int(icon),
                    JValue::Bool(u8::from(legacy)),
                ],
            )
            .and_then(|value| value.z())
            .map_err(|err| map_jni_error(env, err))
        })
    }
}

impl InputMethod for AndroidPlatform {
    fn show_soft_input(&self) {
        let shown = with_activity(&self.app, |env, activity| {
            let manager = Self::input_method_manager(env, activity)?;
            let view = Self::decor_view(env, activity)?;
            env.call_method(
                &manager,
                "showSoftInput",
                "(Landroid/view/View;I)Z",
                &[JValue::Object(&view), JValue::Int(0)],
            )
            .and_then(|value| value.z())
            .map_err(|err| map_jni_error(env, err))
        });
        if let Err(err) = shown {
            // showSoftInput throws while the keyboard is animating.
            debug!("showSoftInput failed: {err}");
        }
    }

    fn hide_soft_input(&self) {
        let hidden = with_activity(&self.app, |env, activity| {
            let manager = Self::input_method_manager(env, activity)?;
            let view = Self::decor_view(env, activity)?;
            let token = call_object(env, &view, "getWindowToken", "()Landroid/os/IBinder;", &[])?;
            env.call_method(
                &manager,
                "hideSoftInputFromWindow",
                "(Landroid/os/IBinder;I)Z",
                &[JValue::Object(&token), JValue::Int(0)],
            )
            .and_then(|value| value.z())
            .map_err(|err| map_jni_error(env, err))
        });
        if let Err(err) = hidden {
            debug!("hideSoftInputFromWindow failed: {err}");
        }
    }
}

impl DisplaySource for AndroidPlatform {
    fn metrics(&self) -> DisplayMetrics {
        let metrics = with_activity(&self.app, |env, activity| {
            let resources = call_object(
                env,
                activity,
                "getResources",
                "()Landroid/content/res/Resources;",
                &[],
            )?;
            let metrics = call_object(
                env,
                &resources,
                "getDisplayMetrics",
                "()Landroid/util/DisplayMetrics;",
                &[],
            )?;
            Ok(DisplayMetrics {
                width_px: int_field(env, &metrics, "widthPixels")?,
                height_px: int_field(env, &metrics, "heightPixels")?,
                xdpi: float_field(env, &metrics, "xdpi")?,
                ydpi: float_field(env, &metrics, "ydpi")?,
            })
        });
        metrics.unwrap_or_else(|err| {
            warn!("failed to read display metrics: {err}");
            DisplayMetrics::default()
        })
    }

    fn chrome_hidden(&self) -> bool {
        let flags = with_activity(&self.app, |env, activity| {
            let view = Self::decor_view(env, activity)?;
            call_int(env, &view, "getSystemUiVisibility", "()I", &[])
        });
        match flags {
            Ok(flags) => flags & SYSTEM_UI_FLAG_HIDE_NAVIGATION != 0,
            Err(err) => {
                debug!("failed to read system UI visibility: {err}");
                false
            }
        }
    }

    fn visible_frame(&self) -> FrameRect {
        let frame = with_activity(&self.app, |env, activity| {
            let view = Self::decor_view(env, activity)?;
            let rect = env
                .new_object("android/graphics/Rect", "()V", &[])
                .map_err(|err| map_jni_error(env, err))?;
            env.call_method(
                &view,
                "getWindowVisibleDisplayFrame",
                "(Landroid/graphics/Rect;)V",
                &[JValue::Object(&rect)],
            )
            .and_then(|value| value.v())
            .map_err(|err| map_jni_error(env, err))?;
            Ok(FrameRect {
                left: int_field(env, &rect, "left")?,
                top: int_field(env, &rect, "top")?,
                right: int_field(env, &rect, "right")?,
                bottom: int_field(env, &rect, "bottom")?,
            })
        });
        frame.unwrap_or_else(|err| {
            warn!("failed to read the visible display frame: {err}");
            FrameRect::default()
        })
    }
}

impl SettingsSource for AndroidPlatform {
    fn auto_rotate_enabled(&self) -> Option<bool> {
        let value = with_activity(&self.app, |env, activity| {
            let resolver = call_object(
                env,
                activity,
                "getContentResolver",
                "()Landroid/content/ContentResolver;",
                &[],
            )?;
            let key = env
                .new_string("accelerometer_rotation")
                .map_err(|err| map_jni_error(env, err))?;
            let key = JObject::from(key);
            env.call_static_method(
                "android/provider/Settings$System",
                "getInt",
                "(Landroid/content/ContentResolver;Ljava/lang/String;I)I",
                &[
                    JValue::Object(&resolver),
                    JValue::Object(&key),
                    JValue::Int(-1),
                ],
            )
            .and_then(|value| value.i())
            .map_err(|err| map_jni_error(env, err))
        });
        match value {
            Ok(-1) => None,
            Ok(value) => Some(value != 0),
            Err(err) => {
                debug!("failed to read the auto-rotate setting: {err}");
                None
            }
        }
    }
}

impl OrientationHost for AndroidPlatform {
    fn requested_orientation(&self) -> ScreenOrientation {
        let code = with_activity(&self.app, |env, activity| {
            call_int(env, activity, "getRequestedOrientation", "()I", &[])
        });
        match code {
            Ok(code) => ScreenOrientation::from_code(code),
            Err(err) => {
                debug!("failed to read the requested orientation: {err}");
                ScreenOrientation::Unspecified
            }
        }
    }

    fn set_requested_orientation(&self, orientation: ScreenOrientation) {
        let written = with_activity(&self.app, |env, activity| {
            env.call_method(
                activity,
                "setRequestedOrientation",
                "(I)V",
                &[JValue::Int(orientation.code())],
            )
            .and_then(|value| value.v())
            .map_err(|err| map_jni_error(env, err))
        });
        if let Err(err) = written {
            warn!(?orientation, "failed to set the requested orientation: {err}");
        }
    }
}

impl DialogPresenter for AndroidPlatform {
    fn present(&self, handle: DialogHandle, spec: &DialogSpec) -> Result<(), PresentError> {
        match self.present_with(handle, spec, false) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PresentError::Unsupported("DialogFragment")),
            Err(err) => Err(PresentError::Failed(err.to_string())),
        }
    }

    fn present_legacy(&self, handle: DialogHandle, spec: &DialogSpec) -> Result<(), PresentError> {
        match self.present_with(handle, spec, true) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PresentError::Failed("legacy dialog rejected".into())),
            Err(err) => Err(PresentError::Failed(err.to_string())),
        }
    }
}
