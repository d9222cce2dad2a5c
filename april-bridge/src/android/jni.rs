//! JNI plumbing shared by the Android services.

use jni::{
    JNIEnv, JavaVM,
    errors::Error as JniError,
    objects::{JClass, JObject, JString, JValue},
};
use thiserror::Error;
use winit::platform::android::activity::AndroidApp;

/// Errors returned by Android JNI calls.
#[derive(Debug, Error)]
pub enum AndroidJniError {
    /// A JNI call failed.
    #[error("JNI error: {0}")]
    Jni(#[from] JniError),
    /// A Java method returned null for a non-nullable type.
    #[error("Java returned null for {0}")]
    NullReturn(&'static str),
}

/// Describes and clears a pending Java exception so the thread can keep
/// calling into the VM.
pub(crate) fn map_jni_error(env: &mut JNIEnv<'_>, err: JniError) -> AndroidJniError {
    if matches!(err, JniError::JavaException) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    AndroidJniError::Jni(err)
}

/// Attaches the current thread to the VM and runs `call` with the activity.
pub(crate) fn with_activity<T>(
    app: &AndroidApp,
    call: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T, AndroidJniError>,
) -> Result<T, AndroidJniError> {
    // SAFETY: the pointer comes from the running activity and stays valid
    // for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(app.vm_as_ptr().cast()) }?;
    let mut env = vm.attach_current_thread()?;
    // SAFETY: the activity outlives every callback the bridge receives.
    let activity = unsafe { JObject::from_raw(app.activity_as_ptr().cast()) };
    call(&mut *env, &activity)
}

/// Calls an object-returning instance method, rejecting `null`.
pub(crate) fn call_object<'local>(
    env: &mut JNIEnv<'local>,
    object: &JObject<'_>,
    name: &'static str,
    signature: &str,
    args: &[JValue<'_, '_>],
) -> Result<JObject<'local>, AndroidJniError> {
    let value = env
        .call_method(object, name, signature, args)
        .and_then(|value| value.l())
        .map_err(|err| map_jni_error(env, err))?;
    if value.is_null() {
        return Err(AndroidJniError::NullReturn(name));
    }
    Ok(value)
}

/// Calls an `int`-returning instance method.
pub(crate) fn call_int(
    env: &mut JNIEnv<'_>,
    object: &JObject<'_>,
    name: &str,
    signature: &str,
    args: &[JValue<'_, '_>],
) -> Result<i32, AndroidJniError> {
    env.call_method(object, name, signature, args)
        .and_then(|value| value.i())
        .map_err(|err| map_jni_error(env, err))
}

/// Reads an `int` field.
pub(crate) fn int_field(
    env: &mut JNIEnv<'_>,
    object: &JObject<'_>,
    name: &str,
) -> Result<i32, AndroidJniError> {
    env.get_field(object, name, "I")
        .and_then(|value| value.i())
        .map_err(|err| map_jni_error(env, err))
}

/// Reads a `float` field.
pub(crate) fn float_field(
    env: &mut JNIEnv<'_>,
    object: &JObject<'_>,
    name: &str,
) -> Result<f32, AndroidJniError> {
    env.get_field(object, name, "F")
        .and_then(|value| value.f())
        .map_err(|err| map_jni_error(env, err))
}

/// Reads a static `String` field, mapping `null` to an empty string.
pub(crate) fn static_string(
    env: &mut JNIEnv<'_>,
    class: &str,
    name: &str,
) -> Result<String, AndroidJniError> {
    let value = env
        .get_static_field(class, name, "Ljava/lang/String;")
        .and_then(|value| value.l())
        .map_err(|err| map_jni_error(env, err))?;
    if value.is_null() {
        return Ok(String::new());
    }
    let value = JString::from(value);
    let value = env
        .get_string(&value)
        .map_err(|err| map_jni_error(env, err))?;
    Ok(value.into())
}

/// Loads an app class through the activity's class loader.
///
/// `FindClass` only sees system classes on threads attached from native
/// code.
pub(crate) fn load_class<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject<'_>,
    class_name: &str,
) -> Result<JClass<'local>, AndroidJniError> {
    let class_loader = call_object(
        env,
        activity,
        "getClassLoader",
        "()Ljava/lang/ClassLoader;",
        &[],
    )?;
    let class_name = env
        .new_string(class_name)
        .map_err(|err| map_jni_error(env, err))?;
    let class_name = JObject::from(class_name);
    let class = call_object(
        env,
        &class_loader,
        "loadClass",
        "(Ljava/lang/String;)Ljava/lang/Class;",
        &[JValue::Object(&class_name)],
    )?;
    Ok(JClass::from(class))
}
