//! # Thread Utilities
//!
//! Naming and prioritizing the render thread. On Android the thread is
//! created by the OS, so both are applied from inside it.

/// Sets the name of the current thread as shown by debuggers and profilers.
///
/// Names containing interior NUL bytes are ignored. Linux truncates names to
/// 15 bytes.
pub fn set_thread_name(name: &str) {
    #[cfg(target_family = "unix")]
    set_thread_name_unix(name);

    #[cfg(target_os = "windows")]
    set_thread_name_windows(name);

    #[cfg(not(any(target_family = "unix", target_os = "windows")))]
    {
        let _ = name;
    }
}

#[cfg(target_family = "unix")]
fn set_thread_name_unix(name: &str) {
    use std::ffi::CString;

    let Ok(cname) = CString::new(truncate_name(name, 15)) else {
        tracing::debug!("thread name {name:?} contains a NUL byte");
        return;
    };

    // SAFETY: `cname` is a valid NUL terminated string that outlives the call.
    unsafe {
        #[cfg(target_vendor = "apple")]
        libc::pthread_setname_np(cname.as_ptr());
        #[cfg(not(target_vendor = "apple"))]
        libc::pthread_setname_np(libc::pthread_self(), cname.as_ptr());
    }
}

#[cfg(target_family = "unix")]
fn truncate_name(name: &str, max: usize) -> &str {
    if name.len() <= max {
        return name;
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

#[cfg(target_os = "windows")]
fn set_thread_name_windows(name: &str) {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;

    let name_wide: Vec<u16> = OsStr::new(name)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: `name_wide` is NUL terminated and outlives the call.
    unsafe {
        use windows::{
            Win32::System::Threading::{GetCurrentThread, SetThreadDescription},
            core::PCWSTR,
        };

        let _ = SetThreadDescription(GetCurrentThread(), PCWSTR(name_wide.as_ptr()));
    }
}

/// Lowers the scheduling priority of the current thread so the UI thread
/// keeps precedence over frame rendering.
pub fn demote_current_thread() {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        // On Linux `who == 0` with PRIO_PROCESS targets the calling thread.
        // SAFETY: plain syscall without pointers.
        let result = unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, 19) };
        if result != 0 {
            tracing::debug!(
                "failed to lower render thread priority: {}",
                std::io::Error::last_os_error()
            );
        }
    }

    #[cfg(target_os = "windows")]
    {
        use windows::Win32::System::Threading::{
            GetCurrentThread, SetThreadPriority, THREAD_PRIORITY_LOWEST,
        };

        // SAFETY: the pseudo handle of the current thread is always valid.
        if let Err(err) = unsafe { SetThreadPriority(GetCurrentThread(), THREAD_PRIORITY_LOWEST) } {
            tracing::debug!("failed to lower render thread priority: {err}");
        }
    }
}

#[cfg(all(test, target_family = "unix"))]
mod tests {
    use super::truncate_name;

    #[test]
    fn names_are_cut_on_char_boundaries() {
        assert_eq!(truncate_name("april-render", 15), "april-render");
        assert_eq!(truncate_name("april-render-thread", 15), "april-render-th");
        assert_eq!(truncate_name("ééééééééé", 15), "ééééééé");
    }
}
