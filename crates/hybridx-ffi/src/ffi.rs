//! C exports for the native host.
//!
//! Call order on the UI thread: `hybridx_init`, `hybridx_on_create`, then
//! `hybridx_on_layout_pass` from every layout/insets callback and the
//! remaining lifecycle functions as the host sees those events.

use std::ffi::{c_char, c_int, CStr};

use hybridx_shell::{BridgeOutcome, LayoutMode, RequestId, ShellError};

use crate::host::HybridxHostCallbacks;
use crate::{build_shell, deliver_reply, set_shell, with_shell};

pub const HYBRIDX_OK: c_int = 0;
/// `hybridx_init` hasn't run or failed.
pub const HYBRIDX_NO_SHELL: c_int = -1;
/// Storage was configured twice or rejected by the host.
pub const HYBRIDX_CONFIGURATION_ERROR: c_int = -2;

pub const HYBRIDX_LAYOUT_AUTO_FIT: u32 = 0;
pub const HYBRIDX_LAYOUT_MANUAL_INSET: u32 = 1;
pub const HYBRIDX_LAYOUT_STYLE_INJECTED: u32 = 2;

unsafe fn optional_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        None
    } else {
        unsafe { CStr::from_ptr(ptr).to_str().ok() }
    }
}

/// Initialize the shell with the host's callback table.
///
/// # Arguments
/// * `callbacks` - Host callbacks, copied; must stay valid until shutdown
/// * `config_path` - Optional path to `hybridx.toml` (null for the default lookup)
///
/// # Returns
/// `true` on success, `false` on failure
#[unsafe(no_mangle)]
pub extern "C" fn hybridx_init(
    callbacks: *const HybridxHostCallbacks,
    config_path: *const c_char,
) -> bool {
    let _ = env_logger::try_init();

    if callbacks.is_null() {
        log::error!("hybridx_init: callbacks is null");
        return false;
    }

    let table = unsafe { *callbacks };
    let path = unsafe { optional_str(config_path) };

    match unsafe { build_shell(table, path) } {
        Ok(shell) => {
            set_shell(Some(shell));
            log::info!("hybridx_init: success");
            true
        }
        Err(e) => {
            log::error!("hybridx_init: failed: {:?}", e);
            false
        }
    }
}

/// Drop the shell. Host callbacks are not called afterwards.
#[unsafe(no_mangle)]
pub extern "C" fn hybridx_shutdown() {
    log::info!("hybridx_shutdown");
    set_shell(None);
}

/// Activity created. Configures storage and chrome; spacing follows at the
/// first layout pass.
#[unsafe(no_mangle)]
pub extern "C" fn hybridx_on_create() -> c_int {
    match with_shell(|s| s.on_created()) {
        None => HYBRIDX_NO_SHELL,
        Some(Ok(())) => HYBRIDX_OK,
        Some(Err(ShellError::Configuration(msg))) => {
            log::error!("hybridx_on_create: {}", msg);
            HYBRIDX_CONFIGURATION_ERROR
        }
        Some(Err(e)) => {
            log::error!("hybridx_on_create: storage setup failed: {}", e);
            HYBRIDX_CONFIGURATION_ERROR
        }
    }
}

/// A layout pass ran; insets may have changed.
#[unsafe(no_mangle)]
pub extern "C" fn hybridx_on_layout_pass() {
    with_shell(|s| s.on_layout_pass());
}

/// The renderer finished loading a document.
#[unsafe(no_mangle)]
pub extern "C" fn hybridx_on_content_loaded() {
    with_shell(|s| s.on_content_loaded());
}

#[unsafe(no_mangle)]
pub extern "C" fn hybridx_on_resume() {
    with_shell(|s| s.on_resumed());
}

/// Flushes cookies before returning.
#[unsafe(no_mangle)]
pub extern "C" fn hybridx_on_pause() {
    with_shell(|s| s.on_paused());
}

/// Report how a bridge script finished.
///
/// # Arguments
/// * `request_id` - Id passed to the script's `__hybridxReply` hook
/// * `outcome` - `ok`, `unavailable` or `error:<message>`
#[unsafe(no_mangle)]
pub extern "C" fn hybridx_on_bridge_reply(request_id: u64, outcome: *const c_char) {
    let outcome = match unsafe { optional_str(outcome) } {
        Some(report) => BridgeOutcome::from_report(report),
        None => BridgeOutcome::Rejected("no outcome".to_string()),
    };
    deliver_reply(RequestId(request_id), outcome);
}

/// Switch layout mode at runtime.
///
/// # Returns
/// `false` for an unknown mode or when no shell exists
#[unsafe(no_mangle)]
pub extern "C" fn hybridx_set_layout_mode(mode: u32) -> bool {
    let mode = match mode {
        HYBRIDX_LAYOUT_AUTO_FIT => LayoutMode::AutoFit,
        HYBRIDX_LAYOUT_MANUAL_INSET => LayoutMode::ManualInset,
        HYBRIDX_LAYOUT_STYLE_INJECTED => LayoutMode::StyleInjected,
        other => {
            log::warn!("hybridx_set_layout_mode: unknown mode {}", other);
            return false;
        }
    };
    with_shell(|s| s.set_layout_mode(mode)).is_some()
}

/// Copy the application start URL into `buf` as a NUL-terminated string.
///
/// # Returns
/// The URL length in bytes, or `-1` when storage isn't configured yet or
/// `capacity` is too small.
#[unsafe(no_mangle)]
pub extern "C" fn hybridx_copy_start_url(buf: *mut c_char, capacity: usize) -> isize {
    if buf.is_null() {
        return -1;
    }
    let Some(url) = with_shell(|s| s.start_url().map(|u| u.to_string())).flatten() else {
        return -1;
    };
    let bytes = url.as_bytes();
    if bytes.len() + 1 > capacity {
        return -1;
    }
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), bytes.len());
        *buf.add(bytes.len()) = 0;
    }
    bytes.len() as isize
}
