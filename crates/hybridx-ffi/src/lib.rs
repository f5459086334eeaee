//! FFI exports for driving the HybridX shell from a native host activity.
//!
//! The host registers a [`HybridxHostCallbacks`] table once, then forwards its
//! lifecycle callbacks. All functions must be called from the host's UI
//! thread; the shell lives in thread-local storage on that thread.

pub mod ffi;
pub mod host;

use anyhow::{Context, Result};
use hybridx_shell::{
    BridgeOutcome, LifecycleCoordinator, RequestId, ShellConfig, ShellHost, ShellSettings,
};
use std::cell::RefCell;
use std::collections::VecDeque;

pub use host::{CallbackHost, HybridxChromeUpdate, HybridxHostCallbacks, HybridxInsets, HybridxStorageConfig};

/// Build a coordinator over the host's callbacks.
///
/// # Safety
/// See [`CallbackHost::new`].
pub unsafe fn build_shell(callbacks: HybridxHostCallbacks, config_path: Option<&str>) -> Result<LifecycleCoordinator> {
    let config = match config_path {
        Some(path) => {
            let mut config = ShellConfig::load_from_file(path)
                .with_context(|| format!("Failed to load shell config {:?}", path))?;
            config.merge_with_env();
            config
        }
        None => ShellConfig::load(),
    };
    log::info!(
        "shell config: app={} mode={:?} url={}",
        config.app.id,
        config.layout.mode,
        config.server.url
    );

    let settings = ShellSettings::from_config(&config).context("Invalid shell settings")?;
    let host = unsafe { CallbackHost::new(callbacks) };
    Ok(LifecycleCoordinator::new(
        settings,
        ShellHost {
            insets: Box::new(host),
            chrome: Box::new(host),
            bridge: Box::new(host),
            storage: Box::new(host),
        },
    ))
}

// Single owner thread: the host's UI thread.
thread_local! {
    static SHELL: RefCell<Option<LifecycleCoordinator>> = const { RefCell::new(None) };
    static DEFERRED_REPLIES: RefCell<VecDeque<(RequestId, BridgeOutcome)>> = const { RefCell::new(VecDeque::new()) };
}

/// Run `f` against the shell. Returns `None` when no shell exists or when
/// called re-entrantly from inside a host callback.
pub fn with_shell<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut LifecycleCoordinator) -> R,
{
    let result = SHELL.with(|s| {
        let Ok(mut borrow) = s.try_borrow_mut() else {
            log::warn!("re-entrant shell call ignored");
            return None;
        };
        borrow.as_mut().map(f)
    });
    drain_deferred_replies();
    result
}

/// Deliver a bridge reply now, or after the current shell call if a host
/// callback reported it synchronously.
pub fn deliver_reply(id: RequestId, outcome: BridgeOutcome) {
    DEFERRED_REPLIES.with(|q| q.borrow_mut().push_back((id, outcome)));
    drain_deferred_replies();
}

fn drain_deferred_replies() {
    SHELL.with(|s| {
        let Ok(mut borrow) = s.try_borrow_mut() else {
            return;
        };
        let Some(shell) = borrow.as_mut() else {
            DEFERRED_REPLIES.with(|q| q.borrow_mut().clear());
            return;
        };
        while let Some((id, outcome)) = DEFERRED_REPLIES.with(|q| q.borrow_mut().pop_front()) {
            shell.on_bridge_reply(id, outcome);
        }
    });
}

pub fn set_shell(shell: Option<LifecycleCoordinator>) {
    SHELL.with(|s| match s.try_borrow_mut() {
        Ok(mut slot) => *slot = shell,
        Err(_) => log::error!("shell replaced from inside a host callback; ignored"),
    });
}
