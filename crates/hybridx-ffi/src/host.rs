//! Host callback table and the shell traits implemented on top of it.

use hybridx_shell::{
    script, BarColor, BridgeRequest, CacheMode, ChromeUpdate, IconTheme, InsetSnapshot,
    InsetSource, NativeChrome, PersistenceConfig, RendererBridge, RequestId, Result, ShellError,
    StorageBackend,
};
use std::ffi::{c_char, c_int, c_void, CString};

/// Host callback returned success.
pub const HYBRIDX_HOST_OK: c_int = 0;
/// The renderer or its script context isn't ready yet.
pub const HYBRIDX_HOST_NOT_READY: c_int = 1;
/// The OS version or renderer lacks the feature.
pub const HYBRIDX_HOST_UNSUPPORTED: c_int = 2;

/// Safe-area margins in device-independent units.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridxInsets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl From<HybridxInsets> for InsetSnapshot {
    fn from(i: HybridxInsets) -> Self {
        InsetSnapshot::new(i.left, i.top, i.right, i.bottom)
    }
}

impl From<InsetSnapshot> for HybridxInsets {
    fn from(s: InsetSnapshot) -> Self {
        Self {
            left: s.left,
            top: s.top,
            right: s.right,
            bottom: s.bottom,
        }
    }
}

/// Icon theme values passed to `commit_chrome`.
pub const HYBRIDX_ICONS_UNCHANGED: c_int = 0;
pub const HYBRIDX_ICONS_LIGHT: c_int = 1;
pub const HYBRIDX_ICONS_DARK: c_int = 2;

/// One system bar change; `set_*` flags mark the fields to apply.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridxChromeUpdate {
    pub set_status_bar_color: bool,
    /// `0xAARRGGBB`; `0` is transparent
    pub status_bar_argb: u32,
    pub set_navigation_bar_color: bool,
    pub navigation_bar_argb: u32,
    pub icon_theme: c_int,
}

impl From<&ChromeUpdate> for HybridxChromeUpdate {
    fn from(update: &ChromeUpdate) -> Self {
        Self {
            set_status_bar_color: update.status_bar_color.is_some(),
            status_bar_argb: update.status_bar_color.map_or(0, |c: BarColor| c.to_argb()),
            set_navigation_bar_color: update.navigation_bar_color.is_some(),
            navigation_bar_argb: update.navigation_bar_color.map_or(0, |c| c.to_argb()),
            icon_theme: match update.icon_theme {
                None => HYBRIDX_ICONS_UNCHANGED,
                Some(IconTheme::Light) => HYBRIDX_ICONS_LIGHT,
                Some(IconTheme::Dark) => HYBRIDX_ICONS_DARK,
            },
        }
    }
}

/// Cache mode values, matching Android's `WebSettings.LOAD_*` constants.
pub const HYBRIDX_CACHE_DEFAULT: c_int = -1;
pub const HYBRIDX_CACHE_ELSE_NETWORK: c_int = 1;
pub const HYBRIDX_CACHE_NO_CACHE: c_int = 2;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct HybridxStorageConfig {
    pub database_enabled: bool,
    pub dom_storage_enabled: bool,
    pub accept_cookies: bool,
    pub accept_third_party_cookies: bool,
    pub javascript_enabled: bool,
    pub cache_mode: c_int,
    /// Maps to `WebSettings.MIXED_CONTENT_ALWAYS_ALLOW` vs `NEVER_ALLOW`
    pub allow_mixed_content: bool,
}

impl From<&PersistenceConfig> for HybridxStorageConfig {
    fn from(c: &PersistenceConfig) -> Self {
        Self {
            database_enabled: c.storage_enabled,
            dom_storage_enabled: c.dom_storage_enabled,
            accept_cookies: c.cookies_accepted,
            accept_third_party_cookies: c.third_party_cookies_accepted,
            javascript_enabled: c.javascript_enabled,
            cache_mode: match c.cache_mode {
                CacheMode::Default => HYBRIDX_CACHE_DEFAULT,
                CacheMode::CacheElseNetwork => HYBRIDX_CACHE_ELSE_NETWORK,
                CacheMode::NoCache => HYBRIDX_CACHE_NO_CACHE,
            },
            allow_mixed_content: c.mixed_content_allowed,
        }
    }
}

type QueryInsetsFn = unsafe extern "C" fn(*mut c_void, *mut HybridxInsets);
type CommitChromeFn = unsafe extern "C" fn(*mut c_void, *const HybridxChromeUpdate);
type SetEdgeToEdgeFn = unsafe extern "C" fn(*mut c_void, bool);
type SetContentPaddingFn = unsafe extern "C" fn(*mut c_void, *const HybridxInsets);
type EvaluateScriptFn = unsafe extern "C" fn(*mut c_void, *const c_char) -> c_int;
type ApplyStorageFn = unsafe extern "C" fn(*mut c_void, *const HybridxStorageConfig) -> c_int;
type FlushCookiesFn = unsafe extern "C" fn(*mut c_void) -> c_int;

/// Callbacks registered by the native host. Null entries mark features the
/// host doesn't offer.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HybridxHostCallbacks {
    pub user_data: *mut c_void,
    pub supports_chrome_color: bool,
    pub supports_icon_theme: bool,
    pub query_insets: Option<QueryInsetsFn>,
    pub commit_chrome: Option<CommitChromeFn>,
    pub set_edge_to_edge: Option<SetEdgeToEdgeFn>,
    pub set_content_padding: Option<SetContentPaddingFn>,
    /// Queue a script on the renderer; must not wait for it to run.
    pub evaluate_script: Option<EvaluateScriptFn>,
    pub apply_storage: Option<ApplyStorageFn>,
    pub flush_cookies: Option<FlushCookiesFn>,
}

fn status_to_result(status: c_int, what: &str) -> Result<()> {
    match status {
        HYBRIDX_HOST_OK => Ok(()),
        HYBRIDX_HOST_NOT_READY => Err(ShellError::NotReady(what.to_string())),
        HYBRIDX_HOST_UNSUPPORTED => Err(ShellError::CapabilityUnavailable(what.to_string())),
        other => Err(ShellError::Bridge(format!("{} failed with status {}", what, other))),
    }
}

/// Shell trait implementations backed by a callback table.
///
/// Callbacks run on the thread that drives the lifecycle, which is the
/// thread that registered them.
#[derive(Clone, Copy)]
pub struct CallbackHost {
    table: HybridxHostCallbacks,
}

impl CallbackHost {
    /// # Safety
    /// Every non-null callback must stay callable with `user_data` until
    /// `hybridx_shutdown` returns.
    pub unsafe fn new(table: HybridxHostCallbacks) -> Self {
        Self { table }
    }
}

impl InsetSource for CallbackHost {
    fn current(&self) -> InsetSnapshot {
        let Some(query) = self.table.query_insets else {
            return InsetSnapshot::ZERO;
        };
        let mut out = HybridxInsets::default();
        unsafe { query(self.table.user_data, &mut out) };
        out.into()
    }

    fn supports_chrome_color(&self) -> bool {
        self.table.supports_chrome_color && self.table.commit_chrome.is_some()
    }

    fn supports_icon_theme_control(&self) -> bool {
        self.table.supports_icon_theme && self.table.commit_chrome.is_some()
    }
}

impl NativeChrome for CallbackHost {
    fn commit(&mut self, update: &ChromeUpdate) {
        if let Some(commit) = self.table.commit_chrome {
            let raw = HybridxChromeUpdate::from(update);
            unsafe { commit(self.table.user_data, &raw) };
        }
    }

    fn set_edge_to_edge(&mut self, edge_to_edge: bool) {
        if let Some(set) = self.table.set_edge_to_edge {
            unsafe { set(self.table.user_data, edge_to_edge) };
        }
    }

    fn set_content_padding(&mut self, padding: InsetSnapshot) {
        match self.table.set_content_padding {
            Some(set) => {
                let raw = HybridxInsets::from(padding);
                unsafe { set(self.table.user_data, &raw) };
            }
            None => log::warn!("host has no content padding callback"),
        }
    }
}

impl RendererBridge for CallbackHost {
    fn post(&mut self, id: RequestId, request: &BridgeRequest) -> Result<()> {
        let Some(evaluate) = self.table.evaluate_script else {
            return Err(ShellError::CapabilityUnavailable("evaluate_script".to_string()));
        };
        let source = CString::new(script::render(id, request))
            .map_err(|e| ShellError::Bridge(e.to_string()))?;
        let status = unsafe { evaluate(self.table.user_data, source.as_ptr()) };
        status_to_result(status, request.name())
    }
}

impl StorageBackend for CallbackHost {
    fn apply(&mut self, config: &PersistenceConfig) -> Result<()> {
        let Some(apply) = self.table.apply_storage else {
            return Err(ShellError::CapabilityUnavailable("apply_storage".to_string()));
        };
        let raw = HybridxStorageConfig::from(config);
        let status = unsafe { apply(self.table.user_data, &raw) };
        status_to_result(status, "apply_storage")
    }

    fn flush(&mut self) -> Result<()> {
        let Some(flush) = self.table.flush_cookies else {
            return Err(ShellError::CapabilityUnavailable("flush_cookies".to_string()));
        };
        let status = unsafe { flush(self.table.user_data) };
        status_to_result(status, "flush_cookies")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_update_encoding() {
        let raw = HybridxChromeUpdate::from(&ChromeUpdate {
            status_bar_color: Some(BarColor::Transparent),
            navigation_bar_color: None,
            icon_theme: Some(IconTheme::Dark),
        });
        assert!(raw.set_status_bar_color);
        assert_eq!(raw.status_bar_argb, 0);
        assert!(!raw.set_navigation_bar_color);
        assert_eq!(raw.icon_theme, HYBRIDX_ICONS_DARK);
    }

    #[test]
    fn test_storage_config_encoding() {
        let raw = HybridxStorageConfig::from(&PersistenceConfig {
            cache_mode: CacheMode::NoCache,
            mixed_content_allowed: true,
            ..PersistenceConfig::default()
        });
        assert!(raw.database_enabled);
        assert_eq!(raw.cache_mode, HYBRIDX_CACHE_NO_CACHE);
        assert!(raw.allow_mixed_content);
    }

    #[test]
    fn test_status_codes() {
        assert!(status_to_result(HYBRIDX_HOST_OK, "x").is_ok());
        assert!(matches!(
            status_to_result(HYBRIDX_HOST_NOT_READY, "x"),
            Err(ShellError::NotReady(_))
        ));
        assert!(matches!(
            status_to_result(HYBRIDX_HOST_UNSUPPORTED, "x"),
            Err(ShellError::CapabilityUnavailable(_))
        ));
        assert!(matches!(status_to_result(-7, "x"), Err(ShellError::Bridge(_))));
    }

    #[test]
    fn test_missing_callbacks_degrade() {
        let mut host = unsafe {
            CallbackHost::new(HybridxHostCallbacks {
                user_data: std::ptr::null_mut(),
                supports_chrome_color: true,
                supports_icon_theme: true,
                query_insets: None,
                commit_chrome: None,
                set_edge_to_edge: None,
                set_content_padding: None,
                evaluate_script: None,
                apply_storage: None,
                flush_cookies: None,
            })
        };
        assert!(host.current().is_zero());
        assert!(!host.supports_chrome_color());
        assert!(matches!(
            host.post(RequestId(1), &BridgeRequest::RemoveStyle),
            Err(ShellError::CapabilityUnavailable(_))
        ));
        assert!(host.flush().is_err());
    }
}
