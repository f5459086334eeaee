//! Renderer storage and cookie persistence.

use crate::error::{Result, ShellError};
use hybridx_config::{CacheMode, PersistenceSettings};

/// Storage flags handed to the renderer once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceConfig {
    /// Database storage
    pub storage_enabled: bool,
    pub dom_storage_enabled: bool,
    pub cookies_accepted: bool,
    pub third_party_cookies_accepted: bool,
    pub javascript_enabled: bool,
    pub cache_mode: CacheMode,
    /// Let an https document load http subresources
    pub mixed_content_allowed: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self::from(&PersistenceSettings::default())
    }
}

impl From<&PersistenceSettings> for PersistenceConfig {
    fn from(settings: &PersistenceSettings) -> Self {
        Self {
            storage_enabled: settings.storage_enabled,
            dom_storage_enabled: settings.dom_storage_enabled,
            cookies_accepted: settings.cookies_accepted,
            third_party_cookies_accepted: settings.third_party_cookies_accepted,
            javascript_enabled: settings.javascript_enabled,
            cache_mode: settings.cache_mode,
            mixed_content_allowed: false,
        }
    }
}

/// The renderer's storage subsystem.
pub trait StorageBackend {
    /// Apply storage and cookie flags. Individual flags the platform can't
    /// honour are reported as `CapabilityUnavailable` after the rest applied.
    fn apply(&mut self, config: &PersistenceConfig) -> Result<()>;

    /// Write buffered cookies to durable storage. Must return promptly.
    fn flush(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceState {
    Unconfigured,
    Configured(PersistenceConfig),
}

pub struct PersistenceController {
    backend: Box<dyn StorageBackend>,
    state: PersistenceState,
}

impl PersistenceController {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            state: PersistenceState::Unconfigured,
        }
    }

    pub fn state(&self) -> PersistenceState {
        self.state
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.state, PersistenceState::Configured(_))
    }

    /// Enable storage once, before application content loads.
    ///
    /// Settings aren't retroactive to a live document, so a second call is a
    /// programming error and fails with [`ShellError::Configuration`].
    ///
    /// A backend failure is returned, but the config is still recorded so
    /// [`reassert`](Self::reassert) retries it and pauses keep flushing.
    pub fn configure(&mut self, config: PersistenceConfig) -> Result<()> {
        if let PersistenceState::Configured(current) = self.state {
            let err = ShellError::Configuration(format!(
                "storage already configured as {:?}",
                current
            ));
            log::error!("{}", err);
            return Err(err);
        }

        let outcome = match self.backend.apply(&config) {
            Ok(()) => Ok(()),
            Err(e) if e.is_tolerated() => {
                log::info!("storage partially configured: {}", e);
                Ok(())
            }
            Err(e) => {
                log::warn!("storage setup failed, retrying at next resume: {}", e);
                Err(e)
            }
        };

        log::info!(
            "storage configured: database={} dom={} cookies={} third_party={} js={} cache={:?} mixed_content={}",
            config.storage_enabled,
            config.dom_storage_enabled,
            config.cookies_accepted,
            config.third_party_cookies_accepted,
            config.javascript_enabled,
            config.cache_mode,
            config.mixed_content_allowed
        );
        self.state = PersistenceState::Configured(config);
        outcome
    }

    /// Re-apply the configured flags without re-deciding them.
    pub fn reassert(&mut self) {
        let PersistenceState::Configured(config) = self.state else {
            log::debug!("storage not configured; nothing to reassert");
            return;
        };
        if let Err(e) = self.backend.apply(&config) {
            log::warn!("storage reassertion failed: {}", e);
        }
    }

    /// Push buffered cookie writes to disk. Best effort; never fails.
    pub fn flush(&mut self) {
        if !self.is_configured() {
            log::debug!("storage not configured; skipping flush");
            return;
        }
        match self.backend.flush() {
            Ok(()) => log::debug!("cookies flushed"),
            Err(e) => log::warn!("cookie flush failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        applied: Vec<PersistenceConfig>,
        flushes: usize,
    }

    struct FakeStorage {
        counts: Rc<RefCell<Counts>>,
        apply_result: Result<()>,
        flush_result: Result<()>,
    }

    impl StorageBackend for FakeStorage {
        fn apply(&mut self, config: &PersistenceConfig) -> Result<()> {
            self.counts.borrow_mut().applied.push(*config);
            self.apply_result.clone()
        }

        fn flush(&mut self) -> Result<()> {
            self.counts.borrow_mut().flushes += 1;
            self.flush_result.clone()
        }
    }

    fn controller(apply_result: Result<()>, flush_result: Result<()>) -> (PersistenceController, Rc<RefCell<Counts>>) {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let backend = FakeStorage {
            counts: counts.clone(),
            apply_result,
            flush_result,
        };
        (PersistenceController::new(Box::new(backend)), counts)
    }

    #[test]
    fn test_configure_twice_is_rejected() {
        let (mut persistence, counts) = controller(Ok(()), Ok(()));
        assert!(persistence.configure(PersistenceConfig::default()).is_ok());
        assert!(matches!(
            persistence.configure(PersistenceConfig::default()),
            Err(ShellError::Configuration(_))
        ));
        assert_eq!(counts.borrow().applied.len(), 1);
    }

    #[test]
    fn test_flush_never_raises() {
        let (mut persistence, counts) =
            controller(Ok(()), Err(ShellError::Bridge("disk full".to_string())));
        persistence.configure(PersistenceConfig::default()).unwrap();
        for _ in 0..5 {
            persistence.flush();
        }
        assert_eq!(counts.borrow().flushes, 5);
    }

    #[test]
    fn test_flush_before_configure_is_skipped() {
        let (mut persistence, counts) = controller(Ok(()), Ok(()));
        persistence.flush();
        assert_eq!(counts.borrow().flushes, 0);
    }

    #[test]
    fn test_missing_third_party_cookie_support_is_tolerated() {
        let (mut persistence, _) = controller(
            Err(ShellError::CapabilityUnavailable("third-party cookies".to_string())),
            Ok(()),
        );
        assert!(persistence.configure(PersistenceConfig::default()).is_ok());
        assert!(persistence.is_configured());
    }

    #[test]
    fn test_backend_failure_is_reported_but_kept_for_retry() {
        let (mut persistence, counts) =
            controller(Err(ShellError::Bridge("no webview".to_string())), Ok(()));
        let config = PersistenceConfig::default();
        assert!(matches!(persistence.configure(config), Err(ShellError::Bridge(_))));
        assert_eq!(persistence.state(), PersistenceState::Configured(config));

        persistence.reassert();
        persistence.flush();
        assert_eq!(counts.borrow().applied.len(), 2);
        assert_eq!(counts.borrow().flushes, 1);
    }

    #[test]
    fn test_reassert_replays_same_config() {
        let (mut persistence, counts) = controller(Ok(()), Ok(()));
        let config = PersistenceConfig {
            third_party_cookies_accepted: false,
            ..PersistenceConfig::default()
        };
        persistence.configure(config).unwrap();
        persistence.reassert();
        persistence.reassert();
        assert_eq!(counts.borrow().applied, vec![config, config, config]);
    }
}
