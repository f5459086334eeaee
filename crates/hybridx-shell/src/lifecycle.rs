//! Sequencing of chrome and persistence work across host lifecycle events.

use crate::appearance::ChromeAppearance;
use crate::bridge::{BridgeOutcome, RendererBridge, RequestId};
use crate::chrome::{ChromeController, NativeChrome};
use crate::error::{Result, ShellError};
use crate::inset::InsetSource;
use crate::persistence::{PersistenceConfig, PersistenceController, StorageBackend};
use crate::policy::SafeAreaPolicy;
use hybridx_config::{LayoutMode, ShellConfig};
use url::Url;

/// Host-side collaborators, one per external interface.
pub struct ShellHost {
    pub insets: Box<dyn InsetSource>,
    pub chrome: Box<dyn NativeChrome>,
    pub bridge: Box<dyn RendererBridge>,
    pub storage: Box<dyn StorageBackend>,
}

/// Validated settings the coordinator acts on.
#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub mode: LayoutMode,
    pub default_status_bar_height: f32,
    pub appearance: ChromeAppearance,
    pub persistence: PersistenceConfig,
    pub start_url: Url,
}

impl ShellSettings {
    pub fn from_config(config: &ShellConfig) -> Result<Self> {
        let start_url = config
            .server
            .start_url()
            .map_err(|e| ShellError::Configuration(e.to_string()))?;
        Ok(Self {
            mode: config.layout.mode,
            default_status_bar_height: config.layout.default_status_bar_height,
            appearance: ChromeAppearance::from_config(&config.chrome)?,
            persistence: PersistenceConfig {
                mixed_content_allowed: config.server.allow_mixed_content,
                ..PersistenceConfig::from(&config.persistence)
            },
            start_url,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Created,
    /// The native layout pass ran; insets may have changed.
    LayoutPass,
    ContentLoaded,
    Resumed,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Uninitialized,
    Created,
    Resumed,
    Paused,
}

pub struct LifecycleCoordinator {
    settings: ShellSettings,
    policy: SafeAreaPolicy,
    insets: Box<dyn InsetSource>,
    chrome: ChromeController,
    persistence: PersistenceController,
    phase: LifecyclePhase,
    laid_out: bool,
}

impl LifecycleCoordinator {
    pub fn new(settings: ShellSettings, host: ShellHost) -> Self {
        Self {
            policy: SafeAreaPolicy::new(settings.default_status_bar_height),
            settings,
            insets: host.insets,
            chrome: ChromeController::new(host.chrome, host.bridge),
            persistence: PersistenceController::new(host.storage),
            phase: LifecyclePhase::Uninitialized,
            laid_out: false,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.settings.mode
    }

    pub fn chrome(&self) -> &ChromeController {
        &self.chrome
    }

    pub fn persistence(&self) -> &PersistenceController {
        &self.persistence
    }

    /// Application content URL, available once storage is configured.
    pub fn start_url(&self) -> Option<&Url> {
        self.persistence
            .is_configured()
            .then_some(&self.settings.start_url)
    }

    pub fn dispatch(&mut self, event: LifecycleEvent) -> Result<()> {
        match event {
            LifecycleEvent::Created => return self.on_created(),
            LifecycleEvent::LayoutPass => self.on_layout_pass(),
            LifecycleEvent::ContentLoaded => self.on_content_loaded(),
            LifecycleEvent::Resumed => self.on_resumed(),
            LifecycleEvent::Paused => self.on_paused(),
        }
        Ok(())
    }

    /// Runs once; repeated creates are ignored. Spacing waits for the first
    /// layout pass since insets are unknown before it.
    pub fn on_created(&mut self) -> Result<()> {
        if self.phase != LifecyclePhase::Uninitialized {
            log::warn!("duplicate create in phase {:?} ignored", self.phase);
            return Ok(());
        }
        self.phase = LifecyclePhase::Created;
        log::info!("shell created, layout mode {:?}", self.settings.mode);

        self.chrome.enter_mode(self.settings.mode);
        self.chrome
            .apply_appearance(&self.settings.appearance, self.insets.capabilities());
        self.persistence.configure(self.settings.persistence)
    }

    /// Re-read insets and re-decide spacing. Called on every layout pass.
    pub fn on_layout_pass(&mut self) {
        if self.phase == LifecyclePhase::Uninitialized {
            log::debug!("layout pass before create ignored");
            return;
        }
        let snapshot = self.insets.current();
        if !self.laid_out {
            log::info!("first layout pass, insets {:?}", snapshot);
            self.laid_out = true;
        }
        let directive = self.policy.decide(self.settings.mode, snapshot);
        self.chrome.apply_spacing(&directive);
    }

    pub fn on_content_loaded(&mut self) {
        log::debug!("content loaded in phase {:?}", self.phase);
        self.chrome.on_document_loaded();
    }

    pub fn on_resumed(&mut self) {
        match self.phase {
            LifecyclePhase::Uninitialized => {
                log::warn!("resume before create ignored");
                return;
            }
            LifecyclePhase::Resumed => log::debug!("already resumed"),
            LifecyclePhase::Created | LifecyclePhase::Paused => {}
        }
        self.phase = LifecyclePhase::Resumed;
        self.persistence.reassert();
        self.chrome.reassert_overlay_policy();
    }

    pub fn on_paused(&mut self) {
        if self.phase == LifecyclePhase::Uninitialized {
            log::warn!("pause before create ignored");
            return;
        }
        self.phase = LifecyclePhase::Paused;
        self.persistence.flush();
    }

    pub fn on_bridge_reply(&mut self, id: RequestId, outcome: BridgeOutcome) {
        self.chrome.on_bridge_reply(id, outcome);
    }

    /// Replace the active layout mode and re-derive chrome for it.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        if self.settings.mode == mode {
            return;
        }
        self.settings.mode = mode;
        if self.phase == LifecyclePhase::Uninitialized {
            return;
        }
        self.chrome.enter_mode(mode);
        self.chrome
            .apply_appearance(&self.settings.appearance, self.insets.capabilities());
        if self.laid_out {
            self.on_layout_pass();
        }
    }
}
