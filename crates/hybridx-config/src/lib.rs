//! HybridX shell configuration
//!
//! This crate provides centralized configuration for the HybridX shell,
//! loading settings from `hybridx.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "hybridx.toml";

/// Standard Android status bar height in device-independent units.
pub const PLATFORM_STATUS_BAR_HEIGHT: f32 = 24.0;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Main configuration structure for the shell
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShellConfig {
    /// Application identity
    pub app: AppConfig,
    /// Where the renderer loads application content from
    pub server: ServerConfig,
    /// Safe-area handling
    pub layout: LayoutConfig,
    /// System bar colors and icon theme
    pub chrome: ChromeConfig,
    /// Renderer storage and cookie settings
    pub persistence: PersistenceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Start URL for application content
    pub url: String,
    /// Permit plain http for `url`
    pub cleartext: bool,
    /// Let the https start page load http subresources
    pub allow_mixed_content: bool,
}

/// How the renderer's content area relates to the system-reserved regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// The OS reserves space; the renderer gets the remaining rectangle.
    AutoFit,
    /// Renderer is full screen; insets become native padding on its container.
    #[default]
    ManualInset,
    /// Renderer is full screen; insets become a generated document stylesheet.
    StyleInjected,
}

impl LayoutMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "auto-fit" | "autofit" => Some(Self::AutoFit),
            "manual-inset" | "manual" => Some(Self::ManualInset),
            "style-injected" | "css" => Some(Self::StyleInjected),
            _ => None,
        }
    }

    /// Whether the renderer draws beneath the system bars.
    pub fn is_edge_to_edge(self) -> bool {
        !matches!(self, Self::AutoFit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    /// Top margin used when a style-injected decision sees a zero top inset
    pub default_status_bar_height: f32,
}

/// Status bar icon color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IconTheme {
    /// Light icons, for dark bars.
    Light,
    /// Dark icons, for light bars.
    #[default]
    Dark,
}

impl IconTheme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    /// Any CSS color, or `transparent`
    pub status_bar_color: String,
    pub navigation_bar_color: String,
    pub icon_theme: IconTheme,
}

/// Renderer HTTP cache behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    #[default]
    Default,
    NoCache,
    CacheElseNetwork,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    /// Database storage
    pub storage_enabled: bool,
    pub dom_storage_enabled: bool,
    pub cookies_accepted: bool,
    pub third_party_cookies_accepted: bool,
    pub javascript_enabled: bool,
    pub cache_mode: CacheMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            id: "club.hybridx.app".to_string(),
            name: "HYBRIDX.CLUB".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "https://app.hybridx.club".to_string(),
            cleartext: false,
            allow_mixed_content: false,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::default(),
            default_status_bar_height: PLATFORM_STATUS_BAR_HEIGHT,
        }
    }
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            status_bar_color: "#ffffff".to_string(),
            navigation_bar_color: "#ffffff".to_string(),
            icon_theme: IconTheme::Dark,
        }
    }
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            storage_enabled: true,
            dom_storage_enabled: true,
            cookies_accepted: true,
            third_party_cookies_accepted: true,
            javascript_enabled: true,
            cache_mode: CacheMode::Default,
        }
    }
}

impl ServerConfig {
    /// Parse `url` and enforce the cleartext policy.
    pub fn start_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.url).map_err(|e| ConfigError::Invalid {
            key: "server.url",
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "https" => Ok(url),
            "http" if self.cleartext => Ok(url),
            "http" => Err(ConfigError::Invalid {
                key: "server.url",
                reason: "plain http requires `server.cleartext = true`".to_string(),
            }),
            other => Err(ConfigError::Invalid {
                key: "server.url",
                reason: format!("unsupported scheme `{}`", other),
            }),
        }
    }
}

fn env_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl ShellConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `HYBRIDX_CONFIG` or `hybridx.toml`, falling back to defaults
    /// when the file is missing or unusable.
    pub fn load_or_default() -> Self {
        let path = std::env::var("HYBRIDX_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(ConfigError::Read(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("ignoring {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over file values. Values that
    /// don't parse are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("HYBRIDX_LAYOUT_MODE") {
            if let Some(mode) = LayoutMode::parse(&val) {
                self.layout.mode = mode;
            }
        }
        if let Ok(val) = std::env::var("HYBRIDX_DEFAULT_STATUS_BAR_HEIGHT") {
            if let Ok(height) = val.parse::<f32>() {
                if height.is_finite() && height >= 0.0 {
                    self.layout.default_status_bar_height = height;
                }
            }
        }
        if let Ok(url) = std::env::var("HYBRIDX_SERVER_URL") {
            self.server.url = url;
        }
        if let Ok(color) = std::env::var("HYBRIDX_STATUS_BAR_COLOR") {
            self.chrome.status_bar_color = color;
        }
        if let Ok(val) = std::env::var("HYBRIDX_ICON_THEME") {
            if let Some(theme) = IconTheme::parse(&val) {
                self.chrome.icon_theme = theme;
            }
        }
        if let Ok(val) = std::env::var("HYBRIDX_THIRD_PARTY_COOKIES") {
            self.persistence.third_party_cookies_accepted = env_flag(&val);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.start_url()?;
        let height = self.layout.default_status_bar_height;
        if !height.is_finite() || height < 0.0 {
            return Err(ConfigError::Invalid {
                key: "layout.default_status_bar_height",
                reason: format!("{} is not a non-negative length", height),
            });
        }
        Ok(())
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from the config file (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
