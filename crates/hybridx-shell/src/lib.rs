//! Chrome and persistence reconciliation for a hybrid native/web app shell.
//!
//! A native host window shows one full-screen embedded web renderer. This
//! crate decides how the renderer's content clears the system bars and keeps
//! the renderer's cookies and storage intact across suspend/resume.
//!
//! The host implements four traits, one per external interface:
//!
//! - [`InsetSource`]: safe-area margins and chrome capabilities
//! - [`NativeChrome`]: bar colors, icon theme, edge-to-edge, container padding
//! - [`RendererBridge`]: fire-and-forget requests into the page's script context
//! - [`StorageBackend`]: storage flags and cookie flush
//!
//! and forwards its lifecycle callbacks to a [`LifecycleCoordinator`].

mod appearance;
mod bridge;
mod chrome;
mod error;
mod inset;
mod lifecycle;
mod persistence;
mod policy;
pub mod script;

pub use appearance::{BarColor, ChromeAppearance, Rgba};
pub use bridge::{BridgeOutcome, BridgeRequest, RendererBridge, RequestId};
pub use chrome::{ChromeController, ChromeUpdate, InjectionMarker, NativeChrome};
pub use error::{Result, ShellError};
pub use inset::{ChromeCapabilities, InsetSnapshot, InsetSource, ReportedInsets};
pub use lifecycle::{LifecycleCoordinator, LifecycleEvent, LifecyclePhase, ShellHost, ShellSettings};
pub use persistence::{PersistenceConfig, PersistenceController, PersistenceState, StorageBackend};
pub use policy::{SafeAreaPolicy, SpacingDirective};

pub use hybridx_config::{CacheMode, IconTheme, LayoutMode, ShellConfig};
