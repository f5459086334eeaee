//! Native chrome and renderer spacing.
//!
//! [`ChromeController`] is the only writer of bar colors, edge-to-edge mode,
//! container padding and the injected safe-area stylesheet. Each layout mode
//! owns exactly one of those spacing mechanisms; entering a mode withdraws
//! whatever the previous mode left behind.

use crate::appearance::{BarColor, ChromeAppearance};
use crate::bridge::{BridgeOutcome, BridgeRequest, RendererBridge, RequestId};
use crate::inset::{ChromeCapabilities, InsetSnapshot};
use crate::policy::SpacingDirective;
use crate::script;
use hybridx_config::{IconTheme, LayoutMode};

/// One atomic system bar change. Absent fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromeUpdate {
    pub status_bar_color: Option<BarColor>,
    pub navigation_bar_color: Option<BarColor>,
    pub icon_theme: Option<IconTheme>,
}

impl ChromeUpdate {
    pub fn is_empty(&self) -> bool {
        self.status_bar_color.is_none()
            && self.navigation_bar_color.is_none()
            && self.icon_theme.is_none()
    }
}

/// Write side of the native window.
pub trait NativeChrome {
    /// Apply every present field of `update` before the next frame.
    fn commit(&mut self, update: &ChromeUpdate);

    /// `false` lets the OS fit content inside the system bars.
    fn set_edge_to_edge(&mut self, edge_to_edge: bool);

    /// Padding on the renderer's container view.
    fn set_content_padding(&mut self, padding: InsetSnapshot);
}

/// Proof that the current document already carries `css`.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionMarker {
    pub document: u64,
    pub request: RequestId,
    pub css: String,
}

pub struct ChromeController {
    native: Box<dyn NativeChrome>,
    bridge: Box<dyn RendererBridge>,
    mode: Option<LayoutMode>,
    directive: Option<SpacingDirective>,
    applied_padding: Option<InsetSnapshot>,
    marker: Option<InjectionMarker>,
    document: u64,
    overlay_request: Option<RequestId>,
    next_request: u64,
}

impl ChromeController {
    pub fn new(native: Box<dyn NativeChrome>, bridge: Box<dyn RendererBridge>) -> Self {
        Self {
            native,
            bridge,
            mode: None,
            directive: None,
            applied_padding: None,
            marker: None,
            document: 0,
            overlay_request: None,
            next_request: 1,
        }
    }

    pub fn mode(&self) -> Option<LayoutMode> {
        self.mode
    }

    pub fn marker(&self) -> Option<&InjectionMarker> {
        self.marker.as_ref()
    }

    pub fn overlay_request(&self) -> Option<RequestId> {
        self.overlay_request
    }

    fn allocate_request(&mut self) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        id
    }

    /// Commit bar colors and icon theme together, dropping whatever the OS
    /// can't take.
    pub fn apply_appearance(&mut self, appearance: &ChromeAppearance, caps: ChromeCapabilities) {
        let mut update = ChromeUpdate::default();

        // Icons are only checked against a bar color this shell sets.
        if caps.icon_theme && caps.chrome_color {
            update.icon_theme = Some(appearance.icon_theme());
        } else if caps.icon_theme {
            log::info!("capability unavailable: bar color; keeping system icon theme");
        }

        // Without icon control the system draws light icons; a bar that needs
        // dark ones would hide them.
        let colors_legible = caps.icon_theme || appearance.icon_theme() == IconTheme::Light;
        if caps.chrome_color && colors_legible {
            update.status_bar_color = Some(appearance.status_bar());
            update.navigation_bar_color = Some(appearance.navigation_bar());
        } else if caps.chrome_color {
            log::info!("capability unavailable: icon theme control; keeping system bar colors");
        }

        if update.is_empty() {
            log::debug!("chrome appearance not configurable on this OS version");
            return;
        }

        log::info!(
            "chrome appearance: status={:?} navigation={:?} icons={:?}",
            update.status_bar_color,
            update.navigation_bar_color,
            update.icon_theme
        );
        self.native.commit(&update);
    }

    /// Switch spacing mechanism, withdrawing the previous mode's artifacts.
    pub fn enter_mode(&mut self, mode: LayoutMode) {
        if self.mode == Some(mode) {
            return;
        }

        match self.mode {
            Some(LayoutMode::ManualInset) => {
                if self.applied_padding.take().is_some() {
                    self.native.set_content_padding(InsetSnapshot::ZERO);
                }
            }
            Some(LayoutMode::StyleInjected) => {
                self.marker = None;
                let id = self.allocate_request();
                if let Err(e) = self.bridge.post(id, &BridgeRequest::RemoveStyle) {
                    log::warn!("could not remove safe-area style: {}", e);
                }
            }
            Some(LayoutMode::AutoFit) | None => {}
        }

        log::info!("layout mode {:?} -> {:?}", self.mode, mode);
        self.directive = None;
        self.native.set_edge_to_edge(mode.is_edge_to_edge());
        self.mode = Some(mode);
    }

    /// Execute `directive` against the native container or the renderer.
    ///
    /// Directives from a mode other than the active one are ignored.
    pub fn apply_spacing(&mut self, directive: &SpacingDirective) {
        if self.mode != Some(directive.mode()) {
            log::warn!(
                "ignoring {:?} while layout mode is {:?}",
                directive,
                self.mode
            );
            return;
        }
        self.directive = Some(*directive);

        match directive {
            SpacingDirective::NoAction => {}
            SpacingDirective::ApplyPadding(padding) => {
                if self.applied_padding == Some(*padding) {
                    return;
                }
                log::debug!("container padding {:?}", padding);
                self.native.set_content_padding(*padding);
                self.applied_padding = Some(*padding);
            }
            SpacingDirective::ApplyStyleVariables(insets) => self.inject_style(insets),
        }
    }

    fn inject_style(&mut self, insets: &InsetSnapshot) {
        let css = script::safe_area_css(insets);
        if let Some(marker) = &self.marker {
            if marker.document == self.document && marker.css == css {
                return;
            }
        }

        let id = self.allocate_request();
        match self.bridge.post(id, &BridgeRequest::InjectStyle { css: css.clone() }) {
            Ok(()) => {
                log::debug!("safe-area style {} queued for document {}", id, self.document);
                self.marker = Some(InjectionMarker {
                    document: self.document,
                    request: id,
                    css,
                });
            }
            Err(e) => {
                // retried on the next content-load event
                log::warn!("safe-area style injection deferred: {}", e);
                self.marker = None;
            }
        }
    }

    /// The renderer replaced its document; any injected style is gone.
    pub fn on_document_loaded(&mut self) {
        self.document += 1;
        self.marker = None;
        if let Some(directive @ SpacingDirective::ApplyStyleVariables(_)) = self.directive {
            self.apply_spacing(&directive);
        }
    }

    /// Ask the renderer's status bar plugin to keep content out from under
    /// the bar. Failures are logged and dropped.
    pub fn reassert_overlay_policy(&mut self) {
        let id = self.allocate_request();
        match self.bridge.post(id, &BridgeRequest::RequestOverlayDisabled) {
            Ok(()) => {
                if let Some(previous) = self.overlay_request.replace(id) {
                    log::debug!("overlay request {} superseded by {}", previous, id);
                }
            }
            Err(e) => log::warn!("overlay reassertion dropped: {}", e),
        }
    }

    /// Match an asynchronous reply to the request that produced it.
    pub fn on_bridge_reply(&mut self, id: RequestId, outcome: BridgeOutcome) {
        if self.overlay_request == Some(id) {
            self.overlay_request = None;
            match outcome {
                BridgeOutcome::Completed => log::debug!("overlay disabled by renderer"),
                BridgeOutcome::CapabilityMissing => {
                    log::warn!("overlay request {} dropped: status bar plugin not loaded", id)
                }
                BridgeOutcome::Rejected(reason) => {
                    log::warn!("overlay request {} rejected: {}", id, reason)
                }
            }
            return;
        }

        if self.marker.as_ref().map(|m| m.request) == Some(id) {
            if outcome != BridgeOutcome::Completed {
                log::warn!("safe-area style {} failed: {:?}", id, outcome);
                self.marker = None;
            }
            return;
        }

        log::debug!("ignoring stale bridge reply {} ({:?})", id, outcome);
    }
}
