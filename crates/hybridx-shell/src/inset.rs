//! Safe-area measurements reported by the native display.

use std::cell::Cell;
use std::rc::Rc;

/// Margins reserved by system chrome, in device-independent units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InsetSnapshot {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl InsetSnapshot {
    pub const ZERO: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Copy with every negative or non-finite component replaced by zero.
    pub fn clamped(self) -> Self {
        fn clamp(v: f32) -> f32 {
            if v.is_finite() && v > 0.0 { v } else { 0.0 }
        }
        Self {
            left: clamp(self.left),
            top: clamp(self.top),
            right: clamp(self.right),
            bottom: clamp(self.bottom),
        }
    }

    /// All-zero readings mean "no layout pass yet" as often as "no bars".
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Which chrome settings the running OS version accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromeCapabilities {
    pub chrome_color: bool,
    pub icon_theme: bool,
}

/// Read-only view of the native display's safe-area geometry.
///
/// Implementations must reflect the most recent layout pass and return
/// [`InsetSnapshot::ZERO`] before the first one.
pub trait InsetSource {
    fn current(&self) -> InsetSnapshot;

    fn supports_chrome_color(&self) -> bool;

    fn supports_icon_theme_control(&self) -> bool;

    fn capabilities(&self) -> ChromeCapabilities {
        ChromeCapabilities {
            chrome_color: self.supports_chrome_color(),
            icon_theme: self.supports_icon_theme_control(),
        }
    }
}

/// Inset source fed by the host's layout callback.
///
/// Clones share state: the host keeps one handle to report measurements
/// and the coordinator queries another.
#[derive(Debug, Clone, Default)]
pub struct ReportedInsets {
    latest: Rc<Cell<InsetSnapshot>>,
    capabilities: ChromeCapabilities,
}

impl ReportedInsets {
    pub fn new(capabilities: ChromeCapabilities) -> Self {
        Self {
            latest: Rc::new(Cell::new(InsetSnapshot::ZERO)),
            capabilities,
        }
    }

    /// Record the measurement taken during a layout pass.
    pub fn report(&self, snapshot: InsetSnapshot) {
        self.latest.set(snapshot);
    }
}

impl InsetSource for ReportedInsets {
    fn current(&self) -> InsetSnapshot {
        self.latest.get()
    }

    fn supports_chrome_color(&self) -> bool {
        self.capabilities.chrome_color
    }

    fn supports_icon_theme_control(&self) -> bool {
        self.capabilities.icon_theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_negative_and_nan() {
        let s = InsetSnapshot::new(-3.0, 24.0, f32::NAN, -0.5).clamped();
        assert_eq!(s, InsetSnapshot::new(0.0, 24.0, 0.0, 0.0));
    }

    #[test]
    fn test_reported_insets_start_at_zero() {
        let host = ReportedInsets::new(ChromeCapabilities {
            chrome_color: true,
            icon_theme: false,
        });
        let source = host.clone();
        assert!(source.current().is_zero());

        host.report(InsetSnapshot::new(0.0, 48.0, 0.0, 24.0));
        assert_eq!(source.current().top, 48.0);
        assert!(source.supports_chrome_color());
        assert!(!source.supports_icon_theme_control());
    }
}
