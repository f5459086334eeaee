//! Pure spacing decision from layout mode and inset reading.

use crate::inset::InsetSnapshot;
use hybridx_config::{LayoutMode, PLATFORM_STATUS_BAR_HEIGHT};

/// What the chrome controller must do so content clears the system bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpacingDirective {
    /// Native layout already reserves the space.
    NoAction,
    /// Pad the renderer's container natively.
    ApplyPadding(InsetSnapshot),
    /// Publish margins as CSS custom properties plus a concrete top padding.
    ApplyStyleVariables(InsetSnapshot),
}

impl SpacingDirective {
    /// The layout mode that produces this directive.
    pub fn mode(&self) -> LayoutMode {
        match self {
            Self::NoAction => LayoutMode::AutoFit,
            Self::ApplyPadding(_) => LayoutMode::ManualInset,
            Self::ApplyStyleVariables(_) => LayoutMode::StyleInjected,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SafeAreaPolicy {
    default_status_bar_height: f32,
}

impl Default for SafeAreaPolicy {
    fn default() -> Self {
        Self::new(PLATFORM_STATUS_BAR_HEIGHT)
    }
}

impl SafeAreaPolicy {
    pub fn new(default_status_bar_height: f32) -> Self {
        Self {
            default_status_bar_height: if default_status_bar_height.is_finite() {
                default_status_bar_height.max(0.0)
            } else {
                PLATFORM_STATUS_BAR_HEIGHT
            },
        }
    }

    pub fn default_status_bar_height(&self) -> f32 {
        self.default_status_bar_height
    }

    pub fn decide(&self, mode: LayoutMode, snapshot: InsetSnapshot) -> SpacingDirective {
        let snapshot = snapshot.clamped();
        match mode {
            LayoutMode::AutoFit => SpacingDirective::NoAction,
            LayoutMode::ManualInset => SpacingDirective::ApplyPadding(snapshot),
            LayoutMode::StyleInjected => {
                // A zero top at decision time usually races the first layout pass.
                let top = if snapshot.top == 0.0 {
                    log::debug!(
                        "zero top inset, using default status bar height {}",
                        self.default_status_bar_height
                    );
                    self.default_status_bar_height
                } else {
                    snapshot.top
                };
                SpacingDirective::ApplyStyleVariables(InsetSnapshot { top, ..snapshot })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_fit_takes_no_action() {
        let policy = SafeAreaPolicy::default();
        let directive = policy.decide(LayoutMode::AutoFit, InsetSnapshot::new(0.0, 48.0, 0.0, 24.0));
        assert_eq!(directive, SpacingDirective::NoAction);
    }

    #[test]
    fn test_manual_inset_pads_exactly() {
        let policy = SafeAreaPolicy::default();
        let snapshot = InsetSnapshot::new(0.0, 48.0, 0.0, 24.0);
        assert_eq!(
            policy.decide(LayoutMode::ManualInset, snapshot),
            SpacingDirective::ApplyPadding(snapshot)
        );
    }

    #[test]
    fn test_negative_components_clamped() {
        let policy = SafeAreaPolicy::default();
        let directive =
            policy.decide(LayoutMode::ManualInset, InsetSnapshot::new(-8.0, 30.0, -1.0, -24.0));
        assert_eq!(
            directive,
            SpacingDirective::ApplyPadding(InsetSnapshot::new(0.0, 30.0, 0.0, 0.0))
        );

        let directive =
            policy.decide(LayoutMode::StyleInjected, InsetSnapshot::new(-8.0, 30.0, 0.0, -2.0));
        assert_eq!(
            directive,
            SpacingDirective::ApplyStyleVariables(InsetSnapshot::new(0.0, 30.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_style_injected_zero_top_uses_platform_default() {
        let policy = SafeAreaPolicy::default();
        let directive = policy.decide(LayoutMode::StyleInjected, InsetSnapshot::ZERO);
        assert_eq!(
            directive,
            SpacingDirective::ApplyStyleVariables(InsetSnapshot::new(
                0.0,
                PLATFORM_STATUS_BAR_HEIGHT,
                0.0,
                0.0
            ))
        );

        // negative top clamps to zero and then falls back too
        let custom = SafeAreaPolicy::new(32.0);
        match custom.decide(LayoutMode::StyleInjected, InsetSnapshot::new(0.0, -5.0, 0.0, 16.0)) {
            SpacingDirective::ApplyStyleVariables(s) => {
                assert_eq!(s.top, 32.0);
                assert_eq!(s.bottom, 16.0);
            }
            other => panic!("unexpected directive {:?}", other),
        }
    }

    #[test]
    fn test_manual_inset_trusts_zero_top() {
        let policy = SafeAreaPolicy::default();
        assert_eq!(
            policy.decide(LayoutMode::ManualInset, InsetSnapshot::ZERO),
            SpacingDirective::ApplyPadding(InsetSnapshot::ZERO)
        );
    }

    #[test]
    fn test_directive_mode() {
        assert_eq!(SpacingDirective::NoAction.mode(), LayoutMode::AutoFit);
        assert_eq!(
            SpacingDirective::ApplyStyleVariables(InsetSnapshot::ZERO).mode(),
            LayoutMode::StyleInjected
        );
    }
}
