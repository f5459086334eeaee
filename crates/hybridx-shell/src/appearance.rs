//! System bar colors and icon theme.

use crate::error::{Result, ShellError};
use hybridx_config::{ChromeConfig, IconTheme};

/// Luminance at which black and white icons have equal WCAG contrast.
const CONTRAST_PIVOT: f32 = 0.179;

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// WCAG 2.1 relative luminance, alpha ignored.
    pub fn relative_luminance(&self) -> f32 {
        fn linear(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// Packed `0xAARRGGBB`, the layout Android color ints use.
    pub fn to_argb(&self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Color of a system bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarColor {
    Opaque(Rgba),
    Transparent,
}

impl BarColor {
    /// Parse any CSS color. Fully transparent colors map to
    /// [`BarColor::Transparent`]; partially translucent ones are rejected.
    pub fn parse(value: &str) -> Result<Self> {
        let color = csscolorparser::parse(value)
            .map_err(|e| ShellError::InvalidAppearance(format!("`{}`: {}", value, e)))?;
        let [r, g, b, a] = color.to_rgba8();
        match a {
            0 => Ok(Self::Transparent),
            255 => Ok(Self::Opaque(Rgba::opaque(r, g, b))),
            _ => Err(ShellError::InvalidAppearance(format!(
                "`{}` is translucent; bars are opaque or transparent",
                value
            ))),
        }
    }

    /// Icon theme that stays legible on this bar, if the bar is opaque.
    pub fn legible_icon_theme(&self) -> Option<IconTheme> {
        match self {
            Self::Opaque(rgba) if rgba.relative_luminance() > CONTRAST_PIVOT => Some(IconTheme::Dark),
            Self::Opaque(_) => Some(IconTheme::Light),
            Self::Transparent => None,
        }
    }

    pub fn to_argb(&self) -> u32 {
        match self {
            Self::Opaque(rgba) => rgba.to_argb(),
            Self::Transparent => 0,
        }
    }
}

/// Bar colors plus the icon theme drawn on them.
///
/// The icon theme applies to status bar icons only. Construction checks that
/// an opaque status bar contrasts with them, so a value of this type can
/// always be committed in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeAppearance {
    status_bar: BarColor,
    navigation_bar: BarColor,
    icon_theme: IconTheme,
}

impl ChromeAppearance {
    pub fn new(status_bar: BarColor, navigation_bar: BarColor, icon_theme: IconTheme) -> Result<Self> {
        if let Some(legible) = status_bar.legible_icon_theme() {
            if legible != icon_theme {
                return Err(ShellError::InvalidAppearance(format!(
                    "{:?} icons on status bar {:?} lack contrast",
                    icon_theme, status_bar
                )));
            }
        }
        Ok(Self {
            status_bar,
            navigation_bar,
            icon_theme,
        })
    }

    pub fn from_config(config: &ChromeConfig) -> Result<Self> {
        Self::new(
            BarColor::parse(&config.status_bar_color)?,
            BarColor::parse(&config.navigation_bar_color)?,
            config.icon_theme,
        )
    }

    pub fn status_bar(&self) -> BarColor {
        self.status_bar
    }

    pub fn navigation_bar(&self) -> BarColor {
        self.navigation_bar
    }

    pub fn icon_theme(&self) -> IconTheme {
        self.icon_theme
    }
}

impl Default for ChromeAppearance {
    fn default() -> Self {
        Self {
            status_bar: BarColor::Opaque(Rgba::WHITE),
            navigation_bar: BarColor::Opaque(Rgba::WHITE),
            icon_theme: IconTheme::Dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bar_colors() {
        assert_eq!(BarColor::parse("#ffffff").unwrap(), BarColor::Opaque(Rgba::WHITE));
        assert_eq!(BarColor::parse("black").unwrap(), BarColor::Opaque(Rgba::BLACK));
        assert_eq!(BarColor::parse("transparent").unwrap(), BarColor::Transparent);
        assert!(BarColor::parse("rgba(0, 0, 0, 0.5)").is_err());
        assert!(BarColor::parse("not-a-color").is_err());
    }

    #[test]
    fn test_legible_icon_theme() {
        assert_eq!(BarColor::Opaque(Rgba::WHITE).legible_icon_theme(), Some(IconTheme::Dark));
        assert_eq!(BarColor::Opaque(Rgba::BLACK).legible_icon_theme(), Some(IconTheme::Light));
        // mid-dark navy
        assert_eq!(
            BarColor::Opaque(Rgba::opaque(0x10, 0x18, 0x20)).legible_icon_theme(),
            Some(IconTheme::Light)
        );
        assert_eq!(BarColor::Transparent.legible_icon_theme(), None);
    }

    #[test]
    fn test_rejects_low_contrast() {
        let white = BarColor::Opaque(Rgba::WHITE);
        assert!(ChromeAppearance::new(white, white, IconTheme::Dark).is_ok());
        assert!(matches!(
            ChromeAppearance::new(white, white, IconTheme::Light),
            Err(ShellError::InvalidAppearance(_))
        ));
        assert!(
            ChromeAppearance::new(BarColor::Transparent, BarColor::Opaque(Rgba::BLACK), IconTheme::Light)
                .is_ok()
        );
    }

    #[test]
    fn test_navigation_bar_color_is_independent_of_icons() {
        let white = BarColor::Opaque(Rgba::WHITE);
        let black = BarColor::Opaque(Rgba::BLACK);
        let appearance = ChromeAppearance::new(white, black, IconTheme::Dark).unwrap();
        assert_eq!(appearance.navigation_bar(), black);
        assert!(ChromeAppearance::new(black, white, IconTheme::Dark).is_err());
    }

    #[test]
    fn test_from_default_config() {
        let appearance = ChromeAppearance::from_config(&ChromeConfig::default()).unwrap();
        assert_eq!(appearance, ChromeAppearance::default());
        assert_eq!(appearance.status_bar().to_argb(), 0xFFFF_FFFF);
    }
}
