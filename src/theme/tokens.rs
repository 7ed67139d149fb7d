//! Static token table keyed by theme and mode.

use serde::Serialize;

use super::mode::ColorMode;
use super::name::ThemeName;

/// Prefix shared by every class name this crate writes.
pub const CLASS_NAME_PREFIX: &str = "theme";

/// Suffix of the variant class used when window blur is disabled.
pub const SOLID_SUFFIX: &str = "solid";

/// Style variables bound by one theme variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TokenSet {
    pub background: &'static str,
    pub foreground: &'static str,
    pub accent: &'static str,
    pub window_blur: &'static str,
}

impl TokenSet {
    /// The tokens as `(variable, value)` pairs, in stylesheet order.
    pub fn variables(&self) -> [(&'static str, &'static str); 4] {
        [
            ("background", self.background),
            ("foreground", self.foreground),
            ("accent", self.accent),
            ("window-blur", self.window_blur),
        ]
    }
}

const WINDOWS_LIGHT: TokenSet = TokenSet {
    background: "rgba(243, 243, 243, 0.85)",
    foreground: "#000000",
    accent: "#0078d4",
    window_blur: "30px",
};

const WINDOWS_DARK: TokenSet = TokenSet {
    background: "rgba(32, 32, 32, 0.85)",
    foreground: "#ffffff",
    accent: "#60cdff",
    window_blur: "30px",
};

const MACOS_LIGHT: TokenSet = TokenSet {
    background: "rgba(236, 236, 236, 0.8)",
    foreground: "rgba(0, 0, 0, 0.85)",
    accent: "#007aff",
    window_blur: "20px",
};

const MACOS_DARK: TokenSet = TokenSet {
    background: "rgba(30, 30, 30, 0.8)",
    foreground: "rgba(255, 255, 255, 0.85)",
    accent: "#0a84ff",
    window_blur: "20px",
};

/// Looks up the tokens for a theme variant.
pub fn token_set(theme: ThemeName, mode: ColorMode, window_blur: bool) -> TokenSet {
    let tokens = match (theme, mode) {
        (ThemeName::Windows, ColorMode::Light) => WINDOWS_LIGHT,
        (ThemeName::Windows, ColorMode::Dark) => WINDOWS_DARK,
        (ThemeName::Macos, ColorMode::Light) => MACOS_LIGHT,
        (ThemeName::Macos, ColorMode::Dark) => MACOS_DARK,
    };

    if window_blur {
        tokens
    } else {
        TokenSet {
            window_blur: "0px",
            ..tokens
        }
    }
}
