//! The fixed set of theme families.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// A known theme family.
///
/// Theme names arrive as strings from configuration; parsing is the only
/// place an unknown name is rejected.
///
/// ```rust
/// use desktop_theme::{ThemeError, ThemeName};
///
/// assert_eq!("macos".parse::<ThemeName>(), Ok(ThemeName::Macos));
/// assert_eq!(
///     "nonexistent".parse::<ThemeName>(),
///     Err(ThemeError::UnknownTheme("nonexistent".into())),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Windows,
    Macos,
}

impl ThemeName {
    /// Returns all known themes.
    pub fn all() -> &'static [ThemeName] {
        &[ThemeName::Windows, ThemeName::Macos]
    }

    /// The identifier used in configuration and class names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Windows => "windows",
            ThemeName::Macos => "macos",
        }
    }

    /// Human-readable title for theme pickers.
    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeName::Windows => "Windows",
            ThemeName::Macos => "macOS",
        }
    }
}

impl FromStr for ThemeName {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeName::all()
            .iter()
            .copied()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| ThemeError::UnknownTheme(s.to_string()))
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ThemeName> for String {
    fn from(theme: ThemeName) -> Self {
        theme.as_str().to_string()
    }
}
