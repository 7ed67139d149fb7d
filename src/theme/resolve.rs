//! Theme resolution: theme name + effective mode to concrete class names.

use super::mode::ColorMode;
use super::name::ThemeName;
use super::tokens::{token_set, TokenSet, CLASS_NAME_PREFIX, SOLID_SUFFIX};
use crate::error::ThemeError;

/// Opaque style-context handle published to descendants.
///
/// Identifies the active variant by its class name and carries the token
/// values bound by that variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThemeTokens {
    theme: ThemeName,
    mode: ColorMode,
    window_blur: bool,
    class_name: String,
    values: TokenSet,
}

impl ThemeTokens {
    /// The variant class name these tokens are bound to.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn theme(&self) -> ThemeName {
        self.theme
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn window_blur(&self) -> bool {
        self.window_blur
    }

    pub fn values(&self) -> &TokenSet {
        &self.values
    }
}

/// The concrete, immutable result of resolving a theme.
///
/// Two resolutions with identical inputs compare equal.
///
/// # Example
///
/// ```rust
/// use desktop_theme::{resolve_theme, ColorMode};
///
/// let theme = resolve_theme("windows", ColorMode::Dark, true).unwrap();
/// assert_eq!(theme.base_class_name(), "theme-windows");
/// assert_eq!(theme.variant_class_name(), "theme-windows-dark");
/// assert_eq!(theme.class_name(), "theme-windows theme-windows-dark");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedTheme {
    base_class_name: String,
    variant_class_name: String,
    tokens: ThemeTokens,
}

impl ResolvedTheme {
    /// Resolves a known theme. Infallible because `theme` is already validated.
    pub fn new(theme: ThemeName, mode: ColorMode, window_blur: bool) -> Self {
        let base_class_name = format!("{}-{}", CLASS_NAME_PREFIX, theme.as_str());
        let mut variant_class_name = format!("{}-{}", base_class_name, mode.as_str());
        if !window_blur {
            variant_class_name.push('-');
            variant_class_name.push_str(SOLID_SUFFIX);
        }

        let tokens = ThemeTokens {
            theme,
            mode,
            window_blur,
            class_name: variant_class_name.clone(),
            values: token_set(theme, mode, window_blur),
        };

        Self {
            base_class_name,
            variant_class_name,
            tokens,
        }
    }

    /// Class name identifying the theme family.
    pub fn base_class_name(&self) -> &str {
        &self.base_class_name
    }

    /// Class name identifying the active light/dark variant.
    pub fn variant_class_name(&self) -> &str {
        &self.variant_class_name
    }

    /// Base and variant class names joined by a space.
    pub fn class_name(&self) -> String {
        format!("{} {}", self.base_class_name, self.variant_class_name)
    }

    pub fn tokens(&self) -> &ThemeTokens {
        &self.tokens
    }

    pub fn theme(&self) -> ThemeName {
        self.tokens.theme
    }

    pub fn mode(&self) -> ColorMode {
        self.tokens.mode
    }

    /// CSS selector matching elements carrying both class names.
    pub fn selector(&self) -> String {
        format!(".{}.{}", self.base_class_name, self.variant_class_name)
    }
}

/// Resolves a theme by name.
///
/// # Errors
///
/// Returns [`ThemeError::UnknownTheme`] if `theme_name` is not a known theme.
/// There is no fallback theme.
pub fn resolve_theme(
    theme_name: &str,
    mode: ColorMode,
    window_blur: bool,
) -> Result<ResolvedTheme, ThemeError> {
    let theme: ThemeName = theme_name.parse()?;
    Ok(ResolvedTheme::new(theme, mode, window_blur))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_class_names() {
        let theme = resolve_theme("macos", ColorMode::Light, true).unwrap();
        assert_eq!(theme.base_class_name(), "theme-macos");
        assert_eq!(theme.variant_class_name(), "theme-macos-light");
        assert_eq!(theme.tokens().class_name(), "theme-macos-light");
        assert_eq!(theme.selector(), ".theme-macos.theme-macos-light");
    }

    #[test]
    fn test_resolve_without_window_blur() {
        let theme = resolve_theme("windows", ColorMode::Dark, false).unwrap();
        assert_eq!(theme.variant_class_name(), "theme-windows-dark-solid");
        assert!(!theme.tokens().window_blur());
        assert_eq!(theme.tokens().values().window_blur, "0px");
    }

    #[test]
    fn test_resolve_unknown_theme() {
        assert_eq!(
            resolve_theme("nonexistent", ColorMode::Light, true),
            Err(ThemeError::UnknownTheme("nonexistent".to_string()))
        );
    }

    fn theme_name() -> impl Strategy<Value = ThemeName> {
        prop::sample::select(ThemeName::all().to_vec())
    }

    fn color_mode() -> impl Strategy<Value = ColorMode> {
        prop::sample::select(ColorMode::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn test_resolution_is_deterministic(
            theme in theme_name(),
            mode in color_mode(),
            blur in any::<bool>(),
        ) {
            let first = resolve_theme(theme.as_str(), mode, blur).unwrap();
            let second = resolve_theme(theme.as_str(), mode, blur).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.theme(), theme);
            prop_assert_eq!(first.mode(), mode);
        }

        #[test]
        fn test_unknown_names_never_resolve(name in "[a-z]{1,12}") {
            prop_assume!(ThemeName::all().iter().all(|t| t.as_str() != name));
            let result = resolve_theme(&name, ColorMode::Light, true);
            prop_assert_eq!(result, Err(ThemeError::UnknownTheme(name.clone())));
        }
    }
}
