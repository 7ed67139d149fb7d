//! Theme and mode resolution.
//!
//! This module turns a theme request into concrete class names:
//!
//! - [`ModeResolver`]: collapses a [`ModeRequest`] (`light`, `dark` or `auto`)
//!   into an effective [`ColorMode`], following a [`ColorSchemeSignal`] while
//!   the request is `auto`
//! - [`resolve_theme`]: pure mapping from theme name + mode to a
//!   [`ResolvedTheme`]
//! - [`ThemeName`]: the fixed set of theme families
//!
//! ## Class names
//!
//! Every resolved theme carries two class names: the family
//! (`theme-windows`) and the variant (`theme-windows-dark`). Disabling window
//! blur selects the solid variant (`theme-windows-dark-solid`).
//!
//! ## Color mode detection
//!
//! [`SystemColorScheme`] queries the OS for the user's preferred scheme.
//! Override it for testing with [`set_color_scheme_detector`]:
//!
//! ```rust
//! use desktop_theme::{reset_color_scheme_detector, set_color_scheme_detector, ColorMode};
//! use desktop_theme::{ColorSchemeSignal, SystemColorScheme};
//!
//! set_color_scheme_detector(|| Some(ColorMode::Dark));
//! assert_eq!(SystemColorScheme::new().current(), Some(ColorMode::Dark));
//! reset_color_scheme_detector();
//! ```

mod detect;
mod mode;
mod name;
mod resolve;
mod signal;
mod tokens;

pub use detect::{
    detect_color_mode, reset_color_scheme_detector, set_color_scheme_detector,
    ColorSchemeDetector,
};
pub use mode::{ColorMode, ModeRequest, ModeResolver};
pub use name::ThemeName;
pub use resolve::{resolve_theme, ResolvedTheme, ThemeTokens};
pub use signal::{
    ColorSchemeSignal, Listener, Listeners, ManualColorScheme, Subscription, SystemColorScheme,
};
pub use tokens::{token_set, TokenSet, CLASS_NAME_PREFIX};
