//! Error types for theme resolution.
//!
//! [`ThemeError`] is the single error type surfaced by this crate. Only
//! integrator mistakes are reported: an unknown theme name never falls back to
//! a default theme, since that would hide a misconfigured provider. Losing the
//! environment color-scheme signal is not an error (the mode degrades to
//! light), and a missing document surface turns class synchronization into a
//! no-op.

use thiserror::Error;

/// Error type for theme resolution and provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    /// The requested theme name is not one of the known themes.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// The requested mode is not `light`, `dark` or `auto`.
    #[error("invalid color mode: {0}")]
    InvalidMode(String),

    /// Wrapper markup or the global stylesheet failed to render.
    #[error("markup error: {0}")]
    Markup(String),
}

impl From<minijinja::Error> for ThemeError {
    fn from(err: minijinja::Error) -> Self {
        ThemeError::Markup(err.to_string())
    }
}
