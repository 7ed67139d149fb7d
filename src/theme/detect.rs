//! Operating-system color-scheme detection.

use std::sync::{Mutex, MutexGuard, PoisonError};

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use once_cell::sync::Lazy;
use tracing::debug;

use super::mode::ColorMode;

/// Function returning the OS preference, or `None` when it cannot be determined.
pub type ColorSchemeDetector = fn() -> Option<ColorMode>;

static COLOR_SCHEME_DETECTOR: Lazy<Mutex<ColorSchemeDetector>> =
    Lazy::new(|| Mutex::new(os_color_scheme));

/// Overrides the detector used to determine whether the user prefers a light or dark theme.
///
/// This is useful for testing or when you want to force a specific color mode.
/// The override is process-wide.
pub fn set_color_scheme_detector(detector: ColorSchemeDetector) {
    *detector_slot() = detector;
}

/// Restores OS detection after [`set_color_scheme_detector`].
pub fn reset_color_scheme_detector() {
    *detector_slot() = os_color_scheme;
}

/// Asks the active detector for the preferred color mode.
pub fn detect_color_mode() -> Option<ColorMode> {
    let detector = *detector_slot();
    detector()
}

fn detector_slot() -> MutexGuard<'static, ColorSchemeDetector> {
    COLOR_SCHEME_DETECTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn os_color_scheme() -> Option<ColorMode> {
    match detect_os_theme() {
        Ok(OsThemeMode::Dark) => Some(ColorMode::Dark),
        Ok(OsThemeMode::Light) => Some(ColorMode::Light),
        Ok(_) => None,
        Err(err) => {
            debug!(error = ?err, "OS color scheme detection failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_detector_override() {
        set_color_scheme_detector(|| Some(ColorMode::Dark));
        assert_eq!(detect_color_mode(), Some(ColorMode::Dark));

        set_color_scheme_detector(|| None);
        assert_eq!(detect_color_mode(), None);

        reset_color_scheme_detector();
    }
}
