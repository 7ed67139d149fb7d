//! Light/dark mode resolution.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::signal::{ColorSchemeSignal, Subscription};
use crate::error::ThemeError;

/// The effective color mode a theme is resolved against.
///
/// Never `auto`: an `auto` request always collapses to one of these two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl ColorMode {
    /// Both modes, light first.
    pub const ALL: [ColorMode; 2] = [ColorMode::Light, ColorMode::Dark];

    /// Returns the lowercase name used in class names and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mode a provider asks for: an explicit mode, or `auto` to follow the
/// environment's color-scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeRequest {
    Light,
    Dark,
    #[default]
    Auto,
}

impl ModeRequest {
    /// Returns the explicit mode, or `None` for `auto`.
    pub fn explicit(&self) -> Option<ColorMode> {
        match self {
            ModeRequest::Light => Some(ColorMode::Light),
            ModeRequest::Dark => Some(ColorMode::Dark),
            ModeRequest::Auto => None,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, ModeRequest::Auto)
    }
}

impl From<ColorMode> for ModeRequest {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => ModeRequest::Light,
            ColorMode::Dark => ModeRequest::Dark,
        }
    }
}

impl FromStr for ModeRequest {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ModeRequest::Light),
            "dark" => Ok(ModeRequest::Dark),
            "auto" => Ok(ModeRequest::Auto),
            other => Err(ThemeError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for ModeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.explicit() {
            Some(mode) => f.write_str(mode.as_str()),
            None => f.write_str("auto"),
        }
    }
}

/// Resolves a [`ModeRequest`] to an effective [`ColorMode`] and, for `auto`,
/// keeps following the environment.
///
/// While the request is `auto` the resolver holds a [`Subscription`] on the
/// color-scheme signal. Every environment change updates [`mode`](Self::mode)
/// and invokes the change listener. Switching to an explicit request, or
/// dropping the resolver, releases the subscription.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use desktop_theme::{ColorMode, ManualColorScheme, ModeRequest, ModeResolver};
///
/// let scheme = Rc::new(ManualColorScheme::new(ColorMode::Light));
/// let resolver = ModeResolver::new(ModeRequest::Auto, scheme.clone());
/// assert_eq!(resolver.mode(), ColorMode::Light);
///
/// scheme.set(ColorMode::Dark);
/// assert_eq!(resolver.mode(), ColorMode::Dark);
/// ```
pub struct ModeResolver {
    request: ModeRequest,
    signal: Rc<dyn ColorSchemeSignal>,
    current: Rc<Cell<ColorMode>>,
    on_change: Rc<dyn Fn(ColorMode)>,
    subscription: Option<Subscription>,
}

impl ModeResolver {
    /// Creates a resolver without a change listener.
    pub fn new(request: ModeRequest, signal: Rc<dyn ColorSchemeSignal>) -> Self {
        Self::with_listener(request, signal, |_| {})
    }

    /// Creates a resolver that calls `on_change` whenever the environment
    /// changes the effective mode of an `auto` request.
    ///
    /// The listener is never called during construction or from
    /// [`set_request`](Self::set_request).
    pub fn with_listener(
        request: ModeRequest,
        signal: Rc<dyn ColorSchemeSignal>,
        on_change: impl Fn(ColorMode) + 'static,
    ) -> Self {
        let mut resolver = Self {
            request,
            signal,
            current: Rc::new(Cell::new(ColorMode::default())),
            on_change: Rc::new(on_change),
            subscription: None,
        };
        resolver.engage();
        resolver
    }

    /// One-shot resolution without a subscription.
    pub fn resolve(request: ModeRequest, signal: &dyn ColorSchemeSignal) -> ColorMode {
        request
            .explicit()
            .unwrap_or_else(|| environment_mode(signal))
    }

    /// The current effective mode.
    pub fn mode(&self) -> ColorMode {
        self.current.get()
    }

    pub fn request(&self) -> ModeRequest {
        self.request
    }

    /// Whether the resolver currently follows the environment.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Switches to a new request and returns the resulting mode.
    ///
    /// Leaving `auto` releases the environment subscription; entering `auto`
    /// reads the environment and subscribes.
    pub fn set_request(&mut self, request: ModeRequest) -> ColorMode {
        if request != self.request {
            debug!(from = %self.request, to = %request, "mode request changed");
            self.request = request;
            self.engage();
        }
        self.mode()
    }

    fn engage(&mut self) {
        self.subscription = None;

        match self.request.explicit() {
            Some(mode) => self.current.set(mode),
            None => {
                self.current.set(environment_mode(&*self.signal));
                let current = Rc::clone(&self.current);
                let on_change = Rc::clone(&self.on_change);
                self.subscription = Some(self.signal.subscribe(Rc::new(move |mode: ColorMode| {
                    if current.replace(mode) != mode {
                        on_change(mode);
                    }
                })));
            }
        }
    }
}

impl fmt::Debug for ModeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeResolver")
            .field("request", &self.request)
            .field("mode", &self.current.get())
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

fn environment_mode(signal: &dyn ColorSchemeSignal) -> ColorMode {
    signal.current().unwrap_or_else(|| {
        warn!("color scheme signal unavailable, defaulting to light");
        ColorMode::Light
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::signal::ManualColorScheme;

    #[test]
    fn test_mode_request_from_str() {
        assert_eq!("light".parse::<ModeRequest>().unwrap(), ModeRequest::Light);
        assert_eq!("dark".parse::<ModeRequest>().unwrap(), ModeRequest::Dark);
        assert_eq!("auto".parse::<ModeRequest>().unwrap(), ModeRequest::Auto);
        assert_eq!(
            "dim".parse::<ModeRequest>(),
            Err(ThemeError::InvalidMode("dim".to_string()))
        );
    }

    #[test]
    fn test_mode_request_default_is_auto() {
        assert_eq!(ModeRequest::default(), ModeRequest::Auto);
        assert!(ModeRequest::default().is_auto());
    }

    #[test]
    fn test_explicit_request_ignores_environment() {
        let scheme = Rc::new(ManualColorScheme::new(ColorMode::Dark));
        let resolver = ModeResolver::new(ModeRequest::Light, scheme.clone());

        assert_eq!(resolver.mode(), ColorMode::Light);
        assert!(!resolver.is_subscribed());
        assert_eq!(scheme.subscriber_count(), 0);

        scheme.set(ColorMode::Light);
        scheme.set(ColorMode::Dark);
        assert_eq!(resolver.mode(), ColorMode::Light);
    }

    #[test]
    fn test_auto_follows_environment() {
        let scheme = Rc::new(ManualColorScheme::new(ColorMode::Light));
        let seen = Rc::new(Cell::new(None));
        let seen_in_listener = Rc::clone(&seen);
        let resolver = ModeResolver::with_listener(ModeRequest::Auto, scheme.clone(), move |m| {
            seen_in_listener.set(Some(m))
        });

        assert_eq!(resolver.mode(), ColorMode::Light);
        assert_eq!(seen.get(), None);

        scheme.set(ColorMode::Dark);
        assert_eq!(resolver.mode(), ColorMode::Dark);
        assert_eq!(seen.get(), Some(ColorMode::Dark));
    }

    #[test]
    fn test_unavailable_signal_defaults_to_light() {
        let scheme = Rc::new(ManualColorScheme::unavailable());
        let resolver = ModeResolver::new(ModeRequest::Auto, scheme);
        assert_eq!(resolver.mode(), ColorMode::Light);
    }

    #[test]
    fn test_switching_away_from_auto_releases_subscription() {
        let scheme = Rc::new(ManualColorScheme::new(ColorMode::Dark));
        let mut resolver = ModeResolver::new(ModeRequest::Auto, scheme.clone());
        assert_eq!(scheme.subscriber_count(), 1);

        assert_eq!(resolver.set_request(ModeRequest::Light), ColorMode::Light);
        assert_eq!(scheme.subscriber_count(), 0);

        scheme.set(ColorMode::Light);
        scheme.set(ColorMode::Dark);
        assert_eq!(resolver.mode(), ColorMode::Light);

        assert_eq!(resolver.set_request(ModeRequest::Auto), ColorMode::Dark);
        assert_eq!(scheme.subscriber_count(), 1);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let scheme = Rc::new(ManualColorScheme::new(ColorMode::Light));
        let resolver = ModeResolver::new(ModeRequest::Auto, scheme.clone());
        assert_eq!(scheme.subscriber_count(), 1);

        drop(resolver);
        assert_eq!(scheme.subscriber_count(), 0);
    }

    #[test]
    fn test_one_shot_resolve() {
        let scheme = ManualColorScheme::new(ColorMode::Dark);
        assert_eq!(ModeResolver::resolve(ModeRequest::Auto, &scheme), ColorMode::Dark);
        assert_eq!(ModeResolver::resolve(ModeRequest::Light, &scheme), ColorMode::Light);
        assert_eq!(scheme.subscriber_count(), 0);
    }
}
