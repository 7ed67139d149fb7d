//! The document a set of theming units render into.
//!
//! A [`Document`] bundles the state theming units share:
//!
//! - the optional [`Surface`] (the top-level element's class list) and its
//!   [`SurfaceMarker`] ownership record
//! - the [`ColorSchemeSignal`] that `auto` providers follow
//! - the one-time global stylesheet injection
//!
//! ```rust
//! use std::rc::Rc;
//! use desktop_theme::{ClassList, ColorMode, Document, ManualColorScheme};
//!
//! let surface = ClassList::from_class_name("app-shell");
//! let document = Rc::new(
//!     Document::new(surface.clone())
//!         .with_color_scheme(Rc::new(ManualColorScheme::new(ColorMode::Dark))),
//! );
//! assert_eq!(document.surface_class_name().as_deref(), Some("app-shell"));
//! ```

mod surface;
mod sync;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use tracing::{debug, trace};

use crate::error::ThemeError;
use crate::markup;
use crate::theme::{ColorMode, ColorSchemeSignal, SystemColorScheme};

pub use surface::{ClassList, Surface};
pub use sync::{HtmlSync, OwnerId, SurfaceMarker};

/// Callback receiving the global stylesheet when it is injected.
pub type StyleInjector = Box<dyn Fn(&str)>;

/// Shared state for all theming units rendering into one document.
pub struct Document {
    surface: Option<Rc<dyn Surface>>,
    marker: RefCell<SurfaceMarker>,
    color_scheme: OnceCell<Rc<dyn ColorSchemeSignal>>,
    style_injector: Option<StyleInjector>,
    global_stylesheet: OnceCell<String>,
}

impl Document {
    /// Creates a document whose root element is `surface`.
    ///
    /// Until [`with_color_scheme`](Self::with_color_scheme) is used, `auto`
    /// providers follow the OS preference through [`SystemColorScheme`],
    /// sampled on each [`refresh_color_scheme`](Self::refresh_color_scheme).
    pub fn new(surface: impl Surface + 'static) -> Self {
        Self {
            surface: Some(Rc::new(surface)),
            ..Self::detached()
        }
    }

    /// Creates a document without a reachable surface.
    ///
    /// Surface synchronization becomes a no-op; context publishing and
    /// nested wrappers still work.
    pub fn detached() -> Self {
        Self {
            surface: None,
            marker: RefCell::new(SurfaceMarker::default()),
            color_scheme: OnceCell::new(),
            style_injector: None,
            global_stylesheet: OnceCell::new(),
        }
    }

    /// Uses `signal` as the environment color-scheme source.
    pub fn with_color_scheme(mut self, signal: Rc<dyn ColorSchemeSignal>) -> Self {
        self.color_scheme = OnceCell::with_value(signal);
        self
    }

    /// Hands the global stylesheet to `injector` instead of keeping it on
    /// the document.
    pub fn with_style_injector(mut self, injector: impl Fn(&str) + 'static) -> Self {
        self.style_injector = Some(Box::new(injector));
        self
    }

    /// The environment color-scheme source.
    pub fn color_scheme(&self) -> Rc<dyn ColorSchemeSignal> {
        let signal = self.color_scheme.get_or_init(|| {
            debug!("no color scheme configured, following the OS preference");
            let system: Rc<dyn ColorSchemeSignal> = Rc::new(SystemColorScheme::new());
            system
        });
        Rc::clone(signal)
    }

    /// Re-samples the environment color scheme.
    ///
    /// Hosts call this from their event loop (for example on a window
    /// theme-changed event); `auto` providers re-resolve when the preference
    /// changed. Returns the current preference.
    pub fn refresh_color_scheme(&self) -> Option<ColorMode> {
        self.color_scheme().refresh()
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// The surface's current class attribute.
    pub fn surface_class_name(&self) -> Option<String> {
        self.surface.as_ref().map(|surface| surface.class_name())
    }

    /// The class name most recently applied by a root unit.
    pub fn applied_class_name(&self) -> Option<String> {
        self.marker
            .borrow()
            .applied_class_name()
            .map(str::to_string)
    }

    /// Injects the global stylesheet once per document.
    ///
    /// Returns `true` if this call performed the injection and `false` if
    /// it had already happened.
    pub fn inject_global_styles(&self) -> Result<bool, ThemeError> {
        if self.global_stylesheet.get().is_some() {
            trace!("global styles already injected");
            return Ok(false);
        }

        let stylesheet = self
            .global_stylesheet
            .get_or_try_init(markup::global_stylesheet)?;
        if let Some(inject) = &self.style_injector {
            inject(stylesheet);
        }
        debug!(bytes = stylesheet.len(), "injected global styles");
        Ok(true)
    }

    /// The injected global stylesheet, if injection has happened.
    pub fn global_stylesheet(&self) -> Option<&str> {
        self.global_stylesheet.get().map(String::as_str)
    }

    pub(crate) fn register_owner(&self) -> OwnerId {
        self.marker.borrow_mut().register()
    }

    pub(crate) fn owned_class_name(&self, owner: OwnerId) -> Option<String> {
        self.marker.borrow().owned_by(owner).map(str::to_string)
    }

    /// Runs `f` against the marker and surface; `None` without a surface.
    pub(crate) fn with_marker<R>(
        &self,
        f: impl FnOnce(&mut SurfaceMarker, &dyn Surface) -> R,
    ) -> Option<R> {
        let surface = self.surface.as_deref()?;
        let mut marker = self.marker.borrow_mut();
        Some(f(&mut *marker, surface))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("surface", &self.surface_class_name())
            .field("marker", &self.marker.borrow())
            .field("global_styles_injected", &self.global_stylesheet.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_global_styles_injected_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let document =
            Document::detached().with_style_injector(move |_| counter.set(counter.get() + 1));

        assert!(document.inject_global_styles().unwrap());
        assert!(!document.inject_global_styles().unwrap());
        assert_eq!(calls.get(), 1);
        assert!(document.global_stylesheet().is_some());
    }

    #[test]
    fn test_detached_document_has_no_surface() {
        let document = Document::detached();
        assert!(!document.has_surface());
        assert_eq!(document.surface_class_name(), None);
        assert_eq!(document.with_marker(|_, _| ()), None);
    }

    #[test]
    fn test_configured_color_scheme_is_shared() {
        use crate::theme::ManualColorScheme;

        let scheme = Rc::new(ManualColorScheme::new(ColorMode::Dark));
        let document = Document::detached().with_color_scheme(scheme.clone());
        assert_eq!(document.color_scheme().current(), Some(ColorMode::Dark));

        scheme.set(ColorMode::Light);
        assert_eq!(document.color_scheme().current(), Some(ColorMode::Light));
    }
}
