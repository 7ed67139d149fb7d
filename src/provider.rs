//! The theme provider: the single entry point that composes mode resolution,
//! theme resolution, root/nested detection, surface synchronization and
//! context publishing.
//!
//! ## Mount sequence
//!
//! 1. Parse the theme name; an unknown name fails before anything is
//!    subscribed or written.
//! 2. Resolve the mode, subscribing to the document's color-scheme signal
//!    when the request is `auto`.
//! 3. Resolve the theme.
//! 4. Capture root/nested status from the context stack.
//! 5. Root units write their class name to the document surface; nested
//!    units render a [`Wrapper`] instead.
//! 6. Inject the global stylesheet if requested (once per document).
//!
//! [`ThemeProvider::render`] publishes the resolved theme to descendants.
//! Dropping the provider releases the subscription and removes its class
//! name from the surface before returning.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::document::{Document, HtmlSync};
use crate::error::ThemeError;
use crate::markup::Wrapper;
use crate::scope::{self, ScopeState};
use crate::theme::{ColorMode, ModeRequest, ModeResolver, ResolvedTheme, ThemeName};

/// Configuration for one theming unit.
///
/// Deserializes from camelCase keys; only `theme` is required.
///
/// ```rust
/// use desktop_theme::{ModeRequest, ThemeRequest};
///
/// let request: ThemeRequest = serde_json::from_str(r#"{ "theme": "windows" }"#).unwrap();
/// assert_eq!(request.mode, ModeRequest::Auto);
/// assert!(request.enable_window_blur);
/// assert!(!request.with_global_styles);
/// assert!(!request.local);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRequest {
    /// Theme family name, validated on mount.
    pub theme: String,
    #[serde(default)]
    pub mode: ModeRequest,
    #[serde(default = "enabled")]
    pub enable_window_blur: bool,
    #[serde(default)]
    pub with_global_styles: bool,
    /// Forces nested behavior regardless of ancestors.
    #[serde(default)]
    pub local: bool,
}

fn enabled() -> bool {
    true
}

impl ThemeRequest {
    /// A request for `theme` with every option at its default.
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            mode: ModeRequest::default(),
            enable_window_blur: true,
            with_global_styles: false,
            local: false,
        }
    }

    pub fn mode(mut self, mode: impl Into<ModeRequest>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn window_blur(mut self, enabled: bool) -> Self {
        self.enable_window_blur = enabled;
        self
    }

    pub fn global_styles(mut self, enabled: bool) -> Self {
        self.with_global_styles = enabled;
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }
}

/// Output of [`ThemeProvider::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<R> {
    /// Whatever the children produced.
    pub output: R,
    /// The element to wrap `output` in; `None` for root units.
    pub wrapper: Option<Wrapper>,
    /// The theme published while the children rendered.
    pub theme: ResolvedTheme,
}

impl Rendered<String> {
    /// Wraps the rendered markup in the nested wrapper, if there is one.
    pub fn into_html(self) -> Result<String, ThemeError> {
        match self.wrapper {
            Some(wrapper) => wrapper.to_html(&self.output),
            None => Ok(self.output),
        }
    }
}

struct Inner {
    document: Rc<Document>,
    request: ThemeRequest,
    theme_name: ThemeName,
    resolver: ModeResolver,
    theme: ResolvedTheme,
    sync: HtmlSync,
}

impl Inner {
    /// Re-resolves against the current mode; writes to the surface only
    /// when the theme changed.
    fn refresh(&mut self) -> bool {
        let next = ResolvedTheme::new(
            self.theme_name,
            self.resolver.mode(),
            self.request.enable_window_blur,
        );
        if next == self.theme {
            return false;
        }

        debug!(from = %self.theme.class_name(), to = %next.class_name(), "theme changed");
        self.theme = next;
        self.sync.apply(&self.theme);
        true
    }
}

// State reachable from the environment listener. `pending` lives outside
// the `RefCell` so a change that arrives while `inner` is borrowed can be
// recorded and applied once the borrow ends.
struct Shared {
    inner: RefCell<Inner>,
    pending: Cell<bool>,
}

impl Shared {
    /// Applies environment changes recorded while `inner` was busy.
    fn settle(&self) {
        while self.pending.take() {
            match self.inner.try_borrow_mut() {
                Ok(mut inner) => {
                    inner.refresh();
                }
                Err(_) => {
                    trace!("provider still busy, refresh stays pending");
                    self.pending.set(true);
                    return;
                }
            }
        }
    }
}

/// One theming unit.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use desktop_theme::{
///     ClassList, ColorMode, Document, ManualColorScheme, Surface, ThemeProvider, ThemeRequest,
/// };
///
/// let surface = ClassList::from_class_name("app-shell");
/// let scheme = Rc::new(ManualColorScheme::new(ColorMode::Light));
/// let document = Rc::new(Document::new(surface.clone()).with_color_scheme(scheme.clone()));
///
/// let provider = ThemeProvider::mount(&document, ThemeRequest::new("windows")).unwrap();
/// assert_eq!(surface.class_name(), "app-shell theme-windows theme-windows-light");
///
/// scheme.set(ColorMode::Dark);
/// assert_eq!(surface.class_name(), "app-shell theme-windows theme-windows-dark");
///
/// provider.unmount();
/// assert_eq!(surface.class_name(), "app-shell");
/// ```
pub struct ThemeProvider {
    shared: Rc<Shared>,
    scope: ScopeState,
}

impl ThemeProvider {
    /// Mounts a theming unit into `document`.
    ///
    /// A provider mounted while another provider is rendering its children
    /// is nested; otherwise it is the root unless `request.local` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownTheme`] if the theme name is not known.
    /// Nothing is subscribed or written in that case.
    pub fn mount(document: &Rc<Document>, request: ThemeRequest) -> Result<Self, ThemeError> {
        let theme_name: ThemeName = request.theme.parse()?;
        let with_global_styles = request.with_global_styles;
        let signal = document.color_scheme();
        let scope = ScopeState::capture(request.local);

        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let weak = weak.clone();
            let resolver = ModeResolver::with_listener(request.mode, signal, move |mode| {
                on_environment_change(&weak, mode)
            });
            let theme =
                ResolvedTheme::new(theme_name, resolver.mode(), request.enable_window_blur);
            let sync = HtmlSync::new(document, scope.is_root());

            Shared {
                inner: RefCell::new(Inner {
                    document: Rc::clone(document),
                    request,
                    theme_name,
                    resolver,
                    theme,
                    sync,
                }),
                pending: Cell::new(false),
            }
        });

        {
            let inner = shared.inner.borrow();
            debug!(
                theme = %inner.theme.class_name(),
                mode_request = %inner.request.mode,
                root = scope.is_root(),
                "mounted theme provider"
            );
            inner.sync.apply(&inner.theme);
        }
        shared.settle();

        let provider = Self { shared, scope };
        if with_global_styles {
            document.inject_global_styles()?;
        }
        Ok(provider)
    }

    /// Replaces the request.
    ///
    /// The new request takes effect as a whole: an unknown theme name
    /// leaves the provider unchanged. Root/nested status is fixed at mount,
    /// so a changed `local` flag has no effect.
    pub fn update(&mut self, request: ThemeRequest) -> Result<(), ThemeError> {
        let theme_name: ThemeName = request.theme.parse()?;
        let with_global_styles = request.with_global_styles;

        let document = {
            let mut inner = self.shared.inner.borrow_mut();
            if request.local != inner.request.local {
                debug!(local = request.local, "locality is fixed at mount, ignoring change");
            }
            inner.resolver.set_request(request.mode);
            inner.theme_name = theme_name;
            inner.request = request;
            inner.refresh();
            Rc::clone(&inner.document)
        };
        self.shared.settle();

        if with_global_styles {
            document.inject_global_styles()?;
        }
        Ok(())
    }

    /// Renders `children` with this provider's theme published as the
    /// innermost context.
    pub fn render<R>(&self, children: impl FnOnce() -> R) -> Rendered<R> {
        let theme = self.resolved();
        let wrapper = self
            .scope
            .is_nested()
            .then(|| Wrapper::new(theme.class_name()));
        let output = scope::provide(theme.clone(), children);

        Rendered {
            output,
            wrapper,
            theme,
        }
    }

    /// The currently resolved theme.
    pub fn resolved(&self) -> ResolvedTheme {
        self.catch_up();
        self.shared.inner.borrow().theme.clone()
    }

    /// The current effective mode.
    pub fn mode(&self) -> ColorMode {
        self.shared.inner.borrow().resolver.mode()
    }

    pub fn request(&self) -> ThemeRequest {
        self.shared.inner.borrow().request.clone()
    }

    pub fn scope(&self) -> ScopeState {
        self.scope
    }

    pub fn is_root(&self) -> bool {
        self.scope.is_root()
    }

    /// The wrapper nested units render; `None` for the root unit.
    pub fn wrapper(&self) -> Option<Wrapper> {
        self.scope
            .is_nested()
            .then(|| Wrapper::new(self.resolved().class_name()))
    }

    /// Whether the provider is following the environment color scheme.
    pub fn follows_environment(&self) -> bool {
        self.shared.inner.borrow().resolver.is_subscribed()
    }

    /// Tears the unit down: releases the environment subscription and
    /// removes its class name from the surface.
    pub fn unmount(self) {
        drop(self);
    }

    // Environment changes that arrived while the provider was borrowed from
    // outside (for example during a render) are picked up here.
    fn catch_up(&self) {
        self.shared.pending.set(true);
        self.shared.settle();
    }
}

impl Drop for ThemeProvider {
    fn drop(&mut self) {
        debug!(root = self.scope.is_root(), "unmounting theme provider");
    }
}

impl fmt::Debug for ThemeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ThemeProvider");
        debug.field("scope", &self.scope);
        if let Ok(inner) = self.shared.inner.try_borrow() {
            debug
                .field("request", &inner.request)
                .field("theme", &inner.theme.class_name());
        }
        debug.finish()
    }
}

fn on_environment_change(shared: &Weak<Shared>, mode: ColorMode) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    debug!(%mode, "environment color scheme changed");
    shared.pending.set(true);
    shared.settle();
}
