//! # Desktop Theme - Runtime Theme Resolution
//!
//! `desktop-theme` resolves a requested theme and light/dark mode into
//! concrete class names, publishes the result to descendant components
//! through a scoped context, and keeps a class marker on the document's root
//! element in sync so global style rules pick up the active theme too.
//!
//! ## Core Concepts
//!
//! - [`ThemeProvider`]: one theming unit, the single entry point
//! - [`ThemeRequest`]: theme name, mode and flags a provider is mounted with
//! - [`ModeRequest`] / [`ColorMode`]: requested vs. effective light/dark mode
//! - [`ResolvedTheme`]: immutable class names and tokens for a variant
//! - [`Document`]: the shared root surface, color-scheme signal and global
//!   styles all providers in one document use
//! - [`use_theme`]: reads the innermost published theme
//!
//! ## Root and nested providers
//!
//! The outermost provider is the root: it writes its class name onto the
//! document surface. A provider mounted while another provider renders its
//! children, or one mounted with `local`, is nested: it leaves the surface
//! alone and wraps its children in an element carrying its class name.
//!
//! ```rust
//! use std::rc::Rc;
//! use desktop_theme::{
//!     use_theme, ClassList, ColorMode, Document, ManualColorScheme, Surface, ThemeProvider,
//!     ThemeRequest,
//! };
//!
//! let surface = ClassList::from_class_name("app-shell");
//! let scheme = Rc::new(ManualColorScheme::new(ColorMode::Dark));
//! let document = Rc::new(Document::new(surface.clone()).with_color_scheme(scheme));
//!
//! let root = ThemeProvider::mount(&document, ThemeRequest::new("windows")).unwrap();
//! assert_eq!(surface.class_name(), "app-shell theme-windows theme-windows-dark");
//!
//! let rendered = root.render(|| {
//!     let child = ThemeProvider::mount(
//!         &document,
//!         ThemeRequest::new("macos").mode(ColorMode::Light),
//!     )
//!     .unwrap();
//!     assert!(!child.is_root());
//!     child.render(|| use_theme().unwrap().class_name())
//! });
//!
//! let nested = rendered.output;
//! assert_eq!(nested.output, "theme-macos theme-macos-light");
//! assert_eq!(
//!     nested.wrapper.unwrap().class_name(),
//!     "theme-macos theme-macos-light"
//! );
//! // The nested provider never touched the surface.
//! assert_eq!(surface.class_name(), "app-shell theme-windows theme-windows-dark");
//! ```
//!
//! ## Following the environment
//!
//! With the default `auto` mode a provider follows the document's
//! [`ColorSchemeSignal`]. Every change re-resolves the theme and updates the
//! surface without a new request. Explicit `light`/`dark` requests never
//! subscribe.
//!
//! ## Errors
//!
//! An unknown theme name fails with [`ThemeError::UnknownTheme`]; there is no
//! fallback theme. An unavailable color-scheme signal resolves to light, and
//! a document without a surface simply skips class synchronization.

mod document;
mod error;
mod markup;
mod provider;
pub mod scope;
pub mod theme;

pub use error::ThemeError;

pub use document::{ClassList, Document, HtmlSync, OwnerId, StyleInjector, Surface, SurfaceMarker};
pub use markup::Wrapper;
pub use provider::{Rendered, ThemeProvider, ThemeRequest};
pub use scope::{use_theme, use_theme_tokens, ScopeState};
pub use theme::{
    detect_color_mode, reset_color_scheme_detector, resolve_theme, set_color_scheme_detector,
    ColorMode, ColorSchemeSignal, ManualColorScheme, ModeRequest, ModeResolver, ResolvedTheme,
    Subscription, SystemColorScheme, ThemeName, ThemeTokens,
};
