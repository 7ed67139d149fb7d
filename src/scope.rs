//! Scoped theme context and root/nested detection.
//!
//! While a [`ThemeProvider`](crate::ThemeProvider) renders its children it
//! publishes its [`ResolvedTheme`] on a per-thread context stack. Descendants
//! read the innermost theme with [`use_theme`], and a provider mounted during
//! that render sees the ancestor and becomes nested.
//!
//! The root/nested decision is captured once in a [`ScopeState`] when a
//! provider mounts. It is never re-evaluated: moving a provider under or out
//! of another provider requires remounting it.

use std::cell::RefCell;

use crate::theme::{ResolvedTheme, ThemeTokens};

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<ResolvedTheme>> = const { RefCell::new(Vec::new()) };
}

/// Whether a theming unit owns the shared document surface.
///
/// A unit is nested if an ancestor theming context exists or it was forced
/// local; otherwise it is the root.
pub fn is_root(has_ancestor_context: bool, force_local: bool) -> bool {
    !(has_ancestor_context || force_local)
}

/// Whether a theme context is currently published on this thread.
pub fn has_ancestor_context() -> bool {
    CONTEXT_STACK.with(|stack| !stack.borrow().is_empty())
}

/// Number of theme contexts currently published on this thread.
pub fn depth() -> usize {
    CONTEXT_STACK.with(|stack| stack.borrow().len())
}

/// Returns the innermost published theme, if any.
///
/// ```rust
/// use std::rc::Rc;
/// use desktop_theme::{
///     use_theme, ClassList, ColorMode, Document, ManualColorScheme, ThemeProvider, ThemeRequest,
/// };
///
/// let scheme = Rc::new(ManualColorScheme::new(ColorMode::Dark));
/// let document = Rc::new(Document::new(ClassList::new()).with_color_scheme(scheme));
/// let request = ThemeRequest::new("macos");
/// let provider = ThemeProvider::mount(&document, request).unwrap();
///
/// assert!(use_theme().is_none());
/// let rendered = provider.render(|| use_theme().map(|theme| theme.class_name()));
/// assert_eq!(rendered.output.as_deref(), Some("theme-macos theme-macos-dark"));
/// ```
pub fn use_theme() -> Option<ResolvedTheme> {
    CONTEXT_STACK.with(|stack| stack.borrow().last().cloned())
}

/// Returns the token handle of the innermost published theme.
pub fn use_theme_tokens() -> Option<ThemeTokens> {
    use_theme().map(|theme| theme.tokens().clone())
}

/// Root/nested status of one theming unit, fixed at mount time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeState {
    is_root: bool,
}

impl ScopeState {
    /// Captures the status from the context stack as it is right now.
    pub fn capture(force_local: bool) -> Self {
        Self {
            is_root: is_root(has_ancestor_context(), force_local),
        }
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn is_nested(&self) -> bool {
        !self.is_root
    }
}

/// Runs `children` with `theme` published as the innermost context.
///
/// The context is popped when `children` returns or unwinds.
pub(crate) fn provide<R>(theme: ResolvedTheme, children: impl FnOnce() -> R) -> R {
    struct Pop;

    impl Drop for Pop {
        fn drop(&mut self) {
            CONTEXT_STACK.with(|stack| {
                stack.borrow_mut().pop();
            });
        }
    }

    CONTEXT_STACK.with(|stack| stack.borrow_mut().push(theme));
    let _pop = Pop;
    children()
}
