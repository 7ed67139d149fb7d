//! Environment color-scheme signals.
//!
//! A [`ColorSchemeSignal`] reports the environment's preferred color mode and
//! notifies subscribers when it changes. Two implementations ship with the
//! crate:
//!
//! - [`SystemColorScheme`]: asks the operating system (see
//!   [`detect_color_mode`](super::detect_color_mode)); the host calls
//!   [`ColorSchemeSignal::refresh`] (or `Document::refresh_color_scheme`)
//!   from its event loop to pick up changes.
//! - [`ManualColorScheme`]: a settable signal for hosts that receive
//!   color-scheme events themselves, and for tests.
//!
//! Subscriptions are owned handles: dropping a [`Subscription`] unregisters
//! its listener.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::detect::detect_color_mode;
use super::mode::ColorMode;

/// Callback invoked with the new mode on every environment change.
pub type Listener = Rc<dyn Fn(ColorMode)>;

/// Source of the environment's light/dark preference.
pub trait ColorSchemeSignal {
    /// The current preference, or `None` when the environment cannot tell.
    fn current(&self) -> Option<ColorMode>;

    /// Registers `listener` until the returned handle is dropped.
    ///
    /// Implementations must not invoke the listener from within `subscribe`.
    fn subscribe(&self, listener: Listener) -> Subscription;

    /// Re-samples the environment, notifying subscribers if the preference
    /// changed, and returns the current preference.
    ///
    /// Push-based signals have nothing to poll and keep the default.
    fn refresh(&self) -> Option<ColorMode> {
        self.current()
    }
}

/// Listener registry shared by signal implementations.
#[derive(Default)]
pub struct Listeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Listener)>>,
}

impl Listeners {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Adds a listener and returns the handle that keeps it registered.
    pub fn subscribe(self: &Rc<Self>, listener: Listener) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, listener));
        trace!(id, "color scheme listener registered");
        Subscription {
            id,
            registry: Rc::downgrade(self),
        }
    }

    /// Calls every registered listener with `mode`.
    ///
    /// Listeners may subscribe or unsubscribe while being notified. A
    /// listener removed during the pass is not called afterwards.
    pub fn notify(&self, mode: ColorMode) {
        let snapshot: Vec<(u64, Listener)> = self
            .entries
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if self.contains(id) {
                listener(mode);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn contains(&self, id: u64) -> bool {
        self.entries.borrow().iter().any(|(entry, _)| *entry == id)
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(entry, _)| *entry != id);
        trace!(id, "color scheme listener released");
    }
}

/// Owned registration of a listener on a [`ColorSchemeSignal`].
///
/// Dropping the handle unsubscribes. The handle does not keep the signal
/// alive.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Listeners>,
}

impl Subscription {
    /// Whether the listener is still registered with a live signal.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// A color-scheme signal whose value is set by the host.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use desktop_theme::{ColorMode, ColorSchemeSignal, ManualColorScheme};
///
/// let scheme = ManualColorScheme::new(ColorMode::Light);
/// let seen = Rc::new(std::cell::Cell::new(None));
/// let sink = seen.clone();
/// let _subscription = scheme.subscribe(Rc::new(move |mode: ColorMode| sink.set(Some(mode))));
///
/// scheme.set(ColorMode::Dark);
/// assert_eq!(seen.get(), Some(ColorMode::Dark));
/// ```
pub struct ManualColorScheme {
    mode: Cell<Option<ColorMode>>,
    listeners: Rc<Listeners>,
}

impl ManualColorScheme {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            mode: Cell::new(Some(mode)),
            listeners: Listeners::new(),
        }
    }

    /// A signal that cannot report a preference until [`set`](Self::set) is called.
    pub fn unavailable() -> Self {
        Self {
            mode: Cell::new(None),
            listeners: Listeners::new(),
        }
    }

    /// Updates the preference, notifying subscribers if it changed.
    pub fn set(&self, mode: ColorMode) {
        if self.mode.replace(Some(mode)) != Some(mode) {
            debug!(%mode, "color scheme changed");
            self.listeners.notify(mode);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ColorSchemeSignal for ManualColorScheme {
    fn current(&self) -> Option<ColorMode> {
        self.mode.get()
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.subscribe(listener)
    }
}

/// The operating system's color-scheme preference.
///
/// The value is sampled at construction and on every
/// [`refresh`](Self::refresh).
pub struct SystemColorScheme {
    last: Cell<Option<ColorMode>>,
    listeners: Rc<Listeners>,
}

impl SystemColorScheme {
    pub fn new() -> Self {
        Self {
            last: Cell::new(detect_color_mode()),
            listeners: Listeners::new(),
        }
    }

    /// Re-detects the OS preference and notifies subscribers when it changed.
    ///
    /// A detection failure keeps the last known preference.
    pub fn refresh(&self) -> Option<ColorMode> {
        let Some(detected) = detect_color_mode() else {
            trace!("color scheme detection unavailable, keeping last value");
            return self.last.get();
        };
        if self.last.replace(Some(detected)) != Some(detected) {
            debug!(mode = %detected, "system color scheme changed");
            self.listeners.notify(detected);
        }
        Some(detected)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for SystemColorScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSchemeSignal for SystemColorScheme {
    fn current(&self) -> Option<ColorMode> {
        self.last.get()
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    fn refresh(&self) -> Option<ColorMode> {
        SystemColorScheme::refresh(self)
    }
}
