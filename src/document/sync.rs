//! Synchronization of the resolved theme onto the shared surface.
//!
//! The surface is shared by every root-level theming unit, so writes go
//! through an explicit ownership record, the [`SurfaceMarker`]. Each unit
//! gets an owner slot; applying a theme first removes what that slot wrote
//! before, then writes and records the new class name. Tearing a unit down
//! removes exactly its slot's contribution.
//!
//! Each slot records only the tokens it actually added, so teardown restores
//! the surface as it was: unrelated classes and theme classes that were
//! already present (for example server-rendered) are left alone, and a token
//! is only removed once no other live slot still holds it. With more than one
//! root unit alive the most recent write is the applied class name
//! (last-write-wins).

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use super::surface::Surface;
use super::Document;
use crate::theme::ResolvedTheme;

/// Identifies one owner slot on a document's surface marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

#[derive(Debug)]
struct Slot {
    owner: OwnerId,
    class_name: String,
    // Tokens this slot added to the surface. Tokens that were already
    // present are not recorded and survive teardown.
    written: Vec<String>,
}

impl Slot {
    fn holds(&self, token: &str) -> bool {
        self.class_name.split_whitespace().any(|held| held == token)
    }
}

/// Ownership record for class names written to the shared surface.
#[derive(Debug, Default)]
pub struct SurfaceMarker {
    // Ordered by write time, most recent last.
    slots: Vec<Slot>,
    next_owner: u64,
}

impl SurfaceMarker {
    /// The class name most recently written by any live owner.
    pub fn applied_class_name(&self) -> Option<&str> {
        self.slots.last().map(|slot| slot.class_name.as_str())
    }

    /// The class name recorded for `owner`, if it has written one.
    pub fn owned_by(&self, owner: OwnerId) -> Option<&str> {
        self.slot(owner).map(|slot| slot.class_name.as_str())
    }

    /// Number of owners with a class name on the surface.
    pub fn active_owners(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn register(&mut self) -> OwnerId {
        let owner = OwnerId(self.next_owner);
        self.next_owner += 1;
        owner
    }

    /// Replaces `owner`'s contribution with `class_name`.
    ///
    /// Returns `false` when the owner already holds exactly this class name.
    pub(crate) fn apply(&mut self, surface: &dyn Surface, owner: OwnerId, class_name: &str) -> bool {
        if self.owned_by(owner) == Some(class_name) {
            return false;
        }

        if let Some(previous) = self.take(owner) {
            self.strip(surface, previous);
        }
        let mut written = Vec::new();
        for token in class_name.split_whitespace() {
            if !surface.has_class(token) {
                surface.add_class(token);
                written.push(token.to_string());
            }
        }
        self.slots.push(Slot {
            owner,
            class_name: class_name.to_string(),
            written,
        });
        true
    }

    /// Removes `owner`'s contribution and clears its slot.
    pub(crate) fn release(&mut self, surface: &dyn Surface, owner: OwnerId) -> Option<String> {
        let previous = self.take(owner)?;
        let class_name = previous.class_name.clone();
        self.strip(surface, previous);
        Some(class_name)
    }

    fn slot(&self, owner: OwnerId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.owner == owner)
    }

    fn take(&mut self, owner: OwnerId) -> Option<Slot> {
        let index = self.slots.iter().position(|slot| slot.owner == owner)?;
        Some(self.slots.remove(index))
    }

    /// Removes the tokens `slot` added, unless a live slot still needs one;
    /// that slot then takes over responsibility for removing it.
    fn strip(&mut self, surface: &dyn Surface, slot: Slot) {
        for token in slot.written {
            match self.slots.iter_mut().rev().find(|other| other.holds(&token)) {
                Some(other) => {
                    if !other.written.contains(&token) {
                        other.written.push(token);
                    }
                }
                None => surface.remove_class(&token),
            }
        }
    }
}

/// Per-unit handle that mirrors a theming unit's resolved theme onto the
/// document surface.
///
/// Disabled handles (nested units) never touch the surface. Dropping the
/// handle releases its contribution.
pub struct HtmlSync {
    document: Rc<Document>,
    owner: OwnerId,
    enabled: bool,
}

impl HtmlSync {
    pub fn new(document: &Rc<Document>, is_root: bool) -> Self {
        Self {
            document: Rc::clone(document),
            owner: document.register_owner(),
            enabled: is_root,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Writes the theme's combined class name to the surface.
    pub fn apply(&self, theme: &ResolvedTheme) {
        if !self.enabled {
            trace!(owner = ?self.owner, "nested unit, skipping surface sync");
            return;
        }

        let class_name = theme.class_name();
        let written = self
            .document
            .with_marker(|marker, surface| marker.apply(surface, self.owner, &class_name));
        match written {
            Some(true) => debug!(owner = ?self.owner, %class_name, "applied theme class to surface"),
            Some(false) => trace!(owner = ?self.owner, %class_name, "surface already up to date"),
            None => trace!(owner = ?self.owner, "no surface attached, skipping sync"),
        }
    }

    /// Removes this unit's contribution from the surface.
    pub fn release(&self) {
        if !self.enabled {
            return;
        }

        let released = self
            .document
            .with_marker(|marker, surface| marker.release(surface, self.owner))
            .flatten();
        if let Some(class_name) = released {
            debug!(owner = ?self.owner, %class_name, "released theme class from surface");
        }
    }

    /// The class name this unit currently holds on the surface.
    pub fn applied(&self) -> Option<String> {
        self.document.owned_class_name(self.owner)
    }
}

impl Drop for HtmlSync {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for HtmlSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlSync")
            .field("owner", &self.owner)
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::surface::ClassList;
    use crate::theme::{ColorMode, ThemeName};

    fn theme(name: ThemeName, mode: ColorMode) -> ResolvedTheme {
        ResolvedTheme::new(name, mode, true)
    }

    fn document(initial: &str) -> (Rc<Document>, ClassList) {
        let surface = ClassList::from_class_name(initial);
        (Rc::new(Document::new(surface.clone())), surface)
    }

    #[test]
    fn test_apply_then_release_restores_surface() {
        let (document, surface) = document("app-shell");
        let sync = HtmlSync::new(&document, true);

        sync.apply(&theme(ThemeName::Windows, ColorMode::Dark));
        assert_eq!(surface.class_name(), "app-shell theme-windows theme-windows-dark");
        assert_eq!(
            document.applied_class_name().as_deref(),
            Some("theme-windows theme-windows-dark")
        );

        drop(sync);
        assert_eq!(surface.class_name(), "app-shell");
        assert_eq!(document.applied_class_name(), None);
    }

    #[test]
    fn test_switch_replaces_previous_class() {
        let (document, surface) = document("app-shell");
        let sync = HtmlSync::new(&document, true);

        sync.apply(&theme(ThemeName::Windows, ColorMode::Light));
        sync.apply(&theme(ThemeName::Macos, ColorMode::Dark));

        assert_eq!(surface.class_name(), "app-shell theme-macos theme-macos-dark");
        assert_eq!(sync.applied().as_deref(), Some("theme-macos theme-macos-dark"));
    }

    #[test]
    fn test_disabled_sync_is_noop() {
        let (document, surface) = document("app-shell");
        let sync = HtmlSync::new(&document, false);

        sync.apply(&theme(ThemeName::Windows, ColorMode::Dark));
        assert_eq!(surface.class_name(), "app-shell");
        assert_eq!(sync.applied(), None);
    }

    #[test]
    fn test_detached_document_is_noop() {
        let document = Rc::new(Document::detached());
        let sync = HtmlSync::new(&document, true);

        sync.apply(&theme(ThemeName::Windows, ColorMode::Dark));
        assert_eq!(document.applied_class_name(), None);
        sync.release();
    }

    #[test]
    fn test_two_roots_last_write_wins() {
        let (document, surface) = document("app-shell");
        let first = HtmlSync::new(&document, true);
        let second = HtmlSync::new(&document, true);

        first.apply(&theme(ThemeName::Windows, ColorMode::Light));
        second.apply(&theme(ThemeName::Macos, ColorMode::Dark));
        assert_eq!(
            document.applied_class_name().as_deref(),
            Some("theme-macos theme-macos-dark")
        );

        drop(first);
        assert_eq!(surface.class_name(), "app-shell theme-macos theme-macos-dark");

        drop(second);
        assert_eq!(surface.class_name(), "app-shell");
    }

    #[test]
    fn test_release_keeps_tokens_held_by_other_owner() {
        let (document, surface) = document("");
        let first = HtmlSync::new(&document, true);
        let second = HtmlSync::new(&document, true);

        first.apply(&theme(ThemeName::Windows, ColorMode::Light));
        second.apply(&theme(ThemeName::Windows, ColorMode::Dark));

        drop(second);
        assert_eq!(surface.class_name(), "theme-windows theme-windows-light");
        assert_eq!(
            document.applied_class_name().as_deref(),
            Some("theme-windows theme-windows-light")
        );
    }

    #[test]
    fn test_release_keeps_preexisting_theme_classes() {
        let (document, surface) = document("app-shell theme-windows theme-windows-dark");
        let sync = HtmlSync::new(&document, true);

        sync.apply(&theme(ThemeName::Windows, ColorMode::Dark));
        assert_eq!(surface.class_name(), "app-shell theme-windows theme-windows-dark");

        drop(sync);
        assert_eq!(surface.class_name(), "app-shell theme-windows theme-windows-dark");
    }

    #[test]
    fn test_switch_from_preexisting_variant_keeps_it() {
        let (document, surface) = document("theme-windows theme-windows-light");
        let sync = HtmlSync::new(&document, true);

        sync.apply(&theme(ThemeName::Windows, ColorMode::Light));
        sync.apply(&theme(ThemeName::Windows, ColorMode::Dark));
        assert!(surface.has_class("theme-windows-dark"));

        drop(sync);
        assert_eq!(surface.class_name(), "theme-windows theme-windows-light");
    }

    #[test]
    fn test_shared_token_handed_over_to_remaining_owner() {
        let (document, surface) = document("app-shell");
        let first = HtmlSync::new(&document, true);
        let second = HtmlSync::new(&document, true);

        first.apply(&theme(ThemeName::Windows, ColorMode::Light));
        second.apply(&theme(ThemeName::Windows, ColorMode::Dark));

        drop(first);
        assert_eq!(surface.class_name(), "app-shell theme-windows theme-windows-dark");

        drop(second);
        assert_eq!(surface.class_name(), "app-shell");
    }

    #[test]
    fn test_reapplying_same_theme_is_unchanged() {
        let (document, surface) = document("app-shell");
        let sync = HtmlSync::new(&document, true);
        let dark = theme(ThemeName::Windows, ColorMode::Dark);

        sync.apply(&dark);
        sync.apply(&dark);
        assert_eq!(surface.class_name(), "app-shell theme-windows theme-windows-dark");
    }
}
