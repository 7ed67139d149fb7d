//! The shared presentation surface whose class list global style rules key off.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A class list on the top-level presentation element.
///
/// Hosts implement this for their real document root. Methods take `&self`
/// because the element is shared; implementations use interior mutability.
pub trait Surface {
    /// Adds a single class token. Adding a present token is a no-op.
    fn add_class(&self, class: &str);

    /// Removes a single class token. Removing an absent token is a no-op.
    fn remove_class(&self, class: &str);

    /// Whether the token is present.
    fn has_class(&self, class: &str) -> bool;

    /// The space-separated class attribute.
    fn class_name(&self) -> String;
}

/// In-memory ordered class set.
///
/// Clones share the same list, so a host or test can keep a handle while a
/// [`Document`](super::Document) writes to it.
///
/// ```rust
/// use desktop_theme::{ClassList, Surface};
///
/// let list = ClassList::from_class_name("app-shell");
/// list.add_class("theme-windows");
/// assert_eq!(list.class_name(), "app-shell theme-windows");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: Rc<RefCell<Vec<String>>>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a class attribute, dropping duplicate tokens.
    pub fn from_class_name(class_name: &str) -> Self {
        let list = Self::new();
        for token in class_name.split_whitespace() {
            list.add_class(token);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.classes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.borrow().is_empty()
    }
}

impl Surface for ClassList {
    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.classes.borrow_mut().push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().retain(|existing| existing != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().iter().any(|existing| existing == class)
    }

    fn class_name(&self) -> String {
        self.classes.borrow().join(" ")
    }
}

impl fmt::Debug for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassList").field(&self.class_name()).finish()
    }
}
