// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Actions and flat menus.
//!
//! ## Overview
//!
//! An [`Action`] is an immutable description of one selectable entry: a title, an optional
//! [`Icon`], a set of [`ActionAttributes`], and a handler invoked when the user selects it.
//! A [`Menu`] is an ordered list of actions. Insertion order is display order.
//!
//! Menus are single depth. [`Menu`] stores actions in a plain list and [`Action`] has no
//! children, so a nested menu cannot be expressed.
//!
//! ## Attributes
//!
//! - [`ActionAttributes::DISABLED`]: the handler is never invoked; toolkits render the entry muted.
//! - [`ActionAttributes::HIDDEN`]: the entry stays in the model but is not rendered or selectable.
//! - [`ActionAttributes::DESTRUCTIVE`]: presentation hint only.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_context_menu::action::{Action, ActionAttributes, Menu};
//!
//! let copies = Rc::new(Cell::new(0));
//! let counter = copies.clone();
//! let menu: Menu = [
//!     Action::new("Copy", move |_| counter.set(counter.get() + 1)),
//!     Action::new("Delete", |_| {}).with_attributes(ActionAttributes::DESTRUCTIVE),
//!     Action::new("Forward", |_| {}).with_attributes(ActionAttributes::DISABLED),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert!(menu.get(0).unwrap().perform());
//! assert!(!menu.get(2).unwrap().perform());
//! assert_eq!(copies.get(), 1);
//! ```

use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use bitflags::bitflags;

bitflags! {
    /// Behavior and presentation flags of an [`Action`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ActionAttributes: u8 {
        /// The action cannot be selected.
        const DISABLED    = 0b0000_0001;
        /// The action destroys data; rendered with emphasis.
        const DESTRUCTIVE = 0b0000_0010;
        /// The action is kept in the model but not shown.
        const HIDDEN      = 0b0000_0100;
    }
}

/// Named image shown next to an action's title.
///
/// The name is resolved by the toolkit (for example a symbol or asset name).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Icon(Arc<str>);

impl Icon {
    /// Create an icon handle from a name.
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The name of the image to render.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Icon {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Callback run when an [`Action`] is selected.
pub type ActionHandler = Rc<dyn Fn(&Action)>;

/// A single selectable menu entry.
///
/// Cloning is cheap and shares the handler.
#[derive(Clone)]
pub struct Action {
    title: Arc<str>,
    image: Option<Icon>,
    attributes: ActionAttributes,
    handler: ActionHandler,
}

impl core::fmt::Debug for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Action")
            .field("title", &self.title)
            .field("image", &self.image)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl Action {
    /// Create an enabled action with no image.
    pub fn new(title: &str, handler: impl Fn(&Self) + 'static) -> Self {
        Self {
            title: Arc::from(title),
            image: None,
            attributes: ActionAttributes::empty(),
            handler: Rc::new(handler),
        }
    }

    /// Attach an image.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<Icon>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Replace the attribute set.
    #[must_use]
    pub fn with_attributes(mut self, attributes: ActionAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional image.
    pub fn image(&self) -> Option<&Icon> {
        self.image.as_ref()
    }

    /// Attribute flags.
    pub fn attributes(&self) -> ActionAttributes {
        self.attributes
    }

    /// Returns `true` unless [`ActionAttributes::DISABLED`] is set.
    pub fn is_enabled(&self) -> bool {
        !self.attributes.contains(ActionAttributes::DISABLED)
    }

    /// Returns `true` if [`ActionAttributes::HIDDEN`] is set.
    pub fn is_hidden(&self) -> bool {
        self.attributes.contains(ActionAttributes::HIDDEN)
    }

    /// Returns `true` if [`ActionAttributes::DESTRUCTIVE`] is set.
    pub fn is_destructive(&self) -> bool {
        self.attributes.contains(ActionAttributes::DESTRUCTIVE)
    }

    /// Run the handler for one selection event.
    ///
    /// Disabled actions are not run. Returns whether the handler was invoked.
    pub fn perform(&self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        (self.handler)(self);
        true
    }
}

/// An ordered, single-depth list of actions.
#[derive(Clone, Debug, Default)]
pub struct Menu {
    children: Vec<Action>,
}

impl Menu {
    /// Create a menu from actions in display order.
    pub fn new(children: Vec<Action>) -> Self {
        Self { children }
    }

    /// All actions, including hidden ones.
    pub fn children(&self) -> &[Action] {
        &self.children
    }

    /// The action at `index` in model order.
    pub fn get(&self, index: usize) -> Option<&Action> {
        self.children.get(index)
    }

    /// Number of actions, including hidden ones.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the menu has no actions at all.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Actions to render, paired with their model index.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Action)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, action)| !action.is_hidden())
    }
}

impl From<Vec<Action>> for Menu {
    fn from(children: Vec<Action>) -> Self {
        Self::new(children)
    }
}

impl FromIterator<Action> for Menu {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
