// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu configuration requests.
//!
//! A [`ContextMenuConfiguration`] pairs a [`ConfigurationId`] with a deferred provider.
//! The provider receives the trigger surface's base actions and returns the [`Menu`] to show,
//! or `None` to suppress the menu for this trigger.
//!
//! The provider runs lazily, at most once, when the presenter has accepted a confirmed trigger.
//! It is never called speculatively, so the base actions reflect state at trigger time.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::action::{Action, Menu};

static NEXT_FRESH_ID: AtomicUsize = AtomicUsize::new(1);

/// Identifier distinguishing concurrent presentation requests.
///
/// Hosts use it to deduplicate or cancel requests. Identifiers made by
/// [`ConfigurationId::fresh`] are unique within the process and never equal a
/// caller-supplied identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConfigurationId(IdRepr);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum IdRepr {
    Fresh(usize),
    Value(u64),
    Named(Arc<str>),
}

impl ConfigurationId {
    /// Generate a new identifier that has never been handed out before.
    pub fn fresh() -> Self {
        Self(IdRepr::Fresh(NEXT_FRESH_ID.fetch_add(1, Ordering::Relaxed)))
    }

    /// Identifier from a caller-chosen integer (for example a row or message id).
    pub const fn from_u64(value: u64) -> Self {
        Self(IdRepr::Value(value))
    }

    /// Identifier from a caller-chosen name.
    pub fn named(name: &str) -> Self {
        Self(IdRepr::Named(Arc::from(name)))
    }

    /// Returns `true` if this identifier was generated by [`ConfigurationId::fresh`].
    pub fn is_generated(&self) -> bool {
        matches!(self.0, IdRepr::Fresh(_))
    }
}

/// Builds the menu from the base actions, or returns `None` to suppress it.
pub type ActionProvider = Box<dyn FnOnce(&[Action]) -> Option<Menu>>;

/// A single presentation request: identifier plus deferred menu provider.
pub struct ContextMenuConfiguration {
    identifier: ConfigurationId,
    provider: Option<ActionProvider>,
}

impl core::fmt::Debug for ContextMenuConfiguration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ContextMenuConfiguration")
            .field("identifier", &self.identifier)
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

impl ContextMenuConfiguration {
    /// Create a configuration.
    ///
    /// With `identifier` absent a [`ConfigurationId::fresh`] one is generated.
    /// With `provider` absent the configuration always suppresses its menu.
    pub fn new(
        identifier: Option<ConfigurationId>,
        provider: Option<ActionProvider>,
    ) -> Self {
        Self {
            identifier: identifier.unwrap_or_else(ConfigurationId::fresh),
            provider,
        }
    }

    /// Configuration with a fresh identifier and the given provider.
    pub fn with_provider(provider: impl FnOnce(&[Action]) -> Option<Menu> + 'static) -> Self {
        Self::new(None, Some(Box::new(provider)))
    }

    /// Replace the identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: ConfigurationId) -> Self {
        self.identifier = identifier;
        self
    }

    /// Identifier of this request.
    pub fn identifier(&self) -> &ConfigurationId {
        &self.identifier
    }

    /// Run the provider against `base_actions`.
    ///
    /// The provider is consumed; later calls return `None`.
    pub fn make_menu(&mut self, base_actions: &[Action]) -> Option<Menu> {
        let Some(provider) = self.provider.take() else {
            tracing::debug!(
                identifier = ?self.identifier,
                "no action provider left; suppressing menu"
            );
            return None;
        };
        let menu = provider(base_actions);
        if menu.is_none() {
            tracing::debug!(identifier = ?self.identifier, "provider suppressed menu");
        }
        menu
    }
}
