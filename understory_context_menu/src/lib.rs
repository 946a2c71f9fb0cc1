// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_context_menu --heading-base-level=0

//! Understory Context Menu: a Kurbo-native model and presenter for custom context menus.
//!
//! ## Overview
//!
//! This crate describes a context menu and drives its presentation without relying on a
//! platform-native implementation. It covers:
//!
//! - [`action`]: flat menus of [`Action`](action::Action)s with disabled/destructive/hidden
//!   attributes.
//! - [`configuration`]: a [`ContextMenuConfiguration`](configuration::ContextMenuConfiguration)
//!   pairing an identifier with a lazy menu provider.
//! - [`alignment`]: edge-relative placement of accessory views around a preview frame.
//! - [`accessory`]: accessory controllers, their views, and the non-owning delegate route back
//!   to the presenter.
//! - [`preview`]: [`TargetedPreview`](preview::TargetedPreview), captured live from a
//!   [`RenderSurface`](preview::RenderSurface) or built from a pre-made snapshot.
//! - [`animation`]: one-shot [`Completion`](animation::Completion) tokens.
//! - [`presenter`]: the `Idle → Presenting → Presented → Dismissing → Dismissed` state machine.
//!
//! ## Layering
//!
//! The crate does not render, animate, or detect gestures. Toolkits implement
//! [`RenderSurface`](preview::RenderSurface) for capture,
//! [`AccessoryView`](accessory::AccessoryView) for accessories, and
//! [`PresentationHost`](presenter::PresentationHost) for the preview's own animations and the
//! emoji picker. The presenter tells them what to do and when; they report back through
//! [`Completion`](animation::Completion) tokens and delegate handles.
//!
//! ## Threading
//!
//! Everything here is single threaded. Presenters, previews and handlers are built on `Rc`, so
//! the compiler keeps them on the presentation thread.
//!
//! ## Failure handling
//!
//! Nothing in this crate fails hard. Capturing an unattached element or a failed snapshot logs a
//! warning via `tracing` and yields a preview without an image. A provider returning no menu
//! suppresses the presentation. A request made while another presentation is live is refused
//! with [`PresentOutcome::Busy`](presenter::PresentOutcome::Busy).
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_context_menu::accessory::{AccessoryController, AccessoryView};
//! use understory_context_menu::action::{Action, ActionAttributes, Menu};
//! use understory_context_menu::alignment::{AccessoryAlignment, Edge, Origin};
//! use understory_context_menu::configuration::{ConfigurationId, ContextMenuConfiguration};
//! use understory_context_menu::presenter::{ContextMenuPresenter, NoAnimations, PresentationState};
//! use understory_context_menu::preview::{Snapshot, TargetedPreview};
//!
//! // A reaction bar sitting above the preview, flush with its leading edge.
//! struct ReactionBar(Rect);
//! impl AccessoryView for ReactionBar {
//!     fn frame(&self) -> Rect { self.0 }
//!     fn set_frame(&mut self, frame: Rect) { self.0 = frame; }
//! }
//!
//! let config = ContextMenuConfiguration::with_provider(|base| {
//!     let mut actions = base.to_vec();
//!     actions.push(Action::new("Delete", |_| {}).with_attributes(ActionAttributes::DESTRUCTIVE));
//!     Some(Menu::new(actions))
//! })
//! .with_identifier(ConfigurationId::named("message-1"));
//!
//! let mut presenter = ContextMenuPresenter::new(NoAnimations);
//! let base = [Action::new("Reply", |_| {})];
//! presenter.present(config, &base, |_| {
//!     let cell = Rect::new(16.0, 300.0, 216.0, 360.0);
//!     TargetedPreview::from_snapshot(Snapshot::new(cell, ())).with_accessories([
//!         AccessoryController::new(
//!             ReactionBar(Rect::from_origin_size(Point::ZERO, Size::new(180.0, 44.0))),
//!             AccessoryAlignment::new([(Edge::Top, Origin::Exterior), (Edge::Leading, Origin::Interior)]),
//!         ),
//!     ])
//! });
//!
//! assert_eq!(presenter.state(), PresentationState::Presented);
//! let bar = presenter.preview().unwrap().accessories()[0].frame();
//! assert_eq!(bar.origin(), Point::new(16.0, 256.0));
//! assert_eq!(presenter.menu().unwrap().len(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod accessory;
pub mod action;
pub mod alignment;
pub mod animation;
pub mod configuration;
pub mod presenter;
pub mod preview;
