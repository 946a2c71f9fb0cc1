// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context menu basics.
//!
//! Capture a live element, attach a reaction bar above it, present, select an action.
//! Then try capturing an element that is not on screen and watch the warning.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_context_menu_demos --example context_menu_basics`

use std::collections::HashMap;

use kurbo::{Point, Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_context_menu::accessory::{AccessoryController, AccessoryView};
use understory_context_menu::action::{Action, ActionAttributes, Menu};
use understory_context_menu::alignment::{AccessoryAlignment, Edge, Origin};
use understory_context_menu::configuration::ContextMenuConfiguration;
use understory_context_menu::presenter::{ContextMenuPresenter, NoAnimations};
use understory_context_menu::preview::{
    CaptureError, ElementId, RenderSurface, Snapshot, TargetedPreview,
};

/// A toy screen: element frames plus the set currently in the window.
struct Screen {
    frames: HashMap<ElementId, Rect>,
    on_screen: Vec<ElementId>,
}

impl RenderSurface for Screen {
    fn is_attached(&self, element: ElementId) -> bool {
        self.on_screen.contains(&element)
    }

    fn frame_of(&self, element: ElementId) -> Option<Rect> {
        self.frames.get(&element).copied()
    }

    fn snapshot(&mut self, element: ElementId) -> Result<Snapshot, CaptureError> {
        let frame = self.frame_of(element).ok_or(CaptureError::Unavailable)?;
        Ok(Snapshot::new(frame, format!("bitmap of {element:?}")))
    }
}

struct ReactionBar(Rect);

impl AccessoryView for ReactionBar {
    fn frame(&self) -> Rect {
        self.0
    }
    fn set_frame(&mut self, frame: Rect) {
        self.0 = frame;
    }
}

fn message_menu() -> ContextMenuConfiguration {
    ContextMenuConfiguration::with_provider(|base| {
        let mut actions = base.to_vec();
        actions.push(Action::new("Forward", |a| println!("  -> {}", a.title())));
        actions.push(
            Action::new("Delete", |a| println!("  -> {}", a.title()))
                .with_attributes(ActionAttributes::DESTRUCTIVE)
                .with_image("trash"),
        );
        Some(Menu::new(actions))
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let bubble = ElementId(1);
    let offscreen = ElementId(2);
    let mut screen = Screen {
        frames: HashMap::from([
            (bubble, Rect::new(16.0, 420.0, 260.0, 480.0)),
            (offscreen, Rect::new(16.0, -400.0, 260.0, -340.0)),
        ]),
        on_screen: vec![bubble],
    };

    let base = [
        Action::new("Reply", |a| println!("  -> {}", a.title())),
        Action::new("Copy", |a| println!("  -> {}", a.title())),
    ];

    let mut presenter = ContextMenuPresenter::new(NoAnimations);
    presenter.present(message_menu(), &base, |id| {
        println!("building preview for {id:?}");
        TargetedPreview::capture(&mut screen, bubble).with_accessories([AccessoryController::new(
            ReactionBar(Rect::from_origin_size(Point::ZERO, Size::new(200.0, 44.0))),
            AccessoryAlignment::new([(Edge::Top, Origin::Exterior), (Edge::Leading, Origin::Interior)]),
        )])
    });
    println!("state: {:?}", presenter.state());

    if let Some(preview) = presenter.preview() {
        println!("preview frame: {:?}", preview.frame());
        println!("reaction bar:  {:?}", preview.accessories()[0].frame());
    }
    if let Some(menu) = presenter.menu() {
        for (index, action) in menu.visible() {
            let hint = if action.is_destructive() { " (destructive)" } else { "" };
            println!("  [{index}] {}{hint}", action.title());
        }
    }

    println!("select 3: {:?}", presenter.select(3));
    println!("state: {:?}", presenter.state());

    // The offscreen element cannot be captured; the menu still appears, without an image.
    presenter.present(message_menu(), &base, |_| {
        TargetedPreview::capture(&mut screen, offscreen)
    });
    let degraded = presenter.preview().is_some_and(TargetedPreview::is_degraded);
    println!("offscreen preview degraded: {degraded}");
    presenter.dismiss();
    println!("state: {:?}", presenter.state());
}
