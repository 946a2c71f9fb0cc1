// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated presentation driven by a frame loop.
//!
//! The host and the accessory hold their completion tokens until a simulated frame clock passes
//! the animation's end. The presenter is polled once per frame. A dismissal requested during the
//! entrance waits for it to finish, and the accessory asks for an emoji picker once presented.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_context_menu_demos --example context_menu_animations`

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kurbo::{Point, Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_context_menu::accessory::{
    AccessoryController, AccessoryDelegateHandle, AccessoryId, AccessoryView, EmojiPickerCallback,
};
use understory_context_menu::action::{Action, Menu};
use understory_context_menu::alignment::{AccessoryAlignment, Edge, Origin};
use understory_context_menu::animation::Completion;
use understory_context_menu::configuration::ContextMenuConfiguration;
use understory_context_menu::presenter::{
    ContextMenuPresenter, PresentationHost, PresentationState, PresenterConfig,
};
use understory_context_menu::preview::{Snapshot, TargetedPreview};

const FRAME: Duration = Duration::from_millis(16);

/// Shared frame clock with animations waiting for their end time.
#[derive(Default)]
struct Clock {
    now: Duration,
    running: Vec<(Duration, &'static str, Completion)>,
}

impl Clock {
    fn start(&mut self, name: &'static str, duration: Duration, completion: Completion) {
        println!("{:>4}ms start  {name}", self.now.as_millis());
        self.running.push((self.now + duration, name, completion));
    }

    fn tick(&mut self) {
        self.now += FRAME;
        let now = self.now;
        let (done, running): (Vec<_>, Vec<_>) =
            self.running.drain(..).partition(|(end, _, _)| *end <= now);
        self.running = running;
        for (_, name, completion) in done {
            println!("{:>4}ms finish {name}", now.as_millis());
            completion.complete();
        }
    }
}

struct Host {
    clock: Rc<RefCell<Clock>>,
}

impl PresentationHost for Host {
    fn animate_preview_in(&mut self, _: &TargetedPreview, duration: Duration, c: Completion) {
        self.clock.borrow_mut().start("preview in", duration, c);
    }

    fn animate_preview_out(&mut self, _: &TargetedPreview, duration: Duration, c: Completion) {
        self.clock.borrow_mut().start("preview out", duration, c);
    }

    fn present_emoji_picker(&mut self, accessory: AccessoryId, on_result: EmojiPickerCallback) {
        println!("emoji picker for accessory {}", accessory.index());
        on_result("🦀");
    }
}

struct ReactionBar {
    frame: Rect,
    clock: Rc<RefCell<Clock>>,
    delegate: Rc<RefCell<Option<AccessoryDelegateHandle>>>,
}

impl AccessoryView for ReactionBar {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    fn animate_in(&mut self, duration: Duration, completion: Completion) {
        // Reactions pop in a little later than the preview.
        self.clock
            .borrow_mut()
            .start("reactions in", duration + FRAME * 3, completion);
    }

    fn animate_out(&mut self, duration: Duration, completion: Completion) {
        self.clock.borrow_mut().start("reactions out", duration, completion);
    }

    fn set_delegate(&mut self, delegate: Option<AccessoryDelegateHandle>) {
        *self.delegate.borrow_mut() = delegate;
    }
}

fn run_until(
    presenter: &mut ContextMenuPresenter<Host>,
    clock: &Rc<RefCell<Clock>>,
    target: PresentationState,
) {
    let mut last = presenter.state();
    while presenter.poll() != target {
        clock.borrow_mut().tick();
        if presenter.state() != last {
            last = presenter.state();
            println!("state -> {last:?}");
        }
    }
    println!("state -> {target:?}");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let clock = Rc::new(RefCell::new(Clock::default()));
    let delegate = Rc::new(RefCell::new(None));
    let mut presenter = ContextMenuPresenter::with_config(
        Host {
            clock: clock.clone(),
        },
        PresenterConfig {
            animation_duration: Duration::from_millis(120),
            ..PresenterConfig::default()
        },
    );

    let config = ContextMenuConfiguration::with_provider(|base| Some(Menu::new(base.to_vec())));
    let base = [Action::new("Reply", |_| {})];
    presenter.present(config, &base, |_| {
        let cell = Rect::new(20.0, 500.0, 300.0, 560.0);
        TargetedPreview::from_snapshot(Snapshot::new(cell, ())).with_accessories([
            AccessoryController::new(
                ReactionBar {
                    frame: Rect::from_origin_size(Point::ZERO, Size::new(220.0, 44.0)),
                    clock: clock.clone(),
                    delegate: delegate.clone(),
                },
                AccessoryAlignment::new([
                    (Edge::Top, Origin::Exterior),
                    (Edge::Trailing, Origin::Interior),
                ]),
            ),
        ])
    });
    println!("state -> {:?}", presenter.state());
    run_until(&mut presenter, &clock, PresentationState::Presented);

    // The reaction bar's "+" button.
    if let Some(handle) = delegate.borrow().as_ref() {
        handle.request_emoji_picker(|emoji| println!("picked {emoji}"));
    }
    presenter.poll();

    presenter.dismiss();
    run_until(&mut presenter, &clock, PresentationState::Dismissed);

    // Second presentation: dismissed while still animating in.
    let config = ContextMenuConfiguration::with_provider(|base| Some(Menu::new(base.to_vec())));
    presenter.present(config, &base, |_| {
        TargetedPreview::from_snapshot(Snapshot::new(Rect::new(20.0, 200.0, 300.0, 260.0), ()))
    });
    presenter.dismiss();
    println!("dismissal queued: {}", presenter.is_dismissal_queued());
    run_until(&mut presenter, &clock, PresentationState::Dismissed);
}
