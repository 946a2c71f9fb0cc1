// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use understory_context_menu::accessory::{AccessoryController, AccessoryView};
use understory_context_menu::action::{Action, Menu};
use understory_context_menu::alignment::{AccessoryAlignment, Edge, Origin};
use understory_context_menu::configuration::ContextMenuConfiguration;
use understory_context_menu::presenter::{ContextMenuPresenter, NoAnimations};
use understory_context_menu::preview::{Snapshot, TargetedPreview};

struct Bar(Rect);

impl AccessoryView for Bar {
    fn frame(&self) -> Rect {
        self.0
    }
    fn set_frame(&mut self, frame: Rect) {
        self.0 = frame;
    }
}

fn gen_actions(n: usize) -> Vec<Action> {
    (0..n)
        .map(|i| Action::new(&format!("Action {i}"), |_| {}))
        .collect()
}

fn preview_with_accessories(n: usize) -> TargetedPreview {
    let accessories = (0..n).map(|i| {
        let edge = if i % 2 == 0 { Edge::Top } else { Edge::Bottom };
        AccessoryController::new(
            Bar(Rect::from_origin_size(Point::ZERO, Size::new(120.0, 32.0))),
            AccessoryAlignment::new([(edge, Origin::Exterior), (Edge::Leading, Origin::Interior)]),
        )
    });
    TargetedPreview::from_snapshot(Snapshot::new(Rect::new(0.0, 200.0, 300.0, 260.0), ()))
        .with_accessories(accessories)
}

fn bench_cycle(c: &mut Criterion) {
    let base = gen_actions(8);
    let mut group = c.benchmark_group("presentation_cycle");
    for accessories in [0_usize, 1, 4] {
        group.bench_function(format!("present_select_{accessories}"), |b| {
            b.iter_batched(
                || ContextMenuPresenter::new(NoAnimations),
                |mut presenter| {
                    let config = ContextMenuConfiguration::with_provider(|base| {
                        Some(Menu::new(base.to_vec()))
                    });
                    presenter.present(config, &base, |_| preview_with_accessories(accessories));
                    black_box(presenter.select(3));
                    black_box(presenter.state());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cycle);
criterion_main!(benches);
