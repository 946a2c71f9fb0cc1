// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size, Vec2};
use understory_context_menu::alignment::{AccessoryAlignment, Edge, LayoutDirection, Origin};

fn gen_previews(n: usize) -> Vec<Rect> {
    (0..n)
        .map(|i| {
            let y = i as f64 * 72.0;
            Rect::new(16.0, y, 16.0 + 180.0 + (i % 7) as f64 * 20.0, y + 60.0)
        })
        .collect()
}

fn rule_sets() -> Vec<(&'static str, AccessoryAlignment)> {
    vec![
        ("single", AccessoryAlignment::new([(Edge::Trailing, Origin::Exterior)])),
        (
            "corner",
            AccessoryAlignment::new([(Edge::Top, Origin::Exterior), (Edge::Leading, Origin::Interior)])
                .with_offset(Vec2::new(0.0, -8.0)),
        ),
        (
            "overridden",
            AccessoryAlignment::new([
                (Edge::Leading, Origin::Exterior),
                (Edge::Bottom, Origin::Exterior),
                (Edge::Top, Origin::Interior),
                (Edge::Trailing, Origin::Interior),
            ]),
        ),
    ]
}

fn bench_resolve(c: &mut Criterion) {
    let previews = gen_previews(1024);
    let accessory = Rect::from_origin_size(Point::ZERO, Size::new(200.0, 44.0));
    let mut group = c.benchmark_group("alignment_resolve");
    group.throughput(Throughput::Elements(previews.len() as u64));
    for (name, alignment) in rule_sets() {
        for (dir_name, direction) in [
            ("ltr", LayoutDirection::LeftToRight),
            ("rtl", LayoutDirection::RightToLeft),
        ] {
            group.bench_function(format!("{name}_{dir_name}"), |b| {
                b.iter(|| {
                    let mut acc = 0.0;
                    for p in &previews {
                        let f = alignment.resolve(*p, accessory, direction);
                        acc += f.x0 + f.y0;
                    }
                    black_box(acc);
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
