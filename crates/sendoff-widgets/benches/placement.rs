//! Benchmarks for overlay placement and the tooltip lifecycle.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sendoff_core::{MemoryDocument, Rect, Size};
use sendoff_widgets::{place, Spacing, TooltipController};

fn bench_place_open_space(c: &mut Criterion) {
    let anchor = Rect::new(400.0, 300.0, 80.0, 20.0);
    let overlay = Size::new(180.0, 50.0);
    let viewport = Size::new(1280.0, 720.0);

    c.bench_function("place_open_space", |b| {
        b.iter(|| place(black_box(anchor), overlay, viewport, Spacing::default()))
    });
}

fn bench_place_clamped(c: &mut Criterion) {
    let anchor = Rect::new(0.0, 0.0, 60.0, 18.0);
    let overlay = Size::new(266.0, 84.0);
    let viewport = Size::new(375.0, 667.0);

    c.bench_function("place_clamped_corner", |b| {
        b.iter(|| place(black_box(anchor), overlay, viewport, Spacing::default()))
    });
}

fn bench_show_hide_cycle(c: &mut Criterion) {
    c.bench_function("tooltip_show_hide_cycle", |b| {
        b.iter(|| {
            let mut doc = MemoryDocument::new(1280.0, 720.0);
            let term = doc.add(
                "span",
                "tooltip-trigger",
                "quantum computing",
                Rect::new(400.0, 300.0, 120.0, 18.0),
            );
            let mut tooltip = TooltipController::default();
            let _ = tooltip.on_trigger_click(&mut doc, black_box(term));
            if let Some(exit) = tooltip.hide(&mut doc) {
                tooltip.complete(&mut doc, exit);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_place_open_space,
    bench_place_clamped,
    bench_show_hide_cycle,
);

criterion_main!(benches);
