//! Benchmarks for the zone bounds-change hot path.
//!
//! Run with: cargo bench -p stagehand-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use stagehand_core::{Point, Size, StageFrame};
use stagehand_layout::{BoundsReport, PaneId, SnapGestureKind, SnapKey, Zone, ZoneConfig, ZoneId};
use std::hint::black_box;

fn id(raw: u64) -> PaneId {
    PaneId::new(raw).expect("bench ids are non-zero")
}

/// A zone with `n` windows tiled in rows of eight.
fn tiled_zone(n: u64, frame: &StageFrame) -> Zone {
    let mut zone = Zone::new(ZoneId::new(1), ZoneConfig::default());
    for i in 0..n {
        let col = (i % 8) as f64;
        let row = (i / 8) as f64;
        zone.on_window_bounds_changed(
            frame,
            id(i + 2),
            BoundsReport::new(
                Point::new(col * 260.0, row * 360.0),
                Size::new(200.0, 300.0),
            ),
        );
    }
    zone
}

fn bench_bounds_changed(c: &mut Criterion) {
    let mut group = c.benchmark_group("zone/bounds_changed");
    let frame = StageFrame::unscaled(Size::new(4000.0, 4000.0));

    for n in [4u64, 16, 64, 256] {
        let zone = tiled_zone(n, &frame);
        group.bench_with_input(BenchmarkId::new("drag_step", n), &zone, |b, zone| {
            b.iter_batched(
                || zone.clone(),
                |mut zone| {
                    for step in 0..32 {
                        let report = BoundsReport::new(
                            Point::new(f64::from(step) * 8.0, 10.0),
                            Size::new(200.0, 300.0),
                        )
                        .moving(true);
                        zone.on_window_bounds_changed(&frame, id(1), report);
                    }
                    black_box(zone.candidate().copied())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_gesture_end(c: &mut Criterion) {
    let frame = StageFrame::unscaled(Size::new(4000.0, 4000.0));
    let zone = tiled_zone(64, &frame);
    let report = BoundsReport::new(Point::new(230.0, 0.0), Size::new(200.0, 300.0));

    c.bench_function("zone/gesture_end", |b| {
        b.iter_batched(
            || zone.clone(),
            |mut zone| {
                zone.on_window_bounds_changed(&frame, id(1), report.moving(true));
                black_box(zone.on_user_bounds_change_end(&frame, id(1), report))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_snap_drag(c: &mut Criterion) {
    let frame = StageFrame::unscaled(Size::new(4000.0, 4000.0));
    let mut zone = Zone::new(ZoneId::new(1), ZoneConfig::default());
    let left = BoundsReport::new(Point::ZERO, Size::new(200.0, 300.0));
    let right = BoundsReport::new(Point::new(230.0, 0.0), Size::new(200.0, 300.0));
    zone.on_window_bounds_changed(&frame, id(2), right);
    zone.on_window_bounds_changed(&frame, id(1), left.moving(true));
    zone.on_user_bounds_change_end(&frame, id(1), left);
    let key = SnapKey::new(id(1), id(2));

    c.bench_function("zone/snap_resize_drag", |b| {
        b.iter_batched(
            || zone.clone(),
            |mut zone| {
                zone.begin_snap_gesture(key, SnapGestureKind::Resize, Point::new(210.0, 100.0));
                for step in 1..=16 {
                    zone.update_snap_gesture(&frame, Point::new(210.0 + f64::from(step), 100.0));
                }
                zone.end_snap_gesture();
                black_box(zone.drain_events())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_bounds_changed,
    bench_gesture_end,
    bench_snap_drag
);
criterion_main!(benches);
