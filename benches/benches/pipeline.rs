// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glimmer_data::Key;
use glimmer_scene::{
    Attr, Mark, RenderTarget, SceneCommand, SceneReconciler, Surface, Timing, VisualElement,
};
use glimmer_transition::{TransitionScheduler, TransitionSpec};
use kurbo::{Affine, Point, Rect};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn bars(count: usize, seed: u64) -> Vec<Mark> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|i| {
            let x0 = i as f64 * 4.0;
            let h = rng.next_f64() * 250.0;
            let target =
                VisualElement::rect(format!("bar/{i}"), Rect::new(x0, 250.0 - h, x0 + 3.0, 250.0));
            let baseline = VisualElement::rect(format!("bar/{i}"), Rect::new(x0, 250.0, x0 + 3.0, 250.0));
            Mark::new(target).entering_from(baseline)
        })
        .collect()
}

fn dot_grid(n: usize, cell: f64) -> Surface {
    let mut surface = Surface::new();
    surface.apply(SceneCommand::Layer {
        key: Key::from("marks"),
        transform: Affine::IDENTITY,
        z: 0,
    });
    for y in 0..n {
        for x in 0..n {
            let center = Point::new((x as f64 + 0.5) * cell, (y as f64 + 0.5) * cell);
            surface.apply(SceneCommand::Create {
                layer: Key::from("marks"),
                element: VisualElement::circle(format!("dot/{x}/{y}"), center, cell * 0.4),
            });
        }
    }
    let _ = surface.commit();
    surface
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    for &n in &[100usize, 1_000, 10_000] {
        let first = bars(n, 0xCAFE_F00D_DEAD_BEEF);
        let second = bars(n, 0xBADC_F00D_1234_5678);
        // Half the keys survive, half are new.
        let shifted: Vec<Mark> = bars(n + n / 2, 0xFACE_FEED_CAFE_BABE)
            .into_iter()
            .skip(n / 2)
            .collect();
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("enter_n{n}"), |b| {
            b.iter_batched(
                || SceneReconciler::new("marks"),
                |mut r| black_box(r.plan(&first, Timing::default())),
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("update_n{n}"), |b| {
            b.iter_batched(
                || {
                    let mut r = SceneReconciler::new("marks");
                    let _ = r.plan(&first, Timing::default());
                    r
                },
                |mut r| black_box(r.plan(&second, Timing::default())),
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("mixed_n{n}"), |b| {
            b.iter_batched(
                || {
                    let mut r = SceneReconciler::new("marks");
                    let _ = r.plan(&first, Timing::default());
                    r
                },
                |mut r| black_box(r.plan(&shifted, Timing::default())),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    for &n in &[32usize, 64, 128] {
        let surface = dot_grid(n, 10.0);
        let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
        let points: Vec<Point> = (0..256)
            .map(|_| {
                Point::new(
                    rng.next_f64() * n as f64 * 10.0,
                    rng.next_f64() * n as f64 * 10.0,
                )
            })
            .collect();
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("grid_n{n}"), |b| {
            b.iter(|| {
                let hits = points
                    .iter()
                    .filter(|p| surface.hit_test(**p).is_some())
                    .count();
                black_box(hits);
            });
        });
    }
    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler_tick");
    for &n in &[100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("running_n{n}"), |b| {
            b.iter_batched(
                || {
                    let mut s = TransitionScheduler::new();
                    for i in 0..n {
                        let spec = TransitionSpec::new(format!("bar/{i}"), Attr::Height, 250.0)
                            .duration(Duration::from_secs(1));
                        let _ = s.animate(Duration::ZERO, spec, 0.0.into());
                    }
                    s
                },
                |mut s| black_box(s.tick(Duration::from_millis(500))),
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("interrupt_n{n}"), |b| {
            b.iter_batched(
                || {
                    let mut s = TransitionScheduler::new();
                    for i in 0..n {
                        let spec = TransitionSpec::new(format!("bar/{i}"), Attr::Height, 250.0)
                            .duration(Duration::from_secs(1));
                        let _ = s.animate(Duration::ZERO, spec, 0.0.into());
                    }
                    s
                },
                |mut s| {
                    let now = Duration::from_millis(300);
                    for i in 0..n {
                        let spec = TransitionSpec::new(format!("bar/{i}"), Attr::Height, 100.0);
                        let _ = s.animate(now, spec, 0.0.into());
                    }
                    black_box(s.tick(now))
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reconcile, bench_hit_test, bench_tick);
criterion_main!(benches);
