// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for registry operations.
//!
//! Measures the performance of:
//! - Showing toasts past the capacity cap (eviction + timer rearm)
//! - Updating a toast in place
//! - Fan-out to several subscribers

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use toastbox::notifications::{
    RegistrySettings, ShowOptions, ToastKind, ToastPatch, ToastRegistry,
};

/// One worker keeps polling spawned timers, so aborted ones are reaped.
fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .expect("failed to build runtime")
}

fn bench_show_with_eviction(c: &mut Criterion) {
    let rt = runtime();
    let registry = ToastRegistry::with_runtime(RegistrySettings::default(), rt.handle().clone());
    let mut group = c.benchmark_group("registry");

    let mut n = 0u64;
    group.bench_function("show_evicting", |b| {
        b.iter(|| {
            n += 1;
            black_box(registry.show(
                ToastKind::Info,
                "benchmark",
                ShowOptions::new().id(format!("bench-{}", n % 16)),
            ));
        });
    });

    group.finish();
    registry.shutdown();
}

fn bench_update_in_place(c: &mut Criterion) {
    let rt = runtime();
    let registry = ToastRegistry::with_runtime(RegistrySettings::default(), rt.handle().clone());
    let id = registry.loading("working", ShowOptions::new());
    let mut group = c.benchmark_group("registry");

    group.bench_function("update_message", |b| {
        b.iter(|| {
            registry.update(&id, ToastPatch::new().message(black_box("still working")));
        });
    });

    group.finish();
    registry.shutdown();
}

fn bench_fan_out(c: &mut Criterion) {
    let rt = runtime();
    let registry = ToastRegistry::with_runtime(RegistrySettings::default(), rt.handle().clone());
    for _ in 0..8 {
        registry.subscribe(|snapshot| {
            black_box(snapshot.len());
        });
    }
    let id = registry.loading("working", ShowOptions::new());
    let mut group = c.benchmark_group("registry");

    group.bench_function("update_with_8_subscribers", |b| {
        b.iter(|| {
            registry.update(&id, ToastPatch::new().dismissible(black_box(true)));
        });
    });

    group.finish();
    registry.shutdown();
}

criterion_group!(
    benches,
    bench_show_with_eviction,
    bench_update_in_place,
    bench_fan_out
);
criterion_main!(benches);
