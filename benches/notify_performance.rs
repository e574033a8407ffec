//! Performance benchmarks for statehub.
//!
//! - Cost of a notification pass as the subscriber count grows
//! - Lock-free state reads
//! - Attach/detach churn

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use statehub::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

fn counting_subscriber(counter: &Arc<AtomicU64>) -> Arc<dyn Subscriber<f64>> {
    let counter = Arc::clone(counter);
    Arc::new(FnSubscriber::new("counter", move |_: &f64| {
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }))
}

/// Benchmark a full pass with varying subscriber counts
fn benchmark_set_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_state");

    for count in [1usize, 8, 64, 512] {
        let subject = Subject::new(0.0_f64);
        let counter = Arc::new(AtomicU64::new(0));
        for _ in 0..count {
            subject.attach(counting_subscriber(&counter));
        }

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let mut value = 0.0;
            b.iter(|| {
                value += 0.5;
                black_box(subject.set_state(value).unwrap());
            });
        });
    }
    group.finish();
}

/// Benchmark the panic-catching overhead against raw delivery
fn benchmark_catch_panics(c: &mut Criterion) {
    let mut group = c.benchmark_group("catch_panics");

    for enabled in [true, false] {
        let subject = Subject::builder()
            .catch_panics(enabled)
            .build(0.0_f64)
            .unwrap();
        let counter = Arc::new(AtomicU64::new(0));
        for _ in 0..64 {
            subject.attach(counting_subscriber(&counter));
        }

        group.bench_function(BenchmarkId::from_parameter(enabled), |b| {
            b.iter(|| black_box(subject.set_state(1.0).unwrap()));
        });
    }
    group.finish();
}

/// Benchmark lock-free reads of the stored value
fn benchmark_state_read(c: &mut Criterion) {
    let subject = Subject::new(21.5_f64);

    let mut group = c.benchmark_group("state_read");
    group.bench_function("single_read", |b| {
        b.iter(|| {
            let state = subject.state();
            black_box(*state);
        });
    });
    group.finish();
}

/// Benchmark attach followed by detach
fn benchmark_attach_detach(c: &mut Criterion) {
    let subject = Subject::new(0.0_f64);
    let counter = Arc::new(AtomicU64::new(0));
    for _ in 0..32 {
        subject.attach(counting_subscriber(&counter));
    }
    let churn = counting_subscriber(&counter);

    let mut group = c.benchmark_group("attach_detach");
    group.bench_function("churn", |b| {
        b.iter(|| {
            subject.attach(Arc::clone(&churn));
            black_box(subject.detach(&churn));
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_set_state,
    benchmark_catch_panics,
    benchmark_state_read,
    benchmark_attach_detach
);
criterion_main!(benches);
