use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use conductor::sequencer::SubdivisionTracker;
use conductor::{Conductor, ManualClock, MusicalPosition, NoteValue, Tempo, TimeSignature};

/// Benchmark the per-tick cost with no edges (the common case per frame)
fn bench_idle_tick(c: &mut Criterion) {
    let mut conductor =
        Conductor::new(120.0, TimeSignature::four_four(), ManualClock::new()).unwrap();
    conductor.update(0.0);

    c.bench_function("tick_without_edges", |b| {
        b.iter(|| black_box(conductor.update(black_box(0.001))));
    });
}

/// Benchmark dispatch cost with growing listener counts
fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let frame = 1.0 / 60.0;

    for num_listeners in [1, 16, 128, 1024] {
        let mut conductor =
            Conductor::new(120.0, TimeSignature::four_four(), ManualClock::new()).unwrap();
        for i in 0..num_listeners {
            let note = NoteValue::ALL[i % NoteValue::COUNT];
            conductor.register(
                note,
                |position: &MusicalPosition| {
                    black_box(position.beat_fraction);
                },
                false,
            );
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_listeners", num_listeners)),
            &frame,
            |b, &frame| {
                let mut time = 0.0;
                b.iter(|| {
                    // One second of 60 fps frames
                    for _ in 0..60 {
                        black_box(conductor.update(time));
                        time += frame;
                    }
                });
            },
        );
    }
    group.finish();
}

/// Benchmark short-lived registrations (one-shots re-armed every beat)
fn bench_one_shot_churn(c: &mut Criterion) {
    let mut conductor =
        Conductor::new(120.0, TimeSignature::four_four(), ManualClock::new()).unwrap();
    let mut time = 0.0;

    c.bench_function("one_shot_register_and_fire", |b| {
        b.iter(|| {
            conductor.register(NoteValue::Quarter, |_: &MusicalPosition| {}, true);
            time += 0.5;
            black_box(conductor.update(time));
        });
    });
}

/// Benchmark raw edge detection for a single subdivision
fn bench_edge_detection(c: &mut Criterion) {
    let tempo = Tempo::new(128.0).unwrap();
    let mut tracker = SubdivisionTracker::new(NoteValue::ThirtySecond, &tempo);
    let mut time = 0.0;

    c.bench_function("subdivision_update", |b| {
        b.iter(|| {
            time += 0.001;
            black_box(tracker.update(black_box(time)));
            black_box(tracker.fraction_at(time));
        });
    });
}

criterion_group!(
    benches,
    bench_idle_tick,
    bench_dispatch,
    bench_one_shot_churn,
    bench_edge_detection
);
criterion_main!(benches);
