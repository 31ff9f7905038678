use cadence_core::generator::OccurrenceGenerator;
use cadence_core::rule::{RecurrenceRule, RepeatUnit};
use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 31, 9, 0, 0).unwrap()
}

fn generator(every: i64, unit: RepeatUnit) -> OccurrenceGenerator {
    OccurrenceGenerator::new(anchor(), RecurrenceRule::new(every, unit).unwrap())
}

fn bench_window_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_generation");
    let from = anchor();
    let to = from + Duration::days(365);

    for unit in [RepeatUnit::Day, RepeatUnit::Week, RepeatUnit::Month] {
        let g = generator(1, unit);
        group.bench_with_input(BenchmarkId::from_parameter(unit), &g, |b, g| {
            b.iter(|| g.between(black_box(from), black_box(to), 1000))
        });
    }
    group.finish();
}

fn bench_far_window_seek(c: &mut Criterion) {
    let g = generator(1, RepeatUnit::Day);
    let from = anchor() + Duration::days(50 * 365);
    let to = from + Duration::days(7);

    c.bench_function("far_window_seek_daily", |b| {
        b.iter(|| g.between(black_box(from), black_box(to), 1000))
    });
}

fn bench_month_clamping(c: &mut Criterion) {
    let g = generator(1, RepeatUnit::Month);

    c.bench_function("nth_monthly_clamped", |b| {
        b.iter(|| {
            for n in 0..120 {
                black_box(g.nth(black_box(n)));
            }
        })
    });
}

criterion_group!(benches, bench_window_generation, bench_far_window_seek, bench_month_clamping);
criterion_main!(benches);
