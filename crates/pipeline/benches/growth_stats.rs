use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use blackbox_core::RecordId;
use blackbox_pipeline::deal::{Deal, DealId, DealStatus};
use blackbox_pipeline::metrics::{Granularity, compute_growth_stats};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

/// Deals spread evenly across the three weeks before `now`, cycling through
/// every funnel stage.
fn seed_deals(count: usize) -> Vec<Deal> {
    let now = reference_now();
    (0..count)
        .map(|i| {
            let status = DealStatus::ALL[i % DealStatus::ALL.len()];
            let offset = Duration::minutes((i as i64 * 30_240 / count.max(1) as i64) % 30_240);
            Deal {
                id: DealId::new(RecordId::new()),
                title: format!("SP-{:06}AAA", i % 1_000_000),
                description: None,
                contact_id: None,
                status,
                notes: None,
                amount: (i as u64 % 900) * 100,
                created_at: now - offset,
                updated_at: None,
            }
        })
        .collect()
}

fn bench_growth_stats_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth_stats_scaling");

    for deal_count in [10usize, 100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*deal_count as u64));
        group.bench_with_input(
            BenchmarkId::new("weekly", deal_count),
            deal_count,
            |b, &count| {
                let deals = seed_deals(count);
                let now = reference_now();
                b.iter(|| {
                    black_box(compute_growth_stats(
                        black_box(&deals),
                        Granularity::Week,
                        now,
                    ))
                });
            },
        );
    }

    group.finish();
}

fn bench_growth_stats_granularities(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth_stats_granularities");
    group.sample_size(1000);

    let deals = seed_deals(1_000);
    let now = reference_now();

    for (name, granularity) in [
        ("day", Granularity::Day),
        ("week", Granularity::Week),
        ("month", Granularity::Month),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(compute_growth_stats(black_box(&deals), granularity, now)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_growth_stats_scaling,
    bench_growth_stats_granularities
);
criterion_main!(benches);
