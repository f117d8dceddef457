use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spaceweather_processor::analyzers::{IndexKind, StormAnalyzer};
use spaceweather_processor::models::ExtractorConfig;
use spaceweather_processor::processors::SeriesExtractor;

// Build a feed in the Kyoto request layout covering `days` days
fn create_test_feed(days: usize) -> String {
    let mut feed = String::new();
    for day in 1..=days {
        feed.push_str(&format!("DST2405*{:02}RRX020   0", day % 100));
        for hour in 0..24 {
            let value = if (day + hour) % 97 == 0 {
                9999
            } else {
                -((day * 7 + hour * 3) as i32 % 180)
            };
            feed.push_str(&format!("{:4}", value));
        }
        feed.push_str(" -40\n");
    }
    feed.push_str("Created at 2024-05-31T23:00:00Z\n");
    feed
}

fn benchmark_month_extraction(c: &mut Criterion) {
    let feed = create_test_feed(31);
    let extractor = SeriesExtractor::new(ExtractorConfig::dst());

    c.bench_function("dst_month_extraction", |b| {
        b.iter(|| {
            let series = extractor.extract(black_box(feed.as_bytes())).unwrap_or_default();
            black_box(series.len())
        })
    });
}

fn benchmark_statistics(c: &mut Criterion) {
    let series = SeriesExtractor::new(ExtractorConfig::dst()).extract_str(&create_test_feed(31));

    c.bench_function("dst_statistics", |b| {
        b.iter(|| {
            let stats = StormAnalyzer::new(IndexKind::Dst).analyze(black_box(&series));
            black_box(stats.storm_slots)
        })
    });
}

fn benchmark_varying_feed_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction_by_days");
    let extractor = SeriesExtractor::new(ExtractorConfig::dst());

    for &days in &[1, 31, 365, 3650] {
        let feed = create_test_feed(days);
        group.bench_with_input(BenchmarkId::new("days", days), &feed, |b, feed| {
            b.iter(|| black_box(extractor.extract_str(feed).len()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_month_extraction,
    benchmark_statistics,
    benchmark_varying_feed_sizes
);
criterion_main!(benches);
