use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kundali::vedic::dashas::{expand, DashaTimeline};

fn bench_current_path(c: &mut Criterion) {
    let birth = Utc.with_ymd_and_hms(1990, 4, 12, 3, 0, 0).unwrap();
    let timeline = DashaTimeline::from_moon(birth, 14.333);
    let at = birth + Duration::days(30 * 365);

    c.bench_function("current_path_depth_4", |b| {
        b.iter(|| timeline.current_path(black_box(at), black_box(4)))
    });

    c.bench_function("upcoming_windows_12_months", |b| {
        b.iter(|| timeline.upcoming_windows(black_box(at), black_box(12)))
    });
}

fn bench_expand(c: &mut Criterion) {
    let birth = Utc.with_ymd_and_hms(1990, 4, 12, 3, 0, 0).unwrap();
    let timeline = DashaTimeline::from_moon(birth, 200.0);
    let mahadasha = match timeline.current(birth, 0) {
        Ok(node) => node,
        Err(e) => panic!("timeline query failed: {e}"),
    };

    c.bench_function("expand_mahadasha_depth_2", |b| {
        b.iter(|| expand(black_box(&mahadasha), black_box(2)))
    });
}

criterion_group!(benches, bench_current_path, bench_expand);
criterion_main!(benches);
