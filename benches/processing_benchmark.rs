use aqs_processor::models::DailyMeasurement;
use aqs_processor::processors::{CityAggregator, RankingQuery};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_measurements(cities: usize, days_per_city: usize) -> Vec<DailyMeasurement> {
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    let mut measurements = Vec::with_capacity(cities * days_per_city);

    for c in 0..cities {
        for d in 0..days_per_city {
            let mut m = DailyMeasurement::new(
                start.checked_add_days(chrono::Days::new(d as u64)),
                "PM2.5 - Local Conditions".to_string(),
                Some(5.0 + (c % 40) as f64 + (d % 7) as f64 * 0.1),
                format!("State{:02}", c % 50),
                format!("City{:04}", c),
            );
            m.derive_calendar_fields();
            measurements.push(m);
        }
    }

    measurements
}

fn bench_aggregation(c: &mut Criterion) {
    let measurements = synthetic_measurements(500, 150);

    c.bench_function("aggregate_500_cities_150_days", |b| {
        let aggregator = CityAggregator::new();
        b.iter(|| black_box(aggregator.aggregate(black_box(&measurements))))
    });
}

fn bench_ranking(c: &mut Criterion) {
    let measurements = synthetic_measurements(2000, 120);
    let aggregates = CityAggregator::new().aggregate(&measurements);

    c.bench_function("rank_2000_cities", |b| {
        let query = RankingQuery::most_polluted();
        b.iter(|| black_box(query.execute(black_box(&aggregates))))
    });
}

criterion_group!(benches, bench_aggregation, bench_ranking);
criterion_main!(benches);
