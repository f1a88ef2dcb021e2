use billmock_kernel::prelude::*;
use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;

const STATUSES: [&str; 4] = ["active", "past_due", "canceled", "trialing"];

fn subscriptions(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::try_from(json!({
                "id": format!("sub_{i}"),
                "status": STATUSES[i % STATUSES.len()],
                "quantity": i % 7,
                "cancel_at_period_end": i % 3 == 0,
            }))
            .unwrap_or_default()
        })
        .collect()
}

fn bench_query(c: &mut Criterion) {
    let records = subscriptions(100_000);

    c.bench_function("query_default_page", |b| {
        let query = RecordQuery::default();
        b.iter(|| black_box(query.apply(black_box(&records))));
    });

    c.bench_function("query_text_filter_deep_page", |b| {
        let query = RecordQuery::from_params([("status", "canceled"), ("page", "200"), ("limit", "50")]);
        b.iter(|| black_box(query.apply(black_box(&records))));
    });

    c.bench_function("query_numeric_and_text_filter", |b| {
        let query = RecordQuery::from_params([("status", "active"), ("quantity", "4")]);
        b.iter(|| black_box(query.apply(black_box(&records))));
    });
}

criterion_group!(benches, bench_query);
criterion_main!(benches);
