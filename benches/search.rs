use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use remnant_stock::models::{MaterialFilter, MaterialMatch, RemnantRecord, SearchIndex};

const MATERIALS: [&str; 4] = ["Quartz", "Granite", "Marble", "Quartzite"];

fn stock(count: i64) -> Vec<RemnantRecord> {
    (1..=count)
        .map(|id| {
            RemnantRecord::new(
                id,
                format!("Remnant Style {}", id),
                MATERIALS[(id % 4) as usize],
                format!("{}x{}", 20 + id % 40, 50 + id % 70),
                format!("https://photos.example.com/{}.jpg", id),
            )
        })
        .collect()
}

fn bench_search_and_filter(c: &mut Criterion) {
    let records = stock(5_000);
    let granite = MaterialFilter::Only("Granite".to_string());

    c.bench_function("search_substring_5k", |b| {
        let mut index = SearchIndex::new();
        b.iter(|| index.search(black_box(&records), black_box("style 12")).len())
    });

    c.bench_function("search_then_exact_material_5k", |b| {
        let mut index = SearchIndex::new();
        b.iter(|| {
            let searched = index.search(black_box(&records), black_box("x9"));
            index.filter_by_material(searched, &granite).len()
        })
    });

    c.bench_function("contains_material_5k", |b| {
        let mut index = SearchIndex::new().with_material_match(MaterialMatch::Contains);
        let quartz = MaterialFilter::Only("quartz".to_string());
        b.iter(|| index.filter_by_material(black_box(&records), &quartz).len())
    });
}

criterion_group!(benches, bench_search_and_filter);
criterion_main!(benches);
