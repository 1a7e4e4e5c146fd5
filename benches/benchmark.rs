// Matcher and size-fit throughput benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fairshelf_core::{Audience, Catalog, Category, Item, SizeChart};
use fairshelf_fit::{recommend_size, GarmentType, UserMeasurements};
use fairshelf_similarity::{check_first_three, EquivalenceMatcher, MatchRequest};
use fairshelf_storage::builtin_catalog;
use std::sync::Arc;

const INGREDIENTS: [&str; 12] = [
    "water", "glycerin", "palmitic acid", "triethanolamine", "aloe vera", "fragrance",
    "vitamin E", "shea butter", "jojoba oil", "sodium laureth sulfate", "cocamidopropyl betaine", "citric acid",
];

fn synthetic_item(id: usize, audience: &str) -> Item {
    let ingredients = (0..6)
        .map(|k| INGREDIENTS[(id + k * 5) % INGREDIENTS.len()].to_string())
        .collect();
    Item {
        id: format!("{}{}", audience, id),
        title: format!("Brand{} Shave Gel Formula {}", id % 17, id),
        price: 1.0 + (id % 40) as f64 * 0.25,
        category: Category::PersonalCare,
        subcategory: "shave_gel".to_string(),
        brand: Some(format!("Brand{}", id % 17)),
        ingredients,
        attributes: None,
        size_chart: None,
        available_sizes: vec![],
        retailers: vec![],
        image_url: None,
    }
}

fn synthetic_catalog(size: usize) -> Arc<Catalog> {
    let mut catalog = Catalog::new();
    for i in 0..size {
        catalog
            .insert(Audience::Womens, &format!("womens gel {}", i), synthetic_item(i, "w"))
            .unwrap();
        catalog
            .insert(Audience::Mens, &format!("mens gel {}", i), synthetic_item(i, "m"))
            .unwrap();
    }
    Arc::new(catalog)
}

fn benchmark_find_equivalent(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_equivalent");

    for size in [100, 1000, 10000].iter() {
        let matcher = EquivalenceMatcher::new(synthetic_catalog(*size));
        let request = MatchRequest::new("Brand3 Shave Gel Formula 20", 11.0, Category::PersonalCare);

        group.bench_with_input(BenchmarkId::new("computed", size), size, |b, _| {
            b.iter(|| black_box(matcher.find_equivalent(black_box(&request))));
        });
    }

    let matcher = EquivalenceMatcher::new(Arc::new(builtin_catalog().unwrap()));
    let request = MatchRequest::new("Gillette Venus Original Razor", 15.99, Category::PersonalCare);
    group.bench_function("curated", |b| {
        b.iter(|| black_box(matcher.find_equivalent(black_box(&request))));
    });

    group.finish();
}

fn benchmark_first_three(c: &mut Criterion) {
    let venus = ["5 blade cartridge", "moisture strip with aloe", "ergonomic handle"];
    let fusion = ["5 blade cartridge", "lubrication strip with aloe", "precision trimmer"];

    c.bench_function("first_three", |b| {
        b.iter(|| black_box(check_first_three(black_box(&venus), black_box(&fusion))));
    });
}

fn benchmark_size_fit(c: &mut Criterion) {
    let mut chart = SizeChart::new();
    for (i, label) in ["XS", "S", "M", "L", "XL", "XXL"].iter().enumerate() {
        let step = i as f64 * 2.0;
        chart = chart.with_size(label, &[("chest", 34.0 + step), ("waist", 28.0 + step), ("length", 26.0 + i as f64)]);
    }
    let user = UserMeasurements::new(31.0, 40.0).with_chest(37.0);

    c.bench_function("recommend_size", |b| {
        b.iter(|| black_box(recommend_size(black_box(&user), &chart, GarmentType::Top)));
    });
}

criterion_group!(benches, benchmark_find_equivalent, benchmark_first_three, benchmark_size_fit);
criterion_main!(benches);
