use common::Money;
use criterion::{Criterion, criterion_group, criterion_main};
use inventory::{InMemoryStore, InventoryManager, NewProductSpec};
use reports::ReportEngine;

/// Populate a store with N products spread over a handful of categories.
async fn populate_store(store: &InMemoryStore, n: usize) {
    let manager = InventoryManager::new(store.clone());
    let categories = ["Electronics", "Food", "Office", "Furniture", ""];

    for i in 0..n {
        let spec = NewProductSpec::new(
            format!("Product {i:05}"),
            Money::from_cents(100 + i as i64),
            (i % 40) as u32,
        )
        .category(categories[i % categories.len()])
        .min_stock(10);
        manager.add_product(spec).await.unwrap();
    }
}

fn bench_report_100_products(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryStore::new();

    rt.block_on(populate_store(&store, 100));
    let engine = ReportEngine::new(store);

    c.bench_function("reports/generate_100_products", |b| {
        b.iter(|| rt.block_on(engine.generate_report()).unwrap());
    });
}

fn bench_report_5000_products(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryStore::new();

    rt.block_on(populate_store(&store, 5000));
    let engine = ReportEngine::new(store);

    c.bench_function("reports/generate_5000_products", |b| {
        b.iter(|| rt.block_on(engine.generate_report()).unwrap());
    });
}

criterion_group!(
    benches,
    bench_report_100_products,
    bench_report_5000_products
);
criterion_main!(benches);
