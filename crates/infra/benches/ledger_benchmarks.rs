use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stockline_auth::{InMemoryActorDirectory, Role};
use stockline_core::{BranchId, Money, ProductId, Quantity, TenantId};
use stockline_events::TracingNotificationSink;
use stockline_infra::{
    Deadline, EngineConfig, InMemoryPosStore, InMemoryProductStore, Notifier, PosService,
    ProductStore, StockLedger,
};
use stockline_inventory::Product;
use stockline_pos::{CheckoutLine, CheckoutRequest};

fn product(branch_id: BranchId, sku: String, stock: u64) -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::new(),
        branch_id,
        barcode: format!("899{sku}"),
        name: format!("Item {sku}"),
        sku,
        description: String::new(),
        base_unit: "pcs".to_string(),
        units: vec![],
        cost: Money::new(500),
        price: Money::new(1_000),
        image: String::new(),
        stock,
        is_active: true,
        created_by: None,
        created_at: now,
        updated_at: now,
    }
}

/// Guarded decrement against a catalog of growing size.
fn bench_guarded_decrement(c: &mut Criterion) {
    let mut group = c.benchmark_group("guarded_decrement");

    for catalog in [10usize, 1_000, 10_000] {
        let branch = BranchId::new();
        let store = InMemoryProductStore::new();
        let mut target = None;
        for i in 0..catalog {
            let p = product(branch, format!("SKU-{i}"), u64::MAX / 2);
            target.get_or_insert(p.id);
            store.insert(p).unwrap();
        }
        let target = target.unwrap();
        let ledger = StockLedger::new(store);
        let qty = Quantity::new(1).unwrap();
        let deadline = Deadline::start(Duration::from_secs(3_600));

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("catalog", catalog), &catalog, |b, _| {
            b.iter(|| {
                ledger
                    .decrement_if_available(black_box(branch), black_box(target), qty, &deadline)
                    .unwrap()
            })
        });
    }

    group.finish();
}

/// Full checkout (price, debit, insert) by number of lines.
fn bench_checkout(c: &mut Criterion) {
    let mut group = c.benchmark_group("pos_checkout");

    for lines in [1usize, 5, 20] {
        let tenant = TenantId::new();
        let branch = BranchId::new();
        let products = Arc::new(InMemoryProductStore::new());
        let items: Vec<CheckoutLine> = (0..lines)
            .map(|i| {
                let p = product(branch, format!("SKU-{i}"), u64::MAX / 2);
                let line = CheckoutLine {
                    product_id: p.id,
                    qty: 1,
                };
                products.insert(p).unwrap();
                line
            })
            .collect();

        let directory = Arc::new(InMemoryActorDirectory::new());
        let kasir = directory.register(tenant, Role::Kasir).id;
        let config = EngineConfig::from_env().unwrap_or_default();
        let pos = PosService::new(
            StockLedger::new(products),
            Arc::new(InMemoryPosStore::new()),
            directory,
            Notifier::new(TracingNotificationSink, false),
            &config,
        )
        .unwrap();

        let request = CheckoutRequest {
            branch_id: branch,
            items,
            discount: 0,
            paid: 1_000 * lines as i64,
            payment_method: "CASH".to_string(),
            note: String::new(),
        };

        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::new("lines", lines), &lines, |b, _| {
            // Receipt numbers may collide within one millisecond; a rejected
            // insert still exercises the full rollback path.
            b.iter(|| black_box(pos.checkout(kasir, black_box(request.clone()))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_guarded_decrement, bench_checkout);
criterion_main!(benches);
