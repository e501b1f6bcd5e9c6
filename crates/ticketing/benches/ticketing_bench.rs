use artifact_store::InMemoryArtifactStore;
use common::{Money, OrderNumber};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use order_store::InMemoryOrderStore;
use ticketing::{
    CodeGenerator, PurchaseOrchestrator, PurchaseRequest, QrCodeGenerator, TicketPayload,
};

fn sample_payload() -> TicketPayload {
    TicketPayload {
        order_number: OrderNumber::new(1234).unwrap(),
        buyer_name: "Ana Maria Lopez".to_string(),
        event_name: "Concierto de Primavera".to_string(),
        unit_price: Money::from_cents(4999),
        quantity: 3,
    }
}

fn bench_payload_encode(c: &mut Criterion) {
    let payload = sample_payload();

    c.bench_function("ticketing/payload_encode_decode", |b| {
        b.iter(|| {
            let text = black_box(&payload).encode();
            TicketPayload::decode(&text).unwrap()
        });
    });
}

fn bench_qr_generate(c: &mut Criterion) {
    let generator = QrCodeGenerator::new();
    let text = sample_payload().encode();

    c.bench_function("ticketing/qr_generate_png", |b| {
        b.iter(|| generator.generate(black_box(&text)).unwrap());
    });
}

fn bench_purchase_in_memory(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("ticketing/purchase_10_in_memory", |b| {
        b.iter(|| {
            rt.block_on(async {
                let orchestrator = PurchaseOrchestrator::new(
                    InMemoryOrderStore::new(),
                    InMemoryArtifactStore::new(),
                    QrCodeGenerator::new(),
                );
                for _ in 0..10 {
                    orchestrator
                        .purchase(&PurchaseRequest::new("Ana", "Concierto", 50.0, 2))
                        .await
                        .unwrap();
                }
            });
        });
    });
}

criterion_group!(
    benches,
    bench_payload_encode,
    bench_qr_generate,
    bench_purchase_in_memory
);
criterion_main!(benches);
