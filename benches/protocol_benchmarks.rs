use avdecc::entity::{EntityState, MemoryIndexStore};
use avdecc::protocol::adp::AdpPdu;
use avdecc::protocol::aecp::AecpResponder;
use avdecc::protocol::aem::{Descriptor, DescriptorType, compute_checksum};
use avdecc::testing::{self, ENTITY_MAC, frames};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn test_entity() -> EntityState {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime
        .block_on(testing::entity_state(
            &testing::entity_config(),
            MemoryIndexStore::new(),
        ))
        .unwrap()
}

fn descriptor_benchmark(c: &mut Criterion) {
    let entity = test_entity();
    let descriptor = entity.find_descriptor(DescriptorType::ENTITY, 0).unwrap();
    let record = descriptor.encode();

    c.bench_function("entity_descriptor_encode", |b| {
        b.iter(|| black_box(&descriptor).encode())
    });

    c.bench_function("entity_descriptor_checksum", |b| {
        b.iter(|| compute_checksum(black_box(&record)))
    });

    c.bench_function("entity_descriptor_decode", |b| {
        b.iter(|| Descriptor::decode(black_box(&record)).unwrap())
    });
}

fn aecp_benchmark(c: &mut Criterion) {
    let entity = test_entity();
    let responder = AecpResponder::new();
    let read_entity = frames::read_descriptor(
        ENTITY_MAC,
        entity.entity_id(),
        1,
        DescriptorType::ENTITY,
        0,
    );
    let not_ours = frames::read_descriptor(ENTITY_MAC, 0x1234, 1, DescriptorType::ENTITY, 0);

    c.bench_function("aecp_read_entity_descriptor", |b| {
        b.iter(|| responder.handle(black_box(&read_entity), &entity))
    });

    c.bench_function("aecp_drop_not_addressed", |b| {
        b.iter(|| responder.handle(black_box(&not_ours), &entity))
    });
}

fn adp_benchmark(c: &mut Criterion) {
    let discover = frames::discover(0);

    c.bench_function("adp_decode_discover", |b| {
        b.iter(|| AdpPdu::decode_frame(black_box(&discover)).unwrap())
    });
}

criterion_group!(benches, descriptor_benchmark, aecp_benchmark, adp_benchmark);
criterion_main!(benches);
