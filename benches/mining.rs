//! Performance benchmarks for header encoding, hashing and mining

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use powchain::{core::sha256, BlockHeader, Difficulty, Nonce, Payload, ProofOfWork};

fn bench_header_encode(c: &mut Criterion) {
    let header = BlockHeader::new(
        1_700_000_000,
        Payload::from("benchmark payload"),
        Some(sha256(b"previous block")),
    );
    let difficulty = Difficulty::new(8).unwrap();

    c.bench_function("header_encode", |b| {
        b.iter(|| {
            black_box(header.encode(difficulty, black_box(Nonce::new(12345))));
        });
    });
}

fn bench_digest(c: &mut Criterion) {
    let header = BlockHeader::new(
        1_700_000_000,
        Payload::from("benchmark payload"),
        Some(sha256(b"previous block")),
    );
    let difficulty = Difficulty::new(8).unwrap();
    let encoded = header.encode(difficulty, Nonce::new(12345));

    c.bench_function("sha256_digest", |b| {
        b.iter(|| {
            black_box(sha256(black_box(&encoded)));
        });
    });
}

fn bench_validate(c: &mut Criterion) {
    let header = BlockHeader::new(1_700_000_000, Payload::from("validate me"), None);
    let pow = ProofOfWork::new(&header, Difficulty::new(8).unwrap());
    let solution = pow.mine().unwrap();

    c.bench_function("validate", |b| {
        b.iter(|| {
            black_box(pow.validate(black_box(solution.nonce)));
        });
    });
}

fn bench_mine(c: &mut Criterion) {
    let header = BlockHeader::new(1_700_000_000, Payload::from("mine me"), None);

    c.bench_function("mine_difficulty_0", |b| {
        let pow = ProofOfWork::new(&header, Difficulty::new(0).unwrap());
        b.iter(|| {
            black_box(pow.mine().unwrap());
        });
    });

    c.bench_function("mine_difficulty_8", |b| {
        let pow = ProofOfWork::new(&header, Difficulty::new(8).unwrap());
        b.iter(|| {
            black_box(pow.mine().unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_header_encode,
    bench_digest,
    bench_validate,
    bench_mine
);
criterion_main!(benches);
