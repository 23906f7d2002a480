//! # Swap Engine Benchmarks
//!
//! | Path | Work per call |
//! |------|---------------|
//! | Hash lock | one SHA-256 |
//! | Amount parsing | decimal string to U256 |
//! | Contract build | token lookup, key unlock, two binders |

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swap_engine::{
    calculate_timelocks, create_hash_lock, parse_amount, verify_secret, SecureSecret,
    SwapContractBuilder,
};
use swap_tests::integration::fixtures::{SwapHarness, SKEW};

fn bench_hash_lock(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash-lock");
    let secret = SecureSecret::random();
    let hash = create_hash_lock(&secret);

    group.bench_function("create", |b| b.iter(|| create_hash_lock(black_box(&secret))));
    group.bench_function("verify", |b| {
        b.iter(|| verify_secret(black_box(&secret), black_box(&hash)))
    });
    group.finish();
}

fn bench_request_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("request-parsing");
    group.bench_function("parse_amount", |b| {
        b.iter(|| parse_amount(black_box("115792089237316195423570985008687907853269984665640564039457")))
    });
    group.bench_function("calculate_timelocks", |b| {
        b.iter(|| calculate_timelocks(black_box(1_700_172_800), SKEW, black_box(false)))
    });
    group.finish();
}

fn bench_contract_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("contract-build");
    let harness = SwapHarness::new();
    let (alice_trade, _) = SwapHarness::btc_for_eth();
    let (same_chain, _) = SwapHarness::eth_for_wbtc();
    let builder = harness.builder(&harness.alice);

    group.bench_function("btc_for_eth", |b| {
        b.iter(|| builder.build(harness.request(&harness.alice, &alice_trade)))
    });
    group.bench_function("eth_for_wbtc", |b| {
        b.iter(|| builder.build(harness.request(&harness.alice, &same_chain)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_hash_lock,
    bench_request_parsing,
    bench_contract_build
);
criterion_main!(benches);
