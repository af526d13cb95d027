use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use multihash_rolling::cs::hashing::{HashParamsBuilder, PowerTable, StringHash};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len).map(|_| rng.gen_range(b'a'..=b'z')).collect()
}

fn bench_build(c: &mut Criterion) {
    let table = PowerTable::shared(HashParamsBuilder::new().seed(1).build().unwrap());
    let mut group = c.benchmark_group("string_hash_build");
    for &len in &[1_000usize, 100_000, 1_000_000] {
        let data = random_bytes(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &data, |b, data| {
            b.iter(|| StringHash::from_bytes(&table, black_box(data)))
        });
    }
    group.finish();
}

fn bench_add_char(c: &mut Criterion) {
    let table = PowerTable::shared(HashParamsBuilder::new().seed(2).build().unwrap());
    let data = random_bytes(100_000);
    c.bench_function("string_hash_add_char_100k", |b| {
        b.iter(|| {
            let mut h = StringHash::new(&table);
            for &c in &data {
                h.add_char(black_box(c));
            }
            h
        })
    });
}

fn bench_queries(c: &mut Criterion) {
    let table = PowerTable::shared(HashParamsBuilder::new().seed(3).build().unwrap());
    let data = random_bytes(100_000);
    let h = StringHash::from_bytes(&table, &data);
    c.bench_function("string_hash_combined_query", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 7919) % 50_000;
            h.combined_hash(black_box(i), black_box(i + 50_000)).unwrap()
        })
    });
}

criterion_group!(benches, bench_build, bench_add_char, bench_queries);
criterion_main!(benches);
