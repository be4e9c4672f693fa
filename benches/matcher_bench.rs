use criterion::{black_box, criterion_group, criterion_main, Criterion};

use aufp::{match_fingerprints, Algorithm, Fingerprint, MatcherConfig};

fn pseudo_items(count: usize, seed: u64) -> Vec<u32> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).max(1);
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 32) as u32
        })
        .collect()
}

fn bench_matcher(c: &mut Criterion) {
    let config = MatcherConfig::default();
    let mut group = c.benchmark_group("matcher");

    for &size in &[250usize, 1000, 2500] {
        let items = pseudo_items(size, 1);
        let mut shifted = pseudo_items(size, 2);
        let keep = size / 2;
        shifted[..keep].copy_from_slice(&items[size - keep..]);
        let a = Fingerprint::new(Algorithm::V2, items);
        let b = Fingerprint::new(Algorithm::V2, shifted);

        group.bench_function(format!("overlap_{size}_items"), |bench| {
            bench.iter(|| {
                match_fingerprints(black_box(&a), black_box(&b), &config).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_matcher);
criterion_main!(benches);
