//! Align two synthetic fingerprints and print the resulting segments.
//!
//! Run with: `cargo run -p matcher --example match_demo`

use fingerprint::{Algorithm, Fingerprint};
use matcher::{Matcher, MatcherConfig};

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

fn main() {
    // A 500-item "recording" and a copy that starts 120 items in.
    let items = pseudo_items(500, 7);
    let excerpt = items[120..].to_vec();

    let a = Fingerprint::new(Algorithm::V2, items);
    let b = Fingerprint::new(Algorithm::V2, excerpt);

    let matcher = Matcher::new(MatcherConfig::default()).expect("valid config");
    let segments = matcher.match_fingerprints(&a, &b).expect("same algorithm");

    println!("{} segment(s)", segments.len());
    for segment in &segments {
        println!(
            "  pos1={:4} pos2={:4} duration={:4} score={:3} ({:.2}s)",
            segment.pos1,
            segment.pos2,
            segment.duration,
            segment.public_score(),
            Matcher::hash_time(a.algorithm, segment.duration),
        );
    }
}
