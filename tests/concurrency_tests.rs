//! Contexts are independent state machines: distinct contexts may run on
//! distinct threads with no coordination, and concurrent use never
//! perturbs the (deterministic) results.

use std::f64::consts::PI;
use std::thread;

use aufp::{fingerprint_audio, match_fingerprints, Algorithm, Fingerprint, MatcherConfig};

fn tone(seconds: f64, freq: f64) -> Vec<i16> {
    let count = (seconds * 11025.0) as usize;
    (0..count)
        .map(|i| {
            let t = i as f64 / 11025.0;
            ((2.0 * PI * freq * t).sin() * 12000.0) as i16
        })
        .collect()
}

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

#[test]
fn parallel_fingerprinting_matches_serial_results() {
    let inputs: Vec<Vec<i16>> = (0..4)
        .map(|i| tone(4.0, 220.0 * (i + 1) as f64))
        .collect();

    let serial: Vec<_> = inputs
        .iter()
        .map(|audio| fingerprint_audio(audio, 11025, 1, Algorithm::V2, None).unwrap())
        .collect();

    let handles: Vec<_> = inputs
        .into_iter()
        .map(|audio| {
            thread::spawn(move || {
                fingerprint_audio(&audio, 11025, 1, Algorithm::V2, None).unwrap()
            })
        })
        .collect();
    let parallel: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(serial, parallel);
}

#[test]
fn parallel_matching_is_isolated() {
    let base = pseudo_items(300, 40);
    let handles: Vec<_> = (0..4u64)
        .map(|i| {
            let a = Fingerprint::new(Algorithm::V2, base.clone());
            thread::spawn(move || {
                let b = Fingerprint::new(Algorithm::V2, pseudo_items(300, 40 + i));
                match_fingerprints(&a, &b, &MatcherConfig::default()).unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // Seed 40 reproduces the base: a full-length perfect match. The
    // other seeds are unrelated noise.
    assert_eq!(results[0].len(), 1);
    assert_eq!(results[0][0].public_score(), 100);
    for result in &results[1..] {
        assert!(result.is_empty());
    }
}
