use std::f64::consts::PI;

use aufp::{
    decode_fingerprint, fingerprint_audio, match_fingerprints, Algorithm, FingerprintContext,
    MatcherConfig, MatcherContext,
};

/// An aperiodic chord progression so the chroma moves over time and no
/// two alignment offsets look alike.
fn melody(seconds: f64, sample_rate: u32, channels: u32) -> Vec<i16> {
    const SEQUENCE: [usize; 24] = [
        0, 2, 1, 3, 0, 1, 3, 2, 2, 0, 3, 1, 1, 3, 0, 2, 3, 1, 2, 0, 0, 3, 1, 2,
    ];
    let frames = (seconds * sample_rate as f64) as usize;
    let chords: [&[f64]; 4] = [
        &[261.63, 329.63, 392.00],
        &[293.66, 369.99, 440.00],
        &[329.63, 415.30, 493.88],
        &[349.23, 440.00, 523.25],
    ];
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let t = i as f64 / sample_rate as f64;
        let chord = chords[SEQUENCE[(t as usize) % SEQUENCE.len()]];
        let v: f64 = chord
            .iter()
            .map(|&f| (2.0 * PI * f * t).sin())
            .sum::<f64>()
            / chord.len() as f64;
        let sample = (v * 14000.0) as i16;
        for _ in 0..channels {
            samples.push(sample);
        }
    }
    samples
}

#[test]
fn fingerprint_encode_decode_match_chain() {
    let audio = melody(10.0, 44100, 2);
    let fp = fingerprint_audio(&audio, 44100, 2, Algorithm::V2, None).unwrap();
    assert!(fp.len() > 40, "only {} items", fp.len());

    let encoded = aufp::encode_fingerprint(&fp).unwrap();
    let decoded = decode_fingerprint(&encoded).unwrap();
    assert_eq!(decoded, fp);

    let segments = match_fingerprints(&fp, &decoded, &MatcherConfig::default()).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].duration, fp.len());
    assert_eq!(segments[0].public_score(), 100);
}

#[test]
fn clipped_recording_matches_the_original() {
    let audio = melody(20.0, 11025, 1);
    // Cut 64 hops in, so the clipped stream frames exactly like the
    // original did from that point on.
    let expected_offset = 64usize;
    let clipped = &audio[1365 * expected_offset..];

    let full = fingerprint_audio(&audio, 11025, 1, Algorithm::V2, None).unwrap();
    let tail = fingerprint_audio(clipped, 11025, 1, Algorithm::V2, None).unwrap();

    let relaxed = MatcherConfig {
        min_overlap: 40,
        ..Default::default()
    };
    let segments = match_fingerprints(&full, &tail, &relaxed).unwrap();
    assert!(!segments.is_empty(), "clipped audio did not match");

    let best = &segments[0];
    assert!(
        best.pos1.abs_diff(expected_offset) <= 12,
        "pos1 {} vs expected ~{expected_offset}",
        best.pos1
    );
    assert!(best.public_score() >= 80, "score {}", best.public_score());
}

#[test]
fn streaming_context_agrees_with_one_shot_helper() {
    let audio = melody(8.0, 44100, 2);

    let one_shot = fingerprint_audio(&audio, 44100, 2, Algorithm::V2, None).unwrap();

    let mut ctx = FingerprintContext::new(Algorithm::V2);
    ctx.start(44100, 2).unwrap();
    for chunk in audio.chunks(4410) {
        ctx.feed(chunk).unwrap();
    }
    ctx.finish().unwrap();

    assert_eq!(ctx.raw_fingerprint().unwrap(), one_shot.items);
}

#[test]
fn matcher_context_runs_over_encoded_fingerprints() {
    let audio = melody(12.0, 11025, 1);
    let fp = fingerprint_audio(&audio, 11025, 1, Algorithm::V2, None).unwrap();
    let encoded = aufp::encode_fingerprint(&fp).unwrap();

    let mut ctx = MatcherContext::with_config(MatcherConfig {
        min_overlap: 40,
        ..Default::default()
    });
    ctx.set_fingerprint(0, &encoded).unwrap();
    ctx.set_fingerprint(1, &encoded).unwrap();
    assert!(ctx.run().unwrap());
    assert!(ctx.num_segments().unwrap() >= 1);
    assert_eq!(ctx.segment_score(0).unwrap(), 100);

    let (pos1_ms, pos2_ms, duration_ms) = ctx.segment_ms(0).unwrap();
    assert_eq!(pos1_ms, 0);
    assert_eq!(pos2_ms, 0);
    assert!(duration_ms > 0);
}

#[test]
fn silence_threshold_via_yaml_config() {
    let yaml = r#"
version: "1.0"
fingerprint:
  algorithm: 1
  silence_threshold: 100
"#;
    let config = aufp::config::AufpConfig::from_yaml(yaml).unwrap();

    let mut audio = vec![0i16; 11025 * 2];
    audio.extend(melody(6.0, 11025, 1));

    let with_trim = fingerprint_audio(
        &audio,
        11025,
        1,
        config.algorithm(),
        config.fingerprint.silence_threshold,
    )
    .unwrap();
    let without_prefix = fingerprint_audio(
        &melody(6.0, 11025, 1),
        11025,
        1,
        config.algorithm(),
        config.fingerprint.silence_threshold,
    )
    .unwrap();

    assert_eq!(with_trim, without_prefix);
}
