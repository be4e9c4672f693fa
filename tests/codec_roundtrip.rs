use aufp::{
    compress, compress_fingerprint, decode_fingerprint, decompress, decompress_fingerprint,
    encode_fingerprint, simhash, Algorithm, CodecError, Fingerprint, PipelineError,
};

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
fn round_trip_preserves_items_and_algorithm() {
    for id in 0u8..=4 {
        let items = pseudo_items(500, id as u64 + 1);
        let blob = compress(&items, id).unwrap();
        let (decoded, algorithm) = decompress(&blob).unwrap();
        assert_eq!(decoded, items);
        assert_eq!(algorithm, id);
    }
}

#[test]
fn fixed_thirty_item_fingerprint_round_trips_through_base64() {
    // A fixed fingerprint with small, realistic deltas between items.
    let mut items = vec![0x2C57_1E4Au32];
    for i in 1..30 {
        let previous = items[i - 1];
        items.push(previous ^ (1 << (i % 7)) ^ ((i as u32 & 1) << 13));
    }
    let fp = Fingerprint::new(Algorithm::V3, items);

    let encoded = encode_fingerprint(&fp).unwrap();
    // Base64 transport: URL-safe alphabet, no padding.
    assert!(encoded
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

    let decoded = decode_fingerprint(&encoded).unwrap();
    assert_eq!(decoded.algorithm, Algorithm::V3);
    assert_eq!(decoded, fp);

    // The encoding itself is stable across runs.
    assert_eq!(encoded, encode_fingerprint(&fp).unwrap());
}

#[test]
fn known_small_fingerprint_has_golden_encoding() {
    // [0, 1, 3] with algorithm 2: deltas 0, 1, 2 produce the symbol
    // stream [0][1 0][2 0], packed into bytes 0x08 0x04 after the
    // 4-byte header.
    let fp = Fingerprint::new(Algorithm::V3, vec![0x0000_0000, 0x0000_0001, 0x0000_0003]);
    let blob = compress_fingerprint(&fp).unwrap();
    assert_eq!(blob, vec![0x02, 0x00, 0x00, 0x03, 0x08, 0x04]);
    assert_eq!(encode_fingerprint(&fp).unwrap(), "AgAAAwgE");
}

#[test]
fn header_layout_is_algorithm_then_24_bit_count() {
    let fp = Fingerprint::new(Algorithm::V5, pseudo_items(70000, 5));
    let blob = compress_fingerprint(&fp).unwrap();
    assert_eq!(blob[0], 4);
    assert_eq!(
        u32::from_be_bytes([0, blob[1], blob[2], blob[3]]) as usize,
        70000
    );
}

#[test]
fn truncated_payloads_are_rejected() {
    let fp = Fingerprint::new(Algorithm::V2, pseudo_items(100, 8));
    let blob = compress_fingerprint(&fp).unwrap();

    assert!(matches!(
        decompress_fingerprint(&blob[..2]),
        Err(PipelineError::Codec(CodecError::TruncatedHeader))
    ));
    assert!(matches!(
        decompress_fingerprint(&blob[..blob.len() / 2]),
        Err(PipelineError::Codec(_))
    ));
}

#[test]
fn similar_fingerprints_have_close_simhashes() {
    let base = pseudo_items(400, 17);
    let mut tweaked = base.clone();
    for item in tweaked.iter_mut().step_by(20) {
        *item ^= 0x0000_0101;
    }
    let distance = (simhash(&base) ^ simhash(&tweaked)).count_ones();
    assert!(distance <= 4, "simhash moved {distance} bits");
}

#[test]
fn simhash_golden_values() {
    assert_eq!(simhash(&[0xFFFF_FFFF; 8]), 0xFFFF_FFFF);
    assert_eq!(simhash(&[0x0000_0000; 8]), 0x0000_0000);
}

#[test]
fn compression_is_compact_for_slowly_changing_streams() {
    // Adjacent items that differ in a couple of low bits should cost
    // well under a byte each on average.
    let mut items = vec![0x5A5A_5A5Au32];
    for i in 1..2000usize {
        let previous = items[i - 1];
        items.push(previous ^ (1 << (i % 3)));
    }
    let blob = compress(&items, 1).unwrap();
    assert!(
        blob.len() < 4 + items.len(),
        "{} bytes for {} items",
        blob.len(),
        items.len()
    );
}
