//! Property-based tests for the DCL codec
//!
//! These tests use randomized inputs to verify correctness across a wide range
//! of data patterns, settings and chunk boundaries.

use pkdcl::{
    explode_bytes, implode_bytes, ChunkCodec, CompressionHeader, CompressionMode, DclError,
    DictionarySize, Exploder, Imploder,
};
use proptest::prelude::*;

fn any_mode() -> impl Strategy<Value = CompressionMode> {
    prop_oneof![Just(CompressionMode::Binary), Just(CompressionMode::ASCII)]
}

fn any_dict_size() -> impl Strategy<Value = DictionarySize> {
    prop_oneof![
        Just(DictionarySize::Size1K),
        Just(DictionarySize::Size2K),
        Just(DictionarySize::Size4K),
    ]
}

/// Feed `data` in chunks whose sizes cycle through `sizes`
fn feed_chunked<C: ChunkCodec>(engine: &mut C, data: &[u8], sizes: &[usize]) -> Vec<u8> {
    let mut output = Vec::new();
    let mut rest = data;
    for &size in sizes.iter().cycle() {
        if rest.is_empty() {
            break;
        }
        let (chunk, tail) = rest.split_at(size.min(rest.len()));
        output.extend(engine.feed(chunk).unwrap());
        rest = tail;
    }
    output.extend(engine.finish().unwrap());
    output
}

proptest! {
    #[test]
    fn test_decompression_never_panics(data in prop::collection::vec(any::<u8>(), 0..1000)) {
        // Random data is rarely a valid stream, but must only ever produce errors
        let _ = explode_bytes(&data);
    }
}

proptest! {
    #[test]
    fn test_garbage_after_valid_header_never_panics(
        mode in 0u8..2,
        bits in 4u8..7,
        body in prop::collection::vec(any::<u8>(), 2..600),
    ) {
        let mut data = vec![mode, bits];
        data.extend_from_slice(&body);
        let _ = explode_bytes(&data);
    }
}

proptest! {
    #[test]
    fn test_round_trip(
        data in prop::collection::vec(any::<u8>(), 0..3000),
        mode in any_mode(),
        dict_size in any_dict_size(),
    ) {
        let compressed = implode_bytes(&data, mode, dict_size).unwrap();
        let header = CompressionHeader::read(&compressed).unwrap();
        prop_assert_eq!(header, CompressionHeader::new(mode, dict_size));
        prop_assert_eq!(explode_bytes(&compressed).unwrap(), data);
    }
}

proptest! {
    #[test]
    fn test_ascii_round_trip(
        data in prop::collection::vec(prop::char::range(' ', '~'), 10..500)
    ) {
        let ascii_bytes: Vec<u8> = data.into_iter().map(|c| c as u8).collect();
        let compressed =
            implode_bytes(&ascii_bytes, CompressionMode::ASCII, DictionarySize::Size2K).unwrap();
        prop_assert_eq!(explode_bytes(&compressed).unwrap(), ascii_bytes);
    }
}

proptest! {
    #[test]
    fn test_repetitive_patterns(
        pattern in prop::collection::vec(any::<u8>(), 1..20),
        repeat_count in 2..80usize,
        mode in any_mode(),
        dict_size in any_dict_size(),
    ) {
        let data = pattern.repeat(repeat_count);
        let compressed = implode_bytes(&data, mode, dict_size).unwrap();
        prop_assert_eq!(explode_bytes(&compressed).unwrap(), &data[..]);

        // Repetitive data should not expand much (some overhead is normal)
        prop_assert!(
            compressed.len() <= data.len() + 50,
            "Compression expanded too much: {} -> {}",
            data.len(),
            compressed.len()
        );
    }
}

proptest! {
    #[test]
    fn test_implode_chunking_invariance(
        data in prop::collection::vec(0u8..8, 0..2500),
        sizes in prop::collection::vec(1usize..700, 1..8),
        mode in any_mode(),
        dict_size in any_dict_size(),
    ) {
        let whole = implode_bytes(&data, mode, dict_size).unwrap();
        let chunked = feed_chunked(&mut Imploder::new(mode, dict_size), &data, &sizes);
        prop_assert_eq!(chunked, whole);
    }
}

proptest! {
    #[test]
    fn test_explode_chunking_invariance(
        data in prop::collection::vec(0u8..16, 0..2500),
        sizes in prop::collection::vec(1usize..64, 1..8),
        mode in any_mode(),
        dict_size in any_dict_size(),
    ) {
        let compressed = implode_bytes(&data, mode, dict_size).unwrap();
        let restored = feed_chunked(&mut Exploder::new(), &compressed, &sizes);
        prop_assert_eq!(restored, data);
    }
}

proptest! {
    #[test]
    fn test_compression_is_deterministic(
        data in prop::collection::vec(any::<u8>(), 0..1000),
        mode in any_mode(),
        dict_size in any_dict_size(),
    ) {
        prop_assert_eq!(
            implode_bytes(&data, mode, dict_size).unwrap(),
            implode_bytes(&data, mode, dict_size).unwrap()
        );
    }
}

proptest! {
    #[test]
    fn test_header_rejects_bad_fields(
        mode in 2u8..=255,
        bits in any::<u8>(),
        rest in any::<[u8; 2]>(),
    ) {
        let data = [mode, bits, rest[0], rest[1]];
        prop_assert!(matches!(
            CompressionHeader::read(&data),
            Err(DclError::InvalidCompressionType(m)) if m == mode
        ));
    }
}

proptest! {
    #[test]
    fn test_header_rejects_bad_dictionary(mode in 0u8..2, bits in any::<u8>()) {
        prop_assume!(!(4..=6).contains(&bits));
        prop_assert!(matches!(
            explode_bytes(&[mode, bits, 0, 0]),
            Err(DclError::InvalidDictionarySize(b)) if b == bits
        ));
    }
}

proptest! {
    #[test]
    fn test_truncation_is_detected(
        data in prop::collection::vec(any::<u8>(), 1..500),
        mode in any_mode(),
        cut in 1usize..4,
    ) {
        let compressed = implode_bytes(&data, mode, DictionarySize::Size2K).unwrap();
        let truncated = &compressed[..compressed.len().saturating_sub(cut).max(4)];
        prop_assume!(truncated.len() < compressed.len());
        prop_assert!(explode_bytes(truncated).is_err());
    }
}
