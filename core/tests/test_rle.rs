// Run-length codec: fixed scenarios, edge cases, and the inverse law.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rlepack_core::compression::{rle_decode, rle_encode, ChunkCodec, RleCodec};

    // ------------------------------------------------------------
    // Scenarios
    // ------------------------------------------------------------
    #[test]
    fn five_identical_bytes_make_one_pair() {
        let encoded = rle_encode(b"AAAAA");
        assert_eq!(encoded, vec![b'A', 5]);
        assert_eq!(rle_decode(&encoded), b"AAAAA".to_vec());
    }

    #[test]
    fn distinct_bytes_make_one_pair_each() {
        let encoded = rle_encode(b"AB");
        assert_eq!(encoded, vec![b'A', 1, b'B', 1]);
        assert_eq!(rle_decode(&encoded), b"AB".to_vec());
    }

    #[test]
    fn run_of_300_splits_at_255() {
        let input = vec![b'X'; 300];
        assert_eq!(rle_encode(&input), vec![b'X', 255, b'X', 45]);
    }

    #[test]
    fn run_of_exactly_255_is_one_pair() {
        assert_eq!(rle_encode(&[0u8; 255]), vec![0, 255]);
        assert_eq!(rle_encode(&[0u8; 256]), vec![0, 255, 0, 1]);
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(rle_encode(&[]).is_empty());
        assert!(rle_decode(&[]).is_empty());
    }

    // ------------------------------------------------------------
    // Malformed payloads
    // ------------------------------------------------------------
    #[test]
    fn odd_trailing_byte_is_dropped() {
        assert_eq!(rle_decode(&[b'A', 3, b'B']), b"AAA".to_vec());
        assert!(rle_decode(&[b'Z']).is_empty());
    }

    #[test]
    fn decode_never_reads_past_input() {
        // Any byte soup must decode without panicking.
        let soup: Vec<u8> = (0..=255u8).rev().collect();
        let out = rle_decode(&soup);
        let expected: usize = soup.chunks_exact(2).map(|p| p[1] as usize).sum();
        assert_eq!(out.len(), expected);
    }

    #[test]
    fn encoded_output_is_always_even() {
        for input in [&b""[..], b"a", b"ab", b"aab", &[7u8; 1000][..]] {
            assert_eq!(rle_encode(input).len() % 2, 0);
        }
    }

    // ------------------------------------------------------------
    // Trait seam
    // ------------------------------------------------------------
    #[test]
    fn codec_trait_matches_free_functions() {
        let codec: &dyn ChunkCodec = &RleCodec;
        let input = b"mississippi".to_vec();

        let mut encoded = Vec::new();
        codec.encode_chunk(&input, &mut encoded);
        assert_eq!(encoded, rle_encode(&input));

        let mut decoded = Vec::new();
        codec.decode_chunk(&encoded, &mut decoded);
        assert_eq!(decoded, input);
        assert_eq!(codec.name(), "rle");
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(input in proptest::collection::vec(any::<u8>(), 0..4096)) {
            prop_assert_eq!(rle_decode(&rle_encode(&input)), input);
        }

        #[test]
        fn long_runs_survive(value in any::<u8>(), len in 0usize..2000) {
            let input = vec![value; len];
            let encoded = rle_encode(&input);
            prop_assert_eq!(encoded.len(), 2 * len.div_ceil(255));
            prop_assert_eq!(rle_decode(&encoded), input);
        }
    }
}
