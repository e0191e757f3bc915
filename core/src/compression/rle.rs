//! compression/rle.rs
//! Byte-oriented run-length coding.
//!
//! Wire shape: a flat sequence of `(value, run_len)` byte pairs. Runs longer
//! than 255 are split into several pairs carrying the same value.

use crate::compression::types::ChunkCodec;
use crate::constants::MAX_RUN;

/// Encode `input` into `(value, run_len)` pairs, appending to `out`.
pub fn rle_encode_into(input: &[u8], out: &mut Vec<u8>) {
    let mut i = 0;
    while i < input.len() {
        let value = input[i];
        let mut run = 1;
        while i + run < input.len() && input[i + run] == value && run < MAX_RUN {
            run += 1;
        }
        out.push(value);
        out.push(run as u8);
        i += run;
    }
}

/// Encode `input` into a fresh buffer.
pub fn rle_encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len().min(4096) * 2);
    rle_encode_into(input, &mut out);
    out
}

/// Expand `(value, count)` pairs into `out`.
///
/// A trailing odd byte is ignored. A count of zero expands to nothing.
pub fn rle_decode_into(input: &[u8], out: &mut Vec<u8>) {
    if input.len() % 2 != 0 {
        log::debug!("[RLE] dropping trailing odd byte of {}-byte payload", input.len());
    }
    for pair in input.chunks_exact(2) {
        let (value, count) = (pair[0], pair[1] as usize);
        out.resize(out.len() + count, value);
    }
}

/// Decode `input` into a fresh buffer.
pub fn rle_decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    rle_decode_into(input, &mut out);
    out
}

/// Stateless [`ChunkCodec`] over the free functions above.
#[derive(Debug, Clone, Copy, Default)]
pub struct RleCodec;

impl ChunkCodec for RleCodec {
    fn name(&self) -> &'static str {
        "rle"
    }

    fn encode_chunk(&self, input: &[u8], out: &mut Vec<u8>) {
        rle_encode_into(input, out);
    }

    fn decode_chunk(&self, input: &[u8], out: &mut Vec<u8>) {
        rle_decode_into(input, out);
    }

    fn max_encoded_len(&self, input_len: usize) -> usize {
        input_len.saturating_mul(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_appends_without_clearing() {
        let mut out = vec![0xEE];
        rle_encode_into(b"zz", &mut out);
        assert_eq!(out, vec![0xEE, b'z', 2]);
    }

    #[test]
    fn zero_count_pair_expands_to_nothing() {
        assert_eq!(rle_decode(&[b'q', 0, b'r', 2]), b"rr".to_vec());
    }

    #[test]
    fn max_encoded_len_covers_alternating_input() {
        let input: Vec<u8> = (0..1000u32).map(|i| (i % 2) as u8).collect();
        assert_eq!(rle_encode(&input).len(), RleCodec.max_encoded_len(input.len()));
    }
}
