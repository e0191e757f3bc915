/// Codec seam used by the worker pool and the decompressor.
///
/// Implementations must be deterministic and chunk-local: the output for a
/// chunk depends on that chunk's bytes only.
pub trait ChunkCodec: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Encode a single chunk, appending to `out`.
    fn encode_chunk(&self, input: &[u8], out: &mut Vec<u8>);

    /// Decode a single payload, appending to `out`.
    fn decode_chunk(&self, input: &[u8], out: &mut Vec<u8>);

    /// Upper bound on the encoded size of `input_len` bytes.
    fn max_encoded_len(&self, input_len: usize) -> usize;
}
