//! Shared constants for chunking, framing, and parallelism.

/// Defaults when Option<T> is None
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024; // 1 MiB
/// Smallest chunk size accepted by `CompressParams::validate`.
pub const MIN_CHUNK_SIZE: usize = 1024; // 1 KiB
/// Max chunk size sanity bound (32 MiB).
pub const MAX_CHUNK_SIZE: usize = 32 * 1024 * 1024;

/// Longest run a single RLE pair can describe.
pub const MAX_RUN: usize = u8::MAX as usize;

/// Frame header: index (8) + length (8), little-endian.
pub const FRAME_HEADER_LEN: usize = 8 + 8;
/// Largest payload a decoder will accept: worst-case RLE expansion (2x) of a max chunk.
pub const MAX_FRAME_PAYLOAD: u64 = 2 * MAX_CHUNK_SIZE as u64;

/// Worker count when the caller does not supply one.
pub const DEFAULT_WORKERS: usize = 4;
pub const MAX_WORKERS: usize = 256;

/// Default queue depth is `workers * DEFAULT_QUEUE_FACTOR`.
pub const DEFAULT_QUEUE_FACTOR: usize = 2;
pub const MAX_QUEUE_CAP: usize = 1024;
