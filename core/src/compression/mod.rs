//! compression/mod.rs
//! Per-chunk run-length coding.
//!
//! Notes:
//! - Every chunk is coded independently, so chunks can be encoded in any order
//!   and on any thread.
//! - The codec is pure: no I/O, no shared state.

pub mod rle;
pub mod types;

pub use rle::{rle_decode, rle_decode_into, rle_encode, rle_encode_into, RleCodec};
pub use types::ChunkCodec;
