//! rlepack-core
//!
//! Chunked run-length compression engine.
//! Compression fans chunks out to a worker pool, decompression is sequential.
//! No CLI, no logger installation.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

// Shared and top level module
pub mod compression;
pub mod telemetry;

// Stream layers
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{rle_decode, rle_encode, ChunkCodec, RleCodec};
    pub use crate::stream::{
        compress_stream, decompress_stream, ApiConfig, CompressParams, DecompressParams,
        FrameOrder, InputSource, OutputSink, ParallelismProfile, WriteOrder,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::StreamError;
}
