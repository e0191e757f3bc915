//! stream — chunked parallel compression and sequential decompression.
//!
//! This module exposes a stable public API for Rust callers and the CLI.
//! Internals are strictly layered: framing and chunking know nothing about
//! threads, the queue knows nothing about frames.

pub mod chunking;
pub mod queue;
pub mod window;
pub mod worker;
pub mod parallelism;
pub mod pipeline;
pub mod io;
pub mod core;

pub mod framing;

pub use io::{
    FrameOrder,
    InputSource,
    OutputSink,
    WriteOrder,
};

pub use parallelism::ParallelismProfile;

pub use self::core::{
    compress_file,
    compress_stream,
    decompress_file,
    decompress_stream,
    ApiConfig,
    CompressParams,
    DecompressParams,
};
