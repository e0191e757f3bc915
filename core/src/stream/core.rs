//! Stable public API over the pipelines.

use std::path::Path;

use crate::compression::RleCodec;
use crate::constants::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use crate::stream::io::{open_input, open_output, FrameOrder, InputSource, OutputSink, WriteOrder};
use crate::stream::parallelism::ParallelismProfile;
use crate::stream::pipeline::{run_compress_pipeline, run_decompress_pipeline, PipelineConfig};
use crate::telemetry::TelemetrySnapshot;
use crate::types::StreamError;

#[derive(Clone, Debug)]
pub struct CompressParams {
    pub profile: ParallelismProfile,
    pub chunk_size: usize,
    pub write_order: WriteOrder,
}

impl Default for CompressParams {
    fn default() -> Self {
        Self {
            profile: ParallelismProfile::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            write_order: WriteOrder::Index,
        }
    }
}

impl CompressParams {
    /// Default chunking and order with `workers` threads.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            profile: ParallelismProfile::with_workers(workers),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        self.profile.validate()?;
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            return Err(StreamError::Validation(format!(
                "invalid chunk size: {}, must be in {MIN_CHUNK_SIZE}..={MAX_CHUNK_SIZE}",
                self.chunk_size
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct DecompressParams {
    pub frame_order: FrameOrder,
}

#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Capture `OutputSink::Memory` output into the returned snapshot.
    pub with_buf: bool,
}

impl ApiConfig {
    pub fn with_buf_enabled() -> Self {
        Self { with_buf: true }
    }
}

/// Compress `input` into framed RLE records.
pub fn compress_stream(
    input: InputSource,
    output: OutputSink,
    params: CompressParams,
    config: ApiConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    params.validate()?;

    let reader = open_input(input)?;
    let (writer, maybe_buf) = open_output(output, config.with_buf)?;

    let config_pipe = PipelineConfig::new(params.profile, params.chunk_size, params.write_order);
    let mut snapshot = run_compress_pipeline(reader, writer, &RleCodec, &config_pipe)?;

    if let Some(buf) = maybe_buf {
        let buf = buf
            .lock()
            .map_err(|_| StreamError::PipelineError("output buffer poisoned"))?;
        snapshot.attach_output(buf.clone());
    }

    Ok(snapshot)
}

/// Decode a framed stream back into the original bytes.
pub fn decompress_stream(
    input: InputSource,
    output: OutputSink,
    params: DecompressParams,
    config: ApiConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    let reader = open_input(input)?;
    let (writer, maybe_buf) = open_output(output, config.with_buf)?;

    let mut snapshot = run_decompress_pipeline(reader, writer, &RleCodec, params.frame_order)?;

    if let Some(buf) = maybe_buf {
        let buf = buf
            .lock()
            .map_err(|_| StreamError::PipelineError("output buffer poisoned"))?;
        snapshot.attach_output(buf.clone());
    }

    Ok(snapshot)
}

/// File-to-file compression. Appends to `output` if it already exists.
pub fn compress_file(
    input: &Path,
    output: &Path,
    workers: usize,
) -> Result<TelemetrySnapshot, StreamError> {
    compress_stream(
        InputSource::File(input.to_path_buf()),
        OutputSink::File {
            path: output.to_path_buf(),
            append: true,
        },
        CompressParams::with_workers(workers),
        ApiConfig::default(),
    )
}

/// File-to-file decompression. Replaces `output`.
pub fn decompress_file(input: &Path, output: &Path) -> Result<TelemetrySnapshot, StreamError> {
    decompress_stream(
        InputSource::File(input.to_path_buf()),
        OutputSink::File {
            path: output.to_path_buf(),
            append: false,
        },
        DecompressParams::default(),
        ApiConfig::default(),
    )
}
