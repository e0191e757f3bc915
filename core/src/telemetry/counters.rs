//! telemetry/counters.rs
//! Mutable counters used during a pipeline run.
//!
//! Converted into an immutable `TelemetrySnapshot` at pipeline end.

use serde::{Deserialize, Serialize};

use crate::stream::framing::FrameHeader;

/// Deterministic counters collected during stream processing
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub chunks_read: u64,
    pub frames_written: u64,
    pub frames_read: u64,
    /// Uncompressed bytes (chunk data in, decoded data out).
    pub bytes_raw: u64,
    /// RLE payload bytes, excluding frame headers.
    pub bytes_encoded: u64,
    /// Frame header bytes.
    pub bytes_overhead: u64,
}

impl TelemetryCounters {
    /// Record one chunk pulled from the input.
    pub fn add_chunk(&mut self, raw_len: usize) {
        self.chunks_read += 1;
        self.bytes_raw += raw_len as u64;
    }

    /// Record one chunk encoded and appended as a frame.
    pub fn add_encoded_frame(&mut self, payload_len: usize) {
        self.frames_written += 1;
        self.bytes_encoded += payload_len as u64;
        self.bytes_overhead += FrameHeader::LEN as u64;
    }

    /// Record one frame read and decoded.
    ///
    /// - `payload_len`: encoded payload length
    /// - `raw_len`: bytes produced by the decoder
    pub fn add_decoded_frame(&mut self, payload_len: usize, raw_len: usize) {
        self.frames_read += 1;
        self.bytes_encoded += payload_len as u64;
        self.bytes_raw += raw_len as u64;
        self.bytes_overhead += FrameHeader::LEN as u64;
    }

    /// Bytes on the compressed side of the stream, headers included.
    pub fn wire_bytes(&self) -> u64 {
        self.bytes_encoded + self.bytes_overhead
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.chunks_read += other.chunks_read;
        self.frames_written += other.frames_written;
        self.frames_read += other.frames_read;
        self.bytes_raw += other.bytes_raw;
        self.bytes_encoded += other.bytes_encoded;
        self.bytes_overhead += other.bytes_overhead;
    }
}
