//! telemetry/snapshot.rs
//! Immutable per-run telemetry.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Captures counters, ratio, throughput, stage timings, and elapsed duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub chunks_read: u64,
    pub frames_written: u64,
    pub frames_read: u64,
    pub bytes_raw: u64,
    pub bytes_encoded: u64,
    pub bytes_overhead: u64,
    /// `bytes_encoded / bytes_raw`. Above 1.0 when RLE expands the data.
    pub compression_ratio: f64,
    pub throughput_raw_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
    /// Most frames the ordered writer held back at once (compress, index order).
    #[serde(default)]
    pub peak_parked_frames: u64,
    /// Captured output, only with `ApiConfig::with_buf` and `OutputSink::Memory`.
    #[serde(skip)]
    pub output: Option<Vec<u8>>,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let compression_ratio = if counters.bytes_raw > 0 {
            counters.bytes_encoded as f64 / counters.bytes_raw as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_raw as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            chunks_read: counters.chunks_read,
            frames_written: counters.frames_written,
            frames_read: counters.frames_read,
            bytes_raw: counters.bytes_raw,
            bytes_encoded: counters.bytes_encoded,
            bytes_overhead: counters.bytes_overhead,
            compression_ratio,
            throughput_raw_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
            peak_parked_frames: 0,
            output: None,
        }
    }

    pub fn attach_output(&mut self, buf: Vec<u8>) {
        self.output = Some(buf);
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Bytes on the compressed side, headers included.
    pub fn wire_bytes(&self) -> u64 {
        self.bytes_encoded + self.bytes_overhead
    }

    /// Frame accounting must agree with byte accounting.
    pub fn sanity_check(&self) -> bool {
        let frames = self.frames_written.max(self.frames_read);
        self.bytes_overhead == frames * crate::constants::FRAME_HEADER_LEN as u64
            && (self.frames_written == 0 || self.frames_written == self.chunks_read)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
