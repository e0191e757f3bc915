use bytes::Bytes;
use thiserror::Error;

use crate::constants::FRAME_HEADER_LEN;

/// Canonical frame header (fixed size).
///
/// Both fields are little-endian u64 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Index of the input chunk that produced the payload.
    pub index: u64,
    /// Payload bytes following the header.
    pub length: u64,
}

impl FrameHeader {
    // u64 index + u64 length
    pub const LEN: usize = 8 + 8;

    pub fn new(index: u64, length: u64) -> Self {
        Self { index, length }
    }

    /// Total bytes this frame occupies on the wire.
    pub fn wire_len(&self) -> u64 {
        Self::LEN as u64 + self.length
    }
}

const _: () = assert!(FrameHeader::LEN == FRAME_HEADER_LEN);

/// Owned frame: header plus encoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRecord {
    pub header: FrameHeader,
    pub payload: Bytes,
}

impl FrameRecord {
    /// Build a record whose header length always matches the payload.
    pub fn new(index: u64, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        Self {
            header: FrameHeader::new(index, payload.len() as u64),
            payload,
        }
    }

    pub fn index(&self) -> u64 {
        self.header.index
    }
}

/// Borrowed view of a frame inside a larger buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameView<'a> {
    pub header: FrameHeader,
    pub payload: &'a [u8],
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("truncated frame header: {actual} of {len} bytes", len = FrameHeader::LEN)]
    TruncatedHeader { actual: usize },

    #[error("truncated frame {index}: header declares {declared} payload bytes, only {available} remain")]
    Truncated {
        index: u64,
        declared: u64,
        available: u64,
    },

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("frame {index} declares {declared} payload bytes, limit is {max}")]
    PayloadTooLarge { index: u64, declared: u64, max: u64 },

    #[error("missing frame {expected}: {pending} later frame(s) never written")]
    MissingIndex { expected: u64, pending: usize },
}
