use byteorder::{ByteOrder, LittleEndian};

use crate::constants::MAX_FRAME_PAYLOAD;
use crate::stream::framing::types::{FrameError, FrameHeader, FrameView};

/// Parse the fixed 16-byte header at the start of `wire`.
///
/// Rejects payload lengths above `MAX_FRAME_PAYLOAD` so callers never
/// allocate on the word of a corrupt header.
#[inline]
pub fn parse_frame_header(wire: &[u8]) -> Result<FrameHeader, FrameError> {
    if wire.len() < FrameHeader::LEN {
        return Err(FrameError::TruncatedHeader { actual: wire.len() });
    }

    let index = LittleEndian::read_u64(&wire[0..8]);
    let length = LittleEndian::read_u64(&wire[8..16]);

    if length > MAX_FRAME_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            index,
            declared: length,
            max: MAX_FRAME_PAYLOAD,
        });
    }

    Ok(FrameHeader { index, length })
}

/// Decode a single frame from bytes.
///
/// Caller guarantees the slice holds exactly one frame.
pub fn decode_frame(wire: &[u8]) -> Result<FrameView<'_>, FrameError> {
    let header = parse_frame_header(wire)?;

    let available = (wire.len() - FrameHeader::LEN) as u64;
    if available < header.length {
        return Err(FrameError::Truncated {
            index: header.index,
            declared: header.length,
            available,
        });
    }

    let expected_len = FrameHeader::LEN + header.length as usize;
    if wire.len() != expected_len {
        return Err(FrameError::LengthMismatch {
            expected: expected_len,
            actual: wire.len(),
        });
    }

    Ok(FrameView {
        header,
        payload: &wire[FrameHeader::LEN..],
    })
}
