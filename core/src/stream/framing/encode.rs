use byteorder::{ByteOrder, LittleEndian};

use crate::stream::framing::types::{FrameError, FrameHeader, FrameRecord};

/// Encode a frame header.
///
/// Layout:
///
/// ```text
/// [ index  (8) ]
/// [ length (8) ]
/// ```
#[inline]
pub fn encode_frame_header(header: &FrameHeader) -> [u8; FrameHeader::LEN] {
    let mut buf = [0u8; FrameHeader::LEN];
    LittleEndian::write_u64(&mut buf[0..8], header.index);
    LittleEndian::write_u64(&mut buf[8..16], header.length);
    buf
}

/// Encode a frame record into canonical wire format: header then payload.
pub fn encode_frame(record: &FrameRecord) -> Result<Vec<u8>, FrameError> {
    let expected = record.header.length as usize;
    if record.payload.len() != expected {
        return Err(FrameError::LengthMismatch {
            expected,
            actual: record.payload.len(),
        });
    }

    let mut out = Vec::with_capacity(FrameHeader::LEN + expected);
    out.extend_from_slice(&encode_frame_header(&record.header));
    out.extend_from_slice(&record.payload);

    Ok(out)
}
