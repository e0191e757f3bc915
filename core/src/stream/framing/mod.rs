//! Wire framing for the compressed stream.
//!
//! Responsibilities:
//! - Define frame headers and records
//! - Encode frames into a canonical byte layout
//! - Decode frames with strict length validation
//!
//! Non-responsibilities:
//! - Compression
//! - IO
//! - Parallelism

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    FrameHeader,
    FrameRecord,
    FrameView,
    FrameError,
};
pub use encode::{
    encode_frame,
    encode_frame_header,
};
pub use decode::{
    parse_frame_header,
    decode_frame,
};
