//! Chunk source: fixed-size, indexed windows over an input stream.

use std::io::Read;

use bytes::Bytes;

use crate::stream::io::read_exact_or_eof;
use crate::types::StreamError;

/// A bounded, indexed slice of the input stream, owned by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: u64,
    pub data: Bytes,
}

/// Reads the input sequentially in `chunk_size` windows.
///
/// Indices start at 0 and increase by one per chunk. Only the final chunk
/// may be shorter than `chunk_size`.
#[derive(Debug)]
pub struct ChunkReader<R: Read> {
    inner: R,
    chunk_size: usize,
    next_index: u64,
    done: bool,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R, chunk_size: usize) -> Result<Self, StreamError> {
        if chunk_size == 0 {
            return Err(StreamError::Validation("chunk size must be non-zero".into()));
        }
        Ok(Self {
            inner,
            chunk_size,
            next_index: 0,
            done: false,
        })
    }

    /// Next chunk, or `None` once the stream yields zero bytes.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, StreamError> {
        if self.done {
            return Ok(None);
        }

        let data = read_exact_or_eof(&mut self.inner, self.chunk_size)
            .map_err(|e| StreamError::io(format!("read chunk {}", self.next_index), e))?;
        if data.is_empty() {
            self.done = true;
            return Ok(None);
        }

        let chunk = Chunk {
            index: self.next_index,
            data,
        };
        self.next_index += 1;
        Ok(Some(chunk))
    }

    /// Number of chunks produced so far.
    pub fn chunks_read(&self) -> u64 {
        self.next_index
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Chunk, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
