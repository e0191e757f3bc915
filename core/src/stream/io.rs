//! Normalized I/O, frame reader, and the ordered frame writer.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Cursor, ErrorKind, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use crate::stream::framing::{encode_frame_header, parse_frame_header, FrameError, FrameHeader, FrameRecord};
use crate::types::{IoResultExt, StreamError};

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    /// `append: true` accumulates frames onto an existing file.
    File { path: PathBuf, append: bool },
    Memory,
}

/// On-disk order of frames produced by the compressor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteOrder {
    /// Frames are written in chunk-index order regardless of which worker finishes first.
    #[default]
    Index,
    /// Frames are written as workers complete them.
    Completion,
}

/// Order in which the decompressor decodes frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameOrder {
    /// File order, frame by frame, constant memory.
    #[default]
    Stream,
    /// Buffer every frame, stable-sort by index, then decode.
    Index,
}

/// Normalize input source into a boxed reader
pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, StreamError> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => {
            let file = File::open(&p).io_context(|| format!("open input {}", p.display()))?;
            Box::new(BufReader::new(file))
        }
        InputSource::Memory(b) => Box::new(Cursor::new(b)),
    };
    Ok(reader)
}

/// Normalize output sink into a boxed writer.
///
/// With `with_buf`, `OutputSink::Memory` also hands back the shared buffer so
/// the caller can read what was written.
pub fn open_output(
    sink: OutputSink,
    with_buf: bool,
) -> Result<(Box<dyn Write + Send>, Option<Arc<Mutex<Vec<u8>>>>), StreamError> {
    match sink {
        OutputSink::Writer(w) => Ok((w, None)),
        OutputSink::File { path, append } => {
            let opened = if append {
                OpenOptions::new().create(true).append(true).open(&path)
            } else {
                File::create(&path)
            };
            let file = opened.io_context(|| format!("open output {}", path.display()))?;
            Ok((Box::new(BufWriter::new(file)), None))
        }
        OutputSink::Memory => {
            if with_buf {
                let buf = Arc::new(Mutex::new(Vec::new()));
                let writer = SharedBufferWriter { buf: buf.clone() };
                Ok((Box::new(writer), Some(buf)))
            } else {
                Ok((Box::new(io::sink()), None))
            }
        }
    }
}

/// `Write` adapter appending into a shared in-memory buffer.
pub struct SharedBufferWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Write for SharedBufferWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .buf
            .lock()
            .map_err(|_| io::Error::new(ErrorKind::Other, "shared output buffer poisoned"))?;
        guard.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ================= Utilities =================

/// Read up to `len` bytes, stopping early only at end of stream.
pub fn read_exact_or_eof<R: Read>(r: &mut R, len: usize) -> io::Result<Bytes> {
    let mut buf = vec![0u8; len];
    let mut off = 0;

    while off < len {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    buf.truncate(off);
    Ok(Bytes::from(buf))
}

// ================= Frame I/O =================

/// Read the next frame.
///
/// - zero bytes left: `Ok(None)`
/// - a partial header: logged and treated as end of stream
/// - fewer payload bytes than declared: `FrameError::Truncated`
pub fn read_frame<R: Read>(r: &mut R) -> Result<Option<FrameRecord>, StreamError> {
    let hdr_buf = read_exact_or_eof(r, FrameHeader::LEN).io_context(|| "read frame header")?;

    if hdr_buf.is_empty() {
        return Ok(None);
    }
    if hdr_buf.len() < FrameHeader::LEN {
        log::warn!(
            "[IO] {} trailing byte(s) do not form a frame header, stopping",
            hdr_buf.len()
        );
        return Ok(None);
    }

    let header = parse_frame_header(&hdr_buf)?;

    // `take` bounds the read, so a lying header cannot pull in more than it declares.
    let mut payload = Vec::new();
    let got = r
        .by_ref()
        .take(header.length)
        .read_to_end(&mut payload)
        .io_context(|| format!("read frame {} payload", header.index))?;

    if (got as u64) < header.length {
        return Err(FrameError::Truncated {
            index: header.index,
            declared: header.length,
            available: got as u64,
        }
        .into());
    }

    Ok(Some(FrameRecord {
        header,
        payload: Bytes::from(payload),
    }))
}

/// Iterator over the frames of a stream; stops after the first error.
pub struct FrameReader<R: Read> {
    inner: R,
    frames_read: u64,
    failed: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            frames_read: 0,
            failed: false,
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<FrameRecord, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match read_frame(&mut self.inner) {
            Ok(Some(frame)) => {
                self.frames_read += 1;
                Some(Ok(frame))
            }
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

// ================= Ordered writer =================

/// Single append point for compressed frames.
///
/// Lives behind the output lock: a worker holds that lock for one `push`,
/// so two frames never interleave on the wire. With `WriteOrder::Index`
/// frames arriving ahead of `next` are parked until the gap closes.
pub struct OrderedFrameWriter<W: Write> {
    out: W,
    order: WriteOrder,
    next: u64,
    pending: BTreeMap<u64, FrameRecord>,
    peak_pending: usize,
    frames_written: u64,
    bytes_written: u64,
}

impl<W: Write> OrderedFrameWriter<W> {
    pub fn new(out: W, order: WriteOrder) -> Self {
        Self {
            out,
            order,
            next: 0,
            pending: BTreeMap::new(),
            peak_pending: 0,
            frames_written: 0,
            bytes_written: 0,
        }
    }

    pub fn push(&mut self, record: FrameRecord) -> Result<(), StreamError> {
        match self.order {
            WriteOrder::Completion => self.write(&record),
            WriteOrder::Index => {
                if record.index() < self.next || self.pending.contains_key(&record.index()) {
                    return Err(StreamError::Validation(format!(
                        "duplicate frame index {}",
                        record.index()
                    )));
                }
                self.pending.insert(record.index(), record);
                self.peak_pending = self.peak_pending.max(self.pending.len());
                self.flush_ready()
            }
        }
    }

    /// Flush the sink and hand it back. Fails if any index was never delivered.
    pub fn finish(mut self) -> Result<W, StreamError> {
        if let Some((&first_parked, _)) = self.pending.iter().next() {
            log::error!(
                "[WRITER] gap at frame {}, next parked frame is {}",
                self.next,
                first_parked
            );
            return Err(FrameError::MissingIndex {
                expected: self.next,
                pending: self.pending.len(),
            }
            .into());
        }
        self.out.flush().io_context(|| "flush output")?;
        Ok(self.out)
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Frames parked waiting for an earlier index.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Largest number of frames ever held at once, counting a frame that was
    /// written straight through.
    pub fn peak_pending(&self) -> usize {
        self.peak_pending
    }

    fn flush_ready(&mut self) -> Result<(), StreamError> {
        while let Some(record) = self.pending.remove(&self.next) {
            self.write(&record)?;
            self.next += 1;
        }
        Ok(())
    }

    fn write(&mut self, record: &FrameRecord) -> Result<(), StreamError> {
        let header = encode_frame_header(&record.header);
        self.out
            .write_all(&header)
            .and_then(|_| self.out.write_all(&record.payload))
            .io_context(|| format!("write frame {}", record.index()))?;

        self.frames_written += 1;
        self.bytes_written += record.header.wire_len();
        log::debug!(
            "[WRITER] frame {} written ({} payload bytes)",
            record.index(),
            record.header.length
        );
        Ok(())
    }
}
