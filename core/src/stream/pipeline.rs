//! Pipeline wiring: chunk source -> work queue -> worker pool -> ordered writer,
//! and the sequential frame decoder.

use std::io::{Read, Write};
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use crate::compression::ChunkCodec;
use crate::constants::DEFAULT_CHUNK_SIZE;
use crate::stream::chunking::{Chunk, ChunkReader};
use crate::stream::framing::FrameRecord;
use crate::stream::io::{FrameOrder, FrameReader, OrderedFrameWriter, WriteOrder};
use crate::stream::parallelism::ParallelismProfile;
use crate::stream::queue::WorkQueue;
use crate::stream::window::InflightWindow;
use crate::stream::worker::{run_compression_worker, WorkerContext, WorkerReport};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::{IoResultExt, StreamError};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub profile: ParallelismProfile,
    pub chunk_size: usize,
    pub write_order: WriteOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            profile: ParallelismProfile::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            write_order: WriteOrder::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new(profile: ParallelismProfile, chunk_size: usize, write_order: WriteOrder) -> Self {
        Self {
            profile,
            chunk_size,
            write_order,
        }
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.chunk_size == 0 {
            return Err(StreamError::Validation("chunk_size must be > 0".into()));
        }
        self.profile.validate()
    }

    /// Chunks admitted at once: one per worker plus a full queue.
    pub fn inflight_window(&self) -> usize {
        self.profile.workers + self.profile.queue_capacity
    }
}

// ============================================================
// Compress pipeline
// ============================================================
pub fn run_compress_pipeline<R, W, C>(
    reader: R,
    writer: W,
    codec: &C,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, StreamError>
where
    R: Read,
    W: Write + Send,
    C: ChunkCodec + ?Sized,
{
    config.validate()?;

    let mut timer = TelemetryTimer::new();
    let mut counters = TelemetryCounters::default();
    let workers = config.profile.workers;

    log::info!(
        "[PIPELINE] compress start: codec={}, workers={}, chunk_size={}, queue={}, window={}, order={:?}",
        codec.name(),
        workers,
        config.chunk_size,
        config.profile.queue_capacity,
        config.inflight_window(),
        config.write_order
    );

    // ---- Shared state: two independent locks ----
    let queue = WorkQueue::<Chunk>::bounded(config.profile.queue_capacity);
    let sink = Mutex::new(OrderedFrameWriter::new(writer, config.write_order));
    let window = InflightWindow::new(config.inflight_window());
    let ctx = WorkerContext {
        codec,
        queue: &queue,
        sink: &sink,
        window: &window,
    };

    let mut chunks = ChunkReader::new(reader, config.chunk_size)?;

    let (produced, joined) = thread::scope(|scope| {
        // ---- Workers ----
        let mut handles = Vec::with_capacity(workers);
        let mut spawn_err = None;
        for i in 0..workers {
            let ctx = &ctx;
            let spawned = thread::Builder::new()
                .name(format!("rle-worker-{i}"))
                .spawn_scoped(scope, move || {
                    log::debug!("[WORKER-{i}] starting");
                    let res = run_compression_worker(i, ctx);
                    log::debug!("[WORKER-{i}] finished");
                    res
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    spawn_err = Some(StreamError::io(format!("spawn worker {i}"), e));
                    break;
                }
            }
        }

        // ---- Reader (this thread) ----
        let produced = match spawn_err {
            Some(e) => {
                window.abort();
                Err(e)
            }
            None => produce_chunks(&mut chunks, &queue, &window, &mut counters, &mut timer),
        };

        // Close even on error, otherwise idle workers never wake.
        let closed = queue.close().map_err(StreamError::from);
        log::debug!("[READER] finished after {} chunk(s), queue closed", chunks.chunks_read());

        let joined: Vec<thread::Result<Result<WorkerReport, StreamError>>> =
            handles.into_iter().map(|h| h.join()).collect();

        (produced.and(closed), joined)
    });

    // ---- Collect workers: a worker failure outranks the reader's reaction to it ----
    let mut first_err: Option<StreamError> = None;
    for res in joined {
        match res {
            Ok(Ok(report)) => {
                counters.merge(&report.counters);
                timer.stage_times.merge(&report.stage_times);
            }
            Ok(Err(e)) => {
                first_err.get_or_insert(e);
            }
            Err(_) => {
                first_err.get_or_insert(StreamError::PipelineError("compression worker panicked"));
            }
        }
    }
    if let Some(e) = first_err {
        return Err(e);
    }
    produced?;

    // ---- Drain the writer ----
    let writer = sink
        .into_inner()
        .map_err(|_| StreamError::PipelineError("output lock poisoned"))?;
    let frames = writer.frames_written();
    let peak_parked = writer.peak_pending();
    let start = Instant::now();
    writer.finish()?;
    timer.add_stage_time(Stage::Write, start.elapsed());

    timer.finish();
    let mut snapshot = TelemetrySnapshot::from(&counters, &timer);
    snapshot.peak_parked_frames = peak_parked as u64;
    log::info!(
        "[PIPELINE] compress done: {} chunk(s), {} frame(s), peak parked {}, {} -> {} bytes",
        snapshot.chunks_read,
        frames,
        peak_parked,
        snapshot.bytes_raw,
        snapshot.wire_bytes()
    );
    Ok(snapshot)
}

fn produce_chunks<R: Read>(
    chunks: &mut ChunkReader<R>,
    queue: &WorkQueue<Chunk>,
    window: &InflightWindow,
    counters: &mut TelemetryCounters,
    timer: &mut TelemetryTimer,
) -> Result<(), StreamError> {
    loop {
        // Blocks while the window is full, i.e. while a slow chunk holds back
        // the writer and later frames are parked behind it.
        if !window.acquire() {
            log::warn!(
                "[READER] worker failure, stopping at chunk {}",
                chunks.chunks_read()
            );
            return Ok(());
        }

        let next = timer.time(Stage::Read, || chunks.next_chunk());
        let chunk = match next {
            Ok(Some(chunk)) => chunk,
            Ok(None) => {
                window.release(1);
                return Ok(());
            }
            Err(e) => {
                window.abort();
                return Err(e);
            }
        };

        log::debug!("[READER] dispatching chunk {} ({} bytes)", chunk.index, chunk.data.len());
        counters.add_chunk(chunk.data.len());
        queue.push(chunk)?;
    }
}

// ============================================================
// Decompress pipeline
// ============================================================
pub fn run_decompress_pipeline<R, W, C>(
    reader: R,
    mut writer: W,
    codec: &C,
    order: FrameOrder,
) -> Result<TelemetrySnapshot, StreamError>
where
    R: Read,
    W: Write,
    C: ChunkCodec + ?Sized,
{
    let mut timer = TelemetryTimer::new();
    let mut counters = TelemetryCounters::default();
    let mut frames = FrameReader::new(reader);

    log::info!("[PIPELINE] decompress start: codec={}, order={:?}", codec.name(), order);

    let mut decoded = Vec::new();
    let mut emit = |frame: &FrameRecord,
                    timer: &mut TelemetryTimer,
                    counters: &mut TelemetryCounters|
     -> Result<(), StreamError> {
        decoded.clear();
        timer.time(Stage::Decode, || codec.decode_chunk(&frame.payload, &mut decoded));

        let start = Instant::now();
        writer
            .write_all(&decoded)
            .io_context(|| format!("write decoded frame {}", frame.index()))?;
        timer.add_stage_time(Stage::Write, start.elapsed());

        counters.add_decoded_frame(frame.payload.len(), decoded.len());
        log::debug!("[DECODER] frame {} -> {} bytes", frame.index(), decoded.len());
        Ok(())
    };

    match order {
        FrameOrder::Stream => {
            while let Some(frame) = timer.time(Stage::Read, || frames.next()) {
                emit(&frame?, &mut timer, &mut counters)?;
            }
        }
        FrameOrder::Index => {
            let mut all = Vec::new();
            while let Some(frame) = timer.time(Stage::Read, || frames.next()) {
                all.push(frame?);
            }
            // Stable: frames sharing an index keep their file order.
            all.sort_by_key(FrameRecord::index);
            for frame in &all {
                emit(frame, &mut timer, &mut counters)?;
            }
        }
    }

    writer.flush().io_context(|| "flush output")?;

    timer.finish();
    let snapshot = TelemetrySnapshot::from(&counters, &timer);
    debug_assert_eq!(frames.frames_read(), snapshot.frames_read);
    log::info!(
        "[PIPELINE] decompress done: {} frame(s), {} -> {} bytes",
        frames.frames_read(),
        snapshot.wire_bytes(),
        snapshot.bytes_raw
    );
    Ok(snapshot)
}
