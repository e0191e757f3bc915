//! Compression worker loop.
//!
//! Each worker pops a chunk, encodes it, then appends one frame under the
//! output lock. The queue lock and the output lock are never held together.
//! Every chunk carries one in-flight token; the worker hands it back once the
//! frame has actually reached the output, or when it drops the chunk.

use std::io::Write;
use std::sync::Mutex;
use std::time::Instant;

use bytes::Bytes;

use crate::compression::ChunkCodec;
use crate::stream::chunking::Chunk;
use crate::stream::framing::FrameRecord;
use crate::stream::io::OrderedFrameWriter;
use crate::stream::queue::WorkQueue;
use crate::stream::window::InflightWindow;
use crate::telemetry::{Stage, StageTimes, TelemetryCounters};
use crate::types::StreamError;

/// What one worker did during a run; merged by the orchestrator.
#[derive(Debug, Default, Clone)]
pub struct WorkerReport {
    pub worker: usize,
    pub counters: TelemetryCounters,
    pub stage_times: StageTimes,
    /// Chunks popped and discarded after the run was aborted.
    pub chunks_drained: u64,
}

/// Shared state a worker borrows for the duration of a run.
pub struct WorkerContext<'a, C: ?Sized, W: Write> {
    pub codec: &'a C,
    pub queue: &'a WorkQueue<Chunk>,
    pub sink: &'a Mutex<OrderedFrameWriter<W>>,
    /// Aborted by the first worker that fails; everyone else switches to draining.
    pub window: &'a InflightWindow,
}

/// Single compression worker loop.
///
/// Returns once the queue is closed and empty. After a failure (its own or
/// another worker's) the worker keeps popping without encoding, so a
/// producer blocked on a full queue always makes progress.
pub fn run_compression_worker<C, W>(
    worker: usize,
    ctx: &WorkerContext<'_, C, W>,
) -> Result<WorkerReport, StreamError>
where
    C: ChunkCodec + ?Sized,
    W: Write,
{
    let mut report = WorkerReport {
        worker,
        ..WorkerReport::default()
    };
    let mut failure: Option<StreamError> = None;

    while let Some(chunk) = ctx.queue.pop() {
        if failure.is_some() || ctx.window.is_aborted() {
            report.chunks_drained += 1;
            ctx.window.release(1);
            continue;
        }

        let index = chunk.index;
        if let Err(e) = encode_and_append(ctx, chunk, &mut report) {
            log::error!("[WORKER-{worker}] chunk {index} failed: {e}");
            ctx.window.abort();
            failure = Some(e);
        }
    }

    if report.chunks_drained > 0 {
        log::debug!("[WORKER-{worker}] drained {} chunk(s) after abort", report.chunks_drained);
    }

    match failure {
        Some(e) => Err(StreamError::Worker {
            worker,
            source: Box::new(e),
        }),
        None => Ok(report),
    }
}

fn encode_and_append<C, W>(
    ctx: &WorkerContext<'_, C, W>,
    chunk: Chunk,
    report: &mut WorkerReport,
) -> Result<(), StreamError>
where
    C: ChunkCodec + ?Sized,
    W: Write,
{
    let start = Instant::now();
    let mut encoded = Vec::with_capacity(chunk.data.len().min(64 * 1024));
    ctx.codec.encode_chunk(&chunk.data, &mut encoded);
    report.stage_times.add(Stage::Encode, start.elapsed());

    let payload_len = encoded.len();
    let record = FrameRecord::new(chunk.index, Bytes::from(encoded));

    let start = Instant::now();
    {
        let mut sink = ctx
            .sink
            .lock()
            .map_err(|_| StreamError::PipelineError("output lock poisoned"))?;
        let before = sink.frames_written();
        sink.push(record)?;
        // Zero when the frame was parked, several when it unblocked a run.
        ctx.window.release((sink.frames_written() - before) as usize);
    }
    report.stage_times.add(Stage::Write, start.elapsed());

    report.counters.add_encoded_frame(payload_len);
    log::trace!(
        "[WORKER-{}] chunk {} -> {} bytes",
        report.worker,
        chunk.index,
        payload_len
    );
    Ok(())
}
