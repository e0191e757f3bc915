//! rlepack — command surface over rlepack-core.
//!
//! Usage: `rlepack <compress|decompress> <INPUT> <OUTPUT> [WORKERS]`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rlepack_core::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_WORKERS};
use rlepack_core::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Compress,
    Decompress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Order {
    /// Compress: write frames in chunk order. Decompress: sort frames by index.
    Index,
    /// Compress: write frames as workers finish. Decompress: decode in file order.
    Completion,
}

#[derive(Debug, Parser)]
#[command(name = "rlepack", version, about = "Chunked parallel run-length compressor")]
struct Cli {
    #[arg(value_enum)]
    mode: Mode,

    input: PathBuf,

    output: PathBuf,

    /// Compression worker threads (ignored when decompressing).
    #[arg(default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Bytes per chunk.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Chunks allowed to queue ahead of the workers (default: 2 per worker).
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Frame ordering policy.
    #[arg(long, value_enum)]
    order: Option<Order>,

    /// Replace the compressed output instead of appending to it.
    #[arg(long)]
    truncate: bool,

    /// Print run telemetry as JSON.
    #[arg(long)]
    json: bool,
}

fn compress(cli: &Cli) -> anyhow::Result<TelemetrySnapshot> {
    let mut profile = ParallelismProfile::with_workers(cli.workers);
    if let Some(cap) = cli.queue_capacity {
        profile.queue_capacity = cap;
    }
    let params = CompressParams {
        profile,
        chunk_size: cli.chunk_size,
        write_order: match cli.order {
            Some(Order::Completion) => WriteOrder::Completion,
            Some(Order::Index) | None => WriteOrder::Index,
        },
    };

    compress_stream(
        InputSource::File(cli.input.clone()),
        OutputSink::File {
            path: cli.output.clone(),
            append: !cli.truncate,
        },
        params,
        ApiConfig::default(),
    )
    .with_context(|| {
        format!(
            "compressing {} into {}",
            cli.input.display(),
            cli.output.display()
        )
    })
}

fn decompress(cli: &Cli) -> anyhow::Result<TelemetrySnapshot> {
    let params = DecompressParams {
        frame_order: match cli.order {
            Some(Order::Index) => FrameOrder::Index,
            Some(Order::Completion) | None => FrameOrder::Stream,
        },
    };

    decompress_stream(
        InputSource::File(cli.input.clone()),
        OutputSink::File {
            path: cli.output.clone(),
            append: false,
        },
        params,
        ApiConfig::default(),
    )
    .with_context(|| {
        format!(
            "decompressing {} into {}",
            cli.input.display(),
            cli.output.display()
        )
    })
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let snapshot = match cli.mode {
        Mode::Compress => compress(cli)?,
        Mode::Decompress => decompress(cli)?,
    };

    match cli.mode {
        Mode::Compress => println!("Compression complete."),
        Mode::Decompress => println!("Decompression complete."),
    }

    if cli.json {
        println!("{}", snapshot.to_json().context("serializing telemetry")?);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::debug!("{cli:?}");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_integer_worker_count_is_a_usage_error() {
        let err = Cli::try_parse_from(["rlepack", "compress", "in", "out", "four"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn unknown_mode_is_a_usage_error() {
        let err = Cli::try_parse_from(["rlepack", "squash", "in", "out"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn missing_paths_are_a_usage_error() {
        assert!(Cli::try_parse_from(["rlepack", "compress", "in"]).is_err());
    }

    #[test]
    fn worker_count_defaults_when_omitted() {
        let cli = Cli::try_parse_from(["rlepack", "decompress", "in", "out"]).unwrap();
        assert_eq!(cli.mode, Mode::Decompress);
        assert_eq!(cli.workers, DEFAULT_WORKERS);
        assert!(!cli.truncate);
    }
}
