//! Worker-count and queue-depth profile for the compression pool.

use crate::constants::{DEFAULT_QUEUE_FACTOR, DEFAULT_WORKERS, MAX_QUEUE_CAP, MAX_WORKERS};
use crate::types::StreamError;

/// Parallelism configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelismProfile {
    pub workers: usize,
    /// Chunks allowed to wait in the work queue before `push` blocks.
    pub queue_capacity: usize,
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self::with_workers(DEFAULT_WORKERS)
    }
}

impl ParallelismProfile {
    pub fn new(workers: usize, queue_capacity: usize) -> Self {
        Self {
            workers,
            queue_capacity,
        }
    }

    /// `workers` with the default queue depth.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            queue_capacity: workers.saturating_mul(DEFAULT_QUEUE_FACTOR).clamp(1, MAX_QUEUE_CAP),
        }
    }

    /// Size the pool from the host.
    ///
    /// Uses all cores but one, and bounds queued chunks so that
    /// `queue_capacity * chunk_size` stays within `mem_fraction` of
    /// available memory, capped at `hard_cap`.
    pub fn dynamic(chunk_size: usize, mem_fraction: f64, hard_cap: usize) -> Self {
        let cores = num_cpus::get();
        let workers = cores.saturating_sub(1).clamp(1, MAX_WORKERS);

        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let avail_bytes = sys.available_memory();
        let budget = (avail_bytes as f64 * mem_fraction) as u64;
        let max_chunks = budget / chunk_size.max(1) as u64;

        let queue_capacity = (max_chunks.min(hard_cap as u64) as usize).clamp(1, MAX_QUEUE_CAP);

        log::debug!(
            "[PARALLELISM] {cores} cores, {avail_bytes} bytes available -> {workers} workers, queue {queue_capacity}"
        );

        Self {
            workers,
            queue_capacity,
        }
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(StreamError::Validation(format!(
                "invalid workers count: {}, must be in 1..={MAX_WORKERS}",
                self.workers
            )));
        }
        if self.queue_capacity == 0 || self.queue_capacity > MAX_QUEUE_CAP {
            return Err(StreamError::Validation(format!(
                "invalid queue capacity: {}, must be in 1..={MAX_QUEUE_CAP}",
                self.queue_capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_queue_depth_tracks_workers() {
        assert_eq!(ParallelismProfile::with_workers(3).queue_capacity, 3 * DEFAULT_QUEUE_FACTOR);
        assert_eq!(ParallelismProfile::with_workers(MAX_WORKERS).queue_capacity, (MAX_WORKERS * DEFAULT_QUEUE_FACTOR).min(MAX_QUEUE_CAP));
    }

    #[test]
    fn dynamic_profile_is_valid() {
        let profile = ParallelismProfile::dynamic(1024 * 1024, 0.25, 64);
        assert!(profile.validate().is_ok());
        assert!(profile.queue_capacity <= 64);
    }
}
