//! Bounded worker pool shared by the explorer and the downloader

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::defaults::DEFAULT_WORKER_THREADS;
use crate::error::{Error, Result};

/// A fixed-size pool of worker threads.
///
/// Every listing, fetch, and write call runs on one of these threads. Work
/// submitted from inside the pool (a directory fanning out to its
/// sub-directories) is picked up by idle workers, and a worker waiting on its
/// children helps execute them rather than sitting idle, so a recursive walk
/// deeper than the pool is wide cannot starve itself.
pub struct WorkerPool {
    pool: ThreadPool,
    capacity: usize,
}

impl WorkerPool {
    /// Build a pool with `capacity` worker threads.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::Pool {
                message: "capacity must be at least 1".to_string(),
            });
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(capacity)
            .thread_name(|index| format!("kata-worker-{}", index))
            .build()
            .map_err(|e| Error::Pool {
                message: e.to_string(),
            })?;

        Ok(Self { pool, capacity })
    }

    /// Build a pool sized for the expected fan-out of a template tree.
    pub fn with_default_capacity() -> Result<Self> {
        Self::new(DEFAULT_WORKER_THREADS)
    }

    /// Number of worker threads.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run `op` on a worker thread and block until it returns.
    ///
    /// Parallel iterators used inside `op` dispatch onto this pool.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("capacity", &self.capacity)
            .finish()
    }
}
