//! Concurrency limiter for external render processes.
//!
//! Every render spawns one uNmINeD process. Without a bound, a burst of tile
//! requests (or a large sweep) spawns one process per tile. The limiter hands
//! out semaphore permits; a render holds one from before its process is
//! spawned until the process exits.
//!
//! ```text
//! request ──► acquire() ──► spawn unmined ──► wait ──► drop(permit)
//!               │
//!               └── waits here when `max_concurrent` renders are in flight
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Lower bound used when the CPU count cannot be determined.
pub const FALLBACK_CONCURRENT_RENDERS: usize = 4;

/// Bounded pool of render slots shared by all worlds.
#[derive(Debug)]
pub struct RenderLimiter {
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
    in_flight: Arc<AtomicUsize>,
}

impl RenderLimiter {
    /// Creates a limiter allowing `max_concurrent` renders at once.
    ///
    /// A value of zero is raised to one so renders can always make progress.
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        tracing::info!(max_concurrent, "Created render limiter");

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a limiter sized to the number of available CPUs.
    pub fn with_defaults() -> Self {
        Self::new(default_concurrent_renders())
    }

    /// Waits for a free render slot.
    pub async fn acquire(&self) -> RenderPermit {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("render semaphore closed");
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        RenderPermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Maximum number of concurrent renders.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Number of renders currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Number of free render slots.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for RenderLimiter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Slot held for the lifetime of one render process.
#[derive(Debug)]
pub struct RenderPermit {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for RenderPermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Render slots used when the configuration does not set a limit.
pub fn default_concurrent_renders() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(FALLBACK_CONCURRENT_RENDERS)
}
