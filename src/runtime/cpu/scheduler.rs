//! Reference dispatcher: split a kernel's window and run the parts
//!
//! The policy is deliberately plain: one split axis, near-equal parts, one
//! part per thread. With the `rayon` feature the parts run on a rayon pool;
//! without it they run one after another on the calling thread.

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::trace;
#[cfg(feature = "rayon")]
use tracing::warn;

use crate::runtime::{Kernel, ThreadInfo};
use crate::tensor::{DIM_X, DIM_Y, MAX_DIMS, TensorPack};
use crate::window::Window;

/// Threading settings for [`CpuScheduler`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParallelismConfig {
    max_threads: Option<usize>,
    split_dimension: Option<usize>,
}

impl ParallelismConfig {
    /// `max_threads`: upper bound on parts per kernel run (`None`: one per
    /// pool thread). `split_dimension`: axis to split along (`None`: the
    /// axis with the most iterations, Y on ties).
    ///
    /// # Panics
    /// If `max_threads` is `Some(0)` or `split_dimension` is not below
    /// [`MAX_DIMS`].
    pub fn new(max_threads: Option<usize>, split_dimension: Option<usize>) -> Self {
        assert!(max_threads != Some(0), "max_threads must be positive");
        if let Some(dim) = split_dimension {
            assert!(dim < MAX_DIMS, "split dimension {dim} out of range");
        }
        Self {
            max_threads,
            split_dimension,
        }
    }

    /// Upper bound on parts per kernel run
    pub fn max_threads(&self) -> Option<usize> {
        self.max_threads
    }

    /// Fixed split axis, if any
    pub fn split_dimension(&self) -> Option<usize> {
        self.split_dimension
    }
}

/// Runs configured kernels over partitions of their windows
#[derive(Debug, Default)]
pub struct CpuScheduler {
    config: ParallelismConfig,
    #[cfg(feature = "rayon")]
    pool: Option<rayon::ThreadPool>,
}

impl CpuScheduler {
    /// Scheduler on the global rayon pool (or the calling thread)
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply threading settings
    ///
    /// With `rayon`, a bounded `max_threads` gets its own pool of that
    /// size. If the pool cannot be created the global pool is used instead.
    pub fn with_parallelism(mut self, config: ParallelismConfig) -> Self {
        self.config = config;
        #[cfg(feature = "rayon")]
        {
            self.pool = config.max_threads.and_then(|threads| {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .inspect_err(|err| warn!(threads, %err, "falling back to the global rayon pool"))
                    .ok()
            });
        }
        self
    }

    /// Current threading settings
    pub fn parallelism(&self) -> ParallelismConfig {
        self.config
    }

    /// Number of parts a window is split into, at most
    pub fn num_threads(&self) -> usize {
        #[cfg(feature = "rayon")]
        let available = match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        };
        #[cfg(not(feature = "rayon"))]
        let available = 1;

        self.config.max_threads.unwrap_or(available)
    }

    /// Run `kernel` over its whole configured window
    ///
    /// # Panics
    /// If the kernel is not configured, or on any panic raised by the
    /// kernel's run preconditions.
    pub fn schedule<K: Kernel + ?Sized>(&self, kernel: &K, pack: &TensorPack<'_>) {
        let window = *kernel
            .window()
            .unwrap_or_else(|| panic!("{}: scheduled before configure", kernel.name()));
        let axis = self
            .config
            .split_dimension
            .unwrap_or_else(|| split_axis(&window));
        let parts = window.split(axis, self.num_threads());
        let total = parts.len();
        trace!(kernel = kernel.name(), axis, parts = total, "schedule");

        if total == 1 {
            kernel.run(pack, &parts[0], &ThreadInfo::single());
            return;
        }

        #[cfg(feature = "rayon")]
        {
            let shared = SharedPack(pack);
            let work = || {
                parts.par_iter().enumerate().for_each(|(id, sub)| {
                    kernel.run(shared.get(), sub, &ThreadInfo::new(id, total));
                })
            };
            match &self.pool {
                Some(pool) => pool.install(work),
                None => work(),
            }
        }

        #[cfg(not(feature = "rayon"))]
        for (id, sub) in parts.iter().enumerate() {
            kernel.run(pack, sub, &ThreadInfo::new(id, total));
        }
    }
}

/// A pack handed to the workers of one `schedule` call
#[cfg(feature = "rayon")]
struct SharedPack<'a, 'p>(&'a TensorPack<'p>);

// SAFETY: the workers run on the parts of one `Window::split`, which are
// disjoint, and kernels write only the destination bytes of their own part.
#[cfg(feature = "rayon")]
unsafe impl Sync for SharedPack<'_, '_> {}

#[cfg(feature = "rayon")]
impl<'p> SharedPack<'_, 'p> {
    fn get(&self) -> &TensorPack<'p> {
        self.0
    }
}

/// The axis with the most iterations, Y first on ties and X last
fn split_axis(window: &Window) -> usize {
    let mut best = DIM_Y;
    for axis in (DIM_Y + 1..MAX_DIMS).chain([DIM_X]) {
        if window.num_iterations(axis) > window.num_iterations(best) {
            best = axis;
        }
    }
    best
}
