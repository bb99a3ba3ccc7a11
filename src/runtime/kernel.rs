//! Kernel traits shared by every windowed CPU kernel
//!
//! A kernel is configured once with tensor descriptors, which fixes its full
//! execution window. A dispatcher then calls [`Kernel::run`] on disjoint
//! sub-windows of that window, possibly from several threads at once:
//!
//! ```text
//! configure(descriptors)          run(pack, sub_window, thread)
//!         │                              ▲
//!         ▼                              │
//!   full window ──── split ────► sub-window 0 ─► worker 0
//!                           ├──► sub-window 1 ─► worker 1
//!                           └──► sub-window 2 ─► worker 2
//! ```
//!
//! `run` takes `&self`, so a configured kernel is shared read-only between
//! workers. Partitioning guarantees their writes never overlap.

use crate::tensor::TensorPack;
use crate::window::Window;

/// Identity of the worker executing a sub-window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThreadInfo {
    /// Index of this worker, `0..num_threads`
    pub thread_id: usize,
    /// Number of workers sharing the run
    pub num_threads: usize,
}

impl ThreadInfo {
    /// Worker `thread_id` of `num_threads`
    ///
    /// # Panics
    /// If `thread_id >= num_threads`.
    pub fn new(thread_id: usize, num_threads: usize) -> Self {
        assert!(
            thread_id < num_threads,
            "thread id {thread_id} out of range for {num_threads} threads"
        );
        Self {
            thread_id,
            num_threads,
        }
    }

    /// The only worker of a single-threaded run
    pub const fn single() -> Self {
        Self {
            thread_id: 0,
            num_threads: 1,
        }
    }
}

impl Default for ThreadInfo {
    fn default() -> Self {
        Self::single()
    }
}

/// A configured unit of work over a window
pub trait Kernel: Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// The full window computed at configure time, `None` before that
    fn window(&self) -> Option<&Window>;

    /// Whether `configure` has been called
    fn is_configured(&self) -> bool {
        self.window().is_some()
    }

    /// Execute the kernel on `window`, a sub-window of [`Kernel::window`]
    ///
    /// Runs on one thread. [`TensorPack`] is not `Sync`, so parallel
    /// execution over disjoint parts goes through
    /// [`CpuScheduler::schedule`](crate::runtime::cpu::CpuScheduler::schedule).
    ///
    /// # Panics
    /// If the kernel is not configured, if `window` is not a sub-window of
    /// the configured window, or if the tensors in `pack` do not match the
    /// descriptors the kernel was configured with.
    fn run(&self, pack: &TensorPack<'_>, window: &Window, info: &ThreadInfo);
}
