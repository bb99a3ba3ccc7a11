//! CPU runtime implementation
//!
//! Kernels run on the calling thread or, through [`CpuScheduler`], on a
//! rayon pool with the kernel's window split into disjoint parts.

pub mod kernels;
mod scheduler;

pub use kernels::{ConcatenateKernel, HeightConcatenateKernel, WidthConcatenateKernel};
pub use scheduler::{CpuScheduler, ParallelismConfig};
