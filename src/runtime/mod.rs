//! Runtime: kernel traits and the CPU backend
//!
//! # Architecture
//!
//! ```text
//! Kernel (configured once, run on sub-windows)
//! └── cpu
//!     ├── kernels     (concatenate, quantize, simd lanes)
//!     └── CpuScheduler (splits windows, runs parts)
//! ```

mod kernel;

pub mod cpu;

pub use kernel::{Kernel, ThreadInfo};
