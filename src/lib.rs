//! # windowr
//!
//! **Windowed tensor kernels for CPUs, with quantization-aware concatenation.**
//!
//! windowr describes tensors by their byte layout, describes work as
//! N-dimensional windows over index space, and runs kernels on disjoint
//! sub-windows so one configured kernel can be shared by many threads.
//!
//! ## Features
//!
//! - **Descriptors**: shapes up to 6 dimensions, byte strides, padding,
//!   first-element offsets, 8-bit asymmetric quantization parameters
//! - **Windows**: per-axis `(start, end, step)` ranges, splitting into
//!   disjoint near-equal parts, lock-step iteration over several tensors
//! - **Concatenation**: height and width kernels that copy an input into an
//!   output at an offset, requantizing QASYMM8 / QASYMM8_SIGNED data when the
//!   two sides' quantization differs
//! - **SIMD**: 16-byte blocks on SSE2 (x86-64) and NEON (AArch64), scalar
//!   tails; vector and scalar paths give identical bytes
//!
//! ## Quick Start
//!
//! ```rust
//! use windowr::prelude::*;
//!
//! # fn main() -> windowr::error::Result<()> {
//! let input_info = TensorInfo::new([4, 3], DType::U8)?;
//! let output_info = TensorInfo::new([4, 5], DType::U8)?;
//! let input = Tensor::from_slice(input_info.clone(), &[7u8; 12])?;
//! let mut output = Tensor::zeros(output_info.clone());
//!
//! HeightConcatenateKernel::validate(Some(&input_info), 2, Some(&output_info))?;
//! let mut kernel = HeightConcatenateKernel::new();
//! let region = kernel.configure(&input_info, 2, &output_info);
//!
//! let pack = TensorPack::new(input.view(), output.view_mut());
//! CpuScheduler::new().schedule(&kernel, &pack);
//! output.set_valid_region(region);
//!
//! assert_eq!(&output.as_bytes()[..8], &[0u8; 8]);
//! assert_eq!(&output.as_bytes()[8..], &[7u8; 12]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): run window partitions on a rayon thread pool
//!
//! ## Logging
//!
//! Kernels emit `tracing` events (`debug` at configure, `trace` per run).
//! The library never installs a subscriber.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod tensor;
pub mod window;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, QuantizationInfo};
    pub use crate::error::{Error, Result};
    pub use crate::ops::ConcatenateLayer;
    pub use crate::runtime::cpu::{
        ConcatenateKernel, CpuScheduler, HeightConcatenateKernel, ParallelismConfig,
        WidthConcatenateKernel,
    };
    pub use crate::runtime::{Kernel, ThreadInfo};
    pub use crate::tensor::{
        PaddingSize, Shape, Tensor, TensorInfo, TensorMut, TensorPack, TensorRef, ValidRegion,
    };
    pub use crate::window::{Dimension, Steps, Window, WindowIterator, execute_window_loop};
}
