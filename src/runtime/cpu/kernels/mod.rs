//! CPU kernel implementations
//!
//! Windowed kernels live in their own submodules; `quantize` holds the
//! scalar transforms and `simd` the 16-byte block operations they share.

pub mod concatenate;
pub mod quantize;
pub mod simd;

pub use concatenate::{
    ConcatenateKernel, HeightConcatenateKernel, WidthConcatenateKernel,
    calculate_concatenate_shape,
};
pub use quantize::{
    dequantize_qasymm8, dequantize_qasymm8_signed, quantize_qasymm8, quantize_qasymm8_signed,
};
pub use simd::lanes::{
    BLOCK_BYTES, dequantize_qasymm8_block, dequantize_qasymm8_signed_block,
    quantize_qasymm8_block, quantize_qasymm8_signed_block, requantize_qasymm8_signed_slice,
    requantize_qasymm8_slice,
};
