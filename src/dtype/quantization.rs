//! Affine quantization parameters
//!
//! A quantized sample `q` stands for the real value `scale * (q - zero_point)`.

use crate::error::{Error, Result};
use std::fmt;

/// Largest accepted `|zero_point|`
///
/// Requantization adds the zero point in f32; every integer up to 2^24 is
/// exactly representable there, so the scalar and vector paths agree bit for
/// bit.
pub const MAX_ZERO_POINT_MAGNITUDE: i32 = 1 << 24;

/// Uniform (per-tensor) quantization parameters
///
/// Equality is exact on both fields. Kernels use `==` / `!=` to decide between
/// a plain byte copy and a dequantize → quantize pass.
#[derive(Copy, Clone, PartialEq)]
pub struct QuantizationInfo {
    scale: f32,
    zero_point: i32,
}

impl QuantizationInfo {
    /// Create quantization parameters
    ///
    /// `scale` must be finite and strictly positive; `zero_point` must lie in
    /// `[-MAX_ZERO_POINT_MAGNITUDE, MAX_ZERO_POINT_MAGNITUDE]`.
    pub fn new(scale: f32, zero_point: i32) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::invalid_quantization(format!(
                "scale must be finite and positive, got {scale}"
            )));
        }
        if zero_point.unsigned_abs() > MAX_ZERO_POINT_MAGNITUDE as u32 {
            return Err(Error::invalid_quantization(format!(
                "zero point {zero_point} exceeds magnitude {MAX_ZERO_POINT_MAGNITUDE}"
            )));
        }
        Ok(Self { scale, zero_point })
    }

    /// Scale factor between quantized steps and real values
    #[inline]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Quantized value that represents real zero
    #[inline]
    pub const fn zero_point(&self) -> i32 {
        self.zero_point
    }
}

impl Default for QuantizationInfo {
    /// Identity mapping: scale 1, zero point 0
    fn default() -> Self {
        Self {
            scale: 1.0,
            zero_point: 0,
        }
    }
}

impl fmt::Debug for QuantizationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QuantizationInfo {{ scale: {}, zero_point: {} }}",
            self.scale, self.zero_point
        )
    }
}
