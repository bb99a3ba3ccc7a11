//! Data type system for windowr tensors
//!
//! This module provides the `DType` enum describing the element encoding of a
//! tensor, and the affine quantization parameters attached to the 8-bit
//! quantized encodings.

mod quantization;

pub use quantization::{MAX_ZERO_POINT_MAGNITUDE, QuantizationInfo};

use std::fmt;

// ============================================================================
// DType Enum
// ============================================================================

/// Element data types understood by windowr descriptors
///
/// Kernels in this crate move bytes, so most variants only matter for their
/// element size. The two quantized variants additionally carry meaning: their
/// bytes are integers interpreted through a [`QuantizationInfo`].
///
/// # Discriminant Values
///
/// - Unknown: 0
/// - Quantized: 1-9 (QAsymm8=1, QAsymm8Signed=2)
/// - Floats: 10-19 (F64=10, F32=11, F16=12, BF16=13)
/// - Signed ints: 20-29 (I64=20, I32=21, I16=22, I8=23)
/// - Unsigned ints: 30-39 (U64=30, U32=31, U16=32, U8=33)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum DType {
    /// Uninitialized descriptor; rejected by every kernel
    #[default]
    Unknown = 0,

    // Quantized types
    /// Unsigned 8-bit asymmetric quantized, range [0, 255]
    QAsymm8 = 1,
    /// Signed 8-bit asymmetric quantized, range [-128, 127]
    QAsymm8Signed = 2,

    // Floating point types
    /// 64-bit floating point
    F64 = 10,
    /// 32-bit floating point
    F32 = 11,
    /// 16-bit floating point (IEEE 754)
    F16 = 12,
    /// 16-bit brain floating point
    BF16 = 13,

    // Integer types
    /// 64-bit signed integer
    I64 = 20,
    /// 32-bit signed integer
    I32 = 21,
    /// 16-bit signed integer
    I16 = 22,
    /// 8-bit signed integer
    I8 = 23,

    // Unsigned integer types
    /// 64-bit unsigned integer
    U64 = 30,
    /// 32-bit unsigned integer
    U32 = 31,
    /// 16-bit unsigned integer
    U16 = 32,
    /// 8-bit unsigned integer
    U8 = 33,
}

impl DType {
    /// Size of one element in bytes (0 for `Unknown`)
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::Unknown => 0,
            Self::F64 | Self::I64 | Self::U64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::F16 | Self::BF16 | Self::I16 | Self::U16 => 2,
            Self::QAsymm8 | Self::QAsymm8Signed | Self::I8 | Self::U8 => 1,
        }
    }

    /// Returns true if this is one of the 8-bit asymmetric quantized types
    #[inline]
    pub const fn is_quantized(self) -> bool {
        matches!(self, Self::QAsymm8 | Self::QAsymm8Signed)
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32 | Self::F16 | Self::BF16)
    }

    /// Returns true if the descriptor carrying this dtype was never initialized
    #[inline]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Representable integer range `[min, max]` of a quantized type
    ///
    /// Returns `None` for non-quantized types.
    #[inline]
    pub const fn quantized_range(self) -> Option<(i32, i32)> {
        match self {
            Self::QAsymm8 => Some((u8::MIN as i32, u8::MAX as i32)),
            Self::QAsymm8Signed => Some((i8::MIN as i32, i8::MAX as i32)),
            _ => None,
        }
    }

    /// Short name for display (e.g., "qasymm8", "f32")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::QAsymm8 => "qasymm8",
            Self::QAsymm8Signed => "qasymm8_signed",
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
            Self::I64 => "i64",
            Self::I32 => "i32",
            Self::I16 => "i16",
            Self::I8 => "i8",
            Self::U64 => "u64",
            Self::U32 => "u32",
            Self::U16 => "u16",
            Self::U8 => "u8",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(DType::Unknown.size_in_bytes(), 0);
        assert_eq!(DType::QAsymm8.size_in_bytes(), 1);
        assert_eq!(DType::QAsymm8Signed.size_in_bytes(), 1);
        assert_eq!(DType::F16.size_in_bytes(), 2);
        assert_eq!(DType::F32.size_in_bytes(), 4);
        assert_eq!(DType::I64.size_in_bytes(), 8);
    }

    #[test]
    fn test_quantized_range() {
        assert_eq!(DType::QAsymm8.quantized_range(), Some((0, 255)));
        assert_eq!(DType::QAsymm8Signed.quantized_range(), Some((-128, 127)));
        assert_eq!(DType::U8.quantized_range(), None);
        assert!(DType::QAsymm8.is_quantized());
        assert!(!DType::I8.is_quantized());
    }

    #[test]
    fn test_default_is_unknown() {
        assert!(DType::default().is_unknown());
        assert_eq!(DType::QAsymm8Signed.to_string(), "qasymm8_signed");
    }
}
