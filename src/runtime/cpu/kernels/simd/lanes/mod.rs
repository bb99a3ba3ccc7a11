//! 16-byte block operations for byte-level kernels
//!
//! A [`ByteLanes`] implementation moves one 16-byte block at a time: a plain
//! copy, or a dequantize → quantize round trip through 16 f32 lanes. Row
//! loops are written once over the trait and instantiated per instruction
//! set; positions past the last whole block go through the scalar transform.
//!
//! # Exactness
//!
//! Every implementation performs the same f32 operations in the same order
//! as `kernels::quantize`: subtract, convert, multiply to dequantize; divide,
//! zero NaN, clamp, round half-to-even, add, saturate to quantize. Vector and scalar
//! results are therefore identical byte for byte.

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "x86_64")]
mod sse2;

use super::detect_simd;
use crate::dtype::QuantizationInfo;
use crate::runtime::cpu::kernels::quantize::{
    QUANTIZE_LIMIT, dequantize_qasymm8, dequantize_qasymm8_signed, quantize_qasymm8,
    quantize_qasymm8_signed,
};

#[cfg(target_arch = "aarch64")]
pub(crate) use aarch64::neon::NeonLanes;
#[cfg(target_arch = "x86_64")]
pub(crate) use sse2::Sse2Lanes;

/// Bytes per block
pub const BLOCK_BYTES: usize = 16;

/// One instruction set's 16-byte block operations
///
/// # Safety
/// Every method reads or writes exactly one block behind its pointers. The
/// caller guarantees those bytes (or 16 `f32`s for the real-valued loads and
/// stores) are valid; pointers need not be aligned.
pub(crate) trait ByteLanes {
    /// 16 dequantized values held in registers
    type Real: Copy;

    /// Copy 16 bytes
    unsafe fn copy_block(src: *const u8, dst: *mut u8);

    /// Dequantize 16 unsigned samples
    unsafe fn dequantize_u8(src: *const u8, qinfo: &QuantizationInfo) -> Self::Real;

    /// Dequantize 16 signed samples
    unsafe fn dequantize_i8(src: *const i8, qinfo: &QuantizationInfo) -> Self::Real;

    /// Quantize 16 values to unsigned samples
    unsafe fn quantize_u8(values: Self::Real, dst: *mut u8, qinfo: &QuantizationInfo);

    /// Quantize 16 values to signed samples
    unsafe fn quantize_i8(values: Self::Real, dst: *mut i8, qinfo: &QuantizationInfo);

    /// Load 16 `f32`s
    unsafe fn load_real(src: *const f32) -> Self::Real;

    /// Store 16 `f32`s
    unsafe fn store_real(values: Self::Real, dst: *mut f32);
}

/// Block operations without vector instructions
pub(crate) struct ScalarLanes;

impl ByteLanes for ScalarLanes {
    type Real = [f32; BLOCK_BYTES];

    #[inline(always)]
    unsafe fn copy_block(src: *const u8, dst: *mut u8) {
        unsafe { std::ptr::copy_nonoverlapping(src, dst, BLOCK_BYTES) }
    }

    #[inline(always)]
    unsafe fn dequantize_u8(src: *const u8, qinfo: &QuantizationInfo) -> Self::Real {
        std::array::from_fn(|i| dequantize_qasymm8(unsafe { *src.add(i) }, qinfo))
    }

    #[inline(always)]
    unsafe fn dequantize_i8(src: *const i8, qinfo: &QuantizationInfo) -> Self::Real {
        std::array::from_fn(|i| dequantize_qasymm8_signed(unsafe { *src.add(i) }, qinfo))
    }

    #[inline(always)]
    unsafe fn quantize_u8(values: Self::Real, dst: *mut u8, qinfo: &QuantizationInfo) {
        for (i, v) in values.into_iter().enumerate() {
            unsafe { *dst.add(i) = quantize_qasymm8(v, qinfo) };
        }
    }

    #[inline(always)]
    unsafe fn quantize_i8(values: Self::Real, dst: *mut i8, qinfo: &QuantizationInfo) {
        for (i, v) in values.into_iter().enumerate() {
            unsafe { *dst.add(i) = quantize_qasymm8_signed(v, qinfo) };
        }
    }

    #[inline(always)]
    unsafe fn load_real(src: *const f32) -> Self::Real {
        unsafe { std::ptr::read_unaligned(src.cast::<[f32; BLOCK_BYTES]>()) }
    }

    #[inline(always)]
    unsafe fn store_real(values: Self::Real, dst: *mut f32) {
        unsafe { std::ptr::write_unaligned(dst.cast::<[f32; BLOCK_BYTES]>(), values) }
    }
}

/// Lower/upper clamp for `r / scale` before rounding
#[inline(always)]
pub(crate) const fn quantize_bounds() -> (f32, f32) {
    (-QUANTIZE_LIMIT, QUANTIZE_LIMIT)
}

// ============================================================================
// Row loops
// ============================================================================

/// Copy bytes `[start, end)` of a row
///
/// # Safety
/// `src` and `dst` must be valid for `end` bytes and must not overlap.
#[inline(always)]
pub(crate) unsafe fn copy_row<L: ByteLanes>(src: *const u8, dst: *mut u8, start: usize, end: usize) {
    let mut x = start;
    while x + BLOCK_BYTES <= end {
        unsafe { L::copy_block(src.add(x), dst.add(x)) };
        x += BLOCK_BYTES;
    }
    while x < end {
        unsafe { *dst.add(x) = *src.add(x) };
        x += 1;
    }
}

/// Requantize unsigned samples `[start, end)` of a row from `from` to `to`
///
/// # Safety
/// `src` and `dst` must be valid for `end` bytes and must not overlap.
#[inline(always)]
pub(crate) unsafe fn requantize_u8_row<L: ByteLanes>(
    src: *const u8,
    dst: *mut u8,
    start: usize,
    end: usize,
    from: &QuantizationInfo,
    to: &QuantizationInfo,
) {
    let mut x = start;
    while x + BLOCK_BYTES <= end {
        unsafe { L::quantize_u8(L::dequantize_u8(src.add(x), from), dst.add(x), to) };
        x += BLOCK_BYTES;
    }
    while x < end {
        unsafe { *dst.add(x) = quantize_qasymm8(dequantize_qasymm8(*src.add(x), from), to) };
        x += 1;
    }
}

/// Requantize signed samples `[start, end)` of a row from `from` to `to`
///
/// # Safety
/// `src` and `dst` must be valid for `end` bytes and must not overlap.
#[inline(always)]
pub(crate) unsafe fn requantize_i8_row<L: ByteLanes>(
    src: *const i8,
    dst: *mut i8,
    start: usize,
    end: usize,
    from: &QuantizationInfo,
    to: &QuantizationInfo,
) {
    let mut x = start;
    while x + BLOCK_BYTES <= end {
        unsafe { L::quantize_i8(L::dequantize_i8(src.add(x), from), dst.add(x), to) };
        x += BLOCK_BYTES;
    }
    while x < end {
        unsafe {
            *dst.add(x) = quantize_qasymm8_signed(dequantize_qasymm8_signed(*src.add(x), from), to)
        };
        x += 1;
    }
}

// ============================================================================
// Public block and slice operations
// ============================================================================

/// Run `$body` with `$lanes` bound to the lane type for `$level`
macro_rules! dispatch_lanes {
    ($level:expr, $lanes:ident => $body:expr) => {
        match $level {
            #[cfg(target_arch = "x86_64")]
            $crate::runtime::cpu::kernels::simd::SimdLevel::Sse2 => {
                type $lanes = $crate::runtime::cpu::kernels::simd::lanes::Sse2Lanes;
                $body
            }
            #[cfg(target_arch = "aarch64")]
            $crate::runtime::cpu::kernels::simd::SimdLevel::Neon => {
                type $lanes = $crate::runtime::cpu::kernels::simd::lanes::NeonLanes;
                $body
            }
            _ => {
                type $lanes = $crate::runtime::cpu::kernels::simd::lanes::ScalarLanes;
                $body
            }
        }
    };
}

pub(crate) use dispatch_lanes;

/// Dequantize one block of unsigned samples with the target's vector lanes
pub fn dequantize_qasymm8_block(src: &[u8; BLOCK_BYTES], qinfo: &QuantizationInfo) -> [f32; BLOCK_BYTES] {
    let mut out = [0.0f32; BLOCK_BYTES];
    dispatch_lanes!(detect_simd(), L => unsafe {
        L::store_real(L::dequantize_u8(src.as_ptr(), qinfo), out.as_mut_ptr())
    });
    out
}

/// Dequantize one block of signed samples with the target's vector lanes
pub fn dequantize_qasymm8_signed_block(
    src: &[i8; BLOCK_BYTES],
    qinfo: &QuantizationInfo,
) -> [f32; BLOCK_BYTES] {
    let mut out = [0.0f32; BLOCK_BYTES];
    dispatch_lanes!(detect_simd(), L => unsafe {
        L::store_real(L::dequantize_i8(src.as_ptr(), qinfo), out.as_mut_ptr())
    });
    out
}

/// Quantize one block of values to unsigned samples with the target's vector lanes
pub fn quantize_qasymm8_block(src: &[f32; BLOCK_BYTES], qinfo: &QuantizationInfo) -> [u8; BLOCK_BYTES] {
    let mut out = [0u8; BLOCK_BYTES];
    dispatch_lanes!(detect_simd(), L => unsafe {
        L::quantize_u8(L::load_real(src.as_ptr()), out.as_mut_ptr(), qinfo)
    });
    out
}

/// Quantize one block of values to signed samples with the target's vector lanes
pub fn quantize_qasymm8_signed_block(
    src: &[f32; BLOCK_BYTES],
    qinfo: &QuantizationInfo,
) -> [i8; BLOCK_BYTES] {
    let mut out = [0i8; BLOCK_BYTES];
    dispatch_lanes!(detect_simd(), L => unsafe {
        L::quantize_i8(L::load_real(src.as_ptr()), out.as_mut_ptr(), qinfo)
    });
    out
}

/// Requantize unsigned samples from `from` to `to`
///
/// Whole blocks use the target's vector lanes, the tail is scalar.
///
/// # Panics
/// If `src` and `dst` differ in length.
pub fn requantize_qasymm8_slice(src: &[u8], dst: &mut [u8], from: &QuantizationInfo, to: &QuantizationInfo) {
    assert_eq!(src.len(), dst.len(), "requantize length mismatch");
    dispatch_lanes!(detect_simd(), L => unsafe {
        requantize_u8_row::<L>(src.as_ptr(), dst.as_mut_ptr(), 0, src.len(), from, to)
    });
}

/// Requantize signed samples from `from` to `to`
///
/// Whole blocks use the target's vector lanes, the tail is scalar.
///
/// # Panics
/// If `src` and `dst` differ in length.
pub fn requantize_qasymm8_signed_slice(
    src: &[i8],
    dst: &mut [i8],
    from: &QuantizationInfo,
    to: &QuantizationInfo,
) {
    assert_eq!(src.len(), dst.len(), "requantize length mismatch");
    dispatch_lanes!(detect_simd(), L => unsafe {
        requantize_i8_row::<L>(src.as_ptr(), dst.as_mut_ptr(), 0, src.len(), from, to)
    });
}
