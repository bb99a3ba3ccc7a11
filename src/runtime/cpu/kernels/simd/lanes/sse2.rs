//! SSE2 block operations for x86-64
//!
//! SSE2 is part of the x86-64 baseline, so these run on every target CPU
//! without feature detection.
//!
//! # SIMD Strategy
//!
//! Dequantize: widen 16 bytes to four `__m128i` of i32 by unpacking (with
//! zero for unsigned, with itself plus an arithmetic shift for signed),
//! subtract the zero point, convert, multiply by the scale.
//!
//! Quantize: divide by the scale, zero NaN lanes, clamp, convert with round-half-to-even
//! (the default MXCSR mode), add the zero point, then narrow with signed
//! saturation to i16 and unsigned/signed saturation to 8 bits.

use std::arch::x86_64::*;

use super::{ByteLanes, quantize_bounds};
use crate::dtype::QuantizationInfo;

/// SSE2 implementation of [`ByteLanes`]
pub(crate) struct Sse2Lanes;

#[inline(always)]
unsafe fn scale_i32(ints: [__m128i; 4], qinfo: &QuantizationInfo) -> [__m128; 4] {
    unsafe {
        let zero_point = _mm_set1_epi32(qinfo.zero_point());
        let scale = _mm_set1_ps(qinfo.scale());
        let mut out = [_mm_setzero_ps(); 4];
        for (o, i) in out.iter_mut().zip(ints) {
            *o = _mm_mul_ps(_mm_cvtepi32_ps(_mm_sub_epi32(i, zero_point)), scale);
        }
        out
    }
}

#[inline(always)]
unsafe fn round_i32(values: [__m128; 4], qinfo: &QuantizationInfo) -> [__m128i; 4] {
    unsafe {
        let (lo, hi) = quantize_bounds();
        let lo = _mm_set1_ps(lo);
        let hi = _mm_set1_ps(hi);
        let scale = _mm_set1_ps(qinfo.scale());
        let zero_point = _mm_set1_epi32(qinfo.zero_point());
        let mut out = [_mm_setzero_si128(); 4];
        for (o, v) in out.iter_mut().zip(values) {
            let scaled = _mm_div_ps(v, scale);
            // NaN lanes become 0.0
            let scaled = _mm_and_ps(scaled, _mm_cmpord_ps(scaled, scaled));
            let scaled = _mm_min_ps(_mm_max_ps(scaled, lo), hi);
            *o = _mm_add_epi32(_mm_cvtps_epi32(scaled), zero_point);
        }
        out
    }
}

impl ByteLanes for Sse2Lanes {
    type Real = [__m128; 4];

    #[inline(always)]
    unsafe fn copy_block(src: *const u8, dst: *mut u8) {
        unsafe { _mm_storeu_si128(dst.cast(), _mm_loadu_si128(src.cast())) }
    }

    #[inline(always)]
    unsafe fn dequantize_u8(src: *const u8, qinfo: &QuantizationInfo) -> Self::Real {
        unsafe {
            let v = _mm_loadu_si128(src.cast());
            let zero = _mm_setzero_si128();
            let lo = _mm_unpacklo_epi8(v, zero);
            let hi = _mm_unpackhi_epi8(v, zero);
            scale_i32(
                [
                    _mm_unpacklo_epi16(lo, zero),
                    _mm_unpackhi_epi16(lo, zero),
                    _mm_unpacklo_epi16(hi, zero),
                    _mm_unpackhi_epi16(hi, zero),
                ],
                qinfo,
            )
        }
    }

    #[inline(always)]
    unsafe fn dequantize_i8(src: *const i8, qinfo: &QuantizationInfo) -> Self::Real {
        unsafe {
            let v = _mm_loadu_si128(src.cast());
            // Each byte lands in the high half of its i16, the shift sign-extends
            let lo = _mm_srai_epi16::<8>(_mm_unpacklo_epi8(v, v));
            let hi = _mm_srai_epi16::<8>(_mm_unpackhi_epi8(v, v));
            scale_i32(
                [
                    _mm_srai_epi32::<16>(_mm_unpacklo_epi16(lo, lo)),
                    _mm_srai_epi32::<16>(_mm_unpackhi_epi16(lo, lo)),
                    _mm_srai_epi32::<16>(_mm_unpacklo_epi16(hi, hi)),
                    _mm_srai_epi32::<16>(_mm_unpackhi_epi16(hi, hi)),
                ],
                qinfo,
            )
        }
    }

    #[inline(always)]
    unsafe fn quantize_u8(values: Self::Real, dst: *mut u8, qinfo: &QuantizationInfo) {
        unsafe {
            let [a, b, c, d] = round_i32(values, qinfo);
            let packed = _mm_packus_epi16(_mm_packs_epi32(a, b), _mm_packs_epi32(c, d));
            _mm_storeu_si128(dst.cast(), packed);
        }
    }

    #[inline(always)]
    unsafe fn quantize_i8(values: Self::Real, dst: *mut i8, qinfo: &QuantizationInfo) {
        unsafe {
            let [a, b, c, d] = round_i32(values, qinfo);
            let packed = _mm_packs_epi16(_mm_packs_epi32(a, b), _mm_packs_epi32(c, d));
            _mm_storeu_si128(dst.cast(), packed);
        }
    }

    #[inline(always)]
    unsafe fn load_real(src: *const f32) -> Self::Real {
        unsafe {
            [
                _mm_loadu_ps(src),
                _mm_loadu_ps(src.add(4)),
                _mm_loadu_ps(src.add(8)),
                _mm_loadu_ps(src.add(12)),
            ]
        }
    }

    #[inline(always)]
    unsafe fn store_real(values: Self::Real, dst: *mut f32) {
        unsafe {
            for (i, v) in values.into_iter().enumerate() {
                _mm_storeu_ps(dst.add(4 * i), v);
            }
        }
    }
}
