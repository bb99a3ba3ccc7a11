//! NEON block operations for ARM64
//!
//! NEON is mandatory on AArch64, so these run on every target CPU.
//!
//! # SIMD Strategy
//!
//! 1. Widen 16 bytes to four int32x4_t with vmovl (u8 → u16 → u32, or
//!    i8 → i16 → i32)
//! 2. Subtract the zero point, convert, multiply by the scale
//! 3. To quantize: divide, zero NaN lanes, clamp, vcvtnq (round half-to-even), add the zero
//!    point, then vqmovn/vqmovun narrow with saturation

use std::arch::aarch64::*;

use super::super::{ByteLanes, quantize_bounds};
use crate::dtype::QuantizationInfo;

/// NEON implementation of [`ByteLanes`]
pub(crate) struct NeonLanes;

#[inline(always)]
unsafe fn scale_i32(ints: [int32x4_t; 4], qinfo: &QuantizationInfo) -> [float32x4_t; 4] {
    unsafe {
        let zero_point = vdupq_n_s32(qinfo.zero_point());
        let scale = vdupq_n_f32(qinfo.scale());
        ints.map(|i| vmulq_f32(vcvtq_f32_s32(vsubq_s32(i, zero_point)), scale))
    }
}

#[inline(always)]
unsafe fn round_i32(values: [float32x4_t; 4], qinfo: &QuantizationInfo) -> [int16x8_t; 2] {
    unsafe {
        let (lo, hi) = quantize_bounds();
        let lo = vdupq_n_f32(lo);
        let hi = vdupq_n_f32(hi);
        let scale = vdupq_n_f32(qinfo.scale());
        let zero_point = vdupq_n_s32(qinfo.zero_point());
        let [a, b, c, d] = values.map(|v| {
            let scaled = vdivq_f32(v, scale);
            // NaN lanes become 0.0
            let ordered = vceqq_f32(scaled, scaled);
            let scaled = vreinterpretq_f32_u32(vandq_u32(vreinterpretq_u32_f32(scaled), ordered));
            let scaled = vminq_f32(vmaxq_f32(scaled, lo), hi);
            vaddq_s32(vcvtnq_s32_f32(scaled), zero_point)
        });
        [
            vcombine_s16(vqmovn_s32(a), vqmovn_s32(b)),
            vcombine_s16(vqmovn_s32(c), vqmovn_s32(d)),
        ]
    }
}

impl ByteLanes for NeonLanes {
    type Real = [float32x4_t; 4];

    #[inline(always)]
    unsafe fn copy_block(src: *const u8, dst: *mut u8) {
        unsafe { vst1q_u8(dst, vld1q_u8(src)) }
    }

    #[inline(always)]
    unsafe fn dequantize_u8(src: *const u8, qinfo: &QuantizationInfo) -> Self::Real {
        unsafe {
            let v = vld1q_u8(src);
            let lo = vmovl_u8(vget_low_u8(v));
            let hi = vmovl_high_u8(v);
            scale_i32(
                [
                    vreinterpretq_s32_u32(vmovl_u16(vget_low_u16(lo))),
                    vreinterpretq_s32_u32(vmovl_high_u16(lo)),
                    vreinterpretq_s32_u32(vmovl_u16(vget_low_u16(hi))),
                    vreinterpretq_s32_u32(vmovl_high_u16(hi)),
                ],
                qinfo,
            )
        }
    }

    #[inline(always)]
    unsafe fn dequantize_i8(src: *const i8, qinfo: &QuantizationInfo) -> Self::Real {
        unsafe {
            let v = vld1q_s8(src);
            let lo = vmovl_s8(vget_low_s8(v));
            let hi = vmovl_high_s8(v);
            scale_i32(
                [
                    vmovl_s16(vget_low_s16(lo)),
                    vmovl_high_s16(lo),
                    vmovl_s16(vget_low_s16(hi)),
                    vmovl_high_s16(hi),
                ],
                qinfo,
            )
        }
    }

    #[inline(always)]
    unsafe fn quantize_u8(values: Self::Real, dst: *mut u8, qinfo: &QuantizationInfo) {
        unsafe {
            let [lo, hi] = round_i32(values, qinfo);
            vst1q_u8(dst, vcombine_u8(vqmovun_s16(lo), vqmovun_s16(hi)));
        }
    }

    #[inline(always)]
    unsafe fn quantize_i8(values: Self::Real, dst: *mut i8, qinfo: &QuantizationInfo) {
        unsafe {
            let [lo, hi] = round_i32(values, qinfo);
            vst1q_s8(dst, vcombine_s8(vqmovn_s16(lo), vqmovn_s16(hi)));
        }
    }

    #[inline(always)]
    unsafe fn load_real(src: *const f32) -> Self::Real {
        unsafe {
            [
                vld1q_f32(src),
                vld1q_f32(src.add(4)),
                vld1q_f32(src.add(8)),
                vld1q_f32(src.add(12)),
            ]
        }
    }

    #[inline(always)]
    unsafe fn store_real(values: Self::Real, dst: *mut f32) {
        unsafe {
            for (i, v) in values.into_iter().enumerate() {
                vst1q_f32(dst.add(4 * i), v);
            }
        }
    }
}
