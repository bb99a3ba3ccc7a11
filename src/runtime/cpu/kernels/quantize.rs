//! Scalar affine quantization for the 8-bit asymmetric encodings
//!
//! dequantize(q) = scale * (q - zero_point)
//! quantize(r)   = saturate(round(r / scale) + zero_point)
//!
//! Rounding is half-to-even and NaN quantizes to the zero point. The vector
//! lanes in `simd::lanes` perform the exact same sequence of f32 operations,
//! so the two paths agree bit for bit.

use crate::dtype::QuantizationInfo;

/// |r / scale| is clamped here before rounding to an integer
///
/// Any value this large saturates the 8-bit range whatever the zero point,
/// and clamping keeps the float → int conversion exact on every backend.
pub(crate) const QUANTIZE_LIMIT: f32 = 33_554_432.0;

/// Real value of an unsigned 8-bit quantized sample
#[inline]
pub fn dequantize_qasymm8(value: u8, qinfo: &QuantizationInfo) -> f32 {
    (value as i32 - qinfo.zero_point()) as f32 * qinfo.scale()
}

/// Real value of a signed 8-bit quantized sample
#[inline]
pub fn dequantize_qasymm8_signed(value: i8, qinfo: &QuantizationInfo) -> f32 {
    (value as i32 - qinfo.zero_point()) as f32 * qinfo.scale()
}

/// Nearest unsigned 8-bit quantized sample, saturated to [0, 255]
#[inline]
pub fn quantize_qasymm8(value: f32, qinfo: &QuantizationInfo) -> u8 {
    quantize_to_range(value, qinfo, u8::MIN as i32, u8::MAX as i32) as u8
}

/// Nearest signed 8-bit quantized sample, saturated to [-128, 127]
#[inline]
pub fn quantize_qasymm8_signed(value: f32, qinfo: &QuantizationInfo) -> i8 {
    quantize_to_range(value, qinfo, i8::MIN as i32, i8::MAX as i32) as i8
}

#[inline]
fn quantize_to_range(value: f32, qinfo: &QuantizationInfo, min: i32, max: i32) -> i32 {
    let scaled = value / qinfo.scale();
    let scaled = if scaled.is_nan() {
        0.0
    } else {
        scaled.clamp(-QUANTIZE_LIMIT, QUANTIZE_LIMIT)
    };
    (scaled.round_ties_even() as i32 + qinfo.zero_point()).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qinfo(scale: f32, zero_point: i32) -> QuantizationInfo {
        QuantizationInfo::new(scale, zero_point).unwrap()
    }

    #[test]
    fn test_requantize_example() {
        // 10 at scale 2 is 20.0; at scale 1, zero point 128 that is 148
        let real = dequantize_qasymm8(10, &qinfo(2.0, 0));
        assert_eq!(real, 20.0);
        assert_eq!(quantize_qasymm8(real, &qinfo(1.0, 128)), 148);
    }

    #[test]
    fn test_saturation() {
        let q = qinfo(0.5, 10);
        assert_eq!(quantize_qasymm8(1000.0, &q), 255);
        assert_eq!(quantize_qasymm8(-1000.0, &q), 0);
        assert_eq!(quantize_qasymm8(f32::INFINITY, &q), 255);
        assert_eq!(quantize_qasymm8_signed(1000.0, &q), 127);
        assert_eq!(quantize_qasymm8_signed(-1000.0, &q), -128);
        assert_eq!(quantize_qasymm8_signed(f32::NEG_INFINITY, &q), -128);
    }

    #[test]
    fn test_nan_quantizes_to_zero_point() {
        let q = qinfo(0.5, 10);
        assert_eq!(quantize_qasymm8(f32::NAN, &q), 10);
        assert_eq!(quantize_qasymm8_signed(f32::NAN, &q), 10);
        assert_eq!(quantize_qasymm8(-f32::NAN, &qinfo(1.0, 300)), 255);
        assert_eq!(quantize_qasymm8_signed(f32::NAN, &qinfo(1.0, -200)), -128);
    }

    #[test]
    fn test_rounds_half_to_even() {
        let q = qinfo(1.0, 0);
        assert_eq!(quantize_qasymm8(2.5, &q), 2);
        assert_eq!(quantize_qasymm8(3.5, &q), 4);
        assert_eq!(quantize_qasymm8_signed(-2.5, &q), -2);
        assert_eq!(quantize_qasymm8(2.4999, &q), 2);
        assert_eq!(quantize_qasymm8(2.5001, &q), 3);
    }

    #[test]
    fn test_round_trip_all_samples() {
        for (scale, zero_point) in [(1.0, 0), (0.1, 128), (3.7, -20), (0.003, 255)] {
            let q = qinfo(scale, zero_point);
            for v in u8::MIN..=u8::MAX {
                assert_eq!(quantize_qasymm8(dequantize_qasymm8(v, &q), &q), v);
            }
            for v in i8::MIN..=i8::MAX {
                assert_eq!(
                    quantize_qasymm8_signed(dequantize_qasymm8_signed(v, &q), &q),
                    v
                );
            }
        }
    }

    #[test]
    fn test_signed_zero_point() {
        let q = qinfo(0.25, -3);
        assert_eq!(dequantize_qasymm8_signed(-3, &q), 0.0);
        assert_eq!(dequantize_qasymm8_signed(1, &q), 1.0);
        assert_eq!(quantize_qasymm8_signed(1.0, &q), 1);
    }
}
