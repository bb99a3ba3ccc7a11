//! Property tests for the 8-bit quantization transforms
//!
//! - quantize(dequantize(q)) == q for every sample and valid parameters
//! - block and slice transforms give the same bytes as the scalar ones

use proptest::prelude::*;
use windowr::dtype::QuantizationInfo;
use windowr::runtime::cpu::kernels::{
    BLOCK_BYTES, dequantize_qasymm8, dequantize_qasymm8_block, dequantize_qasymm8_signed,
    dequantize_qasymm8_signed_block, quantize_qasymm8, quantize_qasymm8_block,
    quantize_qasymm8_signed, quantize_qasymm8_signed_block, requantize_qasymm8_signed_slice,
    requantize_qasymm8_slice,
};

fn qinfo_strategy() -> impl Strategy<Value = QuantizationInfo> {
    (1e-4f32..64.0, -300i32..300).prop_map(|(scale, zp)| QuantizationInfo::new(scale, zp).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_round_trip_unsigned(q in any::<u8>(), scale in 1e-3f32..16.0, zp in 0i32..=255) {
        let info = QuantizationInfo::new(scale, zp).unwrap();
        prop_assert_eq!(quantize_qasymm8(dequantize_qasymm8(q, &info), &info), q);
    }

    #[test]
    fn prop_round_trip_signed(q in any::<i8>(), scale in 1e-3f32..16.0, zp in -128i32..=127) {
        let info = QuantizationInfo::new(scale, zp).unwrap();
        prop_assert_eq!(quantize_qasymm8_signed(dequantize_qasymm8_signed(q, &info), &info), q);
    }

    #[test]
    fn prop_dequantize_block_matches_scalar(
        block in prop::array::uniform16(any::<u8>()),
        info in qinfo_strategy(),
    ) {
        let out = dequantize_qasymm8_block(&block, &info);
        for i in 0..BLOCK_BYTES {
            prop_assert_eq!(out[i].to_bits(), dequantize_qasymm8(block[i], &info).to_bits());
        }

        let signed = block.map(|b| b as i8);
        let out = dequantize_qasymm8_signed_block(&signed, &info);
        for i in 0..BLOCK_BYTES {
            prop_assert_eq!(out[i].to_bits(), dequantize_qasymm8_signed(signed[i], &info).to_bits());
        }
    }

    #[test]
    fn prop_quantize_block_matches_scalar(
        block in prop::array::uniform16(prop_oneof![
            8 => -1e6f32..1e6,
            1 => Just(f32::NAN),
            1 => Just(f32::INFINITY),
            1 => Just(f32::NEG_INFINITY),
        ]),
        info in qinfo_strategy(),
    ) {
        let out = quantize_qasymm8_block(&block, &info);
        let signed = quantize_qasymm8_signed_block(&block, &info);
        for i in 0..BLOCK_BYTES {
            prop_assert_eq!(out[i], quantize_qasymm8(block[i], &info));
            prop_assert_eq!(signed[i], quantize_qasymm8_signed(block[i], &info));
        }
    }

    #[test]
    fn prop_requantize_slice_matches_scalar(
        data in prop::collection::vec(any::<u8>(), 0..100),
        from in qinfo_strategy(),
        to in qinfo_strategy(),
    ) {
        let mut out = vec![0u8; data.len()];
        requantize_qasymm8_slice(&data, &mut out, &from, &to);
        for (i, &v) in data.iter().enumerate() {
            prop_assert_eq!(out[i], quantize_qasymm8(dequantize_qasymm8(v, &from), &to), "index {}", i);
        }

        let signed: Vec<i8> = data.iter().map(|&b| b as i8).collect();
        let mut out = vec![0i8; signed.len()];
        requantize_qasymm8_signed_slice(&signed, &mut out, &from, &to);
        for (i, &v) in signed.iter().enumerate() {
            prop_assert_eq!(
                out[i],
                quantize_qasymm8_signed(dequantize_qasymm8_signed(v, &from), &to),
                "index {}",
                i
            );
        }
    }
}

#[test]
fn test_quantize_nan_block_matches_scalar() {
    let info = QuantizationInfo::new(0.5, 10).unwrap();
    let block = [f32::NAN; BLOCK_BYTES];
    assert_eq!(quantize_qasymm8_block(&block, &info), [10u8; BLOCK_BYTES]);
    assert_eq!(quantize_qasymm8_signed_block(&block, &info), [10i8; BLOCK_BYTES]);
}

#[test]
fn test_quantize_saturates_non_finite() {
    let info = QuantizationInfo::new(0.5, 10).unwrap();
    assert_eq!(quantize_qasymm8(f32::INFINITY, &info), 255);
    assert_eq!(quantize_qasymm8(f32::NEG_INFINITY, &info), 0);
    assert_eq!(quantize_qasymm8_signed(f32::INFINITY, &info), 127);
    assert_eq!(quantize_qasymm8_signed(f32::NEG_INFINITY, &info), -128);
}
