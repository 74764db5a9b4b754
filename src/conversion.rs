//! Linear remapping between `f64` samples in `[-1.0, 1.0]` and the fixed-point and
//! single precision sample types.
//!
//! Quantization truncates towards zero and saturates at the bounds of the target
//! type. Dequantization divides negative values by one more than positive values so
//! that both ends of every integer range map exactly onto -1.0 and 1.0.
use crate::int24::{INT24_MAX, INT24_MIN};

#[inline(always)]
pub fn quantize_u8(value: f64) -> u8 {
    (value * 127.5 + 128.0) as u8
}

#[inline(always)]
pub fn quantize_i16(value: f64) -> i16 {
    (value * 32767.5 - 0.5) as i16
}

#[inline(always)]
pub fn quantize_i24(value: f64) -> i32 {
    ((value * 8388607.5 - 0.5) as i32).clamp(INT24_MIN, INT24_MAX)
}

#[inline(always)]
pub fn quantize_i32(value: f64) -> i32 {
    (value * 2147483647.5 - 0.5) as i32
}

#[inline(always)]
pub fn quantize_f32(value: f64) -> f32 {
    value as f32
}

/// 0 maps to -1.0, 128 to 0.0 and 255 to 1.0, each half of the range scaled separately.
#[inline(always)]
pub fn dequantize_u8(value: u8) -> f64 {
    match value & 0x80 {
        0 => f64::from(value) * (255.0 / 32512.0) - 1.0,
        _ => (f64::from(value) - 128.0) / 127.0,
    }
}

#[inline(always)]
pub fn dequantize_i16(value: i16) -> f64 {
    f64::from(value) / (f64::from(i16::MAX) + f64::from(u8::from(value < 0)))
}

#[inline(always)]
pub fn dequantize_i24(value: i32) -> f64 {
    f64::from(value) / (f64::from(INT24_MAX) + f64::from(u8::from(value < 0)))
}

#[inline(always)]
pub fn dequantize_i32(value: i32) -> f64 {
    f64::from(value) / (f64::from(i32::MAX) + f64::from(u8::from(value < 0)))
}

#[inline(always)]
pub fn dequantize_f32(value: f32) -> f64 {
    f64::from(value)
}

macro_rules! slice_conversions {
    ($(($name:ident, $T:ty)),*) => {
        $(
            paste::paste! {
                pub fn [<quantize_to_ $name>](input: &[f64]) -> Vec<$T> {
                    input.iter().map(|&x| [<quantize_ $name>](x)).collect()
                }

                pub fn [<dequantize_from_ $name>](input: &[$T]) -> Vec<f64> {
                    input.iter().map(|&x| [<dequantize_ $name>](x)).collect()
                }
            }
        )*
    };
}

slice_conversions!((u8, u8), (i16, i16), (i24, i32), (i32, i32), (f32, f32));

#[cfg(test)]
mod conversion_tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn quantize_u8_bounds() {
        assert_eq!(quantize_to_u8(&[-1.0, 0.0, 1.0]), vec![0, 128, 255]);
        assert_eq!(quantize_u8(-2.0), 0);
        assert_eq!(quantize_u8(2.0), 255);
    }

    #[test]
    fn quantize_signed_bounds() {
        assert_eq!(quantize_to_i16(&[-1.0, 0.0, 1.0]), vec![-32768, 0, 32767]);
        assert_eq!(
            quantize_to_i24(&[-1.0, 0.0, 1.0]),
            vec![INT24_MIN, 0, INT24_MAX]
        );
        assert_eq!(
            quantize_to_i32(&[-1.0, 0.0, 1.0]),
            vec![i32::MIN, 0, i32::MAX]
        );
        assert_eq!(quantize_i16(1.5), i16::MAX);
        assert_eq!(quantize_i24(1.5), INT24_MAX);
        assert_eq!(quantize_i24(-1.5), INT24_MIN);
        assert_eq!(quantize_i32(-3.0), i32::MIN);
    }

    #[test]
    fn dequantize_u8_segments() {
        let out = dequantize_from_u8(&[0, 128, 255]);
        assert_eq!(out, vec![-1.0, 0.0, 1.0]);
        assert!(dequantize_u8(127) < 0.0);
        assert!(dequantize_u8(129) > 0.0);
    }

    #[test]
    fn dequantize_signed_bounds() {
        assert_eq!(dequantize_from_i16(&[i16::MIN, 0, i16::MAX]), vec![-1.0, 0.0, 1.0]);
        assert_eq!(
            dequantize_from_i24(&[INT24_MIN, 0, INT24_MAX]),
            vec![-1.0, 0.0, 1.0]
        );
        assert_eq!(
            dequantize_from_i32(&[i32::MIN, 0, i32::MAX]),
            vec![-1.0, 0.0, 1.0]
        );
    }

    #[test]
    fn round_trips_are_close() {
        for x in [-0.75, -0.3, 0.1, 0.5, 0.9] {
            assert_approx_eq!(dequantize_i16(quantize_i16(x)), x, 1e-3);
            assert_approx_eq!(dequantize_i24(quantize_i24(x)), x, 1e-5);
            assert_approx_eq!(dequantize_i32(quantize_i32(x)), x, 1e-6);
            assert_approx_eq!(dequantize_u8(quantize_u8(x)), x, 1e-1);
            assert_approx_eq!(dequantize_f32(quantize_f32(x)), x, 1e-6);
        }
    }
}
