//! Packing and unpacking of 24-bit little-endian samples.
//!
//! Rust has no native 24-bit integer, so Int24 samples are carried in `i32`s
//! holding values in `[-8388608, 8388607]`. On disk each sample takes exactly
//! 3 bytes, lowest byte first.
use crate::error::{WaveError, WaveResult};

pub const INT24_MIN: i32 = -(1 << 23);
pub const INT24_MAX: i32 = (1 << 23) - 1;

const SIGN_BIT: i32 = 1 << 23;

/// Packs `values` into 3-byte little-endian triples.
///
/// Values are not range checked; anything outside the Int24 range loses its
/// high byte.
pub fn pack(values: &[i32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 3);
    pack_into(values, &mut out);
    out
}

/// Appends the packed form of `values` to `out`.
pub fn pack_into(values: &[i32], out: &mut Vec<u8>) {
    out.reserve(values.len() * 3);
    for value in values {
        let bytes = value.to_le_bytes();
        out.extend_from_slice(&bytes[..3]);
    }
}

/// Unpacks 3-byte little-endian triples into sign-extended `i32`s.
pub fn unpack(bytes: &[u8]) -> WaveResult<Vec<i32>> {
    let mut out = vec![0; bytes.len() / 3];
    unpack_into(bytes, &mut out)?;
    Ok(out)
}

/// Unpacks `bytes` into the front of `out`, returning the number of samples
/// written. `out` must hold at least `bytes.len() / 3` elements.
pub fn unpack_into(bytes: &[u8], out: &mut [i32]) -> WaveResult<usize> {
    if bytes.len() % 3 != 0 {
        return Err(WaveError::InvalidInt24Length(bytes.len()));
    }

    let n_samples = bytes.len() / 3;
    for (dst, triple) in out[..n_samples].iter_mut().zip(bytes.chunks_exact(3)) {
        let raw = i32::from(triple[0]) | i32::from(triple[1]) << 8 | i32::from(triple[2]) << 16;
        *dst = (raw ^ SIGN_BIT) - SIGN_BIT;
    }
    Ok(n_samples)
}

#[cfg(test)]
mod int24_tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn pack_known_values() {
        let packed = pack(&[0, 1, -1, INT24_MIN, INT24_MAX, 0x123456]);
        assert_eq!(
            packed,
            vec![
                0x00, 0x00, 0x00, //
                0x01, 0x00, 0x00, //
                0xFF, 0xFF, 0xFF, //
                0x00, 0x00, 0x80, //
                0xFF, 0xFF, 0x7F, //
                0x56, 0x34, 0x12,
            ]
        );
    }

    #[test]
    fn unpack_sign_extends() {
        let values = unpack(&[0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x80, 0xFF, 0xFF, 0x7F]).unwrap();
        assert_eq!(values, vec![-1, INT24_MIN, INT24_MAX]);
    }

    #[test]
    fn out_of_range_values_truncate() {
        let packed = pack(&[INT24_MAX + 1]);
        assert_eq!(unpack(&packed).unwrap(), vec![INT24_MIN]);
    }

    #[test]
    fn round_trip_random() {
        let mut rng = StdRng::seed_from_u64(24);
        let mut values: Vec<i32> = (0..4096)
            .map(|_| rng.gen_range(INT24_MIN..=INT24_MAX))
            .collect();
        values.extend_from_slice(&[INT24_MIN, INT24_MAX, 0, -1, 1]);
        assert_eq!(unpack(&pack(&values)).unwrap(), values);
    }

    #[test]
    fn unpack_rejects_bad_length() {
        for len in [1, 2, 4, 5, 7] {
            match unpack(&vec![0; len]) {
                Err(WaveError::InvalidInt24Length(n)) => assert_eq!(n, len),
                other => panic!("expected length error for {}, got {:?}", len, other),
            }
        }
        assert!(unpack(&[]).unwrap().is_empty());
    }
}
