//! Fixed-width little-endian encoding of the in-memory sample types.
//!
//! Int24 has no native type and is handled by [`crate::int24`] instead.
use std::io::Write;

use bytemuck::Pod;
use num_traits::ToBytes;

/// Trait used to indicate that a type is an audio sample with a fixed-width
/// little-endian representation on disk.
pub trait AudioSample: Copy + Pod + ToBytes + Default + Send + Sync + 'static {
    /// Bytes per sample on disk.
    const WIDTH: usize = std::mem::size_of::<Self>();

    /// Decodes one sample. `bytes` must hold exactly `WIDTH` bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_audio_sample {
    ($($T:ty),*) => {
        $(
            impl AudioSample for $T {
                #[inline(always)]
                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$T>()];
                    buf.copy_from_slice(bytes);
                    <$T>::from_le_bytes(buf)
                }
            }
        )*
    };
}

impl_audio_sample!(u8, i16, i32, f32, f64);

/// Writes `samples` to `writer` in little-endian order.
pub fn write_le<T: AudioSample, W: Write>(writer: &mut W, samples: &[T]) -> std::io::Result<()> {
    if cfg!(target_endian = "little") {
        writer.write_all(bytemuck::cast_slice(samples))
    } else {
        let mut bytes = Vec::with_capacity(samples.len() * T::WIDTH);
        encode_le(samples, &mut bytes);
        writer.write_all(&bytes)
    }
}

/// Appends the little-endian bytes of `samples` to `out`.
pub fn encode_le<T: AudioSample>(samples: &[T], out: &mut Vec<u8>) {
    out.reserve(samples.len() * T::WIDTH);
    for sample in samples {
        out.extend_from_slice(sample.to_le_bytes().as_ref());
    }
}

/// Decodes whole samples from `bytes` into the front of `out` and returns how many
/// were written. Trailing bytes that do not make up a full sample are ignored.
pub fn decode_le<T: AudioSample>(bytes: &[u8], out: &mut [T]) -> usize {
    let n_samples = (bytes.len() / T::WIDTH).min(out.len());

    if cfg!(target_endian = "little") {
        // `out` is aligned for T, so viewing it as bytes is always valid
        let dst: &mut [u8] = bytemuck::cast_slice_mut(&mut out[..n_samples]);
        dst.copy_from_slice(&bytes[..n_samples * T::WIDTH]);
    } else {
        for (dst, src) in out[..n_samples]
            .iter_mut()
            .zip(bytes.chunks_exact(T::WIDTH))
        {
            *dst = T::from_le_slice(src);
        }
    }

    n_samples
}
