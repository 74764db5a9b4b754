//! Reads a wav stream as little-endian bytes of a sample type chosen by the caller,
//! whatever type the file stores.
use std::io::{Read, Seek};

use crate::{
    conversion::{
        dequantize_f32, dequantize_i16, dequantize_i24, dequantize_i32, dequantize_u8,
        quantize_f32, quantize_i16, quantize_i24, quantize_i32, quantize_u8,
    },
    error::{WaveError, WaveResult},
    int24,
    reader::WaveReader,
    sample::encode_le,
    wav_type::SampleType,
};

/// Samples decoded per refill of the internal buffer.
const BLOCK_SAMPLES: usize = 4096;

/// Adapts a [`WaveReader`] into a byte stream of `target` samples.
///
/// Matching source and target types are copied through untouched. Any other pair is
/// dequantized to `f64` and quantized to the target, see [`crate::conversion`].
///
/// The [`Read`] impl signals the end of the audio with `Ok(0)`. A stream that ends
/// before its data chunk does first yields the samples that were present, then
/// fails with [`std::io::ErrorKind::UnexpectedEof`]. Other codec errors are
/// returned as [`std::io::ErrorKind::InvalidData`].
#[derive(Debug)]
pub struct Decoder<R: Read + Seek> {
    reader: WaveReader<R>,
    source: SampleType,
    target: SampleType,
    pending: Vec<u8>,
    pos: usize,
    /// Set once the stream ran out before the declared end of the audio.
    truncated: bool,
}

impl<R: Read + Seek> Decoder<R> {
    pub fn new(mut reader: WaveReader<R>, target: SampleType) -> WaveResult<Self> {
        let source = reader.header()?.sample_type()?;
        Ok(Decoder {
            reader,
            source,
            target,
            pending: Vec::new(),
            pos: 0,
            truncated: false,
        })
    }

    pub fn source(&self) -> SampleType {
        self.source
    }

    pub fn target(&self) -> SampleType {
        self.target
    }

    pub fn into_inner(self) -> WaveReader<R> {
        self.reader
    }

    /// Decodes up to `max_samples` samples, appending their bytes to `out`. Returns the
    /// number of samples decoded, zero once the audio is exhausted.
    ///
    /// If the stream is truncated, the samples that were present are returned first
    /// and every later call fails with [`WaveError::UnexpectedEndOfStream`].
    pub fn decode(&mut self, max_samples: usize, out: &mut Vec<u8>) -> WaveResult<usize> {
        if self.truncated {
            return Err(WaveError::UnexpectedEndOfStream { samples_read: 0 });
        }

        let n = match (self.source, self.target) {
            (source, target) if source == target => self.pass_through(max_samples, out)?,
            (_, target) => {
                let values = self.read_as_f64(max_samples)?;
                encode_f64(target, &values, out);
                values.len()
            }
        };

        if n < max_samples && self.reader.remaining_bytes() > 0 {
            self.truncated = true;
        }
        match (n, self.truncated) {
            (0, true) => Err(WaveError::UnexpectedEndOfStream { samples_read: 0 }),
            _ => Ok(n),
        }
    }

    fn pass_through(&mut self, n: usize, out: &mut Vec<u8>) -> WaveResult<usize> {
        Ok(match self.source {
            SampleType::Uint8 => {
                let mut buf = vec![0u8; n];
                let k = samples_read(&mut self.truncated, self.reader.read_u8(&mut buf))?;
                out.extend_from_slice(&buf[..k]);
                k
            }
            SampleType::Int16 => {
                let mut buf = vec![0i16; n];
                let k = samples_read(&mut self.truncated, self.reader.read_i16(&mut buf))?;
                encode_le(&buf[..k], out);
                k
            }
            SampleType::Int24 => {
                let mut buf = vec![0i32; n];
                let k = samples_read(&mut self.truncated, self.reader.read_i24(&mut buf))?;
                int24::pack_into(&buf[..k], out);
                k
            }
            SampleType::Int32 => {
                let mut buf = vec![0i32; n];
                let k = samples_read(&mut self.truncated, self.reader.read_i32(&mut buf))?;
                encode_le(&buf[..k], out);
                k
            }
            SampleType::Float32 => {
                let mut buf = vec![0f32; n];
                let k = samples_read(&mut self.truncated, self.reader.read_f32(&mut buf))?;
                encode_le(&buf[..k], out);
                k
            }
            SampleType::Float64 => {
                let mut buf = vec![0f64; n];
                let k = samples_read(&mut self.truncated, self.reader.read_f64(&mut buf))?;
                encode_le(&buf[..k], out);
                k
            }
        })
    }

    fn read_as_f64(&mut self, n: usize) -> WaveResult<Vec<f64>> {
        Ok(match self.source {
            SampleType::Uint8 => {
                let mut buf = vec![0u8; n];
                let k = samples_read(&mut self.truncated, self.reader.read_u8(&mut buf))?;
                buf[..k].iter().map(|&x| dequantize_u8(x)).collect()
            }
            SampleType::Int16 => {
                let mut buf = vec![0i16; n];
                let k = samples_read(&mut self.truncated, self.reader.read_i16(&mut buf))?;
                buf[..k].iter().map(|&x| dequantize_i16(x)).collect()
            }
            SampleType::Int24 => {
                let mut buf = vec![0i32; n];
                let k = samples_read(&mut self.truncated, self.reader.read_i24(&mut buf))?;
                buf[..k].iter().map(|&x| dequantize_i24(x)).collect()
            }
            SampleType::Int32 => {
                let mut buf = vec![0i32; n];
                let k = samples_read(&mut self.truncated, self.reader.read_i32(&mut buf))?;
                buf[..k].iter().map(|&x| dequantize_i32(x)).collect()
            }
            SampleType::Float32 => {
                let mut buf = vec![0f32; n];
                let k = samples_read(&mut self.truncated, self.reader.read_f32(&mut buf))?;
                buf[..k].iter().map(|&x| dequantize_f32(x)).collect()
            }
            SampleType::Float64 => {
                let mut buf = vec![0f64; n];
                let k = samples_read(&mut self.truncated, self.reader.read_f64(&mut buf))?;
                buf.truncate(k);
                buf
            }
        })
    }
}

/// A short read still yields the samples it decoded, and marks the stream truncated.
fn samples_read(truncated: &mut bool, result: WaveResult<usize>) -> WaveResult<usize> {
    match result {
        Ok(n) => Ok(n),
        Err(WaveError::UnexpectedEndOfStream { samples_read }) => {
            *truncated = true;
            Ok(samples_read)
        }
        Err(WaveError::EndOfStream) => Ok(0),
        Err(e) => Err(e),
    }
}

fn encode_f64(target: SampleType, values: &[f64], out: &mut Vec<u8>) {
    match target {
        SampleType::Uint8 => out.extend(values.iter().map(|&x| quantize_u8(x))),
        SampleType::Int16 => {
            let samples: Vec<i16> = values.iter().map(|&x| quantize_i16(x)).collect();
            encode_le(&samples, out);
        }
        SampleType::Int24 => {
            let samples: Vec<i32> = values.iter().map(|&x| quantize_i24(x)).collect();
            int24::pack_into(&samples, out);
        }
        SampleType::Int32 => {
            let samples: Vec<i32> = values.iter().map(|&x| quantize_i32(x)).collect();
            encode_le(&samples, out);
        }
        SampleType::Float32 => {
            let samples: Vec<f32> = values.iter().map(|&x| quantize_f32(x)).collect();
            encode_le(&samples, out);
        }
        SampleType::Float64 => encode_le(values, out),
    }
}

impl<R: Read + Seek> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.pos >= self.pending.len() {
            let mut pending = std::mem::take(&mut self.pending);
            pending.clear();
            self.pos = 0;
            let decoded = self.decode(BLOCK_SAMPLES, &mut pending);
            self.pending = pending;
            match decoded {
                Ok(0) => return Ok(0),
                Ok(_) => (),
                Err(WaveError::IOError(e)) => return Err(e),
                Err(e @ WaveError::UnexpectedEndOfStream { .. }) => {
                    return Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, e))
                }
                Err(e) => return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            }
        }

        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
