//! Lazy-header, type-checked wav reader.
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use crate::{
    chunks::read_riff_chunk,
    error::{WaveError, WaveResult},
    header::Header,
    int24, log,
    sample::{decode_le, AudioSample},
    wav_type::SampleType,
};

/// Reads interleaved samples from a wav stream.
///
/// The header is parsed on the first call to [`WaveReader::header`] or to any typed
/// read, and cached afterwards. Reads never go past the end of the data chunk.
///
/// Every typed read fills the caller's buffer if it can. A read that runs out of audio
/// part way returns [`WaveError::UnexpectedEndOfStream`] with the number of samples
/// that were decoded into the front of the buffer; a read with no audio left returns
/// [`WaveError::EndOfStream`].
#[derive(Debug)]
pub struct WaveReader<R: Read + Seek> {
    inner: R,
    header: Option<Header>,
    /// Where the `RIFF` chunk starts. A failed scan restarts from here.
    scan_start: Option<u64>,
    /// Audio bytes left in the data chunk.
    remaining: u64,
    /// Staging for raw bytes. Grows to the largest read so far and is never shrunk.
    buffer: Vec<u8>,
}

impl WaveReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> WaveResult<Self> {
        let file = File::open(path.as_ref())?;
        log!(
            log::Level::Debug,
            "Reading wav file from {}",
            path.as_ref().display()
        );
        Ok(WaveReader::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> WaveReader<R> {
    pub fn new(inner: R) -> Self {
        WaveReader {
            inner,
            header: None,
            scan_start: None,
            remaining: 0,
            buffer: Vec::new(),
        }
    }

    /// Returns the header, scanning the stream for it on first use.
    pub fn header(&mut self) -> WaveResult<&Header> {
        let header = match self.header.take() {
            Some(header) => header,
            None => {
                let start = match self.scan_start {
                    Some(start) => self.inner.seek(SeekFrom::Start(start))?,
                    None => *self.scan_start.insert(self.inner.stream_position()?),
                };
                log!(log::Level::Trace, "scanning for RIFF chunk at offset {}", start);
                let (file_size, riff) = read_riff_chunk(&mut self.inner)?;
                let header = Header::from_riff(file_size, &riff)?;
                log!(log::Level::Debug, "Parsed header\n{}", header);
                self.remaining = u64::from(header.data_bytes);
                header
            }
        };
        Ok(self.header.insert(header))
    }

    /// Audio bytes left to read. Zero until the header has been parsed.
    pub fn remaining_bytes(&self) -> u64 {
        self.remaining
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn check_sample_type(&mut self, found: SampleType) -> WaveResult<()> {
        let expected = self.header()?.sample_type()?;
        if expected != found {
            return Err(WaveError::SampleTypeMismatch { expected, found });
        }
        Ok(())
    }

    /// Reads until `buf` is full, the data chunk is exhausted or the stream ends.
    fn read_bounded(inner: &mut R, remaining: &mut u64, buf: &mut [u8]) -> WaveResult<usize> {
        let limit = buf.len().min(usize::try_from(*remaining).unwrap_or(usize::MAX));
        let mut filled = 0;
        while filled < limit {
            match inner.read(&mut buf[filled..limit]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        *remaining -= filled as u64;
        Ok(filled)
    }

    /// Stages up to `n_samples` samples of `sample_type` into the scratch buffer and
    /// returns the number of bytes staged.
    fn stage(&mut self, sample_type: SampleType, n_samples: usize) -> WaveResult<usize> {
        self.check_sample_type(sample_type)?;
        let wanted = n_samples * sample_type.n_bytes();
        if self.buffer.len() < wanted {
            self.buffer.resize(wanted, 0);
        }
        Self::read_bounded(
            &mut self.inner,
            &mut self.remaining,
            &mut self.buffer[..wanted],
        )
    }

    fn read_samples<T: AudioSample>(
        &mut self,
        sample_type: SampleType,
        buf: &mut [T],
    ) -> WaveResult<usize> {
        let n_bytes = self.stage(sample_type, buf.len())?;
        let n_samples = decode_le(&self.buffer[..n_bytes], buf);
        full_read(n_bytes, n_samples, buf.len())
    }

    /// Reads 8-bit samples straight into `buf`.
    pub fn read_u8(&mut self, buf: &mut [u8]) -> WaveResult<usize> {
        self.check_sample_type(SampleType::Uint8)?;
        let n_bytes = Self::read_bounded(&mut self.inner, &mut self.remaining, buf)?;
        full_read(n_bytes, n_bytes, buf.len())
    }

    /// Reads 24-bit samples, sign extended into `i32`.
    pub fn read_i24(&mut self, buf: &mut [i32]) -> WaveResult<usize> {
        let n_bytes = self.stage(SampleType::Int24, buf.len())?;
        let whole = n_bytes - n_bytes % 3;
        let n_samples = int24::unpack_into(&self.buffer[..whole], buf)?;
        full_read(n_bytes, n_samples, buf.len())
    }

    pub fn read_i16(&mut self, buf: &mut [i16]) -> WaveResult<usize> {
        self.read_samples(SampleType::Int16, buf)
    }

    pub fn read_i32(&mut self, buf: &mut [i32]) -> WaveResult<usize> {
        self.read_samples(SampleType::Int32, buf)
    }

    pub fn read_f32(&mut self, buf: &mut [f32]) -> WaveResult<usize> {
        self.read_samples(SampleType::Float32, buf)
    }

    pub fn read_f64(&mut self, buf: &mut [f64]) -> WaveResult<usize> {
        self.read_samples(SampleType::Float64, buf)
    }
}

fn full_read(n_bytes: usize, n_samples: usize, wanted: usize) -> WaveResult<usize> {
    if n_samples == wanted {
        Ok(n_samples)
    } else if n_bytes == 0 {
        Err(WaveError::EndOfStream)
    } else {
        Err(WaveError::UnexpectedEndOfStream {
            samples_read: n_samples,
        })
    }
}
