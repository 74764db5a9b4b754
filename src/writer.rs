//! Incremental, append-only wav writer over a seekable sink.
//!
//! The header of a wav file holds totals (the RIFF size, the data chunk size and
//! the fact chunk's frame count) that are only known once all audio has been
//! written. [`WaveWriter`] writes a provisional preamble in front of the first
//! samples and rewrites it in place on [`WaveWriter::flush`]. The preamble's
//! layout is fixed at construction, so both writes produce the same number of
//! bytes and the rewrite never touches audio.
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::{
    chunks::{Chunk, ChunkData, FactChunk, FmtChunk, RiffChunkData, DATA},
    error::{WaveError, WaveResult},
    int24, log,
    sample::write_le,
    wav_type::{FormatCode, SampleType},
};

/// Optional writer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    channels: u16,
    channel_mask: u32,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            channels: 1,
            channel_mask: 0,
        }
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of interleaved channels. Defaults to 1.
    pub fn channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    /// Speaker position mask. Only written for extensible layouts.
    pub fn channel_mask(mut self, channel_mask: u32) -> Self {
        self.channel_mask = channel_mask;
        self
    }
}

/// Writes interleaved samples of a single [`SampleType`] to a wav stream.
///
/// [`WaveWriter::flush`] must be called once all samples are written, otherwise the
/// header on disk still describes an empty file. Dropping the writer does not flush.
///
/// ```no_run
/// use wavestream::{SampleType, WaveWriter, WriterOptions};
///
/// let mut writer = WaveWriter::create(
///     "out.wav",
///     SampleType::Int16,
///     44100,
///     WriterOptions::new().channels(2),
/// )?;
/// writer.write_i16(&[0, 0, 1000, -1000])?;
/// writer.flush()?;
/// # Ok::<(), wavestream::WaveError>(())
/// ```
#[derive(Debug)]
pub struct WaveWriter<W: Write + Seek> {
    sink: W,
    sample_type: SampleType,
    format: FmtChunk,
    fact: Option<FactChunk>,
    data_bytes: u32,
    preamble_len: u64,
    preamble_written: bool,
    scratch: Vec<u8>,
}

impl WaveWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and writes to it through a buffer.
    pub fn create<P: AsRef<Path>>(
        path: P,
        sample_type: SampleType,
        frame_rate: u32,
        options: WriterOptions,
    ) -> WaveResult<Self> {
        let file = File::create(path.as_ref())?;
        log!(
            log::Level::Debug,
            "Writing {} wav file to {}",
            sample_type,
            path.as_ref().display()
        );
        WaveWriter::new(BufWriter::new(file), sample_type, frame_rate, options)
    }
}

impl<W: Write + Seek> WaveWriter<W> {
    /// Constructs a writer over `sink`. Nothing is written until the first append or flush.
    pub fn new(
        sink: W,
        sample_type: SampleType,
        frame_rate: u32,
        options: WriterOptions,
    ) -> WaveResult<Self> {
        let channels = options.channels;
        if channels == 0 || usize::from(channels) * sample_type.n_bytes() > usize::from(u16::MAX)
        {
            return Err(WaveError::InvalidChannelCount(channels));
        }

        let block_align = u64::from(channels) * sample_type.n_bytes() as u64;
        if u64::from(frame_rate) * block_align > u64::from(u32::MAX) {
            return Err(WaveError::InvalidFrameRate {
                frame_rate,
                byte_rate: u64::from(frame_rate) * block_align,
            });
        }

        let format =
            FmtChunk::for_sample_type(sample_type, channels, frame_rate, options.channel_mask);

        // Plain PCM is the only format that may omit the fact chunk
        let fact = match format.format {
            FormatCode::WAV_FORMAT_PCM => None,
            _ => Some(FactChunk::default()),
        };

        let mut writer = WaveWriter {
            sink,
            sample_type,
            format,
            fact,
            data_bytes: 0,
            preamble_len: 0,
            preamble_written: false,
            scratch: Vec::new(),
        };
        writer.preamble_len = writer.preamble()?.len() as u64;
        Ok(writer)
    }

    pub fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    pub fn format(&self) -> &FmtChunk {
        &self.format
    }

    pub fn fact(&self) -> Option<&FactChunk> {
        self.fact.as_ref()
    }

    /// Bytes of audio appended so far, excluding any padding byte.
    pub fn data_bytes(&self) -> u32 {
        self.data_bytes
    }

    /// Length of everything in front of the audio: the `RIFF` header, the format and
    /// fact chunks and the data chunk header.
    pub fn preamble_len(&self) -> u64 {
        self.preamble_len
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Returns the sink without flushing.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// `RIFF` chunk wrapping the format chunk, the fact chunk if present and the header
    /// of the data chunk. The data chunk's body is streamed separately.
    fn preamble(&self) -> WaveResult<Vec<u8>> {
        let mut sub_chunks = Vec::with_capacity(3);
        sub_chunks.push(self.format.to_chunk()?);
        if let Some(fact) = &self.fact {
            sub_chunks.push(fact.to_chunk()?);
        }
        sub_chunks.push(Chunk::header_only(DATA, self.data_bytes));
        Ok(RiffChunkData::new(sub_chunks).to_chunk()?.serialize())
    }

    fn write_preamble(&mut self) -> WaveResult<()> {
        let preamble = self.preamble()?;
        debug_assert_eq!(preamble.len() as u64, self.preamble_len);

        self.sink.seek(SeekFrom::Start(0))?;
        self.sink.write_all(&preamble)?;
        self.preamble_written = true;
        log!(
            log::Level::Trace,
            "wrote {} byte preamble, data chunk size {}",
            preamble.len(),
            self.data_bytes
        );
        Ok(())
    }

    /// Shared by every typed append. `encode` receives the sink positioned at the end
    /// of the audio, plus a scratch buffer it may use for staging.
    fn append<F>(&mut self, found: SampleType, n_samples: usize, encode: F) -> WaveResult<()>
    where
        F: FnOnce(&mut W, &mut Vec<u8>) -> std::io::Result<()>,
    {
        if found != self.sample_type {
            return Err(WaveError::SampleTypeMismatch {
                expected: self.sample_type,
                found,
            });
        }

        let requested = n_samples.saturating_mul(found.n_bytes());
        let total = u64::from(self.data_bytes) + requested as u64;
        // The RIFF size field must still hold the file, padding byte included
        if self.preamble_len - 8 + total + (total & 1) > u64::from(u32::MAX) {
            return Err(WaveError::DataTooLarge { requested });
        }

        if !self.preamble_written {
            self.write_preamble()?;
        }

        // Appending at the logical end overwrites a padding byte left by an earlier flush
        self.sink
            .seek(SeekFrom::Start(self.preamble_len + u64::from(self.data_bytes)))?;
        encode(&mut self.sink, &mut self.scratch)?;

        self.data_bytes = total as u32;
        Ok(())
    }

    /// Appends interleaved 24-bit samples. Each `i32` must lie in `[-8388608, 8388607]`;
    /// the high byte of values outside that range is dropped.
    pub fn write_i24(&mut self, samples: &[i32]) -> WaveResult<()> {
        self.append(SampleType::Int24, samples.len(), |sink, scratch| {
            scratch.clear();
            int24::pack_into(samples, scratch);
            sink.write_all(scratch)
        })
    }

    /// Finalizes the header: checks that only whole frames were written, records the
    /// frame count in the fact chunk, pads an odd-sized data chunk and rewrites the
    /// preamble at the start of the sink.
    ///
    /// May be called more than once; each call re-validates and rewrites the header.
    pub fn flush(&mut self) -> WaveResult<()> {
        let block_align = u32::from(self.format.block_align);
        if self.data_bytes % block_align != 0 {
            return Err(WaveError::InvalidByteCount {
                data_bytes: self.data_bytes,
                block_align: self.format.block_align,
            });
        }

        if let Some(fact) = self.fact.as_mut() {
            fact.frame_count = self.data_bytes / block_align;
        }

        if self.data_bytes & 1 == 1 {
            self.sink
                .seek(SeekFrom::Start(self.preamble_len + u64::from(self.data_bytes)))?;
            self.sink.write_all(&[0])?;
        }

        self.write_preamble()?;
        self.sink.flush()?;

        log!(
            log::Level::Debug,
            "flushed {} bytes of {} audio",
            self.data_bytes,
            self.sample_type
        );
        Ok(())
    }

    /// Flushes and hands back the sink.
    pub fn finalize(mut self) -> WaveResult<W> {
        self.flush()?;
        Ok(self.sink)
    }
}

macro_rules! typed_appends {
    ($(($T:ident, $variant:ident)),*) => {
        impl<W: Write + Seek> WaveWriter<W> {
            $(
                paste::paste! {
                    #[doc = "Appends interleaved `" $T "` samples. Fails if the writer was not created for `SampleType::" $variant "`."]
                    pub fn [<write_ $T>](&mut self, samples: &[$T]) -> WaveResult<()> {
                        self.append(SampleType::$variant, samples.len(), |sink, _| write_le(sink, samples))
                    }
                }
            )*
        }
    };
}

typed_appends!(
    (u8, Uint8),
    (i16, Int16),
    (i32, Int32),
    (f32, Float32),
    (f64, Float64)
);

#[cfg(test)]
mod writer_tests {
    use super::*;
    use crate::chunks::read_riff_chunk;
    use crate::header::Header;
    use std::io::Cursor;

    fn writer(sample_type: SampleType, channels: u16) -> WaveWriter<Cursor<Vec<u8>>> {
        WaveWriter::new(
            Cursor::new(Vec::new()),
            sample_type,
            44100,
            WriterOptions::new().channels(channels),
        )
        .unwrap()
    }

    fn parse(bytes: &[u8]) -> Header {
        let mut cursor = Cursor::new(bytes.to_vec());
        let (file_size, riff) = read_riff_chunk(&mut cursor).unwrap();
        Header::from_riff(file_size, &riff).unwrap()
    }

    #[test]
    fn empty_file() {
        let mut w = writer(SampleType::Uint8, 1);
        w.flush().unwrap();
        let bytes = w.into_inner().into_inner();
        assert_eq!(bytes.len(), 44);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[4..8], &36u32.to_le_bytes());
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(&bytes[40..44], &[0, 0, 0, 0]);
    }

    #[test]
    fn stereo_i16() {
        let samples: [i16; 6] = [-32768, -32767, 0, 1, 32766, 32767];
        let mut w = writer(SampleType::Int16, 2);
        w.write_i16(&samples).unwrap();
        let bytes = w.finalize().unwrap().into_inner();
        assert_eq!(bytes.len(), 56);

        let mut expected = Vec::new();
        for s in samples {
            expected.extend_from_slice(&s.to_le_bytes());
        }
        assert_eq!(&bytes[44..], &expected[..]);

        let header = parse(&bytes);
        assert_eq!(header.frame_count(), 3);
        assert_eq!(header.sample_count(), 6);
        assert_eq!(header.reported_file_size, 56);
        assert!(header.fact.is_none());
        assert!(header.validate().is_ok());
    }

    #[test]
    fn four_channel_u8_is_extensible() {
        let mut w = writer(SampleType::Uint8, 4);
        w.write_u8(&[0, 64, 128, 255, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let bytes = w.finalize().unwrap().into_inner();
        assert_eq!(bytes.len(), 92);
        assert_eq!(&bytes[16..20], &40u32.to_le_bytes());

        let header = parse(&bytes);
        assert_eq!(header.format.format, FormatCode::WAVE_FORMAT_EXTENSIBLE);
        assert_eq!(
            header.format.extension.unwrap().sub_format,
            FormatCode::WAV_FORMAT_PCM
        );
        assert_eq!(header.fact, Some(FactChunk::new(3)));
        assert!(header.validate().is_ok());
    }

    #[test]
    fn odd_data_is_padded() {
        let mut w = writer(SampleType::Uint8, 1);
        w.write_u8(&[0, 1, 2]).unwrap();
        w.flush().unwrap();
        let bytes = w.into_inner().into_inner();
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[4..8], &40u32.to_le_bytes());
        assert_eq!(&bytes[40..44], &3u32.to_le_bytes());
        assert_eq!(bytes[47], 0);

        let header = parse(&bytes);
        assert_eq!(header.data_bytes, 3);
        assert_eq!(header.reported_file_size, 48);
    }

    #[test]
    fn torn_frame_fails_flush() {
        let mut w = writer(SampleType::Int16, 2);
        w.write_i16(&[1, 2, 3]).unwrap();
        match w.flush() {
            Err(WaveError::InvalidByteCount {
                data_bytes: 6,
                block_align: 4,
            }) => (),
            other => panic!("unexpected result {:?}", other),
        }
        // completing the frame makes the stream valid again
        w.write_i16(&[4]).unwrap();
        w.flush().unwrap();
    }

    #[test]
    fn sample_type_mismatch() {
        let mut w = writer(SampleType::Int24, 1);
        match w.write_i32(&[1]) {
            Err(WaveError::SampleTypeMismatch { expected, found }) => {
                assert_eq!(expected, SampleType::Int24);
                assert_eq!(found, SampleType::Int32);
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(w.write_f32(&[0.0]).is_err());
        assert!(w.write_u8(&[0]).is_err());
        assert_eq!(w.data_bytes(), 0);
        w.write_i24(&[1, -1]).unwrap();
        assert_eq!(w.data_bytes(), 6);
    }

    #[test]
    fn preamble_length_is_stable() {
        for st in SampleType::ALL {
            for channels in [1u16, 2, 4] {
                let mut w = writer(st, channels);
                let preamble_len = w.preamble_len();
                let first = w.preamble().unwrap();
                assert_eq!(first.len() as u64, preamble_len);

                let frame = vec![0u8; st.n_bytes() * usize::from(channels)];
                w.append(st, channels as usize, |sink, _| sink.write_all(&frame))
                    .unwrap();
                w.flush().unwrap();
                let last = w.preamble().unwrap();
                assert_eq!(last.len() as u64, preamble_len);
                assert_ne!(first, last);

                let bytes = w.into_inner().into_inner();
                assert_eq!(&bytes[..preamble_len as usize], &last[..]);
            }
        }
    }

    #[test]
    fn fact_frames_match_data() {
        for (st, channels) in [
            (SampleType::Float32, 1u16),
            (SampleType::Float64, 2),
            (SampleType::Int24, 2),
            (SampleType::Int32, 1),
            (SampleType::Int16, 4),
        ] {
            let mut w = writer(st, channels);
            assert!(w.fact().is_some());
            let n_frames = 5usize;
            let frame = vec![0u8; st.n_bytes() * usize::from(channels)];
            for _ in 0..n_frames {
                w.append(st, channels as usize, |sink, _| sink.write_all(&frame))
                    .unwrap();
            }
            w.flush().unwrap();
            assert_eq!(w.fact().unwrap().frame_count, n_frames as u32);

            let header = parse(&w.into_inner().into_inner());
            assert_eq!(header.fact.unwrap().frame_count, 5);
            assert!(header.validate().is_ok());
        }
    }

    #[test]
    fn plain_pcm_has_no_fact() {
        assert!(writer(SampleType::Uint8, 1).fact().is_none());
        assert!(writer(SampleType::Int16, 2).fact().is_none());
    }

    #[test]
    fn append_after_flush_overwrites_padding() {
        let mut w = writer(SampleType::Uint8, 1);
        w.write_u8(&[1]).unwrap();
        w.flush().unwrap();
        w.flush().unwrap();
        assert_eq!(w.get_ref().get_ref().len(), 46);

        w.write_u8(&[2, 3]).unwrap();
        w.flush().unwrap();
        let bytes = w.into_inner().into_inner();
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[44..], &[1, 2, 3, 0]);
        assert_eq!(parse(&bytes).data_bytes, 3);
    }

    #[test]
    fn invalid_channel_counts() {
        for channels in [0u16, u16::MAX] {
            let result = WaveWriter::new(
                Cursor::new(Vec::new()),
                SampleType::Float64,
                44100,
                WriterOptions::new().channels(channels),
            );
            assert!(matches!(result, Err(WaveError::InvalidChannelCount(c)) if c == channels));
        }
    }

    #[test]
    fn byte_rate_must_fit_the_format_chunk() {
        let result = WaveWriter::new(
            Cursor::new(Vec::new()),
            SampleType::Float64,
            600_000_000,
            WriterOptions::new(),
        );
        match result {
            Err(WaveError::InvalidFrameRate {
                frame_rate,
                byte_rate,
            }) => {
                assert_eq!(frame_rate, 600_000_000);
                assert_eq!(byte_rate, 4_800_000_000);
            }
            other => panic!("unexpected result {:?}", other),
        }

        // the largest rate that still fits produces a header that validates
        let frame_rate = u32::MAX / 8;
        let mut w = WaveWriter::new(
            Cursor::new(Vec::new()),
            SampleType::Float64,
            frame_rate,
            WriterOptions::new(),
        )
        .unwrap();
        w.write_f64(&[0.25, -0.25]).unwrap();
        let header = parse(&w.finalize().unwrap().into_inner());
        assert_eq!(header.format.byte_rate, frame_rate * 8);
        header.validate().unwrap();
    }

    #[test]
    fn channel_mask_is_written_for_extensible() {
        let w = WaveWriter::new(
            Cursor::new(Vec::new()),
            SampleType::Int16,
            48000,
            WriterOptions::new().channels(6).channel_mask(0x3F),
        )
        .unwrap();
        assert_eq!(w.format().extension.unwrap().channel_mask, 0x3F);
    }

    #[test]
    fn oversized_append_is_rejected() {
        let mut w = writer(SampleType::Uint8, 1);
        w.data_bytes = u32::MAX - 40;
        assert!(matches!(
            w.write_u8(&[0; 8]),
            Err(WaveError::DataTooLarge { requested: 8 })
        ));
        assert_eq!(w.data_bytes(), u32::MAX - 40);
    }
}
