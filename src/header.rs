//! The parsed, read-only view over the chunks at the start of a wav file.
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "colored")]
use colored::Colorize;

use crate::{
    chunks::{
        read_riff_chunk, Chunk, ChunkData, CueChunk, FactChunk, FmtChunk, RiffChunkData, CUE,
        DATA, FACT, FMT,
    },
    error::{WaveError, WaveResult},
    log,
    wav_type::{FormatCode, SampleType},
};

/// Snapshot of a wav file's metadata, built once from a RIFF scan.
///
/// Nothing here is checked for consistency on construction; call [`Header::validate`]
/// for that. The data chunk length is taken as declared and is not compared against
/// the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// The `RIFF` chunk's declared size plus its 8 byte header.
    pub reported_file_size: u64,
    pub format: FmtChunk,
    pub fact: Option<FactChunk>,
    pub cue: Option<CueChunk>,
    /// Bytes of audio in the data chunk, excluding any padding byte.
    pub data_bytes: u32,
    /// Chunks this crate does not interpret, in file order, bodies untouched.
    pub additional_chunks: Vec<Chunk>,
}

impl Header {
    /// Classifies the scanned chunks. A `fmt ` and a `data` chunk are required; `fact`
    /// and `cue ` are parsed when present and everything else is kept as is.
    pub fn from_riff(reported_file_size: u64, riff: &RiffChunkData) -> WaveResult<Header> {
        let mut format = None;
        let mut fact = None;
        let mut cue = None;
        let mut data_bytes = None;
        let mut additional_chunks = Vec::new();

        for chunk in &riff.sub_chunks {
            match chunk.id {
                FMT => format = Some(FmtChunk::from_chunk(chunk)?),
                FACT => fact = Some(FactChunk::from_chunk(chunk)?),
                CUE => cue = Some(CueChunk::from_chunk(chunk)?),
                DATA => data_bytes = Some(chunk.size),
                _ => {
                    log!(log::Level::Trace, "preserving unrecognized {} chunk", chunk.id);
                    additional_chunks.push(chunk.clone());
                }
            }
        }

        let format = format.ok_or(WaveError::MissingFormatChunk)?;
        let data_bytes = data_bytes.ok_or(WaveError::MissingDataChunk)?;

        Ok(Header {
            reported_file_size,
            format,
            fact,
            cue,
            data_bytes,
            additional_chunks,
        })
    }

    /// Resolves the in-memory sample type from the effective format code and bit width.
    pub fn sample_type(&self) -> WaveResult<SampleType> {
        let code = self.format.effective_format_code()?;
        SampleType::try_from((code, self.format.bits_per_sample))
    }

    /// Cross-checks the header fields against each other and returns the first
    /// inconsistency found.
    pub fn validate(&self) -> WaveResult<()> {
        let fmt = &self.format;
        if !fmt.format.is_valid() {
            return Err(WaveError::InvalidFormatCode(fmt.format));
        }

        let bytes_per_sample = u64::from(fmt.bits_per_sample / 8);
        let expected_block_align = bytes_per_sample * u64::from(fmt.channels);

        let expected_byte_rate = u64::from(fmt.frame_rate) * expected_block_align;
        if u64::from(fmt.byte_rate) != expected_byte_rate {
            return Err(WaveError::HeaderMismatch {
                field: "byte rate",
                actual: u64::from(fmt.byte_rate),
                expected: expected_byte_rate,
            });
        }

        if u64::from(fmt.block_align) != expected_block_align {
            return Err(WaveError::HeaderMismatch {
                field: "block align",
                actual: u64::from(fmt.block_align),
                expected: expected_block_align,
            });
        }

        if let Some(fact) = self.fact {
            let expected = self.frame_count();
            if fact.frame_count != expected {
                return Err(WaveError::HeaderMismatch {
                    field: "sample frames",
                    actual: u64::from(fact.frame_count),
                    expected: u64::from(expected),
                });
            }
        }

        if fmt.format != FormatCode::WAVE_FORMAT_EXTENSIBLE && fmt.extension.is_some() {
            return Err(WaveError::UnexpectedExtension(
                "valid bits per sample, channel mask and sub format",
            ));
        }

        Ok(())
    }

    pub fn frame_rate(&self) -> u32 {
        self.format.frame_rate
    }

    pub fn byte_rate(&self) -> u32 {
        self.format.byte_rate
    }

    /// Bits per second. Widened so it cannot overflow.
    pub fn bit_rate(&self) -> u64 {
        u64::from(self.format.byte_rate) * 8
    }

    pub fn channel_count(&self) -> u16 {
        self.format.channels
    }

    /// Number of frames in the data chunk. Zero if the block align is zero.
    pub fn frame_count(&self) -> u32 {
        self.data_bytes
            .checked_div(u32::from(self.format.block_align))
            .unwrap_or(0)
    }

    /// Number of samples across all channels in the data chunk.
    pub fn sample_count(&self) -> u32 {
        self.data_bytes
            .checked_div(u32::from(self.format.bits_per_sample / 8))
            .unwrap_or(0)
    }

    pub fn play_time(&self) -> Duration {
        match self.format.frame_rate {
            0 => Duration::ZERO,
            rate => Duration::from_secs_f64(f64::from(self.frame_count()) / f64::from(rate)),
        }
    }
}

/// Scans the wav file at `path` and returns its header without reading any audio.
pub fn read_header<P: AsRef<Path>>(path: P) -> WaveResult<Header> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    let (file_size, riff) = read_riff_chunk(&mut reader)?;
    let header = Header::from_riff(file_size, &riff)?;
    log!(
        log::Level::Debug,
        "Read header of {}\n{}",
        path.as_ref().display(),
        header
    );
    Ok(header)
}

#[cfg(feature = "colored")]
impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n\t{} {}\n\t{} {}\n\t{} {:?}\n{}",
            "Header:".white().bold().underline(),
            "reported_file_size:".green().bold(),
            self.reported_file_size.to_string().white(),
            "data_bytes:".green().bold(),
            self.data_bytes.to_string().white(),
            "play_time:".green().bold(),
            self.play_time(),
            self.format,
        )?;
        if let Some(fact) = &self.fact {
            write!(f, "\n{}", fact)?;
        }
        if let Some(cue) = &self.cue {
            write!(f, "\n{}", cue)?;
        }
        for chunk in &self.additional_chunks {
            write!(
                f,
                "\n{} {} ({} bytes)",
                "Additional chunk:".white().bold(),
                chunk.id.to_string().yellow(),
                chunk.size
            )?;
        }
        Ok(())
    }
}

#[cfg(not(feature = "colored"))]
impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Header: reported_file_size: {}, data_bytes: {}, play_time: {:?}\n{}",
            self.reported_file_size,
            self.data_bytes,
            self.play_time(),
            self.format
        )?;
        if let Some(fact) = &self.fact {
            write!(f, "\n{}", fact)?;
        }
        if let Some(cue) = &self.cue {
            write!(f, "\n{}", cue)?;
        }
        for chunk in &self.additional_chunks {
            write!(f, "\nAdditional chunk: {} ({} bytes)", chunk.id, chunk.size)?;
        }
        Ok(())
    }
}
