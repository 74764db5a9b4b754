//! Contains the FmtChunk struct and its (de)serialization.
use std::fmt::{Display, Formatter};

#[cfg(feature = "colored")]
use colored::Colorize;

use crate::{
    chunks::{ensure_len, put_le, read_u16_le, read_u32_le, ChunkData, ChunkId, FMT},
    error::{WaveError, WaveResult},
    wav_type::{FormatCode, SampleType},
};

pub const FMT_SIZE_BASE_SIZE: usize = 16; // Standard wav file format size
pub const FMT_CB_SIZE: usize = 18; // An extended Format chunk is used for non-PCM data. The cbSize field gives the size of the extension. (0 or 22)
pub const FMT_SIZE_EXTENDED_SIZE: usize = 40; // CB_SIZE + 22 (2 bytes valid_bits_per_sample, 4 byte channel_mask, 16(2+14) byte sub_format)

pub const EXTENSION_SIZE: u16 = 22;

// End of the sub format code, the last extension field that is parsed
const FMT_EXTENSION_FIELDS_END: usize = FMT_CB_SIZE + 8;

// Remainder of the KSDATAFORMAT_SUBTYPE_PCM / _IEEE_FLOAT GUIDs after the 2 byte format code
const EXTENDED_FMT_GUID: [u8; 14] = *b"\x00\x00\x00\x00\x10\x00\x80\x00\x00\xAA\x00\x38\x9B\x71";

/// Fields carried only by `WAVE_FORMAT_EXTENSIBLE` format chunks. They are always
/// present or absent together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtExtension {
    pub valid_bits_per_sample: u16,
    /// Speaker position mask.
    pub channel_mask: u32,
    /// Plays the role `format` plays for non-extensible chunks.
    pub sub_format: FormatCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtChunk {
    /// How the audio data should be interpreted.
    pub format: FormatCode,
    /// Number of channels in the audio data.
    pub channels: u16,
    /// Frames played per second, independent of the channel count. Usually called the sample rate.
    pub frame_rate: u32,
    /// Bytes played per second, `frame_rate * block_align`.
    pub byte_rate: u32,
    /// Bytes in a single frame, `channels * bits_per_sample / 8`.
    pub block_align: u16,
    /// Bits per sample, rounded up to a multiple of 8.
    pub bits_per_sample: u16,
    pub extension: Option<FmtExtension>,
}

impl FmtChunk {
    /// Constructs a new FmtChunk using the provided format, number of channels, frame rate and bits per sample.
    /// The remaining fields are calculated using these arguments.
    pub fn new(
        format: FormatCode,
        channels: u16,
        frame_rate: u32,
        bits_per_sample: u16,
        extension: Option<FmtExtension>,
    ) -> Self {
        let block_align = (u32::from(channels) * u32::from(bits_per_sample) / 8) as u16;
        let byte_rate = frame_rate.saturating_mul(u32::from(block_align));
        FmtChunk {
            format,
            channels,
            frame_rate,
            byte_rate,
            block_align,
            bits_per_sample,
            extension,
        }
    }

    /// Derives the format chunk for a stream of `sample_type` samples. The
    /// extensible layout is used whenever the plain one would be ambiguous:
    /// more than two channels, or 24/32-bit integer samples.
    pub fn for_sample_type(
        sample_type: SampleType,
        channels: u16,
        frame_rate: u32,
        channel_mask: u32,
    ) -> Self {
        let effective = sample_type.effective_format_code();
        let bits_per_sample = sample_type.n_bits();

        match sample_type.requires_extensible(channels) {
            true => FmtChunk::new(
                FormatCode::WAVE_FORMAT_EXTENSIBLE,
                channels,
                frame_rate,
                bits_per_sample,
                Some(FmtExtension {
                    valid_bits_per_sample: bits_per_sample,
                    channel_mask,
                    sub_format: effective,
                }),
            ),
            false => FmtChunk::new(effective, channels, frame_rate, bits_per_sample, None),
        }
    }

    pub fn is_extended_format(&self) -> bool {
        self.format == FormatCode::WAVE_FORMAT_EXTENSIBLE
    }

    /// The format code that actually describes the samples: `format`, or the sub
    /// format for extensible chunks.
    pub fn effective_format_code(&self) -> WaveResult<FormatCode> {
        match (self.format, self.extension) {
            (FormatCode::WAVE_FORMAT_EXTENSIBLE, Some(ext)) => Ok(ext.sub_format),
            (FormatCode::WAVE_FORMAT_EXTENSIBLE, None) => Err(WaveError::MissingSubFormat),
            (format, _) => Ok(format),
        }
    }

    /// Size of the serialized body, excluding the 8 byte chunk header.
    pub fn chunk_size(&self) -> u32 {
        match self.format {
            FormatCode::WAV_FORMAT_IEEE_FLOAT => FMT_CB_SIZE as u32,
            FormatCode::WAVE_FORMAT_EXTENSIBLE => FMT_SIZE_EXTENDED_SIZE as u32,
            _ => FMT_SIZE_BASE_SIZE as u32,
        }
    }
}

impl ChunkData for FmtChunk {
    const ID: ChunkId = FMT;

    fn to_body(&self) -> WaveResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.chunk_size() as usize);
        put_le(&mut bytes, self.format.as_u16());
        put_le(&mut bytes, self.channels);
        put_le(&mut bytes, self.frame_rate);
        put_le(&mut bytes, self.byte_rate);
        put_le(&mut bytes, self.block_align);
        put_le(&mut bytes, self.bits_per_sample);

        match self.format {
            // Non-PCM codes must carry an extension size, even an empty one
            FormatCode::WAV_FORMAT_IEEE_FLOAT => put_le(&mut bytes, 0u16),
            FormatCode::WAVE_FORMAT_EXTENSIBLE => {
                let ext = self.extension.ok_or(WaveError::InvalidExtensible)?;
                put_le(&mut bytes, EXTENSION_SIZE);
                put_le(&mut bytes, ext.valid_bits_per_sample);
                put_le(&mut bytes, ext.channel_mask);
                bytes.extend_from_slice(&ext.sub_format.to_le_bytes());
                bytes.extend_from_slice(&EXTENDED_FMT_GUID);
            }
            _ => (),
        }
        Ok(bytes)
    }

    /// Structural checks only; field consistency is left to [`Header::validate`](crate::Header::validate).
    fn from_body(body: &[u8]) -> WaveResult<Self> {
        ensure_len(FMT, body, FMT_SIZE_BASE_SIZE)?;

        let mut extension = None;
        if body.len() >= FMT_CB_SIZE {
            let cb_size = read_u16_le(body, 16);
            // The rest of the GUID and any further extension bytes are ignored
            if cb_size >= EXTENSION_SIZE {
                ensure_len(FMT, body, FMT_EXTENSION_FIELDS_END)?;
                extension = Some(FmtExtension {
                    valid_bits_per_sample: read_u16_le(body, 18),
                    channel_mask: read_u32_le(body, 20),
                    sub_format: FormatCode::from(read_u16_le(body, 24)),
                });
            }
        }

        Ok(FmtChunk {
            format: FormatCode::from(read_u16_le(body, 0)),
            channels: read_u16_le(body, 2),
            frame_rate: read_u32_le(body, 4),
            byte_rate: read_u32_le(body, 8),
            block_align: read_u16_le(body, 12),
            bits_per_sample: read_u16_le(body, 14),
            extension,
        })
    }
}

#[cfg(feature = "colored")]
impl Display for FmtChunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n\t{} {}\n\t{} {}\n\t{} {}\n\t{} {}\n\t{} {}\n\t{} {}",
            "FmtChunk:".white().bold().underline(),
            "format:".green().bold(),
            self.format.to_string().white(),
            "channels:".green().bold(),
            self.channels.to_string().white(),
            "frame_rate:".green().bold(),
            self.frame_rate.to_string().white(),
            "byte_rate:".green().bold(),
            self.byte_rate.to_string().white(),
            "block_align:".green().bold(),
            self.block_align.to_string().white(),
            "bits_per_sample:".green().bold(),
            self.bits_per_sample.to_string().white(),
        )?;
        if let Some(ext) = self.extension {
            write!(
                f,
                "\n\t{} {}\n\t{} {:#010X}\n\t{} {}",
                "valid_bits_per_sample:".green().bold(),
                ext.valid_bits_per_sample.to_string().white(),
                "channel_mask:".green().bold(),
                ext.channel_mask,
                "sub_format:".green().bold(),
                ext.sub_format.to_string().white(),
            )?;
        }
        Ok(())
    }
}

#[cfg(not(feature = "colored"))]
impl Display for FmtChunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FmtChunk: format: {}, channels: {}, frame_rate: {}, byte_rate: {}, block_align: {}, bits_per_sample: {}",
            self.format,
            self.channels,
            self.frame_rate,
            self.byte_rate,
            self.block_align,
            self.bits_per_sample
        )?;
        if let Some(ext) = self.extension {
            write!(
                f,
                ", valid_bits_per_sample: {}, channel_mask: {:#010X}, sub_format: {}",
                ext.valid_bits_per_sample, ext.channel_mask, ext.sub_format
            )?;
        }
        Ok(())
    }
}
