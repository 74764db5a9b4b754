use std::fmt::Display;

use crate::error::WaveError;

/// Format code stored in the first two bytes of a `fmt ` chunk. Codes this crate
/// does not interpret are kept as `Unknown` so a header can still be parsed and
/// reported by [`Header::validate`](crate::Header::validate).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCode {
    WAV_FORMAT_PCM,
    WAV_FORMAT_IEEE_FLOAT,
    WAVE_FORMAT_EXTENSIBLE,
    Unknown(u16),
}

impl FormatCode {
    pub const fn as_u16(self) -> u16 {
        match self {
            FormatCode::WAV_FORMAT_PCM => 0x0001,
            FormatCode::WAV_FORMAT_IEEE_FLOAT => 0x0003,
            FormatCode::WAVE_FORMAT_EXTENSIBLE => 0xFFFE,
            FormatCode::Unknown(code) => code,
        }
    }

    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.as_u16().to_le_bytes()
    }

    pub const fn is_valid(self) -> bool {
        !matches!(self, FormatCode::Unknown(_))
    }
}

impl From<u16> for FormatCode {
    fn from(value: u16) -> Self {
        match value {
            0x0001 => FormatCode::WAV_FORMAT_PCM,
            0x0003 => FormatCode::WAV_FORMAT_IEEE_FLOAT,
            0xFFFE => FormatCode::WAVE_FORMAT_EXTENSIBLE,
            other => FormatCode::Unknown(other),
        }
    }
}

impl From<FormatCode> for u16 {
    fn from(value: FormatCode) -> Self {
        value.as_u16()
    }
}

impl Display for FormatCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatCode::WAV_FORMAT_PCM => write!(f, "PCM"),
            FormatCode::WAV_FORMAT_IEEE_FLOAT => write!(f, "IEEE_FLOAT"),
            FormatCode::WAVE_FORMAT_EXTENSIBLE => write!(f, "EXTENSIBLE"),
            FormatCode::Unknown(code) => write!(f, "FormatCode({})", code),
        }
    }
}

/// The in-memory representation used for a stream's samples. Int24 samples are
/// carried in `i32` values in the range `[-8388608, 8388607]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    Uint8,
    Int16,
    Int24,
    Int32,
    Float32,
    Float64,
}

impl SampleType {
    pub const ALL: [SampleType; 6] = [
        SampleType::Uint8,
        SampleType::Int16,
        SampleType::Int24,
        SampleType::Int32,
        SampleType::Float32,
        SampleType::Float64,
    ];

    /// Bytes used by one sample on disk.
    pub const fn n_bytes(&self) -> usize {
        match self {
            SampleType::Uint8 => 1,
            SampleType::Int16 => 2,
            SampleType::Int24 => 3,
            SampleType::Int32 | SampleType::Float32 => 4,
            SampleType::Float64 => 8,
        }
    }

    pub const fn n_bits(&self) -> u16 {
        (self.n_bytes() * 8) as u16
    }

    /// The plain (non-extensible) format code that describes this sample type.
    pub const fn effective_format_code(&self) -> FormatCode {
        match self {
            SampleType::Float32 | SampleType::Float64 => FormatCode::WAV_FORMAT_IEEE_FLOAT,
            _ => FormatCode::WAV_FORMAT_PCM,
        }
    }

    /// Whether a stream of this type with `channels` channels must be described
    /// with a `WAVE_FORMAT_EXTENSIBLE` format chunk.
    pub const fn requires_extensible(&self, channels: u16) -> bool {
        channels > 2 || matches!(self, SampleType::Int24 | SampleType::Int32)
    }
}

impl Display for SampleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleType::Uint8 => write!(f, "Uint8"),
            SampleType::Int16 => write!(f, "Int16"),
            SampleType::Int24 => write!(f, "Int24"),
            SampleType::Int32 => write!(f, "Int32"),
            SampleType::Float32 => write!(f, "Float32"),
            SampleType::Float64 => write!(f, "Float64"),
        }
    }
}

const PCM_8_BITS: u16 = 8;
const PCM_16_BITS: u16 = (std::mem::size_of::<i16>() * 8) as u16;
const PCM_24_BITS: u16 = 24;
const PCM_32_BITS: u16 = (std::mem::size_of::<i32>() * 8) as u16;
const FLOAT_32_BITS: u16 = (std::mem::size_of::<f32>() * 8) as u16;
const FLOAT_64_BITS: u16 = (std::mem::size_of::<f64>() * 8) as u16;

/// Maps an effective (non-extensible) format code and a bit width to a sample type.
impl TryFrom<(FormatCode, u16)> for SampleType {
    type Error = WaveError;

    fn try_from(value: (FormatCode, u16)) -> Result<Self, Self::Error> {
        Ok(match value {
            (FormatCode::WAV_FORMAT_PCM, PCM_8_BITS) => SampleType::Uint8,
            (FormatCode::WAV_FORMAT_PCM, PCM_16_BITS) => SampleType::Int16,
            (FormatCode::WAV_FORMAT_PCM, PCM_24_BITS) => SampleType::Int24,
            (FormatCode::WAV_FORMAT_PCM, PCM_32_BITS) => SampleType::Int32,
            (FormatCode::WAV_FORMAT_IEEE_FLOAT, FLOAT_32_BITS) => SampleType::Float32,
            (FormatCode::WAV_FORMAT_IEEE_FLOAT, FLOAT_64_BITS) => SampleType::Float64,
            (format @ (FormatCode::WAV_FORMAT_PCM | FormatCode::WAV_FORMAT_IEEE_FLOAT), bits) => {
                return Err(WaveError::UnsupportedBitDepth {
                    format,
                    bits_per_sample: bits,
                })
            }
            (format, _) => return Err(WaveError::InvalidFormatCode(format)),
        })
    }
}
