/// Module containing the error types for wavestream
use thiserror::Error;

use crate::chunks::ChunkId;
use crate::wav_type::{FormatCode, SampleType};

pub type WaveResult<T> = Result<T, WaveError>;

/// Error types for wavestream
#[derive(Error, Debug)]
pub enum WaveError {
    #[error("IO error with stream")]
    IOError(#[from] std::io::Error),

    #[error("RIFF header is corrupted: expected {expected}, found {found}")]
    CorruptedHeader { expected: ChunkId, found: ChunkId },
    #[error("end of stream")]
    EndOfStream,
    #[error("unexpected end of stream after {samples_read} samples")]
    UnexpectedEndOfStream { samples_read: usize },
    #[error("premature end of file at offset {offset}, RIFF header declared {declared} bytes")]
    PrematureEndOfFile { offset: u64, declared: u32 },

    #[error("no 'fmt ' chunk present in file")]
    MissingFormatChunk,
    #[error("no 'data' chunk present in file")]
    MissingDataChunk,
    #[error("second 'data' chunk found at offset {offset}")]
    DuplicateDataChunk { offset: u64 },
    #[error("detected corrupted {chunk} payload: expected at least {expected} bytes, found {found}")]
    CorruptedPayload {
        chunk: ChunkId,
        expected: usize,
        found: usize,
    },

    #[error("invalid format code: '{0}'")]
    InvalidFormatCode(FormatCode),
    #[error("sub format is expected, but not present")]
    MissingSubFormat,
    #[error("unknown {format} type: '{bits_per_sample}' bits per sample")]
    UnsupportedBitDepth {
        format: FormatCode,
        bits_per_sample: u16,
    },
    #[error("extensible format requires that valid bits per sample, channel mask, and sub format be set")]
    InvalidExtensible,

    #[error("sample type mismatch: stream uses {expected}, call used {found}")]
    SampleTypeMismatch {
        expected: SampleType,
        found: SampleType,
    },
    #[error("{data_bytes} bytes of audio written, which is not a multiple of the block align ({block_align})")]
    InvalidByteCount { data_bytes: u32, block_align: u16 },

    #[error("{field}: '{actual}' did not match expected result: '{expected}'")]
    HeaderMismatch {
        field: &'static str,
        actual: u64,
        expected: u64,
    },
    #[error("{0} should only be set if format code is extensible")]
    UnexpectedExtension(&'static str),

    #[error("length of packed 24-bit input ({0} bytes) is not divisible by 3")]
    InvalidInt24Length(usize),
    #[error("invalid channel count: {0}")]
    InvalidChannelCount(u16),
    #[error("frame rate {frame_rate} needs a byte rate of {byte_rate}, which does not fit in 32 bits")]
    InvalidFrameRate { frame_rate: u32, byte_rate: u64 },
    #[error("appending {requested} bytes would exceed the 32-bit RIFF size limit")]
    DataTooLarge { requested: usize },
    #[error("invalid interleave: {0}")]
    InvalidInterleave(String),
}

impl WaveError {
    /// True for the two truncation kinds a buffered read can end with.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(
            self,
            WaveError::EndOfStream | WaveError::UnexpectedEndOfStream { .. }
        )
    }
}
