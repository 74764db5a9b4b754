//! # wavestream
//!
//! Streaming reader and writer for WAVE audio files.
//!
//! Files are written incrementally: samples are appended as they become available and
//! the header is finalized once at the end, so a file never has to be held in memory.
//! Reading is the mirror image. The header is scanned once, without buffering the
//! audio, and samples are then decoded in caller-sized blocks.
//!
//! ## Supported formats
//!
//! - Integer PCM: `u8`, `i16`, 24-bit (carried in `i32`) and `i32`
//! - IEEE float: `f32`, `f64`
//! - The extensible format, which is selected automatically for more than two channels
//!   and for 24 and 32-bit integer samples
//! - `fact` and `cue ` chunks. Any other chunk is preserved untouched in the [`Header`]
//!
//! ## Optional Features
//!
//! - `colored`: colored `Display` output for headers and chunks
//! - `logging`: operation logging through the `log` crate
//!
//! ## Writing Audio
//!
//! ```no_run
//! use wavestream::{SampleType, WaveWriter, WriterOptions};
//!
//! let mut writer = WaveWriter::create("sine.wav", SampleType::Float32, 44100, WriterOptions::new())?;
//! let samples: Vec<f32> = (0..44100)
//!     .map(|i| (i as f32 / 44100.0 * 440.0 * 2.0 * std::f32::consts::PI).sin())
//!     .collect();
//! for block in samples.chunks(1024) {
//!     writer.write_f32(block)?;
//! }
//! writer.flush()?;
//! # Ok::<(), wavestream::WaveError>(())
//! ```
//!
//! ## Reading Audio
//!
//! ```no_run
//! use wavestream::{SampleType, WaveError, WaveReader};
//!
//! let mut reader = WaveReader::open("sine.wav")?;
//! let header = reader.header()?;
//! println!("{} Hz, {} channels, {:?}", header.frame_rate(), header.channel_count(), header.play_time());
//! assert_eq!(header.sample_type()?, SampleType::Float32);
//!
//! let mut block = vec![0.0f32; 1024];
//! loop {
//!     match reader.read_f32(&mut block) {
//!         Ok(n) => { /* process block[..n] */ }
//!         Err(WaveError::UnexpectedEndOfStream { samples_read }) => { /* process block[..samples_read] */ break; }
//!         Err(WaveError::EndOfStream) => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! # Ok::<(), wavestream::WaveError>(())
//! ```

pub mod chunks;
pub mod conversion;
pub mod decoder;
pub mod error;
pub mod header;
pub mod int24;
pub mod interleave;
pub mod reader;
pub mod sample;
pub mod wav_type;
pub mod writer;

pub use crate::chunks::{
    Chunk, ChunkData, ChunkId, CueChunk, CuePoint, FactChunk, FmtChunk, FmtExtension,
    RiffChunkData, CUE, DATA, FACT, FMT, RIFF, WAVE,
};
pub use crate::decoder::Decoder;
pub use crate::error::{WaveError, WaveResult};
pub use crate::header::{read_header, Header};
pub use crate::interleave::{deinterleave, interleave};
pub use crate::reader::WaveReader;
pub use crate::sample::AudioSample;
pub use crate::wav_type::{FormatCode, SampleType};
pub use crate::writer::{WaveWriter, WriterOptions};

/// A macro for logging messages if the logging feature is enabled.
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)+) => {
        #[cfg(feature = "logging")]
        log::log!($level, $($arg)+);
    };
}
