//! Contains the FactChunk struct and its implementation.
use std::fmt::{Display, Formatter};

#[cfg(feature = "colored")]
use colored::Colorize;

use crate::{
    chunks::{ensure_len, read_u32_le, ChunkData, ChunkId, FACT},
    error::WaveResult,
};

pub const FACT_SIZE: usize = 4;

/// The fact chunk of a wav file. Contains a single field, `frame_count`, the number of frames in the data chunk.
/// Required for every format that is not plain PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FactChunk {
    pub frame_count: u32,
}

impl FactChunk {
    pub fn new(frame_count: u32) -> Self {
        Self { frame_count }
    }
}

impl ChunkData for FactChunk {
    const ID: ChunkId = FACT;

    fn to_body(&self) -> WaveResult<Vec<u8>> {
        Ok(self.frame_count.to_le_bytes().to_vec())
    }

    fn from_body(body: &[u8]) -> WaveResult<Self> {
        ensure_len(FACT, body, FACT_SIZE)?;
        Ok(FactChunk::new(read_u32_le(body, 0)))
    }
}

impl From<[u8; 4]> for FactChunk {
    fn from(bytes: [u8; 4]) -> Self {
        FactChunk::new(u32::from_le_bytes(bytes))
    }
}

#[cfg(feature = "colored")]
impl Display for FactChunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n\t{} {}",
            "FactChunk:".white().bold().underline(),
            "frame_count:".green().bold(),
            self.frame_count.to_string().white()
        )
    }
}

#[cfg(not(feature = "colored"))]
impl Display for FactChunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FactChunk: frame_count: {}", self.frame_count)
    }
}

#[cfg(test)]
mod fact_tests {
    use super::*;
    use crate::chunks::Chunk;
    use crate::error::WaveError;

    #[test]
    fn to_chunk() {
        let chunk = FactChunk::new(3).to_chunk().unwrap();
        assert_eq!(
            chunk.serialize(),
            vec![b'f', b'a', b'c', b't', 4, 0, 0, 0, 3, 0, 0, 0]
        );
    }

    #[test]
    fn from_chunk() {
        let chunk = Chunk::new(FACT, vec![0x10, 0x27, 0x00, 0x00]);
        assert_eq!(FactChunk::from_chunk(&chunk).unwrap().frame_count, 10_000);
        // trailing bytes beyond the fixed layout are ignored
        let chunk = Chunk::new(FACT, vec![1, 0, 0, 0, 0xAA, 0xBB]);
        assert_eq!(FactChunk::from_chunk(&chunk).unwrap().frame_count, 1);
    }

    #[test]
    fn from_short_body() {
        match FactChunk::from_body(&[1, 2, 3]) {
            Err(WaveError::CorruptedPayload {
                chunk,
                expected: 4,
                found: 3,
            }) => assert_eq!(chunk, FACT),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
