//! Cue chunk: named marker offsets into the data chunk.
use std::fmt::{Display, Formatter};

#[cfg(feature = "colored")]
use colored::Colorize;

use crate::{
    chunks::{ensure_len, put_le, read_u32_le, ChunkData, ChunkId, CUE},
    error::WaveResult,
};

const CUE_COUNT_SIZE: usize = 4;
const CUE_POINT_SIZE: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuePoint {
    pub id: u32,
    pub position: u32,
    /// Id of the chunk holding the cue, normally `data`.
    pub fcc_chunk: ChunkId,
    pub chunk_start: u32,
    pub block_start: u32,
    pub sample_offset: u32,
}

impl CuePoint {
    fn from_bytes(bytes: &[u8]) -> Self {
        CuePoint {
            id: read_u32_le(bytes, 0),
            position: read_u32_le(bytes, 4),
            fcc_chunk: ChunkId([bytes[8], bytes[9], bytes[10], bytes[11]]),
            chunk_start: read_u32_le(bytes, 12),
            block_start: read_u32_le(bytes, 16),
            sample_offset: read_u32_le(bytes, 20),
        }
    }
}

/// Parsed from files but never produced by [`WaveWriter`](crate::WaveWriter).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CueChunk {
    pub cue_points: Vec<CuePoint>,
}

impl ChunkData for CueChunk {
    const ID: ChunkId = CUE;

    fn to_body(&self) -> WaveResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(CUE_COUNT_SIZE + CUE_POINT_SIZE * self.cue_points.len());
        put_le(&mut bytes, self.cue_points.len() as u32);
        for point in &self.cue_points {
            put_le(&mut bytes, point.id);
            put_le(&mut bytes, point.position);
            bytes.extend_from_slice(point.fcc_chunk.as_bytes());
            put_le(&mut bytes, point.chunk_start);
            put_le(&mut bytes, point.block_start);
            put_le(&mut bytes, point.sample_offset);
        }
        Ok(bytes)
    }

    /// Fails if the body is too short for the count it declares. Field values are not checked.
    fn from_body(body: &[u8]) -> WaveResult<Self> {
        ensure_len(CUE, body, CUE_COUNT_SIZE)?;
        let n_points = read_u32_le(body, 0) as usize;
        ensure_len(
            CUE,
            body,
            n_points
                .saturating_mul(CUE_POINT_SIZE)
                .saturating_add(CUE_COUNT_SIZE),
        )?;

        let cue_points = body[CUE_COUNT_SIZE..]
            .chunks_exact(CUE_POINT_SIZE)
            .take(n_points)
            .map(CuePoint::from_bytes)
            .collect();
        Ok(CueChunk { cue_points })
    }
}

#[cfg(feature = "colored")]
impl Display for CueChunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", "CueChunk:".white().bold().underline())?;
        for point in &self.cue_points {
            write!(
                f,
                "\n\t{} {} {} {} {} {}",
                "id:".green().bold(),
                point.id.to_string().white(),
                "chunk:".green().bold(),
                point.fcc_chunk.to_string().white(),
                "sample_offset:".green().bold(),
                point.sample_offset.to_string().white(),
            )?;
        }
        Ok(())
    }
}

#[cfg(not(feature = "colored"))]
impl Display for CueChunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "CueChunk: {} cue points", self.cue_points.len())?;
        for point in &self.cue_points {
            write!(
                f,
                "\n\tid: {} chunk: {} sample_offset: {}",
                point.id, point.fcc_chunk, point.sample_offset
            )?;
        }
        Ok(())
    }
}
