pub mod cue;
pub mod fact;
pub mod fmt;
pub mod riff;

use std::fmt::Display;
use std::io::Write;

use num_traits::ToBytes;

pub use crate::chunks::cue::{CueChunk, CuePoint};
pub use crate::chunks::fact::FactChunk;
pub use crate::chunks::fmt::{FmtChunk, FmtExtension};
pub use crate::chunks::riff::{read_riff_chunk, RiffChunkData};
use crate::error::{WaveError, WaveResult};

// 100% necessary to have these chunks
pub const RIFF: ChunkId = ChunkId(*b"RIFF");
pub const WAVE: ChunkId = ChunkId(*b"WAVE");
pub const FMT: ChunkId = ChunkId(*b"fmt ");
pub const DATA: ChunkId = ChunkId(*b"data");

// Optional chunks
pub const FACT: ChunkId = ChunkId(*b"fact");
pub const CUE: ChunkId = ChunkId(*b"cue ");

/// Wrapper around a 4 byte buffer. Used for storing and displaying/debugging the identifier of a chunk.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    pub const fn new(identifier: [u8; 4]) -> Self {
        ChunkId(identifier)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for ChunkId {
    fn from(identifier: [u8; 4]) -> Self {
        ChunkId(identifier)
    }
}

impl From<&[u8; 4]> for ChunkId {
    fn from(identifier: &[u8; 4]) -> Self {
        ChunkId(*identifier)
    }
}

impl Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "'{}'", s),
            Err(_) => write!(f, "{:02X?}", self.0),
        }
    }
}

/// The structural primitive of a RIFF file: a 4 byte identifier, a declared body
/// size and the body itself.
///
/// `size` is not required to match `body.len()`. The writer emits a `data` chunk
/// header whose size covers audio bytes that were streamed separately, and the
/// scanner records the `data` chunk's size without buffering its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub id: ChunkId,
    pub size: u32,
    pub body: Vec<u8>,
}

impl Chunk {
    pub fn new(id: ChunkId, body: Vec<u8>) -> Self {
        Chunk {
            id,
            size: body.len() as u32,
            body,
        }
    }

    /// A chunk header with no body, declaring `size` bytes.
    pub fn header_only(id: ChunkId, size: u32) -> Self {
        Chunk {
            id,
            size,
            body: Vec::new(),
        }
    }

    /// Identifier, little-endian size, then body. No padding byte is added.
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.body.len());
        self.serialize_into(&mut bytes);
        bytes
    }

    pub fn serialize_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.id.as_bytes());
        put_le(out, self.size);
        out.extend_from_slice(&self.body);
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> WaveResult<usize> {
        let bytes = self.serialize();
        writer.write_all(&bytes)?;
        Ok(bytes.len())
    }

    /// Bytes this chunk occupies inside its parent, including the header and the
    /// padding byte an odd-sized body is followed by.
    pub fn padded_len(&self) -> u64 {
        8 + u64::from(self.size) + u64::from(self.size & 1)
    }
}

/// Typed chunk bodies that can be converted to and from a raw [`Chunk`].
pub trait ChunkData: Sized {
    const ID: ChunkId;

    fn to_body(&self) -> WaveResult<Vec<u8>>;
    fn from_body(body: &[u8]) -> WaveResult<Self>;

    fn to_chunk(&self) -> WaveResult<Chunk> {
        Ok(Chunk::new(Self::ID, self.to_body()?))
    }

    fn from_chunk(chunk: &Chunk) -> WaveResult<Self> {
        Self::from_body(&chunk.body)
    }
}

pub(crate) fn put_le<T: ToBytes>(out: &mut Vec<u8>, value: T) {
    out.extend_from_slice(value.to_le_bytes().as_ref());
}

pub(crate) fn read_u16_le(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

pub(crate) fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

pub(crate) fn ensure_len(chunk: ChunkId, body: &[u8], expected: usize) -> WaveResult<()> {
    if body.len() < expected {
        return Err(WaveError::CorruptedPayload {
            chunk,
            expected,
            found: body.len(),
        });
    }
    Ok(())
}
