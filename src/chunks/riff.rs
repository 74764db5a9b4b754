//! The root `RIFF` chunk: scanning a stream for its sub chunks and serializing a preamble.
use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::{
    chunks::{Chunk, ChunkId, DATA, RIFF, WAVE},
    error::{WaveError, WaveResult},
    log,
};

// "RIFF" + size + "WAVE"
const RIFF_PREAMBLE_SIZE: u64 = 12;

/// The sub chunks of a `RIFF` chunk. The `WAVE` type tag that precedes them in
/// the file is implied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RiffChunkData {
    pub sub_chunks: Vec<Chunk>,
}

impl RiffChunkData {
    pub fn new(sub_chunks: Vec<Chunk>) -> Self {
        RiffChunkData { sub_chunks }
    }

    /// Returns the `WAVE` tag followed by every serialized sub chunk, along with the
    /// size the enclosing `RIFF` chunk must declare.
    ///
    /// The declared size is computed from each chunk's `size` field and counts a padding
    /// byte for every odd size, so it can exceed the length of the returned bytes. This
    /// is how the `data` chunk header is emitted without its audio.
    pub fn serialize(&self) -> WaveResult<(Vec<u8>, u32)> {
        let mut bytes = Vec::with_capacity(
            4 + self
                .sub_chunks
                .iter()
                .map(|c| 8 + c.body.len())
                .sum::<usize>(),
        );
        bytes.extend_from_slice(WAVE.as_bytes());

        let mut total: u64 = 4;
        for chunk in &self.sub_chunks {
            chunk.serialize_into(&mut bytes);
            total += chunk.padded_len();
        }

        let total = u32::try_from(total).map_err(|_| WaveError::DataTooLarge {
            requested: total as usize,
        })?;
        Ok((bytes, total))
    }

    /// The full `RIFF` chunk, body included.
    pub fn to_chunk(&self) -> WaveResult<Chunk> {
        let (body, size) = self.serialize()?;
        Ok(Chunk {
            id: RIFF,
            size,
            body,
        })
    }

    pub fn find(&self, id: ChunkId) -> Option<&Chunk> {
        self.sub_chunks.iter().find(|c| c.id == id)
    }
}

fn truncated(err: std::io::Error, offset: u64, declared: u32) -> WaveError {
    match err.kind() {
        ErrorKind::UnexpectedEof => WaveError::PrematureEndOfFile { offset, declared },
        _ => WaveError::IOError(err),
    }
}

fn read_word<R: Read>(reader: &mut R) -> std::io::Result<[u8; 4]> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Reads the `RIFF` chunk at the start of `reader`, returning the total file size
/// (the declared size plus the 8 bytes of the `RIFF` header) and its sub chunks.
///
/// Every chunk but `data` is read into memory along with its padding byte. The
/// `data` chunk is recorded with its declared size and an empty body, and its audio
/// is skipped with a seek. Scanning stops once the declared size is reached, after
/// which `reader` is positioned at the first byte of audio.
///
/// The data chunk may appear anywhere in the file, but only once. Offsets are
/// relative to the position of `reader` on entry.
pub fn read_riff_chunk<R: Read + Seek>(reader: &mut R) -> WaveResult<(u64, RiffChunkData)> {
    let base = reader.stream_position()?;
    let preamble_eof = |err: std::io::Error| match err.kind() {
        ErrorKind::UnexpectedEof => WaveError::EndOfStream,
        _ => WaveError::IOError(err),
    };

    let riff = ChunkId(read_word(reader).map_err(preamble_eof)?);
    if riff != RIFF {
        return Err(WaveError::CorruptedHeader {
            expected: RIFF,
            found: riff,
        });
    }
    let declared = u32::from_le_bytes(read_word(reader).map_err(preamble_eof)?);
    let file_size = u64::from(declared) + 8;

    let wave = ChunkId(read_word(reader).map_err(preamble_eof)?);
    if wave != WAVE {
        return Err(WaveError::CorruptedHeader {
            expected: WAVE,
            found: wave,
        });
    }

    let mut offset = RIFF_PREAMBLE_SIZE;
    let mut data_offset: Option<u64> = None;
    let mut sub_chunks = Vec::with_capacity(4);

    while offset < file_size {
        let id = ChunkId(read_word(reader).map_err(|e| truncated(e, offset, declared))?);
        let size = u32::from_le_bytes(
            read_word(reader).map_err(|e| truncated(e, offset + 4, declared))?,
        );
        let chunk_start = offset;
        offset += 8;
        let padding = u64::from(size & 1);

        if id == DATA {
            if data_offset.is_some() {
                return Err(WaveError::DuplicateDataChunk {
                    offset: chunk_start,
                });
            }
            log!(
                log::Level::Trace,
                "data chunk at offset {} declares {} bytes",
                chunk_start,
                size
            );
            data_offset = Some(offset);
            offset = reader.seek(SeekFrom::Start(base + offset + u64::from(size) + padding))? - base;
            sub_chunks.push(Chunk::header_only(id, size));
            continue;
        }

        // Bounded so a corrupt size cannot force a huge allocation up front
        let mut body = Vec::new();
        reader.by_ref().take(u64::from(size)).read_to_end(&mut body)?;
        if body.len() < size as usize {
            return Err(WaveError::PrematureEndOfFile {
                offset: offset + body.len() as u64,
                declared,
            });
        }
        offset += u64::from(size);

        if padding != 0 {
            let mut pad = [0u8; 1];
            // A missing pad byte at the very end of the stream is tolerated
            if reader.read(&mut pad)? == 0 {
                offset = file_size;
            } else {
                offset += 1;
            }
        }

        log!(log::Level::Trace, "found {} chunk, {} bytes", id, size);
        sub_chunks.push(Chunk { id, size, body });
    }

    reader.seek(SeekFrom::Start(
        base + data_offset.unwrap_or(RIFF_PREAMBLE_SIZE),
    ))?;
    Ok((file_size, RiffChunkData { sub_chunks }))
}
