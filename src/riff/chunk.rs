//! RIFF chunk primitives
//!
//! A chunk is a 4-byte ASCII tag, a 4-byte little-endian body length and the
//! body itself, followed by one pad byte when the length is odd. The pad byte
//! is not counted in the length field.

use std::fmt;
use std::io::{self, Read, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::error::{Result, WavError};

/// Size of a chunk header (tag + length)
pub const CHUNK_HEADER_SIZE: u64 = 8;

/// Four-character chunk identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    pub const RIFF: ChunkId = ChunkId(*b"RIFF");
    pub const WAVE: ChunkId = ChunkId(*b"WAVE");
    pub const FMT: ChunkId = ChunkId(*b"fmt ");
    pub const DATA: ChunkId = ChunkId(*b"data");
    pub const LIST: ChunkId = ChunkId(*b"LIST");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId(\"{}\")", self)
    }
}

/// Tag and declared body length of one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: ChunkId,
    /// Body length, excluding the pad byte
    pub len: u32,
    /// Stream offset of the first body byte
    pub body_offset: u64,
}

impl ChunkHeader {
    /// Whether a pad byte follows the body
    pub fn is_padded(&self) -> bool {
        self.len % 2 == 1
    }
}

/// Sequential chunk reader over a byte stream
///
/// Tracks the stream offset so errors can name the offending byte.
pub struct ChunkReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R) -> Self {
        ChunkReader { inner, position: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read and validate the `RIFF`/size/`WAVE` preamble
    ///
    /// Returns the declared RIFF size.
    ///
    /// # Errors
    /// * `Format` - if either tag is wrong or the stream is shorter than 12 bytes
    pub fn read_riff_header(&mut self) -> Result<u32> {
        let mut header = [0u8; 12];
        let read = self.read_fill(&mut header)?;
        if read < header.len() {
            return Err(WavError::format(
                read as u64,
                format!("stream too short for a RIFF header ({} bytes)", read),
            ));
        }

        let riff = ChunkId([header[0], header[1], header[2], header[3]]);
        if riff != ChunkId::RIFF {
            return Err(WavError::format(0, format!("expected \"RIFF\" tag, found \"{}\"", riff)));
        }

        let wave = ChunkId([header[8], header[9], header[10], header[11]]);
        if wave != ChunkId::WAVE {
            return Err(WavError::format(8, format!("expected \"WAVE\" tag, found \"{}\"", wave)));
        }

        Ok(LittleEndian::read_u32(&header[4..8]))
    }

    /// Read the next chunk header
    ///
    /// Returns `None` at a clean end of stream.
    ///
    /// # Errors
    /// * `TruncatedData` - if the stream ends inside the header
    pub fn next_header(&mut self) -> Result<Option<ChunkHeader>> {
        let start = self.position;
        let mut header = [0u8; CHUNK_HEADER_SIZE as usize];
        let read = self.read_fill(&mut header)?;

        match read {
            0 => Ok(None),
            n if n < header.len() => Err(WavError::TruncatedData {
                offset: start,
                expected: CHUNK_HEADER_SIZE,
                available: n as u64,
            }),
            _ => Ok(Some(ChunkHeader {
                id: ChunkId([header[0], header[1], header[2], header[3]]),
                len: LittleEndian::read_u32(&header[4..8]),
                body_offset: self.position,
            })),
        }
    }

    /// Read a chunk body and its pad byte
    ///
    /// # Errors
    /// * `TruncatedData` - if fewer than `header.len` bytes remain
    pub fn read_body(&mut self, header: &ChunkHeader) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        let read = (&mut self.inner)
            .take(header.len as u64)
            .read_to_end(&mut body)?;
        self.position += read as u64;

        if read < header.len as usize {
            return Err(WavError::TruncatedData {
                offset: header.body_offset,
                expected: header.len as u64,
                available: read as u64,
            });
        }

        self.consume_pad(header)?;
        Ok(body)
    }

    /// Skip a chunk body and its pad byte
    ///
    /// # Errors
    /// * `TruncatedData` - if fewer than `header.len` bytes remain
    pub fn skip_body(&mut self, header: &ChunkHeader) -> Result<()> {
        let skipped = io::copy(
            &mut (&mut self.inner).take(header.len as u64),
            &mut io::sink(),
        )?;
        self.position += skipped;

        if skipped < header.len as u64 {
            return Err(WavError::TruncatedData {
                offset: header.body_offset,
                expected: header.len as u64,
                available: skipped,
            });
        }

        self.consume_pad(header)
    }

    /// A missing pad byte at the very end of the stream is tolerated.
    fn consume_pad(&mut self, header: &ChunkHeader) -> Result<()> {
        if header.is_padded() {
            let mut pad = [0u8; 1];
            if self.read_fill(&mut pad)? == 0 {
                log::debug!("\"{}\" chunk has no pad byte at end of stream", header.id);
            }
        }
        Ok(())
    }

    /// Fill `buf` as far as the stream allows, returning the byte count
    fn read_fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }
}

/// Write one chunk: header, body, and a zero pad byte if the body is odd
///
/// # Errors
/// * `Format` - if the body is longer than a 32-bit length field allows
pub fn write_chunk<W: Write>(writer: &mut W, id: ChunkId, body: &[u8]) -> Result<()> {
    let len = u32::try_from(body.len()).map_err(|_| {
        WavError::format(0, format!("\"{}\" chunk of {} bytes exceeds 4 GiB", id, body.len()))
    })?;

    writer.write_all(id.as_bytes())?;
    writer.write_u32::<LittleEndian>(len)?;
    writer.write_all(body)?;
    if len % 2 == 1 {
        writer.write_u8(0)?;
    }
    Ok(())
}

/// Bytes a chunk occupies on disk, including header and pad byte
pub fn chunk_disk_size(body_len: u64) -> u64 {
    CHUNK_HEADER_SIZE + body_len + (body_len & 1)
}
