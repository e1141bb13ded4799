//! Chunk Reader/Writer
//!
//! Maps between a byte stream and the RIFF/WAVE chunk sequence:
//! - `RIFF` / size / `WAVE` preamble
//! - exactly one `fmt ` chunk, which must precede the single `data` chunk
//! - any other chunk is skipped
//!
//! The RIFF size field is advisory. Traversal follows the actual chunk
//! lengths until the stream ends, and a disagreeing size is only logged.

pub mod chunk;
pub mod fmt;

use std::io::{Read, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, warn};

use crate::engine::format::WaveFormat;
use crate::error::{Result, WavError};

pub use chunk::{chunk_disk_size, write_chunk, ChunkHeader, ChunkId, ChunkReader};
pub use fmt::{fmt_body, parse_fmt, FMT_BODY_SIZE};

/// The parts of a WAVE file the sample codec needs
#[derive(Debug, Clone)]
pub struct WaveChunks {
    pub format: WaveFormat,
    /// Raw `data` chunk body, without its pad byte
    pub data: Vec<u8>,
    /// Chunks that were skipped, in stream order
    pub skipped: Vec<ChunkId>,
    /// RIFF size field as declared in the file
    pub declared_riff_size: u32,
}

/// Read the chunk structure of a WAVE stream
///
/// # Errors
/// * `Format` - bad preamble, missing/duplicate `fmt ` or `data`, `data`
///   before `fmt `, or an invalid `fmt ` body
/// * `UnsupportedFormat` - unsupported encoding in `fmt `
/// * `TruncatedData` - a chunk runs past the end of the stream
/// * `Io` - the underlying reader failed
pub fn read_chunks<R: Read>(reader: R) -> Result<WaveChunks> {
    let mut reader = ChunkReader::new(reader);
    let declared_riff_size = reader.read_riff_header()?;

    let mut format: Option<WaveFormat> = None;
    let mut data: Option<Vec<u8>> = None;
    let mut skipped = Vec::new();

    loop {
        let header = match reader.next_header() {
            Ok(Some(header)) => header,
            Ok(None) => break,
            Err(WavError::TruncatedData { offset, available, .. }) if data.is_some() => {
                warn!(
                    "Ignoring {} trailing bytes at offset {} after the data chunk",
                    available, offset
                );
                break;
            }
            Err(e) => return Err(e),
        };
        let header_offset = header.body_offset - chunk::CHUNK_HEADER_SIZE;

        debug!(
            "Chunk \"{}\" at offset {}, {} bytes",
            header.id, header_offset, header.len
        );

        match header.id {
            ChunkId::FMT => {
                if format.is_some() {
                    return Err(WavError::format(header_offset, "duplicate fmt chunk"));
                }
                let body = reader.read_body(&header)?;
                format = Some(parse_fmt(&body, header.body_offset)?);
            }
            ChunkId::DATA => {
                if format.is_none() {
                    return Err(WavError::format(
                        header_offset,
                        "data chunk appears before the fmt chunk",
                    ));
                }
                if data.is_some() {
                    return Err(WavError::format(header_offset, "duplicate data chunk"));
                }
                data = Some(reader.read_body(&header)?);
            }
            _ => {
                reader.skip_body(&header)?;
                skipped.push(header.id);
            }
        }
    }

    let format = format.ok_or_else(|| WavError::format(reader.position(), "no fmt chunk found"))?;
    let data = data.ok_or_else(|| WavError::format(reader.position(), "no data chunk found"))?;

    let actual_riff_size = reader.position().saturating_sub(chunk::CHUNK_HEADER_SIZE);
    if actual_riff_size != declared_riff_size as u64 {
        warn!(
            "RIFF size field says {} bytes but the chunks span {}; using the chunks",
            declared_riff_size, actual_riff_size
        );
    }

    Ok(WaveChunks {
        format,
        data,
        skipped,
        declared_riff_size,
    })
}

/// Write a complete WAVE stream around an already encoded `data` body
///
/// # Errors
/// * `Format` - invalid format, or data too large for a 32-bit RIFF size field
/// * `Io` - the underlying writer failed
pub fn write_chunks<W: Write>(writer: &mut W, format: &WaveFormat, data: &[u8]) -> Result<()> {
    format.validate()?;
    let riff_size = riff_size(data.len() as u64);
    let riff_size = u32::try_from(riff_size).map_err(|_| {
        WavError::format(
            0,
            format!("{} bytes of sample data exceed the 4 GiB RIFF limit", data.len()),
        )
    })?;

    writer.write_all(ChunkId::RIFF.as_bytes())?;
    writer.write_u32::<LittleEndian>(riff_size)?;
    writer.write_all(ChunkId::WAVE.as_bytes())?;
    write_chunk(writer, ChunkId::FMT, &fmt_body(format)?)?;
    write_chunk(writer, ChunkId::DATA, data)?;

    debug!(
        "Wrote RIFF of {} bytes ({} data bytes)",
        riff_size as u64 + chunk::CHUNK_HEADER_SIZE,
        data.len()
    );
    Ok(())
}

/// RIFF size field for a file holding one 16-byte `fmt ` and `data_len` bytes of data
pub fn riff_size(data_len: u64) -> u64 {
    ChunkId::WAVE.as_bytes().len() as u64
        + chunk_disk_size(FMT_BODY_SIZE as u64)
        + chunk_disk_size(data_len)
}
