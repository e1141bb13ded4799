//! Sample Codec
//!
//! Converts between the body of a `data` chunk and a normalized
//! [`SampleBuffer`]:
//! - 8-bit unsigned, 16/24/32-bit signed integer PCM
//! - 32-bit IEEE float
//!
//! [`pcm`] holds the byte-order generic conversion used underneath.

pub mod pcm;

use byteorder::LittleEndian;

use crate::engine::buffer::SampleBuffer;
use crate::engine::format::WaveFormat;
use crate::error::{Result, WavError};

pub use pcm::{decode_raw, encode_raw};

/// Decode the body of a `data` chunk
///
/// # Errors
/// * `TruncatedData` - if the length is not a whole number of frames
pub fn decode(bytes: &[u8], format: &WaveFormat) -> Result<SampleBuffer> {
    format.validate()?;
    let block_align = format.block_align() as usize;
    let remainder = bytes.len() % block_align;
    if remainder != 0 {
        return Err(WavError::TruncatedData {
            offset: (bytes.len() - remainder) as u64,
            expected: block_align as u64,
            available: remainder as u64,
        });
    }

    let samples = decode_raw::<LittleEndian>(bytes, format.encoding)?;
    SampleBuffer::new(samples, format.channels)
}

/// Encode a buffer into the body of a `data` chunk
///
/// # Errors
/// * `Format` - if the format is invalid or the buffer's channel count differs
///   from the format's
pub fn encode(buffer: &SampleBuffer, format: &WaveFormat) -> Result<Vec<u8>> {
    format.validate()?;
    if buffer.channels() != format.channels {
        return Err(WavError::format(
            0,
            format!(
                "buffer has {} channels but the format declares {}",
                buffer.channels(),
                format.channels
            ),
        ));
    }

    Ok(encode_raw::<LittleEndian>(buffer.samples(), format.encoding))
}
