//! `fmt ` chunk body codec
//!
//! Offset | Size | Field
//! -----: | ---: | ---------------
//!      0 |    2 | format tag
//!      2 |    2 | channels
//!      4 |    4 | sample rate
//!      8 |    4 | byte rate
//!     12 |    2 | block align
//!     14 |    2 | bits per sample
//!     16 |    2 | extension size (optional)
//!     24 |   16 | sub-format GUID (`WAVE_FORMAT_EXTENSIBLE` only)

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::engine::format::{FormatTag, SampleEncoding, WaveFormat, FORMAT_TAG_EXTENSIBLE};
use crate::error::{Result, WavError};

/// Size of the body written for plain PCM / float formats
pub const FMT_BODY_SIZE: u32 = 16;

const EXTENSIBLE_BODY_SIZE: usize = 40;
const SUB_FORMAT_OFFSET: usize = 24;

/// Bytes 2..16 of `KSDATAFORMAT_SUBTYPE_PCM` / `_IEEE_FLOAT`
const SUB_FORMAT_GUID_TAIL: [u8; 14] = [
    0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0xaa, 0x00, 0x38, 0x9b, 0x71,
];

/// Parse a `fmt ` body into a [`WaveFormat`]
///
/// `body_offset` is the stream offset of the body, used in error reports.
///
/// # Errors
/// * `Format` - short body, zero channels or sample rate, or inconsistent
///   block align / byte rate
/// * `UnsupportedFormat` - tag and bit depth outside the supported table
pub fn parse_fmt(body: &[u8], body_offset: u64) -> Result<WaveFormat> {
    if body.len() < FMT_BODY_SIZE as usize {
        return Err(WavError::format(
            body_offset,
            format!(
                "fmt chunk is {} bytes, at least {} required",
                body.len(),
                FMT_BODY_SIZE
            ),
        ));
    }

    let tag = LittleEndian::read_u16(&body[0..2]);
    let channels = LittleEndian::read_u16(&body[2..4]);
    let sample_rate = LittleEndian::read_u32(&body[4..8]);
    let byte_rate = LittleEndian::read_u32(&body[8..12]);
    let block_align = LittleEndian::read_u16(&body[12..14]);
    let bits_per_sample = LittleEndian::read_u16(&body[14..16]);

    if channels == 0 {
        return Err(WavError::format(body_offset + 2, "channel count is zero"));
    }
    if sample_rate == 0 {
        return Err(WavError::format(body_offset + 4, "sample rate is zero"));
    }

    let tag = match FormatTag::from_u16(tag) {
        FormatTag::Extensible => resolve_extensible(body, body_offset, bits_per_sample)?,
        other => other,
    };
    let encoding = SampleEncoding::from_tag(tag, bits_per_sample)?;

    let expected_align = channels as u32 * encoding.bytes_per_sample() as u32;
    if block_align as u32 != expected_align {
        return Err(WavError::format(
            body_offset + 12,
            format!(
                "block align {} does not match {} channels x {} bits",
                block_align, channels, bits_per_sample
            ),
        ));
    }

    let expected_rate = sample_rate as u64 * block_align as u64;
    if byte_rate as u64 != expected_rate {
        return Err(WavError::format(
            body_offset + 8,
            format!(
                "byte rate {} does not match {} Hz x {} bytes per frame",
                byte_rate, sample_rate, block_align
            ),
        ));
    }

    WaveFormat::new(sample_rate, channels, encoding)
}

/// Look through `WAVE_FORMAT_EXTENSIBLE` to the sub-format's tag
fn resolve_extensible(body: &[u8], body_offset: u64, bits_per_sample: u16) -> Result<FormatTag> {
    if body.len() < EXTENSIBLE_BODY_SIZE {
        return Err(WavError::format(
            body_offset,
            format!(
                "extensible fmt chunk is {} bytes, at least {} required",
                body.len(),
                EXTENSIBLE_BODY_SIZE
            ),
        ));
    }

    let guid = &body[SUB_FORMAT_OFFSET..SUB_FORMAT_OFFSET + 16];
    if guid[2..] != SUB_FORMAT_GUID_TAIL {
        return Err(WavError::UnsupportedFormat {
            format_tag: FORMAT_TAG_EXTENSIBLE,
            bits_per_sample,
        });
    }

    Ok(FormatTag::from_u16(LittleEndian::read_u16(&guid[0..2])))
}

/// Serialize a [`WaveFormat`] as a 16-byte `fmt ` body
pub fn fmt_body(format: &WaveFormat) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(FMT_BODY_SIZE as usize);
    write_fmt_body(&mut body, format)?;
    Ok(body)
}

fn write_fmt_body<W: Write>(writer: &mut W, format: &WaveFormat) -> Result<()> {
    writer.write_u16::<LittleEndian>(format.encoding.format_tag().to_u16())?;
    writer.write_u16::<LittleEndian>(format.channels)?;
    writer.write_u32::<LittleEndian>(format.sample_rate)?;
    writer.write_u32::<LittleEndian>(format.byte_rate())?;
    writer.write_u16::<LittleEndian>(format.block_align())?;
    writer.write_u16::<LittleEndian>(format.bits_per_sample())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm_body(tag: u16, channels: u16, rate: u32, byte_rate: u32, align: u16, bits: u16) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&tag.to_le_bytes());
        body.extend_from_slice(&channels.to_le_bytes());
        body.extend_from_slice(&rate.to_le_bytes());
        body.extend_from_slice(&byte_rate.to_le_bytes());
        body.extend_from_slice(&align.to_le_bytes());
        body.extend_from_slice(&bits.to_le_bytes());
        body
    }

    fn extensible_body(bits: u16, sub_tag: u16) -> Vec<u8> {
        let mut body = pcm_body(0xFFFE, 2, 48000, 288_000, 6, bits);
        body.extend_from_slice(&22u16.to_le_bytes()); // extension size
        body.extend_from_slice(&bits.to_le_bytes()); // valid bits
        body.extend_from_slice(&3u32.to_le_bytes()); // channel mask
        body.extend_from_slice(&sub_tag.to_le_bytes());
        body.extend_from_slice(&SUB_FORMAT_GUID_TAIL);
        body
    }

    #[test]
    fn test_parse_canonical_pcm() {
        let body = [
            0x01, 0x00, // audio format
            0x02, 0x00, // num channels
            0x22, 0x56, 0x00, 0x00, // sample rate
            0x88, 0x58, 0x01, 0x00, // byte rate
            0x04, 0x00, // block align
            0x10, 0x00, // bits per sample
        ];
        let format = parse_fmt(&body, 20).unwrap();
        assert_eq!(format.sample_rate, 22050);
        assert_eq!(format.channels, 2);
        assert_eq!(format.encoding, SampleEncoding::Signed16);
    }

    #[test]
    fn test_parse_float_with_extension_size() {
        let mut body = pcm_body(3, 1, 44100, 176_400, 4, 32);
        body.extend_from_slice(&[0, 0]);
        let format = parse_fmt(&body, 20).unwrap();
        assert_eq!(format.encoding, SampleEncoding::Float32);
    }

    #[test]
    fn test_parse_extensible() {
        let format = parse_fmt(&extensible_body(24, 1), 20).unwrap();
        assert_eq!(format.encoding, SampleEncoding::Signed24);
        assert_eq!(format.channels, 2);
    }

    #[test]
    fn test_extensible_too_short() {
        let body = pcm_body(0xFFFE, 2, 48000, 288_000, 6, 24);
        assert!(matches!(parse_fmt(&body, 20), Err(WavError::Format { .. })));
    }

    #[test]
    fn test_extensible_unknown_guid() {
        let mut body = extensible_body(24, 1);
        body[30] = 0x42;
        assert!(matches!(
            parse_fmt(&body, 20),
            Err(WavError::UnsupportedFormat {
                format_tag: 0xFFFE,
                ..
            })
        ));
    }

    #[test]
    fn test_short_body() {
        assert!(matches!(
            parse_fmt(&[1, 0, 1, 0], 20),
            Err(WavError::Format { offset: 20, .. })
        ));
    }

    #[test]
    fn test_inconsistent_block_align() {
        let body = pcm_body(1, 2, 44100, 176_400, 2, 16);
        assert!(matches!(
            parse_fmt(&body, 20),
            Err(WavError::Format { offset: 32, .. })
        ));
    }

    #[test]
    fn test_inconsistent_byte_rate() {
        let body = pcm_body(1, 2, 44100, 44100, 4, 16);
        assert!(matches!(
            parse_fmt(&body, 20),
            Err(WavError::Format { offset: 28, .. })
        ));
    }

    #[test]
    fn test_unsupported_combination() {
        let body = pcm_body(6, 1, 8000, 8000, 1, 8);
        assert!(matches!(
            parse_fmt(&body, 20),
            Err(WavError::UnsupportedFormat {
                format_tag: 6,
                bits_per_sample: 8
            })
        ));

        let body = pcm_body(3, 1, 8000, 64000, 8, 64);
        assert!(matches!(
            parse_fmt(&body, 20),
            Err(WavError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_zero_channels() {
        let body = pcm_body(1, 0, 44100, 0, 0, 16);
        assert!(matches!(parse_fmt(&body, 20), Err(WavError::Format { offset: 22, .. })));
    }

    #[test]
    fn test_body_layout() {
        let format = WaveFormat::new(48000, 2, SampleEncoding::Signed24).unwrap();
        let body = fmt_body(&format).unwrap();
        assert_eq!(body, pcm_body(1, 2, 48000, 288_000, 6, 24));
        assert_eq!(parse_fmt(&body, 0).unwrap(), format);
    }
}
