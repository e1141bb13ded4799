//! Raw sample conversion
//!
//! Converts headerless sample streams between bytes and normalized `f64`
//! values. The byte order is a type parameter so the same code serves the
//! little-endian WAV path and big-endian raw streams.

use byteorder::ByteOrder;

use crate::engine::format::SampleEncoding;
use crate::error::{Result, WavError};

/// Full-scale divisor for 8-bit unsigned samples
const SCALE_8: f64 = 128.0;
/// Full-scale divisor for 16-bit samples (2^15)
const SCALE_16: f64 = 32768.0;
/// Full-scale divisor for 24-bit samples (2^23)
const SCALE_24: f64 = 8388608.0;
/// Full-scale divisor for 32-bit samples (2^31)
const SCALE_32: f64 = 2147483648.0;

const I24_MIN: i64 = -(1 << 23);
const I24_MAX: i64 = (1 << 23) - 1;

/// Decode raw sample bytes into normalized values
///
/// 8-bit samples are single bytes, so `B` does not affect them. Float
/// samples are passed through without clamping.
///
/// # Errors
/// * `TruncatedData` - if `bytes` ends in a partial sample
pub fn decode_raw<B: ByteOrder>(bytes: &[u8], encoding: SampleEncoding) -> Result<Vec<f64>> {
    let width = encoding.bytes_per_sample();
    let remainder = bytes.len() % width;
    if remainder != 0 {
        return Err(WavError::TruncatedData {
            offset: (bytes.len() - remainder) as u64,
            expected: width as u64,
            available: remainder as u64,
        });
    }

    let samples = bytes
        .chunks_exact(width)
        .map(|raw| match encoding {
            SampleEncoding::Unsigned8 => (raw[0] as f64 - SCALE_8) / SCALE_8,
            SampleEncoding::Signed16 => B::read_i16(raw) as f64 / SCALE_16,
            SampleEncoding::Signed24 => B::read_i24(raw) as f64 / SCALE_24,
            SampleEncoding::Signed32 => B::read_i32(raw) as f64 / SCALE_32,
            SampleEncoding::Float32 => B::read_f32(raw) as f64,
        })
        .collect();

    Ok(samples)
}

/// Encode normalized values into raw sample bytes
///
/// Integer encodings clamp each value to [-1.0, 1.0], round half away from
/// zero and saturate at the integer range. NaN encodes as the zero point.
pub fn encode_raw<B: ByteOrder>(samples: &[f64], encoding: SampleEncoding) -> Vec<u8> {
    let width = encoding.bytes_per_sample();
    let mut bytes = vec![0u8; samples.len() * width];

    for (&sample, raw) in samples.iter().zip(bytes.chunks_exact_mut(width)) {
        match encoding {
            SampleEncoding::Unsigned8 => {
                raw[0] = (quantize(sample, SCALE_8, i8::MIN as i64, i8::MAX as i64) + 128) as u8;
            }
            SampleEncoding::Signed16 => {
                let value = quantize(sample, SCALE_16, i16::MIN as i64, i16::MAX as i64);
                B::write_i16(raw, value as i16);
            }
            SampleEncoding::Signed24 => {
                B::write_i24(raw, quantize(sample, SCALE_24, I24_MIN, I24_MAX) as i32);
            }
            SampleEncoding::Signed32 => {
                let value = quantize(sample, SCALE_32, i32::MIN as i64, i32::MAX as i64);
                B::write_i32(raw, value as i32);
            }
            SampleEncoding::Float32 => B::write_f32(raw, sample as f32),
        }
    }

    bytes
}

/// Scale a normalized sample to an integer in `min..=max`
#[inline]
fn quantize(sample: f64, scale: f64, min: i64, max: i64) -> i64 {
    // f64::round rounds ties away from zero
    let scaled = (sample.clamp(-1.0, 1.0) * scale).round();
    scaled.clamp(min as f64, max as f64) as i64
}
