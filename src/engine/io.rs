//! WAV file I/O for floatwavio
//!
//! Read path: chunk reader extracts `fmt ` and `data`, the sample codec
//! decodes `data`. Write path is the mirror image.
//!
//! Path-based helpers open the file for the duration of the call only.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::codec;
use crate::engine::buffer::SampleBuffer;
use crate::engine::format::WaveFormat;
use crate::error::Result;
use crate::riff::{self, ChunkId};

/// A decoded WAV file
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    /// Format from the `fmt ` chunk
    pub format: WaveFormat,
    /// Decoded samples from the `data` chunk
    pub buffer: SampleBuffer,
    /// Chunks other than `fmt ` and `data`, in file order
    pub skipped_chunks: Vec<ChunkId>,
}

impl Wave {
    pub fn duration_secs(&self) -> f64 {
        self.buffer.duration_secs(self.format.sample_rate)
    }
}

/// Read a WAV stream
///
/// # Arguments
/// * `reader` - Byte source positioned at the start of the file
///
/// # Errors
/// * `Format` - malformed container or `fmt ` chunk
/// * `UnsupportedFormat` - encoding outside the supported table
/// * `TruncatedData` - declared lengths exceed the available bytes
/// * `Io` - the reader failed
pub fn read<R: Read>(reader: R) -> Result<Wave> {
    let chunks = riff::read_chunks(reader)?;
    let buffer = codec::decode(&chunks.data, &chunks.format)?;

    debug!(
        "Decoded {} frames of {:?} at {} Hz",
        buffer.num_frames(),
        chunks.format.encoding,
        chunks.format.sample_rate
    );

    Ok(Wave {
        format: chunks.format,
        buffer,
        skipped_chunks: chunks.skipped,
    })
}

/// Write a WAV stream
///
/// # Errors
/// * `Format` - channel count mismatch, or data too large for RIFF
/// * `Io` - the writer failed
pub fn write<W: Write>(writer: &mut W, format: &WaveFormat, buffer: &SampleBuffer) -> Result<()> {
    let data = codec::encode(buffer, format)?;
    riff::write_chunks(writer, format, &data)
}

/// Read a WAV file from disk
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Wave> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let wave = read(BufReader::new(file))?;

    info!(
        "Read {}: {} ch, {} Hz, {} bits, {:.3}s",
        path.display(),
        wave.format.channels,
        wave.format.sample_rate,
        wave.format.bits_per_sample(),
        wave.duration_secs()
    );

    Ok(wave)
}

/// Write a WAV file to disk, replacing any existing file
pub fn write_file<P: AsRef<Path>>(path: P, format: &WaveFormat, buffer: &SampleBuffer) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer, format, buffer)?;
    // flush explicitly, errors in Drop are swallowed
    writer.flush()?;

    info!(
        "Wrote {}: {} frames, {} ch, {} bits",
        path.display(),
        buffer.num_frames(),
        format.channels,
        format.bits_per_sample()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::format::SampleEncoding;
    use crate::error::WavError;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn sine(frames: usize, channels: u16) -> SampleBuffer {
        let samples = (0..frames * channels as usize)
            .map(|i| (i as f64 * 0.05).sin() * 0.8)
            .collect();
        SampleBuffer::new(samples, channels).unwrap()
    }

    #[test]
    fn test_round_trip_in_memory() {
        let format = WaveFormat::new(44100, 2, SampleEncoding::Signed16).unwrap();
        let original = sine(100, 2);

        let mut bytes = Vec::new();
        write(&mut bytes, &format, &original).unwrap();
        let wave = read(Cursor::new(bytes)).unwrap();

        assert_eq!(wave.format, format);
        assert!(wave.buffer.is_approx_equal(&original, 1.0 / 32768.0));
        assert!(wave.skipped_chunks.is_empty());
    }

    #[test]
    fn test_round_trip_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.wav");

        let format = WaveFormat::new(48000, 1, SampleEncoding::Float32).unwrap();
        let original = sine(480, 1);
        write_file(&path, &format, &original).unwrap();

        let wave = read_file(&path).unwrap();
        assert_eq!(wave.format, format);
        assert!(wave.buffer.is_approx_equal(&original, 1e-7));
        assert!((wave.duration_secs() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_odd_data_length_is_padded() {
        let format = WaveFormat::new(8000, 1, SampleEncoding::Unsigned8).unwrap();
        let buffer = SampleBuffer::new(vec![0.0, 0.5, -0.5], 1).unwrap();

        let mut bytes = Vec::new();
        write(&mut bytes, &format, &buffer).unwrap();

        // 44-byte header + 3 data bytes + 1 pad byte
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[40..44], &3u32.to_le_bytes());
        assert_eq!(bytes[47], 0);
        assert_eq!(&bytes[4..8], &40u32.to_le_bytes());

        let wave = read(Cursor::new(bytes)).unwrap();
        assert_eq!(wave.buffer.samples(), &[0.0, 0.5, -0.5]);
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_file("/nonexistent/path/audio.wav");
        assert!(matches!(result, Err(WavError::Io(_))));
    }
}
