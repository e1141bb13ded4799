//! floatwavio - WAV files as floating-point sample buffers
//!
//! Reads and writes RIFF/WAVE files, converting between the on-disk sample
//! encodings and normalized `f64` samples in [-1.0, 1.0].
//!
//! # Architecture
//!
//! - [`riff`]: chunk reader/writer for the RIFF container
//! - [`codec`]: sample codec for 8/16/24/32-bit integer PCM and 32-bit float
//! - [`engine`]: `WaveFormat`, `SampleBuffer` and the read/write entry points
//!
//! ```no_run
//! use floatwavio::{read_file, write_file, SampleEncoding};
//!
//! let wave = read_file("in.wav")?;
//! let format = wave.format.with_encoding(SampleEncoding::Signed16)?;
//! write_file("out.wav", &format, &wave.buffer)?;
//! # Ok::<(), floatwavio::WavError>(())
//! ```

pub mod cli;
pub mod codec;
pub mod engine;
pub mod error;
pub mod riff;

pub use engine::{
    read, read_file, write, write_file, FormatTag, SampleBuffer, SampleEncoding, Wave, WaveFormat,
};
pub use error::{Result, WavError};
