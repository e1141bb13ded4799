//! Audio Engine Module
//!
//! Data model and top-level entry points:
//! - Wave format description
//! - Sample buffer management
//! - File I/O operations

pub mod buffer;
pub mod format;
pub mod io;

pub use buffer::SampleBuffer;
pub use format::{FormatTag, SampleEncoding, WaveFormat};
pub use io::{read, read_file, write, write_file, Wave};
