//! Error handling for floatwavio
//!
//! Every failure is terminal for the call that raised it. Errors carry the
//! byte offset or field that caused them so callers can point at the problem.

use thiserror::Error;

/// Result type alias for floatwavio operations
pub type Result<T> = std::result::Result<T, WavError>;

/// Main error type for reading and writing WAV data
#[derive(Error, Debug)]
pub enum WavError {
    /// Malformed or unrecognized container or format-chunk structure
    #[error("Malformed WAV data at byte {offset}: {reason}")]
    Format { offset: u64, reason: String },

    /// Well-formed, but the encoding/bit-depth combination is not implemented
    #[error("Unsupported sample format: format tag {format_tag:#06x}, {bits_per_sample} bits per sample")]
    UnsupportedFormat {
        format_tag: u16,
        bits_per_sample: u16,
    },

    /// A declared length runs past the end of the available bytes
    #[error("Truncated data at byte {offset}: expected {expected} bytes, found {available}")]
    TruncatedData {
        offset: u64,
        expected: u64,
        available: u64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WavError {
    pub(crate) fn format(offset: u64, reason: impl Into<String>) -> Self {
        WavError::Format {
            offset,
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            WavError::Format { .. } => "FORMAT_ERROR",
            WavError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            WavError::TruncatedData { .. } => "TRUNCATED_DATA",
            WavError::Io(_) => "IO_ERROR",
        }
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            WavError::Format { .. } => "The file is not a valid RIFF/WAVE file or its header is corrupt",
            WavError::UnsupportedFormat { .. } => {
                "Convert to 8/16/24/32-bit integer PCM or 32-bit float first"
            }
            WavError::TruncatedData { .. } => "The file appears cut short - try re-exporting it from the source",
            WavError::Io(_) => "Check that the path exists and is readable/writable",
        }
    }
}
