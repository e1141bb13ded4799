//! Wave format description
//!
//! `WaveFormat` is the parsed form of the `fmt ` chunk. The sample encoding is
//! a tagged variant so that only supported bit-depth/format-tag combinations
//! can exist once a format has been constructed.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WavError};

/// `WAVE_FORMAT_PCM`
pub const FORMAT_TAG_PCM: u16 = 0x0001;

/// `WAVE_FORMAT_IEEE_FLOAT`
pub const FORMAT_TAG_IEEE_FLOAT: u16 = 0x0003;

/// `WAVE_FORMAT_EXTENSIBLE`, the real tag lives in the sub-format GUID
pub const FORMAT_TAG_EXTENSIBLE: u16 = 0xFFFE;

/// Format tag as stored in the first two bytes of the `fmt ` chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    Pcm,
    IeeeFloat,
    Extensible,
    Other(u16),
}

impl FormatTag {
    pub fn from_u16(tag: u16) -> Self {
        match tag {
            FORMAT_TAG_PCM => FormatTag::Pcm,
            FORMAT_TAG_IEEE_FLOAT => FormatTag::IeeeFloat,
            FORMAT_TAG_EXTENSIBLE => FormatTag::Extensible,
            other => FormatTag::Other(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            FormatTag::Pcm => FORMAT_TAG_PCM,
            FormatTag::IeeeFloat => FORMAT_TAG_IEEE_FLOAT,
            FormatTag::Extensible => FORMAT_TAG_EXTENSIBLE,
            FormatTag::Other(tag) => tag,
        }
    }
}

/// On-disk sample encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleEncoding {
    /// 8-bit unsigned integer PCM, zero point at 128
    Unsigned8,
    /// 16-bit signed integer PCM
    Signed16,
    /// 24-bit signed integer PCM, packed in three bytes
    Signed24,
    /// 32-bit signed integer PCM
    Signed32,
    /// 32-bit IEEE 754 float
    Float32,
}

impl SampleEncoding {
    /// Resolve a format tag and bit depth into a supported encoding
    ///
    /// `tag` must already be resolved, i.e. not `Extensible`.
    ///
    /// # Errors
    /// * `UnsupportedFormat` - for any combination outside the supported table
    pub fn from_tag(tag: FormatTag, bits_per_sample: u16) -> Result<Self> {
        match (tag, bits_per_sample) {
            (FormatTag::Pcm, 8) => Ok(SampleEncoding::Unsigned8),
            (FormatTag::Pcm, 16) => Ok(SampleEncoding::Signed16),
            (FormatTag::Pcm, 24) => Ok(SampleEncoding::Signed24),
            (FormatTag::Pcm, 32) => Ok(SampleEncoding::Signed32),
            (FormatTag::IeeeFloat, 32) => Ok(SampleEncoding::Float32),
            _ => Err(WavError::UnsupportedFormat {
                format_tag: tag.to_u16(),
                bits_per_sample,
            }),
        }
    }

    /// Pick the integer encoding for a bit depth, or float for `32` when `float` is set
    pub fn from_bits(bits_per_sample: u16, float: bool) -> Result<Self> {
        let tag = if float {
            FormatTag::IeeeFloat
        } else {
            FormatTag::Pcm
        };
        Self::from_tag(tag, bits_per_sample)
    }

    pub fn format_tag(self) -> FormatTag {
        match self {
            SampleEncoding::Float32 => FormatTag::IeeeFloat,
            _ => FormatTag::Pcm,
        }
    }

    pub fn bits_per_sample(self) -> u16 {
        match self {
            SampleEncoding::Unsigned8 => 8,
            SampleEncoding::Signed16 => 16,
            SampleEncoding::Signed24 => 24,
            SampleEncoding::Signed32 | SampleEncoding::Float32 => 32,
        }
    }

    /// Bytes occupied by one sample of one channel
    pub fn bytes_per_sample(self) -> usize {
        self.bits_per_sample() as usize / 8
    }

    pub fn is_float(self) -> bool {
        matches!(self, SampleEncoding::Float32)
    }
}

/// Format of a WAV file's sample data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// On-disk sample encoding
    pub encoding: SampleEncoding,
}

impl WaveFormat {
    /// Create a new format
    ///
    /// # Errors
    /// * `Format` - if the sample rate or channel count is zero, or a frame
    ///   would not fit the 16-bit block align field
    pub fn new(sample_rate: u32, channels: u16, encoding: SampleEncoding) -> Result<Self> {
        if sample_rate == 0 {
            return Err(WavError::format(0, "sample rate must be positive"));
        }
        if channels == 0 {
            return Err(WavError::format(0, "channel count must be positive"));
        }
        let block_align = channels as u64 * encoding.bytes_per_sample() as u64;
        if block_align > u16::MAX as u64 {
            return Err(WavError::format(
                0,
                format!("{} channels do not fit in a 16-bit block align", channels),
            ));
        }
        if sample_rate as u64 * block_align > u32::MAX as u64 {
            return Err(WavError::format(
                0,
                format!("byte rate for {} Hz does not fit in 32 bits", sample_rate),
            ));
        }

        Ok(WaveFormat {
            sample_rate,
            channels,
            encoding,
        })
    }

    /// CD quality (44.1kHz, 16-bit, stereo)
    pub fn cd_quality() -> Self {
        WaveFormat {
            sample_rate: 44100,
            channels: 2,
            encoding: SampleEncoding::Signed16,
        }
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.encoding.bits_per_sample()
    }

    /// Bytes per frame (one sample for each channel)
    pub fn block_align(&self) -> u16 {
        self.channels * self.encoding.bytes_per_sample() as u16
    }

    /// Bytes per second of audio
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// Re-check the invariants of a format built from its public fields
    pub fn validate(&self) -> Result<()> {
        Self::new(self.sample_rate, self.channels, self.encoding).map(|_| ())
    }

    /// Same format with a different encoding
    pub fn with_encoding(&self, encoding: SampleEncoding) -> Result<Self> {
        Self::new(self.sample_rate, self.channels, encoding)
    }
}
