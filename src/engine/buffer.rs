//! Sample buffer implementation
//!
//! SampleBuffer holds interleaved, normalized samples. Values are `f64` so
//! that 32-bit integer PCM survives a decode/encode cycle unchanged.

use crate::error::{Result, WavError};

/// Interleaved audio samples normalized to -1.0..1.0
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Interleaved samples: [L, R, L, R, ...] for stereo
    samples: Vec<f64>,
    /// Number of audio channels
    channels: u16,
}

impl SampleBuffer {
    /// Create a new sample buffer from interleaved samples
    ///
    /// Out-of-range values are kept as-is; they are clamped only when written
    /// back to an integer encoding.
    ///
    /// # Errors
    /// * `Format` - if `channels` is zero or the sample count is not a multiple of it
    pub fn new(samples: Vec<f64>, channels: u16) -> Result<Self> {
        if channels == 0 {
            return Err(WavError::format(0, "channel count must be positive"));
        }
        if samples.len() % channels as usize != 0 {
            return Err(WavError::format(
                0,
                format!(
                    "sample count {} is not divisible by channel count {}",
                    samples.len(),
                    channels
                ),
            ));
        }
        Ok(Self { samples, channels })
    }

    /// Create a buffer from single-precision samples
    pub fn from_f32(samples: &[f32], channels: u16) -> Result<Self> {
        Self::new(samples.iter().map(|&s| s as f64).collect(), channels)
    }

    /// Create a buffer by interleaving per-channel sample vectors
    ///
    /// # Errors
    /// * `Format` - if there are no channels, too many, or their lengths differ
    pub fn from_channels(channels: &[Vec<f64>]) -> Result<Self> {
        let num_channels = u16::try_from(channels.len())
            .map_err(|_| WavError::format(0, format!("{} channels is too many", channels.len())))?;
        let frames = channels.first().map(Vec::len).unwrap_or(0);

        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != frames)
        {
            return Err(WavError::format(
                0,
                format!(
                    "channel {} has {} samples, expected {}",
                    index,
                    channel.len(),
                    frames
                ),
            ));
        }

        let mut samples = Vec::with_capacity(frames * channels.len());
        for frame in 0..frames {
            for channel in channels {
                samples.push(channel[frame]);
            }
        }

        Self::new(samples, num_channels)
    }

    /// Create a silent buffer with the given number of frames
    ///
    /// A channel count of zero is treated as mono.
    pub fn silence(frames: usize, channels: u16) -> Self {
        let channels = channels.max(1);
        Self {
            samples: vec![0.0; frames * channels as usize],
            channels,
        }
    }

    /// Get a reference to the interleaved samples
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Get a mutable reference to the interleaved samples
    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    /// Consume the buffer, returning the interleaved samples
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Get the number of channels
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Total number of samples across all channels
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the number of frames (samples per channel)
    pub fn num_frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Get the duration in seconds at the given sample rate
    pub fn duration_secs(&self, sample_rate: u32) -> f64 {
        self.num_frames() as f64 / sample_rate as f64
    }

    /// Largest absolute sample value, 0.0 for an empty buffer
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
    }

    /// Get samples for a specific channel (0-indexed)
    pub fn channel(&self, channel: u16) -> Vec<f64> {
        if channel >= self.channels {
            return Vec::new();
        }
        self.samples
            .iter()
            .skip(channel as usize)
            .step_by(self.channels as usize)
            .copied()
            .collect()
    }

    /// De-interleave into one vector per channel
    pub fn to_channels(&self) -> Vec<Vec<f64>> {
        (0..self.channels).map(|ch| self.channel(ch)).collect()
    }

    /// Interleaved samples narrowed to single precision
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples.iter().map(|&s| s as f32).collect()
    }

    /// Check if buffers are approximately equal within tolerance
    pub fn is_approx_equal(&self, other: &SampleBuffer, tolerance: f64) -> bool {
        if self.channels != other.channels || self.samples.len() != other.samples.len() {
            return false;
        }
        self.samples
            .iter()
            .zip(other.samples.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}
