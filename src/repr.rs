//! Owned multichannel audio buffer.
//!
//! [`AudioSamples`] stores audio as an `ndarray::Array2` laid out as
//! `(channels, samples)`; mono audio is simply a single row. Every operation in
//! the crate reads and writes this representation.

use std::fmt::Display;
use std::ops::Range;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut2, Axis, Zip, s};

use crate::{ChunkError, ChunkResult, RealFloat, to_precision};

/// Multichannel audio samples with an associated sample rate.
///
/// # Examples
/// ```
/// use chunkadelic::AudioSamples;
/// use ndarray::array;
///
/// let mono = AudioSamples::new_mono(array![0.1f32, 0.2, 0.3], 44100).unwrap();
/// assert_eq!(mono.num_channels(), 1);
///
/// let stereo = AudioSamples::new_multi_channel(array![[0.1f32, 0.2], [0.3, 0.4]], 48000).unwrap();
/// assert_eq!(stereo.num_channels(), 2);
/// assert_eq!(stereo.samples_per_channel(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSamples<F: RealFloat> {
    data: Array2<F>,
    sample_rate: u32,
}

impl<F: RealFloat> Display for AudioSamples<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let type_name = std::any::type_name::<F>();
        write!(
            f,
            "AudioSamples<{}>: {} channel(s), {} samples @ {} Hz ({:.3}s)",
            type_name,
            self.num_channels(),
            self.samples_per_channel(),
            self.sample_rate,
            self.duration_seconds()
        )
    }
}

impl<F: RealFloat> AudioSamples<F> {
    /// Creates multichannel audio from a `(channels, samples)` array.
    ///
    /// A buffer with zero samples per channel is accepted; operations that need
    /// data reject it themselves.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidInput`] if `sample_rate` is zero or the
    /// array has no channels.
    pub fn new_multi_channel(data: Array2<F>, sample_rate: u32) -> ChunkResult<Self> {
        if sample_rate == 0 {
            return Err(ChunkError::invalid_input("sample rate must be positive"));
        }
        if data.nrows() == 0 {
            return Err(ChunkError::invalid_input(
                "audio must have at least one channel",
            ));
        }
        Ok(Self { data, sample_rate })
    }

    /// Creates single-channel audio from a 1-D array.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidInput`] if `sample_rate` is zero.
    pub fn new_mono(data: Array1<F>, sample_rate: u32) -> ChunkResult<Self> {
        let len = data.len();
        let data = data
            .into_shape_with_order((1, len))
            .map_err(|e| ChunkError::DimensionMismatch(e.to_string()))?;
        Self::new_multi_channel(data, sample_rate)
    }

    /// Creates zero-filled audio of the given shape.
    ///
    /// # Errors
    /// Same conditions as [`AudioSamples::new_multi_channel`].
    pub fn zeros(channels: usize, length: usize, sample_rate: u32) -> ChunkResult<Self> {
        Self::new_multi_channel(Array2::zeros((channels, length)), sample_rate)
    }

    /// Sample rate in Hz.
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels (rows).
    pub fn num_channels(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples in each channel (columns).
    pub fn samples_per_channel(&self) -> usize {
        self.data.ncols()
    }

    /// Returns true when there are no samples in any channel.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true for single-channel audio.
    pub fn is_mono(&self) -> bool {
        self.num_channels() == 1
    }

    /// Length of the audio in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples_per_channel() as f64 / f64::from(self.sample_rate)
    }

    /// Read-only view of the underlying `(channels, samples)` array.
    pub fn view(&self) -> ArrayView2<'_, F> {
        self.data.view()
    }

    /// Mutable view of the underlying `(channels, samples)` array.
    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, F> {
        self.data.view_mut()
    }

    /// View of a single channel.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidParameter`] if `index` is out of range.
    pub fn channel(&self, index: usize) -> ChunkResult<ArrayView1<'_, F>> {
        if index >= self.num_channels() {
            return Err(ChunkError::invalid_parameter(
                "channel",
                format!(
                    "index {index} out of range for {} channel(s)",
                    self.num_channels()
                ),
            ));
        }
        Ok(self.data.index_axis(Axis(0), index))
    }

    /// View of the sample range `range` across all channels.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidParameter`] if the range is reversed or
    /// extends past the end of the audio.
    pub fn slice_samples(&self, range: Range<usize>) -> ChunkResult<ArrayView2<'_, F>> {
        if range.start > range.end || range.end > self.samples_per_channel() {
            return Err(ChunkError::invalid_parameter(
                "range",
                format!(
                    "{}..{} is not within 0..{}",
                    range.start,
                    range.end,
                    self.samples_per_channel()
                ),
            ));
        }
        Ok(self.data.slice(s![.., range]))
    }

    /// Consumes the audio and returns the underlying array.
    pub fn into_array(self) -> Array2<F> {
        self.data
    }

    /// Applies `f` to every sample in place.
    pub fn mapv_inplace<G>(&mut self, f: G)
    where
        G: FnMut(F) -> F,
    {
        self.data.mapv_inplace(f);
    }

    /// Maximum absolute sample value over all channels. Zero for empty audio.
    pub fn peak(&self) -> F {
        self.data
            .iter()
            .fold(F::zero(), |acc, &x| if x.abs() > acc { x.abs() } else { acc })
    }

    /// Root mean square over all channels. Zero for empty audio.
    pub fn rms(&self) -> F {
        if self.data.is_empty() {
            return F::zero();
        }
        let mut sum_sq = F::zero();
        Zip::from(&self.data).for_each(|&x| sum_sq = sum_sq + x * x);
        (sum_sq / to_precision::<F, _>(self.data.len())).sqrt()
    }
}
