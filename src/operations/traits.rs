//! Trait definitions for operations applied to audio chunks.

use crate::{ChunkResult, RealFloat};

/// Channel-count coercion.
///
/// Training pipelines usually expect every chunk to have the same channel
/// count; these methods bring arbitrary sources into line.
pub trait AudioChannelOps<F: RealFloat> {
    /// Averages all channels into a single channel.
    ///
    /// Mono input is returned unchanged.
    fn to_mono(&self) -> ChunkResult<Self>
    where
        Self: Sized;

    /// Produces exactly two channels.
    ///
    /// Mono input is duplicated into both channels, stereo is returned
    /// unchanged, and anything wider keeps only its first two channels.
    fn to_stereo(&self) -> ChunkResult<Self>
    where
        Self: Sized;
}

/// In-place amplitude processing.
pub trait AudioProcessing<F: RealFloat> {
    /// Multiplies every sample by `factor`.
    fn scale(&mut self, factor: F);

    /// Negates every sample.
    fn invert_phase(&mut self);

    /// Scales the audio so its peak absolute value equals `target`.
    ///
    /// All-zero audio is left untouched.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidParameter`](crate::ChunkError::InvalidParameter)
    /// if `target` is negative or not finite.
    fn normalize_peak(&mut self, target: F) -> ChunkResult<()>;
}
