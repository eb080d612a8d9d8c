//! Random augmentations applied to chunks during training.
//!
//! Each augmentation takes the caller's random generator so a seeded
//! pipeline stays reproducible end to end.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::traits::AudioProcessing;
use crate::{AudioSamples, ChunkError, ChunkResult, RealFloat, to_precision};

/// Flips the polarity of a chunk with probability `p`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseFlipper {
    /// Probability of flipping, in `[0, 1]`.
    pub p: f64,
}

impl Default for PhaseFlipper {
    fn default() -> Self {
        Self { p: 0.5 }
    }
}

impl PhaseFlipper {
    /// Creates a flipper.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidParameter`] if `p` is not in `[0, 1]`.
    pub fn new(p: f64) -> ChunkResult<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(ChunkError::invalid_parameter(
                "p",
                format!("probability {p} is not in [0, 1]"),
            ));
        }
        Ok(Self { p })
    }

    /// Applies the flip in place. Returns whether the audio was flipped.
    pub fn apply<F: RealFloat, R: Rng>(&self, audio: &mut AudioSamples<F>, rng: &mut R) -> bool {
        let flip = rng.random::<f64>() < self.p;
        if flip {
            audio.invert_phase();
        }
        flip
    }
}

/// Multiplies a chunk by a gain drawn uniformly from `[min_gain, max_gain]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomGain {
    /// Lower bound of the gain.
    pub min_gain: f64,
    /// Upper bound of the gain.
    pub max_gain: f64,
}

impl RandomGain {
    /// Creates a gain range.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidParameter`] if the bounds are not finite,
    /// negative, or inverted.
    pub fn new(min_gain: f64, max_gain: f64) -> ChunkResult<Self> {
        if !min_gain.is_finite() || !max_gain.is_finite() || min_gain < 0.0 {
            return Err(ChunkError::invalid_parameter(
                "gain",
                format!("bounds must be finite and non-negative, got [{min_gain}, {max_gain}]"),
            ));
        }
        if min_gain > max_gain {
            return Err(ChunkError::invalid_parameter(
                "gain",
                format!("min_gain {min_gain} exceeds max_gain {max_gain}"),
            ));
        }
        Ok(Self { min_gain, max_gain })
    }

    /// Applies a random gain in place and returns the gain used.
    pub fn apply<F: RealFloat, R: Rng>(&self, audio: &mut AudioSamples<F>, rng: &mut R) -> f64 {
        let gain = if self.min_gain == self.max_gain {
            self.min_gain
        } else {
            rng.random_range(self.min_gain..=self.max_gain)
        };
        audio.scale(to_precision(gain));
        gain
    }
}
