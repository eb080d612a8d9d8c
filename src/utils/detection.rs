//! Silence detection for audio chunks.
//!
//! A chunk is silent when its level falls below a decibel threshold. The
//! threshold is converted to a linear amplitude once and compared against the
//! chunk's peak or RMS, so an all-zero chunk never reaches a logarithm.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::utils::audio_math::{amplitude_to_db, db_to_amplitude};
use crate::{AudioSamples, RealFloat, to_precision};

/// How the level of a chunk is measured before comparing it to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SilenceStrategy {
    /// Maximum absolute sample value across all channels.
    #[default]
    Peak,
    /// Root mean square across all channels.
    Rms,
}

/// Threshold-based silence detector.
///
/// # Examples
/// ```
/// use chunkadelic::{SilenceDetector, SilenceStrategy};
/// use ndarray::array;
///
/// let detector = SilenceDetector::new(-40.0, SilenceStrategy::Peak);
/// assert!(detector.is_silent(array![[0.0f32, 0.0, 0.0]].view()));
/// assert!(!detector.is_silent(array![[0.0f32, 0.5, 0.0]].view()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilenceDetector {
    /// Level in dB below which a chunk counts as silent.
    pub threshold_db: f64,
    /// Level measurement.
    pub strategy: SilenceStrategy,
}

impl Default for SilenceDetector {
    fn default() -> Self {
        Self {
            threshold_db: -70.0,
            strategy: SilenceStrategy::Peak,
        }
    }
}

impl SilenceDetector {
    /// Creates a detector with the given threshold and strategy.
    pub const fn new(threshold_db: f64, strategy: SilenceStrategy) -> Self {
        Self {
            threshold_db,
            strategy,
        }
    }

    /// Peak detector at `threshold_db`.
    pub const fn peak(threshold_db: f64) -> Self {
        Self::new(threshold_db, SilenceStrategy::Peak)
    }

    /// RMS detector at `threshold_db`.
    pub const fn rms(threshold_db: f64) -> Self {
        Self::new(threshold_db, SilenceStrategy::Rms)
    }

    /// Linear amplitude equivalent of the threshold.
    pub fn cutoff(&self) -> f64 {
        db_to_amplitude(self.threshold_db)
    }

    /// Measures the level of `samples` according to the strategy.
    pub fn level<F: RealFloat>(&self, samples: ArrayView2<'_, F>) -> F {
        match self.strategy {
            SilenceStrategy::Peak => samples
                .iter()
                .fold(F::zero(), |acc, &x| if x.abs() > acc { x.abs() } else { acc }),
            SilenceStrategy::Rms => {
                if samples.is_empty() {
                    return F::zero();
                }
                let sum_sq = samples.iter().fold(F::zero(), |acc, &x| acc + x * x);
                (sum_sq / to_precision::<F, _>(samples.len())).sqrt()
            }
        }
    }

    /// Returns true if the level of `samples` is below the threshold.
    ///
    /// Empty input is silent.
    pub fn is_silent<F: RealFloat>(&self, samples: ArrayView2<'_, F>) -> bool {
        let level: f64 = to_precision(self.level(samples));
        level < self.cutoff()
    }

    /// [`SilenceDetector::is_silent`] over a whole buffer.
    pub fn is_silent_audio<F: RealFloat>(&self, audio: &AudioSamples<F>) -> bool {
        self.is_silent(audio.view())
    }
}

/// Returns true if the peak of `audio` is below `threshold_db`.
///
/// ```
/// use chunkadelic::{AudioSamples, is_silence};
/// use ndarray::array;
///
/// let quiet = AudioSamples::new_mono(array![0.0001f32, -0.0002], 44100).unwrap();
/// assert!(is_silence(&quiet, -70.0));
/// ```
pub fn is_silence<F: RealFloat>(audio: &AudioSamples<F>, threshold_db: f64) -> bool {
    SilenceDetector::peak(threshold_db).is_silent_audio(audio)
}

/// Peak level of `audio` in dB, floored at [`DB_FLOOR`](crate::utils::audio_math::DB_FLOOR).
pub fn db_max<F: RealFloat>(audio: &AudioSamples<F>) -> F {
    amplitude_to_db(audio.peak())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn all_zero_chunk_is_silent() {
        let detector = SilenceDetector::peak(-40.0);
        let zeros = Array2::<f32>::zeros((2, 1024));
        assert!(detector.is_silent(zeros.view()));
    }

    #[test]
    fn half_amplitude_sample_is_not_silent() {
        let detector = SilenceDetector::peak(-40.0);
        let mut chunk = Array2::<f32>::zeros((1, 1024));
        chunk[[0, 300]] = 0.5;
        assert!(!detector.is_silent(chunk.view()));
    }

    #[test]
    fn rms_is_stricter_than_peak_for_sparse_clicks() {
        let mut chunk = Array2::<f64>::zeros((1, 10_000));
        chunk[[0, 0]] = 0.5;
        assert!(!SilenceDetector::peak(-40.0).is_silent(chunk.view()));
        // rms = 0.5 / 100 = 0.005, below the 0.01 cutoff
        assert!(SilenceDetector::rms(-40.0).is_silent(chunk.view()));
    }

    #[test]
    fn empty_input_is_silent() {
        let empty = Array2::<f32>::zeros((1, 0));
        assert!(SilenceDetector::rms(-90.0).is_silent(empty.view()));
        assert!(SilenceDetector::peak(-90.0).is_silent(empty.view()));
    }

    #[test]
    fn db_max_of_silence_is_floored() {
        let audio = AudioSamples::<f32>::zeros(1, 16, 44100).unwrap();
        assert_eq!(db_max(&audio), -80.0);
        let loud = AudioSamples::new_mono(array![0.0f64, -1.0], 44100).unwrap();
        assert_eq!(db_max(&loud), 0.0);
    }

    #[test]
    fn strategy_serializes_lowercase() {
        let yaml = serde_yaml::to_string(&SilenceStrategy::Rms).unwrap();
        assert_eq!(yaml.trim(), "rms");
    }
}
