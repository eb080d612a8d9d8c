//! Utility functions for audio processing.
//!
//! # Modules
//!
//! - [`audio_math`] - Amplitude/decibel conversions
//! - [`detection`] - Silence detection on chunks

pub mod audio_math;
pub mod detection;

/// Converts a duration in seconds to a whole number of samples (truncating).
///
/// Negative or non-finite durations yield zero.
///
/// ```rust
/// use chunkadelic::seconds_to_samples;
///
/// assert_eq!(seconds_to_samples(0.5, 44100), 22050);
/// ```
pub fn seconds_to_samples(seconds: f64, sample_rate: u32) -> usize {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * f64::from(sample_rate)) as usize
}

/// Converts a sample count to seconds.
///
/// ```rust
/// use chunkadelic::samples_to_seconds;
///
/// assert_eq!(samples_to_seconds(22050, 44100), 0.5);
/// ```
pub fn samples_to_seconds(samples: usize, sample_rate: u32) -> f64 {
    samples as f64 / f64::from(sample_rate)
}
