//! Amplitude and decibel conversions.
//!
//! Amplitude ratios use `dB = 20 * log10(amplitude)` and its inverse
//! `amplitude = 10^(dB / 20)`.
//!
//! # Examples
//!
//! ```rust
//! use chunkadelic::utils::audio_math::{amplitude_to_db, db_to_amplitude};
//!
//! let db_val = amplitude_to_db(0.5f64); // -6.02 dB
//! let amp = db_to_amplitude(db_val);
//! assert!((amp - 0.5).abs() < 1e-12);
//! ```

use crate::{RealFloat, to_precision};

/// Level reported for zero or negative amplitudes instead of `-inf`.
pub const DB_FLOOR: f64 = -80.0;

/// Converts linear amplitude to decibels.
///
/// Returns [`DB_FLOOR`] for zero or negative amplitudes to avoid infinite values.
///
/// # Examples
///
/// ```rust
/// use chunkadelic::amplitude_to_db;
///
/// assert_eq!(amplitude_to_db(1.0f32), 0.0);
/// assert!((amplitude_to_db(0.1f64) + 20.0).abs() < 1e-9);
/// assert_eq!(amplitude_to_db(0.0f32), -80.0);
/// ```
pub fn amplitude_to_db<F: RealFloat>(amplitude: F) -> F {
    if amplitude > F::zero() {
        to_precision::<F, _>(20.0) * amplitude.log10()
    } else {
        to_precision::<F, _>(DB_FLOOR)
    }
}

/// Converts decibels to linear amplitude.
///
/// # Examples
///
/// ```rust
/// use chunkadelic::db_to_amplitude;
///
/// assert_eq!(db_to_amplitude(0.0f32), 1.0);
/// assert!((db_to_amplitude(-20.0f64) - 0.1).abs() < 1e-12);
/// ```
pub fn db_to_amplitude<F: RealFloat>(db: F) -> F {
    to_precision::<F, _>(10.0).powf(db / to_precision::<F, _>(20.0))
}
