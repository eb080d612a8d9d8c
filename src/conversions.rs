//! Conversion of float chunks to 16-bit PCM.
//!
//! Chunks are written out as 16-bit PCM by most dataset tooling. Samples are
//! clamped to `[-1, 1]`, then negative values scale by `32768` and positive
//! values by `32767`, so both full-scale extremes map exactly onto
//! `i16::MIN` and `i16::MAX`.
//!
//! ```rust
//! use chunkadelic::{AudioSamples, float_to_pcm16};
//! use ndarray::array;
//!
//! let audio = AudioSamples::new_mono(array![-1.0f32, 0.0, 0.5, 1.0], 44100).unwrap();
//! let pcm = float_to_pcm16(&audio);
//! assert_eq!(pcm.row(0).to_vec(), vec![i16::MIN, 0, 16384, i16::MAX]);
//! ```

use ndarray::Array2;
use num_traits::ToPrimitive;

use crate::{AudioSamples, RealFloat};

#[inline(always)]
fn sample_to_i16<F: RealFloat>(sample: F) -> i16 {
    // NaN maps to silence
    let x = sample.to_f64().filter(|v| !v.is_nan()).unwrap_or(0.0).clamp(-1.0, 1.0);
    let scaled = if x < 0.0 {
        x * -f64::from(i16::MIN)
    } else {
        x * f64::from(i16::MAX)
    };
    scaled.round() as i16
}

/// Converts float audio to 16-bit PCM with the same `(channels, samples)` shape.
pub fn float_to_pcm16<F: RealFloat>(audio: &AudioSamples<F>) -> Array2<i16> {
    audio.view().mapv(sample_to_i16)
}
