//! Operations applied to chunks after they are drawn.
//!
//! ## Module Organization
//!
//! - [`traits`] - Core trait definitions
//! - [`channels`] - Mono/stereo coercion
//! - [`processing`] - Gain, polarity and peak normalization
//! - [`augmentation`] - Random phase flips and gains
//!
//! ## Quick Start
//!
//! ```rust
//! use chunkadelic::{AudioSamples, operations::*};
//! use ndarray::array;
//! use rand::SeedableRng;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let audio = AudioSamples::new_mono(array![0.1f32, -0.2, 0.4], 44100)?;
//!
//! let mut stereo = audio.to_stereo()?;
//! stereo.normalize_peak(1.0)?;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! RandomGain::new(0.5, 1.0)?.apply(&mut stereo, &mut rng);
//! PhaseFlipper::default().apply(&mut stereo, &mut rng);
//! # Ok(())
//! # }
//! ```

pub mod traits;

pub mod augmentation;
pub mod channels;
pub mod processing;

pub use augmentation::{PhaseFlipper, RandomGain};
pub use traits::{AudioChannelOps, AudioProcessing};
