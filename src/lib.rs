// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![deny(missing_docs)] // Documentation is a must for release

//! # chunkadelic
//!
//! Fixed-size audio chunking for machine-learning data pipelines: random or
//! deterministic crops with zero padding, normalized timestamps and padding
//! masks, whole-buffer segmentation with silence detection, and the small
//! set of channel/gain transforms that training loaders apply to chunks.
//!
//! Decoding and resampling are left to the caller; everything here works on
//! in-memory `(channels, samples)` buffers.
//!
//! ## Quick Start
//!
//! ### Drawing a chunk
//!
//! ```rust
//! use chunkadelic::{AudioSamples, PadCrop};
//! use ndarray::array;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let audio = AudioSamples::new_mono(array![1.0f32, 2.0, 3.0, 4.0, 5.0], 44100).unwrap();
//! let crop = PadCrop::new(8).with_mask(true);
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let chunk = crop.draw_chunk(&audio, &mut rng).unwrap();
//!
//! assert_eq!(chunk.audio.samples_per_channel(), 8);
//! assert_eq!(chunk.metadata.t_end, 1.0);
//! assert_eq!(chunk.padding_mask.unwrap().sum(), 5.0);
//! ```
//!
//! ### Chunking a whole buffer
//!
//! ```rust
//! use chunkadelic::{AudioSamples, ChunkPolicy, SilencePolicy, blow_chunks};
//! use ndarray::Array1;
//!
//! let audio = AudioSamples::new_mono(Array1::<f32>::ones(1000), 16000).unwrap();
//! let policy = ChunkPolicy::default().with_silence(SilencePolicy::Drop);
//!
//! let chunks: Vec<_> = blow_chunks(&audio, 256, 128, policy).unwrap().collect();
//! assert_eq!(chunks.len(), 8);
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use chunkadelic::{AudioSamples, ChunkError, PadCrop};
//! use ndarray::Array1;
//! use rand::SeedableRng;
//!
//! let empty = AudioSamples::new_mono(Array1::<f32>::zeros(0), 44100).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! match PadCrop::new(16).draw_chunk(&empty, &mut rng) {
//!     Err(ChunkError::InvalidInput(msg)) => eprintln!("rejected: {msg}"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
//!
//! ## Logging
//!
//! Operations emit `tracing` events at `debug`/`trace` level. The library never
//! installs a subscriber; applications choose their own.

mod error;

pub mod chunker;
pub mod config;
pub mod conversions;
pub mod iterators;
pub mod operations;
mod repr;
pub mod utils;

use std::fmt::{Debug, Display};

pub use crate::chunker::{Chunk, ChunkMetadata, PadCrop};
pub use crate::config::ChunkerConfig;
pub use crate::conversions::float_to_pcm16;
pub use crate::error::{ChunkError, ChunkResult};
pub use crate::iterators::{
    ChunkIterator, ChunkPolicy, ChunkedWindow, SilencePolicy, TailPolicy, blow_chunks,
    stride_for_overlap,
};
pub use crate::operations::{AudioChannelOps, AudioProcessing, PhaseFlipper, RandomGain};
pub use crate::repr::AudioSamples;
pub use crate::utils::{
    audio_math::{amplitude_to_db, db_to_amplitude},
    detection::{SilenceDetector, SilenceStrategy, db_max, is_silence},
    samples_to_seconds, seconds_to_samples,
};

use ndarray::ScalarOperand;
use num_traits::{Float, FloatConst, FromPrimitive, NumCast};
use rand::distr::uniform::SampleUniform;

/// Marker trait for real floating-point sample types (f32, f64)
pub trait RealFloat:
    Float
    + FloatConst
    + NumCast
    + FromPrimitive
    + ScalarOperand
    + SampleUniform
    + Default
    + Debug
    + Display
    + Send
    + Sync
    + 'static
{
}

impl RealFloat for f32 {}
impl RealFloat for f64 {}

/// Casts a numeric value into the target floating-point type `F`.
///
/// Abstracts over `f32`/`f64` precision in generic code. Internally uses
/// `num_traits::NumCast::from`.
///
/// # Examples
/// ```
/// use chunkadelic::to_precision;
///
/// let value_f32: f32 = to_precision(42usize);
/// assert_eq!(value_f32, 42.0);
/// ```
///
/// # Panics
/// Panics if the value is not representable in `F` (e.g. a NaN cast into an
/// integer); casts from integers and floats into `f32`/`f64` never fail.
#[inline(always)]
pub fn to_precision<F, T>(value: T) -> F
where
    F: RealFloat,
    T: NumCast,
{
    NumCast::from(value).expect("to_precision: valid numeric conversion")
}
