//! Fixed-size chunk extraction.
//!
//! [`PadCrop`] draws one window of exactly `chunk_size` samples from a source
//! buffer. Longer sources are cropped at a random (or fixed) offset, shorter
//! ones are copied to the start of a zero-filled buffer. Each draw reports
//! where the window sits in the source as normalized timestamps and, on
//! request, a padding mask marking which samples are real audio.
//!
//! All randomness comes from the `rand::Rng` handed to the call, so seeding the
//! generator makes every draw reproducible.

use ndarray::{Array1, Array2, Axis, concatenate, s};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::utils::samples_to_seconds;
use crate::{AudioSamples, ChunkError, ChunkResult, RealFloat};

/// Position of a chunk within its source.
///
/// `t_start` and `t_end` are normalized against the source length, not the
/// chunk length, and only cover the real (unpadded) part of the chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// First source sample copied into the chunk.
    pub offset: usize,
    /// Number of real samples at the start of the chunk; the rest is padding.
    pub valid_len: usize,
    /// `offset / source_len`.
    pub t_start: f64,
    /// `(offset + valid_len) / source_len`.
    pub t_end: f64,
    /// Offset in seconds.
    pub seconds_start: f64,
    /// Source duration in seconds.
    pub seconds_total: f64,
}

impl ChunkMetadata {
    fn new(offset: usize, valid_len: usize, source_len: usize, sample_rate: u32) -> Self {
        let n = source_len as f64;
        Self {
            offset,
            valid_len,
            t_start: offset as f64 / n,
            t_end: (offset + valid_len) as f64 / n,
            seconds_start: samples_to_seconds(offset, sample_rate),
            seconds_total: samples_to_seconds(source_len, sample_rate),
        }
    }
}

/// A fixed-length window cut from a source buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<F: RealFloat> {
    /// Exactly `chunk_size` samples per channel, channels preserved from the source.
    pub audio: AudioSamples<F>,
    /// Where the chunk came from.
    pub metadata: ChunkMetadata,
    /// `1` for real samples, `0` for padding. Present when the crop asked for a mask.
    pub padding_mask: Option<Array1<F>>,
}

impl<F: RealFloat> Chunk<F> {
    /// Returns true if any zero padding was appended.
    pub fn is_padded(&self) -> bool {
        self.metadata.valid_len < self.audio.samples_per_channel()
    }

    /// Binary mask for the chunk, built from the metadata if it was not requested.
    pub fn mask(&self) -> Array1<F> {
        match &self.padding_mask {
            Some(mask) => mask.clone(),
            None => padding_mask(self.audio.samples_per_channel(), self.metadata.valid_len),
        }
    }

    /// Consumes the chunk and returns its audio with the padding mask appended
    /// as a trailing channel.
    ///
    /// # Errors
    /// Returns [`ChunkError::DimensionMismatch`] if a stored mask does not match
    /// the chunk length.
    pub fn with_mask_channel(self) -> ChunkResult<AudioSamples<F>> {
        let mask = self.mask();
        let len = self.audio.samples_per_channel();
        if mask.len() != len {
            return Err(ChunkError::DimensionMismatch(format!(
                "mask has {} samples, chunk has {len}",
                mask.len()
            )));
        }
        let sample_rate = self.audio.sample_rate();
        let audio = self.audio.into_array();
        let stacked = concatenate(Axis(0), &[audio.view(), mask.view().insert_axis(Axis(0))])
            .map_err(|e| ChunkError::DimensionMismatch(e.to_string()))?;
        AudioSamples::new_multi_channel(stacked, sample_rate)
    }
}

fn padding_mask<F: RealFloat>(len: usize, valid_len: usize) -> Array1<F> {
    Array1::from_shape_fn(len, |i| if i < valid_len { F::one() } else { F::zero() })
}

/// Copies `chunk_size` samples starting at `offset` into a new chunk,
/// zero-filling whatever runs past the end of the source.
pub(crate) fn crop_at<F: RealFloat>(
    source: &AudioSamples<F>,
    offset: usize,
    chunk_size: usize,
    with_mask: bool,
) -> ChunkResult<Chunk<F>> {
    let n = source.samples_per_channel();
    let valid_len = chunk_size.min(n.saturating_sub(offset));

    let mut out = Array2::<F>::zeros((source.num_channels(), chunk_size));
    out.slice_mut(s![.., ..valid_len])
        .assign(&source.slice_samples(offset..offset + valid_len)?);

    Ok(Chunk {
        audio: AudioSamples::new_multi_channel(out, source.sample_rate())?,
        metadata: ChunkMetadata::new(offset, valid_len, n, source.sample_rate()),
        padding_mask: with_mask.then(|| padding_mask(chunk_size, valid_len)),
    })
}

/// Pads or crops audio to a fixed length.
///
/// # Examples
/// ```
/// use chunkadelic::{AudioSamples, PadCrop};
/// use ndarray::Array1;
///
/// let source = AudioSamples::new_mono(Array1::range(0.0f32, 100.0, 1.0), 100).unwrap();
/// let crop = PadCrop::new(10).with_randomize(false);
/// let chunk = crop.draw_chunk_seeded(&source, 7).unwrap();
///
/// assert_eq!(chunk.audio.channel(0).unwrap()[9], 9.0);
/// assert_eq!(chunk.metadata.t_start, 0.0);
/// assert!((chunk.metadata.t_end - 0.1).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadCrop {
    /// Output length in samples.
    pub chunk_size: usize,
    /// Draw the offset uniformly at random when the source is long enough.
    pub randomize: bool,
    /// Produce a padding mask alongside the chunk.
    pub mask: bool,
    /// Offset used when not randomizing. `None` means the start of the source.
    pub fixed_offset: Option<usize>,
}

impl PadCrop {
    /// Randomized crop of `chunk_size` samples without a mask.
    pub const fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            randomize: true,
            mask: false,
            fixed_offset: None,
        }
    }

    /// Sets whether offsets are drawn at random.
    pub const fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    /// Sets whether a padding mask is produced.
    pub const fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }

    /// Crops deterministically at `offset`. Disables randomization.
    pub const fn with_fixed_offset(mut self, offset: usize) -> Self {
        self.fixed_offset = Some(offset);
        self.randomize = false;
        self
    }

    fn validate(&self) -> ChunkResult<()> {
        if self.chunk_size == 0 {
            return Err(ChunkError::invalid_input("chunk_size must be positive"));
        }
        Ok(())
    }

    /// Picks the draw offset for a source of `n` samples.
    ///
    /// Always `0` when the source is not longer than the chunk.
    pub fn choose_offset<R: Rng>(&self, n: usize, rng: &mut R) -> usize {
        let max_offset = n.saturating_sub(self.chunk_size);
        if max_offset == 0 {
            return 0;
        }
        if self.randomize {
            return rng.random_range(0..=max_offset);
        }
        match self.fixed_offset {
            Some(offset) if offset > max_offset => {
                tracing::debug!(offset, max_offset, "clamping fixed offset");
                max_offset
            }
            Some(offset) => offset,
            None => 0,
        }
    }

    /// Draws one chunk of exactly `chunk_size` samples from `source`.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidInput`] if `source` has no samples or
    /// `chunk_size` is zero.
    pub fn draw_chunk<F, R>(&self, source: &AudioSamples<F>, rng: &mut R) -> ChunkResult<Chunk<F>>
    where
        F: RealFloat,
        R: Rng,
    {
        self.validate()?;
        let n = source.samples_per_channel();
        if n == 0 {
            return Err(ChunkError::invalid_input("cannot draw a chunk from empty audio"));
        }

        let offset = self.choose_offset(n, rng);
        tracing::trace!(n, offset, chunk_size = self.chunk_size, "drawing chunk");
        crop_at(source, offset, self.chunk_size, self.mask)
    }

    /// [`PadCrop::draw_chunk`] with a fresh `StdRng` seeded from `seed`.
    ///
    /// # Errors
    /// Same conditions as [`PadCrop::draw_chunk`].
    pub fn draw_chunk_seeded<F: RealFloat>(
        &self,
        source: &AudioSamples<F>,
        seed: u64,
    ) -> ChunkResult<Chunk<F>> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.draw_chunk(source, &mut rng)
    }

    /// Draws one chunk from each source.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidInput`] if the batch is empty, channel counts
    /// differ across sources, or any single draw fails.
    pub fn draw_batch<F, R>(
        &self,
        sources: &[AudioSamples<F>],
        rng: &mut R,
    ) -> ChunkResult<Vec<Chunk<F>>>
    where
        F: RealFloat,
        R: Rng,
    {
        let first = sources
            .first()
            .ok_or_else(|| ChunkError::invalid_input("cannot draw from an empty batch"))?;
        let channels = first.num_channels();
        if let Some((i, bad)) = sources
            .iter()
            .enumerate()
            .find(|(_, s)| s.num_channels() != channels)
        {
            return Err(ChunkError::invalid_input(format!(
                "batch item {i} has {} channel(s), expected {channels}",
                bad.num_channels()
            )));
        }

        tracing::debug!(batch = sources.len(), chunk_size = self.chunk_size, "drawing batch");
        sources.iter().map(|s| self.draw_chunk(s, rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn ramp(len: usize) -> AudioSamples<f32> {
        AudioSamples::new_mono(Array1::range(0.0, len as f32, 1.0), 100).unwrap()
    }

    #[test]
    fn short_source_is_zero_padded() {
        let source = AudioSamples::new_mono(array![1.0f32, 2.0, 3.0, 4.0, 5.0], 44100).unwrap();
        let chunk = PadCrop::new(8).with_mask(true).draw_chunk_seeded(&source, 3).unwrap();

        assert_eq!(
            chunk.audio.channel(0).unwrap().to_vec(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(
            chunk.padding_mask.as_ref().unwrap().to_vec(),
            vec![1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(chunk.metadata.t_start, 0.0);
        assert_eq!(chunk.metadata.t_end, 1.0);
        assert!(chunk.is_padded());
    }

    #[test]
    fn deterministic_crop_takes_the_start() {
        let source = ramp(100);
        let chunk = PadCrop::new(10)
            .with_randomize(false)
            .draw_chunk_seeded(&source, 0)
            .unwrap();

        assert_eq!(
            chunk.audio.channel(0).unwrap().to_vec(),
            (0..10).map(|i| i as f32).collect::<Vec<_>>()
        );
        assert_eq!(chunk.metadata.t_start, 0.0);
        assert!((chunk.metadata.t_end - 0.1).abs() < 1e-12);
        assert!(chunk.padding_mask.is_none());
        assert!(!chunk.is_padded());
    }

    #[test]
    fn random_crop_copies_source_verbatim() {
        let source = ramp(1000);
        let crop = PadCrop::new(64);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let chunk = crop.draw_chunk(&source, &mut rng).unwrap();
            let offset = chunk.metadata.offset;
            assert!(offset <= 1000 - 64);
            let row = chunk.audio.channel(0).unwrap();
            assert_eq!(row.len(), 64);
            for (i, &v) in row.iter().enumerate() {
                assert_eq!(v, (offset + i) as f32);
            }
            assert!(chunk.metadata.t_start <= chunk.metadata.t_end);
            assert!(chunk.metadata.t_end <= 1.0);
        }
    }

    #[test]
    fn same_seed_same_offset() {
        let source = ramp(10_000);
        let crop = PadCrop::new(100);
        let a = crop.draw_chunk_seeded(&source, 1234).unwrap();
        let b = crop.draw_chunk_seeded(&source, 1234).unwrap();
        assert_eq!(a.metadata.offset, b.metadata.offset);
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_offset_is_used_and_clamped() {
        let source = ramp(50);
        let chunk = PadCrop::new(10).with_fixed_offset(20).draw_chunk_seeded(&source, 0).unwrap();
        assert_eq!(chunk.metadata.offset, 20);
        assert_eq!(chunk.audio.channel(0).unwrap()[0], 20.0);

        let clamped = PadCrop::new(10).with_fixed_offset(45).draw_chunk_seeded(&source, 0).unwrap();
        assert_eq!(clamped.metadata.offset, 40);
        assert_eq!(clamped.metadata.t_end, 1.0);
    }

    #[test]
    fn seconds_metadata() {
        let source = ramp(200);
        let chunk = PadCrop::new(50).with_fixed_offset(100).draw_chunk_seeded(&source, 0).unwrap();
        assert_eq!(chunk.metadata.seconds_start, 1.0);
        assert_eq!(chunk.metadata.seconds_total, 2.0);
    }

    #[test]
    fn channels_are_preserved() {
        let source =
            AudioSamples::new_multi_channel(array![[1.0f64, 2.0, 3.0], [-1.0, -2.0, -3.0]], 8000)
                .unwrap();
        let chunk = PadCrop::new(4).draw_chunk_seeded(&source, 9).unwrap();
        assert_eq!(chunk.audio.view().dim(), (2, 4));
        assert_eq!(chunk.audio.channel(1).unwrap().to_vec(), vec![-1.0, -2.0, -3.0, 0.0]);
    }

    #[test]
    fn mask_sum_matches_real_samples() {
        for (len, size) in [(5usize, 8usize), (8, 8), (30, 8)] {
            let chunk = PadCrop::new(size)
                .with_mask(true)
                .draw_chunk_seeded(&ramp(len), 5)
                .unwrap();
            let sum: f32 = chunk.padding_mask.unwrap().sum();
            assert_eq!(sum as usize, size.min(len));
        }
    }

    #[test]
    fn mask_channel_is_appended() {
        let source = AudioSamples::new_mono(array![0.3f32, 0.4], 44100).unwrap();
        let chunk = PadCrop::new(4).draw_chunk_seeded(&source, 0).unwrap();
        let stacked = chunk.with_mask_channel().unwrap();
        assert_eq!(stacked.num_channels(), 2);
        assert_eq!(stacked.channel(1).unwrap().to_vec(), vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let empty = AudioSamples::<f32>::zeros(1, 0, 44100).unwrap();
        assert!(matches!(
            PadCrop::new(8).draw_chunk_seeded(&empty, 0),
            Err(ChunkError::InvalidInput(_))
        ));
        assert!(matches!(
            PadCrop::new(0).draw_chunk_seeded(&ramp(4), 0),
            Err(ChunkError::InvalidInput(_))
        ));
    }

    #[test]
    fn batch_requires_matching_channels() {
        let mono = ramp(20);
        let stereo = AudioSamples::<f32>::zeros(2, 20, 100).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let ok = PadCrop::new(8).draw_batch(&[mono.clone(), ramp(3)], &mut rng).unwrap();
        assert_eq!(ok.len(), 2);
        assert!(ok.iter().all(|c| c.audio.samples_per_channel() == 8));

        assert!(matches!(
            PadCrop::new(8).draw_batch(&[mono, stereo], &mut rng),
            Err(ChunkError::InvalidInput(_))
        ));
        assert!(PadCrop::new(8).draw_batch::<f32, _>(&[], &mut rng).is_err());
    }
}
