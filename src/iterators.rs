//! Whole-buffer chunking.
//!
//! [`blow_chunks`] walks a source buffer with a fixed stride and yields one
//! [`ChunkedWindow`] per window start. Windows are produced lazily; the
//! iterator borrows the source and can be cloned or [`reset`](ChunkIterator::reset)
//! to replay the same sequence.

use serde::{Deserialize, Serialize};

use crate::chunker::{Chunk, crop_at};
use crate::utils::detection::SilenceDetector;
use crate::{AudioSamples, ChunkError, ChunkResult, RealFloat};

/// What to do with the final windows that run past the end of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailPolicy {
    /// Zero-pad incomplete windows to the full chunk size.
    #[default]
    Pad,
    /// Skip incomplete windows. A source shorter than one chunk still yields
    /// its single padded window.
    Skip,
}

/// What to do with windows the silence detector rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SilencePolicy {
    /// Don't run the detector.
    #[default]
    Keep,
    /// Run the detector and report the result in [`ChunkedWindow::silent`].
    Flag,
    /// Run the detector and leave silent windows out.
    Drop,
}

/// Options for [`blow_chunks`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChunkPolicy {
    /// Handling of windows that extend past the end of the source.
    pub tail: TailPolicy,
    /// Handling of silent windows.
    pub silence: SilencePolicy,
    /// Detector used unless `silence` is [`SilencePolicy::Keep`].
    pub detector: SilenceDetector,
    /// Attach a padding mask to every chunk.
    pub mask: bool,
}

impl ChunkPolicy {
    /// Sets the tail policy.
    pub const fn with_tail(mut self, tail: TailPolicy) -> Self {
        self.tail = tail;
        self
    }

    /// Sets the silence policy.
    pub const fn with_silence(mut self, silence: SilencePolicy) -> Self {
        self.silence = silence;
        self
    }

    /// Sets the silence detector.
    pub const fn with_detector(mut self, detector: SilenceDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Sets whether chunks carry a padding mask.
    pub const fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }
}

/// One window produced by [`blow_chunks`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkedWindow<F: RealFloat> {
    /// Position of the window in the stride grid. Dropped windows still
    /// consume an index, so indices can have gaps.
    pub index: usize,
    /// The chunk, with metadata and (if requested) mask.
    pub chunk: Chunk<F>,
    /// Whether the detector judged the window silent. Always `false` under
    /// [`SilencePolicy::Keep`].
    pub silent: bool,
}

/// Converts an overlap fraction into a stride.
///
/// An overlap of `0.5` advances half a chunk per window. The stride is never
/// less than one sample.
///
/// ```
/// use chunkadelic::stride_for_overlap;
///
/// assert_eq!(stride_for_overlap(1024, 0.5).unwrap(), 512);
/// assert_eq!(stride_for_overlap(1024, 0.0).unwrap(), 1024);
/// assert!(stride_for_overlap(1024, 1.0).is_err());
/// ```
///
/// # Errors
/// Returns [`ChunkError::InvalidParameter`] if `overlap` is outside `[0, 1)`,
/// or [`ChunkError::InvalidInput`] if `chunk_size` is zero.
pub fn stride_for_overlap(chunk_size: usize, overlap: f64) -> ChunkResult<usize> {
    if chunk_size == 0 {
        return Err(ChunkError::invalid_input("chunk_size must be positive"));
    }
    if !(0.0..1.0).contains(&overlap) {
        return Err(ChunkError::invalid_parameter(
            "overlap",
            format!("{overlap} is not in [0, 1)"),
        ));
    }
    let stride = (chunk_size as f64 * (1.0 - overlap)).floor() as usize;
    Ok(stride.max(1))
}

/// Splits `source` into chunks of `chunk_size` samples, one every `stride` samples.
///
/// # Errors
/// Returns [`ChunkError::InvalidInput`] if `source` is empty or either size is zero.
pub fn blow_chunks<F: RealFloat>(
    source: &AudioSamples<F>,
    chunk_size: usize,
    stride: usize,
    policy: ChunkPolicy,
) -> ChunkResult<ChunkIterator<'_, F>> {
    ChunkIterator::new(source, chunk_size, stride, policy)
}

/// Lazy iterator over the windows of a source buffer.
///
/// # Panics
/// Never in practice: every window start lies inside the source, which
/// [`blow_chunks`] has already checked to be non-empty.
#[derive(Debug, Clone)]
pub struct ChunkIterator<'a, F: RealFloat> {
    audio: &'a AudioSamples<F>,
    chunk_size: usize,
    stride: usize,
    policy: ChunkPolicy,
    position: usize,
    index: usize,
}

impl<'a, F: RealFloat> ChunkIterator<'a, F> {
    fn new(
        audio: &'a AudioSamples<F>,
        chunk_size: usize,
        stride: usize,
        policy: ChunkPolicy,
    ) -> ChunkResult<Self> {
        if chunk_size == 0 {
            return Err(ChunkError::invalid_input("chunk_size must be positive"));
        }
        if stride == 0 {
            return Err(ChunkError::invalid_input("stride must be positive"));
        }
        if audio.samples_per_channel() == 0 {
            return Err(ChunkError::invalid_input("cannot chunk empty audio"));
        }

        tracing::debug!(
            samples = audio.samples_per_channel(),
            chunk_size,
            stride,
            ?policy,
            "chunking audio"
        );

        Ok(Self {
            audio,
            chunk_size,
            stride,
            policy,
            position: 0,
            index: 0,
        })
    }

    /// Rewinds to the first window.
    pub const fn reset(&mut self) {
        self.position = 0;
        self.index = 0;
    }

    /// Number of windows in the stride grid, before any silent ones are dropped.
    pub fn total_windows(&self) -> usize {
        let n = self.audio.samples_per_channel();
        match self.policy.tail {
            TailPolicy::Pad => n.div_ceil(self.stride),
            TailPolicy::Skip if n < self.chunk_size => 1,
            TailPolicy::Skip => 1 + (n - self.chunk_size) / self.stride,
        }
    }

    fn remaining_windows(&self) -> usize {
        self.total_windows().saturating_sub(self.index)
    }

    fn window_available(&self) -> bool {
        let n = self.audio.samples_per_channel();
        if self.position >= n {
            return false;
        }
        match self.policy.tail {
            TailPolicy::Pad => true,
            TailPolicy::Skip => self.position == 0 || self.position + self.chunk_size <= n,
        }
    }
}

impl<F: RealFloat> Iterator for ChunkIterator<'_, F> {
    type Item = ChunkedWindow<F>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.window_available() {
            let start = self.position;
            let index = self.index;
            self.position += self.stride;
            self.index += 1;

            debug_assert!(start < self.audio.samples_per_channel());
            // start is in bounds and the source was validated on construction
            let chunk = crop_at(self.audio, start, self.chunk_size, self.policy.mask)
                .expect("window start lies inside a non-empty source");

            let silent = match self.policy.silence {
                SilencePolicy::Keep => false,
                SilencePolicy::Flag | SilencePolicy::Drop => chunk
                    .audio
                    .slice_samples(0..chunk.metadata.valid_len)
                    .map(|real| self.policy.detector.is_silent(real))
                    .unwrap_or(true),
            };

            if silent && self.policy.silence == SilencePolicy::Drop {
                tracing::trace!(index, start, "dropping silent window");
                continue;
            }

            return Some(ChunkedWindow {
                index,
                chunk,
                silent,
            });
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining_windows();
        match self.policy.silence {
            SilencePolicy::Drop => (0, Some(remaining)),
            SilencePolicy::Keep | SilencePolicy::Flag => (remaining, Some(remaining)),
        }
    }
}
