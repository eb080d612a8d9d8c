//! Channel conversion for AudioSamples.

use ndarray::{Axis, concatenate, s};

use super::traits::AudioChannelOps;
use crate::{AudioSamples, ChunkError, ChunkResult, RealFloat};

impl<F: RealFloat> AudioChannelOps<F> for AudioSamples<F> {
    fn to_mono(&self) -> ChunkResult<Self> {
        if self.is_mono() {
            return Ok(self.clone());
        }
        let mixed = self
            .view()
            .mean_axis(Axis(0))
            .ok_or_else(|| ChunkError::invalid_input("cannot mix down audio with no channels"))?;
        AudioSamples::new_mono(mixed, self.sample_rate())
    }

    fn to_stereo(&self) -> ChunkResult<Self> {
        let view = self.view();
        let stereo = match self.num_channels() {
            1 => concatenate(Axis(0), &[view, view])
                .map_err(|e| ChunkError::DimensionMismatch(e.to_string()))?,
            2 => return Ok(self.clone()),
            _ => view.slice(s![..2, ..]).to_owned(),
        };
        AudioSamples::new_multi_channel(stereo, self.sample_rate())
    }
}
