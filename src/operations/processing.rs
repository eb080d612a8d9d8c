//! Amplitude processing for AudioSamples.

use super::traits::AudioProcessing;
use crate::{AudioSamples, ChunkError, ChunkResult, RealFloat};

impl<F: RealFloat> AudioProcessing<F> for AudioSamples<F> {
    fn scale(&mut self, factor: F) {
        self.mapv_inplace(|x| x * factor);
    }

    fn invert_phase(&mut self) {
        self.mapv_inplace(|x| -x);
    }

    fn normalize_peak(&mut self, target: F) -> ChunkResult<()> {
        if !target.is_finite() || target < F::zero() {
            return Err(ChunkError::invalid_parameter(
                "target",
                format!("peak target must be finite and non-negative, got {target}"),
            ));
        }
        let peak = self.peak();
        if peak == F::zero() {
            return Ok(());
        }
        self.scale(target / peak);
        Ok(())
    }
}
