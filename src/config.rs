//! Chunker configuration.
//!
//! [`ChunkerConfig`] gathers every knob of the chunking pipeline in one
//! serde-friendly struct. It can be read from YAML, then overlaid with
//! `CHUNKADELIC_*` environment variables so cluster jobs can adjust a shared
//! config file per node.
//!
//! ```rust
//! use chunkadelic::ChunkerConfig;
//!
//! let config = ChunkerConfig::from_yaml_str("chunk_size: 32768\noverlap: 0.25\n").unwrap();
//! assert_eq!(config.chunk_size, 32768);
//! assert_eq!(config.stride().unwrap(), 24576);
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::iterators::{ChunkPolicy, SilencePolicy, TailPolicy, stride_for_overlap};
use crate::utils::detection::{SilenceDetector, SilenceStrategy};
use crate::{ChunkError, ChunkResult, PadCrop};

/// Environment variable overriding [`ChunkerConfig::chunk_size`].
pub const ENV_CHUNK_SIZE: &str = "CHUNKADELIC_CHUNK_SIZE";
/// Environment variable overriding [`ChunkerConfig::overlap`].
pub const ENV_OVERLAP: &str = "CHUNKADELIC_OVERLAP";
/// Environment variable overriding [`ChunkerConfig::threshold_db`].
pub const ENV_THRESHOLD_DB: &str = "CHUNKADELIC_THRESHOLD_DB";
/// Environment variable overriding [`ChunkerConfig::seed`].
pub const ENV_SEED: &str = "CHUNKADELIC_SEED";

/// Settings for cropping and whole-buffer chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Chunk length in samples.
    pub chunk_size: usize,
    /// Fraction of a chunk shared by consecutive windows, in `[0, 1)`.
    pub overlap: f64,
    /// Draw crop offsets at random.
    pub randomize: bool,
    /// Produce padding masks.
    pub mask: bool,
    /// Silence threshold in dB.
    pub threshold_db: f64,
    /// Level measurement used by the silence detector.
    pub strategy: SilenceStrategy,
    /// Handling of silent windows.
    pub silence_policy: SilencePolicy,
    /// Handling of incomplete trailing windows.
    pub tail_policy: TailPolicy,
    /// Seed for [`ChunkerConfig::rng`]. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 65536,
            overlap: 0.5,
            randomize: true,
            mask: false,
            threshold_db: -70.0,
            strategy: SilenceStrategy::Peak,
            silence_policy: SilencePolicy::Keep,
            tail_policy: TailPolicy::Pad,
            seed: None,
        }
    }
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> ChunkResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ChunkError::Config(format!("{key}={value:?}: {e}")))
}

impl ChunkerConfig {
    /// Parses a YAML document. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`ChunkError::Config`] for malformed YAML or invalid values.
    pub fn from_yaml_str(yaml: &str) -> ChunkResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config to YAML.
    ///
    /// # Errors
    /// Returns [`ChunkError::Config`] if serialization fails.
    pub fn to_yaml_string(&self) -> ChunkResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reads a YAML config file, falling back to defaults if it can't be read.
    ///
    /// # Errors
    /// Returns [`ChunkError::Config`] if the file exists but does not parse.
    pub fn load(path: impl AsRef<Path>) -> ChunkResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loading chunker config");
                Self::from_yaml_str(&contents)
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "config not readable, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Overlays `CHUNKADELIC_*` environment variables.
    ///
    /// # Errors
    /// Returns [`ChunkError::Config`] if a variable is set but does not parse.
    pub fn apply_env_overrides(&mut self) -> ChunkResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Overlays values looked up by `lookup`, keyed by the `ENV_*` names.
    ///
    /// # Errors
    /// Returns [`ChunkError::Config`] if a value does not parse or the result
    /// fails [`ChunkerConfig::validate`].
    pub fn apply_overrides<L>(&mut self, lookup: L) -> ChunkResult<()>
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_CHUNK_SIZE) {
            self.chunk_size = parse_override(ENV_CHUNK_SIZE, &v)?;
        }
        if let Some(v) = lookup(ENV_OVERLAP) {
            self.overlap = parse_override(ENV_OVERLAP, &v)?;
        }
        if let Some(v) = lookup(ENV_THRESHOLD_DB) {
            self.threshold_db = parse_override(ENV_THRESHOLD_DB, &v)?;
        }
        if let Some(v) = lookup(ENV_SEED) {
            self.seed = Some(parse_override(ENV_SEED, &v)?);
        }
        self.validate()
    }

    /// Checks that the values can drive the chunker.
    ///
    /// # Errors
    /// Returns [`ChunkError::Config`] for a zero chunk size, an overlap
    /// outside `[0, 1)` or a NaN threshold.
    pub fn validate(&self) -> ChunkResult<()> {
        if self.chunk_size == 0 {
            return Err(ChunkError::Config("chunk_size must be positive".to_string()));
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(ChunkError::Config(format!(
                "overlap must be in [0, 1), got {}",
                self.overlap
            )));
        }
        if self.threshold_db.is_nan() {
            return Err(ChunkError::Config("threshold_db must be a number".to_string()));
        }
        Ok(())
    }

    /// Stride between consecutive windows.
    ///
    /// # Errors
    /// Same conditions as [`stride_for_overlap`].
    pub fn stride(&self) -> ChunkResult<usize> {
        stride_for_overlap(self.chunk_size, self.overlap)
    }

    /// Crop settings for [`PadCrop::draw_chunk`].
    pub const fn pad_crop(&self) -> PadCrop {
        PadCrop::new(self.chunk_size)
            .with_randomize(self.randomize)
            .with_mask(self.mask)
    }

    /// Generator for [`PadCrop::draw_chunk`], seeded from `seed` when set and
    /// from the OS otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Silence detector for the configured threshold and strategy.
    pub const fn detector(&self) -> SilenceDetector {
        SilenceDetector::new(self.threshold_db, self.strategy)
    }

    /// Policy for [`blow_chunks`](crate::blow_chunks).
    pub const fn chunk_policy(&self) -> ChunkPolicy {
        ChunkPolicy {
            tail: self.tail_policy,
            silence: self.silence_policy,
            detector: self.detector(),
            mask: self.mask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let config = ChunkerConfig::from_yaml_str(
            "chunk_size: 4096\nstrategy: rms\nsilence_policy: drop\ntail_policy: skip\n",
        )
        .unwrap();
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.strategy, SilenceStrategy::Rms);
        assert_eq!(config.silence_policy, SilencePolicy::Drop);
        assert_eq!(config.tail_policy, TailPolicy::Skip);
        assert_eq!(config.overlap, 0.5);
        assert!(config.randomize);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn yaml_round_trip() {
        let config = ChunkerConfig {
            seed: Some(99),
            mask: true,
            ..ChunkerConfig::default()
        };
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(ChunkerConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn invalid_yaml_values_are_rejected() {
        assert!(matches!(
            ChunkerConfig::from_yaml_str("chunk_size: 0\n"),
            Err(ChunkError::Config(_))
        ));
        assert!(ChunkerConfig::from_yaml_str("overlap: 1.0\n").is_err());
        assert!(ChunkerConfig::from_yaml_str("chunk_size: [1, 2]\n").is_err());
    }

    #[test]
    fn overrides_replace_values() {
        let mut config = ChunkerConfig::default();
        config
            .apply_overrides(lookup(&[
                (ENV_CHUNK_SIZE, "1024"),
                (ENV_OVERLAP, "0.75"),
                (ENV_THRESHOLD_DB, " -60 "),
                (ENV_SEED, "7"),
            ]))
            .unwrap();
        assert_eq!(config.chunk_size, 1024);
        assert_eq!(config.overlap, 0.75);
        assert_eq!(config.threshold_db, -60.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.stride().unwrap(), 256);
    }

    #[test]
    fn unparseable_override_is_a_config_error() {
        let mut config = ChunkerConfig::default();
        let err = config
            .apply_overrides(lookup(&[(ENV_CHUNK_SIZE, "lots")]))
            .unwrap_err();
        assert!(matches!(err, ChunkError::Config(msg) if msg.contains(ENV_CHUNK_SIZE)));
    }

    #[test]
    fn missing_file_means_defaults() {
        let config = ChunkerConfig::load("/nonexistent/chunkadelic.yaml").unwrap();
        assert_eq!(config, ChunkerConfig::default());
    }

    #[test]
    fn loads_yaml_from_disk() {
        let path = std::env::temp_dir().join(format!("chunkadelic-{}.yaml", std::process::id()));
        fs::write(&path, "chunk_size: 2048\nmask: true\nthreshold_db: -55.5\n").unwrap();
        let config = ChunkerConfig::load(&path);
        fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.chunk_size, 2048);
        assert!(config.mask);
        assert_eq!(config.threshold_db, -55.5);
        assert_eq!(config.tail_policy, TailPolicy::Pad);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let path = std::env::temp_dir().join(format!("chunkadelic-bad-{}.yaml", std::process::id()));
        fs::write(&path, "overlap: [nope\n").unwrap();
        let result = ChunkerConfig::load(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ChunkError::Config(_))));
    }

    // Only test in the crate that touches the process environment.
    #[test]
    fn env_overrides_reach_the_config() {
        // SAFETY: no other test reads or writes CHUNKADELIC_* variables.
        unsafe {
            std::env::set_var(ENV_SEED, "11");
            std::env::set_var(ENV_CHUNK_SIZE, "300");
        }
        let mut config = ChunkerConfig::default();
        let result = config.apply_env_overrides();
        unsafe {
            std::env::remove_var(ENV_SEED);
            std::env::remove_var(ENV_CHUNK_SIZE);
        }

        result.unwrap();
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.chunk_size, 300);
    }

    #[test]
    fn seed_drives_crop_offsets() {
        let source = crate::AudioSamples::new_mono(
            ndarray::Array1::range(0.0f32, 10_000.0, 1.0),
            16_000,
        )
        .unwrap();
        let config = ChunkerConfig {
            chunk_size: 64,
            seed: Some(5),
            ..ChunkerConfig::default()
        };
        let offsets = |config: &ChunkerConfig| {
            let crop = config.pad_crop();
            let mut rng = config.rng();
            (0..8)
                .map(|_| crop.draw_chunk(&source, &mut rng).unwrap().metadata.offset)
                .collect::<Vec<_>>()
        };

        let first = offsets(&config);
        assert_eq!(first, offsets(&config.clone()));
        let other = ChunkerConfig {
            seed: Some(6),
            ..config
        };
        assert_ne!(first, offsets(&other));
    }

    #[test]
    fn builds_pipeline_pieces() {
        let config = ChunkerConfig {
            chunk_size: 512,
            randomize: false,
            mask: true,
            threshold_db: -50.0,
            silence_policy: SilencePolicy::Flag,
            ..ChunkerConfig::default()
        };
        let crop = config.pad_crop();
        assert_eq!(crop.chunk_size, 512);
        assert!(!crop.randomize);
        assert!(crop.mask);

        let policy = config.chunk_policy();
        assert_eq!(policy.silence, SilencePolicy::Flag);
        assert_eq!(policy.detector.threshold_db, -50.0);
        assert!(policy.mask);
    }
}
