use crate::error::{BloomError, Result};
use crate::hash::{optimal_bits_per_slice, optimal_num_slices};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration of a fixed-capacity [`BloomFilter`](super::BloomFilter).
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(pattern = "owned")]
pub struct BloomFilterConfig {
    /// Number of distinct keys the filter is sized for
    #[builder(default = "1_000")]
    pub capacity: usize,

    /// Target false positive rate (0.0 to 1.0, exclusive)
    #[builder(default = "0.001")]
    pub error_rate: f64,
}

impl Default for BloomFilterConfig {
    fn default() -> Self {
        Self {
            capacity: 1_000,
            error_rate: 0.001,
        }
    }
}

impl BloomFilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(BloomError::InvalidConfig(
                "Capacity must be > 0".into(),
            ));
        }
        validate_error_rate(self.error_rate)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

pub(crate) fn validate_error_rate(error_rate: f64) -> Result<()> {
    // NaN fails both comparisons, so it is rejected too
    if !(error_rate > 0.0 && error_rate < 1.0) {
        return Err(BloomError::InvalidConfig(format!(
            "Error rate must be between 0 and 1, got {error_rate}"
        )));
    }
    Ok(())
}

/// Slice geometry derived from a [`BloomFilterConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloomParams {
    pub num_slices: usize,
    pub bits_per_slice: usize,
}

impl BloomParams {
    pub fn num_bits(&self) -> usize {
        self.num_slices * self.bits_per_slice
    }
}

impl From<&BloomFilterConfig> for BloomParams {
    fn from(config: &BloomFilterConfig) -> Self {
        let num_slices = optimal_num_slices(config.error_rate);
        let bits_per_slice =
            optimal_bits_per_slice(config.capacity, config.error_rate, num_slices);

        Self {
            num_slices,
            bits_per_slice,
        }
    }
}
