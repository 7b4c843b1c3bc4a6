use crate::bloom::BloomFilterConfig;
use crate::bloom::config::validate_error_rate;
use crate::error::{BloomError, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(pattern = "owned")]
pub struct DynamicFilterConfig {
    /// Capacity of every shard
    #[builder(default = "1_000")]
    pub base_capacity: usize,
    /// Expected total number of keys; sizes the per-shard error rate
    #[builder(default = "1_000_000")]
    pub max_capacity: usize,
    /// Compound false positive rate across `max_capacity / base_capacity` shards
    #[builder(default = "0.001")]
    pub max_error_rate: f64,
}

impl Default for DynamicFilterConfig {
    fn default() -> Self {
        Self {
            base_capacity: 1_000,
            max_capacity: 1_000_000,
            max_error_rate: 0.001,
        }
    }
}

impl DynamicFilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_capacity == 0 {
            return Err(BloomError::InvalidConfig(
                "Base capacity must be > 0".into(),
            ));
        }
        if self.max_capacity == 0 {
            return Err(BloomError::InvalidConfig(
                "Max capacity must be > 0".into(),
            ));
        }
        validate_error_rate(self.max_error_rate)?;
        // Tiny rates spread over many shards can round down to zero
        validate_error_rate(self.individual_error_rate())
    }

    pub fn expected_shards(&self) -> usize {
        self.max_capacity.div_ceil(self.base_capacity)
    }

    /// Per-shard error rate `1 - (1 - max_error_rate)^(1 / expected_shards)`.
    pub fn individual_error_rate(&self) -> f64 {
        let exponent = 1.0 / self.expected_shards() as f64;
        1.0 - (1.0 - self.max_error_rate).powf(exponent)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn shard_config(&self) -> BloomFilterConfig {
        BloomFilterConfig {
            capacity: self.base_capacity,
            error_rate: self.individual_error_rate(),
        }
    }
}
