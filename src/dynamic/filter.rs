use super::DynamicFilterConfig;
use crate::bloom::{
    BloomFilter, BloomFilterOps, BloomFilterStats, BloomParams,
};
use crate::common::format_float;
use crate::error::{BloomError, Result};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Scalable Bloom filter built from a chain of fixed-capacity shards.
///
/// Every shard holds `base_capacity` keys at the individual error rate
/// derived from the config, so that `max_capacity` keys spread over
/// `ceil(max_capacity / base_capacity)` shards stay under `max_error_rate`.
/// The chain keeps growing past `max_capacity`; the bound just stops holding.
///
/// Shards are kept oldest first. Lookups scan newest first and inserts go to
/// the last shard, opening a new one when it is full.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicBloomFilter {
    config: DynamicFilterConfig,
    individual_error_rate: f64,
    shards: Vec<BloomFilter>,
}

impl DynamicBloomFilter {
    pub fn new(config: DynamicFilterConfig) -> Result<Self> {
        config.validate()?;

        let individual_error_rate = config.individual_error_rate();
        debug!(
            base_capacity = config.base_capacity,
            max_capacity = config.max_capacity,
            max_error_rate = config.max_error_rate,
            individual_error_rate,
            expected_shards = config.expected_shards(),
            "Created dynamic bloom filter"
        );

        Ok(Self {
            config,
            individual_error_rate,
            shards: Vec::new(),
        })
    }

    pub fn with_params(
        base_capacity: usize,
        max_capacity: usize,
        max_error_rate: f64,
    ) -> Result<Self> {
        Self::new(DynamicFilterConfig {
            base_capacity,
            max_capacity,
            max_error_rate,
        })
    }

    fn empty_like(&self) -> Self {
        Self {
            config: self.config.clone(),
            individual_error_rate: self.individual_error_rate,
            shards: Vec::new(),
        }
    }

    fn new_shard(&self) -> Result<BloomFilter> {
        BloomFilter::new(self.config.shard_config())
    }

    fn check_compatible(&self, other: &DynamicBloomFilter) -> Result<()> {
        if self.config.base_capacity != other.config.base_capacity {
            return Err(BloomError::IncompatibleFilters {
                reason: format!(
                    "base capacity {} does not match {}",
                    self.config.base_capacity, other.config.base_capacity
                ),
            });
        }
        Ok(())
    }

    /// Merges two chains, folding each of our shards into the newest shard of
    /// `other` whose union with it counts below `base_capacity`. A shard
    /// union keeps the count of our shard, so partial shards always fold and
    /// full ones are appended after `other`'s.
    pub fn union(&self, other: &DynamicBloomFilter) -> Result<Self> {
        self.check_compatible(other)?;

        let base_capacity = self.config.base_capacity;
        let mut merged = other.shards.clone();
        let mut unmerged = Vec::new();

        for shard in &self.shards {
            let mut placed = false;
            for target in merged.iter_mut().rev() {
                let candidate = shard.union(target)?;
                if candidate.count() < base_capacity {
                    *target = candidate;
                    placed = true;
                    break;
                }
            }
            if !placed {
                unmerged.push(shard.clone());
            }
        }

        debug!(
            merged = self.shards.len() - unmerged.len(),
            appended = unmerged.len(),
            "Union of dynamic bloom filters"
        );
        merged.extend(unmerged);

        let mut result = self.empty_like();
        result.shards = merged;
        Ok(result)
    }

    /// One shard per shard of `self`: the union over every shard `t` of
    /// `other` of `self_i AND t`. Keys present in both chains survive, but
    /// the result is not a minimal chain.
    pub fn intersection(&self, other: &DynamicBloomFilter) -> Result<Self> {
        self.check_compatible(other)?;

        let mut result = self.empty_like();
        for shard in &self.shards {
            let mut acc = shard.clone();
            acc.clear();
            for other_shard in &other.shards {
                acc = acc.union(&shard.intersection(other_shard)?)?;
            }
            result.shards.push(acc);
        }
        Ok(result)
    }

    /// `{base_capacity},{max_capacity},{max_error_rate},{shard}|{shard}|...`
    pub fn serialize(&self) -> String {
        let shards: Vec<String> =
            self.shards.iter().map(BloomFilter::serialize).collect();
        format!(
            "{},{},{},{}",
            self.config.base_capacity,
            self.config.max_capacity,
            format_float(self.config.max_error_rate),
            shards.join("|")
        )
    }

    pub fn deserialize(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim().splitn(4, ',').collect();
        if fields.len() != 4 {
            return Err(BloomError::malformed(format!(
                "expected 4 ','-separated fields, got {}",
                fields.len()
            )));
        }

        let config = DynamicFilterConfig {
            base_capacity: fields[0].parse()?,
            max_capacity: fields[1].parse()?,
            max_error_rate: fields[2].parse()?,
        };
        let mut filter = Self::new(config)
            .map_err(|e| BloomError::malformed(e.to_string()))?;

        if !fields[3].is_empty() {
            for encoded in fields[3].split('|') {
                let shard = BloomFilter::deserialize(encoded)?;
                filter.check_shard(&shard)?;
                filter.shards.push(shard);
            }
        }

        debug!(
            shards = filter.shards.len(),
            "Deserialized dynamic bloom filter"
        );
        Ok(filter)
    }

    /// A rehydrated shard must look exactly like one `insert` would open.
    fn check_shard(&self, shard: &BloomFilter) -> Result<()> {
        let expected = self.config.shard_config();
        if shard.capacity() != expected.capacity {
            return Err(BloomError::malformed(format!(
                "shard capacity {} differs from base capacity {}",
                shard.capacity(),
                expected.capacity
            )));
        }
        if shard.error_rate() != self.individual_error_rate {
            return Err(BloomError::malformed(format!(
                "shard error rate {} differs from individual error rate {}",
                shard.error_rate(),
                self.individual_error_rate
            )));
        }

        let params = BloomParams::from(&expected);
        if shard.num_slices() != params.num_slices
            || shard.bits_per_slice() != params.bits_per_slice
        {
            return Err(BloomError::malformed(format!(
                "shard geometry {}x{} differs from {}x{}",
                shard.num_slices(),
                shard.bits_per_slice(),
                params.num_slices,
                params.bits_per_slice
            )));
        }
        Ok(())
    }

    pub fn config(&self) -> &DynamicFilterConfig {
        &self.config
    }

    pub fn base_capacity(&self) -> usize {
        self.config.base_capacity
    }

    pub fn max_capacity(&self) -> usize {
        self.config.max_capacity
    }

    pub fn max_error_rate(&self) -> f64 {
        self.config.max_error_rate
    }

    pub fn individual_error_rate(&self) -> f64 {
        self.individual_error_rate
    }

    pub fn shards(&self) -> &[BloomFilter] {
        &self.shards
    }

    pub fn num_shards(&self) -> usize {
        self.shards.len()
    }
}

impl BloomFilterOps for DynamicBloomFilter {
    /// Returns `true` without touching any shard when some shard already
    /// reports the key.
    fn insert(&mut self, key: &str) -> Result<bool> {
        if self.contains(key) {
            return Ok(true);
        }

        let needs_shard = match self.shards.last() {
            Some(last) => last.count() >= self.config.base_capacity,
            None => true,
        };
        if needs_shard {
            let shard = self.new_shard()?;
            self.shards.push(shard);
            debug!(shards = self.shards.len(), "Opened new shard");
        }

        let active = self.shards.len() - 1;
        // The chain-wide lookup above already ruled out a duplicate
        self.shards[active].insert_with(key, true)?;
        Ok(false)
    }

    fn contains(&self, key: &str) -> bool {
        self.shards.iter().rev().any(|shard| shard.contains(key))
    }

    fn clear(&mut self) {
        self.shards.clear();
    }
}

impl BloomFilterStats for DynamicBloomFilter {
    fn capacity(&self) -> usize {
        self.config.max_capacity
    }

    fn error_rate(&self) -> f64 {
        self.config.max_error_rate
    }

    /// Sum of the shard counts.
    fn count(&self) -> usize {
        self.shards.iter().map(BloomFilterStats::count).sum()
    }
}

impl fmt::Display for DynamicBloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for DynamicBloomFilter {
    type Err = BloomError;

    fn from_str(s: &str) -> Result<Self> {
        Self::deserialize(s)
    }
}
