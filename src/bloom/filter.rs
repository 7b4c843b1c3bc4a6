use super::config::validate_error_rate;
use super::{BloomFilterConfig, BloomFilterOps, BloomFilterStats, BloomParams};
use crate::common::{
    BitOrder, bytes2hr, format_float, pack_bits, unpack_bits,
};
use crate::error::{BloomError, Result};
use crate::hash::HashGenerator;
use bitvec::{bitvec, order::Lsb0, vec::BitVec};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Fixed-capacity, partitioned Bloom filter.
///
/// The bit vector is split into `num_slices` contiguous slices of
/// `bits_per_slice` bits and every key sets exactly one bit per slice.
/// The `:`-separated string form is shared with pybloom-style filters;
/// hashes agree with pybloom whenever a single salt suffices.
///
/// Not synchronized: share a filter across threads only behind a lock, or
/// hand each thread its own clone.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    error_rate: f64,
    capacity: usize,
    count: usize,
    hasher: HashGenerator,
    bits: BitVec<u8, Lsb0>,
}

impl BloomFilter {
    pub fn new(config: BloomFilterConfig) -> Result<Self> {
        config.validate()?;

        let params = BloomParams::from(&config);
        let filter = Self::from_parts(
            config.error_rate,
            params,
            config.capacity,
            0,
            None,
        )?;

        debug!(
            capacity = filter.capacity,
            error_rate = filter.error_rate,
            num_slices = params.num_slices,
            bits_per_slice = params.bits_per_slice,
            digest = %filter.hasher.algorithm(),
            memory = %bytes2hr(filter.num_bits().div_ceil(8)),
            "Created bloom filter"
        );
        Ok(filter)
    }

    pub fn with_capacity(capacity: usize, error_rate: f64) -> Result<Self> {
        Self::new(BloomFilterConfig {
            capacity,
            error_rate,
        })
    }

    fn from_parts(
        error_rate: f64,
        params: BloomParams,
        capacity: usize,
        count: usize,
        bits: Option<BitVec<u8, Lsb0>>,
    ) -> Result<Self> {
        let hasher =
            HashGenerator::new(params.num_slices, params.bits_per_slice)?;
        let num_bits = params
            .num_slices
            .checked_mul(params.bits_per_slice)
            .ok_or_else(|| {
                BloomError::InvalidConfig(format!(
                    "Bit vector too large: {} slices of {} bits",
                    params.num_slices, params.bits_per_slice
                ))
            })?;
        let bits = bits.unwrap_or_else(|| bitvec![u8, Lsb0; 0; num_bits]);

        Ok(Self {
            error_rate,
            capacity,
            count,
            hasher,
            bits,
        })
    }

    /// Absolute bit positions for `key`, one per slice.
    fn bit_indices(&self, key: &str) -> Vec<usize> {
        let bits_per_slice = self.hasher.bits_per_slice();
        self.hasher
            .hash(key)
            .into_iter()
            .enumerate()
            .map(|(slice, offset)| slice * bits_per_slice + offset)
            .collect()
    }

    /// Sets the bits for `key`.
    ///
    /// Returns `true` when every bit was already set (the key was probably
    /// present) and leaves `count` alone in that case. With
    /// `skip_duplicate_check` the key is always counted as new.
    ///
    /// Fails with [`BloomError::CapacityExceeded`] once `count > capacity`,
    /// which lets exactly one insert past the nominal capacity through.
    pub fn insert_with(
        &mut self,
        key: &str,
        skip_duplicate_check: bool,
    ) -> Result<bool> {
        let indices = self.bit_indices(key);
        if self.count > self.capacity {
            warn!(
                count = self.count,
                capacity = self.capacity,
                "Bloom filter capacity exceeded"
            );
            return Err(BloomError::CapacityExceeded {
                count: self.count,
                capacity: self.capacity,
            });
        }

        let mut found_all_bits = true;
        for idx in indices {
            if !skip_duplicate_check && found_all_bits && !self.bits[idx] {
                found_all_bits = false;
            }
            self.bits.set(idx, true);
        }

        if skip_duplicate_check || !found_all_bits {
            self.count += 1;
            return Ok(false);
        }
        Ok(true)
    }

    fn check_compatible(&self, other: &BloomFilter) -> Result<()> {
        if self.num_slices() != other.num_slices()
            || self.bits_per_slice() != other.bits_per_slice()
        {
            return Err(BloomError::IncompatibleFilters {
                reason: format!(
                    "geometry {}x{} does not match {}x{}",
                    self.num_slices(),
                    self.bits_per_slice(),
                    other.num_slices(),
                    other.bits_per_slice()
                ),
            });
        }
        Ok(())
    }

    /// Bitwise OR of both filters, written into a clone of `self`.
    ///
    /// Both filters must share slice geometry, i.e. have been built from the
    /// same capacity and error rate. The result keeps `self`'s count.
    pub fn union(&self, other: &BloomFilter) -> Result<BloomFilter> {
        self.check_compatible(other)?;

        let mut result = self.clone();
        for (dst, src) in result
            .bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *dst |= *src;
        }
        Ok(result)
    }

    /// Bitwise AND of both filters, written into a clone of `self`. Same
    /// geometry requirement and count as [`BloomFilter::union`].
    pub fn intersection(&self, other: &BloomFilter) -> Result<BloomFilter> {
        self.check_compatible(other)?;

        let mut result = self.clone();
        for (dst, src) in result
            .bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *dst &= *src;
        }
        Ok(result)
    }

    /// `{error_rate}:{num_slices}:{bits_per_slice}:{capacity}:{count}:little:{hex}`
    pub fn serialize(&self) -> String {
        let order = BitOrder::Little;
        format!(
            "{}:{}:{}:{}:{}:{}:{}",
            format_float(self.error_rate),
            self.num_slices(),
            self.bits_per_slice(),
            self.capacity,
            self.count,
            order,
            hex::encode(pack_bits(&self.bits, order))
        )
    }

    pub fn deserialize(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim().split(':').collect();
        if fields.len() != 7 {
            return Err(BloomError::malformed(format!(
                "expected 7 ':'-separated fields, got {}",
                fields.len()
            )));
        }

        let error_rate: f64 = fields[0].parse()?;
        validate_error_rate(error_rate)
            .map_err(|e| BloomError::malformed(e.to_string()))?;
        let params = BloomParams {
            num_slices: fields[1].parse()?,
            bits_per_slice: fields[2].parse()?,
        };
        let capacity: usize = fields[3].parse()?;
        let count: usize = fields[4].parse()?;
        if params.num_slices == 0 || params.bits_per_slice == 0 || capacity == 0
        {
            return Err(BloomError::malformed(
                "slices, bits per slice and capacity must be > 0",
            ));
        }
        let order: BitOrder = fields[5].parse()?;

        let num_bits =
            params.num_slices.checked_mul(params.bits_per_slice).ok_or_else(
                || BloomError::malformed("bit vector size overflows"),
            )?;
        let bits = unpack_bits(&hex::decode(fields[6])?, num_bits, order)?;

        let filter =
            Self::from_parts(error_rate, params, capacity, count, Some(bits))?;
        debug!(
            capacity,
            count,
            num_slices = params.num_slices,
            bits_per_slice = params.bits_per_slice,
            %order,
            "Deserialized bloom filter"
        );
        Ok(filter)
    }

    pub fn num_slices(&self) -> usize {
        self.hasher.num_slices()
    }

    pub fn bits_per_slice(&self) -> usize {
        self.hasher.bits_per_slice()
    }

    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    pub fn hasher(&self) -> &HashGenerator {
        &self.hasher
    }

    /// Share of bits currently set.
    pub fn fill_ratio(&self) -> f64 {
        self.bits.count_ones() as f64 / self.bits.len() as f64
    }
}

impl BloomFilterOps for BloomFilter {
    fn insert(&mut self, key: &str) -> Result<bool> {
        self.insert_with(key, false)
    }

    fn contains(&self, key: &str) -> bool {
        self.bit_indices(key).into_iter().all(|idx| self.bits[idx])
    }

    fn clear(&mut self) {
        self.bits.fill(false);
        self.count = 0;
    }
}

impl BloomFilterStats for BloomFilter {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn error_rate(&self) -> f64 {
        self.error_rate
    }

    fn count(&self) -> usize {
        self.count
    }
}

impl fmt::Display for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for BloomFilter {
    type Err = BloomError;

    fn from_str(s: &str) -> Result<Self> {
        Self::deserialize(s)
    }
}
