//! Partitioned and dynamic Bloom filters with a portable string format.
//!
//! This crate provides a fixed-capacity Bloom filter and a dynamic filter
//! that grows by chaining fixed-capacity shards.
//!
//! HowTo:
//!    * Slices: the bit vector of a filter is split into `k` slices of
//!      `m` bits, `k = ceil(log2(1 / error_rate))`.
//!    * Hashing: each key is hashed with a digest (MD5 up to SHA-512, picked by
//!      how many hash bits are needed) seeded by precomputed salts; the digest
//!      is cut into little-endian words, one per slice, reduced modulo `m`.
//!    * Shards: the dynamic filter inserts into its newest shard and opens a
//!      new one once that shard reaches its capacity. Each shard runs at an
//!      error rate picked so the whole chain stays under the requested bound.
//!
//! Insertion:
//!    * Fixed filter: set one bit per slice. Fails once the insert count
//!      exceeds the capacity.
//!    * Dynamic filter: skip keys some shard already reports, otherwise
//!      insert into the newest shard.
//! Query:
//!    * A key is present when its bit is set in every slice (of any shard).
//!      False negatives are impossible; false positives are bounded by the
//!      configured error rate.
//! Serialization:
//!    * `error_rate:num_slices:bits_per_slice:capacity:count:little:hex` for a
//!      fixed filter, `base,max,error_rate,shard|shard|...` for a dynamic one.
//!      Same layout as pybloom / dynamic-pybloom strings.
//!
//! Filters are plain owned values without internal locking: mutate a filter
//! from one thread at a time, or work on clones.

pub mod bloom;
pub mod common;
pub mod dynamic;
mod error;
pub mod hash;

pub use bloom::{
    BloomFilter, BloomFilterConfig, BloomFilterConfigBuilder,
    BloomFilterOps, BloomFilterStats, BulkBloomFilterOps,
};
pub use common::BitOrder;
pub use dynamic::{
    DynamicBloomFilter, DynamicFilterConfig, DynamicFilterConfigBuilder,
};
pub use error::{BloomError, Result};
pub use hash::{
    DigestAlgorithm, HashGenerator, WordWidth, optimal_bits_per_slice,
    optimal_num_slices,
};
