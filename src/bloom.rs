//! Fixed-capacity partitioned Bloom filter
pub mod config;
pub mod filter;
pub mod traits;

pub use config::{BloomFilterConfig, BloomFilterConfigBuilder, BloomParams};
pub use filter::BloomFilter;
pub use traits::{BloomFilterOps, BloomFilterStats, BulkBloomFilterOps};
