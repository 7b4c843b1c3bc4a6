//! Dynamic (scalable) Bloom filter: a growing chain of fixed-capacity shards
pub mod config;
pub mod filter;

pub use config::{DynamicFilterConfig, DynamicFilterConfigBuilder};
pub use filter::DynamicBloomFilter;
