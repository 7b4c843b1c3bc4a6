use crate::error::Result;

/// Membership operations shared by fixed and dynamic filters.
pub trait BloomFilterOps {
    /// Inserts `key`, returning `true` when it was (probably) already present.
    fn insert(&mut self, key: &str) -> Result<bool>;

    /// `false` is definitive, `true` may be a false positive.
    fn contains(&self, key: &str) -> bool;

    /// Forgets every key and resets the count.
    fn clear(&mut self);
}

pub trait BloomFilterStats {
    fn capacity(&self) -> usize;
    fn error_rate(&self) -> f64;
    fn count(&self) -> usize;
}

pub trait BulkBloomFilterOps {
    fn insert_bulk(&mut self, keys: &[&str]) -> Result<Vec<bool>>;
    fn contains_bulk(&self, keys: &[&str]) -> Vec<bool>;
}

impl<F: BloomFilterOps> BulkBloomFilterOps for F {
    fn insert_bulk(&mut self, keys: &[&str]) -> Result<Vec<bool>> {
        keys.iter().map(|key| self.insert(key)).collect()
    }

    fn contains_bulk(&self, keys: &[&str]) -> Vec<bool> {
        keys.iter().map(|key| self.contains(key)).collect()
    }
}
