use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a test-friendly subscriber honouring `RUST_LOG`.
#[allow(dead_code)]
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Decimal string keys, the format the fixtures were built with.
#[allow(dead_code)]
pub fn decimal_keys(range: std::ops::Range<i64>) -> Vec<String> {
    range.map(|i| i.to_string()).collect()
}

/// `BloomFilter(1000, 0.001)` holding "0".."999", as written by a
/// reference implementation of the salting scheme (big-endian salt index,
/// `little` payload). Its single salt has index 0, so the string is also
/// what pybloom writes for the same filter.
#[allow(dead_code)]
pub fn reference_fixture() -> String {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/reference_0_999.txt"
    );
    std::fs::read_to_string(path)
        .expect("Failed to read reference fixture")
        .trim()
        .to_string()
}
