//! Shared test utilities for brick map integration tests
#![allow(dead_code)]

use std::sync::Arc;

use brickmap::brick::MemoryBrickStore;
use brickmap::config::Config;
use brickmap::crypto::KeyIdentity;
use brickmap::map::{BrickMap, BrickRef};

/// Timestamp every node gets under the test clock
pub const NOW: i64 = 1_700_000_000_000;

/// Set up a fresh map with a fixed clock, an empty store, and its template key
pub fn setup_test_env() -> (BrickMap, Arc<MemoryBrickStore>, KeyIdentity) {
    init_tracing();
    let key = KeyIdentity::generate().unwrap();
    let map = BrickMap::with_config(key.clone(), Config::fixed_clock(NOW));
    (map, Arc::new(MemoryBrickStore::new()), key)
}

/// A brick reference whose checksum is derived from its hash link
pub fn brick(hash_link: &str) -> BrickRef {
    BrickRef::new(hash_link, format!("sum-{hash_link}"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
