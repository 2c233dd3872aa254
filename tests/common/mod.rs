// tests/common/mod.rs

#![allow(dead_code)]

pub use tiermake_test_utils::builders;
pub use tiermake_test_utils::fake_spawner;
pub use tiermake_test_utils::{blocking_with_timeout, init_tracing, with_timeout};
