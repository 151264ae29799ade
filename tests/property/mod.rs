//! Property-based tests for tower-decorate wrappers.
//!
//! Run with: cargo test --test property_tests
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold across all wrappers.

pub mod counter;
pub mod memo;
pub mod rate_limiter;
pub mod retry;

/// Current-thread runtime with a paused clock, so sleeps resolve instantly.
pub fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}
