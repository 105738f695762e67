//! Helpers for resolvers that settle after a delay.
//!
//! Asynchronous resolvers in tests use these to make later builds finish
//! before earlier ones, so assertions can show that sequence numbers follow
//! call order rather than completion order.

use std::time::Duration;

/// Wait for `millis` milliseconds, then yield `value`.
///
/// Requires a running Tokio runtime with the time driver enabled.
pub async fn delayed<T>(millis: u64, value: T) -> T {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    value
}

/// A delay that shrinks as `sequence` grows, so builds finish in reverse.
///
/// Sequence numbers at or above `span` get no delay.
#[must_use]
pub const fn reverse_stagger(sequence: u64, span: u64) -> u64 {
    span.saturating_sub(sequence).saturating_mul(10)
}
