//! Error types for queue operations.

use thiserror::Error;

/// Producer-side failure: no free slot within the probe's reach.
///
/// Transient by nature; the caller decides whether and when to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PushError {
    /// The queue is full.
    #[error("queue is full")]
    Full,
}

/// Consumer-side failure: the tail slot holds no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PopError {
    /// The queue is empty.
    #[error("queue is empty")]
    Empty,
}
