//! RingSPSC - Lock-Free Single-Producer Single-Consumer Queue with
//! Elastic Capacity
//!
//! A FIFO queue for pipeline-parallel workloads where one pinned core
//! streams word-sized values to another. Unlike a classic SPSC ring it
//! never shares head/tail indices across cores on the hot path, and its
//! logical capacity doubles or halves under sustained pressure.
//!
//! # Key Features
//!
//! - Empty/full detection through slot occupancy (zero means vacant), so
//!   neither side reads the other's index
//! - Producer-side batching probe: an exponential search for vacancies
//!   that amortizes the cost of fullness checks
//! - Elastic capacity: the producer doubles it under full pressure, the
//!   consumer halves it under empty pressure via a packed-word CAS that
//!   conditions the capacity write on the producer's observed head
//! - 128-byte padded hot-field groups (prefetcher false sharing
//!   elimination)
//! - Cycle-based spin back-off decoupled from wall-clock time
//!
//! # Example
//!
//! ```
//! use ringspsc_rs::{queue, Config};
//! use std::num::NonZeroU64;
//!
//! let (mut producer, mut consumer) = queue(Config::default());
//!
//! producer.try_push(NonZeroU64::new(42).unwrap()).unwrap();
//! producer.try_push(NonZeroU64::new(43).unwrap()).unwrap();
//!
//! assert_eq!(consumer.try_pop().unwrap().get(), 42);
//! assert_eq!(consumer.try_pop().unwrap().get(), 43);
//! assert!(consumer.try_pop().is_err());
//! ```
//!
//! Values are `NonZeroU64` because a zero slot *is* the vacancy marker;
//! the type makes the one sharp edge of the protocol unrepresentable.

mod config;
mod consumer;
mod error;
mod info;
mod invariants;
mod metrics;
mod producer;
mod ring;
pub mod timing;

pub use config::{Config, DEFAULT_BATCH_SLICE};
pub use consumer::Consumer;
pub use error::{PopError, PushError};
pub use metrics::MetricsSnapshot;
pub use producer::Producer;
pub use ring::queue;

pub(crate) use metrics::Metrics;
