//! Collection engine seam
//!
//! The lag exporter that actually talks to Kafka lives outside this
//! crate. This module defines the two traits it must implement:
//! - `EngineFactory`, used once per instance at init
//! - `LagEngine`, the per-instance handle used on every due tick
//!
//! Nothing Kafka-protocol specific belongs here.

pub mod adapter;

pub use adapter::{EngineFactory, LagEngine};
